// arbox_sim/src/scene/core/scene_setup.rs

use std::time::Duration;

use crate::prelude::*;
use crate::scene::core::app_state::ArSet;
use crate::scene::core::events::ArRuntimeEvent;
use crate::scene::core::prng::SceneRng;

/// Marks a run without a window. The app exits once the scene is stopped.
#[derive(Resource, Debug, Clone, Copy)]
pub struct HeadlessMode;

pub struct SceneSetupPlugin;

impl Plugin for SceneSetupPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<SceneConfig>() {
            warn!("[SETUP] No SceneConfig inserted before SceneSetupPlugin, using defaults.");
            app.init_resource::<SceneConfig>();
        }
        let seed = app.world().resource::<SceneConfig>().simulation.seed;

        // --- 1. Add the Deterministic PRNG Resource ---
        match seed {
            Some(seed) => info!("[SETUP] Seeding scene RNG with {}", seed),
            None => info!("[SETUP] No seed configured, seeding scene RNG from OS entropy"),
        }
        app.insert_resource(SceneRng::from_seed(seed));

        // --- 2. States & Events ---
        app.init_state::<AppState>()
            .add_event::<ArRuntimeEvent>();

        // --- 3. Per-frame ordering ---
        app.configure_sets(
            Update,
            (ArSet::Tracking, ArSet::Callbacks, ArSet::Spawn, ArSet::Render)
                .chain()
                .run_if(in_state(AppState::Running)),
        );

        app.add_systems(OnEnter(AppState::SceneBuilding), transition_to_running)
            .add_systems(
                Update,
                stop_after_duration.run_if(in_state(AppState::Running)),
            )
            .add_systems(
                OnEnter(AppState::Stopped),
                exit_when_headless.run_if(resource_exists::<HeadlessMode>),
            );
    }
}

/// Runs once when the scene has been built and moves the app into `Running`.
fn transition_to_running(mut next_state: ResMut<NextState<AppState>>) {
    info!("[SETUP] Scene building complete. Transitioning to Running state.");
    next_state.set(AppState::Running);
}

/// Moves the app into `Stopped` once the configured run time has elapsed.
fn stop_after_duration(
    config: Res<SceneConfig>,
    time: Res<Time>,
    mut running_for: Local<Duration>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let Some(limit) = config.simulation.duration() else {
        return;
    };

    *running_for += time.delta();
    if *running_for >= limit {
        info!(
            "[SETUP] Run time of {:.1}s reached. Stopping the scene.",
            limit.as_secs_f32()
        );
        next_state.set(AppState::Stopped);
    }
}

fn exit_when_headless(mut exit: EventWriter<AppExit>) {
    info!("[SETUP] Headless run finished, exiting.");
    exit.write(AppExit::Success);
}
