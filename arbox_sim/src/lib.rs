// arbox_sim/src/lib.rs

use bevy::prelude::*;

// Import the plugins defined within the scene crate.
use crate::scene::core::scene_setup::{HeadlessMode, SceneSetupPlugin};
use crate::scene::plugins::marker_scene::MarkerScenePlugin;
use crate::scene::plugins::spawner::SpawnerPlugin;
use crate::scene::plugins::tracker::TrackerPlugin;

// This prelude is for convenience for other files WITHIN the arbox_sim crate.
pub mod prelude;

pub mod cli;
pub mod scene;

/// The main plugin that brings together all the scene parts.
///
/// Insert the `SceneConfig` and `SceneAssets` resources before adding it;
/// `scene::config::load_scene` produces both.
pub struct ArBoxPlugin {
    /// Without a window there is nothing to render: only the tracker and
    /// the spawner run, and the app exits when the scene stops.
    pub headless: bool,
}

impl Plugin for ArBoxPlugin {
    fn build(&self, app: &mut App) {
        if self.headless {
            app.insert_resource(HeadlessMode);
        }

        app.add_plugins((
            // States, RNG, per-frame ordering and the run clock.
            SceneSetupPlugin,
            // Raises the runtime callbacks (script / keyboard).
            TrackerPlugin,
            // Applies callbacks and runs the spawn loop.
            SpawnerPlugin,
        ));

        if !self.headless {
            // Floor, boxes, camera, light and status text.
            app.add_plugins(MarkerScenePlugin);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::config::{SceneConfig, ScriptedEvent, Simulation, TrackerConfig};
    use crate::scene::core::app_state::AppState;
    use crate::scene::core::events::ArRuntimeEvent;
    use arbox_core::spawner::TrackingSpawner;
    use arbox_core::status::StatusMessage;
    use arbox_core::tracking::TrackingStatus;
    use bevy::state::app::StatesPlugin;
    use std::time::Duration;

    fn headless_app(script: Vec<ScriptedEvent>, duration_seconds: Option<f32>) -> App {
        let mut app = App::new();
        app.add_plugins(StatesPlugin)
            .init_resource::<Time>()
            .insert_resource(SceneConfig {
                simulation: Simulation {
                    seed: Some(1),
                    duration_seconds,
                },
                tracker: TrackerConfig {
                    keyboard: false,
                    script,
                },
                ..default()
            })
            .add_plugins(ArBoxPlugin { headless: true });
        app.update();
        app
    }

    fn step(app: &mut App, ms: u64) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(ms));
        app.update();
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::ZERO);
    }

    fn spawner(app: &App) -> &TrackingSpawner {
        app.world().resource::<TrackingSpawner>()
    }

    #[test]
    fn scripted_session_spawns_and_clears() {
        let script = vec![
            ScriptedEvent {
                at_ms: 50,
                event: ArRuntimeEvent::TrackingStatusChanged(TrackingStatus::Normal),
            },
            ScriptedEvent {
                at_ms: 100,
                event: ArRuntimeEvent::AnchorFound,
            },
            ScriptedEvent {
                at_ms: 4500,
                event: ArRuntimeEvent::AnchorLost,
            },
        ];
        let mut app = headless_app(script, None);

        step(&mut app, 50);
        assert_eq!(spawner(&app).status(), StatusMessage::Searching);

        step(&mut app, 50);
        assert!(spawner(&app).is_anchored());
        assert_eq!(spawner(&app).status(), StatusMessage::TargetFound);

        // The loop was started at the beginning of the 100 ms frame, so it
        // fires at 2050 ms and 4050 ms.
        step(&mut app, 1949);
        assert!(spawner(&app).entities().is_empty());
        step(&mut app, 2001);
        let ids: Vec<u64> = spawner(&app).entities().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![0, 1]);

        step(&mut app, 450);
        assert!(spawner(&app).entities().is_empty());
        assert_eq!(spawner(&app).status(), StatusMessage::TargetLost);
        assert_eq!(spawner(&app).active_timers(), 0);
    }

    #[test]
    fn headless_run_stops_after_duration() {
        let script = vec![ScriptedEvent {
            at_ms: 0,
            event: ArRuntimeEvent::AnchorFound,
        }];
        let mut app = headless_app(script, Some(3.0));

        step(&mut app, 2500);
        assert_eq!(spawner(&app).entities().len(), 1);

        step(&mut app, 600);
        step(&mut app, 0);
        assert_eq!(
            app.world().resource::<State<AppState>>().get(),
            &AppState::Stopped
        );
        assert_eq!(spawner(&app).active_timers(), 0);
        assert!(spawner(&app).entities().is_empty());
    }
}
