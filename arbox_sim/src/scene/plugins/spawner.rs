// arbox_sim/src/scene/plugins/spawner.rs

use arbox_core::spawner::TrackingSpawner;

use crate::prelude::*;
use crate::scene::core::app_state::ArSet;
use crate::scene::core::events::ArRuntimeEvent;
use crate::scene::core::prng::SceneRng;

// =========================================================================
// == Spawner Plugin ==
// =========================================================================

/// Owns the `TrackingSpawner` resource: applies runtime callbacks to it,
/// advances its spawn loop every frame and tears it down with the scene.
pub struct SpawnerPlugin;

impl Plugin for SpawnerPlugin {
    fn build(&self, app: &mut App) {
        let spawner_config = app
            .world()
            .get_resource::<SceneConfig>()
            .map(|config| config.spawner.clone())
            .unwrap_or_default();

        match TrackingSpawner::new(spawner_config) {
            Ok(spawner) => {
                info!(
                    "[SPAWNER] Spawning every {} ms at height {} m within ±{} m.",
                    spawner.config().interval_ms,
                    spawner.config().spawn_height,
                    spawner.config().horizontal_extent
                );
                app.insert_resource(spawner);
            }
            Err(e) => {
                error!("[SPAWNER] Invalid spawner settings, the spawner is disabled: {}", e);
            }
        }

        app.add_systems(
            Update,
            (
                apply_runtime_events.in_set(ArSet::Callbacks),
                advance_spawn_loop.in_set(ArSet::Spawn),
            )
                .run_if(resource_exists::<TrackingSpawner>),
        )
        .add_systems(
            OnEnter(AppState::Stopped),
            teardown_spawner.run_if(resource_exists::<TrackingSpawner>),
        )
        .add_systems(
            Last,
            teardown_on_exit.run_if(resource_exists::<TrackingSpawner>),
        );
    }
}

// =========================================================================
// == Runtime Systems ==
// =========================================================================

/// Applies this frame's callbacks in the order the runtime raised them.
fn apply_runtime_events(
    mut events: EventReader<ArRuntimeEvent>,
    mut spawner: ResMut<TrackingSpawner>,
) {
    for event in events.read() {
        match *event {
            ArRuntimeEvent::AnchorFound => {
                if spawner.on_anchor_found() {
                    info!("[SPAWNER] Anchor found, spawn loop started.");
                } else {
                    debug!("[SPAWNER] Anchor found while already anchored, keeping the running loop.");
                }
            }
            ArRuntimeEvent::AnchorLost => {
                let cleared = spawner.on_anchor_lost();
                info!(
                    "[SPAWNER] Anchor lost, spawn loop cancelled and {} box(es) cleared.",
                    cleared
                );
            }
            ArRuntimeEvent::TrackingStatusChanged(status) => {
                spawner.on_tracking_update(status);
                debug!("[SPAWNER] Tracking status is now {}.", status);
            }
            ArRuntimeEvent::RawTrackingCode(code) => {
                if !spawner.on_tracking_code(code) {
                    debug!("[SPAWNER] Ignoring unrecognized tracking code {}.", code);
                }
            }
        }
    }
}

/// Advances the spawn loop by the frame delta.
///
/// Change detection is only triggered when something was spawned, so the
/// renderer does not resync on frames where nothing happened.
fn advance_spawn_loop(
    time: Res<Time>,
    mut rng: ResMut<SceneRng>,
    mut spawner: ResMut<TrackingSpawner>,
) {
    let spawned = spawner
        .bypass_change_detection()
        .advance(time.delta(), &mut rng.0);
    if spawned.is_empty() {
        return;
    }

    for entity in spawned {
        debug!(
            "[SPAWNER] Spawned box {} at ({:.3}, {:.3}, {:.3}).",
            entity.id, entity.position.x, entity.position.y, entity.position.z
        );
    }
    spawner.set_changed();
}

/// Scene teardown: cancels the pending spawn loop and drops every box.
pub(crate) fn teardown_spawner(mut spawner: ResMut<TrackingSpawner>) {
    let timers = spawner.active_timers();
    spawner.shutdown();
    info!(
        "[SPAWNER] Teardown: cancelled {} pending loop(s), {} box(es) spawned in total.",
        timers,
        spawner.next_id()
    );
}

fn teardown_on_exit(exit: EventReader<AppExit>, spawner: ResMut<TrackingSpawner>) {
    if exit.is_empty() {
        return;
    }
    teardown_spawner(spawner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::config::Simulation;
    use crate::scene::core::scene_setup::SceneSetupPlugin;
    use arbox_core::status::StatusMessage;
    use arbox_core::tracking::TrackingStatus;
    use bevy::state::app::StatesPlugin;
    use std::time::Duration;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins(StatesPlugin)
            .init_resource::<Time>()
            .insert_resource(SceneConfig {
                simulation: Simulation {
                    seed: Some(7),
                    duration_seconds: None,
                },
                ..default()
            })
            .add_plugins((SceneSetupPlugin, SpawnerPlugin));

        // Let the SceneBuilding -> Running transition settle.
        app.update();
        app.update();
        assert_eq!(
            app.world().resource::<State<AppState>>().get(),
            &AppState::Running
        );
        app
    }

    /// Runs one frame whose delta is `ms` milliseconds.
    fn step(app: &mut App, ms: u64) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(ms));
        app.update();
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::ZERO);
    }

    fn send(app: &mut App, event: ArRuntimeEvent) {
        app.world_mut().send_event(event);
    }

    fn box_ids(app: &App) -> Vec<u64> {
        app.world()
            .resource::<TrackingSpawner>()
            .entities()
            .iter()
            .map(|e| e.id)
            .collect()
    }

    #[test]
    fn found_lost_found_through_events() {
        let mut app = test_app();

        send(&mut app, ArRuntimeEvent::AnchorFound);
        step(&mut app, 0);
        step(&mut app, 5000);
        assert_eq!(box_ids(&app), vec![0, 1]);

        send(&mut app, ArRuntimeEvent::AnchorLost);
        step(&mut app, 0);
        assert!(box_ids(&app).is_empty());
        assert_eq!(
            app.world().resource::<TrackingSpawner>().status(),
            StatusMessage::TargetLost
        );

        send(&mut app, ArRuntimeEvent::AnchorFound);
        step(&mut app, 0);
        step(&mut app, 2000);
        assert_eq!(box_ids(&app), vec![2]);
    }

    #[test]
    fn callbacks_in_one_frame_apply_in_order() {
        let mut app = test_app();

        send(&mut app, ArRuntimeEvent::AnchorFound);
        send(&mut app, ArRuntimeEvent::AnchorLost);
        step(&mut app, 0);
        assert!(!app.world().resource::<TrackingSpawner>().is_anchored());

        send(&mut app, ArRuntimeEvent::AnchorLost);
        send(&mut app, ArRuntimeEvent::AnchorFound);
        step(&mut app, 0);
        let spawner = app.world().resource::<TrackingSpawner>();
        assert!(spawner.is_anchored());
        assert_eq!(spawner.active_timers(), 1);
    }

    #[test]
    fn callbacks_raised_with_a_tick_are_applied_first() {
        let mut app = test_app();

        // The found callback counts from the start of the frame it arrives in.
        send(&mut app, ArRuntimeEvent::AnchorFound);
        step(&mut app, 2000);
        assert_eq!(box_ids(&app), vec![0]);

        // A lost callback arriving with a long frame wins over the ticks in it.
        step(&mut app, 1999);
        send(&mut app, ArRuntimeEvent::AnchorLost);
        step(&mut app, 5000);
        assert!(box_ids(&app).is_empty());
        assert_eq!(app.world().resource::<TrackingSpawner>().next_id(), 1);
    }

    #[test]
    fn tracking_events_only_touch_the_status() {
        let mut app = test_app();

        send(&mut app, ArRuntimeEvent::AnchorFound);
        step(&mut app, 0);
        step(&mut app, 2000);

        send(
            &mut app,
            ArRuntimeEvent::TrackingStatusChanged(TrackingStatus::Unavailable),
        );
        send(&mut app, ArRuntimeEvent::RawTrackingCode(2));
        step(&mut app, 0);

        let spawner = app.world().resource::<TrackingSpawner>();
        assert!(spawner.is_anchored());
        assert_eq!(spawner.entities().len(), 1);
        assert_eq!(spawner.status(), StatusMessage::TrackingUnavailable);
    }

    #[test]
    fn stopping_the_scene_cancels_the_loop() {
        let mut app = test_app();

        send(&mut app, ArRuntimeEvent::AnchorFound);
        step(&mut app, 0);
        step(&mut app, 2000);

        app.world_mut()
            .resource_mut::<NextState<AppState>>()
            .set(AppState::Stopped);
        step(&mut app, 0);

        let spawner = app.world().resource::<TrackingSpawner>();
        assert_eq!(spawner.active_timers(), 0);
        assert!(spawner.entities().is_empty());

        // Callbacks and ticks are no longer applied once stopped.
        send(&mut app, ArRuntimeEvent::AnchorFound);
        step(&mut app, 10_000);
        let spawner = app.world().resource::<TrackingSpawner>();
        assert!(!spawner.is_anchored());
        assert_eq!(spawner.next_id(), 1);
    }

    #[test]
    fn invalid_config_disables_the_spawner() {
        let mut app = App::new();
        let mut config = SceneConfig::default();
        config.spawner.interval_ms = 0;
        app.add_plugins(StatesPlugin)
            .init_resource::<Time>()
            .insert_resource(config)
            .add_plugins((SceneSetupPlugin, SpawnerPlugin));
        app.update();

        assert!(!app.world().contains_resource::<TrackingSpawner>());
    }
}
