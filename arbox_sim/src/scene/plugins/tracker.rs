// arbox_sim/src/scene/plugins/tracker.rs

//! Stand-in for the AR runtime's image and pose tracking. It raises the same
//! callbacks a real runtime would, either from a timeline in the scenario file
//! or from the keyboard.

use std::time::Duration;

use arbox_core::tracking::TrackingStatus;

use crate::prelude::*;
use crate::scene::config::ScriptedEvent;
use crate::scene::core::app_state::ArSet;
use crate::scene::core::events::ArRuntimeEvent;

/// The scripted callbacks still to be raised, ordered by time.
#[derive(Resource, Debug, Default)]
pub struct TrackerScript {
    events: Vec<ScriptedEvent>,
    cursor: usize,
    elapsed: Duration,
}

impl TrackerScript {
    pub fn new(mut events: Vec<ScriptedEvent>) -> Self {
        // Stable sort: events sharing a timestamp keep their file order.
        events.sort_by_key(|e| e.at_ms);
        Self {
            events,
            cursor: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Advances the script clock and returns the callbacks that became due.
    pub fn advance(&mut self, dt: Duration) -> &[ScriptedEvent] {
        self.elapsed += dt;
        let start = self.cursor;
        while self
            .events
            .get(self.cursor)
            .is_some_and(|e| e.at() <= self.elapsed)
        {
            self.cursor += 1;
        }
        &self.events[start..self.cursor]
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.events.len()
    }
}

pub struct TrackerPlugin;

impl Plugin for TrackerPlugin {
    fn build(&self, app: &mut App) {
        let tracker = app
            .world()
            .get_resource::<SceneConfig>()
            .map(|config| config.tracker.clone())
            .unwrap_or_default();

        if !tracker.script.is_empty() {
            info!(
                "[TRACKER] Loaded a script of {} callback(s).",
                tracker.script.len()
            );
        }
        app.insert_resource(TrackerScript::new(tracker.script));
        app.add_systems(Update, play_tracker_script.in_set(ArSet::Tracking));

        if tracker.keyboard {
            app.add_systems(
                Update,
                keyboard_tracker
                    .in_set(ArSet::Tracking)
                    .after(play_tracker_script)
                    .run_if(resource_exists::<ButtonInput<KeyCode>>),
            );
        }
    }
}

/// Raises every scripted callback whose time has come.
fn play_tracker_script(
    time: Res<Time>,
    mut script: ResMut<TrackerScript>,
    mut writer: EventWriter<ArRuntimeEvent>,
) {
    if script.is_finished() {
        return;
    }
    for scripted in script.advance(time.delta()) {
        info!(
            "[TRACKER] t={}ms: raising {:?}",
            scripted.at_ms, scripted.event
        );
        writer.write(scripted.event);
    }
}

/// Keyboard stand-in for the runtime:
/// `F` anchor found, `L` anchor lost, `N`/`U`/`I` tracking normal,
/// unavailable or uninitialized.
fn keyboard_tracker(keyboard: Res<ButtonInput<KeyCode>>, mut writer: EventWriter<ArRuntimeEvent>) {
    let bindings = [
        (KeyCode::KeyF, ArRuntimeEvent::AnchorFound),
        (KeyCode::KeyL, ArRuntimeEvent::AnchorLost),
        (
            KeyCode::KeyN,
            ArRuntimeEvent::TrackingStatusChanged(TrackingStatus::Normal),
        ),
        (
            KeyCode::KeyU,
            ArRuntimeEvent::TrackingStatusChanged(TrackingStatus::Unavailable),
        ),
        (
            KeyCode::KeyI,
            ArRuntimeEvent::TrackingStatusChanged(TrackingStatus::Uninitialized),
        ),
    ];

    for (key, event) in bindings {
        if keyboard.just_pressed(key) {
            debug!("[TRACKER] {:?} pressed: raising {:?}", key, event);
            writer.write(event);
        }
    }
}
