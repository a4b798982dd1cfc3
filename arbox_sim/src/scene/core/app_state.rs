// arbox_sim/src/scene/core/app_state.rs

use bevy::{ecs::schedule::SystemSet, prelude::States};

/// Defines the major phases of the application's lifecycle.
#[derive(States, Debug, Clone, Eq, PartialEq, Hash, Default)]
pub enum AppState {
    /// The initial state. Resources from the scenario are in place and the
    /// static parts of the scene (camera, light, materials) are being built.
    #[default]
    SceneBuilding,

    /// Tracking callbacks are processed and the spawn loop is live.
    Running,

    /// The scene has been torn down. The spawn loop is cancelled and no
    /// further callbacks are applied.
    Stopped,
}

// =========================================================================
// == Per-frame ordering ==
// =========================================================================

/// Ordering of the work done every frame while the scene is running.
/// Callbacks raised in a frame are always applied before that frame's tick.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArSet {
    /// The tracker stand-in raises runtime callbacks as events.
    Tracking,
    /// Callbacks are applied to the spawner in the order they were raised.
    Callbacks,
    /// The spawn loop advances by the frame delta.
    Spawn,
    /// The renderer catches up with the spawner's declarative output.
    Render,
}
