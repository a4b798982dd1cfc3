// arbox_sim/src/prelude.rs

// Re-export the entire Bevy prelude for convenience.
pub use bevy::prelude::*;

// Re-export the core prelude so plugins can reach the spawner and scene
// model without spelling out module paths.
pub use arbox_core::prelude::*;

// Re-export common scene-specific types for easy access in other plugins.
pub use crate::scene::config::structs::*;
pub use crate::scene::core::app_state::{AppState, ArSet};
pub use crate::scene::core::events::ArRuntimeEvent;
