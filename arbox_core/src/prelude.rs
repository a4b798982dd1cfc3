// arbox_core/src/prelude.rs

// --- State machine ---
pub use crate::scheduler::{IntervalScheduler, TimerHandle};
pub use crate::spawner::{SpawnedEntity, SpawnerConfig, TrackingSpawner};

// --- Data model ---
pub use crate::status::StatusMessage;
pub use crate::tracking::{AnchorState, TrackingStatus};

// --- Renderer-facing output and registrations ---
pub use crate::assets::{AnimationDef, MaterialDef, Rgb, SceneAssets, TrackingTarget};
pub use crate::descriptors::{
    BoxDescriptor, BoxStyle, FloorDescriptor, PhysicsBody, SceneFrame, SceneLayout,
};

pub use crate::error::{AssetError, ConfigError, LayoutError, SchedulerError, TrackingError};
