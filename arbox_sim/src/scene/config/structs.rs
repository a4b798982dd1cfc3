// arbox_sim/src/scene/config/structs.rs

use arbox_core::assets::SceneAssets;
use arbox_core::descriptors::SceneLayout;
use arbox_core::spawner::SpawnerConfig;
use bevy::prelude::Resource;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::scene::core::events::ArRuntimeEvent;

// =========================================================================
// == Top-Level Configuration Resource ==
// =========================================================================

/// # SceneConfig
/// The primary Bevy resource holding all configuration for a run.
/// This struct is the root of the data parsed from a scenario TOML file.
#[derive(Resource, Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)] // Fail if the TOML has fields not in our struct
pub struct SceneConfig {
    #[serde(default)]
    pub simulation: Simulation,

    #[serde(default)]
    pub spawner: SpawnerConfig,

    #[serde(default)]
    pub layout: SceneLayout,

    #[serde(default)]
    pub marker: MarkerConfig,

    #[serde(default)]
    pub tracker: TrackerConfig,

    /// Registrations added on top of the demo defaults and the catalog.
    #[serde(default = "SceneAssets::empty")]
    pub assets: SceneAssets,

    /// Directory of per-entry TOML registrations, see `catalog.rs`.
    #[serde(default)]
    pub catalog_dir: Option<PathBuf>,
}

// =========================================================================
// == Configuration Sub-Structs ==
// =========================================================================

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Simulation {
    /// Optional seed for the spawn-position generator.
    pub seed: Option<u64>,
    /// Stop the scene after this many seconds. Runs until closed when unset.
    pub duration_seconds: Option<f32>,
}

impl Simulation {
    /// The run time limit. `None` when unset or not representable, which
    /// `resolve_scene` reports as an error.
    pub fn duration(&self) -> Option<Duration> {
        self.duration_seconds
            .and_then(|secs| Duration::try_from_secs_f32(secs).ok())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct MarkerConfig {
    /// Name of the registered tracking target the scene is anchored to.
    pub target: String,
    /// Where the stand-in tracker places the anchor, in world meters.
    pub translation: [f32; 3],
    /// Registered animation used to slowly turn the scene light. An empty
    /// string leaves the light still.
    pub light_animation: Option<String>,
}

impl MarkerConfig {
    pub fn light_animation(&self) -> Option<&str> {
        self.light_animation.as_deref().filter(|name| !name.is_empty())
    }
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            target: "targetImage".to_string(),
            translation: [0.0, -0.3, -1.0],
            light_animation: Some("rotateLightLoop".to_string()),
        }
    }
}

/// Configuration of the stand-in for the runtime's image tracker.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrackerConfig {
    /// Raise callbacks from the keyboard (windowed runs only).
    #[serde(default = "default_true")]
    pub keyboard: bool,
    /// Callbacks to raise at fixed times after the scene starts running.
    #[serde(default)]
    pub script: Vec<ScriptedEvent>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            keyboard: true,
            script: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptedEvent {
    pub at_ms: u64,
    pub event: ArRuntimeEvent,
}

impl ScriptedEvent {
    pub fn at(&self) -> Duration {
        Duration::from_millis(self.at_ms)
    }
}
