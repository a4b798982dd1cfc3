// arbox_sim/src/scene/config/mod.rs

//! This module handles loading, resolving, and validating the scenario
//! configuration from disk, including the asset catalog.

mod catalog;

pub mod structs;

use arbox_core::assets::SceneAssets;
use arbox_core::error::{AssetError, ConfigError, LayoutError};
use bevy::prelude::*;
use figment::{
    providers::{Format, Toml},
    Figment,
};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use catalog::load_catalog;
pub use structs::{MarkerConfig, SceneConfig, ScriptedEvent, Simulation, TrackerConfig};

#[derive(Debug, Error)]
pub enum SceneConfigError {
    #[error("scenario file not found at {0:?}")]
    MissingScenario(PathBuf),
    #[error("failed to parse scenario: {0}")]
    Scenario(#[from] Box<figment::Error>),
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse catalog entry {path:?}: {source}")]
    CatalogEntry {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("simulation.duration_seconds must be a non-negative number of seconds, got {0}")]
    InvalidDuration(f32),
    #[error("invalid spawner settings: {0}")]
    Spawner(#[from] ConfigError),
    #[error("invalid scene layout: {0}")]
    Layout(#[from] LayoutError),
    #[error("invalid asset registrations: {0}")]
    Assets(#[from] AssetError),
}

/// A scenario that has been parsed, merged with the catalog and validated.
#[derive(Debug, Clone)]
pub struct ResolvedScene {
    pub config: SceneConfig,
    pub assets: SceneAssets,
}

/// Loads the scenario at `path` and resolves its asset registrations.
pub fn load_scene(path: &Path) -> Result<ResolvedScene, SceneConfigError> {
    if !path.exists() {
        return Err(SceneConfigError::MissingScenario(path.to_path_buf()));
    }
    info!("[CONFIG] Loading scenario from: {}", path.display());

    let config: SceneConfig = Figment::new()
        .merge(Toml::file(path))
        .extract()
        .map_err(Box::new)?;

    resolve_scene(config)
}

/// Validates a parsed scenario and builds its final asset registry:
/// the built-in registrations, then the catalog, then the scenario's own
/// `[assets]` tables, later entries replacing earlier ones by name.
pub fn resolve_scene(config: SceneConfig) -> Result<ResolvedScene, SceneConfigError> {
    if let Some(secs) = config.simulation.duration_seconds {
        if config.simulation.duration().is_none() {
            return Err(SceneConfigError::InvalidDuration(secs));
        }
    }
    config.spawner.validate()?;
    config.layout.validate()?;

    let mut assets = SceneAssets::default();
    if let Some(catalog_dir) = &config.catalog_dir {
        assets.merge(load_catalog(catalog_dir)?);
    }
    assets.merge(config.assets.clone());

    assets.validate(&config.layout, &config.marker.target)?;
    if let Some(name) = config.marker.light_animation() {
        if assets.animation(name).is_none() {
            return Err(AssetError::UnknownAnimation(name.to_string()).into());
        }
    }

    info!(
        "[CONFIG] Resolved {} target(s), {} material(s), {} animation(s).",
        assets.targets.len(),
        assets.materials.len(),
        assets.animations.len()
    );

    Ok(ResolvedScene { config, assets })
}
