// arbox_sim/src/scene/config/catalog.rs

//! Loads asset registrations from a catalog directory laid out as
//!
//! ```text
//! <catalog>/targets/<name>.toml
//! <catalog>/materials/<name>.toml
//! <catalog>/animations/<name>.toml
//! ```
//!
//! Each file holds exactly one entry, named after its file stem.

use arbox_core::assets::{AnimationDef, MaterialDef, SceneAssets, TrackingTarget};
use bevy::prelude::*;
use serde::de::DeserializeOwned;
use std::{fs, path::Path};
use walkdir::WalkDir;

use super::SceneConfigError;

/// Walks `catalog_path` and collects every entry it finds. A missing
/// directory yields an empty set. Files outside the three known
/// subdirectories are skipped with a warning; a file that fails to parse is
/// an error.
pub fn load_catalog(catalog_path: &Path) -> Result<SceneAssets, SceneConfigError> {
    let mut assets = SceneAssets::empty();

    if !catalog_path.exists() {
        warn!(
            "[CATALOG] Catalog directory not found at {:?}, using built-in registrations only.",
            catalog_path
        );
        return Ok(assets);
    }

    info!("[CATALOG] Loading asset catalog from: {:?}", catalog_path);

    for entry in WalkDir::new(catalog_path)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| {
            !e.file_type().is_dir() && e.path().extension().is_some_and(|ext| ext == "toml")
        })
    {
        let path = entry.path();
        let Ok(relative) = path.strip_prefix(catalog_path) else {
            continue;
        };
        let Some(kind) = relative
            .components()
            .next()
            .and_then(|c| c.as_os_str().to_str())
        else {
            continue;
        };
        let Some(name) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
            continue;
        };

        match kind {
            "targets" => {
                let target: TrackingTarget = parse_entry(path)?;
                assets.targets.insert(name.clone(), target);
            }
            "materials" => {
                let material: MaterialDef = parse_entry(path)?;
                assets.materials.insert(name.clone(), material);
            }
            "animations" => {
                let animation: AnimationDef = parse_entry(path)?;
                assets.animations.insert(name.clone(), animation);
            }
            other => {
                warn!(
                    "[CATALOG] Skipping {:?}: unknown catalog section '{}'",
                    path, other
                );
                continue;
            }
        }
        debug!("[CATALOG] Loaded {} entry '{}'", kind, name);
    }

    Ok(assets)
}

fn parse_entry<T: DeserializeOwned>(path: &Path) -> Result<T, SceneConfigError> {
    let text = fs::read_to_string(path).map_err(|source| SceneConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| SceneConfigError::CatalogEntry {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbox_core::assets::Rgb;
    use std::path::PathBuf;

    fn repo_catalog() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../assets/catalog")
    }

    #[test]
    fn missing_directory_is_empty() {
        let assets = load_catalog(Path::new("does/not/exist")).unwrap();
        assert_eq!(assets, SceneAssets::empty());
    }

    #[test]
    fn loads_repository_catalog() {
        let assets = load_catalog(&repo_catalog()).unwrap();

        assert_eq!(
            assets.material("grass").unwrap().diffuse_color,
            Rgb::new(0x3A, 0x7D, 0x44)
        );
        assert_eq!(assets.animation("wobble").unwrap().duration_ms, 800);
        assert_eq!(assets.target("poster").unwrap().physical_width, 0.3);
    }
}
