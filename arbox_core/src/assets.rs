// arbox_core/src/assets.rs

//! Asset registrations for the scene: the marker images the tracker looks
//! for, the named materials and the named animations.
//!
//! These are plain values handed to whoever builds the scene. Nothing is
//! registered globally.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::descriptors::SceneLayout;
use crate::error::AssetError;

// =========================================================================
// == Colors ==
// =========================================================================

/// An 8-bit sRGB color, written as `#RRGGBB` in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for Rgb {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AssetError::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = AssetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

// =========================================================================
// == Registrations ==
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

/// A reference image the tracker should recognize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrackingTarget {
    pub source: PathBuf,
    #[serde(default)]
    pub orientation: Orientation,
    /// Printed width of the marker in meters.
    pub physical_width: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MaterialDef {
    pub diffuse_color: Rgb,
}

/// A relative rotation about the Y axis played over `duration_ms`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnimationDef {
    pub rotate_y_deg: f32,
    pub duration_ms: u64,
}

impl AnimationDef {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Angular speed in degrees per second.
    pub fn degrees_per_second(&self) -> f32 {
        self.rotate_y_deg / self.duration().as_secs_f32()
    }
}

/// Every registration the scene can refer to by name.
///
/// `Default` holds the demo registrations. When deserialized, a missing
/// table is empty rather than defaulted, so a file can add entries without
/// restating the demo ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(bevy_ecs::prelude::Resource))]
#[serde(deny_unknown_fields)]
pub struct SceneAssets {
    #[serde(default)]
    pub targets: BTreeMap<String, TrackingTarget>,
    #[serde(default)]
    pub materials: BTreeMap<String, MaterialDef>,
    #[serde(default)]
    pub animations: BTreeMap<String, AnimationDef>,
}

impl Default for SceneAssets {
    fn default() -> Self {
        let targets = BTreeMap::from([(
            "targetImage".to_string(),
            TrackingTarget {
                source: PathBuf::from("qr.png"),
                orientation: Orientation::Up,
                physical_width: 0.1,
            },
        )]);

        let material = |r, g, b| MaterialDef {
            diffuse_color: Rgb::new(r, g, b),
        };
        let materials = BTreeMap::from([
            ("blue".to_string(), material(0x00, 0x00, 0xFF)),
            ("floor".to_string(), material(0xCC, 0xCC, 0xCC)),
            ("box".to_string(), material(0xFF, 0x00, 0x00)),
        ]);

        let spin = |duration_ms| AnimationDef {
            rotate_y_deg: 360.0,
            duration_ms,
        };
        let animations = BTreeMap::from([
            ("rotate".to_string(), spin(2500)),
            ("rotateLoop".to_string(), spin(2500)),
            ("rotateLightLoop".to_string(), spin(50_000)),
        ]);

        Self {
            targets,
            materials,
            animations,
        }
    }
}

impl SceneAssets {
    /// An empty registry, with none of the demo registrations.
    pub fn empty() -> Self {
        Self {
            targets: BTreeMap::new(),
            materials: BTreeMap::new(),
            animations: BTreeMap::new(),
        }
    }

    pub fn target(&self, name: &str) -> Option<&TrackingTarget> {
        self.targets.get(name)
    }

    pub fn material(&self, name: &str) -> Option<&MaterialDef> {
        self.materials.get(name)
    }

    pub fn animation(&self, name: &str) -> Option<&AnimationDef> {
        self.animations.get(name)
    }

    /// Adds every registration from `other`, replacing entries with the same name.
    pub fn merge(&mut self, other: SceneAssets) {
        self.targets.extend(other.targets);
        self.materials.extend(other.materials);
        self.animations.extend(other.animations);
    }

    /// Checks the registrations on their own and against the layout and
    /// marker target that will use them.
    pub fn validate(&self, layout: &SceneLayout, marker_target: &str) -> Result<(), AssetError> {
        for (name, target) in &self.targets {
            if !(target.physical_width > 0.0) {
                return Err(AssetError::NonPositiveWidth {
                    name: name.clone(),
                    width: target.physical_width,
                });
            }
        }

        if let Some((name, _)) = self.animations.iter().find(|(_, a)| a.duration_ms == 0) {
            return Err(AssetError::ZeroDuration(name.clone()));
        }

        for material in layout.material_names() {
            if self.material(material).is_none() {
                return Err(AssetError::UnknownMaterial(material.to_string()));
            }
        }

        if self.target(marker_target).is_none() {
            return Err(AssetError::UnknownTarget(marker_target.to_string()));
        }

        Ok(())
    }
}
