// arbox_core/src/descriptors.rs

//! Declarative output handed to the renderer. Nothing here is drawn or
//! simulated by this crate; these are plain descriptions of what the host
//! engine should materialize.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::spawner::SpawnedEntity;
use crate::status::StatusMessage;

/// The physics body the host engine should attach to a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "PascalCase", deny_unknown_fields)]
pub enum PhysicsBody {
    Static {
        restitution: f32,
        friction: f32,
    },
    Dynamic {
        mass: f32,
        #[serde(default)]
        force: [f32; 3],
        #[serde(default)]
        torque: [f32; 3],
    },
}

impl PhysicsBody {
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic { .. })
    }

    fn validate(&self, what: &'static str) -> Result<(), LayoutError> {
        match *self {
            Self::Dynamic { mass, .. } if !(mass.is_finite() && mass > 0.0) => {
                Err(LayoutError::NonPositiveMass { what, mass })
            }
            _ => Ok(()),
        }
    }
}

/// Geometry and appearance of every spawned box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct BoxStyle {
    /// Edge length of the cube in meters.
    pub size: f32,
    pub material: String,
    pub body: PhysicsBody,
}

impl Default for BoxStyle {
    fn default() -> Self {
        Self {
            size: 0.05,
            material: "box".to_string(),
            body: PhysicsBody::Dynamic {
                mass: 1.0,
                force: [0.0; 3],
                torque: [0.0; 3],
            },
        }
    }
}

/// The floor quad under the anchor. Rendered unconditionally while anchored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct FloorDescriptor {
    pub position: [f32; 3],
    /// Euler rotation in degrees, applied X then Y then Z.
    pub rotation_deg: [f32; 3],
    pub width: f32,
    pub height: f32,
    pub material: String,
    pub body: PhysicsBody,
}

impl Default for FloorDescriptor {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation_deg: [-90.0, 0.0, 0.0],
            width: 0.5,
            height: 0.5,
            material: "floor".to_string(),
            body: PhysicsBody::Static {
                restitution: 0.3,
                friction: 0.8,
            },
        }
    }
}

/// Static layout of the anchored scene, loaded from configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct SceneLayout {
    pub floor: FloorDescriptor,
    pub boxes: BoxStyle,
}

impl SceneLayout {
    /// Every material name the layout refers to.
    pub fn material_names(&self) -> [&str; 2] {
        [self.floor.material.as_str(), self.boxes.material.as_str()]
    }

    /// Checks the extents and masses that end up in meshes and colliders.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let extents = [
            ("box size", self.boxes.size),
            ("floor width", self.floor.width),
            ("floor height", self.floor.height),
        ];
        for (what, value) in extents {
            if !(value.is_finite() && value > 0.0) {
                return Err(LayoutError::NonPositiveExtent { what, value });
            }
        }

        self.floor.body.validate("floor")?;
        self.boxes.body.validate("box")
    }
}

/// One box to render, positioned relative to the anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxDescriptor {
    pub id: u64,
    pub position: Vector3<f32>,
    pub size: f32,
    pub material: String,
    pub body: PhysicsBody,
}

impl BoxDescriptor {
    pub fn from_entity(entity: &SpawnedEntity, style: &BoxStyle) -> Self {
        Self {
            id: entity.id,
            position: entity.position,
            size: style.size,
            material: style.material.clone(),
            body: style.body,
        }
    }
}

/// Everything the renderer needs for one state of the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneFrame {
    pub status: StatusMessage,
    pub floor: Option<FloorDescriptor>,
    pub boxes: Vec<BoxDescriptor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_matches_demo_scene() {
        let layout = SceneLayout::default();

        assert_eq!(layout.boxes.size, 0.05);
        assert_eq!(layout.boxes.material, "box");
        assert_eq!(
            layout.boxes.body,
            PhysicsBody::Dynamic {
                mass: 1.0,
                force: [0.0; 3],
                torque: [0.0; 3]
            }
        );

        assert_eq!(layout.floor.width, 0.5);
        assert_eq!(layout.floor.height, 0.5);
        assert_eq!(layout.floor.rotation_deg, [-90.0, 0.0, 0.0]);
        assert!(!layout.floor.body.is_dynamic());
        assert_eq!(layout.material_names(), ["floor", "box"]);
    }

    #[test]
    fn partial_layout_fills_in_defaults() {
        let layout: SceneLayout = toml::from_str(
            r#"
            [boxes]
            size = 0.1
            material = "blue"
            body = { type = "Dynamic", mass = 2.0 }
            "#,
        )
        .unwrap();

        assert_eq!(layout.boxes.size, 0.1);
        assert_eq!(layout.boxes.material, "blue");
        assert_eq!(
            layout.boxes.body,
            PhysicsBody::Dynamic {
                mass: 2.0,
                force: [0.0; 3],
                torque: [0.0; 3]
            }
        );
        assert_eq!(layout.floor, FloorDescriptor::default());
    }

    #[test]
    fn default_layout_is_valid() {
        assert_eq!(SceneLayout::default().validate(), Ok(()));
    }

    #[test]
    fn degenerate_extents_are_rejected() {
        let layout: SceneLayout = toml::from_str("[boxes]\nsize = -0.05").unwrap();
        assert_eq!(
            layout.validate(),
            Err(LayoutError::NonPositiveExtent {
                what: "box size",
                value: -0.05
            })
        );

        let mut layout = SceneLayout::default();
        layout.floor.height = 0.0;
        assert!(matches!(
            layout.validate(),
            Err(LayoutError::NonPositiveExtent {
                what: "floor height",
                ..
            })
        ));

        let mut layout = SceneLayout::default();
        layout.floor.width = f32::NAN;
        assert!(layout.validate().is_err());
    }

    #[test]
    fn dynamic_bodies_need_mass() {
        let layout: SceneLayout =
            toml::from_str("[boxes]\nbody = { type = \"Dynamic\", mass = 0.0 }").unwrap();
        assert_eq!(
            layout.validate(),
            Err(LayoutError::NonPositiveMass {
                what: "box",
                mass: 0.0
            })
        );

        // Static bodies carry no mass.
        let mut layout = SceneLayout::default();
        layout.floor.body = PhysicsBody::Static {
            restitution: 0.0,
            friction: 0.0,
        };
        assert_eq!(layout.validate(), Ok(()));
    }
}
