// arbox_sim/src/scene/core/transforms.rs

//! Conversions between the core's nalgebra/array types and Bevy's math and
//! color types.
//!
//! Both sides use the same axes (Y up, right-handed), so conversions are
//! component-wise.

use arbox_core::assets::Rgb;
use bevy::math::EulerRot;
use bevy::prelude::{Color, Quat, Transform, Vec3};
use nalgebra::Vector3;

pub fn nalgebra_vector_to_bevy(v: &Vector3<f32>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub fn array_to_bevy(v: [f32; 3]) -> Vec3 {
    Vec3::from_array(v)
}

/// Euler angles in degrees, applied X then Y then Z.
pub fn euler_deg_to_quat(rotation_deg: [f32; 3]) -> Quat {
    let [x, y, z] = rotation_deg;
    Quat::from_euler(EulerRot::XYZ, x.to_radians(), y.to_radians(), z.to_radians())
}

/// World transform of an object placed at `local_position` / `local_rotation`
/// relative to the anchor.
pub fn anchored_transform(anchor: &Transform, local_position: Vec3, local_rotation: Quat) -> Transform {
    Transform::from_translation(anchor.transform_point(local_position))
        .with_rotation(anchor.rotation * local_rotation)
}

pub fn rgb_to_color(rgb: Rgb) -> Color {
    Color::srgb_u8(rgb.r, rgb.g, rgb.b)
}
