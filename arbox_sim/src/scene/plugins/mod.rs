// arbox_sim/src/scene/plugins/mod.rs

pub mod marker_scene;
pub mod spawner;
pub mod tracker;
