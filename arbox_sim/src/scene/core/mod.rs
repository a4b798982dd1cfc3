// arbox_sim/src/scene/core/mod.rs

pub mod app_state;
pub mod events;
pub mod prng;
pub mod scene_setup;
pub mod transforms;
