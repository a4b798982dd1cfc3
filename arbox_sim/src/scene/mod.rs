// arbox_sim/src/scene/mod.rs

pub mod config;
pub mod core;
pub mod plugins;
