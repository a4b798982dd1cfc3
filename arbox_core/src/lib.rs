// arbox_core/src/lib.rs

// Engine-free core of the marker demo: tracking data model, the spawn-loop
// state machine and the declarative scene it produces.
pub mod assets;
pub mod descriptors;
pub mod error;
pub mod prelude;
pub mod scheduler;
pub mod spawner;
pub mod status;
pub mod tracking;
