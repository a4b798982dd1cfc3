// arbox_sim/src/scene/core/prng.rs

use bevy::prelude::Resource;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// A newtype wrapper around `ChaCha8Rng` to make it a Bevy Resource.
/// Every random spawn position in the scene is drawn from this generator.
#[derive(Resource)]
pub struct SceneRng(pub ChaCha8Rng);

impl SceneRng {
    /// Seeded for reproducible runs, or from OS entropy when no seed is given.
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(ChaCha8Rng::seed_from_u64(seed)),
            None => Self(ChaCha8Rng::from_entropy()),
        }
    }
}
