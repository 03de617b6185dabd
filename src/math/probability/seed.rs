// src/math/probability/seed.rs

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Expliziter Zufalls-Seed; ersetzt jeden prozessweiten Zufallszustand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeedConfig {
    pub seed: u64,
}

impl SeedConfig {
    pub fn from_seed(seed: u64) -> Self {
        Self { seed }
    }

    pub fn from_text<S: AsRef<str>>(text: S) -> Self {
        let mut hasher = DefaultHasher::new();
        text.as_ref().hash(&mut hasher);
        Self::from_seed(hasher.finish())
    }

    /// Neuer, deterministisch initialisierter Generator
    pub fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self::from_seed(rand::random::<u64>())
    }
}
