//! Uniform random draws for synthetic generation and subsampling.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of independent uniform draws in `[0, 1)`.
///
/// A fixed seed makes runs reproducible; without one the generator is seeded
/// from system entropy.
#[derive(Debug)]
pub struct Sampler {
    rng: StdRng,
}

impl Sampler {
    /// Create a sampler from an optional seed.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Next uniform draw in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Keep-or-drop decision for subsampling by `factor`.
    ///
    /// Keeps iff a fresh draw is below `1 / factor`, so `factor <= 1` keeps
    /// everything.
    #[inline]
    pub fn keep(&mut self, factor: f64) -> bool {
        self.unit() < 1.0 / factor
    }
}
