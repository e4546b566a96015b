use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform white noise in `[-1.0, 1.0]`.
#[derive(Clone, Debug)]
pub struct WhiteNoise<R: Rng = StdRng> {
    rng: R,
}

impl WhiteNoise<StdRng> {
    pub fn new(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> WhiteNoise<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
    pub fn next_sample(&mut self) -> f32 {
        self.rng.gen_range(-1.0..=1.0)
    }
}
