//! Pink noise by the Voss-McCartney algorithm.
//!
//! A set of random rows is summed. Row `n` is re-randomized every `2^(n+1)` samples,
//! chosen by the trailing zeros of a running index, and one more fresh random value
//! is added per sample. The sum is kept incrementally, so a sample costs a single
//! row update instead of a full re-summation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const PINK_MAX_RANDOM_ROWS: usize = 32;
pub const PINK_RANDOM_BITS: u32 = 30;
pub const PINK_RANDOM_SHIFT: u32 = i64::BITS - PINK_RANDOM_BITS;
pub const DEFAULT_PINK_ROWS: usize = 12;

#[derive(Clone, Debug)]
pub struct PinkNoise<R: Rng = StdRng> {
    rng: R,
    rows: [i64; PINK_MAX_RANDOM_ROWS],
    running_sum: i64,
    index: u64,
    index_mask: u64,
    num_rows: usize,
    /// `1 / pmax`, with `pmax` the largest possible |sum|
    scalar: f64,
}

impl PinkNoise<StdRng> {
    pub fn new(num_rows: usize, seed: u64) -> Self {
        Self::with_rng(num_rows, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> PinkNoise<R> {
    /// `num_rows` is clamped to `1..=PINK_MAX_RANDOM_ROWS`.
    pub fn with_rng(num_rows: usize, rng: R) -> Self {
        let num_rows = num_rows.clamp(1, PINK_MAX_RANDOM_ROWS);
        // the extra per-sample random counts as one more row
        let pmax = (num_rows as i64 + 1) * (1i64 << (PINK_RANDOM_BITS - 1));
        Self {
            rng,
            rows: [0; PINK_MAX_RANDOM_ROWS],
            running_sum: 0,
            index: 0,
            index_mask: (1u64 << num_rows) - 1,
            num_rows,
            scalar: 1.0 / pmax as f64,
        }
    }

    /// Signed value in `[-2^29, 2^29)`.
    fn next_random(&mut self) -> i64 {
        (self.rng.gen::<u64>() as i64) >> PINK_RANDOM_SHIFT
    }

    pub fn next_sample(&mut self) -> f32 {
        self.index = (self.index + 1) & self.index_mask;
        if self.index != 0 {
            let n = self.index.trailing_zeros() as usize;
            let new_random = self.next_random();
            self.running_sum += new_random - self.rows[n];
            self.rows[n] = new_random;
        }
        let sum = self.running_sum + self.next_random();
        (sum as f64 * self.scalar) as f32
    }

    pub fn reset(&mut self) {
        self.rows = [0; PINK_MAX_RANDOM_ROWS];
        self.running_sum = 0;
        self.index = 0;
    }

    pub fn rows(&self) -> &[i64] {
        &self.rows[..self.num_rows]
    }
    pub fn running_sum(&self) -> i64 {
        self.running_sum
    }
    pub fn index(&self) -> u64 {
        self.index
    }
    pub fn index_mask(&self) -> u64 {
        self.index_mask
    }
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }
}
