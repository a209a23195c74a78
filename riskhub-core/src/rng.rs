//! Injectable uniform randomness
//!
//! Sampling code never touches a global generator. Production callers wrap a
//! `rand` generator; tests use a seeded generator or a fixed sequence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Smallest value a source may yield, keeping `ln(u)` finite
pub const MIN_UNIFORM: f64 = 1e-10;

/// A source of uniform samples in (0, 1]
pub trait UniformSource {
    fn next_uniform(&mut self) -> f64;
}

/// Clamp a raw draw into (0, 1]
fn clamp_unit(value: f64) -> f64 {
    if value > 0.0 {
        value.min(1.0)
    } else {
        MIN_UNIFORM
    }
}

/// Adapter exposing any `rand::Rng` as a `UniformSource`
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        RngSource { rng }
    }
}

impl RngSource<StdRng> {
    /// Reproducible stream for a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Fresh OS entropy per call
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> UniformSource for RngSource<R> {
    fn next_uniform(&mut self) -> f64 {
        clamp_unit(self.rng.gen::<f64>())
    }
}

/// Replays a fixed list of samples, cycling when exhausted
#[derive(Debug, Clone)]
pub struct FixedSequence {
    values: Vec<f64>,
    cursor: usize,
}

impl FixedSequence {
    /// An empty list behaves like a constant 0.5
    pub fn new(values: Vec<f64>) -> Self {
        let values = if values.is_empty() { vec![0.5] } else { values };
        FixedSequence { values, cursor: 0 }
    }

    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl UniformSource for FixedSequence {
    fn next_uniform(&mut self) -> f64 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor = (self.cursor + 1) % self.values.len();
        clamp_unit(value)
    }
}
