//! Injected randomness
//!
//! Spawn rolls and cosmetic jitter all draw from one [`RandomSource`], so
//! tests can swap in a scripted sequence.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Uniform source of `f32` values in `[0, 1)`
pub trait RandomSource {
    fn next_f32(&mut self) -> f32;

    /// Uniform value in `[min, max)`
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_f32()
    }

    /// True with probability `p`
    fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }
}

impl<R: Rng> RandomSource for R {
    fn next_f32(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Production generator: PCG seeded from the thread RNG (runs are not replayable)
pub fn entropy_rng() -> Pcg32 {
    Pcg32::from_rng(&mut rand::rng())
}

/// Scripted generator that cycles through a fixed list of values
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    values: Vec<f32>,
    cursor: usize,
}

impl SequenceRandom {
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        let values = values.into();
        Self { values, cursor: 0 }
    }

    /// Always returns the same value
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }

    /// Number of values drawn so far
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for SequenceRandom {
    fn next_f32(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_cycles() {
        let mut rng = SequenceRandom::new(vec![0.1, 0.9]);
        assert_eq!(rng.next_f32(), 0.1);
        assert_eq!(rng.next_f32(), 0.9);
        assert_eq!(rng.next_f32(), 0.1);
        assert_eq!(rng.draws(), 3);
    }

    #[test]
    fn test_pcg_in_unit_range() {
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..1000 {
            let v = rng.next_f32();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = entropy_rng();
        assert!(!rng.chance(0.0));
        assert!(rng.chance(1.0));
    }
}
