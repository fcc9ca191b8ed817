// src/rng.rs
//! Random Number Generation for the Wheel Simulation
//!
//! # Design Philosophy
//!
//! Monte Carlo simulations require random numbers with specific properties:
//! 1. **Reproducibility**: Same seed → same price grid → same trade counters
//! 2. **Parallel safety**: Different paths must have independent streams
//! 3. **Statistical quality**: Good distributional properties for the
//!    normal increments feeding the GBM price process
//!
//! # Per-Path Sub-Streams
//!
//! Each trading path gets its own generator seeded as `base_seed + path_id`.
//! The draws of a path therefore never depend on how rayon schedules the
//! rows across threads: the grid is identical for one thread or sixty-four.
//! Bit-for-bit parity with any other implementation's RNG is out of scope;
//! only the distributional properties are contractual.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

/// RNG factory handing out one deterministic sub-stream per path
pub struct RngFactory {
    base_seed: u64,
}

impl RngFactory {
    pub fn new(base_seed: u64) -> Self {
        Self { base_seed }
    }

    /// Create the generator for a specific path
    pub fn create_std_rng(&self, path_id: u64) -> StdRng {
        StdRng::seed_from_u64(self.base_seed.wrapping_add(path_id))
    }
}

pub fn seed_rng_from_u64(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn get_normal_draw<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    StandardNormal.sample(rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_stream_reproducibility() {
        let factory = RngFactory::new(42);

        let mut rng1 = factory.create_std_rng(7);
        let mut rng2 = factory.create_std_rng(7);

        for _ in 0..100 {
            assert_eq!(get_normal_draw(&mut rng1), get_normal_draw(&mut rng2));
        }
    }

    #[test]
    fn test_sub_streams_differ_across_paths() {
        let factory = RngFactory::new(42);

        let mut rng1 = factory.create_std_rng(0);
        let mut rng2 = factory.create_std_rng(1);

        let vals1: Vec<f64> = (0..10).map(|_| get_normal_draw(&mut rng1)).collect();
        let vals2: Vec<f64> = (0..10).map(|_| get_normal_draw(&mut rng2)).collect();

        assert_ne!(vals1, vals2);
    }

    #[test]
    fn test_normal_distribution_moments() {
        let factory = RngFactory::new(42);
        let mut rng = factory.create_std_rng(0);

        let samples: Vec<f64> = (0..10000).map(|_| get_normal_draw(&mut rng)).collect();

        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        let variance =
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / samples.len() as f64;

        assert!(mean.abs() < 0.05, "Mean should be close to 0, got {}", mean);
        assert!(
            (variance - 1.0).abs() < 0.05,
            "Variance should be close to 1, got {}",
            variance
        );
    }
}
