//! Injectable score-variance noise.
//!
//! The engine models game-to-game variance as zero-mean Gaussian noise on
//! each expected score. The source is a trait so tests can inject a silent
//! one, and every production source is seeded: the same game always draws
//! the same noise, which keeps published predictions reproducible.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of zero-mean noise samples.
pub trait ScoreNoise: Send {
    /// One draw from N(0, std_dev²).
    fn sample(&mut self, std_dev: f64) -> f64;
}

/// Seeded Gaussian source backed by a `StdRng`.
pub struct GaussianNoise {
    rng: StdRng,
}

impl GaussianNoise {
    pub fn seeded(seed: u64) -> Self {
        GaussianNoise {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Derive the seed from a game ID (plus a deployment-level salt), so
    /// repeated requests for the same game reproduce the same prediction.
    pub fn for_game(game_id: &str, salt: u64) -> Self {
        // DefaultHasher::new() uses fixed keys, so this is stable across runs.
        let mut hasher = DefaultHasher::new();
        game_id.hash(&mut hasher);
        salt.hash(&mut hasher);
        Self::seeded(hasher.finish())
    }
}

impl ScoreNoise for GaussianNoise {
    fn sample(&mut self, std_dev: f64) -> f64 {
        // Box-Muller transform over two uniform draws.
        let u1: f64 = self.rng.gen::<f64>().max(1e-10);
        let u2: f64 = self.rng.gen();
        std_dev * (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }
}

/// Always returns zero. Pins expected values exactly in engine tests.
#[cfg(test)]
pub struct ZeroNoise;

#[cfg(test)]
impl ScoreNoise for ZeroNoise {
    fn sample(&mut self, _std_dev: f64) -> f64 {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_draws() {
        let mut a = GaussianNoise::seeded(42);
        let mut b = GaussianNoise::seeded(42);
        for _ in 0..32 {
            assert_eq!(a.sample(3.0), b.sample(3.0));
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = GaussianNoise::seeded(1);
        let mut b = GaussianNoise::seeded(2);
        let draws_a: Vec<f64> = (0..8).map(|_| a.sample(3.0)).collect();
        let draws_b: Vec<f64> = (0..8).map(|_| b.sample(3.0)).collect();
        assert_ne!(draws_a, draws_b);
    }

    #[test]
    fn per_game_seeding_is_stable_and_game_specific() {
        let mut a = GaussianNoise::for_game("20250904_DAL@PHI", 0);
        let mut b = GaussianNoise::for_game("20250904_DAL@PHI", 0);
        let mut c = GaussianNoise::for_game("20250907_KC@LAC", 0);
        let first_a = a.sample(3.0);
        assert_eq!(first_a, b.sample(3.0));
        assert_ne!(first_a, c.sample(3.0));

        // A different salt re-rolls the same game.
        let mut d = GaussianNoise::for_game("20250904_DAL@PHI", 7);
        assert_ne!(first_a, d.sample(3.0));
    }

    #[test]
    fn samples_look_like_the_requested_distribution() {
        let mut src = GaussianNoise::seeded(1234);
        let n = 20_000;
        let draws: Vec<f64> = (0..n).map(|_| src.sample(3.0)).collect();
        let mean = draws.iter().sum::<f64>() / n as f64;
        let var = draws.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / n as f64;
        assert!(mean.abs() < 0.1, "mean drifted: {mean}");
        assert!((var.sqrt() - 3.0).abs() < 0.1, "std off target: {}", var.sqrt());
    }
}
