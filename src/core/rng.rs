//! Deterministic random number generation for search and self-play.
//!
//! Every stochastic decision in the crate (move sampling, Dirichlet
//! exploration noise, replay batch sampling) draws from a `GameRng`, so a
//! fixed seed reproduces a whole game.
//!
//! ```
//! use gomoku_zero::core::GameRng;
//!
//! let mut rng = GameRng::new(42);
//! let mut replay = GameRng::new(42);
//! assert_eq!(rng.choose_weighted(&[0.2, 0.8]), replay.choose_weighted(&[0.2, 0.8]));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Gamma};

/// Deterministic RNG backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Generate a random usize in the given range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Generate a uniform float in `[0, 1)`.
    pub fn gen_unit(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Choose an index with probability proportional to its weight.
    ///
    /// Weights do not need to sum to 1.0. Returns `None` if the weights are
    /// empty or have no positive mass.
    pub fn choose_weighted(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
        if total <= 0.0 {
            return None;
        }

        let mut threshold = self.gen_unit() * total;
        for (i, &weight) in weights.iter().enumerate() {
            if weight <= 0.0 {
                continue;
            }
            threshold -= weight;
            if threshold < 0.0 {
                return Some(i);
            }
        }

        // Rounding left a sliver of mass; take the last positive weight.
        weights.iter().rposition(|w| *w > 0.0)
    }

    /// Sample a symmetric Dirichlet vector of length `n` with concentration
    /// `alpha`, via normalised Gamma variates.
    ///
    /// Returns an empty vector for `n == 0` and a uniform vector if `alpha`
    /// is not a valid Gamma shape.
    pub fn dirichlet(&mut self, n: usize, alpha: f64) -> Vec<f64> {
        if n == 0 {
            return Vec::new();
        }
        let uniform = vec![1.0 / n as f64; n];
        let Ok(gamma) = Gamma::new(alpha, 1.0) else {
            return uniform;
        };

        let mut samples: Vec<f64> = (0..n).map(|_| gamma.sample(&mut self.inner)).collect();
        let sum: f64 = samples.iter().sum();
        if sum <= 0.0 || !sum.is_finite() {
            return uniform;
        }
        for s in &mut samples {
            *s /= sum;
        }
        samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.gen_range_usize(0..1000), rng2.gen_range_usize(0..1000));
        }
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = GameRng::new(1);
        let mut rng2 = GameRng::new(2);

        let seq1: Vec<_> = (0..10).map(|_| rng1.gen_range_usize(0..1000)).collect();
        let seq2: Vec<_> = (0..10).map(|_| rng2.gen_range_usize(0..1000)).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_choose_weighted() {
        let mut rng = GameRng::new(42);

        let weights = vec![0.0, 100.0, 0.0];
        for _ in 0..10 {
            assert_eq!(rng.choose_weighted(&weights), Some(1));
        }

        assert_eq!(rng.choose_weighted(&[]), None);
        assert_eq!(rng.choose_weighted(&[0.0, 0.0]), None);
    }

    #[test]
    fn test_choose_weighted_never_picks_zero_weight() {
        let mut rng = GameRng::new(7);
        let weights = vec![0.5, 0.0, 0.5];
        for _ in 0..200 {
            assert_ne!(rng.choose_weighted(&weights), Some(1));
        }
    }

    #[test]
    fn test_dirichlet_is_a_distribution() {
        let mut rng = GameRng::new(3);
        let noise = rng.dirichlet(20, 0.3);

        assert_eq!(noise.len(), 20);
        assert!(noise.iter().all(|p| *p >= 0.0));
        assert!((noise.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_dirichlet_edge_cases() {
        let mut rng = GameRng::new(3);
        assert!(rng.dirichlet(0, 0.3).is_empty());
        assert_eq!(rng.dirichlet(1, 0.3), vec![1.0]);
        assert_eq!(rng.dirichlet(2, -1.0), vec![0.5, 0.5]);
    }
}
