//! Gaussian sampling behind a trait so the synthesizer can be driven by a
//! seeded generator, the OS entropy pool, or a scripted source in tests.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::error::AppError;

/// A source of independent normally distributed draws.
pub trait GaussianSource {
    /// Return exactly `count` draws from `N(mean, std_dev²)`.
    fn draw(&mut self, mean: f64, std_dev: f64, count: usize) -> Result<Vec<f64>, AppError>;
}

/// `GaussianSource` backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngGaussian<R> {
    rng: R,
}

impl<R: Rng> RngGaussian<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngGaussian<StdRng> {
    /// Reproducible draws for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Non-reproducible draws seeded from the OS.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> GaussianSource for RngGaussian<R> {
    fn draw(&mut self, mean: f64, std_dev: f64, count: usize) -> Result<Vec<f64>, AppError> {
        let normal = Normal::new(mean, std_dev).map_err(|e| {
            AppError::invariant(format!(
                "Invalid Gaussian parameters (mean={mean}, std={std_dev}): {e}"
            ))
        })?;
        Ok((0..count).map(|_| normal.sample(&mut self.rng)).collect())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_draws_are_reproducible() {
        let a = RngGaussian::seeded(42).draw(100.0, 10.0, 16).unwrap();
        let b = RngGaussian::seeded(42).draw(100.0, 10.0, 16).unwrap();
        let c = RngGaussian::seeded(43).draw(100.0, 10.0, 16).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 16);
    }

    #[test]
    fn draws_center_on_mean() {
        let draws = RngGaussian::seeded(1).draw(50.0, 5.0, 4000).unwrap();
        let mean = draws.iter().sum::<f64>() / draws.len() as f64;
        assert!((mean - 50.0).abs() < 0.5, "sample mean {mean}");
    }

    #[test]
    fn zero_std_dev_is_degenerate_not_an_error() {
        let draws = RngGaussian::seeded(3).draw(0.0, 0.0, 6).unwrap();
        assert!(draws.iter().all(|d| *d == 0.0));
    }

    #[test]
    fn invalid_parameters_are_invariant_errors() {
        let err = RngGaussian::seeded(3).draw(1.0, f64::NAN, 1).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INVARIANT);
    }
}
