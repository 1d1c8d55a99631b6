//! Synthetic regression data for exercising the compression pipeline.
//!
//! Draws integer-valued predictors and a Gaussian-noised linear outcome. The
//! "true" model parameters are explicit configuration rather than process-wide
//! constants, so tests can vary them freely; the defaults reproduce the
//! reference simulation (intercept 0.3, coefficients [1, 2, -1], sigma 0.5).
//!
//! Predictors are drawn from a small set of integer levels on purpose: with
//! `n_feature_levels` levels and K predictors there are only `levels^K`
//! possible rows, so any reasonably sized sample contains repeats and the
//! compressor has something to do.

use crate::error::{CondensarError, Result};
use crate::primitives::{Matrix, Vector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

/// Configuration for the synthetic regression sampler.
///
/// # Examples
///
/// ```
/// use condensar::synthetic::RegressionDataConfig;
///
/// let config = RegressionDataConfig::new()
///     .with_coefficients(vec![0.5, -2.0])
///     .with_noise_sigma(0.1)
///     .with_seed(42);
///
/// let (x, y) = config.generate(100).unwrap();
/// assert_eq!(x.shape(), (100, 2));
/// assert_eq!(y.len(), 100);
/// ```
#[derive(Debug, Clone)]
pub struct RegressionDataConfig {
    intercept: f64,
    coefficients: Vec<f64>,
    noise_sigma: f64,
    n_feature_levels: u32,
    seed: Option<u64>,
}

impl Default for RegressionDataConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RegressionDataConfig {
    /// Creates a config with the reference simulation parameters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            intercept: 0.3,
            coefficients: vec![1.0, 2.0, -1.0],
            noise_sigma: 0.5,
            n_feature_levels: 3,
            seed: None,
        }
    }

    /// Sets the true intercept.
    #[must_use]
    pub fn with_intercept(mut self, intercept: f64) -> Self {
        self.intercept = intercept;
        self
    }

    /// Sets the true coefficient vector; its length fixes the number of
    /// predictors.
    #[must_use]
    pub fn with_coefficients(mut self, coefficients: Vec<f64>) -> Self {
        self.coefficients = coefficients;
        self
    }

    /// Sets the standard deviation of the Gaussian outcome noise.
    #[must_use]
    pub fn with_noise_sigma(mut self, noise_sigma: f64) -> Self {
        self.noise_sigma = noise_sigma;
        self
    }

    /// Sets how many distinct integer levels each predictor takes.
    #[must_use]
    pub fn with_feature_levels(mut self, n_feature_levels: u32) -> Self {
        self.n_feature_levels = n_feature_levels;
        self
    }

    /// Sets the RNG seed for reproducible draws.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of predictors implied by the coefficient vector.
    #[must_use]
    pub fn n_predictors(&self) -> usize {
        self.coefficients.len()
    }

    /// Draws `n_samples` observations: predictors uniform over
    /// `0..n_feature_levels` (cast to f64), outcome
    /// `intercept + X·beta + Normal(0, sigma)`.
    ///
    /// # Errors
    ///
    /// Returns [`CondensarError::InvalidParameter`] if the coefficient vector
    /// is empty, `n_feature_levels` is zero, or `noise_sigma` is negative or
    /// non-finite.
    pub fn generate(&self, n_samples: usize) -> Result<(Matrix<f64>, Vector<f64>)> {
        self.validate()?;

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let k = self.coefficients.len();
        let mut x_data = Vec::with_capacity(n_samples * k);
        let mut y_data = Vec::with_capacity(n_samples);

        for _ in 0..n_samples {
            let mut linear = self.intercept;
            for &beta in &self.coefficients {
                let value = f64::from(rng.gen_range(0..self.n_feature_levels));
                x_data.push(value);
                linear += beta * value;
            }
            y_data.push(linear + self.noise_sigma * randn(&mut rng));
        }

        let x = Matrix::from_vec(n_samples, k, x_data)?;
        Ok((x, Vector::from_vec(y_data)))
    }

    fn validate(&self) -> Result<()> {
        if self.coefficients.is_empty() {
            return Err(CondensarError::InvalidParameter {
                param: "coefficients".to_string(),
                value: "[]".to_string(),
                constraint: "at least one coefficient".to_string(),
            });
        }
        if self.n_feature_levels == 0 {
            return Err(CondensarError::InvalidParameter {
                param: "n_feature_levels".to_string(),
                value: "0".to_string(),
                constraint: "levels >= 1".to_string(),
            });
        }
        if !self.noise_sigma.is_finite() || self.noise_sigma < 0.0 {
            return Err(CondensarError::InvalidParameter {
                param: "noise_sigma".to_string(),
                value: format!("{}", self.noise_sigma),
                constraint: "finite sigma >= 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Sample standard normal using the Box-Muller transform.
fn randn(rng: &mut impl Rng) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(1e-10);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shapes() {
        let (x, y) = RegressionDataConfig::new().with_seed(1).generate(50).unwrap();
        assert_eq!(x.shape(), (50, 3));
        assert_eq!(y.len(), 50);
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let config = RegressionDataConfig::new().with_seed(7);
        let (x1, y1) = config.generate(20).unwrap();
        let (x2, y2) = config.generate(20).unwrap();
        assert_eq!(x1, x2);
        assert_eq!(y1, y2);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = RegressionDataConfig::new().with_seed(1).generate(20).unwrap();
        let b = RegressionDataConfig::new().with_seed(2).generate(20).unwrap();
        assert_ne!(a.1, b.1);
    }

    #[test]
    fn test_predictors_are_integer_levels() {
        let (x, _) = RegressionDataConfig::new()
            .with_feature_levels(4)
            .with_seed(3)
            .generate(100)
            .unwrap();

        for &v in x.as_slice() {
            assert_eq!(v, v.trunc());
            assert!((0.0..4.0).contains(&v));
        }
    }

    #[test]
    fn test_noiseless_outcome_is_exactly_linear() {
        let config = RegressionDataConfig::new()
            .with_intercept(1.0)
            .with_coefficients(vec![2.0, -3.0])
            .with_noise_sigma(0.0)
            .with_seed(5);
        let (x, y) = config.generate(30).unwrap();

        for i in 0..30 {
            let expected = 1.0 + 2.0 * x.get(i, 0) - 3.0 * x.get(i, 1);
            assert!((y[i] - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_single_feature_level_collapses_rows() {
        // One level means every predictor row is identical.
        let (x, _) = RegressionDataConfig::new()
            .with_feature_levels(1)
            .with_seed(9)
            .generate(10)
            .unwrap();
        assert!(x.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_empty_coefficients_rejected() {
        let result = RegressionDataConfig::new()
            .with_coefficients(vec![])
            .generate(10);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_levels_rejected() {
        let result = RegressionDataConfig::new()
            .with_feature_levels(0)
            .generate(10);
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_sigma_rejected() {
        let result = RegressionDataConfig::new()
            .with_noise_sigma(-0.5)
            .generate(10);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_samples() {
        let (x, y) = RegressionDataConfig::new().with_seed(1).generate(0).unwrap();
        assert_eq!(x.n_rows(), 0);
        assert!(y.is_empty());
    }
}
