//! Empirical (categorical) distribution
//!
//! Inverse-CDF sampling over a fixed probability vector: one uniform draw
//! `u`, then the smallest index `i` with `u < C[i]` where `C` is the
//! cumulative sum. A draw exactly equal to `C[i]` therefore resolves to the
//! next index.
//!
//! Probability vectors are validated when the distribution is built and are
//! never renormalized.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rng::UniformSource;

/// Maximum allowed distance between a probability vector's sum and 1.0
pub const PROBABILITY_SUM_TOLERANCE: f64 = 1e-6;

/// Errors raised while building an empirical distribution
#[derive(Debug, Error, PartialEq)]
pub enum SamplingError {
    #[error("Probability vector is empty")]
    Empty,

    #[error("Probability at index {index} is invalid: {value}")]
    InvalidProbability { index: usize, value: f64 },

    #[error("Probabilities sum to {sum}, expected 1.0 (tolerance {tolerance})")]
    BadSum { sum: f64, tolerance: f64 },
}

/// Categorical distribution over `0..len()`
///
/// # Example
/// ```
/// use cohort_simulator_core_rs::sampling::EmpiricalDistribution;
/// use cohort_simulator_core_rs::RngManager;
///
/// let dist = EmpiricalDistribution::new(vec![0.25, 0.75]).unwrap();
/// let mut rng = RngManager::new(42);
/// let index = dist.sample(&mut rng);
/// assert!(index < 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct EmpiricalDistribution {
    probabilities: Vec<f64>,

    /// Running sum of `probabilities`
    cumulative: Vec<f64>,

    /// Largest index with non-zero mass; absorbs draws that fall past the
    /// final cumulative value because of rounding
    last_supported: usize,
}

impl EmpiricalDistribution {
    /// Build a distribution, rejecting vectors that are not valid probabilities
    ///
    /// # Errors
    /// - `Empty` for a zero-length vector
    /// - `InvalidProbability` for a negative or non-finite entry
    /// - `BadSum` when the entries do not sum to 1 within
    ///   [`PROBABILITY_SUM_TOLERANCE`]
    pub fn new(probabilities: Vec<f64>) -> Result<Self, SamplingError> {
        if probabilities.is_empty() {
            return Err(SamplingError::Empty);
        }

        for (index, &value) in probabilities.iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(SamplingError::InvalidProbability { index, value });
            }
        }

        let cumulative: Vec<f64> = probabilities
            .iter()
            .scan(0.0, |acc, &p| {
                *acc += p;
                Some(*acc)
            })
            .collect();

        let sum = cumulative[cumulative.len() - 1];
        if (sum - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
            return Err(SamplingError::BadSum {
                sum,
                tolerance: PROBABILITY_SUM_TOLERANCE,
            });
        }

        let last_supported = probabilities
            .iter()
            .rposition(|&p| p > 0.0)
            .unwrap_or(probabilities.len() - 1);

        Ok(Self {
            probabilities,
            cumulative,
            last_supported,
        })
    }

    /// Number of categories
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    /// Always false: construction rejects empty vectors
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// The probability vector as given
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Cumulative probabilities `C[i] = p[0] + ... + p[i]`
    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    /// Draw one index using exactly one uniform variate
    pub fn sample<R: UniformSource + ?Sized>(&self, rng: &mut R) -> usize {
        self.index_for(rng.next_f64())
    }

    /// Map a uniform variate to its category
    ///
    /// Returns the smallest `i` with `u < C[i]`.
    pub fn index_for(&self, u: f64) -> usize {
        let index = self.cumulative.partition_point(|&c| c <= u);
        index.min(self.last_supported)
    }
}

impl TryFrom<Vec<f64>> for EmpiricalDistribution {
    type Error = SamplingError;

    fn try_from(probabilities: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(probabilities)
    }
}

impl From<EmpiricalDistribution> for Vec<f64> {
    fn from(dist: EmpiricalDistribution) -> Self {
        dist.probabilities
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_vector() {
        assert_eq!(EmpiricalDistribution::new(vec![]), Err(SamplingError::Empty));
    }

    #[test]
    fn test_rejects_negative_entry() {
        let err = EmpiricalDistribution::new(vec![1.2, -0.2]).unwrap_err();
        assert_eq!(
            err,
            SamplingError::InvalidProbability {
                index: 1,
                value: -0.2
            }
        );
    }

    #[test]
    fn test_rejects_nan_entry() {
        let err = EmpiricalDistribution::new(vec![f64::NAN, 1.0]).unwrap_err();
        assert!(matches!(
            err,
            SamplingError::InvalidProbability { index: 0, .. }
        ));
    }

    #[test]
    fn test_rejects_bad_sum_without_renormalizing() {
        let err = EmpiricalDistribution::new(vec![0.5, 0.4]).unwrap_err();
        assert!(matches!(err, SamplingError::BadSum { .. }));
    }

    #[test]
    fn test_accepts_sum_within_tolerance() {
        assert!(EmpiricalDistribution::new(vec![0.5, 0.5 + 5e-7]).is_ok());
    }

    #[test]
    fn test_tie_resolves_to_next_index() {
        let dist = EmpiricalDistribution::new(vec![0.25, 0.25, 0.5]).unwrap();
        assert_eq!(dist.index_for(0.0), 0);
        assert_eq!(dist.index_for(0.2499), 0);
        assert_eq!(dist.index_for(0.25), 1);
        assert_eq!(dist.index_for(0.5), 2);
        assert_eq!(dist.index_for(0.9999), 2);
    }

    #[test]
    fn test_zero_mass_categories_never_chosen() {
        let dist = EmpiricalDistribution::new(vec![0.0, 1.0, 0.0]).unwrap();
        for u in [0.0, 0.3, 0.999_999_999] {
            assert_eq!(dist.index_for(u), 1);
        }
    }

    #[test]
    fn test_draw_past_rounded_total_goes_to_last_supported() {
        let dist = EmpiricalDistribution::new(vec![0.3, 0.6999995, 0.0]).unwrap();
        assert_eq!(dist.index_for(0.9999999), 1);
    }

    #[test]
    fn test_serde_rejects_invalid_vector() {
        let result: Result<EmpiricalDistribution, _> = serde_json::from_str("[0.2, 0.2]");
        assert!(result.is_err());

        let dist: EmpiricalDistribution = serde_json::from_str("[0.2, 0.8]").unwrap();
        assert_eq!(dist.probabilities(), &[0.2, 0.8]);
    }
}
