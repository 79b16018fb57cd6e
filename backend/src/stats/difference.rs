//! Difference of means between two independent samples
//!
//! Welch's formulation: variances are not pooled and sample sizes may
//! differ.
//!
//! ```text
//! d   = mean(x) - mean(y_ref)
//! se² = s_x² / n + s_y² / m
//! ν   = se⁴ / ((s_x² / n)² / (n - 1) + (s_y² / m)² / (m - 1))
//! CI  = d ± t(1 - alpha/2, ν) · se
//! ```
//!
//! When both samples have zero variance, `se = 0`, `ν` is undefined and the
//! interval collapses to `[d, d]`.

use super::distribution::t_quantile;
use super::sample::OutcomeSample;
use super::summary::ConfidenceInterval;
use super::{mean, sample_variance, validate_alpha, validate_data, StatsError};

/// Independent two-sample difference statistic
///
/// # Example
/// ```
/// use cohort_simulator_core_rs::stats::DifferenceStatIndp;
///
/// let diff = DifferenceStatIndp::new("increase", &[10.0, 10.0, 10.0], &[5.0, 5.0, 5.0]).unwrap();
/// assert_eq!(diff.mean(), 5.0);
/// assert_eq!(diff.std_err(), 0.0);
///
/// let ci = diff.t_ci(0.05).unwrap();
/// assert_eq!((ci.lower, ci.upper), (5.0, 5.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DifferenceStatIndp {
    name: String,
    n: usize,
    m: usize,
    mean: f64,
    /// s_x² / n
    scaled_var_x: f64,
    /// s_y² / m
    scaled_var_y: f64,
}

impl DifferenceStatIndp {
    /// `x` is the treatment sample, `y_ref` the reference
    ///
    /// # Errors
    /// Either sample with fewer than two values, or containing a non-finite
    /// value.
    pub fn new(name: impl Into<String>, x: &[f64], y_ref: &[f64]) -> Result<Self, StatsError> {
        let name = name.into();
        validate_data(&format!("{} (x)", name), x)?;
        validate_data(&format!("{} (y_ref)", name), y_ref)?;

        let mean_x = mean(x);
        let mean_y = mean(y_ref);
        let n = x.len();
        let m = y_ref.len();

        Ok(Self {
            name,
            n,
            m,
            mean: mean_x - mean_y,
            scaled_var_x: sample_variance(x, mean_x) / n as f64,
            scaled_var_y: sample_variance(y_ref, mean_y) / m as f64,
        })
    }

    pub fn between(
        name: impl Into<String>,
        x: &OutcomeSample,
        y_ref: &OutcomeSample,
    ) -> Result<Self, StatsError> {
        Self::new(name, x.values(), y_ref.values())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `mean(x) - mean(y_ref)`
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Welch standard error of the difference
    pub fn std_err(&self) -> f64 {
        (self.scaled_var_x + self.scaled_var_y).sqrt()
    }

    /// Welch–Satterthwaite degrees of freedom, `None` if both variances are 0
    pub fn welch_df(&self) -> Option<f64> {
        let total = self.scaled_var_x + self.scaled_var_y;
        if total == 0.0 {
            return None;
        }
        let denominator = self.scaled_var_x.powi(2) / (self.n - 1) as f64
            + self.scaled_var_y.powi(2) / (self.m - 1) as f64;
        Some(total.powi(2) / denominator)
    }

    /// Half-length of the two-sided t interval
    pub fn t_half_length(&self, alpha: f64) -> Result<f64, StatsError> {
        validate_alpha(alpha)?;
        Ok(match self.welch_df() {
            Some(df) => t_quantile(1.0 - alpha / 2.0, df) * self.std_err(),
            None => 0.0,
        })
    }

    /// Two-sided `1 - alpha` t confidence interval for the difference
    pub fn t_ci(&self, alpha: f64) -> Result<ConfidenceInterval, StatsError> {
        let half = self.t_half_length(alpha)?;
        Ok(ConfidenceInterval::centered(self.mean, half))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_sizes_welch_df() {
        // Equal n and variances: ν = 2(n - 1)
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 3.0, 4.0, 5.0];
        let diff = DifferenceStatIndp::new("d", &x, &y).unwrap();
        assert_eq!(diff.mean(), -1.0);
        assert!((diff.welch_df().unwrap() - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_one_constant_sample() {
        // Only y contributes: ν = m - 1
        let x = [3.0, 3.0, 3.0];
        let y = [1.0, 2.0, 3.0, 4.0, 5.0];
        let diff = DifferenceStatIndp::new("d", &x, &y).unwrap();
        assert!((diff.welch_df().unwrap() - 4.0).abs() < 1e-12);
        assert!((diff.std_err() - (2.5_f64 / 5.0).sqrt()).abs() < 1e-15);
    }

    #[test]
    fn test_unequal_lengths() {
        let x = [10.0, 12.0, 14.0];
        let y = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let diff = DifferenceStatIndp::new("d", &x, &y).unwrap();
        assert_eq!(diff.mean(), 8.5);
        let ci = diff.t_ci(0.05).unwrap();
        assert!(ci.contains(8.5));
        assert!(ci.lower > 0.0);
    }

    #[test]
    fn test_short_reference_rejected() {
        let err = DifferenceStatIndp::new("d", &[1.0, 2.0], &[1.0]).unwrap_err();
        assert!(matches!(
            err,
            StatsError::InsufficientObservations { actual: 1, .. }
        ));
    }
}
