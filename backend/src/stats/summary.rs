//! Summary statistics of a single sample

use serde::{Deserialize, Serialize};

use super::distribution::t_quantile;
use super::sample::OutcomeSample;
use super::{mean, sample_variance, validate_alpha, validate_data, StatsError};

/// Closed interval `[lower, upper]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Interval `center ± half_length`
    pub fn centered(center: f64, half_length: f64) -> Self {
        Self {
            lower: center - half_length,
            upper: center + half_length,
        }
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// Mean, spread and intervals of one sample
///
/// # Example
/// ```
/// use cohort_simulator_core_rs::stats::SummaryStat;
///
/// let stat = SummaryStat::new("survival", &[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
/// assert_eq!(stat.mean(), 3.0);
///
/// let ci = stat.t_ci(0.05).unwrap();
/// assert!(ci.contains(3.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStat {
    name: String,
    sorted: Vec<f64>,
    mean: f64,
    stdev: f64,
}

impl SummaryStat {
    /// # Errors
    /// `InsufficientObservations` for fewer than two values, `NonFiniteValue`
    /// for NaN or infinite values
    pub fn new(name: impl Into<String>, data: &[f64]) -> Result<Self, StatsError> {
        let name = name.into();
        validate_data(&name, data)?;

        let mean = mean(data);
        let stdev = sample_variance(data, mean).sqrt();

        let mut sorted = data.to_vec();
        sorted.sort_by(f64::total_cmp);

        Ok(Self {
            name,
            sorted,
            mean,
            stdev,
        })
    }

    pub fn from_sample(sample: &OutcomeSample) -> Result<Self, StatsError> {
        Self::new(sample.name(), sample.values())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn n(&self) -> usize {
        self.sorted.len()
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sample standard deviation (`n - 1` denominator)
    pub fn stdev(&self) -> f64 {
        self.stdev
    }

    /// Standard error of the mean
    pub fn std_err(&self) -> f64 {
        self.stdev / (self.n() as f64).sqrt()
    }

    pub fn min(&self) -> f64 {
        self.sorted[0]
    }

    pub fn max(&self) -> f64 {
        self.sorted[self.sorted.len() - 1]
    }

    /// Half-length of the two-sided t interval, `n - 1` degrees of freedom
    pub fn t_half_length(&self, alpha: f64) -> Result<f64, StatsError> {
        validate_alpha(alpha)?;
        let df = (self.n() - 1) as f64;
        Ok(t_quantile(1.0 - alpha / 2.0, df) * self.std_err())
    }

    /// Two-sided `1 - alpha` t confidence interval for the mean
    pub fn t_ci(&self, alpha: f64) -> Result<ConfidenceInterval, StatsError> {
        let half = self.t_half_length(alpha)?;
        Ok(ConfidenceInterval::centered(self.mean, half))
    }

    /// Percentile interval `[q(alpha/2), q(1 - alpha/2)]` of the data
    ///
    /// Percentiles interpolate linearly between order statistics.
    pub fn percentile_interval(&self, alpha: f64) -> Result<ConfidenceInterval, StatsError> {
        validate_alpha(alpha)?;
        Ok(ConfidenceInterval::new(
            self.percentile(alpha / 2.0),
            self.percentile(1.0 - alpha / 2.0),
        ))
    }

    /// Value at quantile `q` in `[0, 1]`
    pub fn percentile(&self, q: f64) -> f64 {
        let q = q.clamp(0.0, 1.0);
        let position = q * (self.n() - 1) as f64;
        let below = position.floor() as usize;
        let above = position.ceil() as usize;
        let fraction = position - below as f64;
        self.sorted[below] + fraction * (self.sorted[above] - self.sorted[below])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_to_five() {
        let stat = SummaryStat::new("x", &[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(stat.mean(), 3.0);
        assert_eq!(stat.stdev(), 2.5_f64.sqrt());
        assert_eq!(stat.min(), 1.0);
        assert_eq!(stat.max(), 5.0);
    }

    #[test]
    fn test_t_ci_symmetric_around_mean() {
        let stat = SummaryStat::new("x", &[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let ci = stat.t_ci(0.05).unwrap();
        assert!(((ci.upper - stat.mean()) - (stat.mean() - ci.lower)).abs() < 1e-12);
        // t(0.975, 4) * sqrt(2.5 / 5)
        let expected_half = 2.776_445_105_197_799 * 0.5_f64.sqrt();
        assert!((ci.width() / 2.0 - expected_half).abs() < 1e-8);
    }

    #[test]
    fn test_invalid_alpha() {
        let stat = SummaryStat::new("x", &[1.0, 2.0]).unwrap();
        assert_eq!(stat.t_ci(1.5), Err(StatsError::InvalidSignificance(1.5)));
        assert!(stat.percentile_interval(0.0).is_err());
    }

    #[test]
    fn test_percentiles_interpolate() {
        let stat = SummaryStat::new("x", &[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(stat.percentile(0.0), 1.0);
        assert_eq!(stat.percentile(1.0), 4.0);
        assert_eq!(stat.percentile(0.5), 2.5);

        let pi = stat.percentile_interval(0.5).unwrap();
        assert_eq!(pi.lower, 1.75);
        assert_eq!(pi.upper, 3.25);
    }

    #[test]
    fn test_empty_and_single_rejected() {
        assert!(SummaryStat::new("x", &[]).is_err());
        assert!(SummaryStat::new("x", &[7.0]).is_err());
    }

    #[test]
    fn test_nan_rejected() {
        assert_eq!(
            SummaryStat::new("cost", &[1.0, f64::NAN]),
            Err(StatsError::NonFiniteValue {
                name: "cost".to_string(),
                index: 1
            })
        );
    }
}
