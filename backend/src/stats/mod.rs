//! Statistics engine
//!
//! Pure functions over immutable outcome samples:
//! - [`SummaryStat`]: mean, standard deviation, t-based and percentile
//!   intervals for one sample
//! - [`DifferenceStatIndp`]: mean difference of two independent samples
//!   with a Welch standard error and t-based interval
//!
//! Significance levels are two-sided: `alpha = 0.05` gives a 95% interval.

pub mod difference;
pub mod distribution;
pub mod sample;
pub mod summary;

pub use difference::DifferenceStatIndp;
pub use sample::OutcomeSample;
pub use summary::{ConfidenceInterval, SummaryStat};

use thiserror::Error;

/// Smallest sample accepted by the t-based statistics
pub const MIN_OBSERVATIONS: usize = 2;

/// Default two-sided significance level
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Errors raised by the statistics engine
#[derive(Debug, Error, PartialEq)]
pub enum StatsError {
    #[error("Sample '{name}' has {actual} observation(s), at least {required} required")]
    InsufficientObservations {
        name: String,
        required: usize,
        actual: usize,
    },

    #[error("Sample '{name}' has a non-finite value at index {index}")]
    NonFiniteValue { name: String, index: usize },

    #[error("Significance level must be in (0, 1), got {0}")]
    InvalidSignificance(f64),
}

/// Reject significance levels outside the open unit interval
pub fn validate_alpha(alpha: f64) -> Result<(), StatsError> {
    if alpha.is_finite() && alpha > 0.0 && alpha < 1.0 {
        Ok(())
    } else {
        Err(StatsError::InvalidSignificance(alpha))
    }
}

/// Check the sample size and finiteness shared by every statistic
pub(crate) fn validate_data(name: &str, data: &[f64]) -> Result<(), StatsError> {
    if data.len() < MIN_OBSERVATIONS {
        return Err(StatsError::InsufficientObservations {
            name: name.to_string(),
            required: MIN_OBSERVATIONS,
            actual: data.len(),
        });
    }
    if let Some(index) = data.iter().position(|v| !v.is_finite()) {
        return Err(StatsError::NonFiniteValue {
            name: name.to_string(),
            index,
        });
    }
    Ok(())
}

/// Arithmetic mean; `data` must be non-empty
pub(crate) fn mean(data: &[f64]) -> f64 {
    data.iter().sum::<f64>() / data.len() as f64
}

/// Sample variance with `n - 1` in the denominator; `data.len() >= 2`
pub(crate) fn sample_variance(data: &[f64], mean: f64) -> f64 {
    let sum_sq: f64 = data.iter().map(|x| (x - mean) * (x - mean)).sum();
    sum_sq / (data.len() - 1) as f64
}
