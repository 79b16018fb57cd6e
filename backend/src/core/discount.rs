//! Present-value discounting
//!
//! A reward `x` received at the end of period `t` is worth
//! `x / (1 + r)^t` today. The patient simulator credits the reward for cycle
//! `k` at `t = k + 1`.

use serde::{Deserialize, Serialize};

use crate::models::ModelError;

/// Discount `amount` received at the end of period `period` back to time 0
///
/// # Example
/// ```
/// use cohort_simulator_core_rs::core::discount::pv;
///
/// assert_eq!(pv(103.0, 0.03, 1), 103.0 / (1.0 + 0.03));
/// assert_eq!(pv(50.0, 0.0, 10), 50.0);
/// ```
pub fn pv(amount: f64, rate: f64, period: u32) -> f64 {
    amount / (1.0 + rate).powf(period as f64)
}

/// Per-cycle discount rate, validated to be finite and non-negative
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct DiscountRate(f64);

impl DiscountRate {
    /// Rate used for both costs and utilities in the stroke model
    pub const DEFAULT: DiscountRate = DiscountRate(0.03);

    /// # Errors
    /// `ModelError::InvalidDiscountRate` for a negative or non-finite rate
    pub fn new(rate: f64) -> Result<Self, ModelError> {
        if !rate.is_finite() || rate < 0.0 {
            return Err(ModelError::InvalidDiscountRate(rate));
        }
        Ok(Self(rate))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Present value of `amount` received at the end of `period`
    pub fn present_value(&self, amount: f64, period: u32) -> f64 {
        pv(amount, self.0, period)
    }
}

impl Default for DiscountRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f64> for DiscountRate {
    type Error = ModelError;

    fn try_from(rate: f64) -> Result<Self, Self::Error> {
        Self::new(rate)
    }
}

impl From<DiscountRate> for f64 {
    fn from(rate: DiscountRate) -> Self {
        rate.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_period_is_undiscounted() {
        assert_eq!(pv(5196.0, 0.03, 0), 5196.0);
    }

    #[test]
    fn test_first_period_divides_once() {
        assert_eq!(pv(1.0, 0.03, 1), 1.0 / (1.0 + 0.03));
    }

    #[test]
    fn test_rejects_negative_rate() {
        assert_eq!(
            DiscountRate::new(-0.01),
            Err(ModelError::InvalidDiscountRate(-0.01))
        );
    }

    #[test]
    fn test_rejects_infinite_rate() {
        assert!(DiscountRate::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_default_rate() {
        assert_eq!(DiscountRate::default().value(), 0.03);
    }
}
