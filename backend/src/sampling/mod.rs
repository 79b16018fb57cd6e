//! Sampling from discrete distributions
//!
//! All draws take their randomness from a caller-supplied
//! [`UniformSource`](crate::rng::UniformSource).

mod empirical;

pub use empirical::{EmpiricalDistribution, SamplingError, PROBABILITY_SUM_TOLERANCE};
