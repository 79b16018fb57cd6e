//! Deterministic random number generation
//!
//! Uses xorshift64* for fast, deterministic draws. Every patient owns its own
//! generator, seeded from its identity, so cohorts can be simulated on any
//! number of threads without sharing random state.
//! CRITICAL: All randomness in the simulator MUST go through this module.

mod seed;
mod xorshift;

pub use seed::derive_patient_seed;
pub use xorshift::RngManager;

/// A source of uniform variates in `[0.0, 1.0)`.
///
/// Samplers take the source as an argument instead of owning one, which keeps
/// them free of hidden state. `RngManager` is the production implementation;
/// tests can script the exact draws.
pub trait UniformSource {
    /// Next uniform variate in `[0.0, 1.0)`.
    fn next_f64(&mut self) -> f64;
}

impl UniformSource for RngManager {
    fn next_f64(&mut self) -> f64 {
        RngManager::next_f64(self)
    }
}
