//! xorshift64* random number generator
//!
//! This is a fast, high-quality PRNG that is deterministic and suitable
//! for simulation purposes.
//!
//! # Algorithm
//!
//! xorshift64* is a variant of xorshift that passes TestU01's BigCrush
//! statistical tests. It uses 64-bit state and produces 64-bit output.
//!
//! # Determinism
//!
//! Same seed → same sequence of random numbers. This is CRITICAL for:
//! - Reproducing a cohort run bit for bit
//! - Testing (verify behavior)
//! - Comparing treatment arms on identical random streams

use serde::{Deserialize, Serialize};

use super::seed::derive_patient_seed;

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use cohort_simulator_core_rs::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let value = rng.next();
/// let u = rng.next_f64(); // [0, 1)
/// assert!(u >= 0.0 && u < 1.0);
/// # let _ = value;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    /// Internal state (64-bit)
    state: u64,
}

impl RngManager {
    /// Create a new RNG with given seed
    ///
    /// # Arguments
    /// * `seed` - Initial seed value (u64)
    pub fn new(seed: u64) -> Self {
        // Ensure seed is never zero (xorshift requirement)
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Create the generator owned by one patient
    ///
    /// The seed comes from [`derive_patient_seed`], so the stream depends only
    /// on the patient's cohort id and index, never on execution order.
    ///
    /// # Example
    /// ```
    /// use cohort_simulator_core_rs::RngManager;
    ///
    /// let mut a = RngManager::for_patient(1, 7);
    /// let mut b = RngManager::for_patient(1, 7);
    /// assert_eq!(a.next(), b.next());
    /// ```
    pub fn for_patient(cohort_id: u64, patient_index: u64) -> Self {
        Self::new(derive_patient_seed(cohort_id, patient_index))
    }

    /// Generate next random u64 value
    ///
    /// This advances the internal state and returns a random value.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> u64 {
        // xorshift64* algorithm
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Get current RNG state (for replay)
    ///
    /// # Example
    /// ```
    /// use cohort_simulator_core_rs::RngManager;
    ///
    /// let mut rng = RngManager::new(12345);
    /// rng.next();
    /// let state = rng.get_state();
    ///
    /// // Later, can recreate RNG from this state
    /// let mut resumed = RngManager::new(state);
    /// assert_eq!(resumed.next(), rng.next());
    /// ```
    pub fn get_state(&self) -> u64 {
        self.state
    }

    /// Generate random f64 in range [0.0, 1.0)
    ///
    /// Uses the top 53 bits of the next output, so every value is an exact
    /// multiple of 2^-53.
    pub fn next_f64(&mut self) -> f64 {
        let value = self.next();
        // Convert to [0.0, 1.0) by dividing by 2^53
        (value >> 11) as f64 * (1.0 / ((1u64 << 53) as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_seed_converted_to_nonzero() {
        let rng = RngManager::new(0);
        assert_ne!(rng.get_state(), 0, "Zero seed should be converted to 1");
    }

    #[test]
    fn test_next_f64_in_range() {
        let mut rng = RngManager::new(12345);

        for _ in 0..1000 {
            let val = rng.next_f64();
            assert!(
                (0.0..1.0).contains(&val),
                "next_f64() produced value {} outside [0.0, 1.0)",
                val
            );
        }
    }

    #[test]
    fn test_next_f64_deterministic() {
        let mut rng1 = RngManager::new(99999);
        let mut rng2 = RngManager::new(99999);

        for _ in 0..100 {
            let val1 = rng1.next_f64();
            let val2 = rng2.next_f64();
            assert_eq!(val1, val2, "next_f64() not deterministic");
        }
    }

    #[test]
    fn test_for_patient_matches_derived_seed() {
        let rng = RngManager::for_patient(3, 11);
        assert_eq!(rng.get_state(), derive_patient_seed(3, 11).max(1));
    }
}
