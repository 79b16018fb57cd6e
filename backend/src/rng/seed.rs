//! Per-patient seed derivation
//!
//! Seeds are the first 8 bytes (little endian) of
//! `SHA-256("patient-seed:v1" || cohort_id_le || patient_index_le)`.
//! The derivation is stable across platforms and releases: changing it
//! changes every simulated result, so the prefix is versioned.

use sha2::{Digest, Sha256};

const SEED_DOMAIN: &[u8] = b"patient-seed:v1";

/// Derive the RNG seed for one patient of one cohort.
///
/// # Example
/// ```
/// use cohort_simulator_core_rs::rng::derive_patient_seed;
///
/// let a = derive_patient_seed(1, 0);
/// assert_eq!(a, derive_patient_seed(1, 0));
/// assert_ne!(a, derive_patient_seed(2, 0));
/// ```
pub fn derive_patient_seed(cohort_id: u64, patient_index: u64) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(SEED_DOMAIN);
    hasher.update(cohort_id.to_le_bytes());
    hasher.update(patient_index.to_le_bytes());
    let digest = hasher.finalize();

    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}
