//! Cohort Simulator Core - Rust Engine
//!
//! Discrete-time Markov-chain Monte Carlo engine for health-economic
//! evaluation: simulates patient cohorts under two treatment policies,
//! accrues discounted cost and utility, and compares the arms statistically.
//!
//! # Architecture
//!
//! - **rng**: Deterministic, per-patient random number generation
//! - **sampling**: Empirical (categorical) distribution sampling
//! - **core**: Present-value discounting
//! - **models**: Domain types (HealthState, MarkovModel, Patient, Event)
//! - **cohort**: Cohort driver (sequential or scoped-thread)
//! - **stats**: Summary and independent-difference statistics
//! - **analysis**: Survival curves, arm comparison, experiments
//!
//! # Critical Invariants
//!
//! 1. Transition rows are validated once, never renormalized
//! 2. All randomness is deterministic (one seeded RNG per patient)
//! 3. Outcome sequences are in patient creation order
//! 4. FFI boundary is minimal and safe

// Module declarations
pub mod analysis;
pub mod cohort;
pub mod core;
pub mod models;
pub mod rng;
pub mod sampling;
pub mod stats;

// Re-exports for convenience
pub use analysis::{
    compare_arms, run_experiment, ComparisonReport, ExperimentConfig, ExperimentReport, SamplePath,
};
pub use cohort::{Cohort, CohortConfig, Metric, SimulatedCohort, SimulationError};
pub use crate::core::discount::{pv, DiscountRate};
pub use models::{
    HealthState, MarkovModel, MarkovModelConfig, ModelError, Patient, PatientId, PatientOutcome,
    RunSettings, SimulatedPatient, TherapyArm,
};
pub use rng::RngManager;
pub use sampling::{EmpiricalDistribution, SamplingError};
pub use stats::{ConfidenceInterval, DifferenceStatIndp, OutcomeSample, StatsError, SummaryStat};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn cohort_simulator_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::cohort::PyCohort>()?;
    m.add_function(wrap_pyfunction!(ffi::cohort::run_experiment_json, m)?)?;
    Ok(())
}
