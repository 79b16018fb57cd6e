//! Cohort driver
//!
//! Runs a fixed-size population of independent patients under one therapy
//! arm and collects their outcomes in creation order.
//!
//! See `engine.rs` for the implementation.

pub mod engine;

pub use engine::{
    Cohort, CohortConfig, Metric, SimulatedCohort, SimulationError, DEFAULT_POPULATION_SIZE,
};
