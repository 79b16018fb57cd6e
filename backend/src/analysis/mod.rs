//! Derived views and two-arm comparisons built on simulated cohorts

pub mod comparison;
pub mod experiment;
pub mod sample_path;

pub use comparison::{compare_arms, ArmSummary, ComparisonReport, Estimate};
pub use experiment::{config_fingerprint, run_experiment, ExperimentConfig, ExperimentReport};
pub use sample_path::SamplePath;
