//! Two-cohort experiment
//!
//! Builds and validates the model, simulates a reference cohort without
//! therapy and a treatment cohort with it, and compares them.
//!
//! # Critical Invariants
//!
//! - **Determinism**: same config → bit-identical report
//! - **Fail fast**: every configuration error surfaces before the first
//!   patient is simulated

use log::info;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::comparison::{compare_arms, ComparisonReport};
use super::sample_path::SamplePath;
use crate::cohort::{Cohort, CohortConfig, SimulationError, DEFAULT_POPULATION_SIZE};
use crate::core::discount::DiscountRate;
use crate::models::markov::{MarkovModel, MarkovModelConfig};
use crate::models::patient::DEFAULT_CYCLE_CAP;
use crate::models::TherapyArm;
use crate::stats::{validate_alpha, DEFAULT_ALPHA};

/// Complete experiment configuration
///
/// Every field is optional in JSON; missing fields take the stroke model
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExperimentConfig {
    pub model: MarkovModelConfig,
    pub population_size: usize,
    pub cycle_cap: u32,
    pub discount_rate: f64,

    /// Threads per cohort (1 = sequential)
    pub workers: usize,

    /// Two-sided significance level of every interval
    pub alpha: f64,

    pub reference_cohort_id: u64,
    pub treatment_cohort_id: u64,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            model: MarkovModelConfig::default(),
            population_size: DEFAULT_POPULATION_SIZE,
            cycle_cap: DEFAULT_CYCLE_CAP,
            discount_rate: DiscountRate::DEFAULT.value(),
            workers: 1,
            alpha: DEFAULT_ALPHA,
            reference_cohort_id: 1,
            treatment_cohort_id: 2,
        }
    }
}

impl ExperimentConfig {
    /// Parse a JSON configuration
    ///
    /// # Example
    /// ```
    /// use cohort_simulator_core_rs::analysis::ExperimentConfig;
    ///
    /// let config = ExperimentConfig::from_json(r#"{"population_size": 500}"#).unwrap();
    /// assert_eq!(config.population_size, 500);
    /// assert_eq!(config.cycle_cap, 1000);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, SimulationError> {
        serde_json::from_str(json)
            .map_err(|e| SimulationError::SerializationError(format!("Config parse failed: {}", e)))
    }

    fn cohort_config(&self, cohort_id: u64, therapy: TherapyArm) -> CohortConfig {
        CohortConfig {
            cohort_id,
            therapy,
            population_size: self.population_size,
            cycle_cap: self.cycle_cap,
            discount_rate: self.discount_rate,
            workers: self.workers,
        }
    }

    /// Validate configuration
    fn validate_config(&self) -> Result<(), SimulationError> {
        if self.reference_cohort_id == self.treatment_cohort_id {
            return Err(SimulationError::InvalidConfig(format!(
                "Reference and treatment cohorts share id {}",
                self.reference_cohort_id
            )));
        }

        if self.population_size < crate::stats::MIN_OBSERVATIONS {
            return Err(SimulationError::InvalidConfig(format!(
                "population_size must be >= {} for interval estimates",
                crate::stats::MIN_OBSERVATIONS
            )));
        }

        validate_alpha(self.alpha)?;
        Ok(())
    }
}

/// Result of [`run_experiment`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentReport {
    /// SHA-256 of the canonical configuration
    pub config_fingerprint: String,
    pub comparison: ComparisonReport,
    pub reference_survival_curve: SamplePath,
    pub treatment_survival_curve: SamplePath,
}

/// Compute deterministic SHA256 hash of a config
///
/// Uses canonical JSON serialization with sorted keys so the hash does not
/// depend on field order.
pub fn config_fingerprint<T: Serialize>(config: &T) -> Result<String, SimulationError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(config).map_err(|e| {
        SimulationError::SerializationError(format!("Config serialization failed: {}", e))
    })?;

    // Recursively sort all object keys for canonical representation
    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value)).map_err(|e| {
        SimulationError::SerializationError(format!("Config serialization failed: {}", e))
    })?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

/// Run both cohorts and compare them
///
/// # Errors
/// Any configuration error (model tables, cohort settings, alpha). Nothing
/// is simulated if validation fails.
pub fn run_experiment(config: &ExperimentConfig) -> Result<ExperimentReport, SimulationError> {
    config.validate_config()?;
    let model = MarkovModel::from_config(&config.model)?;
    let reference = Cohort::new(config.cohort_config(
        config.reference_cohort_id,
        TherapyArm::WithoutTherapy,
    ))?;
    let treatment = Cohort::new(config.cohort_config(
        config.treatment_cohort_id,
        TherapyArm::WithTherapy,
    ))?;
    let config_fingerprint = config_fingerprint(config)?;

    info!("Running experiment {}", config_fingerprint);

    let reference = reference.simulate(&model);
    let treatment = treatment.simulate(&model);
    let comparison = compare_arms(&treatment, &reference, config.alpha)?;

    Ok(ExperimentReport {
        config_fingerprint,
        comparison,
        reference_survival_curve: reference.survival_curve(),
        treatment_survival_curve: treatment.survival_curve(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModelError;

    #[test]
    fn test_fingerprint_stable_and_sensitive() {
        let config = ExperimentConfig::default();
        let a = config_fingerprint(&config).unwrap();
        let b = config_fingerprint(&config.clone()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);

        let changed = ExperimentConfig {
            discount_rate: 0.035,
            ..ExperimentConfig::default()
        };
        assert_ne!(a, config_fingerprint(&changed).unwrap());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = ExperimentConfig::from_json(r#"{"populaton_size": 10}"#).unwrap_err();
        assert!(matches!(err, SimulationError::SerializationError(_)));
    }

    #[test]
    fn test_bad_row_aborts_before_simulation() {
        let mut config = ExperimentConfig::default();
        config.model.without_therapy.transitions.post_stroke = vec![0.0, 0.25, 0.55, 0.25];
        let err = run_experiment(&config).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::Model(ModelError::InvalidRow { .. })
        ));
    }

    #[test]
    fn test_shared_cohort_id_rejected() {
        let config = ExperimentConfig {
            treatment_cohort_id: 1,
            ..ExperimentConfig::default()
        };
        assert!(matches!(
            run_experiment(&config),
            Err(SimulationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_single_patient_rejected() {
        let config = ExperimentConfig {
            population_size: 1,
            ..ExperimentConfig::default()
        };
        assert!(matches!(
            run_experiment(&config),
            Err(SimulationError::InvalidConfig(_))
        ));
    }
}
