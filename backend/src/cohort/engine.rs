//! Cohort Engine
//!
//! Builds `N` patients with ids `(cohort_id, 0..N)`, simulates each one to
//! completion and stores four outcome sequences indexed by patient:
//!
//! ```text
//! survival_times[i]   cycles lived (cap if censored)
//! stroke_times[i]     cycles that started in STROKE
//! total_costs[i]      discounted cost
//! total_utilities[i]  discounted utility
//! ```
//!
//! # Concurrency
//!
//! Patients share nothing but the read-only [`MarkovModel`]. With
//! `workers > 1` the population is split into contiguous chunks simulated on
//! scoped threads; chunks are concatenated in order, so the sequences are
//! identical to a sequential run.
//!
//! # Example
//!
//! ```rust
//! use cohort_simulator_core_rs::cohort::{Cohort, CohortConfig};
//! use cohort_simulator_core_rs::models::{MarkovModel, TherapyArm};
//!
//! let model = MarkovModel::stroke_default().unwrap();
//! let config = CohortConfig {
//!     population_size: 100,
//!     ..CohortConfig::new(1, TherapyArm::WithoutTherapy)
//! };
//!
//! let cohort = Cohort::new(config).unwrap().simulate(&model);
//! assert_eq!(cohort.survival_times().len(), 100);
//! println!("Mean survival: {}", cohort.average_survival_time());
//! ```

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::sample_path::SamplePath;
use crate::core::discount::DiscountRate;
use crate::models::event::{Event, EventLog};
use crate::models::markov::MarkovModel;
use crate::models::patient::{Patient, PatientId, RunSettings, SimulatedPatient, DEFAULT_CYCLE_CAP};
use crate::models::transition::ModelError;
use crate::models::TherapyArm;
use crate::stats::{OutcomeSample, StatsError};

/// Patients per cohort unless configured otherwise
pub const DEFAULT_POPULATION_SIZE: usize = 2000;

// ============================================================================
// Configuration
// ============================================================================

/// Cohort configuration
///
/// # Fields
///
/// * `cohort_id` - Distinct per cohort; part of every patient's seed
/// * `therapy` - Arm used by all patients
/// * `population_size` - Number of patients
/// * `cycle_cap` - Maximum cycles per patient
/// * `discount_rate` - Per-cycle rate for cost and utility
/// * `workers` - Threads used to simulate patients (1 = sequential)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortConfig {
    pub cohort_id: u64,
    pub therapy: TherapyArm,
    pub population_size: usize,
    pub cycle_cap: u32,
    pub discount_rate: f64,
    pub workers: usize,
}

impl CohortConfig {
    /// Defaults for everything but identity and arm
    pub fn new(cohort_id: u64, therapy: TherapyArm) -> Self {
        Self {
            cohort_id,
            therapy,
            population_size: DEFAULT_POPULATION_SIZE,
            cycle_cap: DEFAULT_CYCLE_CAP,
            discount_rate: DiscountRate::DEFAULT.value(),
            workers: 1,
        }
    }
}

impl Default for CohortConfig {
    fn default() -> Self {
        Self::new(1, TherapyArm::WithoutTherapy)
    }
}

/// Which per-patient outcome to extract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    SurvivalTime,
    StrokeTime,
    DiscountedCost,
    DiscountedUtility,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::SurvivalTime,
        Metric::StrokeTime,
        Metric::DiscountedCost,
        Metric::DiscountedUtility,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Metric::SurvivalTime => "survival_time",
            Metric::StrokeTime => "stroke_time",
            Metric::DiscountedCost => "discounted_cost",
            Metric::DiscountedUtility => "discounted_utility",
        }
    }
}

/// Simulation error types
#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    /// Configuration validation error
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid model: {0}")]
    Model(#[from] ModelError),

    #[error("Statistics error: {0}")]
    Stats(#[from] StatsError),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// ============================================================================
// Cohort
// ============================================================================

/// A validated cohort that has not been simulated yet
#[derive(Debug, Clone, PartialEq)]
pub struct Cohort {
    config: CohortConfig,
    settings: RunSettings,
}

impl Cohort {
    /// Validate `config`
    ///
    /// # Errors
    /// `InvalidConfig` for a zero population, cap or worker count;
    /// `Model` for an invalid discount rate.
    pub fn new(config: CohortConfig) -> Result<Self, SimulationError> {
        Self::validate_config(&config)?;
        let settings = RunSettings {
            cycle_cap: config.cycle_cap,
            discount_rate: DiscountRate::new(config.discount_rate)?,
        };
        Ok(Self { config, settings })
    }

    fn validate_config(config: &CohortConfig) -> Result<(), SimulationError> {
        if config.population_size == 0 {
            return Err(SimulationError::InvalidConfig(
                "population_size must be > 0".to_string(),
            ));
        }

        if config.cycle_cap == 0 {
            return Err(SimulationError::InvalidConfig(
                "cycle_cap must be > 0".to_string(),
            ));
        }

        if config.workers == 0 {
            return Err(SimulationError::InvalidConfig(
                "workers must be > 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn config(&self) -> &CohortConfig {
        &self.config
    }

    /// Patient `index` of this cohort
    pub fn patient(&self, index: usize) -> Patient {
        Patient::new(
            PatientId::new(self.config.cohort_id, index as u64),
            self.config.therapy,
        )
    }

    /// Simulate every patient and collect outcomes in creation order
    pub fn simulate(self, model: &MarkovModel) -> SimulatedCohort {
        info!(
            "Simulating cohort {} ({}, {} patients, cap {} cycles, {} worker(s))",
            self.config.cohort_id,
            self.config.therapy,
            self.config.population_size,
            self.config.cycle_cap,
            self.config.workers
        );

        let patients = self.run_patients(model);
        let cohort = SimulatedCohort::collect(self.config, self.settings, &patients);

        if cohort.censored_count() > 0 {
            warn!(
                "Cohort {}: {} patient(s) reached the {}-cycle cap alive",
                cohort.cohort_id(),
                cohort.censored_count(),
                cohort.settings().cycle_cap
            );
        }
        info!(
            "Cohort {} complete: mean survival {} cycles",
            cohort.cohort_id(),
            cohort.average_survival_time()
        );

        cohort
    }

    fn run_patients(&self, model: &MarkovModel) -> Vec<SimulatedPatient> {
        let population = self.config.population_size;
        let workers = self.config.workers.min(population).max(1);
        let settings = &self.settings;

        let patients: Vec<Patient> = (0..population).map(|i| self.patient(i)).collect();

        if workers == 1 {
            return patients
                .into_iter()
                .map(|p| p.simulate(model, settings))
                .collect();
        }

        let chunk_size = population.div_ceil(workers);
        std::thread::scope(|scope| {
            let handles: Vec<_> = patients
                .chunks(chunk_size)
                .enumerate()
                .map(|(worker, chunk)| {
                    scope.spawn(move || {
                        debug!(
                            "Worker {} simulating {} patient(s) from index {}",
                            worker,
                            chunk.len(),
                            worker * chunk_size
                        );
                        chunk
                            .iter()
                            .map(|p| p.simulate(model, settings))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
                })
                .collect()
        })
    }

    /// Validate and simulate in one call
    pub fn run(config: CohortConfig, model: &MarkovModel) -> Result<SimulatedCohort, SimulationError> {
        Ok(Self::new(config)?.simulate(model))
    }
}

// ============================================================================
// Simulated cohort
// ============================================================================

/// Outcomes of a simulated cohort; read-only
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedCohort {
    config: CohortConfig,
    settings: RunSettings,
    survival_times: Vec<u32>,
    stroke_times: Vec<u32>,
    total_costs: Vec<f64>,
    total_utilities: Vec<f64>,
    censored: usize,
    event_log: EventLog,
}

impl SimulatedCohort {
    fn collect(config: CohortConfig, settings: RunSettings, patients: &[SimulatedPatient]) -> Self {
        let n = patients.len();
        let mut survival_times = Vec::with_capacity(n);
        let mut stroke_times = Vec::with_capacity(n);
        let mut total_costs = Vec::with_capacity(n);
        let mut total_utilities = Vec::with_capacity(n);
        let mut event_log = EventLog::new();
        let mut censored = 0;

        for patient in patients {
            survival_times.push(patient.survival_time());
            stroke_times.push(patient.stroke_time());
            total_costs.push(patient.total_cost());
            total_utilities.push(patient.total_utility());

            let cycle = patient.survival_time();
            if patient.is_censored() {
                censored += 1;
                event_log.log(Event::PatientCensored {
                    patient: patient.id(),
                    cycle,
                });
            } else {
                event_log.log(Event::PatientAbsorbed {
                    patient: patient.id(),
                    cycle,
                });
            }
        }

        event_log.log(Event::CohortCompleted {
            cohort_id: config.cohort_id,
            population_size: n,
            censored,
        });

        Self {
            config,
            settings,
            survival_times,
            stroke_times,
            total_costs,
            total_utilities,
            censored,
            event_log,
        }
    }

    pub fn cohort_id(&self) -> u64 {
        self.config.cohort_id
    }

    pub fn therapy(&self) -> TherapyArm {
        self.config.therapy
    }

    pub fn config(&self) -> &CohortConfig {
        &self.config
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    pub fn population_size(&self) -> usize {
        self.survival_times.len()
    }

    pub fn survival_times(&self) -> &[u32] {
        &self.survival_times
    }

    pub fn stroke_times(&self) -> &[u32] {
        &self.stroke_times
    }

    pub fn total_costs(&self) -> &[f64] {
        &self.total_costs
    }

    pub fn total_utilities(&self) -> &[f64] {
        &self.total_utilities
    }

    /// Patients still alive at the cycle cap
    pub fn censored_count(&self) -> usize {
        self.censored
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// One metric as a named sample for the statistics engine
    pub fn outcome(&self, metric: Metric) -> OutcomeSample {
        let values = match metric {
            Metric::SurvivalTime => self.survival_times.iter().map(|&v| f64::from(v)).collect(),
            Metric::StrokeTime => self.stroke_times.iter().map(|&v| f64::from(v)).collect(),
            Metric::DiscountedCost => self.total_costs.clone(),
            Metric::DiscountedUtility => self.total_utilities.clone(),
        };
        OutcomeSample::new(metric.name(), values)
    }

    /// Arithmetic mean of the survival times
    pub fn average_survival_time(&self) -> f64 {
        let total: u64 = self.survival_times.iter().map(|&v| u64::from(v)).sum();
        total as f64 / self.survival_times.len() as f64
    }

    /// Number of living patients over time
    ///
    /// Starts at the population size at time 0 and drops by one at each
    /// patient's survival time.
    pub fn survival_curve(&self) -> SamplePath {
        SamplePath::from_increments(
            "# of living patients",
            0,
            self.population_size() as i64,
            self.survival_times.iter().map(|&t| (t, -1)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(workers: usize) -> CohortConfig {
        CohortConfig {
            population_size: 37,
            workers,
            ..CohortConfig::new(5, TherapyArm::WithTherapy)
        }
    }

    #[test]
    fn test_zero_population_rejected() {
        let config = CohortConfig {
            population_size: 0,
            ..CohortConfig::default()
        };
        assert_eq!(
            Cohort::new(config),
            Err(SimulationError::InvalidConfig(
                "population_size must be > 0".to_string()
            ))
        );
    }

    #[test]
    fn test_zero_workers_rejected() {
        assert!(Cohort::new(small(0)).is_err());
    }

    #[test]
    fn test_negative_discount_rate_rejected() {
        let config = CohortConfig {
            discount_rate: -0.5,
            ..CohortConfig::default()
        };
        assert_eq!(
            Cohort::new(config),
            Err(SimulationError::Model(ModelError::InvalidDiscountRate(-0.5)))
        );
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let model = MarkovModel::stroke_default().unwrap();
        let sequential = Cohort::run(small(1), &model).unwrap();
        let parallel = Cohort::run(small(4), &model).unwrap();

        assert_eq!(sequential.survival_times(), parallel.survival_times());
        assert_eq!(sequential.total_costs(), parallel.total_costs());
        assert_eq!(sequential.event_log(), parallel.event_log());
    }

    #[test]
    fn test_more_workers_than_patients() {
        let model = MarkovModel::stroke_default().unwrap();
        let config = CohortConfig {
            population_size: 3,
            workers: 16,
            ..CohortConfig::default()
        };
        let cohort = Cohort::run(config, &model).unwrap();
        assert_eq!(cohort.population_size(), 3);
    }

    #[test]
    fn test_event_log_closes_with_summary() {
        let model = MarkovModel::stroke_default().unwrap();
        let cohort = Cohort::run(small(1), &model).unwrap();
        let log = cohort.event_log();

        assert_eq!(log.len(), 38);
        assert_eq!(
            log.events().last(),
            Some(&Event::CohortCompleted {
                cohort_id: 5,
                population_size: 37,
                censored: cohort.censored_count(),
            })
        );
    }

    #[test]
    fn test_outcome_sample_names() {
        let model = MarkovModel::stroke_default().unwrap();
        let cohort = Cohort::run(small(1), &model).unwrap();
        for metric in Metric::ALL {
            let sample = cohort.outcome(metric);
            assert_eq!(sample.name(), metric.name());
            assert_eq!(sample.len(), 37);
        }
    }
}
