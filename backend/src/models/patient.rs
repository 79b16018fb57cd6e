//! Patient simulator
//!
//! One patient's life course as a discrete-time Markov chain. The chain is
//! driven by [`PatientState::advance`], a pure step function: given the
//! current state and one uniform draw it returns the next state. Within a
//! cycle `k` (starting at 0) the order is fixed:
//!
//! ```text
//! 1. stop if the state is DEATH or k >= cycle_cap; survival = k
//! 2. if the state is STROKE, count one stroke cycle
//! 3. credit pv(cost) and pv(utility) of the state at t = k + 1
//! 4. sample the next state from the arm's row; k += 1
//! ```
//!
//! A patient is simulated exactly once: [`Patient::simulate`] consumes the
//! unsimulated patient and returns a read-only [`SimulatedPatient`].

use serde::{Deserialize, Serialize};
use std::fmt;

use super::health::{HealthState, TherapyArm};
use super::markov::{ArmModel, MarkovModel};
use crate::core::discount::DiscountRate;
use crate::rng::{RngManager, UniformSource};

/// Default cap on the number of cycles simulated per patient
pub const DEFAULT_CYCLE_CAP: u32 = 1000;

/// Globally unique patient identity
///
/// Unique across cohorts as long as cohort ids are distinct. The pair also
/// determines the patient's random stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PatientId {
    pub cohort_id: u64,
    pub index: u64,
}

impl PatientId {
    pub fn new(cohort_id: u64, index: u64) -> Self {
        Self { cohort_id, index }
    }

    /// Seeded generator for this patient
    pub fn rng(&self) -> RngManager {
        RngManager::for_patient(self.cohort_id, self.index)
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}-p{:05}", self.cohort_id, self.index)
    }
}

/// Settings shared by every patient of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSettings {
    /// Maximum number of cycles; reaching it right-censors the patient
    pub cycle_cap: u32,

    /// Discount rate applied to both cost and utility
    pub discount_rate: DiscountRate,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            cycle_cap: DEFAULT_CYCLE_CAP,
            discount_rate: DiscountRate::DEFAULT,
        }
    }
}

/// Simulation state of one patient between cycles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatientState {
    pub health: HealthState,

    /// Cycles completed so far
    pub cycle: u32,

    /// Cycles that started in STROKE
    pub stroke_cycles: u32,

    pub discounted_cost: f64,
    pub discounted_utility: f64,
}

impl PatientState {
    /// A new patient: WELL, nothing accrued
    pub fn initial() -> Self {
        Self {
            health: HealthState::Well,
            cycle: 0,
            stroke_cycles: 0,
            discounted_cost: 0.0,
            discounted_utility: 0.0,
        }
    }

    /// Run one cycle, or return `None` if the state is absorbing
    ///
    /// Consumes exactly one uniform draw when it returns `Some`. The reward of
    /// the current state is credited before the transition.
    pub fn advance<R: UniformSource + ?Sized>(
        &self,
        arm: &ArmModel,
        discount_rate: DiscountRate,
        rng: &mut R,
    ) -> Option<PatientState> {
        let row = arm.transitions().row(self.health)?;

        let stroke_cycles = if self.health == HealthState::Stroke {
            self.stroke_cycles + 1
        } else {
            self.stroke_cycles
        };

        let reward = arm.reward(self.health);
        let period = self.cycle + 1;
        let discounted_cost =
            self.discounted_cost + discount_rate.present_value(reward.cost, period);
        let discounted_utility =
            self.discounted_utility + discount_rate.present_value(reward.utility, period);

        // Rows always have HealthState::COUNT entries
        let health = HealthState::from_index(row.sample(rng)).unwrap_or(HealthState::Death);

        Some(PatientState {
            health,
            cycle: self.cycle + 1,
            stroke_cycles,
            discounted_cost,
            discounted_utility,
        })
    }
}

impl Default for PatientState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Final outcome of a simulated patient
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatientOutcome {
    /// Cycles lived before absorption, or the cap if censored
    pub survival_cycles: u32,

    pub stroke_cycles: u32,
    pub discounted_cost: f64,
    pub discounted_utility: f64,

    pub final_state: HealthState,

    /// True if the cap was reached before DEATH
    pub censored: bool,
}

impl From<PatientState> for PatientOutcome {
    fn from(state: PatientState) -> Self {
        Self {
            survival_cycles: state.cycle,
            stroke_cycles: state.stroke_cycles,
            discounted_cost: state.discounted_cost,
            discounted_utility: state.discounted_utility,
            final_state: state.health,
            censored: !state.health.is_absorbing(),
        }
    }
}

/// A patient that has not been simulated yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Patient {
    id: PatientId,
    therapy: TherapyArm,
}

impl Patient {
    pub fn new(id: PatientId, therapy: TherapyArm) -> Self {
        Self { id, therapy }
    }

    pub fn id(&self) -> PatientId {
        self.id
    }

    pub fn therapy(&self) -> TherapyArm {
        self.therapy
    }

    /// Simulate to completion using the patient's own seeded stream
    ///
    /// # Example
    /// ```
    /// use cohort_simulator_core_rs::models::{MarkovModel, Patient, PatientId, RunSettings, TherapyArm};
    ///
    /// let model = MarkovModel::stroke_default().unwrap();
    /// let patient = Patient::new(PatientId::new(1, 0), TherapyArm::WithoutTherapy);
    /// let done = patient.simulate(&model, &RunSettings::default());
    /// assert!(done.survival_time() >= 1);
    /// ```
    pub fn simulate(self, model: &MarkovModel, settings: &RunSettings) -> SimulatedPatient {
        let mut rng = self.id.rng();
        self.simulate_with(model, settings, &mut rng)
    }

    /// Simulate to completion drawing from `rng`
    pub fn simulate_with<R: UniformSource + ?Sized>(
        self,
        model: &MarkovModel,
        settings: &RunSettings,
        rng: &mut R,
    ) -> SimulatedPatient {
        let arm = model.arm(self.therapy);
        let mut state = PatientState::initial();

        while state.cycle < settings.cycle_cap {
            match state.advance(arm, settings.discount_rate, rng) {
                Some(next) => state = next,
                None => break,
            }
        }

        SimulatedPatient {
            id: self.id,
            therapy: self.therapy,
            outcome: PatientOutcome::from(state),
        }
    }
}

/// A patient after simulation; read-only
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatedPatient {
    id: PatientId,
    therapy: TherapyArm,
    outcome: PatientOutcome,
}

impl SimulatedPatient {
    pub fn id(&self) -> PatientId {
        self.id
    }

    pub fn therapy(&self) -> TherapyArm {
        self.therapy
    }

    pub fn outcome(&self) -> &PatientOutcome {
        &self.outcome
    }

    pub fn survival_time(&self) -> u32 {
        self.outcome.survival_cycles
    }

    pub fn stroke_time(&self) -> u32 {
        self.outcome.stroke_cycles
    }

    pub fn total_cost(&self) -> f64 {
        self.outcome.discounted_cost
    }

    pub fn total_utility(&self) -> f64 {
        self.outcome.discounted_utility
    }

    pub fn is_censored(&self) -> bool {
        self.outcome.censored
    }
}
