//! Transition matrices
//!
//! One probability row per transient state, each a validated
//! [`EmpiricalDistribution`] over all [`HealthState`]s. `Death` has no row.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::health::{HealthState, TherapyArm};
use crate::rng::UniformSource;
use crate::sampling::{EmpiricalDistribution, SamplingError};

/// Errors detected while building a Markov model
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("Transition row for {state} under {arm} has {actual} entries, expected {expected}")]
    RowLength {
        arm: TherapyArm,
        state: HealthState,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid transition row for {state} under {arm}: {source}")]
    InvalidRow {
        arm: TherapyArm,
        state: HealthState,
        source: SamplingError,
    },

    #[error("Reward for {state} under {arm} is not finite")]
    InvalidReward { arm: TherapyArm, state: HealthState },

    #[error("Discount rate must be finite and non-negative, got {0}")]
    InvalidDiscountRate(f64),
}

/// Raw transition rows as they appear in configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRows {
    pub well: Vec<f64>,
    pub stroke: Vec<f64>,
    pub post_stroke: Vec<f64>,
}

impl TransitionRows {
    fn row(&self, state: HealthState) -> Option<&[f64]> {
        match state {
            HealthState::Well => Some(self.well.as_slice()),
            HealthState::Stroke => Some(self.stroke.as_slice()),
            HealthState::PostStroke => Some(self.post_stroke.as_slice()),
            HealthState::Death => None,
        }
    }
}

/// Validated transition matrix for one therapy arm
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMatrix {
    well: EmpiricalDistribution,
    stroke: EmpiricalDistribution,
    post_stroke: EmpiricalDistribution,
}

impl TransitionMatrix {
    /// Validate every row of `rows`
    ///
    /// # Errors
    /// `RowLength` when a row does not have one entry per state, `InvalidRow`
    /// when a row is not a probability vector. Rows are never renormalized.
    pub fn new(arm: TherapyArm, rows: &TransitionRows) -> Result<Self, ModelError> {
        let build = |state: HealthState| -> Result<EmpiricalDistribution, ModelError> {
            // TRANSIENT states always have a row
            let row = rows.row(state).unwrap_or_default();
            if row.len() != HealthState::COUNT {
                return Err(ModelError::RowLength {
                    arm,
                    state,
                    expected: HealthState::COUNT,
                    actual: row.len(),
                });
            }
            EmpiricalDistribution::new(row.to_vec())
                .map_err(|source| ModelError::InvalidRow { arm, state, source })
        };

        Ok(Self {
            well: build(HealthState::Well)?,
            stroke: build(HealthState::Stroke)?,
            post_stroke: build(HealthState::PostStroke)?,
        })
    }

    /// Outgoing distribution of `state`, `None` for the absorbing state
    pub fn row(&self, state: HealthState) -> Option<&EmpiricalDistribution> {
        match state {
            HealthState::Well => Some(&self.well),
            HealthState::Stroke => Some(&self.stroke),
            HealthState::PostStroke => Some(&self.post_stroke),
            HealthState::Death => None,
        }
    }

    /// Probability of moving from `from` to `to` in one cycle
    pub fn probability(&self, from: HealthState, to: HealthState) -> f64 {
        self.row(from)
            .map(|row| row.probabilities()[to.index()])
            .unwrap_or(0.0)
    }

    /// Sample the state that follows `from`, `None` if `from` is absorbing
    pub fn next_state<R: UniformSource + ?Sized>(
        &self,
        from: HealthState,
        rng: &mut R,
    ) -> Option<HealthState> {
        let row = self.row(from)?;
        HealthState::from_index(row.sample(rng))
    }

    /// Back to the configuration form
    pub fn to_rows(&self) -> TransitionRows {
        TransitionRows {
            well: self.well.probabilities().to_vec(),
            stroke: self.stroke.probabilities().to_vec(),
            post_stroke: self.post_stroke.probabilities().to_vec(),
        }
    }
}
