//! Per-cycle rewards
//!
//! Each state carries a cost and a utility credited once for every cycle a
//! patient spends in it, before the transition out of it.

use serde::{Deserialize, Serialize};

use super::health::{HealthState, TherapyArm};
use super::transition::ModelError;

/// Cost and utility of one cycle spent in a state
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StateReward {
    pub cost: f64,
    pub utility: f64,
}

impl StateReward {
    pub fn new(cost: f64, utility: f64) -> Self {
        Self { cost, utility }
    }
}

/// Rewards for every state under one therapy arm
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardTable {
    pub well: StateReward,
    pub stroke: StateReward,
    pub post_stroke: StateReward,
    #[serde(default)]
    pub death: StateReward,
}

impl RewardTable {
    pub fn get(&self, state: HealthState) -> StateReward {
        match state {
            HealthState::Well => self.well,
            HealthState::Stroke => self.stroke,
            HealthState::PostStroke => self.post_stroke,
            HealthState::Death => self.death,
        }
    }

    /// Reject non-finite costs or utilities
    pub fn validate(&self, arm: TherapyArm) -> Result<(), ModelError> {
        for state in HealthState::ALL {
            let reward = self.get(state);
            if !reward.cost.is_finite() || !reward.utility.is_finite() {
                return Err(ModelError::InvalidReward { arm, state });
            }
        }
        Ok(())
    }
}
