//! Markov model: transitions and rewards for both therapy arms
//!
//! [`MarkovModelConfig`] is the serializable form. [`MarkovModel`] is the
//! validated, immutable form shared read-only by every patient run.
//!
//! # Example
//!
//! ```
//! use cohort_simulator_core_rs::models::{HealthState, MarkovModel, MarkovModelConfig, TherapyArm};
//!
//! let model = MarkovModel::from_config(&MarkovModelConfig::default()).unwrap();
//! let arm = model.arm(TherapyArm::WithTherapy);
//! assert_eq!(arm.rewards().get(HealthState::PostStroke).cost, 2200.0);
//! ```

use serde::{Deserialize, Serialize};

use super::health::{HealthState, TherapyArm};
use super::reward::{RewardTable, StateReward};
use super::transition::{ModelError, TransitionMatrix, TransitionRows};

/// Configuration of one arm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmConfig {
    pub transitions: TransitionRows,
    pub rewards: RewardTable,
}

/// Configuration of the whole model
///
/// The default is the stroke prevention model: the therapy lowers the
/// post-stroke recurrence and death rates at a higher post-stroke cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkovModelConfig {
    pub without_therapy: ArmConfig,
    pub with_therapy: ArmConfig,
}

impl MarkovModelConfig {
    pub fn arm(&self, arm: TherapyArm) -> &ArmConfig {
        match arm {
            TherapyArm::WithoutTherapy => &self.without_therapy,
            TherapyArm::WithTherapy => &self.with_therapy,
        }
    }
}

impl Default for MarkovModelConfig {
    fn default() -> Self {
        let well_row = vec![0.75, 0.15, 0.0, 0.1];
        let stroke_row = vec![0.0, 0.0, 1.0, 0.0];

        Self {
            without_therapy: ArmConfig {
                transitions: TransitionRows {
                    well: well_row.clone(),
                    stroke: stroke_row.clone(),
                    post_stroke: vec![0.0, 0.25, 0.55, 0.2],
                },
                rewards: RewardTable {
                    well: StateReward::new(0.0, 1.0),
                    stroke: StateReward::new(5196.0, 0.8865),
                    post_stroke: StateReward::new(200.0, 0.9),
                    death: StateReward::new(0.0, 0.0),
                },
            },
            with_therapy: ArmConfig {
                transitions: TransitionRows {
                    well: well_row,
                    stroke: stroke_row,
                    post_stroke: vec![0.0, 0.1625, 0.701, 0.1365],
                },
                rewards: RewardTable {
                    well: StateReward::new(0.0, 1.0),
                    stroke: StateReward::new(5196.0, 0.8865),
                    post_stroke: StateReward::new(2200.0, 0.9),
                    death: StateReward::new(0.0, 0.0),
                },
            },
        }
    }
}

/// Validated transitions and rewards of one arm
#[derive(Debug, Clone, PartialEq)]
pub struct ArmModel {
    arm: TherapyArm,
    transitions: TransitionMatrix,
    rewards: RewardTable,
}

impl ArmModel {
    pub fn new(arm: TherapyArm, config: &ArmConfig) -> Result<Self, ModelError> {
        let transitions = TransitionMatrix::new(arm, &config.transitions)?;
        config.rewards.validate(arm)?;
        Ok(Self {
            arm,
            transitions,
            rewards: config.rewards,
        })
    }

    pub fn arm(&self) -> TherapyArm {
        self.arm
    }

    pub fn transitions(&self) -> &TransitionMatrix {
        &self.transitions
    }

    pub fn rewards(&self) -> &RewardTable {
        &self.rewards
    }

    /// Reward credited for one cycle in `state`
    pub fn reward(&self, state: HealthState) -> StateReward {
        self.rewards.get(state)
    }
}

/// Validated model for both arms
#[derive(Debug, Clone, PartialEq)]
pub struct MarkovModel {
    without_therapy: ArmModel,
    with_therapy: ArmModel,
}

impl MarkovModel {
    /// Validate a configuration
    ///
    /// # Errors
    /// The first `ModelError` found, checking the arm without therapy first.
    pub fn from_config(config: &MarkovModelConfig) -> Result<Self, ModelError> {
        Ok(Self {
            without_therapy: ArmModel::new(TherapyArm::WithoutTherapy, &config.without_therapy)?,
            with_therapy: ArmModel::new(TherapyArm::WithTherapy, &config.with_therapy)?,
        })
    }

    /// The stroke model's default tables
    pub fn stroke_default() -> Result<Self, ModelError> {
        Self::from_config(&MarkovModelConfig::default())
    }

    pub fn arm(&self, arm: TherapyArm) -> &ArmModel {
        match arm {
            TherapyArm::WithoutTherapy => &self.without_therapy,
            TherapyArm::WithTherapy => &self.with_therapy,
        }
    }

    pub fn to_config(&self) -> MarkovModelConfig {
        let arm_config = |arm: &ArmModel| ArmConfig {
            transitions: arm.transitions.to_rows(),
            rewards: arm.rewards,
        };
        MarkovModelConfig {
            without_therapy: arm_config(&self.without_therapy),
            with_therapy: arm_config(&self.with_therapy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables_are_valid() {
        assert!(MarkovModel::from_config(&MarkovModelConfig::default()).is_ok());
    }

    #[test]
    fn test_arms_differ_only_in_post_stroke() {
        let model = MarkovModel::stroke_default().unwrap();
        let without = model.arm(TherapyArm::WithoutTherapy);
        let with = model.arm(TherapyArm::WithTherapy);

        for state in [HealthState::Well, HealthState::Stroke] {
            assert_eq!(
                without.transitions().row(state),
                with.transitions().row(state)
            );
            assert_eq!(without.reward(state), with.reward(state));
        }
        assert_ne!(
            without.transitions().row(HealthState::PostStroke),
            with.transitions().row(HealthState::PostStroke)
        );
        assert_eq!(with.reward(HealthState::PostStroke).cost, 2200.0);
    }

    #[test]
    fn test_invalid_arm_rejected() {
        let mut config = MarkovModelConfig::default();
        config.with_therapy.transitions.well = vec![0.75, 0.15, 0.0, 0.2];
        let err = MarkovModel::from_config(&config).unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidRow {
                arm: TherapyArm::WithTherapy,
                state: HealthState::Well,
                ..
            }
        ));
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = MarkovModelConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: MarkovModelConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
        assert_eq!(MarkovModel::stroke_default().unwrap().to_config(), config);
    }
}
