//! Health states and therapy arms
//!
//! Both enums are closed and carry a stable index used to address rows and
//! columns of the transition matrix.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Clinical state of a patient in the stroke model
///
/// `Death` is absorbing: it has no outgoing transition row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthState {
    Well,
    Stroke,
    PostStroke,
    Death,
}

impl HealthState {
    /// Number of states (length of every transition row)
    pub const COUNT: usize = 4;

    /// All states in index order
    pub const ALL: [HealthState; Self::COUNT] = [
        HealthState::Well,
        HealthState::Stroke,
        HealthState::PostStroke,
        HealthState::Death,
    ];

    /// States that own a transition row
    pub const TRANSIENT: [HealthState; 3] = [
        HealthState::Well,
        HealthState::Stroke,
        HealthState::PostStroke,
    ];

    /// Column index of this state in a transition row
    pub fn index(self) -> usize {
        match self {
            HealthState::Well => 0,
            HealthState::Stroke => 1,
            HealthState::PostStroke => 2,
            HealthState::Death => 3,
        }
    }

    /// Inverse of [`HealthState::index`]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn is_absorbing(self) -> bool {
        matches!(self, HealthState::Death)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HealthState::Well => "WELL",
            HealthState::Stroke => "STROKE",
            HealthState::PostStroke => "POST_STROKE",
            HealthState::Death => "DEATH",
        }
    }
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Treatment policy applied to every patient of a cohort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TherapyArm {
    WithoutTherapy,
    WithTherapy,
}

impl TherapyArm {
    pub const ALL: [TherapyArm; 2] = [TherapyArm::WithoutTherapy, TherapyArm::WithTherapy];

    pub fn as_str(self) -> &'static str {
        match self {
            TherapyArm::WithoutTherapy => "without_therapy",
            TherapyArm::WithTherapy => "with_therapy",
        }
    }
}

impl fmt::Display for TherapyArm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
