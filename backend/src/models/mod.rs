//! Domain types: health states, Markov model tables, patients, events

pub mod event;
pub mod health;
pub mod markov;
pub mod patient;
pub mod reward;
pub mod transition;

pub use event::{Event, EventLog};
pub use health::{HealthState, TherapyArm};
pub use markov::{ArmConfig, ArmModel, MarkovModel, MarkovModelConfig};
pub use patient::{
    Patient, PatientId, PatientOutcome, PatientState, RunSettings, SimulatedPatient,
    DEFAULT_CYCLE_CAP,
};
pub use reward::{RewardTable, StateReward};
pub use transition::{ModelError, TransitionMatrix, TransitionRows};
