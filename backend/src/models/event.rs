//! Event logging for cohort simulation auditing.
//!
//! Each simulated cohort carries an [`EventLog`] recording how every patient
//! run ended plus a closing summary. Events are appended in patient creation
//! order regardless of how the patients were scheduled, so two runs of the
//! same configuration produce identical logs.
//!
//! # Example
//!
//! ```rust
//! use cohort_simulator_core_rs::models::{Event, EventLog, PatientId};
//!
//! let mut log = EventLog::new();
//! log.log(Event::PatientAbsorbed {
//!     patient: PatientId::new(1, 0),
//!     cycle: 4,
//! });
//!
//! assert_eq!(log.events_of_type("PatientAbsorbed").len(), 1);
//! ```

use serde::{Deserialize, Serialize};

use super::patient::PatientId;

/// Simulation event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Patient reached DEATH after `cycle` cycles
    PatientAbsorbed { patient: PatientId, cycle: u32 },

    /// Patient was still alive when the cycle cap was reached
    PatientCensored { patient: PatientId, cycle: u32 },

    /// All patients of a cohort finished
    CohortCompleted {
        cohort_id: u64,
        population_size: usize,
        censored: usize,
    },
}

impl Event {
    /// Event type name, as used by [`EventLog::events_of_type`]
    pub fn event_type(&self) -> &str {
        match self {
            Event::PatientAbsorbed { .. } => "PatientAbsorbed",
            Event::PatientCensored { .. } => "PatientCensored",
            Event::CohortCompleted { .. } => "CohortCompleted",
        }
    }

    /// Patient the event refers to (if applicable)
    pub fn patient(&self) -> Option<PatientId> {
        match self {
            Event::PatientAbsorbed { patient, .. } | Event::PatientCensored { patient, .. } => {
                Some(*patient)
            }
            Event::CohortCompleted { .. } => None,
        }
    }
}

/// Append-only event log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Add an event to the log
    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get all events
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Get events of a specific type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Get events for a specific patient
    pub fn events_for_patient(&self, patient: PatientId) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.patient() == Some(patient))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_names() {
        let absorbed = Event::PatientAbsorbed {
            patient: PatientId::new(1, 0),
            cycle: 3,
        };
        let completed = Event::CohortCompleted {
            cohort_id: 1,
            population_size: 10,
            censored: 0,
        };
        assert_eq!(absorbed.event_type(), "PatientAbsorbed");
        assert_eq!(completed.event_type(), "CohortCompleted");
        assert_eq!(completed.patient(), None);
    }

    #[test]
    fn test_events_for_patient() {
        let mut log = EventLog::new();
        log.log(Event::PatientAbsorbed {
            patient: PatientId::new(1, 0),
            cycle: 3,
        });
        log.log(Event::PatientCensored {
            patient: PatientId::new(1, 1),
            cycle: 1000,
        });

        let events = log.events_for_patient(PatientId::new(1, 1));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "PatientCensored");
        assert!(log.events_for_patient(PatientId::new(2, 0)).is_empty());
    }
}
