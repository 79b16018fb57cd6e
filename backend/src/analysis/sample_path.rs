//! Step-function sample paths
//!
//! A path starts at `(initial_time, initial_value)`; each recorded increment
//! moves the value at its time. Increments sharing a time are merged into a
//! single step, so times are strictly increasing.

use serde::{Deserialize, Serialize};

/// A piecewise-constant trajectory, e.g. living patients over time
///
/// # Example
/// ```
/// use cohort_simulator_core_rs::analysis::SamplePath;
///
/// let path = SamplePath::from_increments("alive", 0, 3, [(2, -1), (5, -1), (2, -1)]);
/// assert_eq!(path.times(), &[0, 2, 5]);
/// assert_eq!(path.values(), &[3, 1, 0]);
/// assert_eq!(path.value_at(4), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplePath {
    name: String,
    times: Vec<u32>,
    values: Vec<i64>,
}

impl SamplePath {
    pub fn from_increments<I>(name: impl Into<String>, initial_time: u32, initial_value: i64, increments: I) -> Self
    where
        I: IntoIterator<Item = (u32, i64)>,
    {
        let mut records: Vec<(u32, i64)> = increments.into_iter().collect();
        records.sort_by_key(|&(time, _)| time);

        let mut times = vec![initial_time];
        let mut values = vec![initial_value];

        for (time, increment) in records {
            let last = values.len() - 1;
            if time <= times[last] {
                values[last] += increment;
            } else {
                times.push(time);
                values.push(values[last] + increment);
            }
        }

        Self {
            name: name.into(),
            times,
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn times(&self) -> &[u32] {
        &self.times
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Value in effect at `time` (the initial value before the first step)
    pub fn value_at(&self, time: u32) -> i64 {
        let steps = self.times.partition_point(|&t| t <= time);
        if steps == 0 {
            self.values[0]
        } else {
            self.values[steps - 1]
        }
    }
}
