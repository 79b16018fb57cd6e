//! PyO3 wrapper for simulated cohorts and experiments

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use super::types::parse_cohort_config;
use crate::analysis::{run_experiment, ExperimentConfig};
use crate::cohort::{Cohort, SimulatedCohort};
use crate::models::{MarkovModel, MarkovModelConfig};

/// Python view of a simulated cohort
///
/// # Example (from Python)
///
/// ```python
/// from cohort_simulator_core_rs import Cohort
///
/// cohort = Cohort.simulate({"cohort_id": 1, "therapy": "without_therapy"})
/// print(cohort.average_survival_time())
/// ```
#[pyclass(name = "Cohort")]
pub struct PyCohort {
    inner: SimulatedCohort,
}

#[pymethods]
impl PyCohort {
    /// Simulate a cohort with the default stroke model
    ///
    /// The GIL is released while patients are simulated.
    #[staticmethod]
    fn simulate(py: Python<'_>, config: &Bound<'_, PyDict>) -> PyResult<Self> {
        let config = parse_cohort_config(config)?;
        let model = MarkovModel::from_config(&MarkovModelConfig::default())
            .map_err(|e| PyValueError::new_err(e.to_string()))?;

        let inner = py
            .allow_threads(|| Cohort::run(config, &model))
            .map_err(|e| PyValueError::new_err(format!("Failed to simulate cohort: {}", e)))?;

        Ok(PyCohort { inner })
    }

    fn cohort_id(&self) -> u64 {
        self.inner.cohort_id()
    }

    fn survival_times(&self) -> Vec<u32> {
        self.inner.survival_times().to_vec()
    }

    fn stroke_times(&self) -> Vec<u32> {
        self.inner.stroke_times().to_vec()
    }

    fn total_costs(&self) -> Vec<f64> {
        self.inner.total_costs().to_vec()
    }

    fn total_utilities(&self) -> Vec<f64> {
        self.inner.total_utilities().to_vec()
    }

    fn average_survival_time(&self) -> f64 {
        self.inner.average_survival_time()
    }

    /// `(times, values)` of the living-patients step function
    fn survival_curve(&self) -> (Vec<u32>, Vec<i64>) {
        let path = self.inner.survival_curve();
        (path.times().to_vec(), path.values().to_vec())
    }
}

/// Run a full two-arm experiment from a JSON config; returns the report as JSON
#[pyfunction]
#[pyo3(signature = (config_json = "{}"))]
pub fn run_experiment_json(py: Python<'_>, config_json: &str) -> PyResult<String> {
    let config = ExperimentConfig::from_json(config_json)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;

    let report = py
        .allow_threads(|| run_experiment(&config))
        .map_err(|e| PyValueError::new_err(e.to_string()))?;

    serde_json::to_string(&report).map_err(|e| PyRuntimeError::new_err(e.to_string()))
}
