//! Type conversion utilities for FFI boundary
//!
//! Converts Python dicts into Rust configuration with clear error messages.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::cohort::CohortConfig;
use crate::models::TherapyArm;

// ========================================================================
// PyDict Extraction Helpers
// ========================================================================

/// Extract a required field from a Python dict.
///
/// # Errors
/// Returns PyValueError if the field is missing or has the wrong type.
pub fn extract_required<'py, T>(dict: &Bound<'py, PyDict>, key: &str) -> PyResult<T>
where
    T: FromPyObject<'py>,
{
    dict.get_item(key)?
        .ok_or_else(|| PyValueError::new_err(format!("Missing required field '{}'", key)))?
        .extract()
}

/// Extract a field, falling back to `default` when it is missing.
pub fn extract_with_default<'py, T>(dict: &Bound<'py, PyDict>, key: &str, default: T) -> PyResult<T>
where
    T: FromPyObject<'py>,
{
    match dict.get_item(key)? {
        Some(value) => value.extract(),
        None => Ok(default),
    }
}

/// Parse `"with_therapy"` / `"without_therapy"`
pub fn parse_therapy(value: &str) -> PyResult<TherapyArm> {
    match value {
        "with_therapy" => Ok(TherapyArm::WithTherapy),
        "without_therapy" => Ok(TherapyArm::WithoutTherapy),
        other => Err(PyValueError::new_err(format!(
            "Unknown therapy '{}', expected 'with_therapy' or 'without_therapy'",
            other
        ))),
    }
}

/// Build a `CohortConfig` from a dict
///
/// Required: `cohort_id`, `therapy`. Optional: `population_size`,
/// `cycle_cap`, `discount_rate`, `workers`.
pub fn parse_cohort_config(dict: &Bound<'_, PyDict>) -> PyResult<CohortConfig> {
    let cohort_id: u64 = extract_required(dict, "cohort_id")?;
    let therapy: String = extract_required(dict, "therapy")?;
    let defaults = CohortConfig::new(cohort_id, parse_therapy(&therapy)?);

    Ok(CohortConfig {
        population_size: extract_with_default(dict, "population_size", defaults.population_size)?,
        cycle_cap: extract_with_default(dict, "cycle_cap", defaults.cycle_cap)?,
        discount_rate: extract_with_default(dict, "discount_rate", defaults.discount_rate)?,
        workers: extract_with_default(dict, "workers", defaults.workers)?,
        ..defaults
    })
}
