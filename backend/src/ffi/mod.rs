//! Python bindings (feature `pyo3`)
//!
//! Keeps the boundary minimal: configuration comes in as a dict or JSON
//! string, results go out as lists, floats and JSON.

pub mod cohort;
pub mod types;
