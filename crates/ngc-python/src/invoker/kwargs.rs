use ngc_logger as logger;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyModule};
use serde_json::{Map, Value};

/// Convert the configured keyword extras into a Python dict
///
/// Returns `None` when there are no extras so procedures are called without
/// keyword arguments at all.
pub(crate) fn build_kwargs<'py>(
    py: Python<'py>,
    extras: &Map<String, Value>,
) -> PyResult<Option<Bound<'py, PyDict>>> {
    if extras.is_empty() {
        return Ok(None);
    }

    let json = serde_json::to_string(extras)
        .map_err(|e| PyValueError::new_err(format!("Failed to serialize kwargs: {}", e)))?;
    let loads = PyModule::import(py, "json")?.getattr("loads")?;
    let kwargs = loads.call1((json,))?.cast_into::<PyDict>()?;
    logger::debug(&format!("Keyword extras: {}", kwargs.len()));
    Ok(Some(kwargs))
}
