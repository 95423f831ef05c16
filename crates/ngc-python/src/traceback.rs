//! Python exception formatting
//!
//! Turns a [`PyErr`] into the text delivered on the interpreter's error
//! channel. Formatting never raises: if the `traceback` module cannot render
//! the exception we fall back to `Type: value`, and failing that to a fixed
//! placeholder. The runtime's error indicator is always left clear.

use pyo3::prelude::*;
use pyo3::types::PyString;

const UNFORMATTABLE: &str = "<exception could not be formatted>";

/// Format an exception with its traceback
pub fn format_exception(py: Python<'_>, err: &PyErr) -> String {
    let formatted = full_traceback(py, err)
        .or_else(|_| summary(py, err))
        .unwrap_or_else(|_| UNFORMATTABLE.to_string());
    // anything raised while formatting is dropped here
    let _ = PyErr::take(py);
    formatted
}

/// Fetch and format whatever exception is currently set
pub fn format_active_exception(py: Python<'_>) -> String {
    match PyErr::take(py) {
        Some(err) => format_exception(py, &err),
        None => "no active exception".to_string(),
    }
}

fn full_traceback(py: Python<'_>, err: &PyErr) -> PyResult<String> {
    let traceback = PyModule::import(py, "traceback")?;
    let lines = traceback.call_method1(
        "format_exception",
        (err.get_type(py), err.value(py), err.traceback(py)),
    )?;
    let joined = PyString::new(py, "").call_method1("join", (lines,))?;
    let text: String = joined.extract()?;
    Ok(text.trim_end().to_string())
}

fn summary(py: Python<'_>, err: &PyErr) -> PyResult<String> {
    let type_name = err.get_type(py).name()?.to_string();
    let value = err.value(py).str()?.to_string();
    if value.is_empty() {
        Ok(type_name)
    } else {
        Ok(format!("{}: {}", type_name, value))
    }
}
