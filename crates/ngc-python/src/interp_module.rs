//! The `InterpMod` Python module
//!
//! Exposes two objects bound to one [`InterpContext`]:
//!
//! - `InterpMod.interp`: pocket and tool-change state, read-only depth and
//!   return value, plus `sequence_number()`, `load_tool_table()` and `synch()`
//! - `InterpMod.params`: the numeric parameter table, subscripted by integer
//!
//! Every accessor goes through the context, so a script that outlives its
//! interpreter gets a `RuntimeError` rather than stale state.

use crate::context::InterpContext;
use crate::errors::ContextError;
use crate::setup::ParamError;
use pyo3::exceptions::{PyIndexError, PyNotImplementedError, PyRuntimeError, PyTypeError};
use pyo3::prelude::*;
use pyo3::types::{PyInt, PyModule, PyString};

pub const INTERP_MODULE: &str = "InterpMod";

impl From<ContextError> for PyErr {
    fn from(err: ContextError) -> Self {
        PyRuntimeError::new_err(err.to_string())
    }
}

impl From<ParamError> for PyErr {
    fn from(err: ParamError) -> Self {
        match err {
            ParamError::OutOfRange { .. } => PyIndexError::new_err(err.to_string()),
            ParamError::Unsupported(_) => PyNotImplementedError::new_err(err.to_string()),
        }
    }
}

/// Interpreter state visible to procedures
#[pyclass(name = "Interp", module = "InterpMod")]
pub struct PyInterp {
    ctx: InterpContext,
}

#[pymethods]
impl PyInterp {
    #[getter]
    fn selected_pocket(&self) -> PyResult<i32> {
        Ok(self.ctx.with_setup(|setup| setup.selected_pocket)?)
    }

    #[setter]
    fn set_selected_pocket(&self, value: i32) -> PyResult<()> {
        Ok(self.ctx.with_setup_mut(|setup| setup.selected_pocket = value)?)
    }

    #[getter]
    fn current_pocket(&self) -> PyResult<i32> {
        Ok(self.ctx.with_setup(|setup| setup.current_pocket)?)
    }

    #[setter]
    fn set_current_pocket(&self, value: i32) -> PyResult<()> {
        Ok(self.ctx.with_setup_mut(|setup| setup.current_pocket = value)?)
    }

    #[getter]
    fn toolchange_flag(&self) -> PyResult<bool> {
        Ok(self.ctx.with_setup(|setup| setup.toolchange_flag)?)
    }

    #[setter]
    fn set_toolchange_flag(&self, value: bool) -> PyResult<()> {
        Ok(self.ctx.with_setup_mut(|setup| setup.toolchange_flag = value)?)
    }

    #[getter]
    fn remap_level(&self) -> PyResult<i32> {
        Ok(self.ctx.with_setup(|setup| setup.stack_level)?)
    }

    #[getter]
    fn return_value(&self) -> PyResult<f64> {
        Ok(self.ctx.with_setup(|setup| setup.return_value)?)
    }

    #[getter]
    fn call_level(&self) -> PyResult<i32> {
        Ok(self.ctx.with_interp(|interp| interp.call_level())?)
    }

    fn sequence_number(&self) -> PyResult<i32> {
        Ok(self.ctx.with_interp(|interp| interp.sequence_number())?)
    }

    fn load_tool_table(&self) -> PyResult<()> {
        self.ctx
            .with_interp(|interp| interp.load_tool_table())?
            .map_err(|message| PyRuntimeError::new_err(format!("load_tool_table: {}", message)))
    }

    fn synch(&self) -> PyResult<()> {
        self.ctx
            .with_interp(|interp| interp.synch())?
            .map_err(|message| PyRuntimeError::new_err(format!("synch: {}", message)))
    }

    fn __repr__(&self) -> String {
        match self.ctx.with_setup(|setup| (setup.selected_pocket, setup.current_pocket)) {
            Ok((selected, current)) => format!(
                "<InterpMod.interp selected_pocket={} current_pocket={}>",
                selected, current
            ),
            Err(_) => "<InterpMod.interp (detached)>".to_string(),
        }
    }
}

/// Subscriptable view of the parameter table
#[pyclass(name = "ParamClass", module = "InterpMod")]
pub struct PyParams {
    ctx: InterpContext,
}

enum Subscript {
    Index(i64),
    Name(String),
}

fn subscript(key: &Bound<'_, PyAny>) -> PyResult<Subscript> {
    if key.is_instance_of::<PyInt>() {
        return Ok(Subscript::Index(key.extract()?));
    }
    if key.is_instance_of::<PyString>() {
        return Ok(Subscript::Name(key.extract()?));
    }
    let got = key.get_type().name()?;
    Err(PyTypeError::new_err(format!(
        "parameter subscript must be int or str, not {}",
        got
    )))
}

#[pymethods]
impl PyParams {
    fn __getitem__(&self, key: &Bound<'_, PyAny>) -> PyResult<f64> {
        let key = subscript(key)?;
        let value = self.ctx.with_setup(|setup| match key {
            Subscript::Index(index) => setup.parameters.get(index),
            Subscript::Name(name) => setup.parameters.get_named(&name),
        })??;
        Ok(value)
    }

    fn __setitem__(&self, key: &Bound<'_, PyAny>, value: f64) -> PyResult<()> {
        let key = subscript(key)?;
        self.ctx.with_setup_mut(|setup| match key {
            Subscript::Index(index) => setup.parameters.set(index, value),
            Subscript::Name(name) => setup.parameters.set_named(&name, value),
        })??;
        Ok(())
    }

    fn __len__(&self) -> PyResult<usize> {
        Ok(self.ctx.with_setup(|setup| setup.parameters.len())?)
    }
}

/// Build `InterpMod` bound to `ctx`
pub(crate) fn build_interp_module<'py>(
    py: Python<'py>,
    ctx: &InterpContext,
) -> PyResult<Bound<'py, PyModule>> {
    let module = PyModule::new(py, INTERP_MODULE)?;
    module.setattr("__doc__", "Interpreter introspection\n")?;
    module.add_class::<PyInterp>()?;
    module.add_class::<PyParams>()?;
    module.add("interp", Py::new(py, PyInterp { ctx: ctx.clone() })?)?;
    module.add("params", Py::new(py, PyParams { ctx: ctx.clone() })?)?;
    Ok(module)
}
