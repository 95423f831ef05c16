//! The `CanonMod` Python module

use super::{
    ArgKind, Canon, CanonArg, CanonSpec, CanonValue, ControlPoint, Pose, ToolEntry, BOUND,
};
use crate::context::InterpContext;
use parking_lot::Mutex;
use pyo3::exceptions::{PyRuntimeError, PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyModule, PyTuple};
use pyo3::IntoPyObjectExt;
use std::sync::Arc;

pub const CANON_MODULE: &str = "CanonMod";

/// A canon primitive callable from Python
#[pyclass(name = "CanonFunction", module = "CanonMod")]
pub struct CanonFunction {
    spec: &'static CanonSpec,
    canon: Arc<Mutex<dyn Canon>>,
}

#[pymethods]
impl CanonFunction {
    #[pyo3(signature = (*args))]
    fn __call__(&self, py: Python<'_>, args: &Bound<'_, PyTuple>) -> PyResult<Py<PyAny>> {
        let spec = self.spec;
        if args.len() != spec.arity() {
            return Err(PyTypeError::new_err(format!(
                "{}() takes {} positional arguments but {} were given",
                spec.name,
                spec.arity(),
                args.len()
            )));
        }

        let mut converted = Vec::with_capacity(spec.arity());
        for (position, (kind, arg)) in spec.args.iter().zip(args.iter()).enumerate() {
            converted.push(convert_arg(spec, position, *kind, &arg)?);
        }

        tracing::trace!(canon = spec.name, "forwarding canon call");
        let result = self.canon.lock().call(spec, &converted);
        match result {
            Ok(value) => canon_value_to_py(py, value),
            Err(message) => Err(PyRuntimeError::new_err(format!(
                "{}: {}",
                spec.name, message
            ))),
        }
    }

    #[getter]
    fn signature(&self) -> String {
        self.spec.to_string()
    }

    fn __repr__(&self) -> String {
        format!("<canon {}>", self.spec)
    }
}

fn convert_arg(
    spec: &CanonSpec,
    position: usize,
    kind: ArgKind,
    arg: &Bound<'_, PyAny>,
) -> PyResult<CanonArg> {
    let mismatch = || -> PyErr {
        let got = arg
            .get_type()
            .name()
            .map(|name| name.to_string())
            .unwrap_or_else(|_| "?".to_string());
        PyTypeError::new_err(format!(
            "{}() argument {} must be {}, not {}",
            spec.name,
            position + 1,
            kind,
            got
        ))
    };

    let converted = match kind {
        ArgKind::Int => CanonArg::Int(arg.extract().map_err(|_| mismatch())?),
        ArgKind::Double => CanonArg::Double(arg.extract().map_err(|_| mismatch())?),
        ArgKind::Bool => CanonArg::Bool(arg.extract().map_err(|_| mismatch())?),
        ArgKind::Text => CanonArg::Text(arg.extract().map_err(|_| mismatch())?),
        ArgKind::Pose => {
            let values: Vec<f64> = arg.extract().map_err(|_| mismatch())?;
            let pose: Pose = values.as_slice().try_into().map_err(|_| {
                PyValueError::new_err(format!(
                    "{}() argument {} must have 9 elements, got {}",
                    spec.name,
                    position + 1,
                    values.len()
                ))
            })?;
            CanonArg::Pose(pose)
        }
        ArgKind::ControlPoints => {
            let points: Vec<(f64, f64, f64)> = arg.extract().map_err(|_| mismatch())?;
            CanonArg::ControlPoints(
                points
                    .into_iter()
                    .map(|(x, y, weight)| ControlPoint { x, y, weight })
                    .collect(),
            )
        }
    };
    Ok(converted)
}

fn canon_value_to_py(py: Python<'_>, value: CanonValue) -> PyResult<Py<PyAny>> {
    match value {
        CanonValue::Unit => Ok(py.None()),
        CanonValue::Int(v) => v.into_py_any(py),
        CanonValue::Double(v) => v.into_py_any(py),
        CanonValue::Bool(v) => v.into_py_any(py),
        CanonValue::Text(v) => v.into_py_any(py),
        CanonValue::Tool(tool) => tool_to_dict(py, &tool).map(|dict| dict.into_any().unbind()),
    }
}

fn tool_to_dict<'py>(py: Python<'py>, tool: &ToolEntry) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("toolno", tool.toolno)?;
    dict.set_item("offset", tool.offset.to_vec())?;
    dict.set_item("diameter", tool.diameter)?;
    dict.set_item("frontangle", tool.frontangle)?;
    dict.set_item("backangle", tool.backangle)?;
    dict.set_item("orientation", tool.orientation)?;
    Ok(dict)
}

/// Build `CanonMod` with one callable per bound primitive
pub(crate) fn build_canon_module<'py>(
    py: Python<'py>,
    ctx: &InterpContext,
) -> PyResult<Bound<'py, PyModule>> {
    let module = PyModule::new(py, CANON_MODULE)?;
    module.setattr("__doc__", "Canonical machining functions")?;
    module.add_class::<CanonFunction>()?;
    for spec in BOUND {
        let function = CanonFunction {
            spec,
            canon: Arc::clone(ctx.canon()),
        };
        module.add(spec.name, Py::new(py, function)?)?;
    }
    Ok(module)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canon::{lookup, RecordingCanon};
    use crate::host::StandaloneInterp;
    use pyo3::ffi::c_str;

    fn setup() -> (
        Arc<Mutex<StandaloneInterp>>,
        Arc<Mutex<RecordingCanon>>,
        InterpContext,
    ) {
        let interp = Arc::new(Mutex::new(StandaloneInterp::new(30)));
        let canon = Arc::new(Mutex::new(RecordingCanon::new()));
        let ctx = InterpContext::new(&interp, Arc::clone(&canon));
        (interp, canon, ctx)
    }

    #[test]
    fn test_forwarding_converts_arguments() {
        let (_interp, canon, ctx) = setup();
        Python::attach(|py| {
            let module = build_canon_module(py, &ctx).unwrap();
            let locals = PyDict::new(py);
            locals.set_item("CanonMod", &module).unwrap();
            py.run(
                c_str!(
                    "CanonMod.SET_AUX_OUTPUT_VALUE(2, 1)\nCanonMod.COMMENT('probe')\nCanonMod.USE_TOOL_LENGTH_OFFSET([0.0, 0.0, 1.5, 0, 0, 0, 0, 0, 0])"
                ),
                Some(&locals),
                Some(&locals),
            )
            .unwrap();
        });

        let calls = canon.lock().take_calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(
            calls[0].args,
            vec![CanonArg::Int(2), CanonArg::Double(1.0)]
        );
        assert_eq!(calls[1].args, vec![CanonArg::Text("probe".to_string())]);
        match &calls[2].args[0] {
            CanonArg::Pose(pose) => assert_eq!(pose[2], 1.5),
            other => panic!("unexpected argument {:?}", other),
        }
    }

    #[test]
    fn test_arity_and_type_errors() {
        let (_interp, canon, ctx) = setup();
        Python::attach(|py| {
            let module = build_canon_module(py, &ctx).unwrap();
            let dwell = module.getattr("DWELL").unwrap();

            let err = dwell.call0().unwrap_err();
            assert!(err.is_instance_of::<PyTypeError>(py));
            assert!(err.to_string().contains("takes 1 positional arguments"));

            let err = dwell.call1(("slow",)).unwrap_err();
            assert!(err.to_string().contains("must be float, not str"));

            let offset = module.getattr("USE_TOOL_LENGTH_OFFSET").unwrap();
            let err = offset.call1((vec![1.0, 2.0],)).unwrap_err();
            assert!(err.is_instance_of::<PyValueError>(py));
        });
        assert!(canon.lock().calls().is_empty());
    }

    #[test]
    fn test_query_results_and_host_failures() {
        let (_interp, canon, ctx) = setup();
        canon
            .lock()
            .respond("GET_EXTERNAL_FEED_RATE", CanonValue::Double(30.0))
            .fail_with("CHANGE_TOOL", "changer jammed");

        Python::attach(|py| {
            let module = build_canon_module(py, &ctx).unwrap();

            let feed: f64 = module
                .getattr("GET_EXTERNAL_FEED_RATE")
                .unwrap()
                .call0()
                .unwrap()
                .extract()
                .unwrap();
            assert_eq!(feed, 30.0);

            let tool = module
                .getattr("GET_EXTERNAL_TOOL_TABLE")
                .unwrap()
                .call1((1,))
                .unwrap();
            let tool = tool.cast::<PyDict>().unwrap();
            assert!(tool.contains("diameter").unwrap());

            let err = module
                .getattr("CHANGE_TOOL")
                .unwrap()
                .call1((4,))
                .unwrap_err();
            assert!(err.is_instance_of::<PyRuntimeError>(py));
            assert!(err.to_string().contains("CHANGE_TOOL: changer jammed"));
        });
    }

    #[test]
    fn test_omitted_primitives_are_absent() {
        let (_interp, _canon, ctx) = setup();
        Python::attach(|py| {
            let module = build_canon_module(py, &ctx).unwrap();
            assert!(!module.hasattr("XYZ").unwrap());
            assert!(module.hasattr("STRAIGHT_FEED").unwrap());
            let signature: String = module
                .getattr("WAIT")
                .unwrap()
                .getattr("signature")
                .unwrap()
                .extract()
                .unwrap();
            assert_eq!(signature, lookup("WAIT").unwrap().to_string());
        });
    }
}
