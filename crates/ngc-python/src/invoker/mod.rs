//! Oword procedure resolution and invocation

use crate::errors::CallError;
use crate::initialization::{Bridge, EmbeddingStatus};
use crate::setup::CALL_ARITY;
use crate::traceback::format_exception;
use crate::value::PyValue;
use ngc_logger as logger;
use pyo3::prelude::*;
use pyo3::types::PyList;
use std::time::{Duration, Instant};

pub(crate) mod kwargs;

/// Why a name could not be turned into a callable
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveError {
    NotFound,
    NotCallable,
    RuntimeFailure(String),
}

/// Successful result of an oword call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CallOutcome {
    /// Numeric result, also stored in the setup's return-value slot
    Value(f64),
    /// The procedure returned `None`
    NoValue,
}

impl CallOutcome {
    pub fn value(&self) -> Option<f64> {
        match self {
            CallOutcome::Value(v) => Some(*v),
            CallOutcome::NoValue => None,
        }
    }
}

impl Bridge {
    fn resolve<'py>(&self, py: Python<'py>, name: &str) -> Result<Bound<'py, PyAny>, ResolveError> {
        let Some(loaded) = self.loaded.as_ref() else {
            return Err(ResolveError::NotFound);
        };
        let object = loaded
            .namespace
            .bind(py)
            .get_item(name)
            .map_err(|e| ResolveError::RuntimeFailure(format_exception(py, &e)))?
            .ok_or(ResolveError::NotFound)?;
        if !object.is_callable() {
            return Err(ResolveError::NotCallable);
        }
        Ok(object)
    }

    /// Whether `name` is a top-level callable of the loaded script
    ///
    /// Never fails: anything other than a clean lookup answers `false`.
    pub fn is_callable(&self, name: &str) -> bool {
        if self.status() != EmbeddingStatus::Ok || name.is_empty() {
            logger::debug(&format!(
                "is_callable({}): status {}",
                name,
                self.status()
            ));
            return false;
        }

        let callable = Python::attach(|py| match self.resolve(py, name) {
            Ok(_) => true,
            Err(ResolveError::RuntimeFailure(message)) => {
                logger::warn(&format!("is_callable({}): {}", name, message));
                false
            }
            Err(_) => false,
        });
        logger::debug(&format!("is_callable({}) = {}", name, callable));
        callable
    }

    /// Call procedure `name` with the oword argument vector
    ///
    /// The procedure receives one positional argument, a list of
    /// [`CALL_ARITY`] floats, plus the configured keyword extras. Every failure
    /// is also reported on the interpreter's error channel as `pycall: ...`.
    pub fn invoke(&self, name: &str, args: &[f64; CALL_ARITY]) -> Result<CallOutcome, CallError> {
        let outcome = self.invoke_inner(name, args);
        match &outcome {
            Ok(CallOutcome::Value(v)) => logger::debug(&format!("pycall({}) -> {}", name, v)),
            Ok(CallOutcome::NoValue) => logger::debug(&format!("pycall({}) -> None", name)),
            Err(err) => self.ctx.report_error(&format!("pycall: {}", err)),
        }
        outcome
    }

    fn invoke_inner(&self, name: &str, args: &[f64; CALL_ARITY]) -> Result<CallOutcome, CallError> {
        let module = self.settings.module_name().to_string();
        let function = name.to_string();

        let loaded = match (self.status(), self.loaded.as_ref()) {
            (EmbeddingStatus::Ok, Some(loaded)) => loaded,
            _ => return Err(CallError::NotInitialized { module, function }),
        };
        if !self.ctx.is_bound() {
            return Err(CallError::InterpreterGone { function });
        }

        logger::set_current_procedure(Some(function.clone()));
        let result = Python::attach(|py| -> Result<PyValue, CallError> {
            let invocation_error = |message: String| CallError::Invocation {
                module: module.clone(),
                function: function.clone(),
                message,
            };

            loaded
                .bind_modules(py)
                .map_err(|e| invocation_error(format_exception(py, &e)))?;

            let procedure = self.resolve(py, name).map_err(|e| match e {
                ResolveError::NotFound => CallError::NotFound {
                    module: module.clone(),
                    function: function.clone(),
                },
                ResolveError::NotCallable => CallError::NotCallable {
                    module: module.clone(),
                    function: function.clone(),
                },
                ResolveError::RuntimeFailure(message) => invocation_error(message),
            })?;

            let plist = PyList::new(py, args.iter().copied())
                .map_err(|e| invocation_error(format_exception(py, &e)))?;
            let kwargs = loaded.kwargs.as_ref().map(|kwargs| kwargs.bind(py));

            let call_start = Instant::now();
            let returned = procedure.call((plist,), kwargs).map_err(|e| {
                let message = format_exception(py, &e);
                logger::python(&message);
                invocation_error(message)
            })?;
            logger::debug(&format!(
                "Python call '{}' took {}",
                name,
                format_duration(call_start.elapsed())
            ));
            Ok(PyValue::from_bound(&returned))
        });
        logger::set_current_procedure(None);

        match result? {
            PyValue::None => Ok(CallOutcome::NoValue),
            PyValue::Number(value) => {
                self.ctx
                    .with_setup_mut(|setup| setup.return_value = value)
                    .map_err(|_| CallError::InterpreterGone {
                        function: function.clone(),
                    })?;
                Ok(CallOutcome::Value(value))
            }
            PyValue::IntOverflow(digits) => Err(CallError::IntOverflow {
                module,
                function,
                digits,
            }),
            other => Err(CallError::TypeNotNumeric {
                module,
                function,
                repr: other.display(),
                got: other.type_name().to_string(),
            }),
        }
    }

    /// Names of the callables the loaded script defines, sorted
    ///
    /// Names bound by `import` are skipped: only objects whose `__module__`
    /// is the script's own `__name__` are listed.
    pub fn callables(&self) -> Vec<String> {
        let Some(loaded) = self.loaded.as_ref() else {
            return Vec::new();
        };
        Python::attach(|py| {
            let namespace = loaded.namespace.bind(py);
            let script_name = match namespace.get_item("__name__") {
                Ok(Some(name)) => name,
                _ => return Vec::new(),
            };
            let mut names: Vec<String> = namespace
                .iter()
                .filter(|(_, value)| value.is_callable())
                .filter(|(_, value)| {
                    value
                        .getattr("__module__")
                        .and_then(|module| module.eq(&script_name))
                        .unwrap_or(false)
                })
                .filter_map(|(key, _)| key.extract::<String>().ok())
                .filter(|name| !name.starts_with("__"))
                .collect();
            names.sort();
            names
        })
    }
}

fn format_duration(duration: Duration) -> String {
    let micros = duration.as_micros();
    if micros < 1_000 {
        format!("{}us", micros)
    } else if micros < 1_000_000 {
        format!("{:.2}ms", duration.as_secs_f64() * 1_000.0)
    } else {
        format!("{:.2}s", duration.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canon::RecordingCanon;
    use crate::context::InterpContext;
    use crate::host::StandaloneInterp;
    use crate::settings::BridgeSettings;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_uninitialized_bridge_refuses_calls() {
        let interp = Arc::new(Mutex::new(StandaloneInterp::new(30)));
        let canon = Arc::new(Mutex::new(RecordingCanon::new()));
        let bridge = Bridge::new(
            BridgeSettings::new("remap.py"),
            InterpContext::new(&interp, canon),
        );

        assert!(!bridge.is_callable("m6"));
        let err = bridge.invoke("m6", &[0.0; CALL_ARITY]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "function 'remap.py.m6' : module not initialized"
        );
        assert_eq!(
            interp.lock().errors(),
            &["pycall: function 'remap.py.m6' : module not initialized".to_string()]
        );
        assert!(bridge.callables().is_empty());
    }

    #[test]
    fn test_outcome_value() {
        assert_eq!(CallOutcome::Value(1.5).value(), Some(1.5));
        assert_eq!(CallOutcome::NoValue.value(), None);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_micros(250)), "250us");
        assert_eq!(format_duration(Duration::from_millis(12)), "12.00ms");
        assert_eq!(format_duration(Duration::from_secs(2)), "2.00s");
    }
}
