use ngc_config::module_paths::ModulePathError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while bringing up the bridge
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Python error: {0}")]
    Python(String),

    #[error("no module defined")]
    NoModule,

    #[error("can't resolve path to '{}': {source}", .path.display())]
    PathResolution {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("module '{}' init failed: {message}", .path.display())]
    ModuleLoad { path: PathBuf, message: String },

    #[error("module not initialized")]
    NotInitialized,

    #[error("Failed to serialize keyword arguments: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Generic conversion from PyErr to BridgeError.
///
/// NOTE: This conversion loses the Python traceback information!
/// User-facing failures go through [`crate::traceback::format_exception`].
impl From<pyo3::PyErr> for BridgeError {
    fn from(err: pyo3::PyErr) -> Self {
        BridgeError::Python(format!("{}", err))
    }
}

impl From<ModulePathError> for BridgeError {
    fn from(err: ModulePathError) -> Self {
        match err {
            ModulePathError::NoModule => BridgeError::NoModule,
            ModulePathError::Unresolvable { path, source } => {
                BridgeError::PathResolution { path, source }
            }
            ModulePathError::NotAFile(path) => BridgeError::PathResolution {
                path,
                source: io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
            },
        }
    }
}

/// Why an oword procedure call did not produce a result
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CallError {
    #[error("function '{module}.{function}' : module not initialized")]
    NotInitialized { module: String, function: String },

    #[error("function '{module}.{function}' : not defined")]
    NotFound { module: String, function: String },

    #[error("function '{module}.{function}' : not callable")]
    NotCallable { module: String, function: String },

    #[error("function '{module}.{function}' failed:\n{message}")]
    Invocation {
        module: String,
        function: String,
        message: String,
    },

    #[error("function '{module}.{function}' returned '{repr}' - expected float, got {got}")]
    TypeNotNumeric {
        module: String,
        function: String,
        repr: String,
        got: String,
    },

    #[error("function '{module}.{function}' returned an int too large for a float: {digits}")]
    IntOverflow {
        module: String,
        function: String,
        digits: String,
    },

    #[error("function '{function}' : interpreter is no longer available")]
    InterpreterGone { function: String },
}

impl CallError {
    pub fn function(&self) -> &str {
        match self {
            CallError::NotInitialized { function, .. }
            | CallError::NotFound { function, .. }
            | CallError::NotCallable { function, .. }
            | CallError::Invocation { function, .. }
            | CallError::TypeNotNumeric { function, .. }
            | CallError::IntOverflow { function, .. }
            | CallError::InterpreterGone { function } => function,
        }
    }
}

/// The interpreter a context was bound to has been dropped
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("interpreter instance is no longer available")]
pub struct ContextError;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_initialized_wording() {
        let err = CallError::NotInitialized {
            module: "remap.py".to_string(),
            function: "m6".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "function 'remap.py.m6' : module not initialized"
        );
        assert_eq!(err.function(), "m6");
    }

    #[test]
    fn test_type_not_numeric_wording() {
        let err = CallError::TypeNotNumeric {
            module: "remap.py".to_string(),
            function: "bad".to_string(),
            repr: "oops".to_string(),
            got: "str".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "function 'remap.py.bad' returned 'oops' - expected float, got str"
        );
    }

    #[test]
    fn test_int_overflow_wording() {
        let err = CallError::IntOverflow {
            module: "remap.py".to_string(),
            function: "huge".to_string(),
            digits: "1".to_string() + &"0".repeat(400),
        };
        assert!(err
            .to_string()
            .starts_with("function 'remap.py.huge' returned an int too large for a float: 1000"));
        assert_eq!(err.function(), "huge");
    }

    #[test]
    fn test_module_path_error_mapping() {
        let err = BridgeError::from(ModulePathError::NoModule);
        assert!(matches!(err, BridgeError::NoModule));

        let err = BridgeError::from(ModulePathError::NotAFile(PathBuf::from("/tmp")));
        assert!(err.to_string().contains("/tmp"));
    }
}
