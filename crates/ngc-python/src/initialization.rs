//! Embedded runtime startup and script loading
//!
//! The Python runtime is process-wide: it is started at most once through a
//! `OnceCell` and never torn down. Scripts are per-bridge. Each [`Bridge`]
//! loads one script into its own namespace, with `InterpMod` and `CanonMod`
//! bound to that bridge's [`InterpContext`].
//!
//! ## Status
//!
//! A bridge starts `Uninitialized`. The first successful load moves it to
//! `Ok`; an exception while executing the script moves it to `Failed`. Both are
//! terminal, later `initialize` calls just report the status. Configuration
//! problems (no module, unresolvable path) leave it `Uninitialized` so the
//! host can fix the setting and retry.

use crate::canon::module::{build_canon_module, CANON_MODULE};
use crate::context::InterpContext;
use crate::errors::BridgeError;
use crate::interp_module::{build_interp_module, INTERP_MODULE};
use crate::invoker::kwargs::build_kwargs;
use crate::settings::BridgeSettings;
use crate::traceback::format_exception;
use ngc_config::module_paths::resolve_module_path;
use ngc_logger as logger;
use once_cell::sync::OnceCell;
use pyo3::prelude::*;
use pyo3::types::{PyBytes, PyDict, PyList, PyModule};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Facts about the process-wide runtime
#[derive(Debug, Clone)]
pub struct RuntimeInfo {
    pub version: String,
}

static RUNTIME: OnceCell<RuntimeInfo> = OnceCell::new();

/// Start the embedded runtime if this process has not done so yet
pub fn runtime() -> &'static RuntimeInfo {
    RUNTIME.get_or_init(|| {
        let start_time = std::time::Instant::now();
        Python::initialize();
        let version = Python::attach(|py| py.version().to_string());
        logger::debug(&format!(
            "Python {} initialized in {:?}",
            version.lines().next().unwrap_or_default(),
            start_time.elapsed()
        ));
        RuntimeInfo { version }
    })
}

/// Load state of a bridge's script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingStatus {
    Uninitialized,
    Ok,
    Failed,
}

impl fmt::Display for EmbeddingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EmbeddingStatus::Uninitialized => "uninitialized",
            EmbeddingStatus::Ok => "ok",
            EmbeddingStatus::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Python objects owned by a loaded script
pub(crate) struct LoadedScript {
    pub(crate) namespace: Py<PyDict>,
    interp_module: Py<PyModule>,
    canon_module: Py<PyModule>,
    pub(crate) kwargs: Option<Py<PyDict>>,
}

impl LoadedScript {
    /// Make this script's modules the ones `import InterpMod` / `import CanonMod` see
    pub(crate) fn bind_modules(&self, py: Python<'_>) -> PyResult<()> {
        register_modules(
            py,
            self.interp_module.bind(py),
            self.canon_module.bind(py),
        )
    }
}

fn register_modules(
    py: Python<'_>,
    interp_module: &Bound<'_, PyModule>,
    canon_module: &Bound<'_, PyModule>,
) -> PyResult<()> {
    let modules = PyModule::import(py, "sys")?.getattr("modules")?;
    modules.set_item(INTERP_MODULE, interp_module)?;
    modules.set_item(CANON_MODULE, canon_module)?;
    Ok(())
}

/// Oword bridge between one interpreter and one Python script
pub struct Bridge {
    pub(crate) settings: BridgeSettings,
    pub(crate) ctx: InterpContext,
    status: EmbeddingStatus,
    script_path: Option<PathBuf>,
    last_error: Option<String>,
    pub(crate) loaded: Option<LoadedScript>,
}

impl Bridge {
    pub fn new(settings: BridgeSettings, ctx: InterpContext) -> Self {
        Self {
            settings,
            ctx,
            status: EmbeddingStatus::Uninitialized,
            script_path: None,
            last_error: None,
            loaded: None,
        }
    }

    pub fn status(&self) -> EmbeddingStatus {
        self.status
    }

    /// Canonical path of the loaded script
    pub fn script_path(&self) -> Option<&Path> {
        self.script_path.as_deref()
    }

    /// Formatted failure of the last load attempt
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn settings(&self) -> &BridgeSettings {
        &self.settings
    }

    pub fn context(&self) -> &InterpContext {
        &self.ctx
    }

    /// Load the configured script
    ///
    /// Returns the resulting status. A script that raises while loading is not
    /// an `Err`: the bridge is marked `Failed` and the traceback is reported on
    /// the interpreter's error channel.
    pub fn initialize(&mut self) -> Result<EmbeddingStatus, BridgeError> {
        if self.status != EmbeddingStatus::Uninitialized {
            logger::debug(&format!(
                "init_python: already initialized, status {}",
                self.status
            ));
            return Ok(self.status);
        }

        let path = match resolve_module_path(
            self.settings.module_name(),
            self.settings.module_dir.as_deref(),
        ) {
            Ok(path) => path,
            Err(e) => {
                let err = BridgeError::from(e);
                self.ctx.report_error(&format!("init_python: {}", err));
                return Err(err);
            }
        };

        runtime();
        logger::debug(&format!("init_python: loading {}", path.display()));
        let result = Python::attach(|py| self.load(py, &path));
        self.script_path = Some(path);

        match result {
            Ok(loaded) => {
                self.loaded = Some(loaded);
                self.status = EmbeddingStatus::Ok;
                logger::debug(&format!(
                    "init_python: {} loaded",
                    self.settings.module_name()
                ));
            }
            Err(message) => {
                self.status = EmbeddingStatus::Failed;
                logger::python(&message);
                self.ctx.report_error(&format!("init_python: {}", message));
                self.last_error = Some(message);
            }
        }
        Ok(self.status)
    }

    /// Fail unless the script is loaded
    pub fn ensure_loaded(&self) -> Result<(), BridgeError> {
        match self.status {
            EmbeddingStatus::Ok => Ok(()),
            EmbeddingStatus::Uninitialized => Err(BridgeError::NotInitialized),
            EmbeddingStatus::Failed => Err(BridgeError::ModuleLoad {
                path: self.script_path.clone().unwrap_or_default(),
                message: self.last_error.clone().unwrap_or_default(),
            }),
        }
    }

    fn load(&self, py: Python<'_>, path: &Path) -> Result<LoadedScript, String> {
        let source =
            fs::read(path).map_err(|e| format!("can't read '{}': {}", path.display(), e))?;
        self.exec_script(py, path, &source)
            .map_err(|err| format_exception(py, &err))
    }

    /// Compile from raw bytes so a PEP 263 coding declaration decides the encoding
    fn exec_script(&self, py: Python<'_>, path: &Path, source: &[u8]) -> PyResult<LoadedScript> {
        let interp_module = build_interp_module(py, &self.ctx)?;
        let canon_module = build_canon_module(py, &self.ctx)?;
        register_modules(py, &interp_module, &canon_module)?;

        let path_str = path.to_string_lossy();
        if let Some(dir) = path.parent() {
            add_to_sys_path(py, dir)?;
        }

        let builtins = PyModule::import(py, "builtins")?;
        let namespace = PyDict::new(py);
        namespace.set_item("__name__", "__main__")?;
        namespace.set_item("__file__", path_str.as_ref())?;
        namespace.set_item("__builtins__", &builtins)?;
        namespace.set_item(INTERP_MODULE, &interp_module)?;
        namespace.set_item(CANON_MODULE, &canon_module)?;

        let source = PyBytes::new(py, source);
        let code = builtins.call_method1("compile", (source, path_str.as_ref(), "exec"))?;
        builtins.call_method1("exec", (code, &namespace, &namespace))?;

        let kwargs = build_kwargs(py, &self.settings.kwargs)?;
        Ok(LoadedScript {
            namespace: namespace.unbind(),
            interp_module: interp_module.unbind(),
            canon_module: canon_module.unbind(),
            kwargs: kwargs.map(Bound::unbind),
        })
    }
}

fn add_to_sys_path(py: Python<'_>, dir: &Path) -> PyResult<()> {
    let sys_path = PyModule::import(py, "sys")?.getattr("path")?;
    let sys_path = sys_path.cast::<PyList>()?;
    let dir = dir.to_string_lossy();
    if !sys_path.contains(dir.as_ref())? {
        sys_path.insert(0, dir.as_ref())?;
        logger::debug(&format!("Added {} to sys.path", dir));
    }
    Ok(())
}

impl fmt::Debug for Bridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bridge")
            .field("module", &self.settings.module_name())
            .field("status", &self.status)
            .field("script_path", &self.script_path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(EmbeddingStatus::Uninitialized.to_string(), "uninitialized");
        assert_eq!(EmbeddingStatus::Failed.to_string(), "failed");
    }

    #[test]
    fn test_runtime_starts_once() {
        let first = runtime() as *const RuntimeInfo;
        let second = runtime() as *const RuntimeInfo;
        assert_eq!(first, second);
        assert!(runtime().version.starts_with('3'));
    }
}
