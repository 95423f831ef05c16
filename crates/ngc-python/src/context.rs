//! Explicit interpreter context bound into the embedded runtime
//!
//! Every Python object the bridge hands to a script (the `InterpMod.interp`
//! and `InterpMod.params` instances, each `CanonMod` function) carries a clone
//! of one [`InterpContext`]. There is no process-global "current interpreter":
//! two interpreters get two contexts and two sets of module objects.
//!
//! The interpreter handle is weak. Dropping the interpreter while Python still
//! references the context is safe; later accesses fail with [`ContextError`].

use crate::canon::Canon;
use crate::errors::ContextError;
use crate::host::Interpreter;
use crate::setup::Setup;
use ngc_logger as logger;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

#[derive(Clone)]
pub struct InterpContext {
    interp: Weak<Mutex<dyn Interpreter>>,
    canon: Arc<Mutex<dyn Canon>>,
}

impl InterpContext {
    pub fn new<I, C>(interp: &Arc<Mutex<I>>, canon: Arc<Mutex<C>>) -> Self
    where
        I: Interpreter + 'static,
        C: Canon + 'static,
    {
        let interp: Arc<Mutex<dyn Interpreter>> = interp.clone();
        let canon: Arc<Mutex<dyn Canon>> = canon;
        Self {
            interp: Arc::downgrade(&interp),
            canon,
        }
    }

    /// Whether the interpreter is still alive
    pub fn is_bound(&self) -> bool {
        self.interp.strong_count() > 0
    }

    /// Run `f` with exclusive access to the interpreter
    ///
    /// The lock is released before returning; never call into Python from `f`.
    pub fn with_interp<R>(
        &self,
        f: impl FnOnce(&mut dyn Interpreter) -> R,
    ) -> Result<R, ContextError> {
        let interp = self.interp.upgrade().ok_or(ContextError)?;
        let mut guard = interp.lock();
        Ok(f(&mut *guard))
    }

    pub fn with_setup<R>(&self, f: impl FnOnce(&Setup) -> R) -> Result<R, ContextError> {
        self.with_interp(|interp| f(interp.setup()))
    }

    pub fn with_setup_mut<R>(&self, f: impl FnOnce(&mut Setup) -> R) -> Result<R, ContextError> {
        self.with_interp(|interp| f(interp.setup_mut()))
    }

    /// Deliver a message on the interpreter's error channel
    ///
    /// Falls back to the log when the interpreter is gone.
    pub fn report_error(&self, message: &str) {
        if self
            .with_interp(|interp| interp.report_error(message))
            .is_err()
        {
            logger::error(&format!("(no interpreter) {}", message));
        }
    }

    pub fn canon(&self) -> &Arc<Mutex<dyn Canon>> {
        &self.canon
    }
}

impl std::fmt::Debug for InterpContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterpContext")
            .field("bound", &self.is_bound())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canon::RecordingCanon;
    use crate::host::StandaloneInterp;

    fn context() -> (Arc<Mutex<StandaloneInterp>>, InterpContext) {
        let interp = Arc::new(Mutex::new(StandaloneInterp::new(30)));
        let canon = Arc::new(Mutex::new(RecordingCanon::default()));
        let ctx = InterpContext::new(&interp, canon);
        (interp, ctx)
    }

    #[test]
    fn test_setup_writes_reach_interpreter() {
        let (interp, ctx) = context();
        ctx.with_setup_mut(|setup| setup.selected_pocket = 3).unwrap();
        assert_eq!(interp.lock().setup().selected_pocket, 3);
    }

    #[test]
    fn test_dropped_interpreter_is_reported() {
        let (interp, ctx) = context();
        assert!(ctx.is_bound());
        drop(interp);
        assert!(!ctx.is_bound());
        assert_eq!(ctx.with_setup(|setup| setup.current_pocket), Err(ContextError));
        // must not panic
        ctx.report_error("pycall: late");
    }

    #[test]
    fn test_report_error_goes_to_interpreter() {
        let (interp, ctx) = context();
        ctx.report_error("init_python: boom");
        assert_eq!(interp.lock().errors(), &["init_python: boom".to_string()]);
    }
}
