//! Python oword bridge for an RS274/NGC interpreter
//!
//! Lets an interpreter call procedures defined in a Python script during
//! readahead. The script sees two modules:
//!
//! - `InterpMod`: selected interpreter state (pockets, tool-change flag,
//!   parameters, call depth) bound to the calling interpreter
//! - `CanonMod`: the canonical machining primitives, forwarded to the host
//!
//! A procedure is called with one list of [`CALL_ARITY`] floats plus any
//! configured keyword extras, and may return a number or `None`. Python
//! exceptions never cross into the host; they are formatted with their
//! traceback and delivered through [`Interpreter::report_error`].

pub mod canon;
mod context;
pub mod errors;
pub mod host;
mod initialization;
mod interp_module;
mod invoker;
mod settings;
pub mod setup;
pub mod traceback;
mod value;

pub use canon::{Canon, CanonArg, CanonRecord, CanonSpec, CanonValue, RecordingCanon};
pub use context::InterpContext;
pub use errors::{BridgeError, CallError, ContextError};
pub use host::{Interpreter, StandaloneInterp};
pub use initialization::{runtime, Bridge, EmbeddingStatus, RuntimeInfo};
pub use interp_module::{INTERP_MODULE, PyInterp, PyParams};
pub use invoker::{CallOutcome, ResolveError};
pub use settings::BridgeSettings;
pub use setup::{ParamError, ParameterTable, Setup, CALL_ARITY};
pub use value::PyValue;

pub use canon::module::CANON_MODULE;
