//! ngcpy library - command implementations behind the `ngcpy` binary

pub mod commands;
pub mod common;
pub mod errors;

pub use common::GlobalOpts;
pub use ngc_logger as logger;
