//! Error types for the ngcpy command line

use ngc_config::ConfigError;
use ngc_python::{BridgeError, CallError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to load config: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    Call(#[from] CallError),

    #[error("too many arguments: {given} given, procedures take at most {max}")]
    TooManyArguments { given: usize, max: usize },
}

impl CliError {
    /// Whether the bridge already delivered this error on the interpreter's error channel
    pub fn reported(&self) -> bool {
        match self {
            CliError::Bridge(BridgeError::Serialization(_)) => false,
            CliError::Bridge(_) | CliError::Call(_) => true,
            CliError::Config(_) | CliError::TooManyArguments { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_many_arguments_display() {
        let err = CliError::TooManyArguments { given: 31, max: 30 };
        assert_eq!(
            err.to_string(),
            "too many arguments: 31 given, procedures take at most 30"
        );
        assert!(!err.reported());
    }

    #[test]
    fn test_bridge_errors_are_reported() {
        assert!(CliError::Bridge(BridgeError::NoModule).reported());
        assert!(!CliError::Bridge(BridgeError::Serialization("x".to_string())).reported());
    }
}
