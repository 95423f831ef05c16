//! Interpreter state exposed to oword procedures
//!
//! [`Setup`] is the slice of the interpreter's mutable execution state that the
//! bridge reads and writes. It is owned by the host interpreter; the bridge only
//! reaches it through [`crate::InterpContext`].

use thiserror::Error;

/// Number of numeric arguments every oword procedure receives
pub const CALL_ARITY: usize = 30;

/// Errors raised by parameter table access
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    #[error("parameter index {index} out of range (table has {len} slots)")]
    OutOfRange { index: i64, len: usize },

    #[error("named parameter '{0}' is not supported, use an integer index")]
    Unsupported(String),
}

/// Fixed-capacity numeric parameter table, addressed by integer index
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterTable {
    values: Vec<f64>,
}

impl Default for ParameterTable {
    fn default() -> Self {
        Self::new(CALL_ARITY)
    }
}

impl ParameterTable {
    /// Create a zero-filled table with `slots` entries
    pub fn new(slots: usize) -> Self {
        Self {
            values: vec![0.0; slots],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    fn slot(&self, index: i64) -> Result<usize, ParamError> {
        usize::try_from(index)
            .ok()
            .filter(|i| *i < self.values.len())
            .ok_or(ParamError::OutOfRange {
                index,
                len: self.values.len(),
            })
    }

    pub fn get(&self, index: i64) -> Result<f64, ParamError> {
        let slot = self.slot(index)?;
        Ok(self.values[slot])
    }

    pub fn set(&mut self, index: i64, value: f64) -> Result<f64, ParamError> {
        let slot = self.slot(index)?;
        self.values[slot] = value;
        Ok(value)
    }

    /// Named lookup is accepted at the API surface but not backed by a store
    pub fn get_named(&self, name: &str) -> Result<f64, ParamError> {
        Err(ParamError::Unsupported(name.to_string()))
    }

    pub fn set_named(&mut self, name: &str, _value: f64) -> Result<f64, ParamError> {
        Err(ParamError::Unsupported(name.to_string()))
    }

    /// Copy `values` into the leading slots; extra values are ignored
    pub fn load(&mut self, values: &[f64]) {
        for (slot, value) in self.values.iter_mut().zip(values) {
            *slot = *value;
        }
    }
}

/// The interpreter fields reachable from embedded code
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Setup {
    pub selected_pocket: i32,
    pub current_pocket: i32,
    pub toolchange_flag: bool,
    /// Remap call-stack depth
    pub stack_level: i32,
    /// Result of the last procedure that returned a number
    pub return_value: f64,
    pub parameters: ParameterTable,
}

impl Setup {
    pub fn with_parameter_slots(slots: usize) -> Self {
        Self {
            parameters: ParameterTable::new(slots),
            ..Self::default()
        }
    }
}
