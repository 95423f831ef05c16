//! Canon forwarding table
//!
//! The canonical machining layer is external; embedded procedures reach it
//! through the `CanonMod` namespace. Each bound name is described by a
//! [`CanonSpec`] (argument kinds and return kind) in the static [`BOUND`]
//! table. Python arguments are converted structurally according to that signature
//! and handed to the host's [`Canon`] implementation; nothing else is checked.

mod catalogue;
pub(crate) mod module;
mod recording;

pub use catalogue::{lookup, BOUND, OMITTED};
pub use recording::{CanonRecord, RecordingCanon};

use std::fmt;

/// Nine-axis position or offset, ordered X Y Z A B C U V W
pub type Pose = [f64; 9];

/// Argument shape of a canon primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Int,
    Double,
    Bool,
    Text,
    /// Sequence of nine floats
    Pose,
    /// Sequence of `(x, y, weight)` tuples
    ControlPoints,
}

/// Return shape of a canon primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetKind {
    Unit,
    Int,
    Double,
    Bool,
    Text,
    Tool,
}

/// Name and signature of one bound primitive
#[derive(Debug, PartialEq, Eq)]
pub struct CanonSpec {
    pub name: &'static str,
    pub args: &'static [ArgKind],
    pub returns: RetKind,
}

impl CanonSpec {
    pub const fn new(name: &'static str, args: &'static [ArgKind], returns: RetKind) -> Self {
        Self {
            name,
            args,
            returns,
        }
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArgKind::Int => "int",
            ArgKind::Double => "float",
            ArgKind::Bool => "bool",
            ArgKind::Text => "str",
            ArgKind::Pose => "pose",
            ArgKind::ControlPoints => "points",
        };
        f.write_str(name)
    }
}

impl fmt::Display for RetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RetKind::Unit => "None",
            RetKind::Int => "int",
            RetKind::Double => "float",
            RetKind::Bool => "bool",
            RetKind::Text => "str",
            RetKind::Tool => "dict",
        };
        f.write_str(name)
    }
}

impl fmt::Display for CanonSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<String> = self.args.iter().map(ToString::to_string).collect();
        write!(f, "{}({}) -> {}", self.name, args.join(", "), self.returns)
    }
}

/// NURBS control point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoint {
    pub x: f64,
    pub y: f64,
    pub weight: f64,
}

/// Tool table entry as returned by `GET_EXTERNAL_TOOL_TABLE`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolEntry {
    pub toolno: i32,
    pub offset: Pose,
    pub diameter: f64,
    pub frontangle: f64,
    pub backangle: f64,
    pub orientation: i32,
}

/// A converted canon argument
#[derive(Debug, Clone, PartialEq)]
pub enum CanonArg {
    Int(i32),
    Double(f64),
    Bool(bool),
    Text(String),
    Pose(Pose),
    ControlPoints(Vec<ControlPoint>),
}

/// A canon return value
#[derive(Debug, Clone, PartialEq)]
pub enum CanonValue {
    Unit,
    Int(i32),
    Double(f64),
    Bool(bool),
    Text(String),
    Tool(ToolEntry),
}

impl CanonValue {
    /// Zero value of the given return kind
    pub fn default_for(kind: RetKind) -> Self {
        match kind {
            RetKind::Unit => CanonValue::Unit,
            RetKind::Int => CanonValue::Int(0),
            RetKind::Double => CanonValue::Double(0.0),
            RetKind::Bool => CanonValue::Bool(false),
            RetKind::Text => CanonValue::Text(String::new()),
            RetKind::Tool => CanonValue::Tool(ToolEntry::default()),
        }
    }
}

/// The host's canonical machining layer
pub trait Canon: Send {
    /// Execute one primitive; `args` already match `spec.args`
    fn call(&mut self, spec: &'static CanonSpec, args: &[CanonArg]) -> Result<CanonValue, String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_display() {
        let spec = lookup("SET_AUX_OUTPUT_VALUE").unwrap();
        assert_eq!(spec.to_string(), "SET_AUX_OUTPUT_VALUE(int, float) -> None");
        assert_eq!(spec.arity(), 2);
    }

    #[test]
    fn test_default_values_follow_kind() {
        assert_eq!(CanonValue::default_for(RetKind::Double), CanonValue::Double(0.0));
        assert_eq!(CanonValue::default_for(RetKind::Unit), CanonValue::Unit);
    }
}
