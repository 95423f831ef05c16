//! Typed view of values crossing back from Python

use pyo3::prelude::*;
use pyo3::types::{PyBool, PyFloat, PyInt, PyString};

/// A Python value classified for the host
#[derive(Debug, Clone, PartialEq)]
pub enum PyValue {
    None,
    Number(f64),
    /// An `int` with no finite `float` counterpart, kept as its decimal text
    IntOverflow(String),
    Text(String),
    Other { type_name: String, repr: String },
}

impl PyValue {
    /// Classify a Python object
    ///
    /// `bool` is a subclass of `int` in Python but is not treated as a number.
    pub fn from_bound(obj: &Bound<'_, PyAny>) -> Self {
        if obj.is_none() {
            return PyValue::None;
        }
        if !obj.is_instance_of::<PyBool>()
            && (obj.is_instance_of::<PyFloat>() || obj.is_instance_of::<PyInt>())
        {
            if let Ok(number) = obj.extract::<f64>() {
                return PyValue::Number(number);
            }
            if obj.is_instance_of::<PyInt>() {
                return PyValue::IntOverflow(display_of(obj));
            }
        }
        if obj.is_instance_of::<PyString>() {
            if let Ok(text) = obj.extract::<String>() {
                return PyValue::Text(text);
            }
        }
        PyValue::Other {
            type_name: type_name_of(obj),
            repr: display_of(obj),
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            PyValue::None => "NoneType",
            PyValue::Number(_) => "float",
            PyValue::IntOverflow(_) => "int",
            PyValue::Text(_) => "str",
            PyValue::Other { type_name, .. } => type_name,
        }
    }

    /// The value as Python's `str()` would render it
    pub fn display(&self) -> String {
        match self {
            PyValue::None => "None".to_string(),
            PyValue::Number(n) => n.to_string(),
            PyValue::IntOverflow(digits) => digits.clone(),
            PyValue::Text(text) => text.clone(),
            PyValue::Other { repr, .. } => repr.clone(),
        }
    }
}

fn type_name_of(obj: &Bound<'_, PyAny>) -> String {
    obj.get_type()
        .name()
        .map(|name| name.to_string())
        .unwrap_or_else(|_| "<unknown>".to_string())
}

fn display_of(obj: &Bound<'_, PyAny>) -> String {
    obj.str()
        .map(|s| s.to_string())
        .unwrap_or_else(|_| "<unprintable>".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyo3::ffi::c_str;

    fn classify(expr: &std::ffi::CStr) -> PyValue {
        Python::attach(|py| {
            let obj = py.eval(expr, None, None).unwrap();
            PyValue::from_bound(&obj)
        })
    }

    #[test]
    fn test_numbers() {
        assert_eq!(classify(c_str!("42.0")), PyValue::Number(42.0));
        assert_eq!(classify(c_str!("7")), PyValue::Number(7.0));
    }

    #[test]
    fn test_int_beyond_float_range() {
        let value = classify(c_str!("10**400"));
        assert!(matches!(value, PyValue::IntOverflow(ref digits) if digits.len() == 401));
        assert_eq!(value.type_name(), "int");
        assert_eq!(classify(c_str!("2**53")), PyValue::Number(9007199254740992.0));
    }

    #[test]
    fn test_none_and_text() {
        assert_eq!(classify(c_str!("None")), PyValue::None);
        assert_eq!(classify(c_str!("'oops'")), PyValue::Text("oops".to_string()));
        assert_eq!(classify(c_str!("'oops'")).type_name(), "str");
    }

    #[test]
    fn test_bool_is_not_a_number() {
        let value = classify(c_str!("True"));
        assert_eq!(value.type_name(), "bool");
        assert_eq!(value.display(), "True");
    }

    #[test]
    fn test_other_values_keep_their_type() {
        let value = classify(c_str!("[1, 2]"));
        assert_eq!(
            value,
            PyValue::Other {
                type_name: "list".to_string(),
                repr: "[1, 2]".to_string()
            }
        );
    }
}
