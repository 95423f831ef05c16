use super::{Canon, CanonArg, CanonSpec, CanonValue};
use std::collections::HashMap;

/// One forwarded canon call
#[derive(Debug, Clone, PartialEq)]
pub struct CanonRecord {
    pub name: &'static str,
    pub args: Vec<CanonArg>,
}

/// Canon layer that records every call instead of driving a machine
///
/// Queries answer with a programmed response, or the zero value of their
/// return kind.
#[derive(Debug, Default)]
pub struct RecordingCanon {
    calls: Vec<CanonRecord>,
    responses: HashMap<String, CanonValue>,
    failures: HashMap<String, String>,
}

impl RecordingCanon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Program the value returned by `name`
    pub fn respond(&mut self, name: &str, value: CanonValue) -> &mut Self {
        self.responses.insert(name.to_string(), value);
        self
    }

    /// Make `name` fail with `message`
    pub fn fail_with(&mut self, name: &str, message: &str) -> &mut Self {
        self.failures.insert(name.to_string(), message.to_string());
        self
    }

    pub fn calls(&self) -> &[CanonRecord] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<CanonRecord> {
        std::mem::take(&mut self.calls)
    }
}

impl Canon for RecordingCanon {
    fn call(&mut self, spec: &'static CanonSpec, args: &[CanonArg]) -> Result<CanonValue, String> {
        tracing::debug!(canon = spec.name, args = ?args, "canon call");
        self.calls.push(CanonRecord {
            name: spec.name,
            args: args.to_vec(),
        });
        if let Some(message) = self.failures.get(spec.name) {
            return Err(message.clone());
        }
        Ok(self
            .responses
            .get(spec.name)
            .cloned()
            .unwrap_or_else(|| CanonValue::default_for(spec.returns)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canon::lookup;

    #[test]
    fn test_records_calls_in_order() {
        let mut canon = RecordingCanon::new();
        let comment = lookup("COMMENT").unwrap();
        let dwell = lookup("DWELL").unwrap();
        canon
            .call(comment, &[CanonArg::Text("hi".to_string())])
            .unwrap();
        canon.call(dwell, &[CanonArg::Double(0.5)]).unwrap();

        let names: Vec<_> = canon.calls().iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["COMMENT", "DWELL"]);
        assert_eq!(canon.take_calls().len(), 2);
        assert!(canon.calls().is_empty());
    }

    #[test]
    fn test_programmed_response_and_failure() {
        let mut canon = RecordingCanon::new();
        canon
            .respond("GET_EXTERNAL_FEED_RATE", CanonValue::Double(12.5))
            .fail_with("CHANGE_TOOL", "no tool changer");

        let feed = lookup("GET_EXTERNAL_FEED_RATE").unwrap();
        assert_eq!(canon.call(feed, &[]), Ok(CanonValue::Double(12.5)));

        let plane = lookup("GET_EXTERNAL_PLANE").unwrap();
        assert_eq!(canon.call(plane, &[]), Ok(CanonValue::Int(0)));

        let change = lookup("CHANGE_TOOL").unwrap();
        assert_eq!(
            canon.call(change, &[CanonArg::Int(1)]),
            Err("no tool changer".to_string())
        );
    }
}
