//! Host interpreter interface
//!
//! The G-code interpreter itself lives outside this crate. [`Interpreter`] is
//! the narrow surface the bridge needs from it; [`StandaloneInterp`] is an
//! in-memory implementation used by the CLI and the tests.

use crate::setup::Setup;
use ngc_logger as logger;
use std::fs;
use std::path::PathBuf;

/// What the bridge needs from the interpreter it is attached to
pub trait Interpreter: Send {
    fn setup(&self) -> &Setup;

    fn setup_mut(&mut self) -> &mut Setup;

    /// Line number of the block currently being read ahead
    fn sequence_number(&self) -> i32;

    /// Oword call nesting depth
    fn call_level(&self) -> i32;

    /// Re-read the tool table from its backing store
    fn load_tool_table(&mut self) -> Result<(), String>;

    /// Resynchronize interpreter state with the machine
    fn synch(&mut self) -> Result<(), String>;

    /// The interpreter's error channel; messages are complete and prefixed
    fn report_error(&mut self, message: &str);
}

/// One row of a tool table file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolRow {
    pub toolno: i32,
    pub pocket: i32,
    pub z_offset: f64,
    pub diameter: f64,
    pub comment: Option<String>,
}

/// Parse a tool table in the `T<n> P<n> Z<off> D<dia> ;comment` format
///
/// Unknown words are ignored; lines without a `T` word are skipped.
pub fn parse_tool_table(content: &str) -> Result<Vec<ToolRow>, String> {
    let mut rows = Vec::new();
    for (lineno, raw) in content.lines().enumerate() {
        let (body, comment) = match raw.split_once(';') {
            Some((body, comment)) => (body, Some(comment.trim().to_string())),
            None => (raw, None),
        };
        let mut row = ToolRow {
            comment: comment.filter(|c| !c.is_empty()),
            ..ToolRow::default()
        };
        let mut has_tool = false;
        for word in body.split_whitespace() {
            let mut chars = word.chars();
            let Some(letter) = chars.next() else {
                continue;
            };
            let value = chars.as_str();
            let bad = |e: &dyn std::fmt::Display| {
                format!("line {}: bad word '{}': {}", lineno + 1, word, e)
            };
            match letter.to_ascii_uppercase() {
                'T' => {
                    row.toolno = value.parse().map_err(|e| bad(&e))?;
                    has_tool = true;
                }
                'P' => row.pocket = value.parse().map_err(|e| bad(&e))?,
                'Z' => row.z_offset = value.parse().map_err(|e| bad(&e))?,
                'D' => row.diameter = value.parse().map_err(|e| bad(&e))?,
                _ => {}
            }
        }
        if has_tool {
            rows.push(row);
        }
    }
    Ok(rows)
}

/// Minimal interpreter for driving the bridge outside a controller
#[derive(Debug, Default)]
pub struct StandaloneInterp {
    setup: Setup,
    sequence_number: i32,
    call_level: i32,
    tool_table_path: Option<PathBuf>,
    tools: Vec<ToolRow>,
    synch_count: u32,
    errors: Vec<String>,
}

impl StandaloneInterp {
    pub fn new(parameter_slots: usize) -> Self {
        Self {
            setup: Setup::with_parameter_slots(parameter_slots),
            ..Self::default()
        }
    }

    pub fn with_tool_table(mut self, path: impl Into<PathBuf>) -> Self {
        self.tool_table_path = Some(path.into());
        self
    }

    pub fn set_sequence_number(&mut self, line: i32) {
        self.sequence_number = line;
    }

    /// Enter an oword call: bump the nesting depth and bind the call arguments
    pub fn enter_call(&mut self, args: &[f64]) {
        self.call_level += 1;
        self.setup.parameters.load(args);
    }

    pub fn leave_call(&mut self) {
        self.call_level = (self.call_level - 1).max(0);
    }

    pub fn tools(&self) -> &[ToolRow] {
        &self.tools
    }

    pub fn synch_count(&self) -> u32 {
        self.synch_count
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn take_errors(&mut self) -> Vec<String> {
        std::mem::take(&mut self.errors)
    }
}

impl Interpreter for StandaloneInterp {
    fn setup(&self) -> &Setup {
        &self.setup
    }

    fn setup_mut(&mut self) -> &mut Setup {
        &mut self.setup
    }

    fn sequence_number(&self) -> i32 {
        self.sequence_number
    }

    fn call_level(&self) -> i32 {
        self.call_level
    }

    fn load_tool_table(&mut self) -> Result<(), String> {
        let Some(path) = self.tool_table_path.as_ref() else {
            return Err("no tool table configured".to_string());
        };
        let content = fs::read_to_string(path)
            .map_err(|e| format!("can't read tool table '{}': {}", path.display(), e))?;
        self.tools = parse_tool_table(&content)?;
        logger::debug(&format!(
            "Loaded {} tools from {}",
            self.tools.len(),
            path.display()
        ));
        Ok(())
    }

    fn synch(&mut self) -> Result<(), String> {
        self.synch_count += 1;
        Ok(())
    }

    fn report_error(&mut self, message: &str) {
        logger::error(message);
        self.errors.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tool_table() {
        let rows = parse_tool_table(
            "T1 P1 Z0.511 D0.125 ;1/8 end mill\n\nT2 P5 D0.0625\n; just a comment\n",
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].toolno, 1);
        assert_eq!(rows[0].z_offset, 0.511);
        assert_eq!(rows[0].comment.as_deref(), Some("1/8 end mill"));
        assert_eq!(rows[1].pocket, 5);
        assert_eq!(rows[1].comment, None);
    }

    #[test]
    fn test_parse_tool_table_bad_word() {
        let err = parse_tool_table("T1 Pxx\n").unwrap_err();
        assert!(err.contains("line 1"));
    }

    #[test]
    fn test_load_tool_table_without_path() {
        let mut interp = StandaloneInterp::new(30);
        assert!(interp.load_tool_table().is_err());
    }

    #[test]
    fn test_load_tool_table_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tool.tbl");
        fs::write(&path, "T7 P3 Z1.0 D0.5\n").unwrap();

        let mut interp = StandaloneInterp::new(30).with_tool_table(&path);
        interp.load_tool_table().unwrap();
        assert_eq!(interp.tools()[0].toolno, 7);
    }

    #[test]
    fn test_enter_and_leave_call() {
        let mut interp = StandaloneInterp::new(3);
        interp.enter_call(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(interp.call_level(), 1);
        assert_eq!(interp.setup().parameters.as_slice(), &[1.0, 2.0, 3.0]);
        interp.leave_call();
        interp.leave_call();
        assert_eq!(interp.call_level(), 0);
    }

    #[test]
    fn test_report_error_collects() {
        let mut interp = StandaloneInterp::new(1);
        interp.report_error("pycall: boom");
        assert_eq!(interp.take_errors(), vec!["pycall: boom".to_string()]);
        assert!(interp.errors().is_empty());
    }
}
