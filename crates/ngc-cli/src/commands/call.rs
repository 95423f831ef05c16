use super::Session;
use crate::errors::CliError;
use crate::GlobalOpts;
use colored::*;
use ngc_python::canon::ControlPoint;
use ngc_python::{CallOutcome, CanonArg, CanonRecord, CALL_ARITY};
use serde::Serialize;

/// Result of `ngcpy call --json`
#[derive(Debug, Serialize)]
pub struct CallReport {
    pub procedure: String,
    pub value: Option<f64>,
    pub canon: Vec<String>,
}

/// Pad user arguments to the fixed oword arity
pub fn call_args(given: &[f64]) -> Result<[f64; CALL_ARITY], CliError> {
    if given.len() > CALL_ARITY {
        return Err(CliError::TooManyArguments {
            given: given.len(),
            max: CALL_ARITY,
        });
    }
    let mut args = [0.0; CALL_ARITY];
    args[..given.len()].copy_from_slice(given);
    Ok(args)
}

pub fn handle_call(
    name: &str,
    given: &[f64],
    json: bool,
    opts: &GlobalOpts,
) -> Result<(), CliError> {
    let args = call_args(given)?;
    let session = Session::open(opts)?;
    tracing::debug!(procedure = name, given = given.len(), "calling procedure");

    session.interp.lock().enter_call(&args);
    let outcome = session.bridge.invoke(name, &args);
    session.interp.lock().leave_call();
    let outcome = outcome?;
    tracing::debug!(procedure = name, value = ?outcome.value(), "procedure returned");

    let canon: Vec<String> = session
        .canon
        .lock()
        .take_calls()
        .iter()
        .map(format_record)
        .collect();

    if json {
        let report = CallReport {
            procedure: name.to_string(),
            value: outcome.value(),
            canon,
        };
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(e) => ngc_logger::error(&format!("Failed to serialize report: {}", e)),
        }
        return Ok(());
    }

    match outcome {
        CallOutcome::Value(value) => println!("{} -> {}", name.bold(), value),
        CallOutcome::NoValue => println!("{} -> {}", name.bold(), "(no value)".dimmed()),
    }
    for line in &canon {
        println!("  {}", line.cyan());
    }
    Ok(())
}

/// Render a recorded canon call as `NAME(arg, ...)`
pub fn format_record(record: &CanonRecord) -> String {
    let args: Vec<String> = record.args.iter().map(format_arg).collect();
    format!("{}({})", record.name, args.join(", "))
}

fn format_arg(arg: &CanonArg) -> String {
    match arg {
        CanonArg::Int(v) => v.to_string(),
        CanonArg::Double(v) => format!("{:?}", v),
        CanonArg::Bool(v) => String::from(if *v { "True" } else { "False" }),
        CanonArg::Text(v) => format!("{:?}", v),
        CanonArg::Pose(pose) => {
            let values: Vec<String> = pose.iter().map(|v| format!("{:?}", v)).collect();
            format!("[{}]", values.join(", "))
        }
        CanonArg::ControlPoints(points) => {
            let points: Vec<String> = points
                .iter()
                .map(|ControlPoint { x, y, weight }| format!("({:?}, {:?}, {:?})", x, y, weight))
                .collect();
            format!("[{}]", points.join(", "))
        }
    }
}
