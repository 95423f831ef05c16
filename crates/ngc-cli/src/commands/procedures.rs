//! `ngcpy list` and `ngcpy check`

use super::Session;
use crate::errors::CliError;
use crate::GlobalOpts;
use colored::*;
use ngc_logger as logger;

pub fn handle_list(opts: &GlobalOpts) -> Result<(), CliError> {
    let session = Session::open(opts)?;
    let names = session.bridge.callables();
    if names.is_empty() {
        logger::warn("No callables defined by the script");
        return Ok(());
    }
    if let Some(path) = session.bridge.script_path() {
        println!("{}", path.display().to_string().bold());
    }
    for name in names {
        println!("  {}", name);
    }
    Ok(())
}

/// Print whether `name` is callable; `Ok(false)` when it is not
pub fn handle_check(name: &str, opts: &GlobalOpts) -> Result<bool, CliError> {
    let session = Session::open(opts)?;
    let callable = session.bridge.is_callable(name);
    if callable {
        println!("{}: {}", name, "callable".green());
    } else {
        println!("{}: {}", name, "not callable".red());
    }
    Ok(callable)
}
