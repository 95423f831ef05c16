//! File and console logging shared by the bridge and the CLI
//!
//! Every message is appended to a log file (truncated once per process by
//! [`init_with_verbosity`]) and, depending on the verbosity level, echoed to
//! stderr. Messages coming out of the embedded Python runtime are tagged with
//! the `PYTHON` source so they can be told apart from host messages.

use colored::Colorize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

static LOG_FILE: Mutex<Option<PathBuf>> = Mutex::new(None);
static VERBOSITY: Mutex<u8> = Mutex::new(0);
static NO_STDOUT: Mutex<bool> = Mutex::new(false);
static CURRENT_PROCEDURE: Mutex<Option<String>> = Mutex::new(None);

/// Environment variable that overrides the log file location
pub const LOG_FILE_ENV: &str = "NGCPY_LOG_FILE";

/// Get the current verbosity level
pub fn get_verbosity() -> u8 {
    VERBOSITY.lock().ok().map(|v| *v).unwrap_or(0)
}

/// Set the verbosity level without touching the log file
pub fn set_verbosity(verbosity: u8) {
    if let Ok(mut v) = VERBOSITY.lock() {
        *v = verbosity;
    }
}

/// Get whether console echo is disabled
pub fn get_no_stdout() -> bool {
    NO_STDOUT.lock().ok().map(|v| *v).unwrap_or(false)
}

/// Disable or enable console echo
pub fn set_no_stdout(disabled: bool) {
    if let Ok(mut v) = NO_STDOUT.lock() {
        *v = disabled;
    }
}

/// Get the name of the oword procedure currently being executed
pub fn get_current_procedure() -> Option<String> {
    CURRENT_PROCEDURE.lock().ok().and_then(|guard| guard.clone())
}

/// Set the name of the oword procedure currently being executed
pub fn set_current_procedure(name: Option<String>) {
    if let Ok(mut v) = CURRENT_PROCEDURE.lock() {
        *v = name;
    }
}

/// Initialize the logger with a verbosity level
///
/// 0 = warnings and errors only, 1 = debug (-v), 2 = trace (-vv)
pub fn init_with_verbosity(verbosity: u8, no_stdout: bool) -> Result<(), String> {
    set_verbosity(verbosity);
    set_no_stdout(no_stdout);
    init()
}

fn init() -> Result<(), String> {
    let log_file = resolve_log_file()?;
    if let Some(parent) = log_file.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create log directory: {}", e))?;
    }

    // One log per run
    if log_file.exists() {
        let _ = fs::remove_file(&log_file);
    }

    let mut log_file_guard = LOG_FILE
        .lock()
        .map_err(|e| format!("Log file lock poisoned: {}", e))?;
    *log_file_guard = Some(log_file);

    Ok(())
}

fn resolve_log_file() -> Result<PathBuf, String> {
    if let Ok(path) = std::env::var(LOG_FILE_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed));
        }
    }
    Ok(get_config_dir()?.join("ngcpy.log"))
}

/// Get the config directory path
fn get_config_dir() -> Result<PathBuf, String> {
    #[cfg(not(target_os = "windows"))]
    let config_dir = dirs::home_dir()
        .ok_or("Could not determine home directory")?
        .join(".config")
        .join("ngcpy");

    #[cfg(target_os = "windows")]
    let config_dir = dirs::config_dir()
        .ok_or("Could not determine config directory")?
        .join("ngcpy");

    Ok(config_dir)
}

fn format_line(timestamp: &str, source: &str, message: &str) -> String {
    match get_current_procedure() {
        Some(procedure) => format!("[{}] [{}] ({}) {}", timestamp, source, procedure, message),
        None => format!("[{}] [{}] {}", timestamp, source, message),
    }
}

fn write_to_log(message: &str) {
    write_to_log_with_source(message, "RUST")
}

fn write_to_log_with_source(message: &str, source: &str) {
    if let Ok(log_file_guard) = LOG_FILE.lock() {
        if let Some(ref log_path) = *log_file_guard {
            if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(log_path) {
                let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
                let _ = writeln!(file, "{}", format_line(&timestamp, source, message));
            }
        }
    }
}

fn console_enabled() -> bool {
    !get_no_stdout()
}

/// Log a debug message (to console if verbose >= 1, always to file)
pub fn debug(message: &str) {
    write_to_log(&format!("DEBUG {}", message));
    if console_enabled() && get_verbosity() >= 1 {
        eprintln!("{} {}", "DEBUG:".blue().bold(), message);
    }
}

/// Log a warning message (to both file and console)
pub fn warn(message: &str) {
    write_to_log(&format!("WARN {}", message));
    if console_enabled() {
        eprintln!("{} {}", "warning:".yellow().bold(), message);
    }
}

/// Log an error message (to both file and console)
pub fn error(message: &str) {
    write_to_log(&format!("ERROR {}", message));
    if console_enabled() {
        eprintln!("{} {}", "Error:".red().bold(), message);
    }
}

/// Log a success message
pub fn success(message: &str) {
    write_to_log(&format!("SUCCESS {}", message));
    if console_enabled() {
        eprintln!("{} {}", "\u{2714}".green().bold(), message);
    }
}

/// Log a message about the embedded Python runtime
pub fn python(message: &str) {
    write_to_log_with_source(&format!("DEBUG {}", message), "PYTHON");
    if console_enabled() && get_verbosity() >= 2 {
        eprintln!("{} {}", "PYTHON:".magenta().bold(), message);
    }
}

/// Get the log file path for display
pub fn get_log_path() -> Option<PathBuf> {
    LOG_FILE.lock().ok().and_then(|guard| guard.clone())
}

/// Print the log file path to the user
pub fn show_log_path() {
    if let Some(path) = get_log_path() {
        eprintln!("Log file: {}", path.display());
    } else if let Ok(path) = resolve_log_file() {
        eprintln!("Log file: {}", path.display());
    } else {
        eprintln!("Log file location not available");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line_without_procedure() {
        let line = format_line("2024-01-01 00:00:00", "RUST", "DEBUG hello");
        if get_current_procedure().is_none() {
            assert_eq!(line, "[2024-01-01 00:00:00] [RUST] DEBUG hello");
        }
    }

    #[test]
    fn test_log_file_env_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("bridge.log");
        std::env::set_var(LOG_FILE_ENV, &path);
        let resolved = resolve_log_file().unwrap();
        std::env::remove_var(LOG_FILE_ENV);
        assert_eq!(resolved, path);
    }
}
