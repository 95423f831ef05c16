//! Configuration for the ngcpy oword bridge
//!
//! The configuration is a small TOML file:
//!
//! ```toml
//! module = "remap.py"
//! module-dir = "/home/cnc/nc_files/python"
//! parameter-slots = 30
//!
//! [kwargs]
//! feed = 120.0
//! ```
//!
//! `$NGCPY_CONFIG` overrides the file location, which is useful for tests and
//! for running several machine configurations side by side.

pub mod module_paths;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default size of the standalone interpreter's parameter table
pub const DEFAULT_PARAMETER_SLOTS: usize = 30;

/// Environment variable holding an explicit config file path
pub const CONFIG_ENV: &str = "NGCPY_CONFIG";

/// Keys accepted by [`Config::get`] and [`Config::set`]
pub const CONFIG_KEYS: &[&str] = &["module", "module-dir", "parameter-slots", "tool-table"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Unknown config key '{0}'")]
    UnknownKey(String),

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter_slots: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_table: Option<String>,
    /// Keyword extras passed to every oword procedure
    #[serde(default, skip_serializing_if = "toml::Table::is_empty")]
    pub kwargs: toml::Table,
}

impl Config {
    pub fn path() -> PathBuf {
        if let Ok(env_path) = std::env::var(CONFIG_ENV) {
            let trimmed = env_path.trim();
            if !trimmed.is_empty() {
                return PathBuf::from(trimmed);
            }
        }

        #[cfg(not(target_os = "windows"))]
        let base = dirs::home_dir().map(|home| home.join(".config"));

        #[cfg(target_os = "windows")]
        let base = dirs::config_dir();

        base.unwrap_or_else(|| PathBuf::from("."))
            .join("ngcpy")
            .join("ngcpy.toml")
    }

    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Size of the standalone interpreter's parameter table
    pub fn parameter_slots(&self) -> usize {
        self.parameter_slots.unwrap_or(DEFAULT_PARAMETER_SLOTS)
    }

    pub fn module_dir_path(&self) -> Option<PathBuf> {
        self.module_dir.as_ref().map(PathBuf::from)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "module" => self.module.clone(),
            "module-dir" => self.module_dir.clone(),
            "parameter-slots" => self.parameter_slots.map(|n| n.to_string()),
            "tool-table" => self.tool_table.clone(),
            _ => key
                .strip_prefix("kwargs.")
                .and_then(|name| self.kwargs.get(name))
                .map(|value| value.to_string()),
        }
    }

    /// Set a key; `kwargs.<name>` keys take a TOML literal (strings may be bare)
    pub fn set(&mut self, key: &str, value: String) -> Result<(), ConfigError> {
        match key {
            "module" => self.module = Some(value),
            "module-dir" => self.module_dir = Some(value),
            "parameter-slots" => {
                let slots = value
                    .trim()
                    .parse::<usize>()
                    .map_err(|e| ConfigError::InvalidValue {
                        key: key.to_string(),
                        reason: e.to_string(),
                    })?;
                if slots == 0 {
                    return Err(ConfigError::InvalidValue {
                        key: key.to_string(),
                        reason: "must be at least 1".to_string(),
                    });
                }
                self.parameter_slots = Some(slots);
            }
            "tool-table" => self.tool_table = Some(value),
            _ => match key.strip_prefix("kwargs.") {
                Some(name) if !name.is_empty() => {
                    self.kwargs.insert(name.to_string(), parse_literal(&value));
                }
                _ => return Err(ConfigError::UnknownKey(key.to_string())),
            },
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.module.is_none()
            && self.module_dir.is_none()
            && self.parameter_slots.is_none()
            && self.tool_table.is_none()
            && self.kwargs.is_empty()
    }

    pub fn values_iter(&self) -> Vec<(String, String)> {
        let mut values = Vec::new();
        for key in CONFIG_KEYS {
            if let Some(val) = self.get(key) {
                values.push(((*key).to_string(), val));
            }
        }
        for (name, value) in &self.kwargs {
            values.push((format!("kwargs.{}", name), value.to_string()));
        }
        values
    }
}

/// Parse a TOML literal such as `1.5`, `true` or `"text"`, falling back to a plain string
fn parse_literal(raw: &str) -> toml::Value {
    let document = format!("value = {}", raw.trim());
    toml::from_str::<toml::Table>(&document)
        .ok()
        .and_then(|mut table| table.remove("value"))
        .unwrap_or_else(|| toml::Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_slots() {
        let config = Config::default();
        assert_eq!(config.parameter_slots(), 30);
        assert!(config.is_empty());
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sub").join("ngcpy.toml");

        let mut config = Config::default();
        config.set("module", "remap.py".to_string()).unwrap();
        config.set("module-dir", "/opt/python".to_string()).unwrap();
        config.set("kwargs.feed", "120.5".to_string()).unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.kwargs.get("feed"), Some(&toml::Value::Float(120.5)));
    }

    #[test]
    fn test_parse_kwargs_table() {
        let config: Config = toml::from_str(
            r#"
module = "remap.py"

[kwargs]
retract = 2
label = "pocket"
"#,
        )
        .unwrap();
        assert_eq!(config.module.as_deref(), Some("remap.py"));
        assert_eq!(config.kwargs.get("retract"), Some(&toml::Value::Integer(2)));
        assert_eq!(config.get("kwargs.label").as_deref(), Some("\"pocket\""));
    }

    #[test]
    fn test_bare_kwarg_string() {
        let mut config = Config::default();
        config.set("kwargs.mode", "fast".to_string()).unwrap();
        assert_eq!(
            config.kwargs.get("mode"),
            Some(&toml::Value::String("fast".to_string()))
        );
    }

    #[test]
    fn test_invalid_slots_rejected() {
        let mut config = Config::default();
        assert!(matches!(
            config.set("parameter-slots", "zero".to_string()),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(config.set("parameter-slots", "0".to_string()).is_err());
        config.set("parameter-slots", "40".to_string()).unwrap();
        assert_eq!(config.parameter_slots(), 40);
    }

    #[test]
    fn test_unknown_key() {
        let mut config = Config::default();
        assert!(matches!(
            config.set("pydir", "x".to_string()),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(config.get("pydir").is_none());
    }

    #[test]
    fn test_missing_file_gives_default() {
        let dir = TempDir::new().unwrap();
        let loaded = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert!(loaded.is_empty());
    }
}
