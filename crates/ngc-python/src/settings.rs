//! Bridge-owned settings read once at initialization

use crate::errors::BridgeError;
use ngc_config::Config;
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Which script to load and what to pass every procedure
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BridgeSettings {
    /// Script file, relative to `module_dir` unless absolute
    pub module: Option<String>,
    pub module_dir: Option<PathBuf>,
    /// Keyword arguments passed to every invocation
    pub kwargs: Map<String, Value>,
}

impl BridgeSettings {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: Some(module.into()),
            ..Self::default()
        }
    }

    pub fn with_module_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.module_dir = Some(dir.into());
        self
    }

    pub fn with_kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.kwargs.insert(name.into(), value.into());
        self
    }

    /// Build settings from the config file
    pub fn from_config(config: &Config) -> Result<Self, BridgeError> {
        let mut kwargs = Map::new();
        for (name, value) in &config.kwargs {
            let value = serde_json::to_value(value)
                .map_err(|e| BridgeError::Serialization(format!("kwargs.{}: {}", name, e)))?;
            kwargs.insert(name.clone(), value);
        }
        Ok(Self {
            module: config.module.clone(),
            module_dir: config.module_dir_path(),
            kwargs,
        })
    }

    /// Module name as used in messages; empty when unset
    pub fn module_name(&self) -> &str {
        self.module.as_deref().map(str::trim).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.set("module", "remap.py".to_string()).unwrap();
        config.set("module-dir", "/opt/ngc".to_string()).unwrap();
        config.set("kwargs.feed", "12.5".to_string()).unwrap();
        config.set("kwargs.mode", "rough".to_string()).unwrap();

        let settings = BridgeSettings::from_config(&config).unwrap();
        assert_eq!(settings.module_name(), "remap.py");
        assert_eq!(settings.module_dir, Some(PathBuf::from("/opt/ngc")));
        assert_eq!(settings.kwargs.get("feed"), Some(&Value::from(12.5)));
        assert_eq!(settings.kwargs.get("mode"), Some(&Value::from("rough")));
    }

    #[test]
    fn test_builder() {
        let settings = BridgeSettings::new(" toolchange.py ")
            .with_module_dir("/tmp")
            .with_kwarg("retries", 3);
        assert_eq!(settings.module_name(), "toolchange.py");
        assert_eq!(settings.kwargs.len(), 1);
        assert_eq!(BridgeSettings::default().module_name(), "");
    }
}
