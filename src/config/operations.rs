//! Config loading, validation, and utility operations.

use super::model::Config;
use crate::error::{AgentwireError, Result};
use crate::fs::atomic_write_file;
use std::path::Path;

impl Config {
    /// File name of the project config, at the project root.
    pub const FILE_NAME: &'static str = "agentwire.yaml";

    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the agentwire.yaml file
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(AgentwireError::UserError)` - Parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            AgentwireError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file means all defaults.
        let config: Config = if yaml.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(yaml).map_err(|e| {
                AgentwireError::UserError(format!("failed to parse config YAML: {}", e))
            })?
        };

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            AgentwireError::UserError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate and atomically write the config to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.validate()?;
        atomic_write_file(path, &self.to_yaml()?)
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `framework` must be non-empty (whether it is supported is decided
    ///   when the adapter is resolved)
    /// - `default_model` must be `provider/model`
    /// - `agents_file` and `tasks_file` must be relative paths
    /// - `tools` entries must be identifiers
    pub fn validate(&self) -> Result<()> {
        if self.framework.trim().is_empty() {
            return Err(AgentwireError::UserError(
                "config validation failed: framework must not be empty".to_string(),
            ));
        }

        match self.default_model.split_once('/') {
            Some((provider, model)) if !provider.is_empty() && !model.is_empty() => {}
            _ => {
                return Err(AgentwireError::UserError(format!(
                    "config validation failed: default_model must look like 'provider/model' (found '{}')",
                    self.default_model
                )));
            }
        }

        for (field, value) in [
            ("agents_file", &self.agents_file),
            ("tasks_file", &self.tasks_file),
        ] {
            if value.is_empty() || Path::new(value).is_absolute() {
                return Err(AgentwireError::UserError(format!(
                    "config validation failed: {} must be a non-empty path relative to the project root (found '{}')",
                    field, value
                )));
            }
        }

        for tool in &self.tools {
            crate::records::validate_identifier("tool", tool).map_err(|e| {
                AgentwireError::UserError(format!("config validation failed: {}", e))
            })?;
        }

        Ok(())
    }

    /// Record `tool` as installed. Returns false if it already was.
    pub fn add_tool(&mut self, tool: &str) -> bool {
        if self.tools.iter().any(|t| t == tool) {
            return false;
        }
        self.tools.push(tool.to_string());
        true
    }

    /// Forget `tool`. Returns false if it was not installed.
    pub fn remove_tool(&mut self, tool: &str) -> bool {
        let before = self.tools.len();
        self.tools.retain(|t| t != tool);
        self.tools.len() != before
    }
}
