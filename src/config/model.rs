//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};

/// Configuration for an agentwire project.
///
/// This struct represents the contents of `agentwire.yaml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Framework the project is generated for (selects the adapter).
    #[serde(default = "default_framework")]
    pub framework: String,

    /// Model used for new agents that do not name one, as `provider/model`.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Names of the tools installed in the project.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,

    /// Agent definitions, relative to the project root.
    #[serde(default = "default_agents_file")]
    pub agents_file: String,

    /// Task definitions, relative to the project root.
    #[serde(default = "default_tasks_file")]
    pub tasks_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            framework: default_framework(),
            default_model: default_model(),
            tools: Vec::new(),
            agents_file: default_agents_file(),
            tasks_file: default_tasks_file(),
        }
    }
}
