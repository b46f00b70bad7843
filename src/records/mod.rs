//! Agent, task and tool records.
//!
//! Records are the already-parsed descriptions the engine works from. The
//! engine never reads them from disk itself; `io` does that for the CLI.

pub mod io;


use crate::error::{AgentwireError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("Invalid identifier regex"));

/// Python keywords that cannot be used as method names.
const RESERVED: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

/// Check that `name` can be used as a Python identifier in the entrypoint.
pub fn validate_identifier(kind: &str, name: &str) -> Result<()> {
    if !IDENTIFIER.is_match(name) || RESERVED.contains(&name) {
        return Err(AgentwireError::UserError(format!(
            "invalid {} name '{}': must be a Python identifier (letters, digits, underscores; not starting with a digit)",
            kind, name
        )));
    }
    Ok(())
}

/// An agent as declared in `agents.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backstory: Option<String>,

    /// Provider-qualified model name, e.g. `openai/gpt-4o`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm: Option<String>,

    /// Tools the agent starts out with, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,
}

impl AgentRecord {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_identifier("agent", &name)?;
        Ok(Self {
            name,
            role: None,
            goal: None,
            backstory: None,
            llm: None,
            tools: Vec::new(),
        })
    }

    /// Declared tools with duplicates dropped, first occurrence wins.
    pub fn declared_tools(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for tool in &self.tools {
            if !seen.contains(&tool.as_str()) {
                seen.push(tool);
            }
        }
        seen
    }
}

/// A task as declared in `tasks.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub name: String,

    /// Agent that performs the task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_output: Option<String>,
}

impl TaskRecord {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_identifier("task", &name)?;
        Ok(Self {
            name,
            agent: None,
            description: None,
            expected_output: None,
        })
    }
}

/// An installable tool: a name plus the callables it exports.
///
/// Only constructible through [`ToolRecord::new`] (or deserialization, which
/// goes through it), so the callable list is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawToolRecord")]
pub struct ToolRecord {
    pub name: String,
    pub category: String,
    pub tools: Vec<String>,
}

#[derive(Deserialize)]
struct RawToolRecord {
    name: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    tools: Vec<String>,
}

impl TryFrom<RawToolRecord> for ToolRecord {
    type Error = AgentwireError;

    fn try_from(raw: RawToolRecord) -> Result<Self> {
        ToolRecord::new(raw.name, raw.category, raw.tools)
    }
}

impl ToolRecord {
    /// Build a tool record.
    ///
    /// # Returns
    ///
    /// * `Err(AgentwireError::UserError)` - The name is not an identifier, or
    ///   the tool exports no callables
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        tools: Vec<String>,
    ) -> Result<Self> {
        let name = name.into();
        validate_identifier("tool", &name)?;
        if tools.is_empty() {
            return Err(AgentwireError::UserError(format!(
                "tool '{}' must export at least one callable",
                name
            )));
        }
        for callable in &tools {
            validate_identifier("tool callable", callable)?;
        }
        Ok(Self {
            name,
            category: category.into(),
            tools,
        })
    }

    /// Parse a JSON tool definition (`{"name": ..., "category": ..., "tools": [...]}`).
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| AgentwireError::UserError(format!("invalid tool definition: {}", e)))
    }
}
