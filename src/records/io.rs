//! Loading and saving records.
//!
//! `agents.yaml` and `tasks.yaml` are maps keyed by name, in declaration
//! order:
//!
//! ```yaml
//! researcher:
//!   role: Senior researcher
//!   llm: openai/gpt-4o
//! ```
//!
//! A missing file is an empty collection. Tool definitions are JSON files.

use super::{AgentRecord, TaskRecord, ToolRecord, validate_identifier};
use crate::error::{AgentwireError, Result};
use crate::fs::atomic_write_file;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use std::path::Path;

/// Load every agent in `path`, in file order.
pub fn load_agents(path: &Path) -> Result<Vec<AgentRecord>> {
    load_records(path, "agent")
}

/// Load every task in `path`, in file order.
pub fn load_tasks(path: &Path) -> Result<Vec<TaskRecord>> {
    load_records(path, "task")
}

/// Load the agent named `name`.
pub fn find_agent(path: &Path, name: &str) -> Result<AgentRecord> {
    load_agents(path)?
        .into_iter()
        .find(|agent| agent.name == name)
        .ok_or_else(|| {
            AgentwireError::NotFound(format!("agent '{}' in {}", name, path.display()))
        })
}

/// Load the task named `name`.
pub fn find_task(path: &Path, name: &str) -> Result<TaskRecord> {
    load_tasks(path)?
        .into_iter()
        .find(|task| task.name == name)
        .ok_or_else(|| AgentwireError::NotFound(format!("task '{}' in {}", name, path.display())))
}

/// Insert or replace `agent` in `path`. A replaced entry keeps its position.
pub fn save_agent(path: &Path, agent: &AgentRecord) -> Result<()> {
    save_record(path, &agent.name, agent)
}

/// Insert or replace `task` in `path`. A replaced entry keeps its position.
pub fn save_task(path: &Path, task: &TaskRecord) -> Result<()> {
    save_record(path, &task.name, task)
}

/// Load a JSON tool definition.
pub fn load_tool(path: &Path) -> Result<ToolRecord> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        AgentwireError::UserError(format!(
            "failed to read tool definition '{}': {}",
            path.display(),
            e
        ))
    })?;
    ToolRecord::from_json(&content).map_err(|e| {
        AgentwireError::UserError(format!("{}: {}", path.display(), e))
    })
}

fn read_mapping(path: &Path) -> Result<Mapping> {
    if !path.exists() {
        return Ok(Mapping::new());
    }
    let content = std::fs::read_to_string(path).map_err(|e| {
        AgentwireError::UserError(format!("failed to read '{}': {}", path.display(), e))
    })?;
    if content.trim().is_empty() {
        return Ok(Mapping::new());
    }

    match serde_yaml::from_str::<Value>(&content) {
        Ok(Value::Mapping(mapping)) => Ok(mapping),
        Ok(Value::Null) => Ok(Mapping::new()),
        Ok(_) => Err(AgentwireError::UserError(format!(
            "'{}' must be a mapping of names to definitions",
            path.display()
        ))),
        Err(e) => Err(AgentwireError::UserError(format!(
            "failed to parse '{}': {}",
            path.display(),
            e
        ))),
    }
}

fn load_records<T: DeserializeOwned>(path: &Path, kind: &str) -> Result<Vec<T>> {
    let mut records = Vec::new();
    for (key, value) in read_mapping(path)? {
        let Some(name) = key.as_str() else {
            return Err(AgentwireError::UserError(format!(
                "'{}': {} names must be strings",
                path.display(),
                kind
            )));
        };
        validate_identifier(kind, name)?;

        let mut fields = match value {
            Value::Mapping(fields) => fields,
            Value::Null => Mapping::new(),
            _ => {
                return Err(AgentwireError::UserError(format!(
                    "'{}': {} '{}' must be a mapping",
                    path.display(),
                    kind,
                    name
                )));
            }
        };
        fields.insert(Value::from("name"), Value::from(name));

        let record = serde_yaml::from_value(Value::Mapping(fields)).map_err(|e| {
            AgentwireError::UserError(format!(
                "'{}': invalid {} '{}': {}",
                path.display(),
                kind,
                name,
                e
            ))
        })?;
        records.push(record);
    }
    Ok(records)
}

fn save_record<T: Serialize>(path: &Path, name: &str, record: &T) -> Result<()> {
    let mut mapping = read_mapping(path)?;

    let mut fields = match serde_yaml::to_value(record) {
        Ok(Value::Mapping(fields)) => fields,
        Ok(_) => Mapping::new(),
        Err(e) => {
            return Err(AgentwireError::UserError(format!(
                "failed to serialize '{}': {}",
                name, e
            )));
        }
    };
    fields.remove("name");

    // `insert` on an existing key replaces the value in place.
    mapping.insert(Value::from(name), Value::Mapping(fields));

    let yaml = serde_yaml::to_string(&mapping).map_err(|e| {
        AgentwireError::UserError(format!("failed to serialize '{}': {}", path.display(), e))
    })?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            AgentwireError::UserError(format!(
                "failed to create directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }
    atomic_write_file(path, &yaml)
}
