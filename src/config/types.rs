//! Configuration defaults for agentwire.

/// Default framework for a new project.
pub const DEFAULT_FRAMEWORK: &str = "crewai";

// Default value functions for serde
pub(crate) fn default_framework() -> String {
    DEFAULT_FRAMEWORK.to_string()
}
pub(crate) fn default_model() -> String {
    "openai/gpt-4o".to_string()
}
pub(crate) fn default_agents_file() -> String {
    "src/config/agents.yaml".to_string()
}
pub(crate) fn default_tasks_file() -> String {
    "src/config/tasks.yaml".to_string()
}
