//! Framework adapters.
//!
//! Each supported framework implements [`FrameworkAdapter`]. The trait has
//! no default methods, so an adapter that misses a capability does not
//! compile. Adapters are stateless; every call takes the project root
//! explicitly.

pub mod crewai;
pub mod engine;
pub mod langgraph;
pub mod openai_swarm;
pub mod registry;


pub use registry::{SUPPORTED_FRAMEWORKS, get_framework_module};

use crate::error::Result;
use crate::records::{AgentRecord, TaskRecord, ToolRecord};
use crate::validate::ValidationReport;
use std::path::{Path, PathBuf};

/// The operations every framework supports on its entrypoint.
pub trait FrameworkAdapter: Send + Sync {
    /// Registry name, e.g. `crewai`.
    fn name(&self) -> &'static str;

    /// Entrypoint path relative to the project root.
    fn entrypoint(&self) -> &'static str;

    fn get_entrypoint_path(&self, root: &Path) -> PathBuf;

    /// Collect every structural violation without failing.
    fn check_project(&self, root: &Path) -> Result<ValidationReport>;

    /// `ValidationError` unless the entrypoint satisfies every invariant.
    fn validate_project(&self, root: &Path) -> Result<()>;

    /// Insert an agent method. Its tool list starts with the agent's
    /// declared tools.
    fn add_agent(&self, root: &Path, agent: &AgentRecord) -> Result<()>;

    fn add_task(&self, root: &Path, task: &TaskRecord) -> Result<()>;

    /// Bind `tool` to `agent_name`. Idempotent; `ValidationError` when the
    /// agent has no binding site.
    fn add_tool(&self, root: &Path, tool: &ToolRecord, agent_name: &str) -> Result<()>;

    /// Unbind `tool` from `agent_name`. Absent bindings are a no-op.
    fn remove_tool(&self, root: &Path, tool: &ToolRecord, agent_name: &str) -> Result<()>;

    fn get_agent_tool_names(&self, root: &Path, agent_name: &str) -> Result<Vec<String>>;

    fn get_agent_names(&self, root: &Path) -> Result<Vec<String>>;

    fn get_task_names(&self, root: &Path) -> Result<Vec<String>>;
}
