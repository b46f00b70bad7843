use crate::config::Config;
use crate::frameworks::{FrameworkAdapter, get_framework_module};
use crate::records::io::{save_agent, save_task};
use crate::records::{AgentRecord, TaskRecord, ToolRecord};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Which fixture entrypoint to start from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fixture {
    /// Container and entry method only.
    Min,
    /// One agent with an empty tool list and one task.
    Max,
}

fn fixture_source(framework: &str, fixture: Fixture) -> &'static str {
    match (framework, fixture) {
        ("crewai", Fixture::Min) => {
            include_str!("../tests/fixtures/frameworks/crewai/entrypoint_min.py")
        }
        ("crewai", Fixture::Max) => {
            include_str!("../tests/fixtures/frameworks/crewai/entrypoint_max.py")
        }
        ("langgraph", Fixture::Min) => {
            include_str!("../tests/fixtures/frameworks/langgraph/entrypoint_min.py")
        }
        ("langgraph", Fixture::Max) => {
            include_str!("../tests/fixtures/frameworks/langgraph/entrypoint_max.py")
        }
        ("openai_swarm", Fixture::Min) => {
            include_str!("../tests/fixtures/frameworks/openai_swarm/entrypoint_min.py")
        }
        ("openai_swarm", Fixture::Max) => {
            include_str!("../tests/fixtures/frameworks/openai_swarm/entrypoint_max.py")
        }
        _ => panic!("no fixture for framework '{}'", framework),
    }
}

/// A throwaway project directory: `agentwire.yaml`, `src/config/` and the
/// framework's entrypoint copied from a fixture.
pub(crate) struct TestProject {
    temp_dir: TempDir,
    pub(crate) adapter: &'static dyn FrameworkAdapter,
}

impl TestProject {
    pub(crate) fn new(framework: &str, fixture: Fixture) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let adapter = get_framework_module(framework).unwrap();
        let root = temp_dir.path();

        std::fs::create_dir_all(root.join("src").join("config")).unwrap();
        std::fs::write(root.join("src").join("__init__.py"), "").unwrap();

        let config = Config {
            framework: framework.to_string(),
            ..Default::default()
        };
        std::fs::write(root.join(Config::FILE_NAME), config.to_yaml().unwrap()).unwrap();

        std::fs::write(
            adapter.get_entrypoint_path(root),
            fixture_source(framework, fixture),
        )
        .unwrap();

        Self { temp_dir, adapter }
    }

    pub(crate) fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub(crate) fn entrypoint_path(&self) -> PathBuf {
        self.adapter.get_entrypoint_path(self.root())
    }

    pub(crate) fn entrypoint_source(&self) -> String {
        std::fs::read_to_string(self.entrypoint_path()).unwrap()
    }

    /// Agent `agent_name`, also written to `src/config/agents.yaml`.
    pub(crate) fn test_agent(&self) -> AgentRecord {
        let mut agent = AgentRecord::new("agent_name").unwrap();
        agent.role = Some("agent_role".to_string());
        agent.goal = Some("agent_goal".to_string());
        agent.backstory = Some("agent_backstory".to_string());
        agent.llm = Some("openai/gpt-4o".to_string());
        save_agent(&self.root().join("src/config/agents.yaml"), &agent).unwrap();
        agent
    }

    /// Task `task_name`, also written to `src/config/tasks.yaml`.
    pub(crate) fn test_task(&self) -> TaskRecord {
        let mut task = TaskRecord::new("task_name").unwrap();
        task.description = Some("task_description".to_string());
        task.expected_output = Some("task_expected_output".to_string());
        task.agent = Some("agent_name".to_string());
        save_task(&self.root().join("src/config/tasks.yaml"), &task).unwrap();
        task
    }
}

pub(crate) fn test_tool() -> ToolRecord {
    ToolRecord::new("test_tool", "test", vec!["test_tool".to_string()]).unwrap()
}

pub(crate) fn test_tool_alternate() -> ToolRecord {
    ToolRecord::new("test_tool_alt", "test", vec!["test_tool_alt".to_string()]).unwrap()
}
