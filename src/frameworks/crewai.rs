//! crewai: agents and tasks are methods of a `@CrewBase` class.

use super::FrameworkAdapter;
use super::engine::Engine;
use crate::error::Result;
use crate::locate::{EntryShape, KeywordShape, ShapeRules, SiteShape};
use crate::records::{AgentRecord, TaskRecord, ToolRecord};
use crate::validate::ValidationReport;
use std::path::{Path, PathBuf};

pub const RULES: ShapeRules = ShapeRules {
    container_decorator: "CrewBase",
    agent_decorator: "agent",
    task_decorator: "task",
    entry: EntryShape::Decorated("crew"),
    tool_site: SiteShape::KeywordList(KeywordShape {
        callee: "Agent",
        keyword: "tools",
    }),
    linked_sites: &[],
    task_agent_keyword: Some(KeywordShape {
        callee: "Task",
        keyword: "agent",
    }),
};

const ENGINE: Engine = Engine {
    framework: "crewai",
    entrypoint: "src/crew.py",
    rules: RULES,
    agent_template: agent_method,
    task_template: task_method,
};

fn agent_method(agent: &AgentRecord, tools: &str) -> String {
    format!(
        r#"@agent
def {name}(self) -> Agent:
    return Agent(
        config=self.agents_config['{name}'],
        tools=[{tools}],
        verbose=True,
    )"#,
        name = agent.name,
        tools = tools,
    )
}

fn task_method(task: &TaskRecord) -> String {
    let agent = task
        .agent
        .as_deref()
        .map(|agent| format!("\n        agent=self.{}(),", agent))
        .unwrap_or_default();
    format!(
        r#"@task
def {name}(self) -> Task:
    return Task(
        config=self.tasks_config['{name}'],{agent}
    )"#,
        name = task.name,
        agent = agent,
    )
}

/// The crewai adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrewAi;

impl FrameworkAdapter for CrewAi {
    fn name(&self) -> &'static str {
        ENGINE.framework
    }

    fn entrypoint(&self) -> &'static str {
        ENGINE.entrypoint
    }

    fn get_entrypoint_path(&self, root: &Path) -> PathBuf {
        ENGINE.path(root)
    }

    fn check_project(&self, root: &Path) -> Result<ValidationReport> {
        ENGINE.check(root)
    }

    fn validate_project(&self, root: &Path) -> Result<()> {
        ENGINE.validate(root)
    }

    fn add_agent(&self, root: &Path, agent: &AgentRecord) -> Result<()> {
        ENGINE.add_agent(root, agent)
    }

    fn add_task(&self, root: &Path, task: &TaskRecord) -> Result<()> {
        ENGINE.add_task(root, task)
    }

    fn add_tool(&self, root: &Path, tool: &ToolRecord, agent_name: &str) -> Result<()> {
        ENGINE.add_tool(root, tool, agent_name)
    }

    fn remove_tool(&self, root: &Path, tool: &ToolRecord, agent_name: &str) -> Result<()> {
        ENGINE.remove_tool(root, tool, agent_name)
    }

    fn get_agent_tool_names(&self, root: &Path, agent_name: &str) -> Result<Vec<String>> {
        ENGINE.tool_names(root, agent_name)
    }

    fn get_agent_names(&self, root: &Path) -> Result<Vec<String>> {
        ENGINE.agent_names(root)
    }

    fn get_task_names(&self, root: &Path) -> Result<Vec<String>> {
        ENGINE.task_names(root)
    }
}
