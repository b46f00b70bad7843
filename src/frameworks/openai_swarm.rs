//! openai_swarm: an `@agentstack.swarm` class whose agent methods return
//! `Agent(functions=[...])`.

use super::FrameworkAdapter;
use super::engine::Engine;
use crate::error::Result;
use crate::locate::{EntryShape, KeywordShape, ShapeRules, SiteShape};
use crate::records::{AgentRecord, TaskRecord, ToolRecord};
use crate::validate::ValidationReport;
use std::path::{Path, PathBuf};

pub const RULES: ShapeRules = ShapeRules {
    container_decorator: "agentstack.swarm",
    agent_decorator: "agentstack.agent",
    task_decorator: "agentstack.task",
    entry: EntryShape::Named("run"),
    tool_site: SiteShape::KeywordList(KeywordShape {
        callee: "Agent",
        keyword: "functions",
    }),
    linked_sites: &[],
    task_agent_keyword: None,
};

const ENGINE: Engine = Engine {
    framework: "openai_swarm",
    entrypoint: "src/stack.py",
    rules: RULES,
    agent_template: agent_method,
    task_template: task_method,
};

fn agent_method(agent: &AgentRecord, tools: &str) -> String {
    format!(
        r#"@agentstack.agent
def {name}(self):
    agent_config = agentstack.get_agent('{name}')
    return Agent(
        name=agent_config.name,
        model=agent_config.model,
        instructions=agent_config.prompt,
        functions=[{tools}],
    )"#,
        name = agent.name,
        tools = tools,
    )
}

fn task_method(task: &TaskRecord) -> String {
    format!(
        r#"@agentstack.task
def {name}(self):
    task_config = agentstack.get_task('{name}')
    return task_config.prompt"#,
        name = task.name,
    )
}

/// The openai_swarm adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAiSwarm;

impl FrameworkAdapter for OpenAiSwarm {
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
