//! langgraph: an `@agentstack.graph` class whose agents bind tools on the
//! model (`bind_tools`) and expose them to the graph through a `ToolNode`
//! registered as `<agent>_tools`. Both lists are kept in step.

use super::FrameworkAdapter;
use super::engine::Engine;
use crate::error::Result;
use crate::locate::{EntryShape, LinkedSiteShape, ShapeRules, SiteShape};
use crate::records::{AgentRecord, TaskRecord, ToolRecord};
use crate::validate::ValidationReport;
use std::path::{Path, PathBuf};

pub const RULES: ShapeRules = ShapeRules {
    container_decorator: "agentstack.graph",
    agent_decorator: "agentstack.agent",
    task_decorator: "agentstack.task",
    entry: EntryShape::Named("run"),
    tool_site: SiteShape::PositionalList {
        callee: "bind_tools",
    },
    linked_sites: &[LinkedSiteShape {
        registrar: "add_node",
        suffix: "_tools",
        site: SiteShape::PositionalList { callee: "ToolNode" },
    }],
    task_agent_keyword: None,
};

const ENGINE: Engine = Engine {
    framework: "langgraph",
    entrypoint: "src/graph.py",
    rules: RULES,
    agent_template: agent_method,
    task_template: task_method,
};

fn agent_method(agent: &AgentRecord, tools: &str) -> String {
    format!(
        r#"@agentstack.agent
def {name}(self, state: State):
    agent_config = agentstack.get_agent('{name}')
    messages = ChatPromptTemplate.from_messages([
        ("user", agent_config.prompt),
    ])
    messages = messages.format_messages(**state['inputs'])
    agent = ChatOpenAI(model=agent_config.model)
    agent = agent.bind_tools([{tools}])
    response = agent.invoke(
        messages + state['messages'],
    )
    return {{'messages': [response]}}"#,
        name = agent.name,
        tools = tools,
    )
}

fn task_method(task: &TaskRecord) -> String {
    format!(
        r#"@agentstack.task
def {name}(self, messages: list[BaseMessage]) -> list[BaseMessage]:
    task_config = agentstack.get_task('{name}')
    messages = ChatPromptTemplate.from_messages([
        ("user", task_config.prompt),
    ])
    return messages.format_messages(**self.inputs)"#,
        name = task.name,
    )
}

/// The langgraph adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct LangGraph;

impl FrameworkAdapter for LangGraph {
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
