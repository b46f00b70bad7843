//! CLI argument parsing for agentwire.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Agentwire: structured editor for the entrypoint of agent-orchestration projects.
///
/// Adds agents, tasks and tool bindings to a crewai, langgraph or
/// openai_swarm entrypoint without disturbing the rest of the file, and
/// checks that the file still has the structure its framework expects.
#[derive(Parser, Debug)]
#[command(name = "agentwire")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Project root (the directory holding agentwire.yaml). Defaults to the
    /// nearest one above the current directory.
    #[arg(long, global = true, value_name = "DIR")]
    pub project: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug, -vvv trace). AGENTWIRE_LOG
    /// overrides this.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for agentwire.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check the entrypoint against its framework's structure.
    ///
    /// Reports every violation found; exits with code 2 if there are any.
    Validate(ValidateArgs),

    /// Print the path of the project's entrypoint.
    Entrypoint,

    /// Agent commands.
    Agent(AgentCommand),

    /// Task commands.
    Task(TaskCommand),

    /// Tool binding commands.
    Tools(ToolsCommand),
}

/// Arguments for the `validate` command.
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments shared by `list` subcommands.
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Agent subcommands.
#[derive(Parser, Debug)]
pub struct AgentCommand {
    #[command(subcommand)]
    pub action: AgentAction,
}

/// Available agent actions.
#[derive(Subcommand, Debug)]
pub enum AgentAction {
    /// Add an agent to the entrypoint and to the agents file.
    ///
    /// Fields not given on the command line are taken from an existing
    /// entry in the agents file, if there is one.
    Add(AgentAddArgs),

    /// List the agents defined in the entrypoint.
    List(ListArgs),
}

/// Arguments for the `agent add` command.
#[derive(Parser, Debug)]
pub struct AgentAddArgs {
    /// Agent name (a Python identifier).
    pub name: String,

    #[arg(long)]
    pub role: Option<String>,

    #[arg(long)]
    pub goal: Option<String>,

    #[arg(long)]
    pub backstory: Option<String>,

    /// Model as provider/model. Defaults to the project's default_model.
    #[arg(long)]
    pub llm: Option<String>,

    /// Tools the agent starts with.
    #[arg(long = "tool", value_delimiter = ',')]
    pub tools: Vec<String>,
}

/// Task subcommands.
#[derive(Parser, Debug)]
pub struct TaskCommand {
    #[command(subcommand)]
    pub action: TaskAction,
}

/// Available task actions.
#[derive(Subcommand, Debug)]
pub enum TaskAction {
    /// Add a task to the entrypoint and to the tasks file.
    Add(TaskAddArgs),

    /// List the tasks defined in the entrypoint.
    List(ListArgs),
}

/// Arguments for the `task add` command.
#[derive(Parser, Debug)]
pub struct TaskAddArgs {
    /// Task name (a Python identifier).
    pub name: String,

    /// Agent that performs the task.
    #[arg(long)]
    pub agent: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub expected_output: Option<String>,
}

/// Tool subcommands.
#[derive(Parser, Debug)]
pub struct ToolsCommand {
    #[command(subcommand)]
    pub action: ToolsAction,
}

/// Available tool actions.
#[derive(Subcommand, Debug)]
pub enum ToolsAction {
    /// Bind a tool to agents.
    ///
    /// Without --agent the tool is bound to every agent in the entrypoint.
    Add(ToolsAddArgs),

    /// Unbind a tool from agents.
    ///
    /// Without --agent the tool is unbound from every agent.
    Remove(ToolsRemoveArgs),

    /// List bound tools per agent.
    List(ToolsListArgs),
}

/// Arguments for the `tools add` command.
#[derive(Parser, Debug)]
pub struct ToolsAddArgs {
    /// Tool name.
    pub name: String,

    /// Agents to bind the tool to.
    #[arg(long = "agent", value_delimiter = ',')]
    pub agents: Vec<String>,

    /// JSON tool definition with name, category and callables.
    #[arg(long, value_name = "FILE", conflicts_with_all = ["category", "callables"])]
    pub definition: Option<PathBuf>,

    #[arg(long, default_value = "custom")]
    pub category: String,

    /// Callables the tool exports. Defaults to the tool name.
    #[arg(long = "callable", value_delimiter = ',')]
    pub callables: Vec<String>,
}

/// Arguments for the `tools remove` command.
#[derive(Parser, Debug)]
pub struct ToolsRemoveArgs {
    /// Tool name.
    pub name: String,

    /// Agents to unbind the tool from.
    #[arg(long = "agent", value_delimiter = ',')]
    pub agents: Vec<String>,
}

/// Arguments for the `tools list` command.
#[derive(Parser, Debug)]
pub struct ToolsListArgs {
    /// Only list this agent's tools.
    #[arg(long)]
    pub agent: Option<String>,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_debug_assert() {
        // Verifies the CLI arguments configuration is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_validate() {
        let cli = Cli::try_parse_from(["agentwire", "validate", "--json"]).unwrap();
        assert!(matches!(cli.command, Command::Validate(ValidateArgs { json: true })));
        assert!(cli.project.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["agentwire", "entrypoint", "--project", "demo", "-vv"]).unwrap();
        assert!(matches!(cli.command, Command::Entrypoint));
        assert_eq!(cli.project, Some(PathBuf::from("demo")));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn parse_agent_add_full() {
        let cli = Cli::try_parse_from([
            "agentwire",
            "agent",
            "add",
            "researcher",
            "--role",
            "Researcher",
            "--llm",
            "openai/gpt-4o",
            "--tool",
            "search,scrape",
        ])
        .unwrap();

        let Command::Agent(AgentCommand {
            action: AgentAction::Add(args),
        }) = cli.command
        else {
            panic!("Expected agent add command");
        };
        assert_eq!(args.name, "researcher");
        assert_eq!(args.role.as_deref(), Some("Researcher"));
        assert_eq!(args.tools, vec!["search", "scrape"]);
        assert!(args.goal.is_none());
    }

    #[test]
    fn parse_task_add() {
        let cli = Cli::try_parse_from([
            "agentwire",
            "task",
            "add",
            "summarize",
            "--agent",
            "writer",
        ])
        .unwrap();

        let Command::Task(TaskCommand {
            action: TaskAction::Add(args),
        }) = cli.command
        else {
            panic!("Expected task add command");
        };
        assert_eq!(args.agent.as_deref(), Some("writer"));
    }

    #[test]
    fn parse_tools_add_defaults() {
        let cli = Cli::try_parse_from(["agentwire", "tools", "add", "firecrawl"]).unwrap();

        let Command::Tools(ToolsCommand {
            action: ToolsAction::Add(args),
        }) = cli.command
        else {
            panic!("Expected tools add command");
        };
        assert!(args.agents.is_empty());
        assert_eq!(args.category, "custom");
        assert!(args.callables.is_empty());
        assert!(args.definition.is_none());
    }

    #[test]
    fn parse_tools_add_definition_conflicts_with_callables() {
        let result = Cli::try_parse_from([
            "agentwire",
            "tools",
            "add",
            "firecrawl",
            "--definition",
            "tool.json",
            "--callable",
            "scrape",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_tools_remove_multiple_agents() {
        let cli = Cli::try_parse_from([
            "agentwire", "tools", "remove", "firecrawl", "--agent", "a", "--agent", "b",
        ])
        .unwrap();

        let Command::Tools(ToolsCommand {
            action: ToolsAction::Remove(args),
        }) = cli.command
        else {
            panic!("Expected tools remove command");
        };
        assert_eq!(args.agents, vec!["a", "b"]);
    }

    #[test]
    fn parse_missing_subcommand_fails() {
        assert!(Cli::try_parse_from(["agentwire"]).is_err());
        assert!(Cli::try_parse_from(["agentwire", "tools"]).is_err());
    }
}
