//! Command implementations for agentwire.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Commands resolve the project, load records from disk and
//! hand them to the framework adapter; the adapter owns every change to the
//! entrypoint.

use crate::cli::{
    AgentAction, AgentAddArgs, Cli, Command, ListArgs, TaskAction, TaskAddArgs, ToolsAction,
    ToolsAddArgs, ToolsListArgs, ToolsRemoveArgs, ValidateArgs,
};
use crate::context::ProjectContext;
use crate::error::{AgentwireError, Result};
use crate::records::io::{find_agent, find_task, load_tool, save_agent, save_task};
use crate::records::{AgentRecord, TaskRecord, ToolRecord};
use serde_json::json;
use tracing::info;

/// Dispatch a command to its implementation.
///
/// This is the main entry point for command execution. The project is
/// resolved once, from `--project` when given, else from the current
/// directory.
pub fn dispatch(cli: Cli) -> Result<()> {
    let ctx = match &cli.project {
        Some(root) => ProjectContext::open(root)?,
        None => ProjectContext::resolve()?,
    };
    run(&ctx, cli.command)
}

/// Run a command against an already-resolved project.
pub fn run(ctx: &ProjectContext, command: Command) -> Result<()> {
    match command {
        Command::Validate(args) => cmd_validate(ctx, args),
        Command::Entrypoint => cmd_entrypoint(ctx),
        Command::Agent(agent_cmd) => match agent_cmd.action {
            AgentAction::Add(args) => cmd_agent_add(ctx, args),
            AgentAction::List(args) => cmd_agent_list(ctx, args),
        },
        Command::Task(task_cmd) => match task_cmd.action {
            TaskAction::Add(args) => cmd_task_add(ctx, args),
            TaskAction::List(args) => cmd_task_list(ctx, args),
        },
        Command::Tools(tools_cmd) => match tools_cmd.action {
            ToolsAction::Add(args) => cmd_tools_add(ctx, args),
            ToolsAction::Remove(args) => cmd_tools_remove(ctx, args),
            ToolsAction::List(args) => cmd_tools_list(ctx, args),
        },
    }
}

// ============================================================================
// Project
// ============================================================================

fn cmd_validate(ctx: &ProjectContext, args: ValidateArgs) -> Result<()> {
    let adapter = ctx.adapter()?;
    let report = adapter.check_project(&ctx.project_root)?;

    if args.json {
        print_json(&report)?;
    } else if report.passed {
        println!(
            "{} entrypoint {} is valid.",
            adapter.name(),
            adapter.entrypoint()
        );
    }

    if report.passed {
        return Ok(());
    }
    Err(AgentwireError::ValidationError(
        report
            .format_error(adapter.entrypoint(), adapter.name())
            .trim_end()
            .to_string(),
    ))
}

fn cmd_entrypoint(ctx: &ProjectContext) -> Result<()> {
    let adapter = ctx.adapter()?;
    println!("{}", adapter.get_entrypoint_path(&ctx.project_root).display());
    Ok(())
}

// ============================================================================
// Agents and tasks
// ============================================================================

/// Build the agent record from the agents file entry (if any) and the flags.
fn agent_record(ctx: &ProjectContext, args: AgentAddArgs) -> Result<AgentRecord> {
    let mut agent = match find_agent(&ctx.agents_path(), &args.name) {
        Ok(existing) => existing,
        Err(AgentwireError::NotFound(_)) => AgentRecord::new(&args.name)?,
        Err(e) => return Err(e),
    };

    if args.role.is_some() {
        agent.role = args.role;
    }
    if args.goal.is_some() {
        agent.goal = args.goal;
    }
    if args.backstory.is_some() {
        agent.backstory = args.backstory;
    }
    if args.llm.is_some() {
        agent.llm = args.llm;
    }
    if agent.llm.is_none() {
        agent.llm = Some(ctx.config.default_model.clone());
    }
    for tool in args.tools {
        crate::records::validate_identifier("tool", &tool)?;
        if !agent.tools.contains(&tool) {
            agent.tools.push(tool);
        }
    }
    Ok(agent)
}

fn cmd_agent_add(ctx: &ProjectContext, args: AgentAddArgs) -> Result<()> {
    let adapter = ctx.adapter()?;
    let agent = agent_record(ctx, args)?;

    // The entrypoint rejects duplicates, so it goes first.
    adapter.add_agent(&ctx.project_root, &agent)?;
    save_agent(&ctx.agents_path(), &agent)?;

    info!(agent = %agent.name, "agent added");
    println!("Added agent '{}' to {}", agent.name, adapter.entrypoint());
    Ok(())
}

fn cmd_agent_list(ctx: &ProjectContext, args: ListArgs) -> Result<()> {
    let names = ctx.adapter()?.get_agent_names(&ctx.project_root)?;
    print_names(&names, "agents", args.json)
}

fn task_record(ctx: &ProjectContext, args: TaskAddArgs) -> Result<TaskRecord> {
    let mut task = match find_task(&ctx.tasks_path(), &args.name) {
        Ok(existing) => existing,
        Err(AgentwireError::NotFound(_)) => TaskRecord::new(&args.name)?,
        Err(e) => return Err(e),
    };

    if args.agent.is_some() {
        task.agent = args.agent;
    }
    if args.description.is_some() {
        task.description = args.description;
    }
    if args.expected_output.is_some() {
        task.expected_output = args.expected_output;
    }
    if let Some(agent) = &task.agent {
        crate::records::validate_identifier("agent", agent)?;
    }
    Ok(task)
}

fn cmd_task_add(ctx: &ProjectContext, args: TaskAddArgs) -> Result<()> {
    let adapter = ctx.adapter()?;
    let task = task_record(ctx, args)?;

    adapter.add_task(&ctx.project_root, &task)?;
    save_task(&ctx.tasks_path(), &task)?;

    info!(task = %task.name, "task added");
    println!("Added task '{}' to {}", task.name, adapter.entrypoint());
    Ok(())
}

fn cmd_task_list(ctx: &ProjectContext, args: ListArgs) -> Result<()> {
    let names = ctx.adapter()?.get_task_names(&ctx.project_root)?;
    print_names(&names, "tasks", args.json)
}

// ============================================================================
// Tools
// ============================================================================

/// Agents named on the command line, or every agent in the entrypoint.
fn target_agents(ctx: &ProjectContext, agents: Vec<String>) -> Result<Vec<String>> {
    if !agents.is_empty() {
        return Ok(agents);
    }
    ctx.adapter()?.get_agent_names(&ctx.project_root)
}

fn cmd_tools_add(ctx: &ProjectContext, args: ToolsAddArgs) -> Result<()> {
    let adapter = ctx.adapter()?;
    let tool = match &args.definition {
        Some(path) => {
            let tool = load_tool(path)?;
            if tool.name != args.name {
                return Err(AgentwireError::UserError(format!(
                    "tool definition '{}' describes '{}', not '{}'",
                    path.display(),
                    tool.name,
                    args.name
                )));
            }
            tool
        }
        None => {
            let callables = if args.callables.is_empty() {
                vec![args.name.clone()]
            } else {
                args.callables
            };
            ToolRecord::new(&args.name, args.category, callables)?
        }
    };

    let agents = target_agents(ctx, args.agents)?;
    if agents.is_empty() {
        return Err(AgentwireError::UserError(
            "no agents to add the tool to; add an agent first".to_string(),
        ));
    }
    // Every agent must have a binding site before any of them is edited.
    for agent in &agents {
        adapter
            .get_agent_tool_names(&ctx.project_root, agent)
            .map_err(|e| match e {
                AgentwireError::ValidationError(missing) => {
                    AgentwireError::ValidationError(format!(
                        "cannot add tool `{}` to agent `{}`: {} (generate the agent scaffolding first)",
                        tool.name, agent, missing
                    ))
                }
                other => other,
            })?;
    }
    for agent in &agents {
        adapter.add_tool(&ctx.project_root, &tool, agent)?;
    }

    let mut updated = ctx.clone();
    if updated.config.add_tool(&tool.name) {
        updated.save_config()?;
    }

    println!("Added tool '{}' to {}", tool.name, agents.join(", "));
    Ok(())
}

fn cmd_tools_remove(ctx: &ProjectContext, args: ToolsRemoveArgs) -> Result<()> {
    let adapter = ctx.adapter()?;
    // Only the name matters for removal.
    let tool = ToolRecord::new(&args.name, "", vec![args.name.clone()])?;
    let remove_everywhere = args.agents.is_empty();

    let agents = target_agents(ctx, args.agents)?;
    for agent in &agents {
        adapter.remove_tool(&ctx.project_root, &tool, agent)?;
    }

    if remove_everywhere {
        let mut updated = ctx.clone();
        if updated.config.remove_tool(&tool.name) {
            updated.save_config()?;
        }
    }

    println!("Removed tool '{}' from {}", tool.name, agents.join(", "));
    Ok(())
}

fn cmd_tools_list(ctx: &ProjectContext, args: ToolsListArgs) -> Result<()> {
    let adapter = ctx.adapter()?;
    let agents = match args.agent {
        Some(agent) => vec![agent],
        None => adapter.get_agent_names(&ctx.project_root)?,
    };

    let mut bound = Vec::with_capacity(agents.len());
    for agent in agents {
        let tools = adapter.get_agent_tool_names(&ctx.project_root, &agent)?;
        bound.push((agent, tools));
    }

    if args.json {
        let agents: serde_json::Map<String, serde_json::Value> = bound
            .into_iter()
            .map(|(agent, tools)| (agent, json!(tools)))
            .collect();
        return print_json(&json!({
            "installed": ctx.config.tools,
            "agents": agents,
        }));
    }

    for (agent, tools) in &bound {
        if tools.is_empty() {
            println!("{}: (no tools)", agent);
        } else {
            println!("{}: {}", agent, tools.join(", "));
        }
    }
    Ok(())
}

// ============================================================================
// Output helpers
// ============================================================================

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| AgentwireError::UserError(format!("failed to serialize output: {}", e)))?;
    println!("{}", out);
    Ok(())
}

fn print_names(names: &[String], what: &str, json: bool) -> Result<()> {
    if json {
        return print_json(&names);
    }
    if names.is_empty() {
        println!("No {} defined.", what);
    }
    for name in names {
        println!("{}", name);
    }
    Ok(())
}
