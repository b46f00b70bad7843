//! Structural checks over a parsed entrypoint.

use super::types::{ValidationReport, Violation, ViolationKind};
use crate::error::{AgentwireError, Result};
use crate::locate::{StructuralElement, StructuralLocator};
use crate::source::SourceDocument;
use std::collections::HashSet;
use tracing::debug;

/// Checks an entrypoint against one framework's structural invariants.
#[derive(Debug, Clone, Copy)]
pub struct ProjectValidator<'l> {
    locator: &'l StructuralLocator,
    framework: &'l str,
}

impl<'l> ProjectValidator<'l> {
    pub fn new(locator: &'l StructuralLocator, framework: &'l str) -> Self {
        Self { locator, framework }
    }

    /// Collect every violation in `doc`.
    ///
    /// A missing container class is reported on its own: nothing else can be
    /// checked without it.
    pub fn check(&self, doc: &SourceDocument) -> ValidationReport {
        let rules = self.locator.rules();

        let (agents, tasks) = match (
            self.locator.agent_definitions(doc),
            self.locator.task_definitions(doc),
        ) {
            (Ok(agents), Ok(tasks)) => (agents, tasks),
            (Err(e), _) | (_, Err(e)) => {
                debug!(error = %e, "container lookup failed");
                return ValidationReport::fail(vec![Violation::new(
                    ViolationKind::MissingContainer,
                    format!("no class decorated with `@{}`", rules.container_decorator),
                )]);
            }
        };

        let mut violations = Vec::new();

        if let Err(e) = self.locator.find_entry(doc) {
            violations.push(Violation::new(ViolationKind::MissingEntry, not_found_detail(e)));
        }

        match (agents.is_empty(), tasks.is_empty()) {
            (true, true) => violations.push(Violation::new(
                ViolationKind::NoDefinitions,
                "project defines no agents and no tasks",
            )),
            (false, true) => violations.push(Violation::new(
                ViolationKind::AgentWithoutTask,
                format!(
                    "project defines agents ({}) but no tasks",
                    owners(&agents).join(", ")
                ),
            )),
            (true, false) => violations.push(Violation::new(
                ViolationKind::TaskWithoutAgent,
                format!(
                    "project defines tasks ({}) but no agents",
                    owners(&tasks).join(", ")
                ),
            )),
            (false, false) => {}
        }

        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        for element in agents.iter().chain(tasks.iter()) {
            if !seen.insert(element.owner.as_str()) && reported.insert(element.owner.as_str()) {
                violations.push(
                    Violation::new(
                        ViolationKind::DuplicateName,
                        format!("`{}` is defined more than once", element.owner),
                    )
                    .at_line(doc.line_number(element.span.start)),
                );
            }
        }

        for agent in &agents {
            if let Err(e) = self.locator.find_tool_binding_site(doc, &agent.owner) {
                violations.push(
                    Violation::new(ViolationKind::MissingToolSite, not_found_detail(e))
                        .at_line(doc.line_number(agent.span.start)),
                );
            }
        }

        let agent_names: HashSet<&str> = agents.iter().map(|a| a.owner.as_str()).collect();
        let references = self.locator.task_agent_references(doc).unwrap_or_default();

        // Where tasks name their agent in source, each agent needs a task of
        // its own. Otherwise only the project-wide check above applies.
        if rules.task_agent_keyword.is_some() && !tasks.is_empty() {
            let assigned: HashSet<&str> = references.iter().map(|(_, a)| a.as_str()).collect();
            for agent in agents.iter().filter(|a| !assigned.contains(a.owner.as_str())) {
                violations.push(
                    Violation::new(
                        ViolationKind::AgentWithoutTask,
                        format!("agent `{}` is not assigned to any task", agent.owner),
                    )
                    .at_line(doc.line_number(agent.span.start)),
                );
            }
        }

        for (task, agent) in &references {
            if agent_names.contains(agent.as_str()) {
                continue;
            }
            let line = tasks
                .iter()
                .find(|t| &t.owner == task)
                .map(|t| doc.line_number(t.span.start));
            let mut violation = Violation::new(
                ViolationKind::UnknownAgentReference,
                format!("task `{}` refers to undefined agent `{}`", task, agent),
            );
            violation.line = line;
            violations.push(violation);
        }

        ValidationReport::from_violations(violations)
    }

    /// Like [`check`](Self::check), but a failing report becomes an error.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The entrypoint satisfies every invariant
    /// * `Err(AgentwireError::ValidationError)` - At least one violation
    pub fn validate(&self, doc: &SourceDocument) -> Result<()> {
        let report = self.check(doc);
        if report.passed {
            return Ok(());
        }
        let entrypoint = doc
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<memory>".to_string());
        Err(AgentwireError::ValidationError(
            report
                .format_error(&entrypoint, self.framework)
                .trim_end()
                .to_string(),
        ))
    }
}

fn owners(elements: &[StructuralElement]) -> Vec<&str> {
    elements.iter().map(|e| e.owner.as_str()).collect()
}

/// Message of a lookup error without its variant prefix.
fn not_found_detail(err: AgentwireError) -> String {
    match err {
        AgentwireError::NotFound(msg) | AgentwireError::ValidationError(msg) => msg,
        other => other.to_string(),
    }
}
