//! Operations shared by every framework adapter.
//!
//! An [`Engine`] bundles one framework's entrypoint path, shape rules and
//! definition templates. Each operation loads the entrypoint fresh, edits it
//! in memory and writes it back once, only after every edit succeeded.

use crate::binding::{ToolBindingEditor, tool_reference};
use crate::error::{AgentwireError, Result};
use crate::locate::{Role, ShapeRules, StructuralElement, StructuralLocator};
use crate::records::{AgentRecord, TaskRecord, ToolRecord};
use crate::source::SourceDocument;
use crate::validate::{ProjectValidator, ValidationReport};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Renders a new agent method. The second argument is the initial contents
/// of its tool list, already formatted as tool references.
pub type AgentTemplate = fn(&AgentRecord, &str) -> String;

/// Renders a new task method.
pub type TaskTemplate = fn(&TaskRecord) -> String;

/// Everything the shared operations need to know about one framework.
#[derive(Debug, Clone, Copy)]
pub struct Engine {
    pub framework: &'static str,
    /// Entrypoint path relative to the project root.
    pub entrypoint: &'static str,
    pub rules: ShapeRules,
    pub agent_template: AgentTemplate,
    pub task_template: TaskTemplate,
}

/// Where a new definition goes relative to an existing element.
#[derive(Debug)]
enum Anchor {
    After(StructuralElement),
    Before(StructuralElement),
}

impl Engine {
    pub fn path(&self, root: &Path) -> PathBuf {
        root.join(self.entrypoint)
    }

    pub fn locator(&self) -> StructuralLocator {
        StructuralLocator::new(self.rules)
    }

    /// Load and parse the project's entrypoint.
    pub fn load(&self, root: &Path) -> Result<SourceDocument> {
        let path = self.path(root);
        if !path.is_file() {
            return Err(AgentwireError::UserError(format!(
                "entrypoint '{}' does not exist (is this a {} project?)",
                path.display(),
                self.framework
            )));
        }
        SourceDocument::load(&path)
    }

    pub fn check(&self, root: &Path) -> Result<ValidationReport> {
        let doc = self.load(root)?;
        let locator = self.locator();
        Ok(ProjectValidator::new(&locator, self.framework).check(&doc))
    }

    pub fn validate(&self, root: &Path) -> Result<()> {
        let doc = self.load(root)?;
        let locator = self.locator();
        ProjectValidator::new(&locator, self.framework).validate(&doc)
    }

    /// Insert an agent method, seeding its tool list from the record.
    pub fn add_agent(&self, root: &Path, agent: &AgentRecord) -> Result<()> {
        let mut doc = self.load(root)?;
        let locator = self.locator();

        let tools = agent
            .declared_tools()
            .into_iter()
            .map(tool_reference)
            .collect::<Vec<_>>()
            .join(", ");
        let block = (self.agent_template)(agent, &tools);

        let anchor = match locator.agent_definitions(&doc)?.pop() {
            Some(last) => Anchor::After(last),
            None => match locator.task_definitions(&doc)?.into_iter().next() {
                Some(first) => Anchor::Before(first),
                None => self.entry_anchor(&locator, &doc, "agent", &agent.name)?,
            },
        };

        self.insert_definition(&mut doc, &locator, &agent.name, anchor, &block)?;
        doc.save()?;
        info!(framework = self.framework, agent = %agent.name, "added agent");
        Ok(())
    }

    /// Insert a task method.
    pub fn add_task(&self, root: &Path, task: &TaskRecord) -> Result<()> {
        let mut doc = self.load(root)?;
        let locator = self.locator();
        let block = (self.task_template)(task);

        let anchor = match locator.task_definitions(&doc)?.pop() {
            Some(last) => Anchor::After(last),
            None => match locator.agent_definitions(&doc)?.pop() {
                Some(last) => Anchor::After(last),
                None => self.entry_anchor(&locator, &doc, "task", &task.name)?,
            },
        };

        self.insert_definition(&mut doc, &locator, &task.name, anchor, &block)?;
        doc.save()?;
        info!(framework = self.framework, task = %task.name, "added task");
        Ok(())
    }

    pub fn add_tool(&self, root: &Path, tool: &ToolRecord, agent_name: &str) -> Result<()> {
        let mut doc = self.load(root)?;
        let locator = self.locator();

        if ToolBindingEditor::new(&locator).add(&mut doc, agent_name, tool)? {
            doc.save()?;
            info!(framework = self.framework, agent = agent_name, tool = %tool.name, "added tool");
        } else {
            debug!(agent = agent_name, tool = %tool.name, "tool already bound");
        }
        Ok(())
    }

    pub fn remove_tool(&self, root: &Path, tool: &ToolRecord, agent_name: &str) -> Result<()> {
        let mut doc = self.load(root)?;
        let locator = self.locator();

        if ToolBindingEditor::new(&locator).remove(&mut doc, agent_name, tool)? {
            doc.save()?;
            info!(framework = self.framework, agent = agent_name, tool = %tool.name, "removed tool");
        } else {
            debug!(agent = agent_name, tool = %tool.name, "tool was not bound");
        }
        Ok(())
    }

    pub fn tool_names(&self, root: &Path, agent_name: &str) -> Result<Vec<String>> {
        let doc = self.load(root)?;
        let locator = self.locator();
        ToolBindingEditor::new(&locator).tool_names(&doc, agent_name)
    }

    pub fn agent_names(&self, root: &Path) -> Result<Vec<String>> {
        let doc = self.load(root)?;
        self.owners(self.locator().agent_definitions(&doc))
    }

    pub fn task_names(&self, root: &Path) -> Result<Vec<String>> {
        let doc = self.load(root)?;
        self.owners(self.locator().task_definitions(&doc))
    }

    fn owners(&self, elements: Result<Vec<StructuralElement>>) -> Result<Vec<String>> {
        let elements = elements.map_err(|e| e.escalate_not_found(|m| m.to_string()))?;
        Ok(elements.into_iter().map(|e| e.owner).collect())
    }

    fn entry_anchor(
        &self,
        locator: &StructuralLocator,
        doc: &SourceDocument,
        kind: &str,
        name: &str,
    ) -> Result<Anchor> {
        let entry = locator.find_entry(doc).map_err(|e| {
            e.escalate_not_found(|missing| {
                format!("cannot place {} `{}`: {}", kind, name, missing)
            })
        })?;
        Ok(Anchor::Before(entry))
    }

    /// Insert `block` next to `anchor`, matching the anchor's indentation.
    fn insert_definition(
        &self,
        doc: &mut SourceDocument,
        locator: &StructuralLocator,
        name: &str,
        anchor: Anchor,
        block: &str,
    ) -> Result<()> {
        let taken = match locator.find_agent_definition(doc, name) {
            Ok(existing) => Some(existing),
            Err(AgentwireError::NotFound(_)) => match locator.find_task_definition(doc, name) {
                Ok(existing) => Some(existing),
                Err(AgentwireError::NotFound(_)) => None,
                Err(e) => return Err(e),
            },
            Err(e) => return Err(e),
        };
        if let Some(existing) = taken {
            let kind = match existing.role {
                Role::AgentDefinition => "an agent",
                _ => "a task",
            };
            return Err(AgentwireError::ValidationError(format!(
                "`{}` is already defined as {} in the {} entrypoint",
                name, kind, self.framework
            )));
        }

        let (offset, text) = match &anchor {
            Anchor::After(element) => {
                let indent = doc.line_indent(element.span.start).to_string();
                let end = line_end(doc.serialize(), element.span.end);
                (end, format!("\n\n{}{}", indent, indent_block(block, &indent)))
            }
            Anchor::Before(element) => {
                let indent = doc.line_indent(element.span.start).to_string();
                (
                    element.span.start,
                    format!("{}\n\n{}", indent_block(block, &indent), indent),
                )
            }
        };
        debug!(definition = name, ?anchor, offset, "inserting definition");
        doc.insert_at(offset, &text)
    }
}

/// Offset of the end of the line containing `offset` (before its newline).
fn line_end(source: &str, offset: usize) -> usize {
    source[offset..]
        .find('\n')
        .map_or(source.len(), |i| offset + i)
}

/// Prefix every non-empty line but the first with `indent`.
fn indent_block(block: &str, indent: &str) -> String {
    let mut out = String::with_capacity(block.len());
    for (i, line) in block.trim_end().lines().enumerate() {
        if i > 0 {
            out.push('\n');
            if !line.is_empty() {
                out.push_str(indent);
            }
        }
        out.push_str(line);
    }
    out
}
