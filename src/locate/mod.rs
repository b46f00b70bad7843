//! Structural element lookup.
//!
//! The locator finds agent definitions, task definitions and tool binding
//! sites by *shape* (decorator names, callee names, keyword names) rather than
//! by position, so user edits that reorder or annotate the entrypoint do not
//! break it. What the shapes are is decided per framework by [`ShapeRules`].
//!
//! Results are returned as [`StructuralElement`]s carrying byte spans instead
//! of borrowed nodes, so a caller can hold on to them while mutating the
//! document.

pub mod shapes;


pub use shapes::{EntryShape, KeywordShape, LinkedSiteShape, ShapeRules, SiteShape};

use crate::error::{AgentwireError, Result};
use crate::source::{SourceDocument, Span};
use tree_sitter::Node;

/// What a located element is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    AgentDefinition,
    TaskDefinition,
    ToolBindingSite,
    /// The framework's run/crew method, used as an insertion anchor.
    Entry,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::AgentDefinition => write!(f, "agent-definition"),
            Role::TaskDefinition => write!(f, "task-definition"),
            Role::ToolBindingSite => write!(f, "tool-binding-site"),
            Role::Entry => write!(f, "entry"),
        }
    }
}

/// A located syntax node tagged with its role and owning name.
///
/// For definitions the span covers the whole method including decorators;
/// for binding sites it covers the list literal holding the tool entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralElement {
    pub role: Role,
    pub owner: String,
    pub span: Span,
}

impl StructuralElement {
    fn new(role: Role, owner: impl Into<String>, node: &Node<'_>) -> Self {
        Self {
            role,
            owner: owner.into(),
            span: Span::of(node),
        }
    }
}

/// A method in the container class.
struct Method<'a> {
    /// The `decorated_definition` when decorated, else the function itself.
    outer: Node<'a>,
    function: Node<'a>,
    name: &'a str,
    decorators: Vec<String>,
}

/// Finds structural elements using one framework's shape rules.
#[derive(Debug, Clone, Copy)]
pub struct StructuralLocator {
    rules: ShapeRules,
}

impl StructuralLocator {
    pub fn new(rules: ShapeRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ShapeRules {
        &self.rules
    }

    /// All agent definitions, in source order.
    pub fn agent_definitions(&self, doc: &SourceDocument) -> Result<Vec<StructuralElement>> {
        self.decorated_elements(doc, self.rules.agent_decorator, Role::AgentDefinition)
    }

    /// All task definitions, in source order.
    pub fn task_definitions(&self, doc: &SourceDocument) -> Result<Vec<StructuralElement>> {
        self.decorated_elements(doc, self.rules.task_decorator, Role::TaskDefinition)
    }

    /// The agent definition named `agent_name`.
    pub fn find_agent_definition(
        &self,
        doc: &SourceDocument,
        agent_name: &str,
    ) -> Result<StructuralElement> {
        self.agent_definitions(doc)?
            .into_iter()
            .find(|element| element.owner == agent_name)
            .ok_or_else(|| {
                AgentwireError::NotFound(format!(
                    "`@{}` method `{}`",
                    self.rules.agent_decorator, agent_name
                ))
            })
    }

    /// The task definition named `task_name`.
    pub fn find_task_definition(
        &self,
        doc: &SourceDocument,
        task_name: &str,
    ) -> Result<StructuralElement> {
        self.task_definitions(doc)?
            .into_iter()
            .find(|element| element.owner == task_name)
            .ok_or_else(|| {
                AgentwireError::NotFound(format!(
                    "`@{}` method `{}`",
                    self.rules.task_decorator, task_name
                ))
            })
    }

    /// The entry method of the container.
    pub fn find_entry(&self, doc: &SourceDocument) -> Result<StructuralElement> {
        let container_name = self.container_name(doc)?;
        self.methods(doc)?
            .into_iter()
            .find(|method| match self.rules.entry {
                EntryShape::Decorated(decorator) => {
                    method.decorators.iter().any(|d| d == decorator)
                }
                EntryShape::Named(name) => method.name == name,
            })
            .map(|method| StructuralElement::new(Role::Entry, method.name, &method.outer))
            .ok_or_else(|| {
                AgentwireError::NotFound(format!(
                    "{} in `{}`",
                    self.rules.entry.describe(),
                    container_name
                ))
            })
    }

    /// The list literal holding `agent_name`'s tools inside its definition.
    ///
    /// # Returns
    ///
    /// * `Err(AgentwireError::NotFound)` - No such agent, or the agent has no
    ///   tool list (a minimal entrypoint)
    /// * `Err(AgentwireError::ValidationError)` - The tools argument exists but
    ///   is not a list literal (keyword or positional alike)
    pub fn find_tool_binding_site(
        &self,
        doc: &SourceDocument,
        agent_name: &str,
    ) -> Result<StructuralElement> {
        let method = self.agent_method(doc, agent_name)?;
        self.site_within(doc, method.function, &self.rules.tool_site, agent_name)?
            .map(|list| StructuralElement::new(Role::ToolBindingSite, agent_name, &list))
            .ok_or_else(|| {
                AgentwireError::NotFound(format!(
                    "`@{}` method `{}` has no {}",
                    self.rules.agent_decorator,
                    agent_name,
                    self.rules.tool_site.describe()
                ))
            })
    }

    /// Every tool binding site of `agent_name`: the primary site first, then
    /// any linked sites in source order.
    ///
    /// Linked sites are returned even when the primary site is missing, so a
    /// stale `ToolNode([...])` can still be cleaned up. `NotFound` means the
    /// agent has no site at all.
    pub fn find_tool_binding_sites(
        &self,
        doc: &SourceDocument,
        agent_name: &str,
    ) -> Result<Vec<StructuralElement>> {
        self.agent_method(doc, agent_name)?;

        let mut sites = Vec::new();
        let mut primary_missing = None;
        match self.find_tool_binding_site(doc, agent_name) {
            Ok(site) => sites.push(site),
            Err(e @ AgentwireError::NotFound(_)) => primary_missing = Some(e),
            Err(e) => return Err(e),
        }

        let container = self.container(doc)?;
        for linked in self.rules.linked_sites {
            let wanted = linked.node_name(agent_name);
            let registrations = doc.find_within(container, |n| {
                n.kind() == "call" && doc.callee_name(n) == Some(linked.registrar)
            });
            for call in registrations {
                let arguments = doc.positional_arguments(&call);
                let [name, target, ..] = arguments.as_slice() else {
                    continue;
                };
                if doc.string_value(name) != Some(wanted.as_str()) {
                    continue;
                }
                if let Some(list) = self.site_within(doc, *target, &linked.site, agent_name)? {
                    sites.push(StructuralElement::new(Role::ToolBindingSite, agent_name, &list));
                }
            }
        }

        if let Some(e) = primary_missing
            && sites.is_empty()
        {
            return Err(e);
        }
        Ok(sites)
    }

    /// Explicit `(task, agent)` references written in task definitions.
    pub fn task_agent_references(&self, doc: &SourceDocument) -> Result<Vec<(String, String)>> {
        let Some(shape) = self.rules.task_agent_keyword else {
            return Ok(Vec::new());
        };

        let mut references = Vec::new();
        for method in self.methods(doc)? {
            if !method
                .decorators
                .iter()
                .any(|d| d == self.rules.task_decorator)
            {
                continue;
            }
            let calls = doc.find_within(method.function, |n| {
                n.kind() == "call" && doc.callee_name(n) == Some(shape.callee)
            });
            for call in calls {
                if let Some(value) = doc.keyword_value(&call, shape.keyword)
                    && let Some(agent) = doc.self_member(&value).or(doc.string_value(&value))
                {
                    references.push((method.name.to_string(), agent.to_string()));
                }
            }
        }
        Ok(references)
    }

    /// Name of the container class.
    pub fn container_name<'a>(&self, doc: &'a SourceDocument) -> Result<&'a str> {
        let container = self.container(doc)?;
        Ok(doc.definition_name(&container).unwrap_or_default())
    }

    fn container<'a>(&self, doc: &'a SourceDocument) -> Result<Node<'a>> {
        doc.find(|n| n.kind() == "decorated_definition")
            .filter(|n| {
                n.child_by_field_name("definition")
                    .is_some_and(|d| d.kind() == "class_definition")
            })
            .find(|n| {
                doc.decorator_names(n)
                    .iter()
                    .any(|d| d == self.rules.container_decorator)
            })
            .and_then(|n| n.child_by_field_name("definition"))
            .ok_or_else(|| {
                AgentwireError::NotFound(format!(
                    "no class decorated with `@{}`",
                    self.rules.container_decorator
                ))
            })
    }

    fn methods<'a>(&self, doc: &'a SourceDocument) -> Result<Vec<Method<'a>>> {
        let container = self.container(doc)?;
        let Some(body) = container.child_by_field_name("body") else {
            return Ok(Vec::new());
        };

        let mut cursor = body.walk();
        let methods = body
            .named_children(&mut cursor)
            .filter_map(|member| match member.kind() {
                "function_definition" => Some((member, member, Vec::new())),
                "decorated_definition" => member
                    .child_by_field_name("definition")
                    .filter(|d| d.kind() == "function_definition")
                    .map(|function| (member, function, doc.decorator_names(&member))),
                _ => None,
            })
            .filter_map(|(outer, function, decorators)| {
                doc.definition_name(&function).map(|name| Method {
                    outer,
                    function,
                    name,
                    decorators,
                })
            })
            .collect();
        Ok(methods)
    }

    fn decorated_elements(
        &self,
        doc: &SourceDocument,
        decorator: &str,
        role: Role,
    ) -> Result<Vec<StructuralElement>> {
        Ok(self
            .methods(doc)?
            .into_iter()
            .filter(|method| method.decorators.iter().any(|d| d == decorator))
            .map(|method| StructuralElement::new(role, method.name, &method.outer))
            .collect())
    }

    fn agent_method<'a>(&self, doc: &'a SourceDocument, agent_name: &str) -> Result<Method<'a>> {
        self.methods(doc)?
            .into_iter()
            .find(|method| {
                method.name == agent_name
                    && method
                        .decorators
                        .iter()
                        .any(|d| d == self.rules.agent_decorator)
            })
            .ok_or_else(|| {
                AgentwireError::NotFound(format!(
                    "`@{}` method `{}`",
                    self.rules.agent_decorator, agent_name
                ))
            })
    }

    /// First list matching `shape` inside `scope` (scope included).
    fn site_within<'a>(
        &self,
        doc: &'a SourceDocument,
        scope: Node<'a>,
        shape: &SiteShape,
        agent_name: &str,
    ) -> Result<Option<Node<'a>>> {
        for call in doc.find_within(scope, |n| n.kind() == "call") {
            match shape {
                SiteShape::KeywordList(keyword) => {
                    if doc.callee_name(&call) != Some(keyword.callee) {
                        continue;
                    }
                    let Some(value) = doc.keyword_value(&call, keyword.keyword) else {
                        continue;
                    };
                    if value.kind() != "list" {
                        return Err(AgentwireError::ValidationError(format!(
                            "`{}` for agent `{}` must be a list literal, found `{}`",
                            keyword.keyword,
                            agent_name,
                            doc.text(&value)
                        )));
                    }
                    return Ok(Some(value));
                }
                SiteShape::PositionalList { callee } => {
                    if doc.callee_name(&call) != Some(*callee) {
                        continue;
                    }
                    let Some(first) = doc.positional_arguments(&call).into_iter().next() else {
                        continue;
                    };
                    if first.kind() != "list" {
                        return Err(AgentwireError::ValidationError(format!(
                            "`{}` for agent `{}` must be given a list literal, found `{}`",
                            callee,
                            agent_name,
                            doc.text(&first)
                        )));
                    }
                    return Ok(Some(first));
                }
            }
        }
        Ok(None)
    }
}
