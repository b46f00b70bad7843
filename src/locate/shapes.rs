//! Per-framework syntax shapes.
//!
//! Each adapter describes its entrypoint idioms as a `ShapeRules` value; the
//! locator interprets those rules against a parsed document. Adding a
//! framework means writing a new `ShapeRules`, not new traversal code.

/// The syntax shapes one framework uses in its entrypoint.
#[derive(Debug, Clone, Copy)]
pub struct ShapeRules {
    /// Decorator on the class that holds every agent and task method.
    pub container_decorator: &'static str,

    /// Decorator marking an agent method.
    pub agent_decorator: &'static str,

    /// Decorator marking a task method.
    pub task_decorator: &'static str,

    /// The method that runs the project; new definitions go before it.
    pub entry: EntryShape,

    /// Where an agent's tools are listed, inside the agent method.
    pub tool_site: SiteShape,

    /// Additional tool lists tied to an agent by naming convention.
    pub linked_sites: &'static [LinkedSiteShape],

    /// Keyword through which a task call names its agent, if the framework
    /// spells that out in source.
    pub task_agent_keyword: Option<KeywordShape>,
}

/// How to recognise the entry method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryShape {
    /// A method carrying this decorator (`@crew`).
    Decorated(&'static str),
    /// A plain method with this name (`run`).
    Named(&'static str),
}

/// A call argument holding a list of tool references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteShape {
    /// `callee(..., keyword=[...])`, e.g. `Agent(tools=[...])`.
    KeywordList(KeywordShape),
    /// `callee([...])`, e.g. `llm.bind_tools([...])`.
    PositionalList { callee: &'static str },
}

/// A call with a specific keyword argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordShape {
    pub callee: &'static str,
    pub keyword: &'static str,
}

/// A tool list registered under a name derived from the agent's name.
///
/// Matches `registrar('<agent><suffix>', <site>)` anywhere in the container,
/// e.g. `self.graph.add_node('researcher_tools', ToolNode([...]))`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkedSiteShape {
    pub registrar: &'static str,
    pub suffix: &'static str,
    pub site: SiteShape,
}

impl LinkedSiteShape {
    /// Registration name for `agent`.
    pub fn node_name(&self, agent: &str) -> String {
        format!("{}{}", agent, self.suffix)
    }
}

impl EntryShape {
    pub fn describe(&self) -> String {
        match self {
            EntryShape::Decorated(decorator) => format!("`@{}` decorated method", decorator),
            EntryShape::Named(name) => format!("`{}` method", name),
        }
    }
}

impl SiteShape {
    pub fn describe(&self) -> String {
        match self {
            SiteShape::KeywordList(shape) => {
                format!("`{}({}=[...])` call", shape.callee, shape.keyword)
            }
            SiteShape::PositionalList { callee } => format!("`{}([...])` call", callee),
        }
    }
}
