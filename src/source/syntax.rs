//! Accessors for the handful of Python shapes the locator matches on.

use super::SourceDocument;
use super::nodes::named_children;
use tree_sitter::Node;

impl SourceDocument {
    /// Dotted names of the decorators on a `decorated_definition`.
    ///
    /// `@agent`, `@agentstack.agent` and `@CrewBase()` yield `agent`,
    /// `agentstack.agent` and `CrewBase`. Whitespace inside the expression is
    /// dropped so `@agentstack . agent` still matches.
    pub fn decorator_names(&self, decorated: &Node<'_>) -> Vec<String> {
        named_children(decorated)
            .into_iter()
            .filter(|child| child.kind() == "decorator")
            .filter_map(|decorator| named_children(&decorator).into_iter().next())
            .map(|expr| {
                let target = if expr.kind() == "call" {
                    expr.child_by_field_name("function").unwrap_or(expr)
                } else {
                    expr
                };
                self.text(&target)
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect()
            })
            .collect()
    }

    /// The `name` field of a class or function definition.
    pub fn definition_name<'a>(&'a self, definition: &Node<'a>) -> Option<&'a str> {
        definition
            .child_by_field_name("name")
            .map(|name| self.text(&name))
    }

    /// Final name segment of a call's callee: `Agent(...)` and
    /// `agent.bind_tools(...)` yield `Agent` and `bind_tools`.
    pub fn callee_name<'a>(&'a self, call: &Node<'a>) -> Option<&'a str> {
        let function = call.child_by_field_name("function")?;
        match function.kind() {
            "identifier" => Some(self.text(&function)),
            "attribute" => function
                .child_by_field_name("attribute")
                .map(|attr| self.text(&attr)),
            _ => None,
        }
    }

    /// Value node of keyword argument `keyword` in a call.
    pub fn keyword_value<'a>(&'a self, call: &Node<'a>, keyword: &str) -> Option<Node<'a>> {
        let arguments = call.child_by_field_name("arguments")?;
        named_children(&arguments)
            .into_iter()
            .filter(|arg| arg.kind() == "keyword_argument")
            .find(|arg| {
                arg.child_by_field_name("name")
                    .is_some_and(|name| self.text(&name) == keyword)
            })
            .and_then(|arg| arg.child_by_field_name("value"))
    }

    /// Positional arguments of a call, in order.
    pub fn positional_arguments<'a>(&self, call: &Node<'a>) -> Vec<Node<'a>> {
        call.child_by_field_name("arguments")
            .filter(|arguments| arguments.kind() == "argument_list")
            .map(|arguments| {
                named_children(&arguments)
                    .into_iter()
                    .filter(|arg| {
                        !matches!(arg.kind(), "keyword_argument" | "dictionary_splat")
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Value of a plain string literal. F-strings and concatenations yield `None`.
    pub fn string_value<'a>(&'a self, node: &Node<'a>) -> Option<&'a str> {
        if node.kind() != "string" {
            return None;
        }
        let parts = {
            let mut cursor = node.walk();
            node.children(&mut cursor).collect::<Vec<_>>()
        };
        let start = parts.iter().find(|p| p.kind() == "string_start")?;
        let end = parts.iter().rev().find(|p| p.kind() == "string_end")?;
        if parts.iter().any(|p| p.kind() == "interpolation")
            || self.text(start).contains(['f', 'F'])
        {
            return None;
        }
        Some(&self.source[start.end_byte()..end.start_byte()])
    }

    /// Member name in `self.<name>` or `self.<name>()`.
    pub fn self_member<'a>(&'a self, node: &Node<'a>) -> Option<&'a str> {
        let attribute = match node.kind() {
            "call" => node.child_by_field_name("function")?,
            "attribute" => *node,
            _ => return None,
        };
        if attribute.kind() != "attribute" {
            return None;
        }
        let object = attribute.child_by_field_name("object")?;
        if object.kind() != "identifier" || self.text(&object) != "self" {
            return None;
        }
        attribute
            .child_by_field_name("attribute")
            .map(|attr| self.text(&attr))
    }
}
