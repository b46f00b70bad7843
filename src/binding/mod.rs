//! Tool binding edits.
//!
//! An agent's tools are listed as `*agentstack.tools['<name>']` entries in one
//! or more list literals (its binding sites). Edits are local to one entry: a
//! new entry is inserted after the last element in the list's own layout, and
//! a removed entry is cut together with its separator. Other elements, their
//! separators and any comments in the list keep their exact text. Every edit
//! is verified by re-parsing before it is committed.
//!
//! No order is defined between tools added by independent calls; callers must
//! not depend on the relative position of two tools in the list.

#[cfg(test)]
mod tests;

use crate::error::{AgentwireError, Result};
use crate::locate::{StructuralElement, StructuralLocator};
use crate::records::ToolRecord;
use crate::source::{SourceDocument, Span};
use tracing::debug;
use tree_sitter::Node;

/// Runtime namespace the entrypoint resolves tool callables through.
pub const TOOLS_NAMESPACE: &str = "agentstack.tools";

/// The entry that binds every callable `tool_name` exports.
pub fn tool_reference(tool_name: &str) -> String {
    format!("*{}['{}']", TOOLS_NAMESPACE, tool_name)
}

/// One element of a binding-site list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingEntry {
    /// Source text of the element, kept verbatim on rewrite.
    pub text: String,
    /// Tool name when the element is a recognised tool reference.
    pub tool: Option<String>,
    /// Where the element sits in the document.
    pub span: Span,
}

/// Inserts and removes tool references at an agent's binding sites.
#[derive(Debug, Clone, Copy)]
pub struct ToolBindingEditor<'l> {
    locator: &'l StructuralLocator,
}

impl<'l> ToolBindingEditor<'l> {
    pub fn new(locator: &'l StructuralLocator) -> Self {
        Self { locator }
    }

    /// Bind `tool` to `agent_name` at every one of the agent's sites.
    ///
    /// A site that already references the tool is left alone, so repeated
    /// calls never produce duplicates.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - At least one site was rewritten
    /// * `Ok(false)` - The tool was already bound everywhere
    /// * `Err(AgentwireError::ValidationError)` - The agent has no binding
    ///   site; the entrypoint needs agent scaffolding first
    pub fn add(&self, doc: &mut SourceDocument, agent_name: &str, tool: &ToolRecord) -> Result<bool> {
        let scaffolding = |e: AgentwireError| {
            e.escalate_not_found(|missing| {
                format!(
                    "cannot add tool `{}` to agent `{}`: {} (generate the agent scaffolding first)",
                    tool.name, agent_name, missing
                )
            })
        };
        // Linked sites alone are not enough to bind a tool.
        self.locator
            .find_tool_binding_site(doc, agent_name)
            .map_err(scaffolding)?;
        let sites = self
            .locator
            .find_tool_binding_sites(doc, agent_name)
            .map_err(scaffolding)?;

        let mut changed = false;
        for site in back_to_front(sites) {
            let entries = binding_entries(doc, &site)?;
            if entries.iter().any(|e| e.tool.as_deref() == Some(tool.name.as_str())) {
                continue;
            }
            let (region, text) = insertion(doc, &site, &tool_reference(&tool.name))?;
            debug!(agent = %site.owner, site = ?site.span, region = ?region, "inserting tool entry");
            doc.replace_region(region, &text)?;
            changed = true;
        }
        Ok(changed)
    }

    /// Unbind `tool` from `agent_name` at every one of the agent's sites.
    ///
    /// Removing a tool that is not bound, or from an agent without binding
    /// sites, is a no-op.
    pub fn remove(
        &self,
        doc: &mut SourceDocument,
        agent_name: &str,
        tool: &ToolRecord,
    ) -> Result<bool> {
        let sites = match self.locator.find_tool_binding_sites(doc, agent_name) {
            Ok(sites) => sites,
            Err(AgentwireError::NotFound(missing)) => {
                debug!(agent = agent_name, tool = %tool.name, %missing, "nothing to remove");
                return Ok(false);
            }
            Err(e) => return Err(e),
        };

        let mut changed = false;
        for mut site in back_to_front(sites) {
            // A tool listed twice is removed twice; the list shrinks each time.
            while let Some(entry) = binding_entries(doc, &site)?
                .into_iter()
                .find(|e| e.tool.as_deref() == Some(tool.name.as_str()))
            {
                let cut = removal_cut(doc, &site, entry.span)?;
                debug!(agent = %site.owner, site = ?site.span, cut = ?cut, "cutting tool entry");
                doc.replace_region(cut, "")?;
                site.span.end -= cut.end - cut.start;
                changed = true;
            }
        }
        Ok(changed)
    }

    /// Tool names bound at the agent's primary site, in list order.
    ///
    /// An empty list yields an empty vector. A missing site is a validation
    /// error because the agent cannot be inspected.
    pub fn tool_names(&self, doc: &SourceDocument, agent_name: &str) -> Result<Vec<String>> {
        let site = self
            .locator
            .find_tool_binding_site(doc, agent_name)
            .map_err(|e| e.escalate_not_found(|missing| missing.to_string()))?;

        let mut names: Vec<String> = Vec::new();
        for name in binding_entries(doc, &site)?.into_iter().filter_map(|e| e.tool) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        Ok(names)
    }
}

/// Parse the elements of a binding-site list.
///
/// Comments inside the list are not elements and are skipped.
pub fn binding_entries(doc: &SourceDocument, site: &StructuralElement) -> Result<Vec<BindingEntry>> {
    let entries = elements(&site_list(doc, site)?)
        .into_iter()
        .map(|element| BindingEntry {
            text: doc.text(&element).to_string(),
            tool: referenced_tool(doc, &element),
            span: Span::of(&element),
        })
        .collect();
    Ok(entries)
}

fn site_list<'a>(doc: &'a SourceDocument, site: &StructuralElement) -> Result<Node<'a>> {
    doc.node_at(site.span, "list").ok_or_else(|| {
        AgentwireError::NotFound(format!(
            "tool list for agent `{}` at bytes {}..{}",
            site.owner, site.span.start, site.span.end
        ))
    })
}

fn elements<'a>(list: &Node<'a>) -> Vec<Node<'a>> {
    let mut cursor = list.walk();
    list.named_children(&mut cursor)
        .filter(|element| element.kind() != "comment")
        .collect()
}

/// Tool name in `*agentstack.tools['<name>']`, if `element` has that shape.
fn referenced_tool(doc: &SourceDocument, element: &Node<'_>) -> Option<String> {
    if element.kind() != "list_splat" {
        return None;
    }
    let mut cursor = element.walk();
    let subscript = element
        .named_children(&mut cursor)
        .find(|child| child.kind() == "subscript")?;

    let value = subscript.child_by_field_name("value")?;
    let namespace: String = doc
        .text(&value)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if namespace != TOOLS_NAMESPACE {
        return None;
    }

    let key = subscript.child_by_field_name("subscript")?;
    doc.string_value(&key).map(str::to_string)
}

/// The region to rewrite to add `reference` to the site's list, and its new
/// text. Existing bytes in the region are carried over unchanged.
///
/// Single-line lists get `", <reference>"` after the last element. In lists
/// spanning several lines the entry goes on its own line after the last
/// element, at that element's indentation, following the list's trailing
/// comma convention. A comment after the last element stays on its line.
fn insertion(doc: &SourceDocument, site: &StructuralElement, reference: &str) -> Result<(Span, String)> {
    let list = site_list(doc, site)?;
    let source = doc.serialize();
    let close = list.end_byte() - 1;
    let multiline = doc.span_text(site.span).contains('\n');

    let last = elements(&list).last().copied();
    let placed = match (last, multiline) {
        (None, false) => (Span::empty(close), reference.to_string()),
        (None, true) => {
            let indent = doc.line_indent(site.span.start);
            let close_line = line_start(source, close);
            if source[close_line..close].trim().is_empty() {
                (Span::empty(close_line), format!("{}    {},\n", indent, reference))
            } else {
                (
                    Span::empty(close),
                    format!("\n{}    {},\n{}", indent, reference, indent),
                )
            }
        }
        (Some(last), false) => (Span::empty(last.end_byte()), format!(", {}", reference)),
        (Some(last), true) => {
            let item_indent = doc.line_indent(last.start_byte());
            match separator_after(last) {
                Some(comma) => (
                    Span::empty(line_end(source, comma.end_byte()).min(close)),
                    format!("\n{}{},", item_indent, reference),
                ),
                None => {
                    let eol = line_end(source, last.end_byte()).min(close);
                    let tail = &source[last.end_byte()..eol];
                    (
                        Span {
                            start: last.end_byte(),
                            end: eol,
                        },
                        format!(",{}\n{}{}", tail, item_indent, reference),
                    )
                }
            }
        }
    };
    Ok(placed)
}

/// The bytes to delete to take `entry` out of the site's list.
///
/// The entry goes with one adjacent comma: the one after it, or for a last
/// element without a trailing comma the one directly before it. A line left
/// holding nothing but whitespace is removed whole.
fn removal_cut(doc: &SourceDocument, site: &StructuralElement, entry: Span) -> Result<Span> {
    let list = site_list(doc, site)?;
    let source = doc.serialize();
    let element = elements(&list)
        .into_iter()
        .find(|element| Span::of(element) == entry)
        .ok_or_else(|| {
            AgentwireError::NotFound(format!(
                "list element at bytes {}..{} for agent `{}`",
                entry.start, entry.end, site.owner
            ))
        })?;

    let (mut start, mut end) = match (separator_after(element), separator_before(element)) {
        (Some(comma), _) => (entry.start, comma.end_byte()),
        (None, Some(comma)) => (comma.start_byte(), entry.end),
        (None, None) => (entry.start, entry.end),
    };

    let rest = &source[end..];
    let spaces = rest.len() - rest.trim_start_matches([' ', '\t']).len();
    match rest[spaces..].chars().next() {
        Some('\n') | Some('\r') | Some(']') | None => {
            let before = &source[..start];
            start -= before.len() - before.trim_end_matches([' ', '\t']).len();
        }
        _ => end += spaces,
    }

    let eol = line_end(source, end);
    if start == line_start(source, start) && source[end..eol].trim().is_empty() && eol < source.len()
    {
        return Ok(Span { start, end: eol + 1 });
    }
    Ok(Span { start, end })
}

fn separator_after<'a>(element: Node<'a>) -> Option<Node<'a>> {
    element.next_sibling().filter(|node| node.kind() == ",")
}

/// The comma directly before `element`. A comment in between means the
/// comma belongs to the line above and is left alone.
fn separator_before<'a>(element: Node<'a>) -> Option<Node<'a>> {
    element.prev_sibling().filter(|node| node.kind() == ",")
}

fn back_to_front(mut sites: Vec<StructuralElement>) -> Vec<StructuralElement> {
    sites.sort_by_key(|site| std::cmp::Reverse(site.span.start));
    sites
}

fn line_start(source: &str, offset: usize) -> usize {
    source[..offset].rfind('\n').map_or(0, |i| i + 1)
}

/// Offset of the newline ending the line that holds `offset`.
fn line_end(source: &str, offset: usize) -> usize {
    source[offset..]
        .find('\n')
        .map_or(source.len(), |i| offset + i)
}
