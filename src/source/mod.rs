//! Entrypoint source documents.
//!
//! A `SourceDocument` owns the text of one Python file together with its
//! tree-sitter syntax tree. Reads go through lazy node iterators over the
//! current tree; writes replace the exact byte span of a node and are only
//! committed when the resulting text still parses cleanly, so every byte
//! outside the replaced span is left unchanged.

mod nodes;
mod syntax;

#[cfg(test)]
mod tests;

pub use nodes::Nodes;

use crate::error::{AgentwireError, Result};
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser, Tree};

/// A byte range into the current document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// The span covered by a syntax node.
    pub fn of(node: &Node<'_>) -> Self {
        Self {
            start: node.start_byte(),
            end: node.end_byte(),
        }
    }

    /// An empty span at `offset`, used for pure insertions.
    pub fn empty(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }
}

/// One parsed Python source file.
pub struct SourceDocument {
    path: Option<PathBuf>,
    source: String,
    tree: Tree,
}

impl std::fmt::Debug for SourceDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceDocument")
            .field("path", &self.path)
            .field("len", &self.source.len())
            .finish()
    }
}

impl SourceDocument {
    /// Load and parse a file from disk.
    ///
    /// # Returns
    ///
    /// * `Err(AgentwireError::UserError)` - The file could not be read
    /// * `Err(AgentwireError::ParseError)` - The file is not valid Python
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            AgentwireError::UserError(format!(
                "failed to read entrypoint '{}': {}",
                path.display(),
                e
            ))
        })?;

        let tree = parse_python(&source)
            .map_err(|msg| AgentwireError::ParseError(format!("{}: {}", path.display(), msg)))?;

        Ok(Self {
            path: Some(path.to_path_buf()),
            source,
            tree,
        })
    }

    /// Parse in-memory source text.
    pub fn parse(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let tree = parse_python(&source).map_err(AgentwireError::ParseError)?;
        Ok(Self {
            path: None,
            source,
            tree,
        })
    }

    /// The file this document was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Source text of a node.
    pub fn text<'a>(&'a self, node: &Node<'a>) -> &'a str {
        &self.source[node.byte_range()]
    }

    /// Source text of a span.
    pub fn span_text(&self, span: Span) -> &str {
        &self.source[span.start..span.end]
    }

    /// Lazily walk every node of the current tree, yielding those that match.
    ///
    /// The walk is pre-order (document order). Each call starts a fresh walk
    /// against the tree as it is now, so the result is never stale after a
    /// mutation.
    pub fn find<'a, F>(&'a self, predicate: F) -> Nodes<'a, F>
    where
        F: FnMut(&Node<'a>) -> bool,
    {
        Nodes::new(self.tree.root_node(), predicate)
    }

    /// Like [`find`](Self::find), restricted to the subtree rooted at `scope`.
    pub fn find_within<'a, F>(&'a self, scope: Node<'a>, predicate: F) -> Nodes<'a, F>
    where
        F: FnMut(&Node<'a>) -> bool,
    {
        Nodes::new(scope, predicate)
    }

    /// Resolve a span back to the node of `kind` that covers it exactly.
    pub fn node_at(&self, span: Span, kind: &str) -> Option<Node<'_>> {
        let mut node = self
            .tree
            .root_node()
            .descendant_for_byte_range(span.start, span.end)?;
        loop {
            if Span::of(&node) != span {
                return None;
            }
            if node.kind() == kind {
                return Some(node);
            }
            node = node.parent()?;
        }
    }

    /// Leading whitespace of the line containing `offset`.
    pub fn line_indent(&self, offset: usize) -> &str {
        let line_start = self.source[..offset].rfind('\n').map_or(0, |i| i + 1);
        let line = &self.source[line_start..];
        let width = line
            .find(|c: char| c != ' ' && c != '\t')
            .unwrap_or(line.len());
        &line[..width]
    }

    /// 1-based line number of a byte offset.
    pub fn line_number(&self, offset: usize) -> usize {
        let offset = offset.min(self.source.len());
        self.source.as_bytes()[..offset]
            .iter()
            .filter(|b| **b == b'\n')
            .count()
            + 1
    }

    /// Replace the text of `span` with `new_text`.
    ///
    /// The candidate text is re-parsed first; if it does not parse cleanly
    /// the document is left exactly as it was and `MutationError` is returned.
    pub fn replace_region(&mut self, span: Span, new_text: &str) -> Result<()> {
        if span.start > span.end
            || span.end > self.source.len()
            || !self.source.is_char_boundary(span.start)
            || !self.source.is_char_boundary(span.end)
        {
            return Err(AgentwireError::MutationError(format!(
                "span {}..{} is outside the document",
                span.start, span.end
            )));
        }

        let mut candidate = String::with_capacity(
            self.source.len() - (span.end - span.start) + new_text.len(),
        );
        candidate.push_str(&self.source[..span.start]);
        candidate.push_str(new_text);
        candidate.push_str(&self.source[span.end..]);

        let tree = parse_python(&candidate).map_err(|msg| {
            AgentwireError::MutationError(format!(
                "replacing bytes {}..{} with {:?} would produce invalid source ({})",
                span.start, span.end, new_text, msg
            ))
        })?;

        self.source = candidate;
        self.tree = tree;
        Ok(())
    }

    /// Insert text at a byte offset (an empty-span replacement).
    pub fn insert_at(&mut self, offset: usize, text: &str) -> Result<()> {
        self.replace_region(Span::empty(offset), text)
    }

    /// The current text buffer.
    pub fn serialize(&self) -> &str {
        &self.source
    }

    /// Atomically write the current text back to the file it was loaded from.
    pub fn save(&self) -> Result<()> {
        let path = self.path.as_deref().ok_or_else(|| {
            AgentwireError::UserError("document was not loaded from a file".to_string())
        })?;
        crate::fs::atomic_write_file(path, &self.source)
    }
}

/// Parse Python source, rejecting any tree with ERROR or MISSING nodes.
fn parse_python(source: &str) -> std::result::Result<Tree, String> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| format!("failed to load Python grammar: {}", e))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| "parser produced no tree".to_string())?;

    let root = tree.root_node();
    if root.has_error() {
        let location = Nodes::new(root, |n| n.is_error() || n.is_missing())
            .next()
            .map(|n| {
                let pos = n.start_position();
                format!("line {}, column {}", pos.row + 1, pos.column + 1)
            })
            .unwrap_or_else(|| "unknown location".to_string());
        return Err(format!("syntax error at {}", location));
    }

    Ok(tree)
}
