//! Lazy pre-order traversal over a syntax tree.

use tree_sitter::{Node, TreeCursor};

/// Iterator over the nodes of a subtree that satisfy a predicate.
///
/// Walks in document order using a single `TreeCursor`; nothing is collected
/// up front, so callers that stop at the first match pay only for the prefix
/// they visited.
pub struct Nodes<'a, F> {
    cursor: TreeCursor<'a>,
    exhausted: bool,
    predicate: F,
}

impl<'a, F> Nodes<'a, F>
where
    F: FnMut(&Node<'a>) -> bool,
{
    pub(crate) fn new(scope: Node<'a>, predicate: F) -> Self {
        Self {
            cursor: scope.walk(),
            exhausted: false,
            predicate,
        }
    }

    fn advance(&mut self) {
        if self.cursor.goto_first_child() {
            return;
        }
        loop {
            if self.cursor.goto_next_sibling() {
                return;
            }
            // The cursor cannot climb above the node it was created from.
            if !self.cursor.goto_parent() {
                self.exhausted = true;
                return;
            }
        }
    }
}

impl<'a, F> Iterator for Nodes<'a, F>
where
    F: FnMut(&Node<'a>) -> bool,
{
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Node<'a>> {
        while !self.exhausted {
            let node = self.cursor.node();
            self.advance();
            if (self.predicate)(&node) {
                return Some(node);
            }
        }
        None
    }
}

/// Named children of a node, skipping comments.
pub(crate) fn named_children<'a>(node: &Node<'a>) -> Vec<Node<'a>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}
