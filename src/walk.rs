//! Depth-first traversal with enter/exit hooks.
//!
//! Both backends are [`Visitor`]s: [`walk`] calls `enter` on a node, visits
//! its children in order unless `enter` returned [`Visit::SkipChildren`],
//! then calls `exit`. A visitor dispatches on [`NodeKind`](crate::NodeKind)
//! and falls through to [`Visit::Continue`] for kinds it has no handler for,
//! so unknown kinds never stop a translation.

use crate::tree::{Document, NodeId};

/// What the traversal should do after entering a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Descend into the node's children.
    Continue,
    /// The node was rendered atomically; do not visit its children.
    SkipChildren,
}

/// Hooks called by [`walk`].
pub trait Visitor {
    /// Called before a node's children are visited.
    fn enter(&mut self, doc: &Document, id: NodeId) -> Visit;

    /// Called after a node's children, including when they were skipped.
    fn exit(&mut self, _doc: &Document, _id: NodeId) {}
}

/// Walk the whole document, starting at the root.
pub fn walk<V: Visitor + ?Sized>(doc: &Document, visitor: &mut V) {
    walk_node(doc, doc.root(), visitor);
}

/// Walk the subtree rooted at `id`.
pub fn walk_node<V: Visitor + ?Sized>(doc: &Document, id: NodeId, visitor: &mut V) {
    if visitor.enter(doc, id) == Visit::Continue {
        for child in doc.children(id) {
            walk_node(doc, child, visitor);
        }
    }
    visitor.exit(doc, id);
}
