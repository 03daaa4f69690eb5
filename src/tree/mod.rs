//! Read-only document tree consumed by the translators.
//!
//! The tree mirrors the docutils doctree:
//! - Nodes with a closed set of kinds (sections, paragraphs, tables, etc.)
//! - Sparse attributes (ids, reference targets, image hints)
//! - Global text buffer with range references
//!
//! Translators only ever borrow a [`Document`]; everything they produce or
//! extract lives in their own state.
//!
//! # Example
//!
//! ```
//! use rst2db::tree::{Document, NodeId, NodeKind};
//!
//! let mut doc = Document::new();
//! let section = doc.add(NodeId::ROOT, NodeKind::Section);
//! let title = doc.add(section, NodeKind::Title);
//! doc.add_text(title, "Introduction");
//!
//! assert_eq!(doc.kind(NodeId::ROOT), NodeKind::Document);
//! assert_eq!(doc.text_content(section), "Introduction");
//! ```

mod attrs;
mod node;

pub use attrs::AttributeMap;
pub use node::{AdmonitionKind, BibliographicField, Node, NodeId, NodeKind, TextRange};

/// A parsed document tree.
///
/// The tree uses a parent-pointer / first-child / next-sibling representation
/// stored in a single arena.
#[derive(Debug, Clone)]
pub struct Document {
    /// All nodes in the tree (index 0 is always the root).
    nodes: Vec<Node>,
    /// Last child of each node, so appends stay O(1).
    last_child: Vec<Option<NodeId>>,
    /// Sparse node attributes.
    pub attrs: AttributeMap,
    /// Global text buffer (text nodes reference ranges into this).
    text: String,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a new empty document with a root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Document)],
            last_child: vec![None],
            attrs: AttributeMap::new(),
            text: String::new(),
        }
    }

    /// Get the root node ID.
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    /// Kind of a node; unknown IDs read as [`NodeKind::Other`].
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).map_or(NodeKind::Other, |n| n.kind)
    }

    /// Parent of a node (None for the root).
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Get the number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Allocate a new, detached node and return its ID.
    pub fn alloc_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        self.last_child.push(None);
        id
    }

    /// Append text to the global buffer and return the range.
    pub fn append_text(&mut self, text: &str) -> TextRange {
        let start = self.text.len() as u32;
        self.text.push_str(text);
        TextRange::new(start, text.len() as u32)
    }

    /// Get text from a range.
    pub fn text(&self, range: TextRange) -> &str {
        let start = range.start as usize;
        let end = range.end() as usize;
        &self.text[start..end]
    }

    /// Append a child node to a parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(child_node) = self.nodes.get_mut(child.0 as usize) {
            child_node.parent = Some(parent);
        }

        match self.last_child.get(parent.0 as usize).copied().flatten() {
            Some(last) => {
                if let Some(last_node) = self.nodes.get_mut(last.0 as usize) {
                    last_node.next_sibling = Some(child);
                }
            }
            None => {
                if let Some(parent_node) = self.nodes.get_mut(parent.0 as usize) {
                    parent_node.first_child = Some(child);
                }
            }
        }
        if let Some(slot) = self.last_child.get_mut(parent.0 as usize) {
            *slot = Some(child);
        }
    }

    /// Create a node of `kind` as the last child of `parent`.
    pub fn add(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = self.alloc_node(Node::new(kind));
        self.append_child(parent, id);
        id
    }

    /// Create a text node as the last child of `parent`.
    pub fn add_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let range = self.append_text(text);
        let id = self.alloc_node(Node::text(range));
        self.append_child(parent, id);
        id
    }

    /// Iterate over children of a node.
    pub fn children(&self, parent: NodeId) -> ChildIter<'_> {
        ChildIter {
            doc: self,
            current: self.node(parent).and_then(|n| n.first_child),
        }
    }

    /// First child of `parent` with the given kind.
    pub fn find_child(&self, parent: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.children(parent).find(|&c| self.kind(c) == kind)
    }

    /// Concatenated text of a node and all its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut result = String::new();
        self.collect_text(id, &mut result);
        result
    }

    fn collect_text(&self, id: NodeId, result: &mut String) {
        let Some(node) = self.node(id) else {
            return;
        };
        if node.kind == NodeKind::Text {
            result.push_str(self.text(node.text));
        }
        for child in self.children(id) {
            self.collect_text(child, result);
        }
    }
}

/// Iterator over children of a node.
pub struct ChildIter<'a> {
    doc: &'a Document,
    current: Option<NodeId>,
}

impl Iterator for ChildIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        self.current = self.doc.node(current).and_then(|n| n.next_sibling);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_creation() {
        let doc = Document::new();
        assert_eq!(doc.node_count(), 1);
        assert_eq!(doc.root(), NodeId::ROOT);

        let root = doc.node(NodeId::ROOT).unwrap();
        assert_eq!(root.kind, NodeKind::Document);
        assert!(root.parent.is_none());
    }

    #[test]
    fn test_children_keep_insertion_order() {
        let mut doc = Document::new();
        let list = doc.add(NodeId::ROOT, NodeKind::BulletList);
        let first = doc.add(list, NodeKind::ListItem);
        let second = doc.add(list, NodeKind::ListItem);
        let third = doc.add(list, NodeKind::ListItem);

        let children: Vec<_> = doc.children(list).collect();
        assert_eq!(children, vec![first, second, third]);
        assert_eq!(doc.parent(second), Some(list));
    }

    #[test]
    fn test_text_content_concatenates_descendants() {
        let mut doc = Document::new();
        let para = doc.add(NodeId::ROOT, NodeKind::Paragraph);
        doc.add_text(para, "Hello ");
        let em = doc.add(para, NodeKind::Emphasis);
        doc.add_text(em, "big");
        doc.add_text(para, " world");

        assert_eq!(doc.text_content(para), "Hello big world");
        assert_eq!(doc.text_content(em), "big");
    }

    #[test]
    fn test_find_child() {
        let mut doc = Document::new();
        let figure = doc.add(NodeId::ROOT, NodeKind::Figure);
        let image = doc.add(figure, NodeKind::Image);
        doc.add(figure, NodeKind::Caption);

        assert_eq!(doc.find_child(figure, NodeKind::Image), Some(image));
        assert_eq!(doc.find_child(figure, NodeKind::Table), None);
    }

    #[test]
    fn test_unknown_id_reads_as_other() {
        let doc = Document::new();
        assert_eq!(doc.kind(NodeId(42)), NodeKind::Other);
        assert_eq!(doc.children(NodeId(42)).count(), 0);
    }
}
