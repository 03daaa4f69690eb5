//! Sparse attributes for document tree nodes.
//!
//! Most nodes carry no attributes at all, so attributes live in per-name
//! maps keyed by node rather than as `Option` fields on every node.
//!
//! String values are stored in a single contiguous buffer, with TextRange
//! references into that buffer.

use std::collections::HashMap;

use super::node::{NodeId, TextRange};

/// Sparse map for node attributes.
#[derive(Debug, Default, Clone)]
pub struct AttributeMap {
    /// Contiguous buffer for all string attribute values.
    buffer: String,
    /// Identifier set, in declaration order.
    ids: HashMap<NodeId, Vec<TextRange>>,
    names: HashMap<NodeId, Vec<TextRange>>,
    classes: HashMap<NodeId, Vec<TextRange>>,
    /// External target of a reference or target.
    refuri: HashMap<NodeId, TextRange>,
    /// Internal target (an id in this document).
    refid: HashMap<NodeId, TextRange>,
    /// Image location.
    uri: HashMap<NodeId, TextRange>,
    alt: HashMap<NodeId, TextRange>,
    language: HashMap<NodeId, TextRange>,
    scale: HashMap<NodeId, TextRange>,
    align: HashMap<NodeId, TextRange>,
    width: HashMap<NodeId, TextRange>,
    /// Explicit internal/external marker on references.
    internal: HashMap<NodeId, bool>,
    anonymous: HashMap<NodeId, bool>,
    /// Column count of a table group.
    cols: HashMap<NodeId, u32>,
    /// Declared width of a table column.
    colwidth: HashMap<NodeId, u32>,
}

impl AttributeMap {
    /// Create a new empty attribute map.
    pub fn new() -> Self {
        Self::default()
    }

    fn append(&mut self, s: &str) -> TextRange {
        let start = self.buffer.len() as u32;
        self.buffer.push_str(s);
        TextRange::new(start, s.len() as u32)
    }

    fn get_str(&self, range: TextRange) -> &str {
        let start = range.start as usize;
        let end = range.end() as usize;
        &self.buffer[start..end]
    }

    fn set_str(map: &mut HashMap<NodeId, TextRange>, range: TextRange, node: NodeId) {
        map.insert(node, range);
    }

    fn list<'a>(&'a self, map: &'a HashMap<NodeId, Vec<TextRange>>, node: NodeId) -> Vec<&'a str> {
        map.get(&node)
            .map(|ranges| ranges.iter().map(|r| self.get_str(*r)).collect())
            .unwrap_or_default()
    }

    fn set_list<S: AsRef<str>>(&mut self, node: NodeId, values: &[S], which: ListAttr) {
        let ranges: Vec<TextRange> = values
            .iter()
            .map(AsRef::as_ref)
            .filter(|v| !v.is_empty())
            .map(|v| self.append(v))
            .collect();
        if ranges.is_empty() {
            return;
        }
        let map = match which {
            ListAttr::Ids => &mut self.ids,
            ListAttr::Names => &mut self.names,
            ListAttr::Classes => &mut self.classes,
        };
        map.insert(node, ranges);
    }

    // --- ids / names / classes ---

    /// Set the identifier set for a node.
    pub fn set_ids<S: AsRef<str>>(&mut self, node: NodeId, ids: &[S]) {
        self.set_list(node, ids, ListAttr::Ids);
    }

    /// Identifiers of a node, in declaration order.
    pub fn ids(&self, node: NodeId) -> Vec<&str> {
        self.list(&self.ids, node)
    }

    /// The first identifier of a node, the one that gets emitted.
    pub fn first_id(&self, node: NodeId) -> Option<&str> {
        self.ids
            .get(&node)
            .and_then(|ranges| ranges.first())
            .map(|r| self.get_str(*r))
    }

    pub fn set_names<S: AsRef<str>>(&mut self, node: NodeId, names: &[S]) {
        self.set_list(node, names, ListAttr::Names);
    }

    pub fn names(&self, node: NodeId) -> Vec<&str> {
        self.list(&self.names, node)
    }

    pub fn set_classes<S: AsRef<str>>(&mut self, node: NodeId, classes: &[S]) {
        self.set_list(node, classes, ListAttr::Classes);
    }

    pub fn classes(&self, node: NodeId) -> Vec<&str> {
        self.list(&self.classes, node)
    }

    // --- single-valued strings ---

    pub fn set_refuri(&mut self, node: NodeId, refuri: &str) {
        let range = self.append(refuri);
        Self::set_str(&mut self.refuri, range, node);
    }

    pub fn refuri(&self, node: NodeId) -> Option<&str> {
        self.refuri.get(&node).map(|r| self.get_str(*r))
    }

    pub fn set_refid(&mut self, node: NodeId, refid: &str) {
        if !refid.is_empty() {
            let range = self.append(refid);
            Self::set_str(&mut self.refid, range, node);
        }
    }

    pub fn refid(&self, node: NodeId) -> Option<&str> {
        self.refid.get(&node).map(|r| self.get_str(*r))
    }

    pub fn set_uri(&mut self, node: NodeId, uri: &str) {
        let range = self.append(uri);
        Self::set_str(&mut self.uri, range, node);
    }

    pub fn uri(&self, node: NodeId) -> Option<&str> {
        self.uri.get(&node).map(|r| self.get_str(*r))
    }

    pub fn set_alt(&mut self, node: NodeId, alt: &str) {
        let range = self.append(alt);
        Self::set_str(&mut self.alt, range, node);
    }

    pub fn alt(&self, node: NodeId) -> Option<&str> {
        self.alt.get(&node).map(|r| self.get_str(*r))
    }

    /// Set the programming language for a literal block.
    pub fn set_language(&mut self, node: NodeId, language: &str) {
        if !language.is_empty() {
            let range = self.append(language);
            Self::set_str(&mut self.language, range, node);
        }
    }

    pub fn language(&self, node: NodeId) -> Option<&str> {
        self.language.get(&node).map(|r| self.get_str(*r))
    }

    /// Language of a literal block: the second class of a block written
    /// with the `code` directive, else the `language` attribute.
    pub fn code_language(&self, node: NodeId) -> Option<&str> {
        let classes = self.classes(node);
        if classes.first() == Some(&"code")
            && let Some(&language) = classes.get(1)
        {
            return Some(language);
        }
        self.language(node)
    }

    pub fn set_scale(&mut self, node: NodeId, scale: &str) {
        let range = self.append(scale);
        Self::set_str(&mut self.scale, range, node);
    }

    pub fn scale(&self, node: NodeId) -> Option<&str> {
        self.scale.get(&node).map(|r| self.get_str(*r))
    }

    pub fn set_align(&mut self, node: NodeId, align: &str) {
        let range = self.append(align);
        Self::set_str(&mut self.align, range, node);
    }

    pub fn align(&self, node: NodeId) -> Option<&str> {
        self.align.get(&node).map(|r| self.get_str(*r))
    }

    pub fn set_width(&mut self, node: NodeId, width: &str) {
        let range = self.append(width);
        Self::set_str(&mut self.width, range, node);
    }

    pub fn width(&self, node: NodeId) -> Option<&str> {
        self.width.get(&node).map(|r| self.get_str(*r))
    }

    // --- flags and numbers ---

    pub fn set_internal(&mut self, node: NodeId, internal: bool) {
        self.internal.insert(node, internal);
    }

    /// Explicit internal marker of a reference; `None` when undeclared.
    pub fn internal(&self, node: NodeId) -> Option<bool> {
        self.internal.get(&node).copied()
    }

    pub fn set_anonymous(&mut self, node: NodeId, anonymous: bool) {
        if anonymous {
            self.anonymous.insert(node, true);
        }
    }

    pub fn is_anonymous(&self, node: NodeId) -> bool {
        self.anonymous.get(&node).copied().unwrap_or(false)
    }

    pub fn set_cols(&mut self, node: NodeId, cols: u32) {
        self.cols.insert(node, cols);
    }

    pub fn cols(&self, node: NodeId) -> Option<u32> {
        self.cols.get(&node).copied()
    }

    pub fn set_colwidth(&mut self, node: NodeId, width: u32) {
        self.colwidth.insert(node, width);
    }

    pub fn colwidth(&self, node: NodeId) -> Option<u32> {
        self.colwidth.get(&node).copied()
    }

    // --- Generic access ---

    /// Set an attribute from its docutils name and serialized value.
    ///
    /// List attributes are space-separated, booleans accept `1`/`True`/`true`,
    /// numbers that fail to parse are ignored.
    ///
    /// Returns `true` if the attribute name was recognized, `false` otherwise.
    ///
    /// # Example
    ///
    /// ```
    /// use rst2db::tree::{AttributeMap, NodeId};
    ///
    /// let mut attrs = AttributeMap::new();
    /// let node = NodeId(1);
    ///
    /// assert!(attrs.set_attr(node, "ids", "intro overview"));
    /// assert_eq!(attrs.ids(node), vec!["intro", "overview"]);
    /// assert!(!attrs.set_attr(node, "source", "index.rst"));
    /// ```
    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) -> bool {
        match name {
            "ids" => self.set_ids(node, &split_list(value)),
            "names" => self.set_names(node, &split_list(value)),
            "classes" => self.set_classes(node, &split_list(value)),
            "refuri" => self.set_refuri(node, value),
            "refid" => self.set_refid(node, value),
            "uri" => self.set_uri(node, value),
            "alt" => self.set_alt(node, value),
            "language" => self.set_language(node, value),
            "scale" => self.set_scale(node, value),
            "align" => self.set_align(node, value),
            "width" => self.set_width(node, value),
            "internal" => self.set_internal(node, parse_bool(value)),
            "anonymous" => self.set_anonymous(node, parse_bool(value)),
            "cols" => {
                if let Ok(cols) = value.trim().parse() {
                    self.set_cols(node, cols);
                }
            }
            "colwidth" => {
                if let Ok(width) = value.trim().parse() {
                    self.set_colwidth(node, width);
                }
            }
            _ => return false,
        }
        true
    }
}

enum ListAttr {
    Ids,
    Names,
    Classes,
}

fn split_list(value: &str) -> Vec<&str> {
    value.split_whitespace().collect()
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim(), "1" | "True" | "true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_keep_order() {
        let mut attrs = AttributeMap::new();
        let node = NodeId(3);
        attrs.set_ids(node, &["b", "a"]);
        assert_eq!(attrs.ids(node), vec!["b", "a"]);
        assert_eq!(attrs.first_id(node), Some("b"));
        assert!(attrs.ids(NodeId(4)).is_empty());
        assert_eq!(attrs.first_id(NodeId(4)), None);
    }

    #[test]
    fn test_empty_lists_are_not_stored() {
        let mut attrs = AttributeMap::new();
        attrs.set_attr(NodeId(1), "ids", "   ");
        assert_eq!(attrs.first_id(NodeId(1)), None);
    }

    #[test]
    fn test_generic_flags_and_numbers() {
        let mut attrs = AttributeMap::new();
        let node = NodeId(2);
        attrs.set_attr(node, "internal", "True");
        attrs.set_attr(node, "anonymous", "1");
        attrs.set_attr(node, "cols", "3");
        attrs.set_attr(node, "colwidth", "wide");

        assert_eq!(attrs.internal(node), Some(true));
        assert!(attrs.is_anonymous(node));
        assert_eq!(attrs.cols(node), Some(3));
        assert_eq!(attrs.colwidth(node), None);
        assert_eq!(attrs.internal(NodeId(9)), None);
    }

    #[test]
    fn test_code_language() {
        let mut attrs = AttributeMap::new();
        attrs.set_attr(NodeId(1), "classes", "code python");
        attrs.set_attr(NodeId(2), "language", "rust");
        attrs.set_attr(NodeId(3), "classes", "code");
        attrs.set_attr(NodeId(3), "language", "c");

        assert_eq!(attrs.code_language(NodeId(1)), Some("python"));
        assert_eq!(attrs.code_language(NodeId(2)), Some("rust"));
        assert_eq!(attrs.code_language(NodeId(3)), Some("c"));
        assert_eq!(attrs.code_language(NodeId(4)), None);
    }

    #[test]
    fn test_string_attributes() {
        let mut attrs = AttributeMap::new();
        let node = NodeId(5);
        attrs.set_attr(node, "uri", "images/logo.png");
        attrs.set_attr(node, "alt", "Logo");
        attrs.set_attr(node, "classes", "code python");

        assert_eq!(attrs.uri(node), Some("images/logo.png"));
        assert_eq!(attrs.alt(node), Some("Logo"));
        assert_eq!(attrs.classes(node), vec!["code", "python"]);
        assert_eq!(attrs.refuri(node), None);
    }
}
