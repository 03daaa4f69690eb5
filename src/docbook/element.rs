//! In-memory XML element tree and the stack used to build it.

use crate::error::{Error, Result};

/// An XML element under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    /// Attributes in insertion order.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Builder-style text child.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    /// Builder-style element child.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    /// Set an attribute, replacing an existing value.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether any direct child is character data (mixed content).
    pub fn has_text(&self) -> bool {
        self.children.iter().any(|c| matches!(c, XmlNode::Text(_)))
    }

    /// Child elements, skipping text and comments.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|c| match c {
            XmlNode::Element(e) => Some(e),
            _ => None,
        })
    }
}

/// Content of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(Element),
    Text(String),
    Comment(String),
}

/// Stack of open elements.
///
/// The bottom of the stack is the document root; the top is the element
/// currently receiving content. A closed element is attached to its parent.
/// The root itself is only closed by [`ElementStack::finish`].
#[derive(Debug, Default)]
pub struct ElementStack {
    open: Vec<Element>,
    /// A pop was requested that would have closed the root.
    underflow: bool,
}

impl ElementStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of open elements, root included.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Open an element and make it current.
    pub fn push(&mut self, element: Element) {
        self.open.push(element);
    }

    /// Close the current element.
    ///
    /// Closing the root this way is a translator defect; it is recorded and
    /// reported by [`ElementStack::finish`].
    pub fn pop(&mut self) {
        if self.open.len() < 2 {
            self.underflow = true;
            return;
        }
        if let Some(element) = self.open.pop()
            && let Some(parent) = self.open.last_mut()
        {
            parent.children.push(XmlNode::Element(element));
        }
    }

    /// Open and immediately close an element.
    pub fn leaf(&mut self, element: Element) {
        if let Some(parent) = self.open.last_mut() {
            parent.children.push(XmlNode::Element(element));
        } else {
            self.underflow = true;
        }
    }

    /// Append character data to the current element.
    pub fn text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let Some(current) = self.open.last_mut() else {
            self.underflow = true;
            return;
        };
        match current.children.last_mut() {
            Some(XmlNode::Text(existing)) => existing.push_str(text),
            _ => current.children.push(XmlNode::Text(text.to_string())),
        }
    }

    /// Append a comment to the current element.
    pub fn comment(&mut self, text: &str) {
        match self.open.last_mut() {
            Some(current) => current.children.push(XmlNode::Comment(text.to_string())),
            None => self.underflow = true,
        }
    }

    /// Close the root and return it.
    ///
    /// Fails unless exactly the root is still open.
    pub fn finish(mut self) -> Result<Element> {
        if self.underflow || self.open.len() != 1 {
            return Err(Error::UnbalancedStack {
                depth: self.open.len(),
            });
        }
        self.open
            .pop()
            .ok_or(Error::UnbalancedStack { depth: 0 })
    }
}
