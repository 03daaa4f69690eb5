//! Field-list metadata extraction.
//!
//! A field list in the source (`:author: Jane Doe`) is a key/value block, not
//! body content. So is a docinfo block, whose bibliographic elements
//! (`<author>`, `<date>`, ...) are fields named after the element. Both backends capture every field into a [`Metadata`] map
//! that is returned next to the rendered body, so a templating step can
//! merge it into a document wrapper.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::tree::{BibliographicField, Document, NodeId, NodeKind};

/// Name → plain-text value mapping extracted from field lists.
///
/// Serializes as a plain map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, String>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing an earlier field of the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// One field of a field list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEntry {
    pub name: String,
    pub value: String,
}

/// Read the name and plain-text body of a field.
///
/// Accepts a `Field` node or a bibliographic element. The value of an
/// `authors` group lists its authors separated by `", "`.
///
/// Returns `None` when the node is not a field or has no name.
pub fn read_field(doc: &Document, field: NodeId) -> Option<FieldEntry> {
    match doc.kind(field) {
        NodeKind::Field => {}
        NodeKind::Bibliographic(BibliographicField::Authors) => {
            let value = doc
                .children(field)
                .map(|author| doc.text_content(author).trim().to_string())
                .filter(|author| !author.is_empty())
                .collect::<Vec<_>>()
                .join(", ");
            return Some(FieldEntry {
                name: BibliographicField::Authors.name().to_string(),
                value,
            });
        }
        NodeKind::Bibliographic(kind) => {
            return Some(FieldEntry {
                name: kind.name().to_string(),
                value: doc.text_content(field).trim().to_string(),
            });
        }
        _ => return None,
    }
    let name_node = doc.find_child(field, NodeKind::FieldName)?;
    let name = doc.text_content(name_node).trim().to_string();
    if name.is_empty() {
        return None;
    }
    let value = doc
        .find_child(field, NodeKind::FieldBody)
        .map(|body| doc.text_content(body).trim().to_string())
        .unwrap_or_default();
    Some(FieldEntry { name, value })
}
