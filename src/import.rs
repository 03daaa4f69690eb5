//! Docutils XML loader.
//!
//! Reads the serialized doctree written by `rst2xml` (or Sphinx's `xml`
//! builder) into a [`Document`]. Element names map through
//! [`NodeKind::from_tag`]; attributes the tree model knows are kept, the rest
//! are dropped.

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::tree::{Document, NodeId, NodeKind};
use crate::util::decode_input;

/// Load a Docutils XML file from raw bytes.
///
/// Bytes are decoded as UTF-8 (BOM honored), then with the encoding named by
/// the XML declaration, then as Windows-1252.
pub fn read_docutils_xml(bytes: &[u8]) -> Result<Document> {
    parse_docutils_xml(&decode_input(bytes))
}

/// Parse a Docutils XML string.
///
/// # Example
///
/// ```
/// use rst2db::import::parse_docutils_xml;
/// use rst2db::tree::{NodeId, NodeKind};
///
/// let doc = parse_docutils_xml(
///     "<document><section ids=\"intro\"><title>Intro</title></section></document>",
/// )
/// .unwrap();
/// let section = doc.children(NodeId::ROOT).next().unwrap();
/// assert_eq!(doc.kind(section), NodeKind::Section);
/// assert_eq!(doc.attrs.ids(section), vec!["intro"]);
/// ```
pub fn parse_docutils_xml(content: &str) -> Result<Document> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().check_end_names = false;

    let mut loader = Loader::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                loader.start(&e, false)?;
            }
            Event::Empty(e) => {
                loader.start(&e, true)?;
            }
            Event::End(e) => {
                let name = tag_name(e.name().as_ref());
                loader.end(&name)?;
            }
            Event::Text(e) => loader.text.push_str(&String::from_utf8_lossy(&e)),
            Event::CData(e) => loader.text.push_str(&String::from_utf8_lossy(&e)),
            Event::GeneralRef(e) => {
                let entity = String::from_utf8_lossy(&e);
                match resolve_entity(&entity) {
                    Some(resolved) => loader.text.push_str(&resolved),
                    None => {
                        warn!(entity = %entity, "unknown entity reference kept verbatim");
                        loader.text.push_str(&format!("&{entity};"));
                    }
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, DOCTYPE.
            _ => {}
        }
    }

    loader.finish()
}

/// Tree under construction.
struct Loader {
    doc: Document,
    /// Open elements with their tag names. Empty until the root is seen.
    open: Vec<(NodeId, String)>,
    /// Number of open elements whose whitespace is content.
    text_depth: usize,
    /// Character data not yet attached to a node.
    text: String,
    root_closed: bool,
}

impl Loader {
    fn new() -> Self {
        Self {
            doc: Document::new(),
            open: Vec::new(),
            text_depth: 0,
            text: String::new(),
            root_closed: false,
        }
    }

    fn start(&mut self, e: &BytesStart<'_>, empty: bool) -> Result<()> {
        self.flush_text()?;
        let name = tag_name(e.name().as_ref());

        let id = match self.open.last() {
            Some(&(parent, _)) => {
                let kind = NodeKind::from_tag(&name);
                if kind == NodeKind::Other {
                    debug!(tag = %name, "unknown element loaded as pass-through");
                }
                self.doc.add(parent, kind)
            }
            None if self.root_closed => {
                return Err(Error::InvalidTree(format!(
                    "element <{name}> after the document element"
                )));
            }
            None if name != "document" => {
                return Err(Error::InvalidTree(format!(
                    "root element is <{name}>, expected <document>"
                )));
            }
            None => NodeId::ROOT,
        };

        for attr in e.attributes().flatten() {
            let key = tag_name(attr.key.as_ref());
            let raw = String::from_utf8_lossy(&attr.value);
            let value = unescape(&raw).map_err(quick_xml::Error::from)?;
            self.doc.attrs.set_attr(id, &key, &value);
        }

        if empty {
            if id == NodeId::ROOT {
                self.root_closed = true;
            }
        } else {
            if self.doc.kind(id).holds_text() {
                self.text_depth += 1;
            }
            self.open.push((id, name));
        }
        Ok(())
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.flush_text()?;
        let Some((id, open_name)) = self.open.pop() else {
            return Err(Error::InvalidTree(format!("unexpected closing tag </{name}>")));
        };
        if open_name != name {
            return Err(Error::InvalidTree(format!(
                "closing tag </{name}> does not match <{open_name}>"
            )));
        }
        if self.doc.kind(id).holds_text() {
            self.text_depth -= 1;
        }
        if self.open.is_empty() {
            self.root_closed = true;
        }
        Ok(())
    }

    /// Attach buffered character data to the innermost open element.
    ///
    /// Whitespace-only runs outside text-bearing elements are indentation
    /// and are dropped.
    fn flush_text(&mut self) -> Result<()> {
        let text = std::mem::take(&mut self.text);
        if text.is_empty() {
            return Ok(());
        }
        let blank = text.trim().is_empty();
        match self.open.last() {
            Some(&(parent, _)) => {
                if !blank || self.text_depth > 0 {
                    self.doc.add_text(parent, &text);
                }
                Ok(())
            }
            None if blank => Ok(()),
            None => Err(Error::InvalidTree(format!(
                "text outside the document element: {:?}",
                text.trim()
            ))),
        }
    }

    fn finish(mut self) -> Result<Document> {
        self.flush_text()?;
        if let Some((_, name)) = self.open.last() {
            return Err(Error::InvalidTree(format!("unclosed element <{name}>")));
        }
        if !self.root_closed {
            return Err(Error::InvalidTree("no <document> element".to_string()));
        }
        Ok(self.doc)
    }
}

/// Element or attribute name without a namespace prefix.
fn tag_name(name: &[u8]) -> String {
    let local = name
        .iter()
        .rposition(|&b| b == b':')
        .map(|i| &name[i + 1..])
        .unwrap_or(name);
    String::from_utf8_lossy(local).into_owned()
}

fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        _ => {}
    }

    let code = if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok()
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok()
    } else {
        None
    };
    code.and_then(char::from_u32).map(String::from)
}
