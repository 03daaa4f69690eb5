//! DocBook 5 backend.
//!
//! The translator walks the document once and builds an element tree on an
//! explicit [`ElementStack`]. Each entered node pushes a frame recording how
//! many elements it opened and the context flags to restore on exit, so the
//! stack stays balanced whatever a handler decided to emit.
//!
//! # Ids
//!
//! An element that represents a node gets an `xml:id` chosen in this order:
//! the node's first explicit id, `"<parent id>.title"` for a title whose
//! parent element carries an id, then an id left pending by a preceding
//! target. Helper elements (`imageobject`, `personname`, ...) never get one.
//!
//! # Example
//!
//! ```
//! use rst2db::Backend;
//! use rst2db::docbook::{DocBookConfig, DocBookWriter};
//! use rst2db::tree::{Document, NodeId, NodeKind};
//!
//! let mut doc = Document::new();
//! let section = doc.add(NodeId::ROOT, NodeKind::Section);
//! let para = doc.add(section, NodeKind::Paragraph);
//! doc.add_text(para, "Hello");
//!
//! let config = DocBookConfig {
//!     root_element: "article".to_string(),
//!     document_id: Some("hello".to_string()),
//!     ..Default::default()
//! };
//! let rendered = DocBookWriter::with_config(config).render(&doc).unwrap();
//! assert!(rendered.body.contains("<para>Hello</para>"));
//! ```

mod element;
mod serialize;

pub use element::{Element, ElementStack, XmlNode};
pub use serialize::NAMESPACES;

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::Result;
use crate::metadata::{Metadata, read_field};
use crate::tree::{AdmonitionKind, BibliographicField, Document, NodeId, NodeKind};
use crate::util::comment_body;
use crate::walk::{Visit, Visitor, walk};
use crate::{Backend, Rendered};

const XML_ID: &str = "xml:id";

/// Target id docutils gives the first index entry.
const INDEX_TARGET: &str = "index-0";

/// First character of an anonymous reference URI that really points inside
/// the document set.
const INTERNAL_SENTINEL: char = '_';

/// Configuration for DocBook output.
#[derive(Debug, Clone)]
pub struct DocBookConfig {
    /// Name of the root element (`section`, `article`, `chapter`, ...).
    pub root_element: String,
    /// `xml:id` of the root element.
    pub document_id: Option<String>,
    /// Emit the `<?xml ...?>` declaration. Off when the output is embedded
    /// in a template.
    pub xml_declaration: bool,
    /// Spaces per nesting level for element-only content.
    pub indent: usize,
}

impl Default for DocBookConfig {
    fn default() -> Self {
        Self {
            root_element: "section".to_string(),
            document_id: None,
            xml_declaration: true,
            indent: 2,
        }
    }
}

/// Backend producing DocBook 5 XML.
#[derive(Debug, Clone, Default)]
pub struct DocBookWriter {
    config: DocBookConfig,
}

impl DocBookWriter {
    /// Create a DocBookWriter with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a DocBookWriter with the specified configuration.
    pub fn with_config(config: DocBookConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DocBookConfig {
        &self.config
    }

    /// Translate a document into an element tree without serializing it.
    pub fn build(&self, doc: &Document) -> Result<(Element, Metadata)> {
        let mut translator = Translator::new(&self.config);
        walk(doc, &mut translator);
        translator.finish(doc)
    }
}

impl Backend for DocBookWriter {
    fn render(&self, doc: &Document) -> Result<Rendered> {
        let (root, metadata) = self.build(doc)?;
        let body = serialize::serialize(&root, self.config.xml_declaration, self.config.indent)?;
        Ok(Rendered { body, metadata })
    }
}

/// Per-node record kept between `enter` and `exit`.
struct Frame {
    /// Elements the node opened that are still on the stack.
    opened: usize,
    skip_text: bool,
    in_literal: bool,
    in_figure: bool,
    /// An `<info>` element was opened for this node's fields.
    info_open: bool,
}

/// Translation state for one run.
struct Translator<'c> {
    config: &'c DocBookConfig,
    stack: ElementStack,
    frames: Vec<Frame>,
    /// Id registered by a target, waiting for the next node-owned element.
    pending_id: Option<String>,
    skip_text: bool,
    in_literal: bool,
    in_figure: bool,
    root_opened: bool,
    /// Id emitted for each node that got one.
    emitted_ids: HashMap<NodeId, String>,
    metadata: Metadata,
}

impl<'c> Translator<'c> {
    fn new(config: &'c DocBookConfig) -> Self {
        Self {
            config,
            stack: ElementStack::new(),
            frames: Vec::new(),
            pending_id: None,
            skip_text: false,
            in_literal: false,
            in_figure: false,
            root_opened: false,
            emitted_ids: HashMap::new(),
            metadata: Metadata::new(),
        }
    }

    fn finish(mut self, doc: &Document) -> Result<(Element, Metadata)> {
        self.ensure_root(doc);
        if let Some(id) = self.pending_id.take() {
            debug!(id = %id, "target id never attached to an element");
        }
        let root = self.stack.finish()?;
        Ok((root, self.metadata))
    }

    // --- stack operations ---

    /// Open the root element on behalf of `owner`.
    fn open_root(&mut self, doc: &Document, owner: NodeId) {
        let pending = self.pending_id.take();
        let id = self
            .config
            .document_id
            .clone()
            .or_else(|| doc.attrs.first_id(owner).map(str::to_string))
            .or(pending);

        let mut root = Element::new(self.config.root_element.as_str());
        if let Some(id) = id {
            root.set_attr(XML_ID, id.as_str());
            self.emitted_ids.insert(owner, id);
        }
        root.set_attr("version", "5.0");
        self.stack.push(root);
        self.root_opened = true;
    }

    /// Open the root lazily for content that precedes any section.
    fn ensure_root(&mut self, doc: &Document) {
        if !self.root_opened {
            self.open_root(doc, NodeId::ROOT);
        }
    }

    fn resolve_id(&mut self, doc: &Document, id: NodeId) -> Option<String> {
        let pending = self.pending_id.take();
        let resolved = if let Some(explicit) = doc.attrs.first_id(id) {
            explicit.to_string()
        } else if doc.kind(id) == NodeKind::Title
            && let Some(parent_id) = doc.parent(id).and_then(|p| {
                self.emitted_ids
                    .get(&p)
                    .map(String::as_str)
                    .or_else(|| doc.attrs.first_id(p))
            })
        {
            format!("{parent_id}.title")
        } else {
            return pending;
        };
        if let Some(dropped) = pending {
            debug!(id = %dropped, kept = %resolved, "pending target id superseded");
        }
        Some(resolved)
    }

    /// Give a node-owned element its id.
    fn attach_id(&mut self, doc: &Document, id: NodeId, element: &mut Element) {
        self.ensure_root(doc);
        if let Some(xml_id) = self.resolve_id(doc, id) {
            element.set_attr(XML_ID, xml_id.as_str());
            self.emitted_ids.insert(id, xml_id);
        }
    }

    /// Open an element representing `id`; it closes when the node exits.
    fn open(&mut self, doc: &Document, id: NodeId, mut element: Element) {
        self.attach_id(doc, id, &mut element);
        self.push_helper(element);
    }

    /// Open an element that closes when the current node exits.
    fn push_helper(&mut self, element: Element) {
        self.stack.push(element);
        if let Some(frame) = self.frames.last_mut() {
            frame.opened += 1;
        }
    }

    /// Add a complete element representing `id`.
    fn leaf(&mut self, doc: &Document, id: NodeId, mut element: Element) {
        self.attach_id(doc, id, &mut element);
        self.stack.leaf(element);
    }

    fn text(&mut self, doc: &Document, text: &str) {
        if self.skip_text {
            return;
        }
        self.ensure_root(doc);
        self.stack.text(text);
    }

    // --- node handlers ---

    fn section(&mut self, doc: &Document, id: NodeId) {
        if self.root_opened {
            self.open(doc, id, Element::new("section"));
        } else {
            self.open_root(doc, id);
        }
    }

    fn image(&mut self, doc: &Document, id: NodeId) {
        let attrs = &doc.attrs;
        let mut data = Element::new("imagedata");
        match attrs.uri(id) {
            Some(uri) => data.set_attr("fileref", uri),
            None => warn!(node = id.0, "image without uri"),
        }
        if let Some(scale) = attrs.scale(id) {
            data.set_attr("scale", scale);
        }
        if let Some(width) = attrs.width(id) {
            data.set_attr("width", width);
        }
        if let Some(align) = attrs.align(id) {
            let key = if matches!(align, "top" | "middle" | "bottom") {
                "valign"
            } else {
                "align"
            };
            data.set_attr(key, align);
        }

        if self.in_figure {
            self.ensure_root(doc);
        } else {
            self.open(doc, id, Element::new("mediaobject"));
        }
        self.stack.leaf(Element::new("imageobject").with_child(data));
        if let Some(alt) = attrs.alt(id) {
            let phrase = Element::new("phrase").with_text(alt);
            self.stack.leaf(Element::new("textobject").with_child(phrase));
        }
    }

    fn literal_block(&mut self, doc: &Document, id: NodeId) {
        let mut listing = Element::new("programlisting");
        if let Some(language) = doc.attrs.code_language(id) {
            listing.set_attr("language", language);
        }
        self.open(doc, id, listing);
        self.in_literal = true;
    }

    fn reference(&mut self, doc: &Document, id: NodeId) {
        let attrs = &doc.attrs;
        let link = if let Some(refid) = attrs.refid(id) {
            Element::new("link").with_attr("linkend", refid)
        } else if let Some(refuri) = attrs.refuri(id) {
            match internal_target(doc, id, refuri) {
                Some(linkend) => Element::new("link").with_attr("linkend", linkend),
                None => Element::new("link").with_attr("xlink:href", refuri),
            }
        } else {
            warn!(text = %doc.text_content(id), "reference without target");
            return;
        };
        self.open(doc, id, link);
    }

    fn target(&mut self, doc: &Document, id: NodeId) {
        let Some(refid) = doc.attrs.refid(id) else {
            return;
        };
        if refid == INDEX_TARGET {
            debug!("ignoring index target");
            return;
        }
        if let Some(dropped) = self.pending_id.replace(refid.to_string()) {
            debug!(id = %dropped, "pending target id replaced");
        }
    }

    fn field(&mut self, doc: &Document, id: NodeId) {
        let Some(entry) = read_field(doc, id) else {
            debug!(node = id.0, "field without a name");
            return;
        };
        match entry.name.as_str() {
            "author" => {
                self.open_info(doc, id);
                let name = Element::new("personname").with_text(entry.value.as_str());
                self.leaf(doc, id, Element::new("author").with_child(name));
            }
            "authors" if doc.kind(id) == NodeKind::Bibliographic(BibliographicField::Authors) => {
                self.open_info(doc, id);
                for author in doc.children(id) {
                    let text = doc.text_content(author);
                    let name = Element::new("personname").with_text(text.trim());
                    self.stack.leaf(Element::new("author").with_child(name));
                }
            }
            "date" => {
                self.open_info(doc, id);
                self.leaf(doc, id, Element::new("pubdate").with_text(entry.value.as_str()));
            }
            _ => {}
        }
        self.metadata.insert(entry.name, entry.value);
    }

    /// Open the `<info>` element of the field list holding `field`, once.
    ///
    /// It is owned by the list's frame and closes when the list exits.
    fn open_info(&mut self, doc: &Document, field: NodeId) {
        let Some(list) = doc.parent(field) else {
            return;
        };
        let Some(index) = self.frames.len().checked_sub(2) else {
            return;
        };
        if self.frames[index].info_open {
            return;
        }
        let mut info = Element::new("info");
        self.attach_id(doc, list, &mut info);
        self.stack.push(info);
        let frame = &mut self.frames[index];
        frame.opened += 1;
        frame.info_open = true;
    }

    fn admonition(&mut self, doc: &Document, id: NodeId, kind: AdmonitionKind) {
        let (tag, title) = match kind {
            AdmonitionKind::Note | AdmonitionKind::Generic => ("note", None),
            AdmonitionKind::Tip => ("tip", None),
            AdmonitionKind::Warning => ("warning", None),
            AdmonitionKind::Caution => ("caution", None),
            AdmonitionKind::Important => ("important", None),
            AdmonitionKind::Attention => ("important", kind.label()),
            AdmonitionKind::Danger | AdmonitionKind::Error => ("warning", kind.label()),
            AdmonitionKind::Hint => ("tip", kind.label()),
        };
        self.open(doc, id, Element::new(tag));
        if let Some(title) = title {
            self.stack.leaf(Element::new("title").with_text(title));
        }
    }

    fn diagnostic(&mut self, doc: &Document, id: NodeId) {
        let text = doc.text_content(id);
        warn!(kind = ?doc.kind(id), "{}", text.trim());
        self.ensure_root(doc);
        self.stack.comment(&comment_body(&text));
    }
}

impl Visitor for Translator<'_> {
    fn enter(&mut self, doc: &Document, id: NodeId) -> Visit {
        self.frames.push(Frame {
            opened: 0,
            skip_text: self.skip_text,
            in_literal: self.in_literal,
            in_figure: self.in_figure,
            info_open: false,
        });
        // Nothing inside a skipped region is emitted.
        if self.skip_text {
            return Visit::SkipChildren;
        }

        let kind = doc.kind(id);
        if self.in_literal && kind != NodeKind::Text {
            return Visit::Continue;
        }

        match kind {
            NodeKind::Document | NodeKind::Other => {}
            NodeKind::Section => self.section(doc, id),
            NodeKind::Topic => self.open(doc, id, Element::new("section")),
            NodeKind::Title => self.open(doc, id, Element::new("title")),
            NodeKind::Subtitle => self.open(doc, id, Element::new("subtitle")),
            NodeKind::Paragraph => self.open(doc, id, Element::new("para")),
            NodeKind::BlockQuote => self.open(doc, id, Element::new("blockquote")),
            NodeKind::BulletList => self.open(doc, id, Element::new("itemizedlist")),
            NodeKind::EnumeratedList => self.open(doc, id, Element::new("orderedlist")),
            NodeKind::ListItem | NodeKind::Definition => {
                self.open(doc, id, Element::new("listitem"))
            }
            NodeKind::DefinitionList => self.open(doc, id, Element::new("variablelist")),
            NodeKind::DefinitionListItem => self.open(doc, id, Element::new("varlistentry")),
            NodeKind::Term => self.open(doc, id, Element::new("term")),
            NodeKind::Table => self.open(doc, id, Element::new("table")),
            NodeKind::TableGroup => {
                let mut tgroup = Element::new("tgroup");
                if let Some(cols) = doc.attrs.cols(id) {
                    tgroup.set_attr("cols", cols.to_string());
                }
                self.open(doc, id, tgroup);
            }
            NodeKind::ColumnSpec => {
                let mut colspec = Element::new("colspec");
                if let Some(width) = doc.attrs.colwidth(id) {
                    colspec.set_attr("colwidth", width.to_string());
                }
                self.open(doc, id, colspec);
            }
            NodeKind::TableHead => self.open(doc, id, Element::new("thead")),
            NodeKind::TableBody => self.open(doc, id, Element::new("tbody")),
            NodeKind::Row => self.open(doc, id, Element::new("row")),
            NodeKind::Entry => self.open(doc, id, Element::new("entry")),
            NodeKind::Figure => {
                self.open(doc, id, Element::new("mediaobject"));
                self.in_figure = true;
            }
            NodeKind::Caption => {
                self.open(doc, id, Element::new("caption"));
                self.push_helper(Element::new("para"));
            }
            NodeKind::Image => {
                self.image(doc, id);
                return Visit::SkipChildren;
            }
            NodeKind::LiteralBlock => self.literal_block(doc, id),
            NodeKind::Literal => self.open(doc, id, Element::new("code")),
            NodeKind::Emphasis => self.open(doc, id, Element::new("emphasis")),
            NodeKind::Strong => {
                self.open(doc, id, Element::new("emphasis").with_attr("role", "strong"))
            }
            NodeKind::Subscript => self.open(doc, id, Element::new("subscript")),
            NodeKind::Superscript => self.open(doc, id, Element::new("superscript")),
            NodeKind::TitleReference => self.open(doc, id, Element::new("citetitle")),
            NodeKind::Reference => self.reference(doc, id),
            NodeKind::Target => self.target(doc, id),
            NodeKind::FieldList | NodeKind::DocInfo => {}
            NodeKind::Field | NodeKind::Bibliographic(_) => {
                self.field(doc, id);
                return Visit::SkipChildren;
            }
            NodeKind::FieldName | NodeKind::FieldBody => {}
            NodeKind::Admonition(admonition) => self.admonition(doc, id, admonition),
            NodeKind::Comment
            | NodeKind::SubstitutionDefinition
            | NodeKind::SubstitutionReference => {
                debug!(kind = ?kind, "skipping text");
                self.skip_text = true;
            }
            NodeKind::Index => return Visit::SkipChildren,
            NodeKind::Problematic | NodeKind::SystemMessage => {
                self.diagnostic(doc, id);
                return Visit::SkipChildren;
            }
            NodeKind::Text => {
                if let Some(node) = doc.node(id) {
                    self.text(doc, doc.text(node.text));
                }
                return Visit::SkipChildren;
            }
        }
        Visit::Continue
    }

    fn exit(&mut self, _doc: &Document, _id: NodeId) {
        let Some(frame) = self.frames.pop() else {
            return;
        };
        for _ in 0..frame.opened {
            self.stack.pop();
        }
        self.skip_text = frame.skip_text;
        self.in_literal = frame.in_literal;
        self.in_figure = frame.in_figure;
    }
}

/// Link target of a reference that points inside the document set.
///
/// A reference counts as internal when it says so, or when it is anonymous
/// and its URI starts with [`INTERNAL_SENTINEL`].
fn internal_target(doc: &Document, id: NodeId, refuri: &str) -> Option<String> {
    let declared = doc.attrs.internal(id) == Some(true);
    let hidden = if doc.attrs.is_anonymous(id) {
        refuri.strip_prefix(INTERNAL_SENTINEL)
    } else {
        None
    };
    match hidden {
        Some(uri) => Some(strip_extension(uri).to_string()),
        None if declared => Some(strip_extension(refuri).to_string()),
        None => None,
    }
}

/// Remove the extension of the last path segment (`guide/intro.html` →
/// `guide/intro`). Leading dots of the segment do not start an extension.
fn strip_extension(uri: &str) -> &str {
    let segment_start = uri.rfind('/').map_or(0, |i| i + 1);
    let segment = &uri[segment_start..];
    match segment.rfind('.') {
        Some(dot) if segment[..dot].chars().any(|c| c != '.') => &uri[..segment_start + dot],
        _ => uri,
    }
}
