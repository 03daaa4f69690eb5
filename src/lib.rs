//! # rst2db
//!
//! Translate a parsed reStructuredText document tree into DocBook 5 XML or
//! Markdown.
//!
//! ## Features
//!
//! - Load the docutils doctree from its XML serialization (`rst2xml`)
//! - Render DocBook 5 with stable element ids and a single root element
//! - Render word-wrapped Markdown with fenced code and pipe tables
//! - Capture field lists (`:author:`, `:date:`, ...) as metadata next to
//!   the rendered body
//! - Dress output with a Jinja2-compatible template (feature `template`)
//!
//! ## Quick Start
//!
//! ```
//! use rst2db::{Backend, DocBookWriter, MarkdownWriter, parse_docutils_xml};
//!
//! let doc = parse_docutils_xml(
//!     "<document><section ids=\"intro\"><title>Intro</title>\
//!      <paragraph>Hello <emphasis>world</emphasis>.</paragraph></section></document>",
//! )
//! .unwrap();
//!
//! let docbook = DocBookWriter::new().render(&doc).unwrap();
//! assert!(docbook.body.contains("<title>Intro</title>"));
//!
//! let markdown = MarkdownWriter::new().render(&doc).unwrap();
//! assert_eq!(markdown.body, "# Intro\n\nHello *world*.\n");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Docutils XML ──► import ──► tree::Document ──► walk ──┬─► docbook  ──► XML
//!                                                       └─► markdown ──► Markdown
//! ```
//!
//! Each backend is a [`walk::Visitor`] owning all of its translation state.
//! The document is only ever borrowed, so one tree can be rendered by any
//! number of backends.

pub mod docbook;
pub mod error;
pub mod import;
pub mod markdown;
pub mod metadata;
pub mod template;
pub mod tree;
pub(crate) mod util;
pub mod walk;

pub use docbook::{DocBookConfig, DocBookWriter};
pub use error::{Error, Result};
pub use import::{parse_docutils_xml, read_docutils_xml};
pub use markdown::{MarkdownConfig, MarkdownWriter};
pub use metadata::Metadata;
pub use tree::{Document, NodeId, NodeKind};

/// Output of one backend run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    /// The rendered document text.
    pub body: String,
    /// Field-list metadata captured while rendering.
    pub metadata: Metadata,
}

/// Trait for output formats.
///
/// A backend renders a whole document tree in one call. It keeps no state
/// between calls, so rendering the same tree twice gives identical output.
pub trait Backend {
    /// Render `doc`.
    fn render(&self, doc: &Document) -> Result<Rendered>;
}
