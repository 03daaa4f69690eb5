//! Markdown backend.
//!
//! Renders a document as GitHub-flavored Markdown:
//!
//! - [`escape`]: escaping and code-span helpers
//! - [`output`]: the line buffer handling indentation, quoting and wrapping
//!
//! ## Design Notes
//!
//! - **Deferred paragraphs**: inline content accumulates in a paragraph buffer
//!   and is word-wrapped when the paragraph ends
//! - **Atomic nodes**: images, figures, inline literals, references and table
//!   rows are rendered in full on entry and their children are skipped
//! - **Lists**: every bullet is `* `, every enumerated marker is `1. `; item
//!   content is indented four spaces past the marker
//! - **Tables**: pipe tables padded to the declared column widths, cell text
//!   escaped like paragraph text
//! - **Field lists and docinfo**: captured as metadata, never rendered

mod escape;
mod output;

pub use escape::{code_fence, code_span, escape_markdown};
pub use output::{LIST_INDENT, Output};

use tracing::{debug, warn};

use crate::error::Result;
use crate::metadata::{Metadata, read_field};
use crate::tree::{AdmonitionKind, Document, NodeId, NodeKind};
use crate::util::{collapse_whitespace, comment_body};
use crate::walk::{Visit, Visitor, walk};
use crate::{Backend, Rendered};

/// Configuration for Markdown output.
#[derive(Debug, Clone)]
pub struct MarkdownConfig {
    /// Line width for wrapping, indentation and quote markers included.
    pub line_width: usize,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self { line_width: 78 }
    }
}

/// Backend producing Markdown.
#[derive(Debug, Clone, Default)]
pub struct MarkdownWriter {
    config: MarkdownConfig,
}

impl MarkdownWriter {
    /// Create a new MarkdownWriter with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a MarkdownWriter with the specified configuration.
    pub fn with_config(config: MarkdownConfig) -> Self {
        Self { config }
    }
}

impl Backend for MarkdownWriter {
    fn render(&self, doc: &Document) -> Result<Rendered> {
        let mut ctx = RenderContext::new(&self.config);
        walk(doc, &mut ctx);
        Ok(ctx.finish())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Bullet,
    Enumerated,
}

/// Translation state for one run.
struct RenderContext<'c> {
    config: &'c MarkdownConfig,
    out: Output,
    /// Inline content of the paragraph being built.
    para: String,
    /// Raw text of the literal block being built.
    literal: String,
    literal_language: Option<String>,
    in_literal: bool,
    section_level: usize,
    lists: Vec<ListKind>,
    /// Column widths of the current table group.
    table_widths: Vec<usize>,
    metadata: Metadata,
}

impl<'c> RenderContext<'c> {
    fn new(config: &'c MarkdownConfig) -> Self {
        Self {
            config,
            out: Output::new(),
            para: String::new(),
            literal: String::new(),
            literal_language: None,
            in_literal: false,
            section_level: 0,
            lists: Vec::new(),
            table_widths: Vec::new(),
            metadata: Metadata::new(),
        }
    }

    fn finish(mut self) -> Rendered {
        self.flush_paragraph();
        Rendered {
            body: self.out.finish(),
            metadata: self.metadata,
        }
    }

    /// Wrap and write the paragraph buffer, if it holds anything.
    fn flush_paragraph(&mut self) {
        let text = collapse_whitespace(&std::mem::take(&mut self.para));
        if text.is_empty() {
            return;
        }
        self.out.wrapped(&text, self.config.line_width);
        self.out.blank();
    }

    fn heading(&mut self, level: usize, text: &str) {
        self.flush_paragraph();
        self.out.blank();
        self.out
            .line(&format!("{} {}", "#".repeat(level.max(1)), collapse_whitespace(text)));
        self.out.blank();
    }

    /// A standalone line followed by a blank line.
    fn block_line(&mut self, text: &str) {
        self.flush_paragraph();
        self.out.line(text);
        self.out.blank();
    }

    fn title(&mut self, doc: &Document, id: NodeId) {
        let text = doc.text_content(id);
        match doc.parent(id).map(|p| doc.kind(p)) {
            Some(NodeKind::Admonition(AdmonitionKind::Generic)) => {}
            Some(NodeKind::Document | NodeKind::Section | NodeKind::Topic) | None => {
                self.heading(self.section_level, &text);
            }
            Some(_) => self.block_line(&format!("**{}**", collapse_whitespace(&text))),
        }
    }

    fn list_item(&mut self) {
        self.flush_paragraph();
        let marker = match self.lists.last() {
            Some(ListKind::Enumerated) => "1. ",
            _ => "* ",
        };
        self.out.marker(marker);
    }

    fn admonition(&mut self, doc: &Document, id: NodeId, kind: AdmonitionKind) {
        self.flush_paragraph();
        let label = match kind.label() {
            Some(label) => label.to_string(),
            None => doc
                .find_child(id, NodeKind::Title)
                .map(|title| collapse_whitespace(&doc.text_content(title)))
                .filter(|title| !title.is_empty())
                .unwrap_or_else(|| "Note".to_string()),
        };
        self.out.quote_level += 1;
        self.out.line(&format!("**{label}:**"));
        self.out.blank();
    }

    fn image_markup(doc: &Document, image: NodeId, caption: Option<&str>) -> String {
        let alt = doc.attrs.alt(image).unwrap_or_default();
        let uri = doc.attrs.uri(image).unwrap_or_default();
        match caption {
            Some(caption) => format!("![{alt}]({uri} \"{}\")", caption.replace('"', "\\\"")),
            None => format!("![{alt}]({uri})"),
        }
    }

    fn image(&mut self, doc: &Document, id: NodeId) {
        let markup = Self::image_markup(doc, id, None);
        let inline = doc.parent(id).is_some_and(|p| {
            matches!(
                doc.kind(p),
                NodeKind::Paragraph | NodeKind::Reference | NodeKind::Emphasis | NodeKind::Strong
            )
        });
        if inline {
            self.para.push_str(&markup);
        } else {
            self.block_line(&markup);
        }
    }

    fn figure(&mut self, doc: &Document, id: NodeId) {
        let Some(image) = doc.find_child(id, NodeKind::Image) else {
            warn!(node = id.0, "figure without image");
            return;
        };
        let caption = doc
            .find_child(id, NodeKind::Caption)
            .map(|c| collapse_whitespace(&doc.text_content(c)))
            .filter(|c| !c.is_empty());
        let markup = Self::image_markup(doc, image, caption.as_deref());
        self.block_line(&markup);
    }

    fn reference(&mut self, doc: &Document, id: NodeId) {
        let text = escape_markdown(&doc.text_content(id));
        let attrs = &doc.attrs;
        let markup = if let Some(refuri) = attrs.refuri(id) {
            format!("[{text}]({refuri})")
        } else if let Some(refid) = attrs.refid(id) {
            format!("[{text}](#{refid})")
        } else {
            debug!(text = %text, "reference without target");
            text
        };
        self.para.push_str(&markup);
    }

    fn table_group(&mut self, doc: &Document, id: NodeId) {
        self.flush_paragraph();
        self.table_widths = doc
            .children(id)
            .filter(|&c| doc.kind(c) == NodeKind::ColumnSpec)
            .map(|c| doc.attrs.colwidth(c).unwrap_or(0) as usize)
            .collect();
    }

    fn row(&mut self, doc: &Document, id: NodeId) {
        let mut line = String::from("| ");
        for (i, entry) in doc
            .children(id)
            .filter(|&c| doc.kind(c) == NodeKind::Entry)
            .enumerate()
        {
            let text = escape_markdown(&collapse_whitespace(&doc.text_content(entry)));
            let width = self.table_widths.get(i).copied().unwrap_or(0);
            line.push_str(&format!("{text:<width$} | "));
        }
        line.pop();
        self.out.line(&line);
    }

    fn header_separator(&mut self) {
        let mut line = String::from("| ");
        for width in &self.table_widths {
            line.push_str(&"-".repeat(*width));
            line.push_str(" | ");
        }
        line.pop();
        self.out.line(&line);
    }

    fn start_literal_block(&mut self, doc: &Document, id: NodeId) {
        self.flush_paragraph();
        self.literal.clear();
        self.literal_language = doc.attrs.code_language(id).map(str::to_string);
        self.in_literal = true;
    }

    fn end_literal_block(&mut self) {
        let content = std::mem::take(&mut self.literal);
        let content = content.trim_end_matches('\n');
        let fence = code_fence(content);
        let language = self.literal_language.take().unwrap_or_default();
        self.out.line(&format!("{fence}{language}"));
        self.out.lines(content);
        self.out.line(&fence);
        self.out.blank();
        self.in_literal = false;
    }

    fn field(&mut self, doc: &Document, id: NodeId) {
        match read_field(doc, id) {
            Some(entry) => self.metadata.insert(entry.name, entry.value),
            None => debug!(node = id.0, "field without a name"),
        }
    }

    fn diagnostic(&mut self, doc: &Document, id: NodeId, kind: NodeKind) {
        let text = doc.text_content(id);
        warn!(kind = ?kind, "{}", text.trim());
        let comment = format!("<!--{}-->", comment_body(&text));
        if kind == NodeKind::Problematic {
            self.para.push_str(&comment);
        } else {
            self.block_line(&comment);
        }
    }
}

impl Visitor for RenderContext<'_> {
    fn enter(&mut self, doc: &Document, id: NodeId) -> Visit {
        let kind = doc.kind(id);
        if self.in_literal {
            if kind == NodeKind::Text
                && let Some(node) = doc.node(id)
            {
                self.literal.push_str(doc.text(node.text));
            }
            return Visit::Continue;
        }

        match kind {
            NodeKind::Document => {
                self.section_level = usize::from(doc.find_child(id, NodeKind::Title).is_some());
            }
            NodeKind::Section | NodeKind::Topic => {
                self.flush_paragraph();
                self.section_level += 1;
            }
            NodeKind::Title => {
                self.title(doc, id);
                return Visit::SkipChildren;
            }
            NodeKind::Subtitle => {
                let text = collapse_whitespace(&doc.text_content(id));
                self.block_line(&format!("*{text}*"));
                return Visit::SkipChildren;
            }
            NodeKind::Paragraph => self.flush_paragraph(),
            NodeKind::Text => {
                if let Some(node) = doc.node(id) {
                    self.para.push_str(&escape_markdown(doc.text(node.text)));
                }
            }
            NodeKind::BulletList => {
                self.flush_paragraph();
                self.lists.push(ListKind::Bullet);
            }
            NodeKind::EnumeratedList => {
                self.flush_paragraph();
                self.lists.push(ListKind::Enumerated);
            }
            NodeKind::ListItem => self.list_item(),
            NodeKind::DefinitionListItem => self.section_level += 1,
            NodeKind::Term => {
                self.heading(self.section_level, &doc.text_content(id));
                return Visit::SkipChildren;
            }
            NodeKind::Definition | NodeKind::BlockQuote => {
                self.flush_paragraph();
                self.out.quote_level += 1;
            }
            NodeKind::Admonition(admonition) => self.admonition(doc, id, admonition),
            NodeKind::Table => self.flush_paragraph(),
            NodeKind::TableGroup => self.table_group(doc, id),
            NodeKind::ColumnSpec => return Visit::SkipChildren,
            NodeKind::Row => {
                self.row(doc, id);
                return Visit::SkipChildren;
            }
            NodeKind::Image => {
                self.image(doc, id);
                return Visit::SkipChildren;
            }
            NodeKind::Figure => {
                self.figure(doc, id);
                return Visit::SkipChildren;
            }
            NodeKind::LiteralBlock => self.start_literal_block(doc, id),
            NodeKind::Literal => {
                self.para.push_str(&code_span(&doc.text_content(id)));
                return Visit::SkipChildren;
            }
            NodeKind::Emphasis => self.para.push('*'),
            NodeKind::Strong => self.para.push_str("**"),
            NodeKind::Reference => {
                self.reference(doc, id);
                return Visit::SkipChildren;
            }
            NodeKind::Field | NodeKind::Bibliographic(_) => {
                self.field(doc, id);
                return Visit::SkipChildren;
            }
            NodeKind::Target
            | NodeKind::Comment
            | NodeKind::SubstitutionDefinition
            | NodeKind::SubstitutionReference
            | NodeKind::Index => {
                debug!(kind = ?kind, "skipping subtree");
                return Visit::SkipChildren;
            }
            NodeKind::Problematic | NodeKind::SystemMessage => {
                self.diagnostic(doc, id, kind);
                return Visit::SkipChildren;
            }
            NodeKind::DefinitionList
            | NodeKind::TableHead
            | NodeKind::TableBody
            | NodeKind::Entry
            | NodeKind::Caption
            | NodeKind::Subscript
            | NodeKind::Superscript
            | NodeKind::TitleReference
            | NodeKind::FieldList
            | NodeKind::DocInfo
            | NodeKind::FieldName
            | NodeKind::FieldBody
            | NodeKind::Other => {}
        }
        Visit::Continue
    }

    fn exit(&mut self, doc: &Document, id: NodeId) {
        let kind = doc.kind(id);
        if self.in_literal {
            if kind == NodeKind::LiteralBlock {
                self.end_literal_block();
            }
            return;
        }

        match kind {
            NodeKind::Section | NodeKind::Topic | NodeKind::DefinitionListItem => {
                self.flush_paragraph();
                self.section_level = self.section_level.saturating_sub(1);
            }
            NodeKind::Paragraph => self.flush_paragraph(),
            NodeKind::BulletList => {
                self.lists.pop();
            }
            NodeKind::EnumeratedList => {
                self.lists.pop();
                self.out.blank();
            }
            NodeKind::ListItem => {
                self.flush_paragraph();
                self.out.end_item();
            }
            NodeKind::Definition | NodeKind::BlockQuote | NodeKind::Admonition(_) => {
                self.flush_paragraph();
                self.out.quote_level = self.out.quote_level.saturating_sub(1);
                self.out.blank();
            }
            NodeKind::Table => self.out.blank(),
            NodeKind::TableGroup => self.table_widths.clear(),
            NodeKind::TableHead => self.header_separator(),
            NodeKind::Emphasis => self.para.push('*'),
            NodeKind::Strong => self.para.push_str("**"),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::BibliographicField;
    use pretty_assertions::assert_eq;

    fn render(doc: &Document) -> Rendered {
        MarkdownWriter::new().render(doc).unwrap()
    }

    fn para(doc: &mut Document, parent: NodeId, text: &str) -> NodeId {
        let para = doc.add(parent, NodeKind::Paragraph);
        doc.add_text(para, text);
        para
    }

    fn section(doc: &mut Document, parent: NodeId, title: &str) -> NodeId {
        let section = doc.add(parent, NodeKind::Section);
        let title_node = doc.add(section, NodeKind::Title);
        doc.add_text(title_node, title);
        section
    }

    #[test]
    fn test_headings_follow_nesting() {
        let mut doc = Document::new();
        let outer = section(&mut doc, NodeId::ROOT, "Outer");
        para(&mut doc, outer, "Body.");
        let inner = section(&mut doc, outer, "Inner");
        para(&mut doc, inner, "More.");

        assert_eq!(render(&doc).body, "# Outer\n\nBody.\n\n## Inner\n\nMore.\n");
    }

    #[test]
    fn test_document_title_shifts_sections() {
        let mut doc = Document::new();
        let title = doc.add(NodeId::ROOT, NodeKind::Title);
        doc.add_text(title, "Guide");
        section(&mut doc, NodeId::ROOT, "Install");

        assert_eq!(render(&doc).body, "# Guide\n\n## Install\n");
    }

    #[test]
    fn test_bullet_list() {
        let mut doc = Document::new();
        let list = doc.add(NodeId::ROOT, NodeKind::BulletList);
        for text in ["A", "B"] {
            let item = doc.add(list, NodeKind::ListItem);
            para(&mut doc, item, text);
        }

        assert_eq!(render(&doc).body, "* A\n\n* B\n");
    }

    #[test]
    fn test_enumerated_list_nested_content() {
        let mut doc = Document::new();
        let list = doc.add(NodeId::ROOT, NodeKind::EnumeratedList);
        let item = doc.add(list, NodeKind::ListItem);
        para(&mut doc, item, "First");
        para(&mut doc, item, "Second paragraph");
        let item = doc.add(list, NodeKind::ListItem);
        para(&mut doc, item, "Next");
        para(&mut doc, NodeId::ROOT, "After");

        assert_eq!(
            render(&doc).body,
            "1. First\n\n    Second paragraph\n\n1. Next\n\nAfter\n"
        );
    }

    #[test]
    fn test_inline_markup() {
        let mut doc = Document::new();
        let p = doc.add(NodeId::ROOT, NodeKind::Paragraph);
        doc.add_text(p, "Use ");
        let literal = doc.add(p, NodeKind::Literal);
        doc.add_text(literal, "cargo");
        doc.add_text(p, " for ");
        let em = doc.add(p, NodeKind::Emphasis);
        doc.add_text(em, "fast");
        doc.add_text(p, " and ");
        let strong = doc.add(p, NodeKind::Strong);
        doc.add_text(strong, "safe");
        doc.add_text(p, " builds, see ");
        let link = doc.add(p, NodeKind::Reference);
        doc.attrs.set_refuri(link, "https://example.com");
        doc.add_text(link, "docs");
        doc.add_text(p, " or ");
        let local = doc.add(p, NodeKind::Reference);
        doc.attrs.set_refid(local, "intro");
        doc.add_text(local, "intro");
        doc.add_text(p, ".");

        assert_eq!(
            render(&doc).body,
            "Use `cargo` for *fast* and **safe** builds, see [docs](https://example.com) or\n\
             [intro](#intro).\n"
        );
    }

    #[test]
    fn test_table() {
        let mut doc = Document::new();
        let table = doc.add(NodeId::ROOT, NodeKind::Table);
        let group = doc.add(table, NodeKind::TableGroup);
        doc.attrs.set_cols(group, 2);
        for width in [10, 5] {
            let spec = doc.add(group, NodeKind::ColumnSpec);
            doc.attrs.set_colwidth(spec, width);
        }
        let add_row = |doc: &mut Document, parent: NodeId, cells: [&str; 2]| {
            let row = doc.add(parent, NodeKind::Row);
            for cell in cells {
                let entry = doc.add(row, NodeKind::Entry);
                para(doc, entry, cell);
            }
        };
        let head = doc.add(group, NodeKind::TableHead);
        add_row(&mut doc, head, ["Name", "Age"]);
        let body = doc.add(group, NodeKind::TableBody);
        add_row(&mut doc, body, ["Al", "30"]);

        assert_eq!(
            render(&doc).body,
            "| Name       | Age   |\n| ---------- | ----- |\n| Al         | 30    |\n"
        );
    }

    #[test]
    fn test_table_cell_pipes_are_escaped() {
        let mut doc = Document::new();
        let table = doc.add(NodeId::ROOT, NodeKind::Table);
        let group = doc.add(table, NodeKind::TableGroup);
        for width in [10, 5] {
            let spec = doc.add(group, NodeKind::ColumnSpec);
            doc.attrs.set_colwidth(spec, width);
        }
        let head = doc.add(group, NodeKind::TableHead);
        let body = doc.add(group, NodeKind::TableBody);
        for (parent, cells) in [(head, ["Name", "Age"]), (body, ["a|b", "or"])] {
            let row = doc.add(parent, NodeKind::Row);
            for cell in cells {
                let entry = doc.add(row, NodeKind::Entry);
                para(&mut doc, entry, cell);
            }
        }

        let body = render(&doc).body;
        assert_eq!(
            body,
            "| Name       | Age   |\n| ---------- | ----- |\n| a\\|b       | or    |\n"
        );
        for line in body.lines() {
            assert_eq!(line.replace("\\|", "").matches('|').count(), 3, "{line:?}");
        }
    }

    #[test]
    fn test_docinfo_becomes_metadata() {
        let mut doc = Document::new();
        let title = doc.add(NodeId::ROOT, NodeKind::Title);
        doc.add_text(title, "Title");
        let info = doc.add(NodeId::ROOT, NodeKind::DocInfo);
        let author = doc.add(info, NodeKind::Bibliographic(BibliographicField::Author));
        doc.add_text(author, "Jane Doe");
        let date = doc.add(info, NodeKind::Bibliographic(BibliographicField::Date));
        doc.add_text(date, "2024-01-01");
        para(&mut doc, NodeId::ROOT, "Body.");

        let rendered = render(&doc);
        assert_eq!(rendered.body, "# Title\n\nBody.\n");
        assert_eq!(rendered.metadata.get("author"), Some("Jane Doe"));
        assert_eq!(rendered.metadata.get("date"), Some("2024-01-01"));
    }

    #[test]
    fn test_literal_block() {
        let mut doc = Document::new();
        let block = doc.add(NodeId::ROOT, NodeKind::LiteralBlock);
        doc.attrs.set_language(block, "python");
        doc.add_text(block, "def f():\n");
        let inline = doc.add(block, NodeKind::Emphasis);
        doc.add_text(inline, "    return '*'");

        assert_eq!(
            render(&doc).body,
            "```python\ndef f():\n    return '*'\n```\n"
        );
    }

    #[test]
    fn test_literal_block_with_fence_inside() {
        let mut doc = Document::new();
        let block = doc.add(NodeId::ROOT, NodeKind::LiteralBlock);
        doc.add_text(block, "```\nnested\n```");

        assert_eq!(render(&doc).body, "````\n```\nnested\n```\n````\n");
    }

    #[test]
    fn test_figure_and_image() {
        let mut doc = Document::new();
        let figure = doc.add(NodeId::ROOT, NodeKind::Figure);
        let image = doc.add(figure, NodeKind::Image);
        doc.attrs.set_uri(image, "arch.png");
        doc.attrs.set_alt(image, "Architecture");
        let caption = doc.add(figure, NodeKind::Caption);
        doc.add_text(caption, "System overview");
        let bare = doc.add(NodeId::ROOT, NodeKind::Image);
        doc.attrs.set_uri(bare, "logo.png");

        assert_eq!(
            render(&doc).body,
            "![Architecture](arch.png \"System overview\")\n\n![](logo.png)\n"
        );
    }

    #[test]
    fn test_admonitions() {
        let mut doc = Document::new();
        let note = doc.add(NodeId::ROOT, NodeKind::Admonition(AdmonitionKind::Warning));
        para(&mut doc, note, "Careful.");
        let generic = doc.add(NodeId::ROOT, NodeKind::Admonition(AdmonitionKind::Generic));
        let title = doc.add(generic, NodeKind::Title);
        doc.add_text(title, "Remember");
        para(&mut doc, generic, "Tea.");

        assert_eq!(
            render(&doc).body,
            "> **Warning:**\n>\n> Careful.\n\n> **Remember:**\n>\n> Tea.\n"
        );
    }

    #[test]
    fn test_definition_list() {
        let mut doc = Document::new();
        let outer = section(&mut doc, NodeId::ROOT, "Terms");
        let list = doc.add(outer, NodeKind::DefinitionList);
        let item = doc.add(list, NodeKind::DefinitionListItem);
        let term = doc.add(item, NodeKind::Term);
        doc.add_text(term, "Crate");
        let definition = doc.add(item, NodeKind::Definition);
        para(&mut doc, definition, "A compilation unit.");

        assert_eq!(
            render(&doc).body,
            "# Terms\n\n## Crate\n\n> A compilation unit.\n"
        );
    }

    #[test]
    fn test_fields_become_metadata() {
        let mut doc = Document::new();
        let list = doc.add(NodeId::ROOT, NodeKind::FieldList);
        let field = doc.add(list, NodeKind::Field);
        let name = doc.add(field, NodeKind::FieldName);
        doc.add_text(name, "author");
        let body = doc.add(field, NodeKind::FieldBody);
        para(&mut doc, body, "Jane Doe");
        para(&mut doc, NodeId::ROOT, "Text.");

        let rendered = render(&doc);
        assert_eq!(rendered.body, "Text.\n");
        assert_eq!(rendered.metadata.get("author"), Some("Jane Doe"));
    }

    #[test]
    fn test_skipped_and_diagnostic_nodes() {
        let mut doc = Document::new();
        let comment = doc.add(NodeId::ROOT, NodeKind::Comment);
        doc.add_text(comment, "hidden");
        let target = doc.add(NodeId::ROOT, NodeKind::Target);
        doc.attrs.set_refuri(target, "https://example.com");
        let p = doc.add(NodeId::ROOT, NodeKind::Paragraph);
        doc.add_text(p, "See ");
        let problem = doc.add(p, NodeKind::Problematic);
        doc.add_text(problem, "`broken");
        let message = doc.add(NodeId::ROOT, NodeKind::SystemMessage);
        para(&mut doc, message, "Inline interpreted text start-string without end-string.");

        assert_eq!(
            render(&doc).body,
            "See <!-- `broken -->\n\n\
             <!-- Inline interpreted text start-string without end-string. -->\n"
        );
    }

    #[test]
    fn test_long_paragraph_wraps_at_78() {
        let mut doc = Document::new();
        let text = "lorem ipsum dolor sit amet ".repeat(10);
        para(&mut doc, NodeId::ROOT, &text);

        let body = render(&doc).body;
        assert!(body.lines().count() > 1);
        assert!(body.lines().all(|line| line.len() <= 78));
    }
}
