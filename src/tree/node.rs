//! Document tree node types and kinds.

/// Unique identifier for a node within a [`Document`](super::Document).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The root node ID (always 0, always a [`NodeKind::Document`]).
    pub const ROOT: NodeId = NodeId(0);
}

/// Callout block flavors.
///
/// The first five have a direct DocBook equivalent; the rest are remapped
/// onto one of them with a synthesized title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdmonitionKind {
    Note,
    Tip,
    Warning,
    Caution,
    Important,
    Attention,
    Danger,
    Error,
    Hint,
    /// The docutils `admonition` directive, which carries its own title.
    Generic,
}

impl AdmonitionKind {
    /// Map a docutils element name to an admonition kind.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "note" => AdmonitionKind::Note,
            "tip" => AdmonitionKind::Tip,
            "warning" => AdmonitionKind::Warning,
            "caution" => AdmonitionKind::Caution,
            "important" => AdmonitionKind::Important,
            "attention" => AdmonitionKind::Attention,
            "danger" => AdmonitionKind::Danger,
            "error" => AdmonitionKind::Error,
            "hint" => AdmonitionKind::Hint,
            "admonition" => AdmonitionKind::Generic,
            _ => return None,
        })
    }

    /// Human-readable label ("Note", "Danger", ...).
    ///
    /// The generic admonition has no fixed label and returns `None`.
    pub fn label(self) -> Option<&'static str> {
        match self {
            AdmonitionKind::Note => Some("Note"),
            AdmonitionKind::Tip => Some("Tip"),
            AdmonitionKind::Warning => Some("Warning"),
            AdmonitionKind::Caution => Some("Caution"),
            AdmonitionKind::Important => Some("Important"),
            AdmonitionKind::Attention => Some("Attention"),
            AdmonitionKind::Danger => Some("Danger"),
            AdmonitionKind::Error => Some("Error"),
            AdmonitionKind::Hint => Some("Hint"),
            AdmonitionKind::Generic => None,
        }
    }
}

/// Bibliographic elements of a docinfo block.
///
/// Docutils turns a leading field list with well-known names into these
/// dedicated elements. Each one is a field whose name is the element name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BibliographicField {
    Author,
    /// Groups several `author` elements.
    Authors,
    Organization,
    Address,
    Contact,
    Version,
    Revision,
    Status,
    Date,
    Copyright,
}

impl BibliographicField {
    pub fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "author" => BibliographicField::Author,
            "authors" => BibliographicField::Authors,
            "organization" => BibliographicField::Organization,
            "address" => BibliographicField::Address,
            "contact" => BibliographicField::Contact,
            "version" => BibliographicField::Version,
            "revision" => BibliographicField::Revision,
            "status" => BibliographicField::Status,
            "date" => BibliographicField::Date,
            "copyright" => BibliographicField::Copyright,
            _ => return None,
        })
    }

    /// Field name, the same as the docutils element name.
    pub fn name(self) -> &'static str {
        match self {
            BibliographicField::Author => "author",
            BibliographicField::Authors => "authors",
            BibliographicField::Organization => "organization",
            BibliographicField::Address => "address",
            BibliographicField::Contact => "contact",
            BibliographicField::Version => "version",
            BibliographicField::Revision => "revision",
            BibliographicField::Status => "status",
            BibliographicField::Date => "date",
            BibliographicField::Copyright => "copyright",
        }
    }
}

/// Kind of a node in the document tree.
///
/// This is a closed set: element names the tree model does not know load as
/// [`NodeKind::Other`], which every backend treats as a transparent
/// container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeKind {
    /// Root of the tree.
    Document,
    Section,
    Title,
    Subtitle,
    Paragraph,
    /// Leaf text content node. References a range in the document's text buffer.
    #[default]
    Text,
    BulletList,
    EnumeratedList,
    ListItem,
    DefinitionList,
    DefinitionListItem,
    Term,
    Definition,
    Table,
    TableGroup,
    ColumnSpec,
    TableHead,
    TableBody,
    Row,
    Entry,
    Image,
    Figure,
    Caption,
    LiteralBlock,
    Literal,
    Emphasis,
    Strong,
    Subscript,
    Superscript,
    Reference,
    Target,
    TitleReference,
    BlockQuote,
    Topic,
    FieldList,
    Field,
    FieldName,
    FieldBody,
    /// Bibliographic block following the document title.
    DocInfo,
    Bibliographic(BibliographicField),
    Admonition(AdmonitionKind),
    Comment,
    SubstitutionDefinition,
    SubstitutionReference,
    Index,
    /// Parser-inserted marker around source text it could not interpret.
    Problematic,
    /// Parser-inserted diagnostic message.
    SystemMessage,
    /// Any element kind without a dedicated variant.
    Other,
}

impl NodeKind {
    /// Map a docutils element name to a node kind.
    pub fn from_tag(tag: &str) -> Self {
        if let Some(kind) = AdmonitionKind::from_tag(tag) {
            return NodeKind::Admonition(kind);
        }
        if let Some(field) = BibliographicField::from_tag(tag) {
            return NodeKind::Bibliographic(field);
        }
        match tag {
            "document" => NodeKind::Document,
            "section" => NodeKind::Section,
            "title" => NodeKind::Title,
            "subtitle" => NodeKind::Subtitle,
            "paragraph" | "compact_paragraph" => NodeKind::Paragraph,
            "bullet_list" => NodeKind::BulletList,
            "enumerated_list" => NodeKind::EnumeratedList,
            "list_item" => NodeKind::ListItem,
            "definition_list" => NodeKind::DefinitionList,
            "definition_list_item" => NodeKind::DefinitionListItem,
            "term" => NodeKind::Term,
            "definition" => NodeKind::Definition,
            "table" => NodeKind::Table,
            "tgroup" => NodeKind::TableGroup,
            "colspec" => NodeKind::ColumnSpec,
            "thead" => NodeKind::TableHead,
            "tbody" => NodeKind::TableBody,
            "row" => NodeKind::Row,
            "entry" => NodeKind::Entry,
            "image" => NodeKind::Image,
            "figure" => NodeKind::Figure,
            "caption" => NodeKind::Caption,
            "literal_block" | "doctest_block" => NodeKind::LiteralBlock,
            "literal" => NodeKind::Literal,
            "emphasis" => NodeKind::Emphasis,
            "strong" => NodeKind::Strong,
            "subscript" => NodeKind::Subscript,
            "superscript" => NodeKind::Superscript,
            "reference" => NodeKind::Reference,
            "target" => NodeKind::Target,
            "title_reference" => NodeKind::TitleReference,
            "block_quote" => NodeKind::BlockQuote,
            "topic" => NodeKind::Topic,
            "field_list" => NodeKind::FieldList,
            "field" => NodeKind::Field,
            "field_name" => NodeKind::FieldName,
            "field_body" => NodeKind::FieldBody,
            "docinfo" => NodeKind::DocInfo,
            "comment" => NodeKind::Comment,
            "substitution_definition" => NodeKind::SubstitutionDefinition,
            "substitution_reference" => NodeKind::SubstitutionReference,
            "index" => NodeKind::Index,
            "problematic" => NodeKind::Problematic,
            "system_message" => NodeKind::SystemMessage,
            _ => NodeKind::Other,
        }
    }

    /// Whether whitespace inside this kind of node is content.
    ///
    /// Used by loaders to drop indentation between block elements.
    pub fn holds_text(self) -> bool {
        if let NodeKind::Bibliographic(field) = self {
            return field != BibliographicField::Authors;
        }
        matches!(
            self,
            NodeKind::Title
                | NodeKind::Subtitle
                | NodeKind::Paragraph
                | NodeKind::Term
                | NodeKind::LiteralBlock
                | NodeKind::Literal
                | NodeKind::Emphasis
                | NodeKind::Strong
                | NodeKind::Subscript
                | NodeKind::Superscript
                | NodeKind::Reference
                | NodeKind::TitleReference
                | NodeKind::FieldName
                | NodeKind::Caption
                | NodeKind::Comment
                | NodeKind::SubstitutionDefinition
                | NodeKind::SubstitutionReference
                | NodeKind::Problematic
        )
    }
}

/// Range into the document's text buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextRange {
    /// Byte offset into the text buffer.
    pub start: u32,
    /// Length in bytes.
    pub len: u32,
}

impl TextRange {
    /// Create a new text range.
    pub fn new(start: u32, len: u32) -> Self {
        Self { start, len }
    }

    /// Check if the range is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the end offset.
    pub fn end(&self) -> u32 {
        self.start + self.len
    }
}

/// A node in the document tree.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// Parent node (None for root).
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    /// Text content range (only for Text nodes).
    pub text: TextRange,
}

impl Node {
    /// Create a new node with default values.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            first_child: None,
            next_sibling: None,
            text: TextRange::default(),
        }
    }

    /// Create a text node with the given range.
    pub fn text(range: TextRange) -> Self {
        Self {
            text: range,
            ..Self::new(NodeKind::Text)
        }
    }
}
