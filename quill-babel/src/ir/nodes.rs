//! Core data structures for the document tree.
//!
//! The tree is produced by an external markup parser and handed to the writers
//! fully built. Children are owned top-down; a node never points at its parent.
//! Writers that need the parent or the siblings of a node get them from the
//! traversal cursor (see [`crate::common::dispatch::Cursor`]).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

/// The kind of a node, together with the data only that kind carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    Document,
    Section,
    Title,
    Subtitle,
    Paragraph,
    Text {
        text: String,
    },
    Emphasis,
    Strong,
    Literal,
    LiteralBlock,
    BulletList,
    EnumeratedList {
        #[serde(default)]
        enumtype: EnumType,
        #[serde(default)]
        prefix: String,
        #[serde(default = "default_suffix")]
        suffix: String,
        #[serde(default = "default_start")]
        start: usize,
    },
    ListItem,
    BlockQuote,
    Table,
    #[serde(rename = "tgroup")]
    TableGroup {
        cols: usize,
    },
    #[serde(rename = "colspec")]
    ColSpec {
        #[serde(default)]
        colwidth: Option<usize>,
    },
    #[serde(rename = "thead")]
    TableHead,
    #[serde(rename = "tbody")]
    TableBody,
    Row,
    Entry,
    Reference {
        #[serde(default)]
        refuri: Option<String>,
        #[serde(default)]
        refid: Option<String>,
    },
    Target {
        #[serde(default)]
        refuri: Option<String>,
    },
    Citation,
    /// A citation reference; its text content is the citation key.
    CitationReference {
        #[serde(default)]
        refid: Option<String>,
    },
    Footnote,
    /// A footnote reference; its text content is the footnote label.
    FootnoteReference {
        #[serde(default)]
        refid: Option<String>,
    },
    Label,
    /// Output-format specific content passed through untouched.
    Raw {
        format: String,
        text: String,
    },
    Header,
    Footer,
    Decoration,
    Topic,
    Generated,
    Transition,
    Comment,
    Image {
        uri: String,
        #[serde(default)]
        alt: Option<String>,
    },
    /// A construct from a parser extension that no writer knows about.
    Element {
        tagname: String,
    },
}

fn default_suffix() -> String {
    ".".to_string()
}

fn default_start() -> usize {
    1
}

/// Numbering style of an enumerated list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnumType {
    #[default]
    Arabic,
    LowerAlpha,
    UpperAlpha,
    LowerRoman,
    UpperRoman,
}

impl EnumType {
    /// Class name used for this style in HTML output.
    pub fn as_str(self) -> &'static str {
        match self {
            EnumType::Arabic => "arabic",
            EnumType::LowerAlpha => "loweralpha",
            EnumType::UpperAlpha => "upperalpha",
            EnumType::LowerRoman => "lowerroman",
            EnumType::UpperRoman => "upperroman",
        }
    }
}

/// Common attributes carried by every node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attributes {
    pub ids: Vec<String>,
    pub classes: Vec<String>,
    pub names: Vec<String>,
    pub language: Option<String>,
    /// Kind-specific settings, e.g. `sectnum` on the document or `depth` on a
    /// contents topic.
    pub extra: BTreeMap<String, String>,
}

impl Attributes {
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
            && self.classes.is_empty()
            && self.names.is_empty()
            && self.language.is_none()
            && self.extra.is_empty()
    }
}

/// Field-less mirror of [`NodeKind`], used as the handler table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeTag {
    Document,
    Section,
    Title,
    Subtitle,
    Paragraph,
    Text,
    Emphasis,
    Strong,
    Literal,
    LiteralBlock,
    BulletList,
    EnumeratedList,
    ListItem,
    BlockQuote,
    Table,
    TableGroup,
    ColSpec,
    TableHead,
    TableBody,
    Row,
    Entry,
    Reference,
    Target,
    Citation,
    CitationReference,
    Footnote,
    FootnoteReference,
    Label,
    Raw,
    Header,
    Footer,
    Decoration,
    Topic,
    Generated,
    Transition,
    Comment,
    Image,
    Element,
}

impl NodeTag {
    pub fn name(self) -> &'static str {
        match self {
            NodeTag::Document => "document",
            NodeTag::Section => "section",
            NodeTag::Title => "title",
            NodeTag::Subtitle => "subtitle",
            NodeTag::Paragraph => "paragraph",
            NodeTag::Text => "text",
            NodeTag::Emphasis => "emphasis",
            NodeTag::Strong => "strong",
            NodeTag::Literal => "literal",
            NodeTag::LiteralBlock => "literal_block",
            NodeTag::BulletList => "bullet_list",
            NodeTag::EnumeratedList => "enumerated_list",
            NodeTag::ListItem => "list_item",
            NodeTag::BlockQuote => "block_quote",
            NodeTag::Table => "table",
            NodeTag::TableGroup => "tgroup",
            NodeTag::ColSpec => "colspec",
            NodeTag::TableHead => "thead",
            NodeTag::TableBody => "tbody",
            NodeTag::Row => "row",
            NodeTag::Entry => "entry",
            NodeTag::Reference => "reference",
            NodeTag::Target => "target",
            NodeTag::Citation => "citation",
            NodeTag::CitationReference => "citation_reference",
            NodeTag::Footnote => "footnote",
            NodeTag::FootnoteReference => "footnote_reference",
            NodeTag::Label => "label",
            NodeTag::Raw => "raw",
            NodeTag::Header => "header",
            NodeTag::Footer => "footer",
            NodeTag::Decoration => "decoration",
            NodeTag::Topic => "topic",
            NodeTag::Generated => "generated",
            NodeTag::Transition => "transition",
            NodeTag::Comment => "comment",
            NodeTag::Image => "image",
            NodeTag::Element => "element",
        }
    }
}

impl fmt::Display for NodeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl NodeKind {
    pub fn tag(&self) -> NodeTag {
        match self {
            NodeKind::Document => NodeTag::Document,
            NodeKind::Section => NodeTag::Section,
            NodeKind::Title => NodeTag::Title,
            NodeKind::Subtitle => NodeTag::Subtitle,
            NodeKind::Paragraph => NodeTag::Paragraph,
            NodeKind::Text { .. } => NodeTag::Text,
            NodeKind::Emphasis => NodeTag::Emphasis,
            NodeKind::Strong => NodeTag::Strong,
            NodeKind::Literal => NodeTag::Literal,
            NodeKind::LiteralBlock => NodeTag::LiteralBlock,
            NodeKind::BulletList => NodeTag::BulletList,
            NodeKind::EnumeratedList { .. } => NodeTag::EnumeratedList,
            NodeKind::ListItem => NodeTag::ListItem,
            NodeKind::BlockQuote => NodeTag::BlockQuote,
            NodeKind::Table => NodeTag::Table,
            NodeKind::TableGroup { .. } => NodeTag::TableGroup,
            NodeKind::ColSpec { .. } => NodeTag::ColSpec,
            NodeKind::TableHead => NodeTag::TableHead,
            NodeKind::TableBody => NodeTag::TableBody,
            NodeKind::Row => NodeTag::Row,
            NodeKind::Entry => NodeTag::Entry,
            NodeKind::Reference { .. } => NodeTag::Reference,
            NodeKind::Target { .. } => NodeTag::Target,
            NodeKind::Citation => NodeTag::Citation,
            NodeKind::CitationReference { .. } => NodeTag::CitationReference,
            NodeKind::Footnote => NodeTag::Footnote,
            NodeKind::FootnoteReference { .. } => NodeTag::FootnoteReference,
            NodeKind::Label => NodeTag::Label,
            NodeKind::Raw { .. } => NodeTag::Raw,
            NodeKind::Header => NodeTag::Header,
            NodeKind::Footer => NodeTag::Footer,
            NodeKind::Decoration => NodeTag::Decoration,
            NodeKind::Topic => NodeTag::Topic,
            NodeKind::Generated => NodeTag::Generated,
            NodeKind::Transition => NodeTag::Transition,
            NodeKind::Comment => NodeTag::Comment,
            NodeKind::Image { .. } => NodeTag::Image,
            NodeKind::Element { .. } => NodeTag::Element,
        }
    }
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            attributes: Attributes::default(),
            children: Vec::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Text { text: text.into() })
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.attributes.ids.push(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.attributes.classes.push(class.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.attributes.names.push(name.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.extra.insert(key.into(), value.into());
        self
    }

    pub fn tag(&self) -> NodeTag {
        self.kind.tag()
    }

    /// Name used in diagnostics; generic elements report their own tag name.
    pub fn kind_name(&self) -> &str {
        match &self.kind {
            NodeKind::Element { tagname } => tagname,
            kind => kind.tag().name(),
        }
    }

    pub fn is(&self, tag: NodeTag) -> bool {
        self.tag() == tag
    }

    /// The literal text of a text node.
    pub fn text_value(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn first_id(&self) -> Option<&str> {
        self.attributes.ids.first().map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attributes.classes.iter().any(|c| c == class)
    }

    pub fn extra(&self, key: &str) -> Option<&str> {
        self.attributes.extra.get(key).map(String::as_str)
    }

    /// First direct child of the given kind.
    pub fn child(&self, tag: NodeTag) -> Option<&Node> {
        self.children.iter().find(|c| c.is(tag))
    }

    /// Whether this is a raw node whose whitespace-separated format list names `target`.
    pub fn raw_targets(&self, target: &str) -> bool {
        match &self.kind {
            NodeKind::Raw { format, .. } => format.split_whitespace().any(|f| f == target),
            _ => false,
        }
    }

    /// Concatenated text of all descendant text nodes (raw content excluded).
    pub fn astext(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let NodeKind::Text { text } = &self.kind {
            out.push_str(text);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }
}
