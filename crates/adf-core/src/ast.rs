//! Document tree model
//!
//! This module defines the node shape shared by every operation in the engine.
//! The `type` field is an open vocabulary: kinds the engine knows about get their
//! own enum variant, everything else is carried verbatim in `Other` so that node
//! kinds added upstream survive a round-trip untouched.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{AdfError, Result};

/// Node and mark attributes, kept in their original order
pub type Attrs = IndexMap<String, Value>;

/// The `version` every document tree carries
pub const DOCUMENT_VERSION: u64 = 1;

/// Node type tag
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Doc,
    Paragraph,
    Heading,
    Text,
    HardBreak,
    BulletList,
    OrderedList,
    ListItem,
    CodeBlock,
    Blockquote,
    Rule,
    Table,
    TableRow,
    TableHeader,
    TableCell,
    InlineCard,
    BlockCard,
    EmbedCard,
    Mention,
    Emoji,
    TaskList,
    TaskItem,
    Panel,
    Expand,
    MediaSingle,
    Media,
    Status,
    Date,
    /// Any type name the engine does not recognize
    Other(String),
}

impl NodeKind {
    /// Wire name of this kind
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Doc => "doc",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Heading => "heading",
            NodeKind::Text => "text",
            NodeKind::HardBreak => "hardBreak",
            NodeKind::BulletList => "bulletList",
            NodeKind::OrderedList => "orderedList",
            NodeKind::ListItem => "listItem",
            NodeKind::CodeBlock => "codeBlock",
            NodeKind::Blockquote => "blockquote",
            NodeKind::Rule => "rule",
            NodeKind::Table => "table",
            NodeKind::TableRow => "tableRow",
            NodeKind::TableHeader => "tableHeader",
            NodeKind::TableCell => "tableCell",
            NodeKind::InlineCard => "inlineCard",
            NodeKind::BlockCard => "blockCard",
            NodeKind::EmbedCard => "embedCard",
            NodeKind::Mention => "mention",
            NodeKind::Emoji => "emoji",
            NodeKind::TaskList => "taskList",
            NodeKind::TaskItem => "taskItem",
            NodeKind::Panel => "panel",
            NodeKind::Expand => "expand",
            NodeKind::MediaSingle => "mediaSingle",
            NodeKind::Media => "media",
            NodeKind::Status => "status",
            NodeKind::Date => "date",
            NodeKind::Other(name) => name,
        }
    }

    /// Nodes that embed a link through a direct `url` attribute
    pub fn is_card(&self) -> bool {
        matches!(
            self,
            NodeKind::InlineCard | NodeKind::BlockCard | NodeKind::EmbedCard
        )
    }
}

impl From<&str> for NodeKind {
    fn from(value: &str) -> Self {
        match value {
            "doc" => NodeKind::Doc,
            "paragraph" => NodeKind::Paragraph,
            "heading" => NodeKind::Heading,
            "text" => NodeKind::Text,
            "hardBreak" => NodeKind::HardBreak,
            "bulletList" => NodeKind::BulletList,
            "orderedList" => NodeKind::OrderedList,
            "listItem" => NodeKind::ListItem,
            "codeBlock" => NodeKind::CodeBlock,
            "blockquote" => NodeKind::Blockquote,
            "rule" => NodeKind::Rule,
            "table" => NodeKind::Table,
            "tableRow" => NodeKind::TableRow,
            "tableHeader" => NodeKind::TableHeader,
            "tableCell" => NodeKind::TableCell,
            "inlineCard" => NodeKind::InlineCard,
            "blockCard" => NodeKind::BlockCard,
            "embedCard" => NodeKind::EmbedCard,
            "mention" => NodeKind::Mention,
            "emoji" => NodeKind::Emoji,
            "taskList" => NodeKind::TaskList,
            "taskItem" => NodeKind::TaskItem,
            "panel" => NodeKind::Panel,
            "expand" => NodeKind::Expand,
            "mediaSingle" => NodeKind::MediaSingle,
            "media" => NodeKind::Media,
            "status" => NodeKind::Status,
            "date" => NodeKind::Date,
            other => NodeKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(NodeKind::from(name.as_str()))
    }
}

/// Mark type tag
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MarkKind {
    Strong,
    Em,
    Code,
    Strike,
    Underline,
    Link,
    TextColor,
    SubSup,
    Other(String),
}

impl MarkKind {
    pub fn as_str(&self) -> &str {
        match self {
            MarkKind::Strong => "strong",
            MarkKind::Em => "em",
            MarkKind::Code => "code",
            MarkKind::Strike => "strike",
            MarkKind::Underline => "underline",
            MarkKind::Link => "link",
            MarkKind::TextColor => "textColor",
            MarkKind::SubSup => "subsup",
            MarkKind::Other(name) => name,
        }
    }
}

impl From<&str> for MarkKind {
    fn from(value: &str) -> Self {
        match value {
            "strong" => MarkKind::Strong,
            "em" => MarkKind::Em,
            "code" => MarkKind::Code,
            "strike" => MarkKind::Strike,
            "underline" => MarkKind::Underline,
            "link" => MarkKind::Link,
            "textColor" => MarkKind::TextColor,
            "subsup" => MarkKind::SubSup,
            other => MarkKind::Other(other.to_string()),
        }
    }
}

impl Serialize for MarkKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MarkKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(MarkKind::from(name.as_str()))
    }
}

/// Formatting annotation on an inline text node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    #[serde(rename = "type")]
    pub kind: MarkKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Attrs>,
}

impl Mark {
    pub fn new(kind: MarkKind) -> Self {
        Self { kind, attrs: None }
    }

    /// A link mark pointing at `href`
    pub fn link(href: &str) -> Self {
        let mut attrs = Attrs::new();
        attrs.insert("href".to_string(), Value::String(href.to_string()));
        Self {
            kind: MarkKind::Link,
            attrs: Some(attrs),
        }
    }

    /// Get an attribute value by name
    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.attrs.as_ref()?.get(name)
    }

    /// Get a string attribute by name
    pub fn attr_str(&self, name: &str) -> Option<&str> {
        self.attr(name)?.as_str()
    }
}

/// A node in the document tree.
///
/// Fields the engine does not model are kept in `extra` and written back
/// unchanged on serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub kind: NodeKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Attrs>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marks: Option<Vec<Mark>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<Node>>,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Node {
    /// Create a bare node of the given kind
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            attrs: None,
            marks: None,
            text: None,
            content: None,
            extra: IndexMap::new(),
        }
    }

    /// Create a text node
    pub fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Self::new(NodeKind::Text)
        }
    }

    /// Create a paragraph from inline nodes
    pub fn paragraph(content: Vec<Node>) -> Self {
        Self::new(NodeKind::Paragraph).with_content(content)
    }

    /// Create a heading with a single text child
    pub fn heading(level: u8, text: &str) -> Self {
        Self::new(NodeKind::Heading)
            .with_attr("level", Value::from(level))
            .with_content(vec![Self::text(text)])
    }

    pub fn hard_break() -> Self {
        Self::new(NodeKind::HardBreak)
    }

    pub fn bullet_list(items: Vec<Node>) -> Self {
        Self::new(NodeKind::BulletList).with_content(items)
    }

    pub fn ordered_list(order: u64, items: Vec<Node>) -> Self {
        Self::new(NodeKind::OrderedList)
            .with_attr("order", Value::from(order))
            .with_content(items)
    }

    pub fn list_item(content: Vec<Node>) -> Self {
        Self::new(NodeKind::ListItem).with_content(content)
    }

    /// Create a code block; an empty body produces a block without content
    pub fn code_block(language: Option<&str>, code: &str) -> Self {
        let mut node = Self::new(NodeKind::CodeBlock);
        if let Some(lang) = language.filter(|l| !l.is_empty()) {
            node = node.with_attr("language", Value::String(lang.to_string()));
        }
        let content = if code.is_empty() {
            Vec::new()
        } else {
            vec![Self::text(code)]
        };
        node.with_content(content)
    }

    pub fn blockquote(content: Vec<Node>) -> Self {
        Self::new(NodeKind::Blockquote).with_content(content)
    }

    pub fn rule() -> Self {
        Self::new(NodeKind::Rule)
    }

    /// Set an attribute, builder style
    pub fn with_attr(mut self, name: &str, value: Value) -> Self {
        self.attrs
            .get_or_insert_with(Attrs::new)
            .insert(name.to_string(), value);
        self
    }

    /// Append a mark, builder style
    pub fn with_mark(mut self, mark: Mark) -> Self {
        self.marks.get_or_insert_with(Vec::new).push(mark);
        self
    }

    /// Replace the children, builder style
    pub fn with_content(mut self, content: Vec<Node>) -> Self {
        self.content = Some(content);
        self
    }

    /// Copy of this node without its children
    pub fn shallow_clone(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            attrs: self.attrs.clone(),
            marks: self.marks.clone(),
            text: self.text.clone(),
            content: None,
            extra: self.extra.clone(),
        }
    }

    /// Get an attribute value by name
    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.attrs.as_ref()?.get(name)
    }

    /// Get a string attribute by name
    pub fn attr_str(&self, name: &str) -> Option<&str> {
        self.attr(name)?.as_str()
    }

    /// Child nodes (empty when the node has no content)
    pub fn children(&self) -> &[Node] {
        self.content.as_deref().unwrap_or(&[])
    }

    /// Marks attached to this node (empty when none)
    pub fn marks(&self) -> &[Mark] {
        self.marks.as_deref().unwrap_or(&[])
    }

    pub fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }

    pub fn is_heading(&self) -> bool {
        self.kind == NodeKind::Heading
    }

    /// Heading level from `attrs.level`, clamped to 1..=6 and defaulting to 1
    pub fn level(&self) -> u8 {
        self.attr("level")
            .and_then(Value::as_u64)
            .map(|l| l.clamp(1, 6) as u8)
            .unwrap_or(1)
    }

    pub fn has_mark(&self, kind: &MarkKind) -> bool {
        self.marks().iter().any(|m| &m.kind == kind)
    }

    /// Concatenated literal text of this node and its descendants, marks ignored
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        crate::traverse::traverse(std::slice::from_ref(self), |node, _, _| {
            if let Some(text) = node.text.as_deref().filter(|_| node.is_text()) {
                out.push_str(text);
            }
            crate::traverse::Visit::Continue
        });
        out
    }
}

/// A complete document tree: `{ version: 1, type: "doc", content: [...] }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct Document {
    pub version: u64,

    #[serde(rename = "type")]
    kind: NodeKind,

    pub content: Vec<Node>,
}

impl Document {
    pub fn new(content: Vec<Node>) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            kind: NodeKind::Doc,
            content,
        }
    }

    /// A document with no block content
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Parse a JSON value, checking the top-level document shape first
    pub fn from_value(value: Value) -> Result<Self> {
        Self::try_from(value)
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[derive(Deserialize)]
struct RawDocument {
    version: u64,
    content: Vec<Node>,
}

impl TryFrom<Value> for Document {
    type Error = AdfError;

    fn try_from(value: Value) -> Result<Self> {
        if !is_valid_document(&value) {
            return Err(AdfError::InvalidDocument(
                "expected {version: 1, type: \"doc\", content: [...]}".to_string(),
            ));
        }
        let raw: RawDocument = serde_json::from_value(value)?;
        Ok(Self {
            version: raw.version,
            kind: NodeKind::Doc,
            content: raw.content,
        })
    }
}

/// Check whether a value looks like a document tree.
///
/// Only the top-level fields are inspected; descendants are never validated
/// so that documents using newer node kinds are still accepted.
pub fn is_valid_document(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    obj.get("version").and_then(Value::as_u64) == Some(DOCUMENT_VERSION)
        && obj.get("type").and_then(Value::as_str) == Some("doc")
        && obj.get("content").is_some_and(Value::is_array)
}
