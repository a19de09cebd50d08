//! Typed model of the rich-text document tree.
//!
//! Notes are stored as a JSON tree of typed nodes (a ProseMirror-style
//! AST). This module deserializes that JSON into a closed set of variants;
//! rendering lives in [`crate::markdown`].
//!
//! The parser is permissive where real archives demand it: unknown node
//! types and unknown marks map to explicit catch-all variants instead of
//! failing, optional attributes fall back to documented defaults, and
//! unrecognized JSON fields are ignored.

use serde::{Deserialize, Deserializer};

/// A single node in a note's document tree.
///
/// The `type` field of the JSON object selects the variant. Anything not
/// in the closed set becomes [`DocumentNode::Unknown`], which renders as
/// nothing.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DocumentNode {
    /// Root container of a note document.
    Doc {
        #[serde(default)]
        content: Vec<DocumentNode>,
    },
    /// Leaf text run, optionally decorated with marks.
    Text {
        #[serde(default)]
        text: String,
        #[serde(default)]
        marks: Vec<Mark>,
    },
    /// Paragraph of inline content.
    Paragraph {
        #[serde(default)]
        content: Vec<DocumentNode>,
    },
    /// Heading with a level attribute.
    Heading {
        #[serde(default)]
        attrs: HeadingAttrs,
        #[serde(default)]
        content: Vec<DocumentNode>,
    },
    /// Fenced code block with an optional language attribute.
    CodeBlock {
        #[serde(default)]
        attrs: CodeBlockAttrs,
        #[serde(default)]
        content: Vec<DocumentNode>,
    },
    /// Block quote.
    Blockquote {
        #[serde(default)]
        content: Vec<DocumentNode>,
    },
    /// Thematic break. Carries no content.
    HorizontalRule,
    /// List item. Each item is its own `list` node; consecutive siblings
    /// form the visual list, and an item nests sublists in its `content`.
    List {
        #[serde(default)]
        attrs: ListAttrs,
        #[serde(default)]
        content: Vec<DocumentNode>,
    },
    /// Any node type outside the closed set.
    #[serde(other)]
    Unknown,
}

impl DocumentNode {
    /// Child nodes, empty for leaf variants.
    pub fn children(&self) -> &[DocumentNode] {
        match self {
            DocumentNode::Doc { content }
            | DocumentNode::Paragraph { content }
            | DocumentNode::Heading { content, .. }
            | DocumentNode::CodeBlock { content, .. }
            | DocumentNode::Blockquote { content }
            | DocumentNode::List { content, .. } => content,
            DocumentNode::Text { .. } | DocumentNode::HorizontalRule | DocumentNode::Unknown => &[],
        }
    }

    /// Whether this node is a list item of any kind.
    pub fn is_list(&self) -> bool {
        matches!(self, DocumentNode::List { .. })
    }

    /// Whether this node is an ordered list item.
    pub fn is_ordered_list(&self) -> bool {
        matches!(
            self,
            DocumentNode::List { attrs, .. } if attrs.kind == ListKind::Ordered
        )
    }
}

/// Attributes of a heading node.
#[derive(Debug, Clone, Deserialize)]
pub struct HeadingAttrs {
    /// Heading depth. Absent and `null` both default to 1.
    #[serde(
        default = "default_heading_level",
        deserialize_with = "level_or_default"
    )]
    pub level: u8,
}

impl Default for HeadingAttrs {
    fn default() -> Self {
        Self {
            level: default_heading_level(),
        }
    }
}

fn default_heading_level() -> u8 {
    1
}

fn level_or_default<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u8>::deserialize(deserializer)?.unwrap_or_else(default_heading_level))
}

/// Archives store `null` for attributes as often as they omit them; both
/// spellings mean "use the default".
fn null_to_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Attributes of a code block node.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CodeBlockAttrs {
    /// Language tag for the fence. Real archives store `null` here as
    /// often as they omit the field.
    #[serde(default)]
    pub language: Option<String>,
}

/// Attributes of a list item node.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListAttrs {
    /// Bullet, ordered, or task. Absent and `null` both mean bullet.
    #[serde(default, deserialize_with = "null_to_default")]
    pub kind: ListKind,
    /// Task checkbox state. Meaningful only for `kind: task`.
    #[serde(default, deserialize_with = "null_to_default")]
    pub checked: bool,
}

/// The three list item flavors the format defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListKind {
    #[default]
    Bullet,
    Ordered,
    Task,
}

/// An inline decoration applied to a text run.
///
/// The `type` field selects the variant; only links carry attributes.
/// Unknown mark types map to [`Mark::Unknown`] and have no rendering
/// effect.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mark {
    Bold,
    Italic,
    Underline,
    Strike,
    Code,
    Link {
        #[serde(default)]
        attrs: LinkAttrs,
    },
    #[serde(other)]
    Unknown,
}

/// Attributes of a link mark.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinkAttrs {
    /// Target URL. Missing and `null` both render as an empty target.
    #[serde(default)]
    pub href: Option<String>,
}
