//! Structured-IR codec.
//!
//! Stored structured content is a JSON array of block nodes. Objects carry a
//! `"type"` discriminator; arrays are sequences; in inline position a bare
//! string is text. The wire shapes are derived serde types: a missing or
//! extra field, or a value of the wrong kind, is a parse error. An object
//! whose discriminator names no known kind is kept as an unsupported marker
//! so the renderer can reject it with the node kind attached.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::application::render::types::RenderError;
use crate::domain::ir::{Block, Document, Inline, UnsupportedNode};

const TYPE_KEY: &str = "type";

const BLOCK_KINDS: &[&str] = &[
    "paragraph",
    "heading",
    "subtext",
    "raw",
    "code",
    "horizontal_rule",
    "blockquote",
    "list",
];

const INLINE_KINDS: &[&str] = &[
    "italic",
    "bold",
    "underline",
    "strikethrough",
    "code",
    "emoji",
    "link",
    "image",
    "raw",
];

/// Decode stored structured content into an IR document.
pub fn decode_document(source: &str) -> Result<Document, RenderError> {
    let nodes: Vec<BlockRepr> =
        serde_json::from_str(source).map_err(|err| RenderError::parse(err.to_string()))?;
    nodes.into_iter().map(BlockRepr::into_block).collect()
}

/// Encode an IR document back into the structured grammar accepted by
/// [`decode_document`].
pub fn encode_document(document: &[Block]) -> impl Serialize {
    document.iter().map(BlockRepr::from).collect::<Vec<_>>()
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(
    untagged,
    expecting = "a block node (an object with a `type`) or an array of block nodes"
)]
enum BlockRepr {
    Sequence(Vec<BlockRepr>),
    Node(BlockNode),
    /// Any object the node shapes reject: an unknown kind or a malformed one.
    Unknown(Map<String, Value>),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
enum BlockNode {
    Paragraph {
        content: InlineRepr,
    },
    Heading {
        level: u32,
        content: InlineRepr,
    },
    Subtext {
        content: InlineRepr,
    },
    Raw {
        content: String,
    },
    Code {
        content: InlineRepr,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lang: Option<String>,
    },
    HorizontalRule {},
    Blockquote {
        content: Box<BlockRepr>,
    },
    List {
        ordered: bool,
        items: Vec<BlockRepr>,
    },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(
    untagged,
    expecting = "an inline node (a string, an array or an object with a `type`)"
)]
enum InlineRepr {
    Text(String),
    Sequence(Vec<InlineRepr>),
    Node(InlineNode),
    Unknown(Map<String, Value>),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
enum InlineNode {
    Italic {
        content: Box<InlineRepr>,
    },
    Bold {
        content: Box<InlineRepr>,
    },
    Underline {
        content: Box<InlineRepr>,
    },
    Strikethrough {
        content: Box<InlineRepr>,
    },
    Code {
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lang: Option<String>,
    },
    Emoji {
        name: String,
    },
    Link {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<Box<InlineRepr>>,
    },
    Image {
        source: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<Box<InlineRepr>>,
    },
    Raw {
        content: String,
    },
}

/// Outcome of an object that matched no node shape.
enum Fallback<N> {
    Known(N),
    Unsupported(UnsupportedNode),
}

/// Sort an unmatched object into an unsupported marker or, when it names a
/// known kind, the parse error explaining why its shape was rejected.
fn fallback<N: DeserializeOwned>(
    object: Map<String, Value>,
    known: &[&str],
) -> Result<Fallback<N>, RenderError> {
    let kind = match object.get(TYPE_KEY) {
        Some(Value::String(kind)) => kind.clone(),
        _ => {
            return Err(RenderError::parse(format!(
                "object is missing a string `{TYPE_KEY}` discriminator"
            )));
        }
    };

    if !known.contains(&kind.as_str()) {
        return Ok(Fallback::Unsupported(UnsupportedNode { kind }));
    }

    serde_json::from_value(Value::Object(object))
        .map(Fallback::Known)
        .map_err(|err| RenderError::parse(format!("`{kind}` node: {err}")))
}

fn marker(kind: &str) -> Map<String, Value> {
    let mut object = Map::new();
    object.insert(TYPE_KEY.to_string(), Value::String(kind.to_string()));
    object
}

impl BlockRepr {
    fn into_block(self) -> Result<Block, RenderError> {
        match self {
            Self::Sequence(children) => into_blocks(children).map(Block::Sequence),
            Self::Node(node) => node.into_block(),
            Self::Unknown(object) => match fallback::<BlockNode>(object, BLOCK_KINDS)? {
                Fallback::Known(node) => node.into_block(),
                Fallback::Unsupported(node) => Ok(Block::Unsupported(node)),
            },
        }
    }

    /// Block quote bodies and list items accept either a single node or an
    /// array.
    fn into_group(self) -> Result<Vec<Block>, RenderError> {
        match self {
            Self::Sequence(children) => into_blocks(children),
            other => Ok(vec![other.into_block()?]),
        }
    }

    fn group(blocks: &[Block]) -> Self {
        Self::Sequence(blocks.iter().map(Self::from).collect())
    }
}

fn into_blocks(children: Vec<BlockRepr>) -> Result<Vec<Block>, RenderError> {
    children.into_iter().map(BlockRepr::into_block).collect()
}

impl BlockNode {
    fn into_block(self) -> Result<Block, RenderError> {
        Ok(match self {
            Self::Paragraph { content } => Block::Paragraph(content.into_inline()?),
            Self::Heading { level: 0, .. } => {
                return Err(RenderError::parse(
                    "`heading` node: level must be a positive integer",
                ));
            }
            Self::Heading { level, content } => Block::Heading {
                level,
                content: content.into_inline()?,
            },
            Self::Subtext { content } => Block::Subtext(content.into_inline()?),
            Self::Raw { content } => Block::Raw { content },
            Self::Code { content, lang } => Block::Code {
                content: content.into_inline()?,
                lang,
            },
            Self::HorizontalRule {} => Block::HorizontalRule,
            Self::Blockquote { content } => Block::BlockQuote(content.into_group()?),
            Self::List { ordered, items } => Block::List {
                ordered,
                items: items
                    .into_iter()
                    .map(BlockRepr::into_group)
                    .collect::<Result<_, _>>()?,
            },
        })
    }
}

impl From<&Block> for BlockRepr {
    fn from(block: &Block) -> Self {
        let node = match block {
            Block::Paragraph(content) => BlockNode::Paragraph {
                content: content.into(),
            },
            Block::Heading { level, content } => BlockNode::Heading {
                level: *level,
                content: content.into(),
            },
            Block::Subtext(content) => BlockNode::Subtext {
                content: content.into(),
            },
            Block::Code { content, lang } => BlockNode::Code {
                content: content.into(),
                lang: lang.clone(),
            },
            Block::HorizontalRule => BlockNode::HorizontalRule {},
            Block::BlockQuote(children) => BlockNode::Blockquote {
                content: Box::new(Self::group(children)),
            },
            Block::List { ordered, items } => BlockNode::List {
                ordered: *ordered,
                items: items.iter().map(|item| Self::group(item)).collect(),
            },
            Block::Raw { content } => BlockNode::Raw {
                content: content.clone(),
            },
            Block::Sequence(children) => return Self::group(children),
            Block::Unsupported(node) => return Self::Unknown(marker(&node.kind)),
        };
        Self::Node(node)
    }
}

impl InlineRepr {
    fn into_inline(self) -> Result<Inline, RenderError> {
        match self {
            Self::Text(text) => Ok(Inline::Text(text)),
            Self::Sequence(children) => children
                .into_iter()
                .map(Self::into_inline)
                .collect::<Result<Vec<_>, _>>()
                .map(Inline::Sequence),
            Self::Node(node) => node.into_inline(),
            Self::Unknown(object) => match fallback::<InlineNode>(object, INLINE_KINDS)? {
                Fallback::Known(node) => node.into_inline(),
                Fallback::Unsupported(node) => Ok(Inline::Unsupported(node)),
            },
        }
    }

    fn into_boxed(self: Box<Self>) -> Result<Box<Inline>, RenderError> {
        self.into_inline().map(Box::new)
    }
}

impl InlineNode {
    fn into_inline(self) -> Result<Inline, RenderError> {
        Ok(match self {
            Self::Italic { content } => Inline::Italic(content.into_boxed()?),
            Self::Bold { content } => Inline::Bold(content.into_boxed()?),
            Self::Underline { content } => Inline::Underline(content.into_boxed()?),
            Self::Strikethrough { content } => Inline::Strikethrough(content.into_boxed()?),
            Self::Code { content, lang } => Inline::Code { content, lang },
            Self::Emoji { name } => Inline::Emoji { name },
            Self::Link { url, label } => Inline::Link {
                url,
                label: label.map(InlineRepr::into_boxed).transpose()?,
            },
            Self::Image { source, alt } => Inline::Image {
                source,
                alt: alt.map(InlineRepr::into_boxed).transpose()?,
            },
            Self::Raw { content } => Inline::Raw { content },
        })
    }
}

impl From<&Inline> for InlineRepr {
    fn from(inline: &Inline) -> Self {
        let boxed = |content: &Inline| Box::new(Self::from(content));
        let node = match inline {
            Inline::Text(text) => return Self::Text(text.clone()),
            Inline::Sequence(children) => {
                return Self::Sequence(children.iter().map(Self::from).collect());
            }
            Inline::Italic(content) => InlineNode::Italic {
                content: boxed(content),
            },
            Inline::Bold(content) => InlineNode::Bold {
                content: boxed(content),
            },
            Inline::Underline(content) => InlineNode::Underline {
                content: boxed(content),
            },
            Inline::Strikethrough(content) => InlineNode::Strikethrough {
                content: boxed(content),
            },
            Inline::Code { content, lang } => InlineNode::Code {
                content: content.clone(),
                lang: lang.clone(),
            },
            Inline::Emoji { name } => InlineNode::Emoji { name: name.clone() },
            Inline::Link { url, label } => InlineNode::Link {
                url: url.clone(),
                label: label.as_deref().map(boxed),
            },
            Inline::Image { source, alt } => InlineNode::Image {
                source: source.clone(),
                alt: alt.as_deref().map(boxed),
            },
            Inline::Raw { content } => InlineNode::Raw {
                content: content.clone(),
            },
            Inline::Unsupported(node) => return Self::Unknown(marker(&node.kind)),
        };
        Self::Node(node)
    }
}
