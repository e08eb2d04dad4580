//! Canonical intermediate representation for article content.
//!
//! Every content type (structured IR, CommonMark markup, raw HTML) is brought
//! into this shape before rendering. Trees are plain owned data: parents own
//! their children, nothing points back up, and a tree is never mutated once a
//! parser has produced it.

/// Inline (phrasing) content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// Plain text. Escaped and emoji-tagged when flattened.
    Text(String),
    /// Ordered run of inline nodes.
    Sequence(Vec<Inline>),
    Italic(Box<Inline>),
    Bold(Box<Inline>),
    Underline(Box<Inline>),
    Strikethrough(Box<Inline>),
    /// Inline code. The language hint is carried but not used for highlighting.
    Code {
        content: String,
        lang: Option<String>,
    },
    /// Emoji shortcode reference, stored without the surrounding colons.
    Emoji { name: String },
    /// Hyperlink. Without a label the URL text is shown.
    Link {
        url: String,
        label: Option<Box<Inline>>,
    },
    Image {
        source: String,
        alt: Option<Box<Inline>>,
    },
    /// Trusted markup emitted verbatim.
    Raw { content: String },
    /// Node kind that has no mapping; rejected at render time.
    Unsupported(UnsupportedNode),
}

/// Block (flow) content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Inline),
    /// Declared level, 1 or greater. Rendering shifts it down one step.
    Heading {
        level: u32,
        content: Inline,
    },
    /// De-emphasised paragraph.
    Subtext(Inline),
    Code {
        content: Inline,
        lang: Option<String>,
    },
    HorizontalRule,
    BlockQuote(Vec<Block>),
    /// Each item is its own block sequence.
    List {
        ordered: bool,
        items: Vec<Vec<Block>>,
    },
    Raw {
        content: String,
    },
    Sequence(Vec<Block>),
    Unsupported(UnsupportedNode),
}

/// A node whose discriminator names no known kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedNode {
    pub kind: String,
}

/// Document root: the ordered top-level blocks.
pub type Document = Vec<Block>;

/// Highest heading level that still maps to a distinct output tag.
pub const MAX_DECLARED_HEADING_LEVEL: u32 = 5;

impl Inline {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn raw(content: impl Into<String>) -> Self {
        Self::Raw {
            content: content.into(),
        }
    }

    pub fn italic(content: Inline) -> Self {
        Self::Italic(Box::new(content))
    }

    pub fn bold(content: Inline) -> Self {
        Self::Bold(Box::new(content))
    }

    pub fn underline(content: Inline) -> Self {
        Self::Underline(Box::new(content))
    }

    pub fn strikethrough(content: Inline) -> Self {
        Self::Strikethrough(Box::new(content))
    }

    pub fn emoji(name: impl Into<String>) -> Self {
        Self::Emoji { name: name.into() }
    }

    pub fn link(url: impl Into<String>, label: Option<Inline>) -> Self {
        Self::Link {
            url: url.into(),
            label: label.map(Box::new),
        }
    }

    pub fn image(source: impl Into<String>, alt: Option<Inline>) -> Self {
        Self::Image {
            source: source.into(),
            alt: alt.map(Box::new),
        }
    }
}

impl Block {
    pub fn paragraph(content: Inline) -> Self {
        Self::Paragraph(content)
    }

    pub fn heading(level: u32, content: Inline) -> Self {
        Self::Heading { level, content }
    }

    pub fn raw(content: impl Into<String>) -> Self {
        Self::Raw {
            content: content.into(),
        }
    }

    /// HTML heading rank for a declared level: 1 → 2, …, 5 and above → 6.
    ///
    /// Rank 1 belongs to the page title and is never produced here.
    pub fn heading_rank(level: u32) -> u32 {
        level.min(MAX_DECLARED_HEADING_LEVEL) + 1
    }
}

impl From<&str> for Inline {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Inline {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<Inline>> for Inline {
    fn from(value: Vec<Inline>) -> Self {
        Self::Sequence(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_rank_never_reaches_title_level() {
        assert_eq!(Block::heading_rank(1), 2);
        assert_eq!(Block::heading_rank(4), 5);
        assert_eq!(Block::heading_rank(5), 6);
        assert_eq!(Block::heading_rank(10), 6);
    }

    #[test]
    fn link_constructor_boxes_label() {
        let link = Inline::link("/about", Some("About".into()));
        assert_eq!(
            link,
            Inline::Link {
                url: "/about".to_string(),
                label: Some(Box::new(Inline::Text("About".to_string()))),
            }
        );
    }
}
