use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{assets::AssetLookup, content::ContentType};

/// Rendering request passed into the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderRequest {
    /// Stored article body.
    pub content: String,
    /// How `content` is encoded.
    pub content_type: ContentType,
}

impl RenderRequest {
    pub fn new(content: impl Into<String>, content_type: ContentType) -> Self {
        Self {
            content: content.into(),
            content_type,
        }
    }

    pub fn structured(content: impl Into<String>) -> Self {
        Self::new(content, ContentType::StructuredIr)
    }

    pub fn markup(content: impl Into<String>) -> Self {
        Self::new(content, ContentType::MarkupText)
    }

    pub fn raw_html(content: impl Into<String>) -> Self {
        Self::new(content, ContentType::RawHtml)
    }
}

/// Which tree a node came from when it could not be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeFamily {
    Inline,
    Block,
    Markup,
}

impl NodeFamily {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeFamily::Inline => "inline",
            NodeFamily::Block => "block",
            NodeFamily::Markup => "markup",
        }
    }
}

impl fmt::Display for NodeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hard failures surfaced by the rendering pipeline. Soft degrades (unknown
/// asset identifiers, unknown shortcodes) never produce one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("structured content could not be decoded: {message}")]
    Parse { message: String },
    #[error("unsupported {family} node `{kind}`")]
    UnsupportedNode { family: NodeFamily, kind: String },
    #[error("content nests deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
}

impl RenderError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn unsupported(family: NodeFamily, kind: impl Into<String>) -> Self {
        Self::UnsupportedNode {
            family,
            kind: kind.into(),
        }
    }

    pub fn nesting_too_deep(limit: usize) -> Self {
        Self::NestingTooDeep { limit }
    }
}

/// Trait exposed by the rendering pipeline. Implementations must be
/// deterministic: the same request and the same lookup results always produce
/// the same HTML or the same error.
pub trait RenderService: Send + Sync {
    fn render(
        &self,
        request: &RenderRequest,
        assets: &dyn AssetLookup,
    ) -> Result<String, RenderError>;
}
