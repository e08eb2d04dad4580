//! Stored content-type tag for article bodies.

use std::{fmt, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// How an article body is encoded. Persisted as the integer codes 1, 2 and 3.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// JSON document in the IR grammar.
    StructuredIr,
    /// CommonMark markup.
    #[default]
    MarkupText,
    /// Trusted HTML passed through untouched.
    RawHtml,
}

impl ContentType {
    /// Integer code used by the article store.
    pub fn code(self) -> i64 {
        match self {
            ContentType::StructuredIr => 1,
            ContentType::MarkupText => 2,
            ContentType::RawHtml => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::StructuredIr => "structured",
            ContentType::MarkupText => "markup",
            ContentType::RawHtml => "raw",
        }
    }

    /// Guess the content type of a file from its extension. Anything that is
    /// not JSON or HTML is treated as markup.
    pub fn from_extension(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => ContentType::StructuredIr,
            Some("html" | "htm") => ContentType::RawHtml,
            _ => ContentType::MarkupText,
        }
    }
}

impl TryFrom<i64> for ContentType {
    type Error = DomainError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(ContentType::StructuredIr),
            2 => Ok(ContentType::MarkupText),
            3 => Ok(ContentType::RawHtml),
            other => Err(DomainError::validation(format!(
                "unknown content type code `{other}`"
            ))),
        }
    }
}

impl FromStr for ContentType {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "structured" | "json" | "ir" => Ok(ContentType::StructuredIr),
            "markup" | "markdown" | "md" => Ok(ContentType::MarkupText),
            "raw" | "html" => Ok(ContentType::RawHtml),
            other => Err(DomainError::validation(format!(
                "unknown content type `{other}`"
            ))),
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
