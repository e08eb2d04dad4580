use std::error::Error as StdError;

use thiserror::Error;

use crate::{application::render::RenderError, infra::error::InfraError};

/// Flattened view of an error and its source chain, suitable for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub source: &'static str,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, error: &dyn StdError) -> Self {
        let mut messages = Vec::new();
        messages.push(error.to_string());
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self { source, messages }
    }

    /// Messages joined outermost first.
    pub fn chain(&self) -> String {
        self.messages.join(": ")
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("render failed")]
    Render(#[from] RenderError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    /// Short operator-facing summary of the failure class.
    pub fn summary(&self) -> &'static str {
        match self {
            AppError::Render(RenderError::Parse { .. }) => "Structured content is malformed",
            AppError::Render(RenderError::UnsupportedNode { .. }) => {
                "Content uses an unsupported node"
            }
            AppError::Render(RenderError::NestingTooDeep { .. }) => "Content is nested too deeply",
            AppError::Infra(InfraError::Configuration { .. }) => "Configuration is invalid",
            AppError::Infra(InfraError::Manifest { .. }) => "Asset manifest could not be loaded",
            AppError::Infra(InfraError::Telemetry(_)) => "Logging subsystem could not start",
            AppError::Infra(InfraError::Io(_)) => "I/O failure",
            AppError::Unexpected(_) => "Unexpected error occurred",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::render::NodeFamily;

    #[test]
    fn report_walks_the_source_chain() {
        let error = AppError::from(RenderError::unsupported(NodeFamily::Markup, "table"));
        let report = ErrorReport::from_error("application::error::AppError", &error);
        assert_eq!(
            report.messages,
            vec![
                "render failed".to_string(),
                "unsupported markup node `table`".to_string(),
            ]
        );
        assert_eq!(report.chain(), "render failed: unsupported markup node `table`");
    }

    #[test]
    fn summaries_follow_the_error_class() {
        assert_eq!(
            AppError::from(RenderError::parse("bad")).summary(),
            "Structured content is malformed"
        );
        assert_eq!(
            AppError::from(RenderError::nesting_too_deep(256)).summary(),
            "Content is nested too deeply"
        );
    }
}
