mod block;
mod config;
mod convert;
mod emoji;
mod escape;
mod inline;
mod structured;
mod text;
mod url;

use std::{sync::Arc, time::Instant};

use metrics::{counter, histogram};
use once_cell::sync::{Lazy, OnceCell};
use thiserror::Error;
use tracing::{debug, warn};

use crate::application::render::types::{RenderError, RenderRequest, RenderService};
use crate::domain::{
    assets::AssetLookup,
    content::ContentType,
    emoji::{GemojiShortcodes, ShortcodeTable},
    ir::{Block, Document},
};

use block::HtmlRenderer;
use config::default_options;
use convert::markup_to_document;

pub use emoji::DEFAULT_EMOJI_CDN_BASE;
pub use structured::{decode_document, encode_document};

pub(crate) use emoji::METRIC_SHORTCODE_MISS_TOTAL;
pub(crate) use url::METRIC_ASSET_UNRESOLVED_TOTAL;

pub(crate) const METRIC_RENDER_TOTAL: &str = "kazani_render_total";
pub(crate) const METRIC_RENDER_FAILED_TOTAL: &str = "kazani_render_failed_total";
pub(crate) const METRIC_RENDER_MS: &str = "kazani_render_ms";

pub const DEFAULT_PERMALINK_SYMBOL: &str = "#";

/// Deepest node nesting the converter and renderer will walk. Every stage
/// recurses once per level, so anything deeper is refused instead of
/// exhausting the stack.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Depth of a node one level below `depth`.
fn nested(depth: usize) -> Result<usize, RenderError> {
    if depth >= MAX_NESTING_DEPTH {
        return Err(RenderError::nesting_too_deep(MAX_NESTING_DEPTH));
    }
    Ok(depth + 1)
}

/// Article rendering pipeline: content-type dispatch, CommonMark conversion
/// and HTML generation over the shared IR.
pub struct KazaniRenderService {
    options: comrak::options::Options<'static>,
    emoji_cdn_base: String,
    permalink_symbol: String,
    shortcodes: Arc<dyn ShortcodeTable>,
}

impl KazaniRenderService {
    pub fn new(config: RenderPipelineConfig) -> Self {
        Self {
            options: default_options(),
            emoji_cdn_base: config.emoji_cdn_base,
            permalink_symbol: config.permalink_symbol,
            shortcodes: Arc::new(GemojiShortcodes),
        }
    }

    /// Replace the shortcode table used for `:name:` expansion and emoji
    /// references.
    pub fn with_shortcodes(mut self, shortcodes: Arc<dyn ShortcodeTable>) -> Self {
        self.shortcodes = shortcodes;
        self
    }

    /// Bring request content into IR form according to its content type.
    pub fn parse(&self, request: &RenderRequest) -> Result<Document, RenderError> {
        match request.content_type {
            ContentType::StructuredIr => decode_document(&request.content),
            ContentType::MarkupText => markup_to_document(&request.content, &self.options),
            ContentType::RawHtml => Ok(vec![Block::raw(request.content.clone())]),
        }
    }

    /// Render an already parsed document.
    pub fn render_document(
        &self,
        document: &[Block],
        assets: &dyn AssetLookup,
    ) -> Result<String, RenderError> {
        HtmlRenderer::new(
            assets,
            self.shortcodes.as_ref(),
            &self.emoji_cdn_base,
            &self.permalink_symbol,
        )
        .render_blocks(document)
    }
}

static RENDER_SERVICE: Lazy<Arc<KazaniRenderService>> =
    Lazy::new(|| Arc::new(KazaniRenderService::new(active_render_config())));

/// Access the shared render service instance, initialised on first use.
pub fn render_service() -> Arc<KazaniRenderService> {
    Arc::clone(&RENDER_SERVICE)
}

impl Default for KazaniRenderService {
    fn default() -> Self {
        Self::new(RenderPipelineConfig::default())
    }
}

impl RenderService for KazaniRenderService {
    fn render(
        &self,
        request: &RenderRequest,
        assets: &dyn AssetLookup,
    ) -> Result<String, RenderError> {
        let started_at = Instant::now();
        let content_type = request.content_type.as_str();

        let result = self
            .parse(request)
            .and_then(|document| self.render_document(&document, assets));

        let elapsed_ms = started_at.elapsed().as_secs_f64() * 1000.0;
        counter!(METRIC_RENDER_TOTAL, "content_type" => content_type).increment(1);
        histogram!(METRIC_RENDER_MS, "content_type" => content_type).record(elapsed_ms);

        match &result {
            Ok(html) => debug!(
                target = "application::render::service",
                content_type,
                bytes = html.len(),
                elapsed_ms,
                "content rendered"
            ),
            Err(err) => {
                counter!(METRIC_RENDER_FAILED_TOTAL, "content_type" => content_type).increment(1);
                warn!(
                    target = "application::render::service",
                    content_type,
                    error = %err,
                    "content render failed"
                );
            }
        }

        result
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPipelineConfig {
    pub emoji_cdn_base: String,
    pub permalink_symbol: String,
}

impl Default for RenderPipelineConfig {
    fn default() -> Self {
        Self {
            emoji_cdn_base: DEFAULT_EMOJI_CDN_BASE.to_string(),
            permalink_symbol: DEFAULT_PERMALINK_SYMBOL.to_string(),
        }
    }
}

impl From<&crate::config::RenderSettings> for RenderPipelineConfig {
    fn from(settings: &crate::config::RenderSettings) -> Self {
        Self {
            emoji_cdn_base: settings.emoji_cdn_base.clone(),
            permalink_symbol: settings.permalink_symbol.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderConfigError {
    #[error("render service already configured")]
    AlreadyConfigured,
}

static RENDER_PIPELINE_CONFIG: OnceCell<RenderPipelineConfig> = OnceCell::new();

/// Set the configuration used by [`render_service`]. Only the first call wins,
/// and it must happen before the shared service is first used.
pub fn configure_render_service(config: RenderPipelineConfig) -> Result<(), RenderConfigError> {
    RENDER_PIPELINE_CONFIG
        .set(config)
        .map_err(|_| RenderConfigError::AlreadyConfigured)
}

fn active_render_config() -> RenderPipelineConfig {
    RENDER_PIPELINE_CONFIG.get().cloned().unwrap_or_default()
}
