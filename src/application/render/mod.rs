//! Article rendering pipeline.
//!
//! The pipeline is pure: it accepts stored content and its content type,
//! produces a deterministic HTML fragment, and surfaces structured errors.
//! Asset lookups are the only collaborator and are passed in per call.

mod service;
mod types;

pub use service::{
    DEFAULT_EMOJI_CDN_BASE, DEFAULT_PERMALINK_SYMBOL, KazaniRenderService, MAX_NESTING_DEPTH,
    RenderConfigError, RenderPipelineConfig, configure_render_service, decode_document,
    encode_document, render_service,
};
pub use types::{NodeFamily, RenderError, RenderRequest, RenderService};

pub(crate) use service::{
    METRIC_ASSET_UNRESOLVED_TOTAL, METRIC_RENDER_FAILED_TOTAL, METRIC_RENDER_MS,
    METRIC_RENDER_TOTAL, METRIC_SHORTCODE_MISS_TOTAL,
};
