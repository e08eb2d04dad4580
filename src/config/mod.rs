//! Configuration layer: typed settings with layered precedence (file → env → CLI).

mod cli;

use std::{path::PathBuf, str::FromStr};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::application::render::{DEFAULT_EMOJI_CDN_BASE, DEFAULT_PERMALINK_SYMBOL};

pub use cli::{CliArgs, Command, ConvertArgs, GlobalOverrides, RenderArgs};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "kazani";
const ENV_PREFIX: &str = "KAZANI";

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub render: RenderSettings,
    pub assets: AssetSettings,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    /// Always ends with `/`.
    pub emoji_cdn_base: String,
    pub permalink_symbol: String,
}

#[derive(Debug, Clone, Default)]
pub struct AssetSettings {
    /// TOML manifest mapping asset identifiers to serving paths.
    pub manifest: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Parse process arguments and load settings for them.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let cli = CliArgs::parse();
    let settings = load(&cli)?;
    Ok((cli, settings))
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    raw.apply_global_overrides(&cli.overrides);
    if let Command::Render(args) = &cli.command {
        raw.apply_render_args(args);
    }

    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    render: RawRenderSettings,
    assets: RawAssetSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawRenderSettings {
    emoji_cdn_base: Option<String>,
    permalink_symbol: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawAssetSettings {
    manifest: Option<PathBuf>,
}

impl RawSettings {
    fn apply_global_overrides(&mut self, overrides: &GlobalOverrides) {
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }

        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }

        if let Some(base) = overrides.emoji_cdn_base.as_ref() {
            self.render.emoji_cdn_base = Some(base.clone());
        }

        if let Some(symbol) = overrides.permalink_symbol.as_ref() {
            self.render.permalink_symbol = Some(symbol.clone());
        }
    }

    fn apply_render_args(&mut self, args: &RenderArgs) {
        if let Some(manifest) = args.assets.as_ref() {
            self.assets.manifest = Some(manifest.clone());
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            logging,
            render,
            assets,
        } = raw;

        Ok(Self {
            logging: build_logging_settings(logging)?,
            render: build_render_settings(render)?,
            assets: build_asset_settings(assets)?,
        })
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_render_settings(render: RawRenderSettings) -> Result<RenderSettings, LoadError> {
    let base = render
        .emoji_cdn_base
        .unwrap_or_else(|| DEFAULT_EMOJI_CDN_BASE.to_string());
    let base = base.trim();
    if base.is_empty() {
        return Err(LoadError::invalid(
            "render.emoji_cdn_base",
            "base URL must not be empty",
        ));
    }
    let emoji_cdn_base = if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{base}/")
    };

    let permalink_symbol = render
        .permalink_symbol
        .unwrap_or_else(|| DEFAULT_PERMALINK_SYMBOL.to_string());
    if permalink_symbol.trim().is_empty() {
        return Err(LoadError::invalid(
            "render.permalink_symbol",
            "symbol must not be empty",
        ));
    }

    Ok(RenderSettings {
        emoji_cdn_base,
        permalink_symbol,
    })
}

fn build_asset_settings(assets: RawAssetSettings) -> Result<AssetSettings, LoadError> {
    let manifest = assets
        .manifest
        .filter(|path| !path.as_os_str().is_empty());
    Ok(AssetSettings { manifest })
}
