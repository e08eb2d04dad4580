use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

use crate::domain::content::ContentType;

/// Command-line arguments for the Kazani binary.
#[derive(Debug, Parser)]
#[command(name = "kazani", version, about = "Kazani article renderer")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "KAZANI_CONFIG_FILE",
        value_name = "PATH",
        global = true
    )]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: GlobalOverrides,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Render an article body to an HTML fragment on stdout.
    Render(RenderArgs),
    /// Convert markup into structured IR JSON on stdout.
    Convert(ConvertArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct GlobalOverrides {
    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,

    /// Override the base URL emoji images are served from.
    #[arg(long = "emoji-cdn-base", value_name = "URL", global = true)]
    pub emoji_cdn_base: Option<String>,

    /// Override the text of heading permalinks.
    #[arg(long = "permalink-symbol", value_name = "TEXT", global = true)]
    pub permalink_symbol: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    /// Article body to render.
    #[arg(value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub file: PathBuf,

    /// Content type of FILE (structured|markup|raw); inferred from the extension when omitted.
    #[arg(long = "content-type", value_name = "TYPE")]
    pub content_type: Option<ContentType>,

    /// TOML asset manifest used to resolve `$identifier` URLs.
    #[arg(long = "assets", value_name = "MANIFEST", value_hint = ValueHint::FilePath)]
    pub assets: Option<PathBuf>,
}

impl RenderArgs {
    /// Content type to use for `file`: the explicit flag, else the extension.
    pub fn resolved_content_type(&self) -> ContentType {
        self.content_type
            .unwrap_or_else(|| ContentType::from_extension(&self.file))
    }
}

#[derive(Debug, Args, Clone)]
pub struct ConvertArgs {
    /// Markup file to convert.
    #[arg(value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub file: PathBuf,
}
