use std::{
    fs,
    io::{self, Write},
    path::Path,
    process,
};

use kazani::{
    application::{
        error::{AppError, ErrorReport},
        render::{
            RenderPipelineConfig, RenderRequest, RenderService, configure_render_service,
            encode_document, render_service,
        },
    },
    config::{self, Command, ConvertArgs, RenderArgs},
    domain::assets::AssetManifest,
    infra::{assets::load_manifest, error::InfraError, telemetry},
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

fn main() {
    if let Err(error) = run() {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    let report = ErrorReport::from_error("kazani::main", error);
    let log = || {
        error!(
            error = %report.chain(),
            summary = error.summary(),
            "application error"
        );
    };

    if dispatcher::has_been_set() {
        log();
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, log);
}

fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli().map_err(|err| {
        AppError::from(InfraError::configuration(format!(
            "failed to load configuration: {err}"
        )))
    })?;

    telemetry::init(&settings.logging)?;
    configure_render_service(RenderPipelineConfig::from(&settings.render))
        .map_err(|err| AppError::unexpected(err.to_string()))?;

    match cli_args.command {
        Command::Render(args) => run_render(&settings, &args),
        Command::Convert(args) => run_convert(&args),
    }
}

fn run_render(settings: &config::Settings, args: &RenderArgs) -> Result<(), AppError> {
    let content = read_input(&args.file)?;
    let assets = match settings.assets.manifest.as_deref() {
        Some(path) => load_manifest(path)?,
        None => AssetManifest::new(),
    };

    let content_type = args.resolved_content_type();
    info!(
        file = %args.file.display(),
        content_type = content_type.as_str(),
        assets = assets.len(),
        "rendering article body"
    );

    let request = RenderRequest::new(content, content_type);
    let html = render_service().render(&request, &assets)?;
    write_stdout(&html)
}

fn run_convert(args: &ConvertArgs) -> Result<(), AppError> {
    let content = read_input(&args.file)?;
    let document = render_service().parse(&RenderRequest::markup(content))?;
    let json = serde_json::to_string_pretty(&encode_document(&document))
        .map_err(|err| AppError::unexpected(format!("failed to encode document: {err}")))?;
    write_stdout(&json)
}

fn read_input(path: &Path) -> Result<String, AppError> {
    fs::read_to_string(path)
        .map_err(InfraError::from)
        .map_err(AppError::from)
}

fn write_stdout(output: &str) -> Result<(), AppError> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{output}").map_err(InfraError::from)?;
    stdout.flush().map_err(InfraError::from)?;
    Ok(())
}
