//! CLI entrypoint for FlowGrid
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use flowgrid_application::{
    DiagramRenderer, DiagramValidator, DisabledValidator, GenerateDiagramUseCase,
    GenerationProgress, NoProgress,
};
use flowgrid_domain::{GenerationRequest, GenerationResult, RenderFormat, RenderOptions, Theme};
use flowgrid_infrastructure::{
    ConfigLoader, FileConfig, JsonlConversationLogger, MermaidCli, OpenRouterGateway,
};
use flowgrid_presentation::{
    AppState, ChatRepl, Cli, ConsoleFormatter, ProgressReporter, SimpleProgress, load_history,
    server,
};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    apply_overrides(&mut config, &cli);

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        println!();
        print_effective_config(&config);
        return Ok(());
    }

    let log_dir = if cli.serve {
        config.logging.log_dir.as_deref()
    } else {
        None
    };
    let _log_guard = init_tracing(cli.verbose, log_dir);

    info!("Starting FlowGrid");

    // Fail on bad --render/--theme before spending a model call
    let render_options = cli
        .render
        .as_deref()
        .map(|path| -> Result<RenderOptions> {
            let theme: Theme = cli.theme.parse()?;
            let format = RenderFormat::from_path(path)?;
            Ok(RenderOptions::new(theme, format))
        })
        .transpose()?;

    // === Dependency Injection ===
    let params = config.generation_params()?;
    let gateway = Arc::new(OpenRouterGateway::new(config.provider.openrouter_settings())?);

    let mermaid =
        MermaidCli::new(config.validator.command.as_str()).with_timeout(config.validator.timeout());
    let validator: Arc<dyn DiagramValidator> = if config.validator.enabled {
        if !mermaid.is_available() {
            warn!(
                "Mermaid CLI '{}' not found; every diagram will be reported invalid. \
                 Install @mermaid-js/mermaid-cli or set validator.enabled = false",
                mermaid.command()
            );
        }
        Arc::new(mermaid.clone())
    } else {
        Arc::new(DisabledValidator)
    };

    let mut use_case = GenerateDiagramUseCase::new(gateway, validator, params);
    if let Some(path) = &config.logging.conversation_log {
        match JsonlConversationLogger::open(path) {
            Ok(logger) => {
                info!("Conversation log: {}", logger.path().display());
                use_case = use_case.with_conversation_logger(Arc::new(logger));
            }
            Err(e) => warn!(
                "Conversation log {} disabled: {}",
                path.display(),
                e
            ),
        }
    }

    let history = match &cli.history {
        Some(path) => load_history(path)?,
        None => Vec::new(),
    };

    // Server mode: credential problems are reported per request
    if cli.serve {
        server::serve(&config.server.bind, AppState::new(use_case))
            .await
            .with_context(|| format!("Server on {} failed", config.server.bind))?;
        return Ok(());
    }

    if !use_case.is_configured() {
        bail!(
            "OpenRouter API key not configured. Set {} or provider.api_key.",
            config.provider.api_key_env
        );
    }

    // Chat mode
    if cli.chat {
        let mut repl = ChatRepl::new(use_case)
            .with_history(history)
            .with_progress(!cli.quiet)
            .with_output(cli.output);
        repl.run().await?;
        return Ok(());
    }

    // Single turn mode - message is required
    let message = match cli.message {
        Some(m) => m,
        None => bail!("Message is required. Use --chat for interactive mode or --serve for HTTP."),
    };
    let request = GenerationRequest::new(message, history)?;

    let progress: Box<dyn GenerationProgress> = if cli.quiet {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };

    let result = use_case
        .execute_with_progress(&request, progress.as_ref())
        .await?;

    println!("{}", ConsoleFormatter::render(&result, cli.output));

    if let (Some(path), Some(options)) = (cli.render.as_deref(), render_options) {
        render_to_file(&mermaid, &result, path, &options).await?;
    }

    Ok(())
}

/// Command-line flags win over every configuration source.
fn apply_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(model) = &cli.model {
        config.provider.model = model.clone();
    }
    if let Some(max) = cli.max_repairs {
        config.generation.max_repair_retries = max;
    }
    if cli.no_validate {
        config.validator.enabled = false;
    }
    if let Some(bind) = &cli.bind {
        config.server.bind = bind.clone();
    }
}

/// Install the stderr subscriber, plus a daily rolling file when `log_dir` is set.
fn init_tracing(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "flowgrid.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    guard
}

fn print_effective_config(config: &FileConfig) {
    let mut shown = config.clone();
    if shown.provider.api_key.is_some() {
        shown.provider.api_key = Some("********".to_string());
    }
    match toml::to_string_pretty(&shown) {
        Ok(text) => println!("Effective configuration:\n\n{}", text),
        Err(e) => warn!("Could not display configuration: {}", e),
    }
}

async fn render_to_file(
    renderer: &dyn DiagramRenderer,
    result: &GenerationResult,
    path: &Path,
    options: &RenderOptions,
) -> Result<()> {
    if !result.has_diagram() {
        bail!("The reply contains no diagram to render");
    }

    let bytes = renderer.render(&result.diagram_text, options).await?;
    std::fs::write(path, bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    eprintln!("Rendered diagram to {}", path.display());
    Ok(())
}
