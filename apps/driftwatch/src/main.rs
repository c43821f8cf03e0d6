//! driftwatch - drift detection for installed third-party libraries
//!
//! This is the main CLI application that orchestrates freeze, check, and
//! fetch-trusted operations through the ops crate.

mod cli;
mod display;
mod error;
mod events;
mod logging;

use crate::cli::{Cli, Commands, GlobalArgs};
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::events::EventHandler;
use clap::Parser;
use driftwatch_config::{ColorChoice, Config, OutputFormat};
use driftwatch_events::{EventReceiver, EventSender};
use driftwatch_fetch::PackageFetcher;
use driftwatch_ops::{OperationResult, OpsCtx, OpsCtxBuilder};
use driftwatch_snapshot::{SnapshotBuilder, SnapshotStore};
use std::process;
use tokio::select;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Parse command line arguments first to check for JSON mode
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    // Initialize tracing with JSON awareness
    init_tracing(json_mode, cli.global.debug);

    // Run the application and handle errors. The message goes to stderr
    // even in JSON mode, where stdout is reserved for the result document.
    if let Err(e) = run(cli).await {
        error!("Application error: {}", e);
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    info!("Starting driftwatch v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration with proper precedence:
    // 1. Start with file config (or defaults)
    let mut config = Config::load_or_default(&cli.global.config).await?;

    // 2. Merge environment variables
    config.merge_env()?;

    // 3. Apply CLI flags (highest precedence)
    apply_cli_config(&mut config, &cli.global, &cli.command);

    // Create event channel
    let (event_sender, event_receiver) = driftwatch_events::channel();

    // Build operations context
    let ops_ctx = build_ops_context(event_sender, config.clone())?;

    let colors_enabled = match config.general.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => console::Term::stderr().features().colors_supported(),
    };
    let json_output = cli.global.json || config.general.default_output == OutputFormat::Json;

    // Create output renderer and event handler
    let renderer = OutputRenderer::new(json_output, colors_enabled);
    let mut event_handler = EventHandler::new(colors_enabled, cli.global.debug, json_output);

    // Execute command with event handling
    let result =
        execute_command_with_events(cli.command, ops_ctx, event_receiver, &mut event_handler)
            .await?;

    // Render final result
    renderer.render_result(&result)?;

    info!("Command completed successfully");
    Ok(())
}

/// Execute command with concurrent event handling
async fn execute_command_with_events(
    command: Commands,
    ops_ctx: OpsCtx,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<OperationResult, CliError> {
    let mut command_future = Box::pin(execute_command(command, ops_ctx));

    // Handle events concurrently with command execution
    loop {
        select! {
            // Command completed
            result = &mut command_future => {
                // Drain any remaining events
                while let Ok(event) = event_receiver.try_recv() {
                    event_handler.handle_event(event);
                }
                return result;
            }

            // Event received
            event = event_receiver.recv() => {
                match event {
                    Some(event) => event_handler.handle_event(event),
                    None => { /* Channel closed: keep waiting for command to finish */ }
                }
            }
        }
    }
}

/// Execute the specified command
async fn execute_command(command: Commands, ctx: OpsCtx) -> Result<OperationResult, CliError> {
    match command {
        Commands::Freeze { .. } => {
            let report = driftwatch_ops::freeze(&ctx).await?;
            Ok(OperationResult::Freeze(report))
        }

        Commands::Check { .. } => {
            let report = driftwatch_ops::check(&ctx).await?;
            Ok(OperationResult::Check(report))
        }

        Commands::FetchTrusted {
            libraries,
            fetch_url,
            ..
        } => {
            let report =
                driftwatch_ops::fetch_trusted(&ctx, &libraries, fetch_url.as_deref()).await?;
            Ok(OperationResult::Fetch(report))
        }
    }
}

/// Build operations context with all required components
fn build_ops_context(event_sender: EventSender, config: Config) -> Result<OpsCtx, CliError> {
    let builder = SnapshotBuilder::new()
        .with_extensions(config.scan.extensions.clone())
        .with_event_sender(event_sender.clone());

    let store = SnapshotStore::new(config.freeze_file()).with_event_sender(event_sender.clone());

    let fetcher = PackageFetcher::new(&config.fetch.tool)
        .with_index_url(config.fetch.index_url.clone())
        .with_event_sender(event_sender.clone());

    let ctx = OpsCtxBuilder::new()
        .with_builder(builder)
        .with_store(store)
        .with_fetcher(fetcher)
        .with_event_sender(event_sender)
        .with_config(config)
        .build()?;

    Ok(ctx)
}

/// Apply CLI configuration overrides (highest precedence)
fn apply_cli_config(config: &mut Config, global: &GlobalArgs, command: &Commands) {
    // Global CLI flags override everything
    if let Some(color) = &global.color {
        config.general.color = *color;
    }

    // Command-specific CLI flags
    match command {
        Commands::Freeze {
            freeze_file,
            trusted,
        } => {
            if let Some(path) = freeze_file {
                config.paths.freeze_file = Some(path.clone());
            }
            if let Some(dir) = trusted {
                config.paths.trusted_dir = Some(dir.clone());
            }
        }

        Commands::Check {
            trusted,
            check,
            freeze_file,
        } => {
            if let Some(dir) = trusted {
                config.paths.trusted_dir = Some(dir.clone());
            }
            if let Some(dir) = check {
                config.paths.check_dir = Some(dir.clone());
            }
            if let Some(path) = freeze_file {
                config.paths.freeze_file = Some(path.clone());
            }
        }

        Commands::FetchTrusted { trusted, .. } => {
            if let Some(dir) = trusted {
                config.paths.trusted_dir = Some(dir.clone());
            }
        }
    }
}

/// Initialize tracing/logging
fn init_tracing(json_mode: bool, debug_enabled_flag: bool) {
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;

    if json_mode {
        // JSON mode: suppress all log output to avoid contaminating stdout
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
    } else if debug_enabled {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,driftwatch=debug")),
            )
            .init();
    } else {
        // Normal mode: minimal logging to stderr
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .init();
    }
}
