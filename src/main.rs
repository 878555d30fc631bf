// lana-admin - Terminal console for a core-banking admin API
//
// Browse customers, credit facilities, withdrawals, deposits, governance
// committees, policies and pending approvals; act on them through the
// admin GraphQL API.
//
// Architecture:
// - Domain: typed records and exact-decimal money/CVL math
// - GraphQL client (reqwest): typed operations, query cache, pagination
// - TUI (ratatui): routed pages built on a generic keyboard data table
// - Background tasks (tokio): requests and export polling report back over mpsc

mod cli;
mod config;
mod domain;
mod export;
mod finance;
mod graphql;
mod logging;
mod money;
mod session;
mod startup;
mod theme;
mod tui;
mod util;
mod validation;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use graphql::GraphqlClient;
use logging::{LogBuffer, TuiLogLayer};
use session::Session;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config commands run before anything touches the config file
    if let Some(Commands::Config { show, reset, path }) = &cli.command {
        return cli::handle_config(*show, *reset, *path);
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    let mut config = Config::from_env();

    // Subcommands are plain CLI output; never take over the screen
    if cli.command.is_some() {
        config.enable_tui = false;
    }

    let log_buffer = LogBuffer::new();

    // The guard must be kept alive for the duration of the program to ensure logs flush
    let _file_guard = init_tracing(&config, &log_buffer);

    match cli.command {
        Some(Commands::Whoami) => return cli::handle_whoami(&config).await,
        Some(Commands::Export { ledger_account }) => {
            return cli::handle_export(&config, &ledger_account).await
        }
        Some(Commands::Config { .. }) | None => {}
    }

    let session = Session::default_path().map(|path| Session::new(path, config.api.token.as_deref()));
    let session_cached = session.as_ref().is_some_and(Session::cached);

    startup::print_startup(&config, session_cached);
    startup::log_startup(&config, session_cached);

    if !config.enable_tui {
        // Headless: nothing to browse, so report who we are and exit
        return cli::handle_whoami(&config).await;
    }

    let client = GraphqlClient::new(&config.api).context("Failed to create API client")?;
    tui::run_tui(config, client, session, log_buffer).await
}

/// Initialize tracing with conditional output
///
/// In TUI mode logs go to the in-memory buffer (prevents garbling the
/// display); otherwise to stderr. File logging optionally adds a JSON layer
/// with rotation.
///
/// Precedence: RUST_LOG env var > config file > default "info"
fn init_tracing(
    config: &Config,
    log_buffer: &LogBuffer,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.filter_directive().into());

    let tui_layer = config
        .enable_tui
        .then(|| TuiLogLayer::new(log_buffer.clone()));
    let stderr_layer = (!config.enable_tui)
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    // The appender panics on a directory it cannot create, so make it first
    let appender = if !config.logging.file_enabled {
        None
    } else if let Err(e) = std::fs::create_dir_all(&config.logging.file_dir) {
        eprintln!(
            "Warning: Could not create log directory {:?}: {}",
            config.logging.file_dir, e
        );
        None
    } else {
        config.logging.appender()
    };
    let (file_layer, guard) = match appender {
        Some(appender) => {
            // Non-blocking writer; writes happen in a background thread
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tui_layer)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}
