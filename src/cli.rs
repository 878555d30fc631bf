// CLI module - command-line argument parsing and handlers
//
// Subcommands:
// - config --show|--path|--reset: inspect or regenerate the config file
// - whoami: check the configured token against the API
// - export --ledger-account <UUID>: run a CSV export and print its link
//
// With no subcommand the TUI starts.

use crate::config::{Config, VERSION};
use crate::export::{ExportJob, ExportUpdate};
use crate::graphql::GraphqlClient;
use crate::session::{Session, SessionState};
use crate::validation;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use tokio::sync::mpsc;

/// lana-admin - terminal console for the core-banking admin API
#[derive(Parser)]
#[command(name = "lana-admin")]
#[command(version = VERSION)]
#[command(about = "Terminal console for the core-banking admin API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },

    /// Check that the configured token is accepted
    Whoami,

    /// Export a ledger account's entries as CSV and print the download link
    Export {
        /// Ledger account id
        #[arg(long, value_name = "UUID")]
        ledger_account: String,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// config
// ─────────────────────────────────────────────────────────────────────────────

/// Handle `config` flags. Runs before logging is set up.
pub fn handle_config(show: bool, reset: bool, path: bool) -> Result<()> {
    if path {
        handle_config_path()
    } else if show {
        handle_config_show();
        Ok(())
    } else if reset {
        handle_config_reset()
    } else {
        println!("Usage: lana-admin config [--show|--reset|--path]");
        println!();
        println!("Options:");
        println!("  --show    Display effective configuration");
        println!("  --reset   Reset config file to defaults");
        println!("  --path    Show config file path");
        Ok(())
    }
}

fn handle_config_path() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;
    println!("{}", path.display());
    Ok(())
}

fn handle_config_show() {
    let mut config = Config::from_env();
    // Never echo the token itself
    if config.api.token.is_some() {
        config.api.token = Some("********".to_string());
    }

    println!("# Effective configuration (env > file > defaults)");
    println!();
    print!("{}", config.to_toml());
    println!();
    println!("# enable_tui = {}", config.enable_tui);

    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
}

fn handle_config_reset() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;

    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        std::io::stderr().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Error creating {}", parent.display()))?;
    }

    std::fs::write(&path, Config::default().to_toml())
        .with_context(|| format!("Error writing {}", path.display()))?;

    println!("Config reset to defaults: {}", path.display());
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// whoami
// ─────────────────────────────────────────────────────────────────────────────

pub async fn handle_whoami(config: &Config) -> Result<()> {
    if !config.api.has_token() {
        bail!(
            "No token configured. Set {} or [api] token in the config file.",
            crate::config::env::TOKEN
        );
    }

    let client = GraphqlClient::new(&config.api)?;
    let session_path = Session::default_path().context("Could not determine session path")?;
    let session = Session::new(session_path, config.api.token.as_deref());

    match session.check(&client).await? {
        SessionState::LoggedIn(user) => {
            println!("{}", user.email);
            if !user.roles.is_empty() {
                println!("roles: {}", user.roles.join(", "));
            }
            Ok(())
        }
        SessionState::LoggedOut => bail!("Token rejected by {}", client.endpoint()),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// export
// ─────────────────────────────────────────────────────────────────────────────

pub async fn handle_export(config: &Config, ledger_account: &str) -> Result<()> {
    let ledger_account_id = validation::uuid("Ledger account", ledger_account)?.to_string();
    let client = GraphqlClient::new(&config.api)?;
    let (tx, mut rx) = mpsc::channel(8);

    let job = ExportJob::start(
        client,
        ledger_account_id,
        config.export.poll_interval(),
        tx,
    )
    .await
    .context("Could not create CSV export")?;

    eprintln!("Export {} created, waiting for it to finish...", job.csv_id());

    loop {
        tokio::select! {
            update = rx.recv() => match update {
                Some(ExportUpdate::Pending { .. }) => {}
                Some(ExportUpdate::Completed { link, .. }) => {
                    println!("{}", link);
                    return Ok(());
                }
                Some(ExportUpdate::Failed { csv_id }) => bail!("Export {} failed", csv_id),
                Some(ExportUpdate::Error(e)) => return Err(e).context("Export polling failed"),
                None => bail!("Export poller stopped unexpectedly"),
            },
            _ = tokio::signal::ctrl_c() => {
                // Dropping the job aborts the poller
                drop(job);
                bail!("Export cancelled");
            }
        }
    }
}
