//! # Notifox CLI
//!
//! Entry point for the `notifox` command. Reads the alert from flags or
//! stdin, loads `NOTIFOX_*` configuration and hands the send to the
//! [`AlertDispatcher`].

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, IsTerminal};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use notifox_provider::cli::{read_message, Cli, Commands, SendArgs, DEFAULT_LOG_FILTER};
use notifox_provider::{AlertDispatcher, NotifoxConfig};

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries command output only
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Send(args) => send(args).await,
    }
}

async fn send(args: SendArgs) -> Result<()> {
    let stdin = io::stdin();
    let is_terminal = stdin.is_terminal();
    let message = read_message(args.message.as_deref(), stdin.lock(), is_terminal)
        .context("Failed to read message")?;

    let config = NotifoxConfig::from_env().context("Failed to load configuration")?;
    debug!("Using Notifox API at {}", config.resolved_base_url());

    let dispatcher =
        AlertDispatcher::from_config(&config).context("Failed to initialize Notifox client")?;

    let response = dispatcher
        .send_alert(
            &args.audience,
            &args.channel,
            &message,
            args.subject.as_deref(),
            args.verbose,
        )
        .await
        .context("Failed to send alert")?;

    println!("Alert sent successfully!");
    if args.verbose {
        for line in response.detail_lines() {
            println!("{line}");
        }
    }

    Ok(())
}
