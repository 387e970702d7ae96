//! Command-line definition for the `notifox` binary.

use clap::{Args, Parser, Subcommand};
use std::io::{self, Read};

/// Log filter used when `RUST_LOG` is unset; stderr then carries only the
/// final error line
pub const DEFAULT_LOG_FILTER: &str = "off";

/// Send alerts through Notifox over SMS or email
#[derive(Debug, Parser)]
#[command(name = "notifox", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Send an alert
    Send(SendArgs),
}

#[derive(Debug, Args)]
pub struct SendArgs {
    /// Audience to send the alert to
    #[arg(short, long, env = "NOTIFOX_AUDIENCE")]
    pub audience: String,

    /// Channel to send through (sms|email)
    #[arg(short, long, env = "NOTIFOX_CHANNEL")]
    pub channel: String,

    /// Message to send; read from stdin when omitted
    #[arg(short, long)]
    pub message: Option<String>,

    /// Email subject, ignored for SMS
    #[arg(short, long)]
    pub subject: Option<String>,

    /// Print message ID, cost and part count after sending
    #[arg(short, long)]
    pub verbose: bool,
}

/// Resolve the alert message
///
/// The `--message` flag wins. Otherwise piped input is read in full and
/// trimmed; an interactive terminal yields an empty message.
pub fn read_message<R: Read>(
    flag: Option<&str>,
    mut input: R,
    input_is_terminal: bool,
) -> io::Result<String> {
    if let Some(message) = flag.filter(|m| !m.is_empty()) {
        return Ok(message.to_string());
    }

    if input_is_terminal {
        return Ok(String::new());
    }

    let mut data = String::new();
    input.read_to_string(&mut data)?;
    Ok(data.trim().to_string())
}
