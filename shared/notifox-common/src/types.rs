//! Core types for alert delivery
//!
//! These are the values that flow between the CLI, the payload composer, the
//! dispatcher and the transport adapter. None of them outlive a single send.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::provider_base::ProviderError;

/// Delivery channels supported by Notifox
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AlertChannel {
    Sms,
    Email,
}

impl AlertChannel {
    /// Get channel name as used on the wire and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertChannel::Sms => "sms",
            AlertChannel::Email => "email",
        }
    }

    /// Whether the channel carries a subject line
    pub fn supports_subject(&self) -> bool {
        matches!(self, AlertChannel::Email)
    }
}

impl FromStr for AlertChannel {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sms" => Ok(AlertChannel::Sms),
            "email" => Ok(AlertChannel::Email),
            other => Err(ProviderError::InvalidChannel(other.to_string())),
        }
    }
}

impl std::fmt::Display for AlertChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertChannel::Sms => write!(f, "SMS"),
            AlertChannel::Email => write!(f, "Email"),
        }
    }
}

/// A composed alert, ready for submission
///
/// Built once per send by the payload composer and only borrowed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertRequest {
    pub audience: String,
    pub channel: AlertChannel,
    /// Final text handed to the provider
    pub body: String,
    /// Message as supplied by the caller, before composition
    pub raw_message: String,
    pub subject: Option<String>,
}

/// Provider acknowledgement of a delivered alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertResponse {
    pub message_id: String,
    pub cost: f64,
    pub currency: String,
    pub parts: u32,
}

impl AlertResponse {
    /// Human-readable delivery details, one entry per line
    pub fn detail_lines(&self) -> Vec<String> {
        vec![
            format!("Message ID: {}", self.message_id),
            format!("Cost: ${:.3} {}", self.cost, self.currency),
            format!("Parts: {}", self.parts),
        ]
    }
}
