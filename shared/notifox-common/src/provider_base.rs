//! Transport seam and error taxonomy shared by alert providers
//!
//! [`AlertTransport`] is implemented by each external service client.
//! Transports report raw [`TransportError`]s; callers only ever see the
//! classified [`ProviderError`].

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::types::{AlertRequest, AlertResponse};

/// External service client that submits a composed alert
///
/// Implementations perform exactly one submission per call and never retry on
/// their own. Cancellation is by dropping the returned future.
#[async_trait]
pub trait AlertTransport: Send + Sync {
    async fn submit(&self, request: &AlertRequest) -> Result<AlertResponse, TransportError>;
}

/// Raw failure shapes reported by a transport adapter
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("authentication rejected with status {status}: {response_text}")]
    Authentication { status: u16, response_text: String },

    #[error("insufficient balance: {response_text}")]
    InsufficientBalance { response_text: String },

    #[error("rate limited: {response_text}")]
    RateLimit { response_text: String },

    #[error("API returned status {status}: {response_text}")]
    Api { status: u16, response_text: String },

    /// No response was received
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("{0}")]
    Other(String),
}

/// Provider error types
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    // Provider-reported errors
    #[error("authentication failed: {message} (status: {status})")]
    Authentication { status: u16, message: String },

    #[error("insufficient balance: {0}")]
    InsufficientBalance(String),

    #[error("rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("API error: {message} (status: {status})")]
    Api { status: u16, message: String },

    #[error("connection error: {0}")]
    Connection(String),

    #[error("error: {0}")]
    Unclassified(String),

    // Local errors, raised before or around the network
    #[error("invalid channel: {0} (must be 'sms' or 'email')")]
    InvalidChannel(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl ProviderError {
    /// Check if this error is retryable
    ///
    /// Only server-side 5xx responses and connection faults qualify.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::Api { status, .. } => *status >= 500,
            ProviderError::Connection(_) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_retryable_classification() {
        assert!(ProviderError::Connection("reset by peer".to_string()).is_retryable());
        assert!(ProviderError::Api {
            status: 502,
            message: "bad gateway".to_string()
        }
        .is_retryable());

        assert!(!ProviderError::Api {
            status: 422,
            message: "unprocessable".to_string()
        }
        .is_retryable());
        assert!(!ProviderError::RateLimitExceeded("slow down".to_string()).is_retryable());
        assert!(!ProviderError::DeadlineExceeded(Duration::from_secs(30)).is_retryable());
        assert!(!ProviderError::InvalidChannel("fax".to_string()).is_retryable());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ProviderError::Authentication {
                status: 401,
                message: "invalid api key".to_string()
            }
            .to_string(),
            "authentication failed: invalid api key (status: 401)"
        );
        assert_eq!(
            ProviderError::InvalidChannel("fax".to_string()).to_string(),
            "invalid channel: fax (must be 'sms' or 'email')"
        );
        assert_eq!(
            ProviderError::DeadlineExceeded(Duration::from_secs(30)).to_string(),
            "deadline of 30s exceeded"
        );
    }
}
