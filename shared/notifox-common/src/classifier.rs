//! Mapping of transport failures onto the provider error taxonomy
//!
//! The classifier decides two things for every failed submission: which
//! [`ProviderError`] the caller eventually sees, and whether the retry
//! controller may try again.

use tracing::debug;

use crate::provider_base::{ProviderError, TransportError};

/// A classified transport failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub error: ProviderError,
    pub retryable: bool,
}

/// Classify a transport failure
///
/// Rules are checked in order and the first match wins. Authentication,
/// balance and rate-limit responses are surfaced immediately; API errors are
/// retried only for 5xx statuses; connection faults are always retried.
pub fn classify(error: TransportError) -> Classification {
    let (error, retryable) = match error {
        TransportError::Authentication {
            status,
            response_text,
        } => (
            ProviderError::Authentication {
                status,
                message: response_text,
            },
            false,
        ),
        TransportError::InsufficientBalance { response_text } => {
            (ProviderError::InsufficientBalance(response_text), false)
        }
        TransportError::RateLimit { response_text } => {
            (ProviderError::RateLimitExceeded(response_text), false)
        }
        TransportError::Api {
            status,
            response_text,
        } => (
            ProviderError::Api {
                status,
                message: response_text,
            },
            status >= 500,
        ),
        TransportError::Connection(cause) => (ProviderError::Connection(cause), true),
        TransportError::Other(message) => (ProviderError::Unclassified(message), false),
    };

    debug!(error = %error, retryable, "Classified transport failure");
    Classification { error, retryable }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn api(status: u16) -> TransportError {
        TransportError::Api {
            status,
            response_text: "upstream said no".to_string(),
        }
    }

    #[rstest]
    #[case(500)]
    #[case(502)]
    #[case(503)]
    #[case(504)]
    #[case(599)]
    fn test_server_errors_are_retryable(#[case] status: u16) {
        let classification = classify(api(status));
        assert!(classification.retryable);
        assert!(matches!(
            classification.error,
            ProviderError::Api { status: s, .. } if s == status
        ));
    }

    #[rstest]
    #[case(400)]
    #[case(404)]
    #[case(409)]
    #[case(422)]
    #[case(499)]
    fn test_client_errors_are_not_retryable(#[case] status: u16) {
        let classification = classify(api(status));
        assert!(!classification.retryable);
        assert!(!classification.error.is_retryable());
    }

    #[test]
    fn test_authentication_is_terminal() {
        let classification = classify(TransportError::Authentication {
            status: 401,
            response_text: "invalid api key".to_string(),
        });

        assert!(!classification.retryable);
        assert_eq!(
            classification.error.to_string(),
            "authentication failed: invalid api key (status: 401)"
        );
    }

    #[test]
    fn test_account_state_errors_are_terminal() {
        let balance = classify(TransportError::InsufficientBalance {
            response_text: "top up required".to_string(),
        });
        assert_eq!(
            balance.error,
            ProviderError::InsufficientBalance("top up required".to_string())
        );
        assert!(!balance.retryable);

        let rate_limit = classify(TransportError::RateLimit {
            response_text: "too many requests".to_string(),
        });
        assert_eq!(
            rate_limit.error,
            ProviderError::RateLimitExceeded("too many requests".to_string())
        );
        assert!(!rate_limit.retryable);
    }

    #[test]
    fn test_connection_errors_are_retryable() {
        let classification = classify(TransportError::Connection("connection refused".to_string()));
        assert!(classification.retryable);
        assert_eq!(
            classification.error.to_string(),
            "connection error: connection refused"
        );
    }

    #[test]
    fn test_unknown_errors_are_unclassified() {
        let classification = classify(TransportError::Other("invalid JSON body".to_string()));
        assert!(!classification.retryable);
        assert_eq!(
            classification.error,
            ProviderError::Unclassified("invalid JSON body".to_string())
        );
    }

    #[test]
    fn test_verdict_matches_error_retryability() {
        let samples = vec![
            api(503),
            api(429),
            TransportError::Connection("reset".to_string()),
            TransportError::RateLimit {
                response_text: String::new(),
            },
            TransportError::Other("?".to_string()),
        ];

        for sample in samples {
            let classification = classify(sample);
            assert_eq!(classification.retryable, classification.error.is_retryable());
        }
    }
}
