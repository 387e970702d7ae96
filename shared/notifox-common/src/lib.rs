//! Shared types and utilities for Notifox alert delivery
//!
//! This library holds everything about a send that does not depend on HTTP:
//! the alert types, the transport seam, the error taxonomy with its
//! classifier, and the deadline-bound retry controller.

pub mod classifier;
pub mod provider_base;
pub mod retry;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utilities;

// Re-export commonly used types
pub use classifier::{classify, Classification};
pub use provider_base::{AlertTransport, ProviderError, TransportError};
pub use retry::{retry_with_backoff, Deadline, RetryPolicy, RetryState};
pub use types::*;
