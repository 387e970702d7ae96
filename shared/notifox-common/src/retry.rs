//! Retry logic and backoff strategies for alert delivery
//!
//! Every send runs through [`retry_with_backoff`]: a bounded number of
//! attempts, exponential delays between them, and a single deadline that both
//! the attempts and the delays observe.

use backoff::{backoff::Backoff, ExponentialBackoff};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, timeout_at, Instant};
use tracing::{debug, error, info, warn};

use crate::classifier::classify;
use crate::provider_base::{ProviderError, TransportError};

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Create a doubling policy with custom attempt count and first delay
    pub fn exponential(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
            ..Self::default()
        }
    }

    /// A single attempt, no retries
    pub fn no_retry() -> Self {
        Self::exponential(1, Duration::ZERO)
    }

    /// Convert to a jitter-free exponential backoff
    fn to_exponential_backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            current_interval: self.initial_delay,
            initial_interval: self.initial_delay,
            randomization_factor: 0.0,
            multiplier: self.multiplier,
            max_interval: self.max_delay,
            max_elapsed_time: None,
            ..Default::default()
        }
    }
}

/// Absolute time bound covering one whole send
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
    budget: Duration,
}

impl Deadline {
    /// Start the clock now
    pub fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now() + budget,
            budget,
        }
    }

    pub fn instant(&self) -> Instant {
        self.at
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    /// The error reported when this deadline fires
    pub fn exceeded(&self) -> ProviderError {
        ProviderError::DeadlineExceeded(self.budget)
    }
}

/// Per-send retry bookkeeping
pub struct RetryState {
    attempt: u32,
    max_attempts: u32,
    backoff: ExponentialBackoff,
}

impl RetryState {
    pub fn new(policy: &RetryPolicy) -> Self {
        Self {
            attempt: 0,
            max_attempts: policy.max_attempts.max(1),
            backoff: policy.to_exponential_backoff(),
        }
    }

    /// Zero-based index of the current attempt
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Delay to wait before the next attempt
    pub fn current_delay(&self) -> Duration {
        self.backoff.current_interval
    }

    pub fn is_last_attempt(&self) -> bool {
        self.attempt + 1 >= self.max_attempts
    }

    /// Move to the next attempt, returning the delay to wait first
    fn advance(&mut self) -> Duration {
        let delay = self
            .backoff
            .next_backoff()
            .unwrap_or(self.backoff.max_interval);
        self.attempt += 1;
        delay
    }
}

/// Retry an async submission with exponential backoff under a deadline
///
/// `operation` receives the zero-based attempt index. Failures are classified
/// after every attempt; only retryable failures are attempted again, and only
/// while attempts remain. When the attempts run out the last classified error
/// is returned as is. If the deadline fires during an attempt or a delay, the
/// pending work is dropped and [`ProviderError::DeadlineExceeded`] returned.
pub async fn retry_with_backoff<F, Fut, T>(
    policy: &RetryPolicy,
    deadline: Deadline,
    mut operation: F,
) -> Result<T, ProviderError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, TransportError>>,
{
    let mut state = RetryState::new(policy);

    loop {
        debug!(
            "Attempt {} of {} ({:?} left before deadline)",
            state.attempt() + 1,
            state.max_attempts,
            deadline.remaining()
        );

        let outcome = match timeout_at(deadline.instant(), operation(state.attempt())).await {
            Ok(outcome) => outcome,
            Err(_) => {
                error!(
                    "Deadline of {:?} reached during attempt {}",
                    deadline.budget(),
                    state.attempt() + 1
                );
                return Err(deadline.exceeded());
            }
        };

        let failure = match outcome {
            Ok(result) => {
                if state.attempt() > 0 {
                    info!("Alert accepted after {} attempts", state.attempt() + 1);
                }
                return Ok(result);
            }
            Err(e) => classify(e),
        };

        if !failure.retryable {
            error!("Non-retryable failure: {}", failure.error);
            return Err(failure.error);
        }

        if state.is_last_attempt() {
            error!(
                "Giving up after {} attempts, last error: {}",
                state.attempt() + 1,
                failure.error
            );
            return Err(failure.error);
        }

        let delay = state.advance();
        warn!(
            "Attempt {}/{} failed, retrying in {:?}. Error: {}",
            state.attempt(),
            state.max_attempts,
            delay,
            failure.error
        );

        if timeout_at(deadline.instant(), sleep(delay)).await.is_err() {
            error!(
                "Deadline of {:?} reached while waiting to retry",
                deadline.budget()
            );
            return Err(deadline.exceeded());
        }
    }
}
