//! Test utilities for alert delivery
//!
//! Fixtures and a scripted [`AlertTransport`] that replays canned outcomes and
//! records when each attempt happened, so retry timing can be asserted on
//! tokio's paused clock.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

use crate::provider_base::{AlertTransport, TransportError};
use crate::types::{AlertChannel, AlertRequest, AlertResponse};

/// Create a composed SMS request with default values
pub fn sample_request() -> AlertRequest {
    AlertRequest {
        audience: "on-call".to_string(),
        channel: AlertChannel::Sms,
        body: "disk usage above 90% on db-1".to_string(),
        raw_message: "disk usage above 90% on db-1".to_string(),
        subject: None,
    }
}

/// Create a provider acknowledgement with default values
pub fn sample_response() -> AlertResponse {
    AlertResponse {
        message_id: "msg_test_123".to_string(),
        cost: 0.025,
        currency: "USD".to_string(),
        parts: 1,
    }
}

type Outcome = Result<AlertResponse, TransportError>;

enum Script {
    Sequence(VecDeque<Outcome>),
    Repeat(Outcome),
    Hang,
}

/// Transport stub that replays scripted outcomes
pub struct ScriptedTransport {
    script: Mutex<Script>,
    attempts: Mutex<Vec<Instant>>,
    requests: Mutex<Vec<AlertRequest>>,
}

impl ScriptedTransport {
    /// Replay `outcomes` in order; once drained, every call fails
    pub fn new(outcomes: Vec<Outcome>) -> Self {
        Self::with_script(Script::Sequence(outcomes.into()))
    }

    /// Return the same outcome on every call
    pub fn repeating(outcome: Outcome) -> Self {
        Self::with_script(Script::Repeat(outcome))
    }

    /// Never complete a submission
    pub fn hanging() -> Self {
        Self::with_script(Script::Hang)
    }

    fn with_script(script: Script) -> Self {
        Self {
            script: Mutex::new(script),
            attempts: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.lock().len()
    }

    /// Time elapsed between consecutive attempts
    pub fn gaps(&self) -> Vec<Duration> {
        self.attempts
            .lock()
            .windows(2)
            .map(|pair| pair[1].duration_since(pair[0]))
            .collect()
    }

    /// Requests received so far, in order
    pub fn requests(&self) -> Vec<AlertRequest> {
        self.requests.lock().clone()
    }

    fn next_outcome(&self) -> Option<Outcome> {
        match &mut *self.script.lock() {
            Script::Sequence(outcomes) => Some(outcomes.pop_front().unwrap_or_else(|| {
                Err(TransportError::Other("script exhausted".to_string()))
            })),
            Script::Repeat(outcome) => Some(outcome.clone()),
            Script::Hang => None,
        }
    }
}

#[async_trait]
impl AlertTransport for ScriptedTransport {
    async fn submit(&self, request: &AlertRequest) -> Result<AlertResponse, TransportError> {
        self.attempts.lock().push(Instant::now());
        self.requests.lock().push(request.clone());

        match self.next_outcome() {
            Some(outcome) => outcome,
            None => std::future::pending().await,
        }
    }
}
