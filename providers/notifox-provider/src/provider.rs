use crate::{client::NotifoxClient, config::NotifoxConfig, formatter::AlertFormatter};
use notifox_common::{
    retry_with_backoff, AlertChannel, AlertResponse, AlertTransport, Deadline, ProviderError,
    RetryPolicy,
};
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(30);

/// Delivers one alert per call through a transport
///
/// Holds no per-send state, so a single dispatcher can serve concurrent sends.
pub struct AlertDispatcher<T = NotifoxClient> {
    transport: T,
    formatter: AlertFormatter,
    retry_policy: RetryPolicy,
    deadline: Duration,
}

impl AlertDispatcher<NotifoxClient> {
    /// Create a dispatcher talking to the Notifox API
    pub fn from_config(config: &NotifoxConfig) -> Result<Self, ProviderError> {
        config.validate().map_err(|e| {
            ProviderError::InvalidConfiguration(format!("Config validation failed: {}", e))
        })?;

        let client = NotifoxClient::from_config(config)?;

        Ok(Self::new(client)
            .with_retry_policy(config.retry_policy())
            .with_deadline(config.deadline()))
    }
}

impl<T: AlertTransport> AlertDispatcher<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            formatter: AlertFormatter::new(),
            retry_policy: RetryPolicy::default(),
            deadline: DEFAULT_DEADLINE,
        }
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Overall bound for a send, covering every attempt and delay
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send an alert to `audience` over `channel` ("sms" or "email")
    ///
    /// Input problems are reported before anything reaches the network. The
    /// full provider response is returned either way; `verbose` only raises
    /// the delivery details from debug to info level in the logs.
    pub async fn send_alert(
        &self,
        audience: &str,
        channel: &str,
        message: &str,
        subject: Option<&str>,
        verbose: bool,
    ) -> Result<AlertResponse, ProviderError> {
        let deadline = Deadline::after(self.deadline);

        let channel: AlertChannel = channel.parse()?;
        let request = self
            .formatter
            .format_request(audience, channel, message, subject)?;

        debug!(
            "Sending {} alert to {} ({} bytes)",
            channel,
            request.audience,
            request.body.len()
        );

        let transport = &self.transport;
        let request = &request;
        let response = retry_with_backoff(&self.retry_policy, deadline, move |_| {
            transport.submit(request)
        })
        .await?;

        if verbose {
            info!(
                message_id = %response.message_id,
                cost = response.cost,
                currency = %response.currency,
                parts = response.parts,
                "Alert delivered"
            );
        } else {
            debug!(message_id = %response.message_id, "Alert delivered");
        }

        Ok(response)
    }
}
