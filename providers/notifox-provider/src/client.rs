use crate::config::{NotifoxConfig, DEFAULT_BASE_URL};
use async_trait::async_trait;
use notifox_common::{
    AlertChannel, AlertRequest, AlertResponse, AlertTransport, ProviderError, TransportError,
};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct NotifoxRequest<'a> {
    audience: &'a str,
    alert: &'a str,
    channel: AlertChannel,
}

#[derive(Debug, Deserialize)]
struct NotifoxResponse {
    message_id: String,
    #[serde(default)]
    cost: f64,
    #[serde(default)]
    currency: String,
    #[serde(default = "default_parts")]
    parts: u32,
}

fn default_parts() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct NotifoxErrorBody {
    #[serde(default, alias = "error")]
    message: Option<String>,
}

/// HTTP client for the Notifox alert API
pub struct NotifoxClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl NotifoxClient {
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                ProviderError::InvalidConfiguration(format!("Failed to create HTTP client: {}", e))
            })?;

        let base_url = base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client,
            api_key,
            base_url,
        })
    }

    pub fn from_config(config: &NotifoxConfig) -> Result<Self, ProviderError> {
        Self::new(
            config.api_key.clone(),
            Some(config.resolved_base_url().to_string()),
            &config.user_agent,
            config.request_timeout(),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn send(&self, request: &AlertRequest) -> Result<AlertResponse, TransportError> {
        let body = NotifoxRequest {
            audience: &request.audience,
            alert: &request.body,
            channel: request.channel,
        };

        let response = self
            .client
            .post(format!("{}/alert", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                debug!("Failed to send alert request: {}", e);
                TransportError::Connection(e.to_string())
            })?;

        let status = response.status();

        if status.is_success() {
            let notifox_response: NotifoxResponse = response.json().await.map_err(|e| {
                debug!("Failed to parse Notifox response: {}", e);
                TransportError::Other(format!("Invalid response format: {}", e))
            })?;
            debug!(
                "Alert accepted with ID: {}",
                notifox_response.message_id
            );

            return Ok(AlertResponse {
                message_id: notifox_response.message_id,
                cost: notifox_response.cost,
                currency: notifox_response.currency,
                parts: notifox_response.parts.max(1),
            });
        }

        let response_text = error_text(status, &response.text().await.unwrap_or_default());

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                debug!("Authentication failed with Notifox: {}", response_text);
                Err(TransportError::Authentication {
                    status: status.as_u16(),
                    response_text,
                })
            }
            StatusCode::PAYMENT_REQUIRED => {
                debug!("Insufficient balance: {}", response_text);
                Err(TransportError::InsufficientBalance { response_text })
            }
            StatusCode::TOO_MANY_REQUESTS => {
                debug!("Rate limit exceeded: {}", response_text);
                Err(TransportError::RateLimit { response_text })
            }
            _ => {
                debug!("Notifox API error {}: {}", status, response_text);
                Err(TransportError::Api {
                    status: status.as_u16(),
                    response_text,
                })
            }
        }
    }
}

#[async_trait]
impl AlertTransport for NotifoxClient {
    async fn submit(&self, request: &AlertRequest) -> Result<AlertResponse, TransportError> {
        self.send(request).await
    }
}

/// Extract a readable message from an error response body
fn error_text(status: StatusCode, body: &str) -> String {
    if let Ok(NotifoxErrorBody {
        message: Some(message),
    }) = serde_json::from_str::<NotifoxErrorBody>(body)
    {
        return message;
    }

    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string()
    } else {
        body.to_string()
    }
}
