use notifox_common::{AlertChannel, AlertRequest, ProviderError};

/// Composes the body submitted for each channel
#[derive(Debug, Clone, Default)]
pub struct AlertFormatter;

impl AlertFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Build the final body for `channel`
    ///
    /// Email folds a non-empty subject in as the first line, followed by a
    /// blank line, so the provider can lift it into the subject header. SMS
    /// has no subject and always sends the message unchanged.
    pub fn compose_body(
        &self,
        channel: AlertChannel,
        raw_message: &str,
        subject: Option<&str>,
    ) -> String {
        match (channel, subject.filter(|s| !s.is_empty())) {
            (AlertChannel::Email, Some(subject)) => format!("{}\n\n{}", subject, raw_message),
            _ => raw_message.to_string(),
        }
    }

    /// Validate the caller's input and compose the request to submit
    pub fn format_request(
        &self,
        audience: &str,
        channel: AlertChannel,
        message: &str,
        subject: Option<&str>,
    ) -> Result<AlertRequest, ProviderError> {
        if audience.is_empty() {
            return Err(ProviderError::InvalidRequest(
                "audience is required".to_string(),
            ));
        }

        if message.is_empty() {
            return Err(ProviderError::InvalidRequest(
                "message is required".to_string(),
            ));
        }

        let subject = subject
            .filter(|s| channel.supports_subject() && !s.is_empty())
            .map(str::to_string);

        Ok(AlertRequest {
            audience: audience.to_string(),
            channel,
            body: self.compose_body(channel, message, subject.as_deref()),
            raw_message: message.to_string(),
            subject,
        })
    }
}
