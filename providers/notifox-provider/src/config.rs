use config::{Config, ConfigError, Environment, File};
use notifox_common::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.notifox.com";

/// User agent sent with every request, derived from the crate version
pub fn default_user_agent() -> String {
    format!("notifox-cli/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifoxConfig {
    #[serde(default)]
    pub api_key: String,
    pub base_url: Option<String>,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub deadline_secs: u64,
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
}

impl Default for NotifoxConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: None,
            user_agent: default_user_agent(),
            request_timeout_secs: 30,
            deadline_secs: 30,
            max_attempts: 4,
            initial_delay_ms: 1000,
        }
    }
}

impl NotifoxConfig {
    /// Load configuration from `NOTIFOX_*` environment variables
    ///
    /// `NOTIFOX_API_KEY` is required. `NOTIFOX_CONFIG_PATH` may name a config
    /// file whose values sit below the environment. Empty variables count as
    /// unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("user_agent", defaults.user_agent)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs as i64)?
            .set_default("deadline_secs", defaults.deadline_secs as i64)?
            .set_default("max_attempts", defaults.max_attempts as i64)?
            .set_default("initial_delay_ms", defaults.initial_delay_ms as i64)?;

        if let Ok(config_path) = env::var("NOTIFOX_CONFIG_PATH") {
            builder = builder.add_source(File::with_name(&config_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("NOTIFOX")
                .prefix_separator("_")
                .separator("__")
                .ignore_empty(true)
                .try_parsing(true),
        );

        let config: NotifoxConfig = builder.build()?.try_deserialize()?;

        if config.api_key.is_empty() {
            return Err(ConfigError::Message(
                "NOTIFOX_API_KEY environment variable is required".to_string(),
            ));
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.is_empty() {
            return Err("API key is required".to_string());
        }

        if let Some(base_url) = &self.base_url {
            if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
                return Err(format!("Invalid base URL: {}", base_url));
            }
        }

        if self.user_agent.is_empty() {
            return Err("User agent must not be empty".to_string());
        }

        if self.request_timeout_secs == 0 || self.deadline_secs == 0 {
            return Err("Timeouts must be greater than 0".to_string());
        }

        if self.max_attempts == 0 || self.max_attempts > 10 {
            return Err("Max attempts must be between 1 and 10".to_string());
        }

        Ok(())
    }

    pub fn resolved_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::exponential(
            self.max_attempts,
            Duration::from_millis(self.initial_delay_ms),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    const VARS: [&str; 5] = [
        "NOTIFOX_API_KEY",
        "NOTIFOX_BASE_URL",
        "NOTIFOX_MAX_ATTEMPTS",
        "NOTIFOX_DEADLINE_SECS",
        "NOTIFOX_CONFIG_PATH",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn valid_config() -> NotifoxConfig {
        NotifoxConfig {
            api_key: "nfx_test_key".to_string(),
            ..NotifoxConfig::default()
        }
    }

    #[test]
    #[serial]
    fn test_from_env_requires_api_key() {
        clear_env();

        let err = NotifoxConfig::from_env().unwrap_err();
        assert!(err
            .to_string()
            .contains("NOTIFOX_API_KEY environment variable is required"));
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        env::set_var("NOTIFOX_API_KEY", "nfx_live_abc");

        let config = NotifoxConfig::from_env().unwrap();
        clear_env();

        assert_eq!(config.api_key, "nfx_live_abc");
        assert_eq!(config.base_url, None);
        assert_eq!(config.resolved_base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.user_agent, default_user_agent());
        assert_eq!(config.deadline(), Duration::from_secs(30));
        assert_eq!(config.retry_policy(), RetryPolicy::default());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        env::set_var("NOTIFOX_API_KEY", "nfx_live_abc");
        env::set_var("NOTIFOX_BASE_URL", "http://localhost:8080/");
        env::set_var("NOTIFOX_MAX_ATTEMPTS", "2");
        env::set_var("NOTIFOX_DEADLINE_SECS", "5");

        let config = NotifoxConfig::from_env().unwrap();
        clear_env();

        assert_eq!(config.base_url.as_deref(), Some("http://localhost:8080/"));
        assert_eq!(config.resolved_base_url(), "http://localhost:8080");
        assert_eq!(config.max_attempts, 2);
        assert_eq!(config.deadline(), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_from_env_empty_base_url_is_unset() {
        clear_env();
        env::set_var("NOTIFOX_API_KEY", "nfx_live_abc");
        env::set_var("NOTIFOX_BASE_URL", "");

        let config = NotifoxConfig::from_env().unwrap();
        clear_env();

        assert_eq!(config.base_url, None);
        assert_eq!(config.resolved_base_url(), DEFAULT_BASE_URL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_user_agent_carries_version() {
        assert_eq!(
            default_user_agent(),
            format!("notifox-cli/{}", env!("CARGO_PKG_VERSION"))
        );
    }

    #[test]
    fn test_validate() {
        assert!(valid_config().validate().is_ok());

        let missing_key = NotifoxConfig::default();
        assert_eq!(
            missing_key.validate().unwrap_err(),
            "API key is required".to_string()
        );

        let bad_url = NotifoxConfig {
            base_url: Some("ftp://notifox".to_string()),
            ..valid_config()
        };
        assert!(bad_url.validate().is_err());

        let too_many_attempts = NotifoxConfig {
            max_attempts: 11,
            ..valid_config()
        };
        assert!(too_many_attempts.validate().is_err());

        let zero_deadline = NotifoxConfig {
            deadline_secs: 0,
            ..valid_config()
        };
        assert!(zero_deadline.validate().is_err());
    }
}
