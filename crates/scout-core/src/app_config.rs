use std::net::SocketAddr;

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub redis_url: String,
    pub insightiq_api_url: String,
    pub insightiq_client_id: Option<String>,
    pub insightiq_secret: Option<String>,
    pub hubspot_api_url: String,
    pub hubspot_api_key: Option<String>,
    pub slack_webhook_url: Option<String>,
    pub http_timeout_secs: u64,
    pub worker_concurrency: usize,
}

impl AppConfig {
    /// Returns the vendor client id and secret.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] naming the first absent variable.
    pub fn insightiq_credentials(&self) -> Result<(&str, &str), ConfigError> {
        let client_id = self
            .insightiq_client_id
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("INSIGHTIQ_CLIENT_ID".to_string()))?;
        let secret = self
            .insightiq_secret
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("INSIGHTIQ_SECRET".to_string()))?;
        Ok((client_id, secret))
    }

    /// Returns the CRM private-app token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] if `HUBSPOT_API_KEY` is unset.
    pub fn hubspot_key(&self) -> Result<&str, ConfigError> {
        self.hubspot_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("HUBSPOT_API_KEY".to_string()))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("redis_url", &"[redacted]")
            .field("insightiq_api_url", &self.insightiq_api_url)
            .field("insightiq_client_id", &self.insightiq_client_id)
            .field(
                "insightiq_secret",
                &self.insightiq_secret.as_ref().map(|_| "[redacted]"),
            )
            .field("hubspot_api_url", &self.hubspot_api_url)
            .field(
                "hubspot_api_key",
                &self.hubspot_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "slack_webhook_url",
                &self.slack_webhook_url.as_ref().map(|_| "[redacted]"),
            )
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("worker_concurrency", &self.worker_concurrency)
            .finish()
    }
}
