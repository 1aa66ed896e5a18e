//! HTTP client for the InsightIQ creator search-export API.
//!
//! Every call uses HTTP basic auth with the client id and secret. A search is
//! asynchronous: [`InsightIqClient::start_export`] submits it and returns the
//! vendor job id, [`InsightIqClient::fetch_page`] reads one page of results.
//! The poll loop that ties the two together lives in [`crate::poll`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use scout_core::{Clock, SystemClock};

use crate::error::InsightIqError;
use crate::params::SearchParameters;
use crate::poll::PollPolicy;
use crate::types::{ExportAccepted, ExportPage};

const DEFAULT_BASE_URL: &str = "https://api.insightiq.ai";
const EXPORT_PATH: [&str; 5] = ["v1", "social", "creators", "profiles", "search-export"];

/// Client for the InsightIQ search-export API.
///
/// Use [`InsightIqClient::new`] for production or
/// [`InsightIqClient::with_base_url`] to point at a mock server in tests.
pub struct InsightIqClient {
    client: Client,
    client_id: String,
    secret: String,
    base_url: Url,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) policy: PollPolicy,
}

impl std::fmt::Debug for InsightIqClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InsightIqClient")
            .field("client_id", &self.client_id)
            .field("secret", &"[redacted]")
            .field("base_url", &self.base_url.as_str())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl InsightIqClient {
    /// Creates a client pointed at the production InsightIQ API.
    ///
    /// # Errors
    ///
    /// Returns [`InsightIqError::Client`] if the `reqwest::Client` cannot be
    /// constructed.
    pub fn new(client_id: &str, secret: &str, timeout_secs: u64) -> Result<Self, InsightIqError> {
        Self::with_base_url(client_id, secret, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`InsightIqError::Client`] if the `reqwest::Client` cannot be
    /// constructed, or [`InsightIqError::InvalidBaseUrl`] if `base_url` does
    /// not parse.
    pub fn with_base_url(
        client_id: &str,
        secret: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, InsightIqError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("creator-scout/0.1 (creator-discovery)")
            .build()?;

        let base_url =
            Url::parse(base_url.trim_end_matches('/')).map_err(|e| InsightIqError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: e.to_string(),
            })?;
        if base_url.cannot_be_a_base() {
            return Err(InsightIqError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        Ok(Self {
            client,
            client_id: client_id.to_owned(),
            secret: secret.to_owned(),
            base_url,
            clock: Arc::new(SystemClock),
            policy: PollPolicy::default(),
        })
    }

    /// Replaces the time source used by the poll loop.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Submits a search-export job and returns the vendor job id.
    ///
    /// # Errors
    ///
    /// Returns [`InsightIqError::Submission`] on transport failure, on any
    /// status other than 200/202, or when the acceptance body has no `id`.
    pub async fn start_export(&self, params: &SearchParameters) -> Result<String, InsightIqError> {
        let url = self.export_url(None);
        let response = self
            .client
            .post(url)
            .basic_auth(&self.client_id, Some(&self.secret))
            .json(params)
            .send()
            .await
            .map_err(|e| InsightIqError::Submission(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::ACCEPTED {
            let body = response.text().await.unwrap_or_default();
            return Err(InsightIqError::Submission(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body.trim()
            )));
        }

        let accepted: ExportAccepted = response
            .json()
            .await
            .map_err(|e| InsightIqError::Submission(format!("unreadable response: {e}")))?;

        accepted
            .id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| InsightIqError::Submission("No job ID returned".to_string()))
    }

    /// Fetches one page of an export job's results.
    ///
    /// # Errors
    ///
    /// Returns [`InsightIqError::Poll`] on transport failure, a non-200
    /// status, or an undecodable body.
    pub async fn fetch_page(
        &self,
        job_id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<ExportPage, InsightIqError> {
        let url = self.export_url(Some(job_id));
        let response = self
            .client
            .get(url)
            .basic_auth(&self.client_id, Some(&self.secret))
            .query(&[("offset", offset), ("limit", limit)])
            .send()
            .await
            .map_err(|e| InsightIqError::Poll(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(InsightIqError::Poll(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body.trim()
            )));
        }

        response
            .json::<ExportPage>()
            .await
            .map_err(|e| InsightIqError::Poll(format!("unreadable page at offset {offset}: {e}")))
    }

    fn export_url(&self, job_id: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected at construction, so segments are available.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(EXPORT_PATH);
            if let Some(id) = job_id {
                segments.push(id);
            }
        }
        url
    }
}
