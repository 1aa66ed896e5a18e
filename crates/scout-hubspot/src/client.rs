//! HTTP client for the HubSpot contacts batch-create endpoint.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::HubspotError;

const DEFAULT_BASE_URL: &str = "https://api.hubapi.com";
const BATCH_CREATE_PATH: [&str; 6] = ["crm", "v3", "objects", "contacts", "batch", "create"];

/// One contact in a batch-create request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactInput {
    pub properties: BTreeMap<String, Value>,
}

#[derive(Debug, Serialize)]
struct BatchCreateRequest<'a> {
    inputs: &'a [ContactInput],
}

/// Multi-status body returned with 207.
#[derive(Debug, Default, Deserialize)]
struct MultiStatusBody {
    #[serde(default)]
    results: Vec<Value>,
    #[serde(default)]
    errors: Vec<Value>,
}

/// Classified response to one batch-create request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// 201: every contact in the chunk was created.
    AllCreated,
    /// 207: some contacts were created, the rest were duplicates or invalid.
    Partial { successes: usize, errors: usize },
    /// Any other status: nothing in the chunk was created.
    Rejected { status: u16 },
}

/// Client for the HubSpot CRM API.
///
/// Use [`HubspotClient::new`] for production or
/// [`HubspotClient::with_base_url`] to point at a mock server in tests.
pub struct HubspotClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl std::fmt::Debug for HubspotClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubspotClient")
            .field("api_key", &"[redacted]")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl HubspotClient {
    /// # Errors
    ///
    /// Returns [`HubspotError::Client`] if the `reqwest::Client` cannot be
    /// constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, HubspotError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`HubspotError::Client`] if the `reqwest::Client` cannot be
    /// constructed, or [`HubspotError::InvalidBaseUrl`] if `base_url` does
    /// not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, HubspotError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("creator-scout/0.1 (crm-import)")
            .build()?;

        let base_url =
            Url::parse(base_url.trim_end_matches('/')).map_err(|e| HubspotError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: e.to_string(),
            })?;
        if base_url.cannot_be_a_base() {
            return Err(HubspotError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Sends one batch-create request and classifies the response.
    ///
    /// # Errors
    ///
    /// - [`HubspotError::Transport`] if the request cannot be sent.
    /// - [`HubspotError::Deserialize`] if a 207 body is not a batch result.
    pub async fn create_contacts(
        &self,
        inputs: &[ContactInput],
    ) -> Result<BatchOutcome, HubspotError> {
        let response = self
            .client
            .post(self.batch_create_url())
            .bearer_auth(&self.api_key)
            .json(&BatchCreateRequest { inputs })
            .send()
            .await
            .map_err(|e| HubspotError::Transport(e.to_string()))?;

        match response.status() {
            StatusCode::CREATED => Ok(BatchOutcome::AllCreated),
            StatusCode::MULTI_STATUS => {
                let body: MultiStatusBody =
                    response
                        .json()
                        .await
                        .map_err(|e| HubspotError::Deserialize {
                            context: "batch create multi-status body".to_string(),
                            source: e,
                        })?;
                Ok(BatchOutcome::Partial {
                    successes: body.results.len(),
                    errors: body.errors.len(),
                })
            }
            status => Ok(BatchOutcome::Rejected {
                status: status.as_u16(),
            }),
        }
    }

    fn batch_create_url(&self) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected at construction.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(BATCH_CREATE_PATH);
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_create_url_is_built_from_base() {
        let client = HubspotClient::with_base_url("key", 5, "http://localhost:9999/").unwrap();
        assert_eq!(
            client.batch_create_url().as_str(),
            "http://localhost:9999/crm/v3/objects/contacts/batch/create"
        );
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let client = HubspotClient::with_base_url("pat-secret", 5, "http://localhost:9999").unwrap();
        assert!(!format!("{client:?}").contains("pat-secret"));
    }
}
