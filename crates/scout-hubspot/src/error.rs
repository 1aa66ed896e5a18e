use thiserror::Error;

/// Errors from a single CRM request. The importer absorbs them per chunk.
#[derive(Debug, Error)]
pub enum HubspotError {
    /// The underlying `reqwest::Client` could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("batch request failed: {0}")]
    Transport(String),

    /// A 207 response whose body does not match the batch result shape.
    #[error("failed to decode {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: reqwest::Error,
    },
}
