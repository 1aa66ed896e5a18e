use thiserror::Error;

/// Job-level errors from the InsightIQ client. Every variant is fatal for the
/// discovery job; nothing here is retried.
#[derive(Debug, Error)]
pub enum InsightIqError {
    /// The underlying `reqwest::Client` could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The export job could not be started: transport failure, a status other
    /// than 200/202, or an acceptance body without a job id.
    #[error("failed to start search export: {0}")]
    Submission(String),

    /// Transport, status, or decoding failure while fetching result pages.
    #[error("failed to fetch search export results: {0}")]
    Poll(String),

    /// Wall-clock time since submission exceeded the poll deadline. Pages
    /// already fetched are discarded.
    #[error("search export timed out after {elapsed_secs} seconds (limit {limit_secs}s)")]
    Timeout { elapsed_secs: u64, limit_secs: u64 },

    /// The vendor reported the export job as `FAILED`.
    #[error("search export job failed: {0}")]
    JobFailed(String),
}

/// Why a single vendor record could not be standardized. Always absorbed by
/// the standardizer: the record is logged and skipped.
#[derive(Debug, Error)]
pub enum StandardizeError {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("malformed record: {0}")]
    Malformed(#[from] serde_json::Error),
}
