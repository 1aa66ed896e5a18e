use async_trait::async_trait;
use scout_core::{DiscoverySummary, Platform};
use thiserror::Error;

use crate::orchestrator::Stage;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("webhook returned HTTP {0}")]
    Status(u16),
}

/// Summary of a completed discovery job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub job_id: String,
    pub platform: Platform,
    pub summary: DiscoverySummary,
}

/// Details of a failed discovery job. `error` is already truncated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReport {
    pub job_id: String,
    pub platform: Platform,
    pub stage: Stage,
    pub profiles_found: usize,
    pub error: String,
}

/// Outbound job notifications. Callers log and ignore errors.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn job_completed(&self, report: &JobReport) -> Result<(), NotifyError>;

    async fn job_failed(&self, report: &FailureReport) -> Result<(), NotifyError>;
}
