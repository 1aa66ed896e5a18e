use scout_core::{ConfigError, FilterError};
use scout_hubspot::HubspotError;
use scout_insightiq::InsightIqError;
use scout_store::StoreError;
use thiserror::Error;

use crate::notify::NotifyError;

/// Job-level failure, or a failure to assemble the pipeline.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("invalid filters: {0}")]
    Validation(#[from] FilterError),

    #[error(transparent)]
    Search(#[from] InsightIqError),

    #[error("job status store error: {0}")]
    Store(#[from] StoreError),

    #[error("job queue is closed")]
    QueueClosed,

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build CRM client: {0}")]
    Crm(#[from] HubspotError),

    #[error("failed to build notifier: {0}")]
    Notifier(#[from] NotifyError),
}
