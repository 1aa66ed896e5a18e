//! Collaborator seams for the orchestrator, with the production adapters.

use async_trait::async_trait;
use scout_core::{BatchResult, CanonicalProfile, FilterSpec};
use scout_hubspot::BatchImporter;
use scout_insightiq::{InsightIqClient, InsightIqError, RawProfile, SearchParameters};

/// Runs a creator search to completion and returns the raw vendor records.
#[async_trait]
pub trait ProfileSearch: Send + Sync {
    async fn search(&self, filters: &FilterSpec) -> Result<Vec<RawProfile>, InsightIqError>;
}

/// Imports standardized profiles into the CRM. Per-chunk failures are
/// absorbed into the returned counts.
#[async_trait]
pub trait ContactImporter: Send + Sync {
    async fn import(&self, profiles: &[CanonicalProfile], job_id: &str) -> BatchResult;
}

#[async_trait]
impl ProfileSearch for InsightIqClient {
    async fn search(&self, filters: &FilterSpec) -> Result<Vec<RawProfile>, InsightIqError> {
        let params = SearchParameters::from_filters(filters);
        self.submit_and_wait(&params).await
    }
}

#[async_trait]
impl ContactImporter for BatchImporter {
    async fn import(&self, profiles: &[CanonicalProfile], job_id: &str) -> BatchResult {
        self.import_batch(profiles, job_id).await
    }
}
