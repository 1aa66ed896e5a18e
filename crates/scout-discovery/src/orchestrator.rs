//! One discovery job, end to end.
//!
//! `queued → discovering → importing → completed`; any error moves the job to
//! `failed` with a truncated message. The `failed` write and every
//! notification are best effort: their errors are logged and never change the
//! job's outcome.

use std::sync::Arc;

use scout_core::{AppConfig, DiscoverySummary, FilterSpec, JobStatus, JobUpdate, Platform};
use scout_hubspot::{BatchImporter, HubspotClient};
use scout_insightiq::{standardize, InsightIqClient};
use scout_store::JobStatusStore;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::DiscoveryError;
use crate::notify::{FailureReport, JobReport, NoopNotifier, Notifier, SlackNotifier};
use crate::ports::{ContactImporter, ProfileSearch};

/// Longest job error message persisted or sent in a notification.
pub const MAX_ERROR_CHARS: usize = 500;

/// Pipeline step a job was in when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validation,
    Discovery,
    Import,
    Completion,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Stage::Validation => "validation",
            Stage::Discovery => "discovery",
            Stage::Import => "import",
            Stage::Completion => "completion",
        })
    }
}

pub struct DiscoveryOrchestrator {
    search: Arc<dyn ProfileSearch>,
    importer: Arc<dyn ContactImporter>,
    store: JobStatusStore,
    notifier: Arc<dyn Notifier>,
}

impl DiscoveryOrchestrator {
    #[must_use]
    pub fn new(
        search: Arc<dyn ProfileSearch>,
        importer: Arc<dyn ContactImporter>,
        store: JobStatusStore,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            search,
            importer,
            store,
            notifier,
        }
    }

    /// Wires the production collaborators from configuration. Without a
    /// Slack webhook, notifications are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Config`] when vendor or CRM credentials are
    /// missing, or a client construction error.
    pub fn from_config(config: &AppConfig, store: JobStatusStore) -> Result<Self, DiscoveryError> {
        let (client_id, secret) = config.insightiq_credentials()?;
        let search = InsightIqClient::with_base_url(
            client_id,
            secret,
            config.http_timeout_secs,
            &config.insightiq_api_url,
        )?;
        let crm = HubspotClient::with_base_url(
            config.hubspot_key()?,
            config.http_timeout_secs,
            &config.hubspot_api_url,
        )?;
        let notifier: Arc<dyn Notifier> = match config.slack_webhook_url.as_deref() {
            Some(url) => Arc::new(SlackNotifier::new(url)?),
            None => Arc::new(NoopNotifier),
        };

        Ok(Self::new(
            Arc::new(search),
            Arc::new(BatchImporter::new(crm)),
            store,
            notifier,
        ))
    }

    #[must_use]
    pub fn store(&self) -> &JobStatusStore {
        &self.store
    }

    /// Runs one discovery job to completion. A fresh job id is generated
    /// when `job_id` is `None`.
    ///
    /// # Errors
    ///
    /// - [`DiscoveryError::Validation`] before any network call.
    /// - [`DiscoveryError::Search`] if the vendor search fails or times out.
    /// - [`DiscoveryError::Store`] if a status write on the success path
    ///   fails.
    pub async fn discover(
        &self,
        filters: FilterSpec,
        job_id: Option<String>,
    ) -> Result<DiscoverySummary, DiscoveryError> {
        let job_id = job_id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let platform = filters.platform;
        info!(job_id = %job_id, platform = %platform, "discovery job started");

        if let Err(e) = filters.validate() {
            let err = DiscoveryError::from(e);
            self.fail(&job_id, platform, Stage::Validation, 0, &err).await;
            return Err(err);
        }

        if let Err(e) = self
            .store
            .update(
                &job_id,
                JobStatus::Discovering,
                JobUpdate::default().filters(filters.clone()),
            )
            .await
        {
            let err = DiscoveryError::from(e);
            self.fail(&job_id, platform, Stage::Discovery, 0, &err).await;
            return Err(err);
        }

        let raw = match self.search.search(&filters).await {
            Ok(raw) => raw,
            Err(e) => {
                let err = DiscoveryError::from(e);
                self.fail(&job_id, platform, Stage::Discovery, 0, &err).await;
                return Err(err);
            }
        };
        let found = raw.len();
        info!(job_id = %job_id, found, "search complete");

        if let Err(e) = self
            .store
            .update(
                &job_id,
                JobStatus::Importing,
                JobUpdate::default().profiles_found(found),
            )
            .await
        {
            let err = DiscoveryError::from(e);
            self.fail(&job_id, platform, Stage::Import, found, &err).await;
            return Err(err);
        }

        let profiles = standardize(&raw, platform);
        let counts = self.importer.import(&profiles, &job_id).await;

        if let Err(e) = self
            .store
            .update(
                &job_id,
                JobStatus::Completed,
                JobUpdate::default()
                    .profiles_found(found)
                    .import_counts(counts),
            )
            .await
        {
            let err = DiscoveryError::from(e);
            self.fail(&job_id, platform, Stage::Completion, found, &err)
                .await;
            return Err(err);
        }

        let summary = DiscoverySummary {
            status: JobStatus::Completed,
            profiles_found: found,
            new_contacts: counts.created,
            duplicates: counts.skipped,
        };
        info!(
            job_id = %job_id,
            found,
            created = counts.created,
            skipped = counts.skipped,
            "discovery job completed"
        );

        let report = JobReport {
            job_id: job_id.clone(),
            platform,
            summary,
        };
        // Notifications run on the worker task. The notifier's own HTTP
        // timeout (10 s for Slack) bounds how long they hold it.
        if let Err(e) = self.notifier.job_completed(&report).await {
            warn!(job_id = %job_id, error = %e, "completion notification failed");
        }

        Ok(summary)
    }

    /// Marks the job failed and sends the failure notification, logging any
    /// secondary error.
    async fn fail(
        &self,
        job_id: &str,
        platform: Platform,
        stage: Stage,
        found: usize,
        err: &DiscoveryError,
    ) {
        let message = truncate_message(&err.to_string(), MAX_ERROR_CHARS);
        error!(job_id, stage = %stage, error = %message, "discovery job failed");

        if let Err(mark_err) = self
            .store
            .update(
                job_id,
                JobStatus::Failed,
                JobUpdate::default().error(message.clone()),
            )
            .await
        {
            error!(job_id, error = %mark_err, "failed to mark discovery job as failed");
        }

        let report = FailureReport {
            job_id: job_id.to_string(),
            platform,
            stage,
            profiles_found: found,
            error: message,
        };
        if let Err(e) = self.notifier.job_failed(&report).await {
            warn!(job_id, error = %e, "failure notification failed");
        }
    }
}

fn truncate_message(message: &str, max_chars: usize) -> String {
    message.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_message_counts_chars() {
        assert_eq!(truncate_message("héllo", 2), "hé");
        assert_eq!(truncate_message("short", 500), "short");
        assert_eq!(truncate_message(&"x".repeat(900), 500).len(), 500);
    }

    #[test]
    fn stage_display() {
        assert_eq!(Stage::Validation.to_string(), "validation");
        assert_eq!(Stage::Completion.to_string(), "completion");
    }
}
