//! Read-modify-write job status updates over a [`KeyValueStore`].

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use scout_core::{JobRecord, JobStatus, JobUpdate};
use tracing::debug;

use crate::error::StoreError;
use crate::kv::KeyValueStore;

pub const JOB_KEY_PREFIX: &str = "discovery_job:";
pub const JOB_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Clone)]
pub struct JobStatusStore {
    kv: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for JobStatusStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobStatusStore").finish_non_exhaustive()
    }
}

fn job_key(job_id: &str) -> String {
    format!("{JOB_KEY_PREFIX}{job_id}")
}

impl JobStatusStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Loads the job (or starts a bare record), sets `status`, merges
    /// `update`, stamps `updated_at`, and writes it back with a fresh TTL.
    ///
    /// Not atomic across processes: each job is only written by the worker
    /// running it.
    ///
    /// # Errors
    ///
    /// - [`StoreError::TerminalState`] if the stored job is already
    ///   completed or failed.
    /// - [`StoreError::Redis`], [`StoreError::Serialize`] or
    ///   [`StoreError::Deserialize`] on backend or encoding failure.
    pub async fn update(
        &self,
        job_id: &str,
        status: JobStatus,
        update: JobUpdate,
    ) -> Result<JobRecord, StoreError> {
        let now = Utc::now();
        let mut record = match self.get(job_id).await? {
            Some(existing) if existing.status.is_terminal() => {
                return Err(StoreError::TerminalState {
                    job_id: job_id.to_string(),
                    status: existing.status,
                });
            }
            Some(existing) => existing,
            None => JobRecord::new(job_id, now),
        };
        record.apply(status, update, now);

        let key = job_key(job_id);
        let json = serde_json::to_string(&record).map_err(|source| StoreError::Serialize {
            key: key.clone(),
            source,
        })?;
        self.kv.set_ex(&key, json, JOB_TTL).await?;
        debug!(job_id, status = %status, "job status updated");
        Ok(record)
    }

    /// Returns the stored record, or `None` for an unknown or expired job.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Redis`] or [`StoreError::Deserialize`].
    pub async fn get(&self, job_id: &str) -> Result<Option<JobRecord>, StoreError> {
        let key = job_key(job_id);
        let Some(json) = self.kv.get(&key).await? else {
            return Ok(None);
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|source| StoreError::Deserialize { key, source })
    }
}

#[cfg(test)]
mod tests {
    use scout_core::{BatchResult, FilterSpec, Platform};

    use super::*;
    use crate::kv::MemoryStore;

    fn store() -> (JobStatusStore, Arc<MemoryStore>) {
        let kv = Arc::new(MemoryStore::new());
        (JobStatusStore::new(kv.clone()), kv)
    }

    #[tokio::test]
    async fn unknown_job_is_none() {
        let (store, _) = store();
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn updates_merge_into_one_record() {
        let (store, kv) = store();
        store
            .update(
                "job-1",
                JobStatus::Discovering,
                JobUpdate::default().filters(FilterSpec::for_platform(Platform::Tiktok)),
            )
            .await
            .unwrap();
        store
            .update(
                "job-1",
                JobStatus::Importing,
                JobUpdate::default().profiles_found(12),
            )
            .await
            .unwrap();
        let record = store
            .update(
                "job-1",
                JobStatus::Completed,
                JobUpdate::default().import_counts(BatchResult {
                    created: 10,
                    skipped: 2,
                }),
            )
            .await
            .unwrap();

        assert_eq!(record.status, JobStatus::Completed);
        assert_eq!(record.profiles_found, Some(12));
        assert_eq!(record.new_contacts_created, Some(10));
        assert_eq!(
            record.filters.map(|f| f.platform),
            Some(Platform::Tiktok)
        );

        let raw = kv.get("discovery_job:job-1").await.unwrap().unwrap();
        assert!(raw.contains("\"status\":\"completed\""));
        assert_eq!(store.get("job-1").await.unwrap().unwrap().duplicates_skipped, Some(2));
    }

    #[tokio::test]
    async fn terminal_record_rejects_updates() {
        let (store, _) = store();
        store
            .update("job-2", JobStatus::Failed, JobUpdate::default().error("boom"))
            .await
            .unwrap();

        let err = store
            .update("job-2", JobStatus::Importing, JobUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::TerminalState {
                status: JobStatus::Failed,
                ..
            }
        ));
        let record = store.get("job-2").await.unwrap().unwrap();
        assert_eq!(record.status, JobStatus::Failed);
        assert_eq!(record.error.as_deref(), Some("boom"));
    }

    #[tokio::test(start_paused = true)]
    async fn every_update_refreshes_ttl() {
        let (store, _) = store();
        store
            .update("job-3", JobStatus::Queued, JobUpdate::default())
            .await
            .unwrap();
        tokio::time::advance(JOB_TTL - Duration::from_secs(60)).await;
        store
            .update("job-3", JobStatus::Discovering, JobUpdate::default())
            .await
            .unwrap();
        tokio::time::advance(JOB_TTL - Duration::from_secs(60)).await;

        let record = store.get("job-3").await.unwrap();
        assert_eq!(record.map(|r| r.status), Some(JobStatus::Discovering));

        tokio::time::advance(Duration::from_secs(120)).await;
        assert!(store.get("job-3").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_record_is_a_decode_error() {
        let (store, kv) = store();
        kv.set_ex("discovery_job:bad", "{not json".to_string(), JOB_TTL)
            .await
            .unwrap();
        let err = store.get("bad").await.unwrap_err();
        assert!(matches!(err, StoreError::Deserialize { .. }));
    }
}
