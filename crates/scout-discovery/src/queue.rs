//! Background job queue: a bounded channel drained by a fixed worker pool.
//!
//! Each worker runs one job at a time to completion. Jobs are independent;
//! nothing cancels a running job.

use std::sync::Arc;

use scout_core::{FilterSpec, JobStatus, JobUpdate};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::DiscoveryError;
use crate::orchestrator::DiscoveryOrchestrator;

/// Jobs that may wait for a free worker before `enqueue` blocks.
pub const QUEUE_CAPACITY: usize = 64;

struct QueuedJob {
    job_id: String,
    filters: FilterSpec,
}

/// Handle for submitting discovery jobs. Cheap to clone.
#[derive(Clone)]
pub struct JobQueue {
    sender: mpsc::Sender<QueuedJob>,
    orchestrator: Arc<DiscoveryOrchestrator>,
}

impl std::fmt::Debug for JobQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobQueue")
            .field("capacity", &self.sender.max_capacity())
            .finish_non_exhaustive()
    }
}

impl JobQueue {
    /// Spawns `workers` worker tasks (at least one) and returns the queue
    /// handle with their join handles. Workers exit once every handle is
    /// dropped and the channel drains.
    #[must_use]
    pub fn start(
        orchestrator: Arc<DiscoveryOrchestrator>,
        workers: usize,
    ) -> (Self, Vec<JoinHandle<()>>) {
        let (sender, receiver) = mpsc::channel(QUEUE_CAPACITY);
        let receiver = Arc::new(Mutex::new(receiver));

        let handles = (0..workers.max(1))
            .map(|worker| {
                let receiver = Arc::clone(&receiver);
                let orchestrator = Arc::clone(&orchestrator);
                tokio::spawn(run_worker(worker, receiver, orchestrator))
            })
            .collect();

        (
            Self {
                sender,
                orchestrator,
            },
            handles,
        )
    }

    #[must_use]
    pub fn orchestrator(&self) -> &DiscoveryOrchestrator {
        &self.orchestrator
    }

    /// Records the job as `queued` and hands it to the worker pool.
    ///
    /// # Errors
    ///
    /// - [`DiscoveryError::Store`] if the `queued` record cannot be written.
    /// - [`DiscoveryError::QueueClosed`] if every worker has exited; the
    ///   `queued` record is then marked `failed`.
    pub async fn enqueue(&self, filters: FilterSpec) -> Result<String, DiscoveryError> {
        let job_id = Uuid::new_v4().to_string();
        self.orchestrator
            .store()
            .update(
                &job_id,
                JobStatus::Queued,
                JobUpdate::default().filters(filters.clone()),
            )
            .await?;

        if self
            .sender
            .send(QueuedJob {
                job_id: job_id.clone(),
                filters,
            })
            .await
            .is_err()
        {
            let err = DiscoveryError::QueueClosed;
            if let Err(mark_err) = self
                .orchestrator
                .store()
                .update(
                    &job_id,
                    JobStatus::Failed,
                    JobUpdate::default().error(err.to_string()),
                )
                .await
            {
                error!(job_id = %job_id, error = %mark_err, "failed to mark unqueued job as failed");
            }
            return Err(err);
        }

        info!(job_id = %job_id, "discovery job queued");
        Ok(job_id)
    }
}

async fn run_worker(
    worker: usize,
    receiver: Arc<Mutex<mpsc::Receiver<QueuedJob>>>,
    orchestrator: Arc<DiscoveryOrchestrator>,
) {
    loop {
        // Hold the lock only while waiting for the next job.
        let next = receiver.lock().await.recv().await;
        let Some(job) = next else {
            break;
        };

        match orchestrator.discover(job.filters, Some(job.job_id.clone())).await {
            Ok(summary) => info!(
                worker,
                job_id = %job.job_id,
                found = summary.profiles_found,
                created = summary.new_contacts,
                "worker finished job"
            ),
            Err(e) => warn!(worker, job_id = %job.job_id, error = %e, "worker job failed"),
        }
    }
    info!(worker, "discovery worker stopped");
}
