//! Chunked contact import with flat pacing between chunks.
//!
//! Every chunk is accounted for exactly once: created contacts count toward
//! `created`, everything else in the chunk toward `skipped`. A failed chunk
//! never stops the import.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use scout_core::{BatchResult, CanonicalProfile, Clock, SystemClock};
use tracing::{info, warn};

use crate::client::{BatchOutcome, ContactInput, HubspotClient};
use crate::mapping::contact_properties;

/// HubSpot's batch-create limit.
pub const BATCH_SIZE: usize = 100;
const BATCH_PAUSE: Duration = Duration::from_millis(500);

pub struct BatchImporter {
    client: HubspotClient,
    clock: Arc<dyn Clock>,
    pause: Duration,
}

impl BatchImporter {
    #[must_use]
    pub fn new(client: HubspotClient) -> Self {
        Self {
            client,
            clock: Arc::new(SystemClock),
            pause: BATCH_PAUSE,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Imports `profiles` in chunks of [`BATCH_SIZE`], pausing between chunks.
    ///
    /// The returned counts always satisfy `created + skipped == profiles.len()`.
    pub async fn import_batch(&self, profiles: &[CanonicalProfile], job_id: &str) -> BatchResult {
        let discovered_at = Utc::now();
        let inputs: Vec<ContactInput> = profiles
            .iter()
            .map(|p| ContactInput {
                properties: contact_properties(p, job_id, discovered_at),
            })
            .collect();

        let total_batches = inputs.len().div_ceil(BATCH_SIZE);
        info!(job_id, contacts = inputs.len(), total_batches, "importing contacts");

        let mut result = BatchResult::default();
        for (index, chunk) in inputs.chunks(BATCH_SIZE).enumerate() {
            let batch = index + 1;
            let chunk_result = self.import_chunk(chunk, job_id, batch).await;
            info!(
                job_id,
                batch,
                total_batches,
                created = chunk_result.created,
                skipped = chunk_result.skipped,
                "batch imported"
            );
            result += chunk_result;

            if batch < total_batches {
                self.clock.sleep(self.pause).await;
            }
        }

        info!(
            job_id,
            created = result.created,
            skipped = result.skipped,
            "contact import complete"
        );
        result
    }

    async fn import_chunk(&self, chunk: &[ContactInput], job_id: &str, batch: usize) -> BatchResult {
        let len = chunk.len();
        match self.client.create_contacts(chunk).await {
            Ok(BatchOutcome::AllCreated) => BatchResult {
                created: len,
                skipped: 0,
            },
            Ok(BatchOutcome::Partial { successes, errors }) => {
                if successes + errors != len {
                    warn!(
                        job_id,
                        batch,
                        successes,
                        errors,
                        chunk = len,
                        "multi-status counts do not match chunk size"
                    );
                }
                let created = successes.min(len);
                BatchResult {
                    created,
                    skipped: len - created,
                }
            }
            Ok(BatchOutcome::Rejected { status }) => {
                warn!(job_id, batch, status, "batch rejected");
                BatchResult {
                    created: 0,
                    skipped: len,
                }
            }
            Err(e) => {
                warn!(job_id, batch, error = %e, "batch request failed");
                BatchResult {
                    created: 0,
                    skipped: len,
                }
            }
        }
    }
}
