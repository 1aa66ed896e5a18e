//! Export poll loop.
//!
//! Submission starts the deadline clock. Each iteration checks the deadline,
//! fetches the page at the current offset, and decides the next [`Step`].
//! `IN_PROGRESS` re-polls the same offset after `interval`; a results page
//! advances the offset until the vendor's `total_results` is covered or a page
//! comes back empty.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::client::InsightIqClient;
use crate::error::InsightIqError;
use crate::params::SearchParameters;
use crate::types::{PageState, RawProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Wait between polls while the export is still running.
    pub interval: Duration,
    /// Maximum wall-clock time from submission to the last page.
    pub deadline: Duration,
    pub page_size: usize,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            deadline: Duration::from_secs(600),
            page_size: 100,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Step {
    Fetch { offset: usize },
    Wait { offset: usize },
    Done,
}

impl InsightIqClient {
    /// Submits a search and polls until every result page is collected.
    ///
    /// # Errors
    ///
    /// - [`InsightIqError::Submission`] if the export cannot be started.
    /// - [`InsightIqError::Poll`] on any failed page fetch.
    /// - [`InsightIqError::JobFailed`] if the vendor reports `FAILED`.
    /// - [`InsightIqError::Timeout`] once the deadline passes; pages already
    ///   collected are dropped.
    pub async fn submit_and_wait(
        &self,
        params: &SearchParameters,
    ) -> Result<Vec<RawProfile>, InsightIqError> {
        let started = self.clock.now();
        let export_id = self.start_export(params).await?;
        info!(
            export_id = %export_id,
            platform_id = params.work_platform_id,
            max_results = params.max_results,
            "search export submitted"
        );

        let limit = self.policy.page_size;
        let mut profiles: Vec<RawProfile> = Vec::new();
        let mut step = Step::Fetch { offset: 0 };

        loop {
            step = match step {
                Step::Done => break,
                Step::Wait { offset } => {
                    self.clock.sleep(self.policy.interval).await;
                    Step::Fetch { offset }
                }
                Step::Fetch { offset } => {
                    let elapsed = self.clock.now().saturating_duration_since(started);
                    if elapsed > self.policy.deadline {
                        warn!(
                            export_id = %export_id,
                            elapsed_secs = elapsed.as_secs(),
                            discarded = profiles.len(),
                            "search export deadline exceeded"
                        );
                        return Err(InsightIqError::Timeout {
                            elapsed_secs: elapsed.as_secs(),
                            limit_secs: self.policy.deadline.as_secs(),
                        });
                    }

                    let page = self.fetch_page(&export_id, offset, limit).await?;
                    match page.into_state() {
                        PageState::InProgress => {
                            debug!(export_id = %export_id, offset, "export still in progress");
                            Step::Wait { offset }
                        }
                        PageState::Failed(message) => {
                            return Err(InsightIqError::JobFailed(message));
                        }
                        PageState::Ready {
                            profiles: batch,
                            total_results,
                        } => {
                            let fetched = batch.len();
                            profiles.extend(batch);
                            debug!(
                                export_id = %export_id,
                                offset,
                                fetched,
                                total_results,
                                "fetched export page"
                            );
                            if fetched == 0 || offset + limit >= total_results {
                                Step::Done
                            } else {
                                Step::Fetch {
                                    offset: offset + limit,
                                }
                            }
                        }
                    }
                }
            };
        }

        info!(
            export_id = %export_id,
            profiles = profiles.len(),
            "search export complete"
        );
        Ok(profiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_matches_vendor_limits() {
        let policy = PollPolicy::default();
        assert_eq!(policy.interval, Duration::from_secs(60));
        assert_eq!(policy.deadline, Duration::from_secs(600));
        assert_eq!(policy.page_size, 100);
    }
}
