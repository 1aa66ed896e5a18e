use async_trait::async_trait;

use super::backend::{FailureReport, JobReport, Notifier, NotifyError};

/// Used when no webhook is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn job_completed(&self, _report: &JobReport) -> Result<(), NotifyError> {
        Ok(())
    }

    async fn job_failed(&self, _report: &FailureReport) -> Result<(), NotifyError> {
        Ok(())
    }
}
