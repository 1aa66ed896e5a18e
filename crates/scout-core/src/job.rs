//! Discovery job lifecycle types.
//!
//! A job moves `queued → discovering → importing → completed`, or to `failed`
//! from any non-terminal state. [`JobRecord`] is the JSON document kept in the
//! status store; [`JobUpdate`] carries the fields merged on each transition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::filters::FilterSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Discovering,
    Importing,
    Completed,
    Failed,
}

impl JobStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Discovering => "discovering",
            JobStatus::Importing => "importing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub job_id: String,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<FilterSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profiles_found: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_contacts_created: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicates_skipped: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl JobRecord {
    /// A bare record for a job id that has no stored state yet.
    #[must_use]
    pub fn new(job_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            job_id: job_id.to_string(),
            status: JobStatus::Queued,
            filters: None,
            profiles_found: None,
            new_contacts_created: None,
            duplicates_skipped: None,
            error: None,
            updated_at: now,
        }
    }

    /// Overwrites the status, merges every field present in `update`, and
    /// stamps `updated_at`. Fields absent from `update` keep their value.
    pub fn apply(&mut self, status: JobStatus, update: JobUpdate, now: DateTime<Utc>) {
        self.status = status;
        if let Some(filters) = update.filters {
            self.filters = Some(filters);
        }
        if let Some(found) = update.profiles_found {
            self.profiles_found = Some(found);
        }
        if let Some(created) = update.new_contacts_created {
            self.new_contacts_created = Some(created);
        }
        if let Some(skipped) = update.duplicates_skipped {
            self.duplicates_skipped = Some(skipped);
        }
        if let Some(error) = update.error {
            self.error = Some(error);
        }
        self.updated_at = now;
    }
}

/// Optional fields merged into a [`JobRecord`] alongside a status change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobUpdate {
    pub filters: Option<FilterSpec>,
    pub profiles_found: Option<usize>,
    pub new_contacts_created: Option<usize>,
    pub duplicates_skipped: Option<usize>,
    pub error: Option<String>,
}

impl JobUpdate {
    #[must_use]
    pub fn filters(mut self, filters: FilterSpec) -> Self {
        self.filters = Some(filters);
        self
    }

    #[must_use]
    pub fn profiles_found(mut self, count: usize) -> Self {
        self.profiles_found = Some(count);
        self
    }

    #[must_use]
    pub fn import_counts(mut self, result: BatchResult) -> Self {
        self.new_contacts_created = Some(result.created);
        self.duplicates_skipped = Some(result.skipped);
        self
    }

    #[must_use]
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }
}

/// Running CRM import counters. `skipped` covers duplicates and per-record
/// validation rejections alike.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub created: usize,
    pub skipped: usize,
}

impl BatchResult {
    #[must_use]
    pub fn total(&self) -> usize {
        self.created + self.skipped
    }
}

impl std::ops::AddAssign for BatchResult {
    fn add_assign(&mut self, rhs: Self) {
        self.created += rhs.created;
        self.skipped += rhs.skipped;
    }
}

/// Synchronous result of a completed discovery run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoverySummary {
    pub status: JobStatus,
    pub profiles_found: usize,
    pub new_contacts: usize,
    pub duplicates: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_overwrites_status_and_merges_fields() {
        let now = Utc::now();
        let mut record = JobRecord::new("job-1", now);
        record.apply(
            JobStatus::Importing,
            JobUpdate::default().profiles_found(42),
            now,
        );
        record.apply(
            JobStatus::Completed,
            JobUpdate::default().import_counts(BatchResult {
                created: 40,
                skipped: 2,
            }),
            now,
        );

        assert_eq!(record.status, JobStatus::Completed);
        assert_eq!(record.profiles_found, Some(42));
        assert_eq!(record.new_contacts_created, Some(40));
        assert_eq!(record.duplicates_skipped, Some(2));
        assert!(record.error.is_none());
    }

    #[test]
    fn job_record_round_trips_through_json() {
        let mut record = JobRecord::new("job-2", Utc::now());
        record.apply(
            JobStatus::Failed,
            JobUpdate::default().error("Job timeout after 600 seconds"),
            Utc::now(),
        );
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"status\":\"failed\""));
        assert!(!json.contains("profiles_found"));
        let back: JobRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn terminal_states() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Discovering.is_terminal());
        assert!(!JobStatus::Importing.is_terminal());
    }

    #[test]
    fn batch_results_accumulate() {
        let mut total = BatchResult::default();
        total += BatchResult {
            created: 100,
            skipped: 0,
        };
        total += BatchResult {
            created: 90,
            skipped: 10,
        };
        assert_eq!(total.created, 190);
        assert_eq!(total.skipped, 10);
        assert_eq!(total.total(), 200);
    }
}
