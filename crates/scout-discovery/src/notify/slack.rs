use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::warn;

use super::backend::{FailureReport, JobReport, Notifier, NotifyError};

/// Slack incoming-webhook notifier.
pub struct SlackNotifier {
    webhook_url: String,
    http: reqwest::Client,
}

impl std::fmt::Debug for SlackNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackNotifier")
            .field("webhook_url", &"[redacted]")
            .finish_non_exhaustive()
    }
}

impl SlackNotifier {
    /// # Errors
    ///
    /// Returns [`NotifyError::Client`] if the `reqwest::Client` cannot be
    /// constructed.
    pub fn new(webhook_url: impl Into<String>) -> Result<Self, NotifyError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            webhook_url: webhook_url.into(),
            http,
        })
    }

    async fn post(&self, payload: &Value) -> Result<(), NotifyError> {
        let resp = self.http.post(&self.webhook_url).json(payload).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "slack webhook returned non-success");
            return Err(NotifyError::Status(status.as_u16()));
        }
        Ok(())
    }
}

fn field(label: &str, value: impl std::fmt::Display) -> Value {
    json!({ "type": "mrkdwn", "text": format!("*{label}:* {value}") })
}

fn completed_payload(report: &JobReport) -> Value {
    let title = format!(
        "Creator discovery completed: {}",
        report.platform.display_name()
    );
    json!({
        "text": title,
        "blocks": [
            { "type": "header", "text": { "type": "plain_text", "text": title } },
            {
                "type": "section",
                "fields": [
                    field("Found", report.summary.profiles_found),
                    field("Created", report.summary.new_contacts),
                    field("Dupes Skipped", report.summary.duplicates),
                ]
            },
            {
                "type": "context",
                "elements": [{ "type": "mrkdwn", "text": format!("Job `{}`", report.job_id) }]
            }
        ]
    })
}

fn failed_payload(report: &FailureReport) -> Value {
    let title = format!(
        "Creator discovery FAILED: {}",
        report.platform.display_name()
    );
    let mut blocks = vec![
        json!({ "type": "header", "text": { "type": "plain_text", "text": title } }),
        json!({
            "type": "section",
            "fields": [
                field("Stage", report.stage),
                field("Found so far", report.profiles_found),
            ]
        }),
    ];
    if !report.error.is_empty() {
        blocks.push(json!({
            "type": "section",
            "text": { "type": "mrkdwn", "text": format!("*Error:* ```{}```", report.error) }
        }));
    }
    blocks.push(json!({
        "type": "context",
        "elements": [{ "type": "mrkdwn", "text": format!("Job `{}`", report.job_id) }]
    }));
    json!({ "text": title, "blocks": blocks })
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn job_completed(&self, report: &JobReport) -> Result<(), NotifyError> {
        self.post(&completed_payload(report)).await
    }

    async fn job_failed(&self, report: &FailureReport) -> Result<(), NotifyError> {
        self.post(&failed_payload(report)).await
    }
}
