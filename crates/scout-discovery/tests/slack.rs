//! Slack webhook notifier tests using wiremock.

use scout_core::{DiscoverySummary, JobStatus, Platform};
use scout_discovery::{FailureReport, JobReport, Notifier, NotifyError, SlackNotifier, Stage};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn posted_body(server: &MockServer) -> serde_json::Value {
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    serde_json::from_slice(&requests[0].body).unwrap()
}

#[tokio::test]
async fn completion_message_is_posted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = SlackNotifier::new(format!("{}/hook", server.uri())).unwrap();
    notifier
        .job_completed(&JobReport {
            job_id: "job-9".to_string(),
            platform: Platform::Instagram,
            summary: DiscoverySummary {
                status: JobStatus::Completed,
                profiles_found: 250,
                new_contacts: 240,
                duplicates: 10,
            },
        })
        .await
        .expect("webhook accepted the message");

    let body = posted_body(&server).await;
    assert_eq!(body["text"], "Creator discovery completed: Instagram");
    let rendered = body.to_string();
    assert!(rendered.contains("*Found:* 250"));
    assert!(rendered.contains("*Created:* 240"));
    assert!(rendered.contains("*Dupes Skipped:* 10"));
    assert!(rendered.contains("job-9"));
}

#[tokio::test]
async fn failure_message_includes_stage_and_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let notifier = SlackNotifier::new(format!("{}/hook", server.uri())).unwrap();
    notifier
        .job_failed(&FailureReport {
            job_id: "job-10".to_string(),
            platform: Platform::Tiktok,
            stage: Stage::Discovery,
            profiles_found: 0,
            error: "search export timed out after 660 seconds (limit 600s)".to_string(),
        })
        .await
        .unwrap();

    let body = posted_body(&server).await;
    assert_eq!(body["text"], "Creator discovery FAILED: TikTok");
    let rendered = body.to_string();
    assert!(rendered.contains("*Stage:* discovery"));
    assert!(rendered.contains("*Found so far:* 0"));
    assert!(rendered.contains("timed out after 660 seconds"));
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("invalid_token"))
        .mount(&server)
        .await;

    let notifier = SlackNotifier::new(server.uri()).unwrap();
    let err = notifier
        .job_failed(&FailureReport {
            job_id: "job-11".to_string(),
            platform: Platform::Youtube,
            stage: Stage::Import,
            profiles_found: 12,
            error: String::new(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, NotifyError::Status(403)), "{err:?}");
}
