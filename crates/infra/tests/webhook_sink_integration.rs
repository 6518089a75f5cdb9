//! HTTP integration coverage for the webhook notification sink.

use chrono::Utc;
use rollcall_core::reminder::ports::NotificationSink;
use rollcall_domain::RollcallError;
use rollcall_infra::notifications::WebhookNotificationSink;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn delivers_reminder_payload_to_the_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hooks/reminders"))
        .and(body_partial_json(serde_json::json!({
            "type": "appointment_reminder",
            "user_id": "alice",
            "appointment_id": 7,
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let sink = WebhookNotificationSink::new(format!("{}/hooks/reminders", server.uri()));
    sink.send_reminder("alice", 7, "choir practice", Utc::now())
        .await
        .expect("delivery succeeds");
}

#[tokio::test]
async fn non_success_status_surfaces_as_notification_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let sink = WebhookNotificationSink::new(server.uri());
    let result = sink.send_reminder("alice", 7, "choir practice", Utc::now()).await;
    assert!(matches!(result, Err(RollcallError::Notification(_))));
}

#[tokio::test]
async fn unreachable_endpoint_surfaces_as_notification_error() {
    // nothing listens on this port
    let sink = WebhookNotificationSink::new("http://127.0.0.1:9/hooks");
    let result = sink.send_reminder("alice", 7, "choir practice", Utc::now()).await;
    assert!(matches!(result, Err(RollcallError::Notification(_))));
}
