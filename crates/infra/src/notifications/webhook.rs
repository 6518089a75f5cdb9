//! Webhook-based implementation of the NotificationSink port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rollcall_core::reminder::ports::NotificationSink;
use rollcall_domain::{Result, RollcallError};
use serde_json::json;
use tracing::{debug, instrument};

use crate::errors::InfraError;

/// Posts reminder payloads to a host-provided webhook endpoint.
pub struct WebhookNotificationSink {
    client: reqwest::Client,
    endpoint: String,
}

impl WebhookNotificationSink {
    /// Create a sink posting to the given endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { client: reqwest::Client::new(), endpoint: endpoint.into() }
    }

    /// Use a preconfigured client (custom timeouts, proxies).
    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self { client, endpoint: endpoint.into() }
    }
}

#[async_trait]
impl NotificationSink for WebhookNotificationSink {
    #[instrument(skip(self, appointment_name, starts_at))]
    async fn send_reminder(
        &self,
        user_id: &str,
        appointment_id: i64,
        appointment_name: &str,
        starts_at: DateTime<Utc>,
    ) -> Result<()> {
        let payload = json!({
            "type": "appointment_reminder",
            "user_id": user_id,
            "appointment_id": appointment_id,
            "appointment_name": appointment_name,
            "starts_at": starts_at.to_rfc3339(),
        });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(InfraError::from)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RollcallError::Notification(format!(
                "webhook returned {status} for user {user_id}"
            )));
        }

        debug!(user_id, appointment_id, "reminder delivered");
        Ok(())
    }
}
