//! Notification sink adapters
//!
//! The host platform normally provides delivery; these adapters cover a
//! webhook-based host integration and a logging fallback for development.

mod webhook;

pub use webhook::WebhookNotificationSink;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rollcall_core::reminder::ports::NotificationSink;
use rollcall_domain::Result;
use tracing::info;

/// Sink that only logs, for development and dry runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNotificationSink;

#[async_trait]
impl NotificationSink for LoggingNotificationSink {
    async fn send_reminder(
        &self,
        user_id: &str,
        appointment_id: i64,
        appointment_name: &str,
        starts_at: DateTime<Utc>,
    ) -> Result<()> {
        info!(
            user_id,
            appointment_id,
            appointment_name,
            starts_at = %starts_at,
            "reminder (logging sink)"
        );
        Ok(())
    }
}
