//! Port interfaces for reminder delivery and bookkeeping

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rollcall_domain::{ReminderLog, Result};

/// Append-only storage for sent-reminder records.
#[async_trait]
pub trait ReminderLogStore: Send + Sync {
    /// Every log row for one appointment, across users and cycles.
    ///
    /// One batched fetch per appointment; the policy reduces the rows to
    /// the latest entry per user itself rather than querying per user.
    async fn find_for_appointment(&self, appointment_id: i64) -> Result<Vec<ReminderLog>>;

    /// Record that a reminder was sent
    async fn append(&self, log: &ReminderLog) -> Result<()>;
}

/// Fire-and-forget delivery of a reminder to one user.
///
/// Errors are per-user failures for the caller to log and skip; the sink
/// is never retried within a run.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send_reminder(
        &self,
        user_id: &str,
        appointment_id: i64,
        appointment_name: &str,
        starts_at: DateTime<Utc>,
    ) -> Result<()>;
}
