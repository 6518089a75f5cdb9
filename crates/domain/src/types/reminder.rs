//! Reminder log and batch report types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record that a reminder notification was sent.
///
/// Append-only; multiple rows per (appointment, user) pair accumulate over
/// time, one per reminder actually sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderLog {
    pub appointment_id: i64,
    pub user_id: String,
    pub sent_at: DateTime<Utc>,
}

/// Summary of one reminder batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderRunReport {
    pub appointments_scanned: usize,
    pub reminders_sent: usize,
    /// Users excluded because they already submitted an RSVP
    pub skipped_responded: usize,
    /// Users excluded by the cool-down policy
    pub skipped_throttled: usize,
    /// Notification dispatches that failed and were skipped
    pub failures: usize,
}
