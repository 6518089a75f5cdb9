//! SQLite persistence adapters
//!
//! Every stored timestamp is encoded as unix seconds; audience lists are
//! stored as JSON arrays and decoded exactly once, here at the boundary.

pub mod appointment_repository;
pub mod directory_repository;
pub mod manager;
pub mod reminder_log_repository;
pub mod response_repository;
pub mod streak_repository;

pub use appointment_repository::SqliteAppointmentRepository;
pub use directory_repository::SqliteDirectoryRepository;
pub use manager::DbManager;
pub use reminder_log_repository::SqliteReminderLogRepository;
pub use response_repository::SqliteResponseRepository;
pub use streak_repository::SqliteStreakRepository;

use chrono::{DateTime, Utc};
use rollcall_domain::{Result, RollcallError};

pub(crate) fn to_ts(at: DateTime<Utc>) -> i64 {
    at.timestamp()
}

pub(crate) fn from_ts(ts: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
        .ok_or_else(|| RollcallError::Database(format!("invalid stored timestamp {ts}")))
}

pub(crate) fn from_opt_ts(ts: Option<i64>) -> Result<Option<DateTime<Utc>>> {
    ts.map(from_ts).transpose()
}
