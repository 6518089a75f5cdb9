//! # Rollcall Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - SQLite-backed repositories (appointments, responses, reminders,
//!   streaks, directory)
//! - The cron-driven daily reminder scheduler
//! - Notification sink adapters
//!
//! ## Architecture
//! - Implements traits defined in `rollcall-core`
//! - Depends on `rollcall-domain` and `rollcall-core`
//! - Contains all "impure" code (I/O, HTTP, scheduling)

pub mod database;
pub mod errors;
pub mod notifications;
pub mod scheduling;

// Re-export commonly used items
pub use database::{
    DbManager, SqliteAppointmentRepository, SqliteDirectoryRepository,
    SqliteReminderLogRepository, SqliteResponseRepository, SqliteStreakRepository,
};
pub use notifications::{LoggingNotificationSink, WebhookNotificationSink};
pub use scheduling::{ReminderScheduler, ReminderSchedulerConfig, SchedulerError, SchedulerResult};
