//! Cron-based scheduling
//!
//! Wraps the core reminder policy in a daily cron job with explicit
//! lifecycle management.

pub mod error;
mod reminder_scheduler;

pub use error::{SchedulerError, SchedulerResult};
pub use reminder_scheduler::{ReminderScheduler, ReminderSchedulerConfig};
