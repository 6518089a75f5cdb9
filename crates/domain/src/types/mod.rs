//! Domain types and models

pub mod appointment;
pub mod attendance;
pub mod reminder;
pub mod streak;
pub mod user;

// Re-export for convenience
pub use appointment::{Appointment, AppointmentDraft, AudienceSpec};
pub use attendance::{AttendanceOutcome, AttendanceResponse, Rsvp};
pub use reminder::{ReminderLog, ReminderRunReport};
pub use streak::{LeaderboardEntry, RebuildFailure, RebuildReport, Streak, StreakLevel};
pub use user::User;
