//! # Rollcall Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for storage, directory, and
//!   notification collaborators
//! - The visibility resolver, streak engine, attendance response service,
//!   and reminder policy
//!
//! ## Architecture Principles
//! - Only depends on `rollcall-domain`
//! - No database, HTTP, or host-platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod attendance;
pub mod reminder;
pub mod streak;
pub mod visibility;

// Re-export specific items to avoid ambiguity
pub use attendance::ports::ResponseWriter;
pub use attendance::{AttendanceService, RosterEntry};
pub use reminder::ports::{NotificationSink, ReminderLogStore};
pub use reminder::ReminderService;
pub use streak::classifier::classify;
pub use streak::ports::{AppointmentReader, ResponseReader, StreakStore};
pub use streak::StreakService;
pub use visibility::ports::DirectoryPort;
pub use visibility::VisibilityService;
