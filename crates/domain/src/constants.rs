//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Streak level bands (lower bound of each band, in consecutive attends)
pub const STREAK_STARTING_MIN: u32 = 1;
pub const STREAK_CONSISTENT_MIN: u32 = 5;
pub const STREAK_ON_FIRE_MIN: u32 = 10;
pub const STREAK_UNSTOPPABLE_MIN: u32 = 25;

// Reminder configuration bounds
pub const MIN_REMINDER_LOOKAHEAD_DAYS: u32 = 1;
pub const MAX_REMINDER_LOOKAHEAD_DAYS: u32 = 30;
pub const DEFAULT_REMINDER_LOOKAHEAD_DAYS: u32 = 7;

// Default schedule for the daily reminder batch (06:00 UTC)
pub const DEFAULT_REMINDER_CRON: &str = "0 0 6 * * *";

// Leaderboard defaults
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;
