//! Attendance streak aggregates
//!
//! Streak rows are pre-computed per user and fully overwritten by each
//! recalculation; nothing here is incrementally patched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{
    STREAK_CONSISTENT_MIN, STREAK_ON_FIRE_MIN, STREAK_STARTING_MIN, STREAK_UNSTOPPABLE_MIN,
};
use crate::errors::RollcallError;

/// Per-user cached streak aggregate, one row per user.
///
/// `longest >= current` holds after every full recalculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Streak {
    pub user_id: String,
    /// Length of the unbroken run ending at the most recent attended
    /// appointment
    pub current: u32,
    /// Longest run ever observed for this user
    pub longest: u32,
    /// Start date of the appointment that began the current run
    pub current_started_on: Option<DateTime<Utc>>,
    /// Start date of the appointment that most recently pushed `longest`
    /// to a new maximum
    pub longest_achieved_on: Option<DateTime<Utc>>,
    pub calculated_at: DateTime<Utc>,
}

impl Streak {
    /// Zero-valued row for a user with no computed history yet.
    pub fn empty(user_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            current: 0,
            longest: 0,
            current_started_on: None,
            longest_achieved_on: None,
            calculated_at: now,
        }
    }

    /// Cosmetic band for the current streak, derived and never persisted.
    pub fn level(&self) -> StreakLevel {
        StreakLevel::for_count(self.current)
    }
}

/// Display band for a streak count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakLevel {
    None,
    Starting,
    Consistent,
    OnFire,
    Unstoppable,
}

impl StreakLevel {
    pub fn for_count(current: u32) -> Self {
        match current {
            _ if current >= STREAK_UNSTOPPABLE_MIN => Self::Unstoppable,
            _ if current >= STREAK_ON_FIRE_MIN => Self::OnFire,
            _ if current >= STREAK_CONSISTENT_MIN => Self::Consistent,
            _ if current >= STREAK_STARTING_MIN => Self::Starting,
            _ => Self::None,
        }
    }
}

/// One leaderboard row, enriched with the user's display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub display_name: String,
    pub current: u32,
    pub longest: u32,
    pub level: StreakLevel,
}

/// Result of an administrative full rebuild across all users.
///
/// Per-user failures are collected, never allowed to abort the batch.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RebuildReport {
    pub recalculated: usize,
    pub failures: Vec<RebuildFailure>,
}

/// A single user whose recalculation failed during a rebuild.
#[derive(Debug, Serialize, Deserialize)]
pub struct RebuildFailure {
    pub user_id: String,
    pub error: RollcallError,
}
