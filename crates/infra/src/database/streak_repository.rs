//! SQLite-backed implementation of the StreakStore port.

use std::sync::Arc;

use async_trait::async_trait;
use rollcall_core::streak::ports::StreakStore;
use rollcall_domain::{Result, Streak};
use rusqlite::{OptionalExtension, Row};
use tracing::instrument;

use super::manager::DbManager;
use super::{from_opt_ts, from_ts, to_ts};
use crate::errors::InfraError;

const COLUMNS: &str =
    "user_id, current_streak, longest_streak, current_started_on, longest_achieved_on, \
     calculated_at";

/// SQLite implementation of StreakStore.
pub struct SqliteStreakRepository {
    manager: Arc<DbManager>,
}

struct RawStreak {
    user_id: String,
    current: u32,
    longest: u32,
    current_started_on: Option<i64>,
    longest_achieved_on: Option<i64>,
    calculated_at: i64,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<RawStreak> {
    Ok(RawStreak {
        user_id: row.get(0)?,
        current: row.get(1)?,
        longest: row.get(2)?,
        current_started_on: row.get(3)?,
        longest_achieved_on: row.get(4)?,
        calculated_at: row.get(5)?,
    })
}

fn into_streak(raw: RawStreak) -> Result<Streak> {
    Ok(Streak {
        user_id: raw.user_id,
        current: raw.current,
        longest: raw.longest,
        current_started_on: from_opt_ts(raw.current_started_on)?,
        longest_achieved_on: from_opt_ts(raw.longest_achieved_on)?,
        calculated_at: from_ts(raw.calculated_at)?,
    })
}

impl SqliteStreakRepository {
    /// Create a new streak repository
    pub fn new(manager: Arc<DbManager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl StreakStore for SqliteStreakRepository {
    #[instrument(skip(self))]
    async fn find(&self, user_id: &str) -> Result<Option<Streak>> {
        let conn = self.manager.get_connection()?;
        let raw = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM streaks WHERE user_id = ?1"),
                [user_id],
                read_row,
            )
            .optional()
            .map_err(InfraError::from)?;
        raw.map(into_streak).transpose()
    }

    #[instrument(skip(self, streak), fields(user_id = %streak.user_id))]
    async fn upsert(&self, streak: &Streak) -> Result<()> {
        let conn = self.manager.get_connection()?;
        conn.execute(
            "INSERT INTO streaks (
                user_id, current_streak, longest_streak,
                current_started_on, longest_achieved_on, calculated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(user_id) DO UPDATE SET
                current_streak = excluded.current_streak,
                longest_streak = excluded.longest_streak,
                current_started_on = excluded.current_started_on,
                longest_achieved_on = excluded.longest_achieved_on,
                calculated_at = excluded.calculated_at",
            rusqlite::params![
                streak.user_id,
                streak.current,
                streak.longest,
                streak.current_started_on.map(to_ts),
                streak.longest_achieved_on.map(to_ts),
                to_ts(streak.calculated_at),
            ],
        )
        .map_err(InfraError::from)?;
        Ok(())
    }

    /// Rows ordered by current streak descending; ties keep storage order,
    /// which the leaderboard documents as its tie-break.
    #[instrument(skip(self))]
    async fn top(&self, limit: usize) -> Result<Vec<Streak>> {
        let conn = self.manager.get_connection()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {COLUMNS} FROM streaks ORDER BY current_streak DESC LIMIT ?1"
            ))
            .map_err(InfraError::from)?;
        let rows = stmt
            .query_map([i64::try_from(limit).unwrap_or(i64::MAX)], read_row)
            .map_err(InfraError::from)?;

        let mut streaks = Vec::new();
        for raw in rows {
            streaks.push(into_streak(raw.map_err(InfraError::from)?)?);
        }
        Ok(streaks)
    }
}
