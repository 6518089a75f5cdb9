//! Streak engine service - core business logic

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rollcall_domain::{
    AttendanceOutcome, AttendanceResponse, LeaderboardEntry, RebuildFailure, RebuildReport, Result,
    Streak,
};
use tracing::{debug, info, instrument, warn};

use super::classifier::classify;
use super::ports::{AppointmentReader, ResponseReader, StreakStore};
use crate::visibility::ports::DirectoryPort;
use crate::visibility::VisibilityService;

/// Computes and caches per-user attendance streaks.
pub struct StreakService {
    appointments: Arc<dyn AppointmentReader>,
    responses: Arc<dyn ResponseReader>,
    streaks: Arc<dyn StreakStore>,
    directory: Arc<dyn DirectoryPort>,
    visibility: Arc<VisibilityService>,
}

impl StreakService {
    /// Create a new streak service
    pub fn new(
        appointments: Arc<dyn AppointmentReader>,
        responses: Arc<dyn ResponseReader>,
        streaks: Arc<dyn StreakStore>,
        directory: Arc<dyn DirectoryPort>,
        visibility: Arc<VisibilityService>,
    ) -> Self {
        Self { appointments, responses, streaks, directory, visibility }
    }

    /// Replay the user's full eligible history and overwrite their cached
    /// streak row.
    ///
    /// Appointments the user was not a target attendee of are skipped
    /// entirely: they neither break nor extend the streak and count toward
    /// no statistic. Running this twice against unchanged data produces
    /// the same aggregate, only `calculated_at` moves.
    #[instrument(skip(self))]
    pub async fn recalculate(&self, user_id: &str, now: DateTime<Utc>) -> Result<Streak> {
        let mut history = self.appointments.find_past(now).await?;
        // Storage order is not chronological order; the walk below depends
        // on strictly ascending start times.
        history.sort_by_key(|appointment| appointment.start);

        let mut eligible = Vec::with_capacity(history.len());
        for appointment in history {
            if self.visibility.is_target_attendee(&appointment, user_id).await? {
                eligible.push(appointment);
            }
        }

        // One batched existence query for the per-appointment check-in flag
        let ids: Vec<i64> = eligible.iter().map(|appointment| appointment.id).collect();
        let checked_in = self.responses.appointments_with_checkins(&ids).await?;

        let responses = self.responses.find_by_user(user_id).await?;
        let by_appointment: HashMap<i64, &AttendanceResponse> =
            responses.iter().map(|response| (response.appointment_id, response)).collect();

        let mut streak = Streak::empty(user_id, now);
        for appointment in &eligible {
            let response = by_appointment.get(&appointment.id);
            let outcome = classify(
                response.and_then(|r| r.rsvp),
                checked_in.contains(&appointment.id),
                response.and_then(|r| r.checkin),
            );
            match outcome {
                AttendanceOutcome::Attend => {
                    if streak.current == 0 {
                        streak.current_started_on = Some(appointment.start);
                    }
                    streak.current += 1;
                    if streak.current > streak.longest {
                        streak.longest = streak.current;
                        streak.longest_achieved_on = Some(appointment.start);
                    }
                }
                AttendanceOutcome::Skip => {}
                AttendanceOutcome::Break => {
                    streak.current = 0;
                    streak.current_started_on = None;
                }
            }
        }

        self.streaks.upsert(&streak).await?;
        debug!(
            user_id,
            current = streak.current,
            longest = streak.longest,
            eligible = eligible.len(),
            "streak recalculated"
        );
        Ok(streak)
    }

    /// Administrative full rebuild across every directory user.
    ///
    /// Per-user failures are collected into the report and never abort the
    /// batch.
    #[instrument(skip(self))]
    pub async fn recalculate_all(&self, now: DateTime<Utc>) -> Result<RebuildReport> {
        let users = self.directory.list_all_users(None).await?;
        let mut report = RebuildReport::default();

        for user in users {
            match self.recalculate(&user.id, now).await {
                Ok(_) => report.recalculated += 1,
                Err(error) => {
                    warn!(
                        user_id = %user.id,
                        error = ?error,
                        "streak recalculation failed, continuing rebuild"
                    );
                    report.failures.push(RebuildFailure { user_id: user.id, error });
                }
            }
        }

        info!(
            recalculated = report.recalculated,
            failures = report.failures.len(),
            "streak rebuild completed"
        );
        Ok(report)
    }

    /// Cached streak row for a user; a fresh zero-valued row when none has
    /// been computed yet. Never recalculates.
    pub async fn streak_of(&self, user_id: &str, now: DateTime<Utc>) -> Result<Streak> {
        Ok(self.streaks.find(user_id).await?.unwrap_or_else(|| Streak::empty(user_id, now)))
    }

    /// Leaderboard of the highest current streaks, enriched with display
    /// names. Users the directory no longer resolves are skipped.
    pub async fn top_streaks(&self, limit: usize) -> Result<Vec<LeaderboardEntry>> {
        let rows = self.streaks.top(limit).await?;
        let mut entries = Vec::with_capacity(rows.len());

        for row in rows {
            let Some(user) = self.directory.get_user(&row.user_id).await? else {
                debug!(user_id = %row.user_id, "leaderboard row skipped, user left the directory");
                continue;
            };
            let level = row.level();
            entries.push(LeaderboardEntry {
                user_id: row.user_id,
                display_name: user.display_name,
                current: row.current,
                longest: row.longest,
                level,
            });
        }

        Ok(entries)
    }
}
