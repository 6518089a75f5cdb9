//! Reminder policy service - core business logic

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use rollcall_domain::{ReminderConfig, ReminderLog, ReminderRunReport, Result};
use tracing::{debug, info, instrument, warn};

use super::ports::{NotificationSink, ReminderLogStore};
use crate::streak::ports::{AppointmentReader, ResponseReader};
use crate::visibility::VisibilityService;

/// Scans upcoming appointments and reminds unresponsive target attendees.
pub struct ReminderService {
    appointments: Arc<dyn AppointmentReader>,
    responses: Arc<dyn ResponseReader>,
    log: Arc<dyn ReminderLogStore>,
    sink: Arc<dyn NotificationSink>,
    visibility: Arc<VisibilityService>,
    config: ReminderConfig,
}

impl ReminderService {
    /// Create a new reminder service
    pub fn new(
        appointments: Arc<dyn AppointmentReader>,
        responses: Arc<dyn ResponseReader>,
        log: Arc<dyn ReminderLogStore>,
        sink: Arc<dyn NotificationSink>,
        visibility: Arc<VisibilityService>,
        config: ReminderConfig,
    ) -> Self {
        Self { appointments, responses, log, sink, visibility, config }
    }

    /// Execute one reminder batch.
    ///
    /// Users who submitted any RSVP, even a decline, are excluded: they
    /// already engaged. Within the cool-down window the reminder-log
    /// lookup makes a second run a no-op, so overlapping runs never
    /// double-notify. A sink failure for one user is logged and skipped;
    /// it never aborts the remaining users or appointments.
    #[instrument(skip(self))]
    pub async fn run_once(&self, now: DateTime<Utc>) -> Result<ReminderRunReport> {
        if !self.config.enabled {
            debug!("reminders disabled, skipping run");
            return Ok(ReminderRunReport::default());
        }
        self.config.validate()?;

        let window_start = Utc.from_utc_datetime(&now.date_naive().and_time(NaiveTime::MIN));
        let window_end = window_start + Duration::days(i64::from(self.config.lookahead_days) + 1)
            - Duration::seconds(1);

        let appointments = self.appointments.find_between(window_start, window_end).await?;
        let mut report =
            ReminderRunReport { appointments_scanned: appointments.len(), ..Default::default() };

        for appointment in &appointments {
            // Any RSVP at all suppresses further reminders for this pair
            let responded: HashSet<String> = self
                .responses
                .find_by_appointment(appointment.id)
                .await?
                .into_iter()
                .filter(rollcall_domain::AttendanceResponse::has_rsvp)
                .map(|response| response.user_id)
                .collect();

            let targets = self.visibility.expand_audience(appointment).await?;
            let last_sent = self.latest_reminders(appointment.id).await?;

            for user_id in targets {
                if responded.contains(&user_id) {
                    report.skipped_responded += 1;
                    continue;
                }
                if let Some(sent_at) = last_sent.get(&user_id) {
                    if !self.cooldown_elapsed(*sent_at, now) {
                        report.skipped_throttled += 1;
                        continue;
                    }
                }

                match self
                    .sink
                    .send_reminder(&user_id, appointment.id, &appointment.name, appointment.start)
                    .await
                {
                    Ok(()) => {
                        self.log
                            .append(&ReminderLog {
                                appointment_id: appointment.id,
                                user_id: user_id.clone(),
                                sent_at: now,
                            })
                            .await?;
                        report.reminders_sent += 1;
                    }
                    Err(error) => {
                        warn!(
                            user_id = %user_id,
                            appointment_id = appointment.id,
                            error = ?error,
                            "reminder dispatch failed, skipping user"
                        );
                        report.failures += 1;
                    }
                }
            }
        }

        info!(
            appointments = report.appointments_scanned,
            sent = report.reminders_sent,
            responded = report.skipped_responded,
            throttled = report.skipped_throttled,
            failures = report.failures,
            "reminder batch completed"
        );
        Ok(report)
    }

    /// One batched fetch of the appointment's log, reduced to the latest
    /// entry per user.
    async fn latest_reminders(
        &self,
        appointment_id: i64,
    ) -> Result<HashMap<String, DateTime<Utc>>> {
        let mut latest: HashMap<String, DateTime<Utc>> = HashMap::new();
        for log in self.log.find_for_appointment(appointment_id).await? {
            latest
                .entry(log.user_id)
                .and_modify(|at| {
                    if log.sent_at > *at {
                        *at = log.sent_at;
                    }
                })
                .or_insert(log.sent_at);
        }
        Ok(latest)
    }

    /// Whether a user already reminded at `sent_at` is due again.
    ///
    /// Frequency zero means remind at most once ever per appointment.
    /// Otherwise re-remind once the whole-day difference reaches the
    /// configured frequency.
    fn cooldown_elapsed(&self, sent_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        if self.config.frequency_days == 0 {
            return false;
        }
        (now - sent_at).num_days() >= i64::from(self.config.frequency_days)
    }
}
