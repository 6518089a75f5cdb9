//! Attendance response service - core business logic

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rollcall_domain::{AttendanceResponse, Result, RollcallError, Rsvp};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::ports::ResponseWriter;
use crate::streak::ports::{AppointmentReader, ResponseReader};
use crate::visibility::ports::DirectoryPort;
use crate::visibility::VisibilityService;

/// One line of the check-in roster for an appointment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub user_id: String,
    pub display_name: String,
    pub rsvp: Option<Rsvp>,
    pub checkin: Option<Rsvp>,
}

/// Records RSVPs and operator check-ins.
pub struct AttendanceService {
    appointments: Arc<dyn AppointmentReader>,
    reader: Arc<dyn ResponseReader>,
    writer: Arc<dyn ResponseWriter>,
    directory: Arc<dyn DirectoryPort>,
    visibility: Arc<VisibilityService>,
}

impl AttendanceService {
    /// Create a new attendance service
    pub fn new(
        appointments: Arc<dyn AppointmentReader>,
        reader: Arc<dyn ResponseReader>,
        writer: Arc<dyn ResponseWriter>,
        directory: Arc<dyn DirectoryPort>,
        visibility: Arc<VisibilityService>,
    ) -> Self {
        Self { appointments, reader, writer, directory, visibility }
    }

    /// Record a user's RSVP for an appointment.
    ///
    /// Only target attendees may respond; holders of the manage permission
    /// are not granted a bypass here, so administrative visibility never
    /// leaks into attendance data.
    #[instrument(skip(self, comment))]
    pub async fn submit_rsvp(
        &self,
        appointment_id: i64,
        user_id: &str,
        rsvp: Rsvp,
        comment: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<AttendanceResponse> {
        let appointment = self.require_appointment(appointment_id).await?;
        if !self.visibility.is_target_attendee(&appointment, user_id).await? {
            return Err(RollcallError::InvalidInput(format!(
                "user {user_id} is not a target attendee of appointment {appointment_id}"
            )));
        }

        let existing = self.writer.find(appointment_id, user_id).await?;
        let is_new = existing.is_none();
        let mut response =
            existing.unwrap_or_else(|| AttendanceResponse::new(appointment_id, user_id));

        response.rsvp = Some(rsvp);
        response.comment = comment;
        response.responded_at = Some(now);

        if is_new {
            self.writer.insert(&response).await?;
        } else {
            self.writer.update(&response).await?;
        }
        debug!(appointment_id, user_id, rsvp = rsvp.as_str(), "rsvp recorded");
        Ok(response)
    }

    /// Record an operator check-in for a user at an appointment.
    ///
    /// The operator needs the manage permission; the checked-in user must
    /// be a target attendee. RSVP fields on the row are left untouched.
    #[instrument(skip(self, comment))]
    pub async fn record_checkin(
        &self,
        appointment_id: i64,
        user_id: &str,
        state: Rsvp,
        comment: Option<String>,
        operator_id: &str,
        now: DateTime<Utc>,
    ) -> Result<AttendanceResponse> {
        if !self.directory.has_manage_permission(operator_id).await? {
            return Err(RollcallError::InvalidInput(format!(
                "user {operator_id} may not perform check-ins"
            )));
        }

        let appointment = self.require_appointment(appointment_id).await?;
        if !self.visibility.is_target_attendee(&appointment, user_id).await? {
            return Err(RollcallError::InvalidInput(format!(
                "user {user_id} is not a target attendee of appointment {appointment_id}"
            )));
        }

        let existing = self.writer.find(appointment_id, user_id).await?;
        let is_new = existing.is_none();
        let mut response =
            existing.unwrap_or_else(|| AttendanceResponse::new(appointment_id, user_id));

        response.checkin = Some(state);
        response.checkin_comment = comment;
        response.checked_in_by = Some(operator_id.to_string());
        response.checked_in_at = Some(now);

        if is_new {
            self.writer.insert(&response).await?;
        } else {
            self.writer.update(&response).await?;
        }
        debug!(appointment_id, user_id, operator_id, state = state.as_str(), "check-in recorded");
        Ok(response)
    }

    /// The check-in roster: every target attendee with their current RSVP
    /// and check-in state, sorted by display name.
    ///
    /// Built from true target-attendee semantics; managers outside the
    /// audience never appear, and neither do users the directory no longer
    /// resolves.
    pub async fn roster(&self, appointment_id: i64) -> Result<Vec<RosterEntry>> {
        let appointment = self.require_appointment(appointment_id).await?;
        let targets = self.visibility.expand_audience(&appointment).await?;

        let responses = self.reader.find_by_appointment(appointment_id).await?;
        let by_user: HashMap<&str, &AttendanceResponse> =
            responses.iter().map(|response| (response.user_id.as_str(), response)).collect();

        let mut roster = Vec::with_capacity(targets.len());
        for user_id in &targets {
            let Some(user) = self.directory.get_user(user_id).await? else {
                continue;
            };
            let response = by_user.get(user_id.as_str());
            roster.push(RosterEntry {
                user_id: user_id.clone(),
                display_name: user.display_name,
                rsvp: response.and_then(|r| r.rsvp),
                checkin: response.and_then(|r| r.checkin),
            });
        }
        roster.sort_by(|a, b| {
            a.display_name.cmp(&b.display_name).then_with(|| a.user_id.cmp(&b.user_id))
        });
        Ok(roster)
    }

    async fn require_appointment(
        &self,
        appointment_id: i64,
    ) -> Result<rollcall_domain::Appointment> {
        self.appointments
            .find(appointment_id)
            .await?
            .ok_or_else(|| RollcallError::NotFound(format!("appointment {appointment_id}")))
    }
}
