//! Fixture builders for appointments, responses, and directory data.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rollcall_domain::{Appointment, AttendanceResponse, AudienceSpec, Rsvp};

/// Fixed "now" shared by the behaviour tests: 2025-06-15 12:00:00 UTC.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).single().expect("fixture timestamp is valid")
}

/// A one-hour appointment starting `days_ago` days before [`now`].
pub fn past_appointment(id: i64, days_ago: i64, audience: AudienceSpec) -> Appointment {
    let start = now() - Duration::days(days_ago);
    Appointment {
        id,
        name: format!("appointment-{id}"),
        description: None,
        start,
        end: start + Duration::hours(1),
        created_by: "organizer".to_string(),
        active: true,
        audience,
    }
}

/// A one-hour appointment starting `days_ahead` days after [`now`].
pub fn upcoming_appointment(id: i64, days_ahead: i64, audience: AudienceSpec) -> Appointment {
    let start = now() + Duration::days(days_ahead);
    Appointment {
        id,
        name: format!("appointment-{id}"),
        description: None,
        start,
        end: start + Duration::hours(1),
        created_by: "organizer".to_string(),
        active: true,
        audience,
    }
}

/// An audience restricted to the given explicit users.
pub fn audience_of_users<const N: usize>(users: [&str; N]) -> AudienceSpec {
    AudienceSpec {
        users: users.iter().map(ToString::to_string).collect(),
        ..AudienceSpec::default()
    }
}

/// An audience restricted to the given groups.
pub fn audience_of_groups<const N: usize>(groups: [&str; N]) -> AudienceSpec {
    AudienceSpec {
        groups: groups.iter().map(ToString::to_string).collect(),
        ..AudienceSpec::default()
    }
}

/// A response row carrying only an RSVP.
pub fn rsvp_response(appointment_id: i64, user_id: &str, rsvp: Rsvp) -> AttendanceResponse {
    let mut response = AttendanceResponse::new(appointment_id, user_id);
    response.rsvp = Some(rsvp);
    response.responded_at = Some(now());
    response
}

/// A response row carrying an RSVP and an operator check-in.
pub fn checked_in_response(
    appointment_id: i64,
    user_id: &str,
    rsvp: Rsvp,
    checkin: Rsvp,
) -> AttendanceResponse {
    let mut response = rsvp_response(appointment_id, user_id, rsvp);
    response.checkin = Some(checkin);
    response.checked_in_by = Some("operator".to_string());
    response.checked_in_at = Some(now());
    response
}
