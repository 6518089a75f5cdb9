//! RSVP and check-in types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stated attendance value, used for both RSVPs and check-ins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rsvp {
    Yes,
    No,
    Maybe,
}

impl Rsvp {
    /// Lenient decode for long-lived stored data: unrecognized values map
    /// to `None` instead of failing the row.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "yes" => Some(Self::Yes),
            "no" => Some(Self::No),
            "maybe" => Some(Self::Maybe),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::Maybe => "maybe",
        }
    }
}

/// One user's RSVP and check-in state for one appointment.
///
/// At most one row exists per (appointment, user) pair; the storage layer
/// enforces uniqueness. The row is created on first RSVP or first check-in
/// and updated in place afterwards. Check-in fields are independent of the
/// RSVP fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceResponse {
    pub id: Uuid,
    pub appointment_id: i64,
    pub user_id: String,
    pub rsvp: Option<Rsvp>,
    pub comment: Option<String>,
    pub responded_at: Option<DateTime<Utc>>,
    pub checkin: Option<Rsvp>,
    pub checkin_comment: Option<String>,
    pub checked_in_by: Option<String>,
    pub checked_in_at: Option<DateTime<Utc>>,
}

impl AttendanceResponse {
    /// A blank row for a pair that has not responded or been checked in yet.
    pub fn new(appointment_id: i64, user_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            appointment_id,
            user_id: user_id.into(),
            rsvp: None,
            comment: None,
            responded_at: None,
            checkin: None,
            checkin_comment: None,
            checked_in_by: None,
            checked_in_at: None,
        }
    }

    /// True when the user submitted any RSVP at all, whatever its value.
    pub fn has_rsvp(&self) -> bool {
        self.rsvp.is_some()
    }

    /// True when an operator recorded any check-in state for this user.
    pub fn has_checkin(&self) -> bool {
        self.checkin.is_some()
    }
}

/// Outcome of classifying one (user, appointment) pair for streak purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceOutcome {
    /// Extends the current streak
    Attend,
    /// Excused absence; neither extends nor breaks
    Skip,
    /// Resets the current streak to zero
    Break,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_known_values() {
        for rsvp in [Rsvp::Yes, Rsvp::No, Rsvp::Maybe] {
            assert_eq!(Rsvp::parse(rsvp.as_str()), Some(rsvp));
        }
    }

    #[test]
    fn parse_tolerates_unknown_values() {
        assert_eq!(Rsvp::parse("attending"), None);
        assert_eq!(Rsvp::parse(""), None);
    }
}
