//! Appointment and audience types

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A scheduled event users can RSVP to and be checked in at.
///
/// Soft-deletion (the `active` flag) is a storage concern: repositories
/// filter inactive rows out before they reach any service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub created_by: String,
    pub active: bool,
    pub audience: AudienceSpec,
}

impl Appointment {
    /// True once the appointment has fully ended.
    pub fn is_past(&self, now: DateTime<Utc>) -> bool {
        self.end < now
    }
}

/// Fields needed to create an appointment; storage assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentDraft {
    pub name: String,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub created_by: String,
    pub audience: AudienceSpec,
}

/// Who an appointment is meant for.
///
/// Decoded once at the persistence boundary from the stored list columns;
/// services never re-parse it. All three sets empty means the appointment
/// is open to every directory user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudienceSpec {
    /// Explicitly invited user ids
    #[serde(default)]
    pub users: BTreeSet<String>,
    /// Invited group ids
    #[serde(default)]
    pub groups: BTreeSet<String>,
    /// Invited team ids
    #[serde(default)]
    pub teams: BTreeSet<String>,
}

impl AudienceSpec {
    /// An audience open to every directory user.
    pub fn open() -> Self {
        Self::default()
    }

    /// True when no user, group, or team restriction is present.
    pub fn is_open(&self) -> bool {
        self.users.is_empty() && self.groups.is_empty() && self.teams.is_empty()
    }

    /// True when at least one of the three lists restricts the audience.
    pub fn is_restricted(&self) -> bool {
        !self.is_open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_audience_is_open() {
        assert!(AudienceSpec::open().is_open());
        assert!(!AudienceSpec::open().is_restricted());
    }

    #[test]
    fn any_list_makes_audience_restricted() {
        let audience =
            AudienceSpec { teams: BTreeSet::from(["scouts".to_string()]), ..Default::default() };
        assert!(audience.is_restricted());
    }
}
