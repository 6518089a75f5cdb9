//! Port interfaces for streak computation
//!
//! These traits define the boundaries between the streak engine and the
//! appointment/response/streak storage.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rollcall_domain::{Appointment, AttendanceResponse, Result, Streak};

/// Read access to stored appointments.
///
/// Implementations only ever surface active rows; soft-deleted
/// appointments are filtered at the query boundary.
#[async_trait]
pub trait AppointmentReader: Send + Sync {
    /// Resolve one appointment by id
    async fn find(&self, appointment_id: i64) -> Result<Option<Appointment>>;

    /// All appointments that have fully ended (end < now).
    /// No ordering guarantee; callers sort as needed.
    async fn find_past(&self, now: DateTime<Utc>) -> Result<Vec<Appointment>>;

    /// Appointments starting within the inclusive window
    async fn find_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Appointment>>;
}

/// Read access to RSVP and check-in rows.
#[async_trait]
pub trait ResponseReader: Send + Sync {
    /// All response rows for one user, across appointments
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<AttendanceResponse>>;

    /// All response rows for one appointment
    async fn find_by_appointment(&self, appointment_id: i64) -> Result<Vec<AttendanceResponse>>;

    /// Which of the given appointments had any check-in recorded at all.
    ///
    /// Must be answered with a single batched query; the streak engine
    /// calls this once per recalculation with every relevant appointment
    /// id rather than probing appointment by appointment.
    async fn appointments_with_checkins(&self, appointment_ids: &[i64]) -> Result<HashSet<i64>>;
}

/// Storage for the per-user streak aggregate.
#[async_trait]
pub trait StreakStore: Send + Sync {
    /// Cached row for a user, `None` before the first recalculation
    async fn find(&self, user_id: &str) -> Result<Option<Streak>>;

    /// Fully overwrite (or create) a user's streak row
    async fn upsert(&self, streak: &Streak) -> Result<()>;

    /// Rows ordered by current streak descending, limited.
    /// Ties stay in storage order.
    async fn top(&self, limit: usize) -> Result<Vec<Streak>>;
}
