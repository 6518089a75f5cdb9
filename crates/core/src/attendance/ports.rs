//! Port interfaces for response writing

use async_trait::async_trait;
use rollcall_domain::{AttendanceResponse, Result};

/// Write access to RSVP/check-in rows.
///
/// The lookup returns an `Option` so callers branch explicitly between
/// insert and update; absence of a row is a normal state here, not an
/// error to catch.
#[async_trait]
pub trait ResponseWriter: Send + Sync {
    /// The row for one (appointment, user) pair, if it exists yet
    async fn find(&self, appointment_id: i64, user_id: &str)
        -> Result<Option<AttendanceResponse>>;

    /// Insert a new row; fails on a duplicate (appointment, user) pair
    async fn insert(&self, response: &AttendanceResponse) -> Result<()>;

    /// Update an existing row in place
    async fn update(&self, response: &AttendanceResponse) -> Result<()>;
}
