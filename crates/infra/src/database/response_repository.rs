//! SQLite-backed implementation of the response ports.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use rollcall_core::attendance::ports::ResponseWriter;
use rollcall_core::streak::ports::ResponseReader;
use rollcall_domain::{AttendanceResponse, Result, RollcallError, Rsvp};
use rusqlite::{OptionalExtension, Row};
use tracing::instrument;
use uuid::Uuid;

use super::manager::DbManager;
use super::{from_opt_ts, to_ts};
use crate::errors::InfraError;

const COLUMNS: &str = "id, appointment_id, user_id, rsvp, comment, responded_at, \
                       checkin, checkin_comment, checked_in_by, checked_in_at";

/// SQLite implementation of ResponseReader and ResponseWriter.
pub struct SqliteResponseRepository {
    manager: Arc<DbManager>,
}

struct RawResponse {
    id: String,
    appointment_id: i64,
    user_id: String,
    rsvp: Option<String>,
    comment: Option<String>,
    responded_at: Option<i64>,
    checkin: Option<String>,
    checkin_comment: Option<String>,
    checked_in_by: Option<String>,
    checked_in_at: Option<i64>,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<RawResponse> {
    Ok(RawResponse {
        id: row.get(0)?,
        appointment_id: row.get(1)?,
        user_id: row.get(2)?,
        rsvp: row.get(3)?,
        comment: row.get(4)?,
        responded_at: row.get(5)?,
        checkin: row.get(6)?,
        checkin_comment: row.get(7)?,
        checked_in_by: row.get(8)?,
        checked_in_at: row.get(9)?,
    })
}

fn into_response(raw: RawResponse) -> Result<AttendanceResponse> {
    let id = Uuid::parse_str(&raw.id)
        .map_err(|err| RollcallError::Database(format!("bad response row id: {err}")))?;
    Ok(AttendanceResponse {
        id,
        appointment_id: raw.appointment_id,
        user_id: raw.user_id,
        // values outside yes/no/maybe decode to None, never an error
        rsvp: raw.rsvp.as_deref().and_then(Rsvp::parse),
        comment: raw.comment,
        responded_at: from_opt_ts(raw.responded_at)?,
        checkin: raw.checkin.as_deref().and_then(Rsvp::parse),
        checkin_comment: raw.checkin_comment,
        checked_in_by: raw.checked_in_by,
        checked_in_at: from_opt_ts(raw.checked_in_at)?,
    })
}

impl SqliteResponseRepository {
    /// Create a new response repository
    pub fn new(manager: Arc<DbManager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl ResponseReader for SqliteResponseRepository {
    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<AttendanceResponse>> {
        let conn = self.manager.get_connection()?;
        let mut stmt = conn
            .prepare(&format!("SELECT {COLUMNS} FROM attendance_responses WHERE user_id = ?1"))
            .map_err(InfraError::from)?;
        let rows = stmt.query_map([user_id], read_row).map_err(InfraError::from)?;

        let mut responses = Vec::new();
        for raw in rows {
            responses.push(into_response(raw.map_err(InfraError::from)?)?);
        }
        Ok(responses)
    }

    #[instrument(skip(self))]
    async fn find_by_appointment(&self, appointment_id: i64) -> Result<Vec<AttendanceResponse>> {
        let conn = self.manager.get_connection()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {COLUMNS} FROM attendance_responses WHERE appointment_id = ?1"
            ))
            .map_err(InfraError::from)?;
        let rows = stmt.query_map([appointment_id], read_row).map_err(InfraError::from)?;

        let mut responses = Vec::new();
        for raw in rows {
            responses.push(into_response(raw.map_err(InfraError::from)?)?);
        }
        Ok(responses)
    }

    /// Single `IN`-list query across every relevant appointment id; the
    /// streak engine depends on this not degrading into per-appointment
    /// probes.
    #[instrument(skip(self, appointment_ids), fields(count = appointment_ids.len()))]
    async fn appointments_with_checkins(&self, appointment_ids: &[i64]) -> Result<HashSet<i64>> {
        if appointment_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let conn = self.manager.get_connection()?;
        let placeholders = vec!["?"; appointment_ids.len()].join(", ");
        let mut stmt = conn
            .prepare(&format!(
                "SELECT DISTINCT appointment_id FROM attendance_responses \
                 WHERE checkin IS NOT NULL AND appointment_id IN ({placeholders})"
            ))
            .map_err(InfraError::from)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(appointment_ids.iter()), |row| {
                row.get::<_, i64>(0)
            })
            .map_err(InfraError::from)?;

        let mut ids = HashSet::new();
        for id in rows {
            ids.insert(id.map_err(InfraError::from)?);
        }
        Ok(ids)
    }
}

#[async_trait]
impl ResponseWriter for SqliteResponseRepository {
    #[instrument(skip(self))]
    async fn find(
        &self,
        appointment_id: i64,
        user_id: &str,
    ) -> Result<Option<AttendanceResponse>> {
        let conn = self.manager.get_connection()?;
        let raw = conn
            .query_row(
                &format!(
                    "SELECT {COLUMNS} FROM attendance_responses \
                     WHERE appointment_id = ?1 AND user_id = ?2"
                ),
                rusqlite::params![appointment_id, user_id],
                read_row,
            )
            .optional()
            .map_err(InfraError::from)?;
        raw.map(into_response).transpose()
    }

    #[instrument(skip(self, response))]
    async fn insert(&self, response: &AttendanceResponse) -> Result<()> {
        let conn = self.manager.get_connection()?;
        conn.execute(
            "INSERT INTO attendance_responses (
                id, appointment_id, user_id, rsvp, comment, responded_at,
                checkin, checkin_comment, checked_in_by, checked_in_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            rusqlite::params![
                response.id.to_string(),
                response.appointment_id,
                response.user_id,
                response.rsvp.map(Rsvp::as_str),
                response.comment,
                response.responded_at.map(to_ts),
                response.checkin.map(Rsvp::as_str),
                response.checkin_comment,
                response.checked_in_by,
                response.checked_in_at.map(to_ts),
            ],
        )
        .map_err(InfraError::from)?;
        Ok(())
    }

    #[instrument(skip(self, response))]
    async fn update(&self, response: &AttendanceResponse) -> Result<()> {
        let conn = self.manager.get_connection()?;
        let affected = conn
            .execute(
                "UPDATE attendance_responses SET
                    rsvp = ?3, comment = ?4, responded_at = ?5,
                    checkin = ?6, checkin_comment = ?7, checked_in_by = ?8, checked_in_at = ?9
                 WHERE appointment_id = ?1 AND user_id = ?2",
                rusqlite::params![
                    response.appointment_id,
                    response.user_id,
                    response.rsvp.map(Rsvp::as_str),
                    response.comment,
                    response.responded_at.map(to_ts),
                    response.checkin.map(Rsvp::as_str),
                    response.checkin_comment,
                    response.checked_in_by,
                    response.checked_in_at.map(to_ts),
                ],
            )
            .map_err(InfraError::from)?;
        if affected == 0 {
            return Err(RollcallError::NotFound(format!(
                "response row for appointment {} and user {}",
                response.appointment_id, response.user_id
            )));
        }
        Ok(())
    }
}
