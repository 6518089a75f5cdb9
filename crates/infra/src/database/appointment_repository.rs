//! SQLite-backed implementation of the AppointmentReader port.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rollcall_core::streak::ports::AppointmentReader;
use rollcall_domain::{Appointment, AppointmentDraft, AudienceSpec, Result, RollcallError};
use rusqlite::{OptionalExtension, Row};
use tracing::instrument;

use super::manager::DbManager;
use super::{from_ts, to_ts};
use crate::errors::InfraError;

const COLUMNS: &str = "id, name, description, start_ts, end_ts, created_by, active, \
                       audience_users, audience_groups, audience_teams";

/// SQLite implementation of AppointmentReader, plus the write operations
/// the admin surface needs (create, soft-delete).
pub struct SqliteAppointmentRepository {
    manager: Arc<DbManager>,
}

struct RawAppointment {
    id: i64,
    name: String,
    description: Option<String>,
    start_ts: i64,
    end_ts: i64,
    created_by: String,
    active: bool,
    users: String,
    groups: String,
    teams: String,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<RawAppointment> {
    Ok(RawAppointment {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        start_ts: row.get(3)?,
        end_ts: row.get(4)?,
        created_by: row.get(5)?,
        active: row.get(6)?,
        users: row.get(7)?,
        groups: row.get(8)?,
        teams: row.get(9)?,
    })
}

fn decode_ids(json: &str) -> Result<BTreeSet<String>> {
    serde_json::from_str(json).map_err(|err| InfraError::from(err).into())
}

fn encode_ids(ids: &BTreeSet<String>) -> Result<String> {
    serde_json::to_string(ids).map_err(|err| InfraError::from(err).into())
}

fn into_appointment(raw: RawAppointment) -> Result<Appointment> {
    Ok(Appointment {
        id: raw.id,
        name: raw.name,
        description: raw.description,
        start: from_ts(raw.start_ts)?,
        end: from_ts(raw.end_ts)?,
        created_by: raw.created_by,
        active: raw.active,
        audience: AudienceSpec {
            users: decode_ids(&raw.users)?,
            groups: decode_ids(&raw.groups)?,
            teams: decode_ids(&raw.teams)?,
        },
    })
}

impl SqliteAppointmentRepository {
    /// Create a new appointment repository
    pub fn new(manager: Arc<DbManager>) -> Self {
        Self { manager }
    }

    /// Insert a new appointment; storage assigns the id.
    #[instrument(skip(self, draft))]
    pub fn create(&self, draft: &AppointmentDraft) -> Result<Appointment> {
        let conn = self.manager.get_connection()?;
        conn.execute(
            "INSERT INTO appointments (
                name, description, start_ts, end_ts, created_by, active,
                audience_users, audience_groups, audience_teams, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?7, ?8, ?9)",
            rusqlite::params![
                draft.name,
                draft.description,
                to_ts(draft.start),
                to_ts(draft.end),
                draft.created_by,
                encode_ids(&draft.audience.users)?,
                encode_ids(&draft.audience.groups)?,
                encode_ids(&draft.audience.teams)?,
                Utc::now().timestamp(),
            ],
        )
        .map_err(InfraError::from)?;

        Ok(Appointment {
            id: conn.last_insert_rowid(),
            name: draft.name.clone(),
            description: draft.description.clone(),
            start: draft.start,
            end: draft.end,
            created_by: draft.created_by.clone(),
            active: true,
            audience: draft.audience.clone(),
        })
    }

    /// Soft-delete an appointment by clearing its active flag.
    #[instrument(skip(self))]
    pub fn deactivate(&self, appointment_id: i64) -> Result<()> {
        let conn = self.manager.get_connection()?;
        let affected = conn
            .execute("UPDATE appointments SET active = 0 WHERE id = ?1", [appointment_id])
            .map_err(InfraError::from)?;
        if affected == 0 {
            return Err(RollcallError::NotFound(format!("appointment {appointment_id}")));
        }
        Ok(())
    }
}

#[async_trait]
impl AppointmentReader for SqliteAppointmentRepository {
    #[instrument(skip(self))]
    async fn find(&self, appointment_id: i64) -> Result<Option<Appointment>> {
        let conn = self.manager.get_connection()?;
        let raw = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM appointments WHERE id = ?1 AND active = 1"),
                [appointment_id],
                read_row,
            )
            .optional()
            .map_err(InfraError::from)?;
        raw.map(into_appointment).transpose()
    }

    #[instrument(skip(self))]
    async fn find_past(&self, now: DateTime<Utc>) -> Result<Vec<Appointment>> {
        let conn = self.manager.get_connection()?;
        let mut stmt = conn
            .prepare(&format!("SELECT {COLUMNS} FROM appointments WHERE active = 1 AND end_ts < ?1"))
            .map_err(InfraError::from)?;
        let rows = stmt.query_map([to_ts(now)], read_row).map_err(InfraError::from)?;

        let mut appointments = Vec::new();
        for raw in rows {
            appointments.push(into_appointment(raw.map_err(InfraError::from)?)?);
        }
        Ok(appointments)
    }

    #[instrument(skip(self))]
    async fn find_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Appointment>> {
        let conn = self.manager.get_connection()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {COLUMNS} FROM appointments \
                 WHERE active = 1 AND start_ts >= ?1 AND start_ts <= ?2"
            ))
            .map_err(InfraError::from)?;
        let rows =
            stmt.query_map([to_ts(from), to_ts(until)], read_row).map_err(InfraError::from)?;

        let mut appointments = Vec::new();
        for raw in rows {
            appointments.push(into_appointment(raw.map_err(InfraError::from)?)?);
        }
        Ok(appointments)
    }
}
