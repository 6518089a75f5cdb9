//! SQLite-backed implementation of the ReminderLogStore port.

use std::sync::Arc;

use async_trait::async_trait;
use rollcall_core::reminder::ports::ReminderLogStore;
use rollcall_domain::{ReminderLog, Result};
use rusqlite::Row;
use tracing::instrument;

use super::manager::DbManager;
use super::{from_ts, to_ts};
use crate::errors::InfraError;

/// SQLite implementation of ReminderLogStore. The table is append-only;
/// nothing here updates or deletes.
pub struct SqliteReminderLogRepository {
    manager: Arc<DbManager>,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<(i64, String, i64)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

impl SqliteReminderLogRepository {
    /// Create a new reminder log repository
    pub fn new(manager: Arc<DbManager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl ReminderLogStore for SqliteReminderLogRepository {
    #[instrument(skip(self))]
    async fn find_for_appointment(&self, appointment_id: i64) -> Result<Vec<ReminderLog>> {
        let conn = self.manager.get_connection()?;
        let mut stmt = conn
            .prepare(
                "SELECT appointment_id, user_id, sent_at FROM reminder_log \
                 WHERE appointment_id = ?1",
            )
            .map_err(InfraError::from)?;
        let rows = stmt.query_map([appointment_id], read_row).map_err(InfraError::from)?;

        let mut logs = Vec::new();
        for raw in rows {
            let (appointment_id, user_id, sent_at) = raw.map_err(InfraError::from)?;
            logs.push(ReminderLog { appointment_id, user_id, sent_at: from_ts(sent_at)? });
        }
        Ok(logs)
    }

    #[instrument(skip(self, log), fields(appointment_id = log.appointment_id))]
    async fn append(&self, log: &ReminderLog) -> Result<()> {
        let conn = self.manager.get_connection()?;
        conn.execute(
            "INSERT INTO reminder_log (appointment_id, user_id, sent_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![log.appointment_id, log.user_id, to_ts(log.sent_at)],
        )
        .map_err(InfraError::from)?;
        Ok(())
    }
}
