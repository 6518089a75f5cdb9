//! SQLite-backed implementation of the DirectoryPort.
//!
//! Hosts usually provide their own directory service; this adapter covers
//! standalone deployments and integration tests. Lookup misses follow the
//! port contract: unknown users resolve to empty membership sets.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use rollcall_core::visibility::ports::DirectoryPort;
use rollcall_domain::{Result, User};
use rusqlite::OptionalExtension;
use tracing::instrument;

use super::manager::DbManager;
use crate::errors::InfraError;

/// SQLite implementation of DirectoryPort, with seeding helpers for
/// bootstrap and tests.
pub struct SqliteDirectoryRepository {
    manager: Arc<DbManager>,
}

impl SqliteDirectoryRepository {
    /// Create a new directory repository
    pub fn new(manager: Arc<DbManager>) -> Self {
        Self { manager }
    }

    /// Insert or rename a user.
    pub fn add_user(&self, user_id: &str, display_name: &str) -> Result<()> {
        let conn = self.manager.get_connection()?;
        conn.execute(
            "INSERT INTO users (user_id, display_name) VALUES (?1, ?2)
             ON CONFLICT(user_id) DO UPDATE SET display_name = excluded.display_name",
            [user_id, display_name],
        )
        .map_err(InfraError::from)?;
        Ok(())
    }

    /// Remove a user from the directory (membership rows stay behind, as
    /// they would after an offboarding in a real host).
    pub fn remove_user(&self, user_id: &str) -> Result<()> {
        let conn = self.manager.get_connection()?;
        conn.execute("DELETE FROM users WHERE user_id = ?1", [user_id])
            .map_err(InfraError::from)?;
        Ok(())
    }

    /// Add a user to a group.
    pub fn add_group_member(&self, group_id: &str, user_id: &str) -> Result<()> {
        let conn = self.manager.get_connection()?;
        conn.execute(
            "INSERT OR IGNORE INTO group_members (group_id, user_id) VALUES (?1, ?2)",
            [group_id, user_id],
        )
        .map_err(InfraError::from)?;
        Ok(())
    }

    /// Add a user to a team.
    pub fn add_team_member(&self, team_id: &str, user_id: &str) -> Result<()> {
        let conn = self.manager.get_connection()?;
        conn.execute(
            "INSERT OR IGNORE INTO team_members (team_id, user_id) VALUES (?1, ?2)",
            [team_id, user_id],
        )
        .map_err(InfraError::from)?;
        Ok(())
    }

    /// Grant the manage-appointments permission.
    pub fn grant_manage(&self, user_id: &str) -> Result<()> {
        let conn = self.manager.get_connection()?;
        conn.execute("INSERT OR IGNORE INTO appointment_managers (user_id) VALUES (?1)", [user_id])
            .map_err(InfraError::from)?;
        Ok(())
    }
}

#[async_trait]
impl DirectoryPort for SqliteDirectoryRepository {
    #[instrument(skip(self))]
    async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        let conn = self.manager.get_connection()?;
        let user = conn
            .query_row(
                "SELECT user_id, display_name FROM users WHERE user_id = ?1",
                [user_id],
                |row| Ok(User { id: row.get(0)?, display_name: row.get(1)? }),
            )
            .optional()
            .map_err(InfraError::from)?;
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn list_all_users(&self, search: Option<&str>) -> Result<Vec<User>> {
        let conn = self.manager.get_connection()?;
        let mut stmt = conn
            .prepare(
                "SELECT user_id, display_name FROM users \
                 WHERE ?1 IS NULL OR display_name LIKE '%' || ?1 || '%' \
                 ORDER BY user_id",
            )
            .map_err(InfraError::from)?;
        let rows = stmt
            .query_map([search], |row| Ok(User { id: row.get(0)?, display_name: row.get(1)? }))
            .map_err(InfraError::from)?;

        let mut users = Vec::new();
        for user in rows {
            users.push(user.map_err(InfraError::from)?);
        }
        Ok(users)
    }

    #[instrument(skip(self))]
    async fn group_ids_of(&self, user_id: &str) -> Result<BTreeSet<String>> {
        let conn = self.manager.get_connection()?;
        let mut stmt = conn
            .prepare("SELECT group_id FROM group_members WHERE user_id = ?1")
            .map_err(InfraError::from)?;
        let rows =
            stmt.query_map([user_id], |row| row.get::<_, String>(0)).map_err(InfraError::from)?;

        let mut ids = BTreeSet::new();
        for id in rows {
            ids.insert(id.map_err(InfraError::from)?);
        }
        Ok(ids)
    }

    #[instrument(skip(self))]
    async fn team_ids_of(&self, user_id: &str) -> Result<BTreeSet<String>> {
        let conn = self.manager.get_connection()?;
        let mut stmt = conn
            .prepare("SELECT team_id FROM team_members WHERE user_id = ?1")
            .map_err(InfraError::from)?;
        let rows =
            stmt.query_map([user_id], |row| row.get::<_, String>(0)).map_err(InfraError::from)?;

        let mut ids = BTreeSet::new();
        for id in rows {
            ids.insert(id.map_err(InfraError::from)?);
        }
        Ok(ids)
    }

    #[instrument(skip(self))]
    async fn group_members(&self, group_id: &str) -> Result<Vec<String>> {
        let conn = self.manager.get_connection()?;
        let mut stmt = conn
            .prepare("SELECT user_id FROM group_members WHERE group_id = ?1 ORDER BY user_id")
            .map_err(InfraError::from)?;
        let rows =
            stmt.query_map([group_id], |row| row.get::<_, String>(0)).map_err(InfraError::from)?;

        let mut members = Vec::new();
        for member in rows {
            members.push(member.map_err(InfraError::from)?);
        }
        Ok(members)
    }

    #[instrument(skip(self))]
    async fn team_members(&self, team_id: &str) -> Result<Vec<String>> {
        let conn = self.manager.get_connection()?;
        let mut stmt = conn
            .prepare("SELECT user_id FROM team_members WHERE team_id = ?1 ORDER BY user_id")
            .map_err(InfraError::from)?;
        let rows =
            stmt.query_map([team_id], |row| row.get::<_, String>(0)).map_err(InfraError::from)?;

        let mut members = Vec::new();
        for member in rows {
            members.push(member.map_err(InfraError::from)?);
        }
        Ok(members)
    }

    #[instrument(skip(self))]
    async fn has_manage_permission(&self, user_id: &str) -> Result<bool> {
        let conn = self.manager.get_connection()?;
        let found = conn
            .query_row("SELECT 1 FROM appointment_managers WHERE user_id = ?1", [user_id], |row| {
                row.get::<_, i64>(0)
            })
            .optional()
            .map_err(InfraError::from)?;
        Ok(found.is_some())
    }
}
