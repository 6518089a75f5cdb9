//! Port interfaces for directory lookups
//!
//! These traits define the boundary between audience resolution and the
//! host directory (users, groups, teams).

use std::collections::BTreeSet;

use async_trait::async_trait;
use rollcall_domain::{Result, User};

/// Read-only view of the host directory.
///
/// Lookup misses degrade instead of failing: an unknown user id yields
/// empty membership sets, and a host without the optional teams feature
/// yields empty team lists. Implementations reserve errors for transport
/// failures, never for absent records.
#[async_trait]
pub trait DirectoryPort: Send + Sync {
    /// Resolve a user by id, `None` when the directory no longer knows it
    async fn get_user(&self, user_id: &str) -> Result<Option<User>>;

    /// List all directory users, optionally filtered by a search term
    async fn list_all_users(&self, search: Option<&str>) -> Result<Vec<User>>;

    /// Ids of the groups a user belongs to
    async fn group_ids_of(&self, user_id: &str) -> Result<BTreeSet<String>>;

    /// Ids of the teams a user belongs to
    async fn team_ids_of(&self, user_id: &str) -> Result<BTreeSet<String>>;

    /// Member user ids of a group
    async fn group_members(&self, group_id: &str) -> Result<Vec<String>>;

    /// Member user ids of a team
    async fn team_members(&self, team_id: &str) -> Result<Vec<String>>;

    /// Whether the user holds the elevated "manage appointments" permission
    async fn has_manage_permission(&self, user_id: &str) -> Result<bool>;
}
