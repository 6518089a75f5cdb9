//! Visibility resolution service - core business logic

use std::collections::BTreeSet;
use std::sync::Arc;

use rollcall_domain::{Appointment, AudienceConfig, Result};
use tracing::debug;

use super::ports::DirectoryPort;

/// Resolves appointment audiences against the host directory.
pub struct VisibilityService {
    directory: Arc<dyn DirectoryPort>,
    config: AudienceConfig,
}

impl VisibilityService {
    /// Create a new resolver with an unrestricted open-audience policy.
    pub fn new(directory: Arc<dyn DirectoryPort>) -> Self {
        Self { directory, config: AudienceConfig::default() }
    }

    /// Apply a global audience configuration (open-audience group whitelist).
    pub fn with_config(mut self, config: AudienceConfig) -> Self {
        self.config = config;
        self
    }

    /// Whether the user is part of the appointment's resolved audience.
    ///
    /// Open audiences include every user, known to the directory or not.
    /// Restricted audiences match on the explicit user list first, then on
    /// group and team membership intersection. This is the only check that
    /// may feed attendance statistics, rosters, and streak eligibility;
    /// the manage-permission bypass in [`Self::can_see`] must never be
    /// substituted for it.
    pub async fn is_target_attendee(
        &self,
        appointment: &Appointment,
        user_id: &str,
    ) -> Result<bool> {
        let audience = &appointment.audience;
        if audience.is_open() {
            return Ok(true);
        }
        if audience.users.contains(user_id) {
            return Ok(true);
        }
        if !audience.groups.is_empty() {
            let groups = self.directory.group_ids_of(user_id).await?;
            if !groups.is_disjoint(&audience.groups) {
                return Ok(true);
            }
        }
        if !audience.teams.is_empty() {
            let teams = self.directory.team_ids_of(user_id).await?;
            if !teams.is_disjoint(&audience.teams) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Whether the user may see the appointment at all.
    ///
    /// Strict superset of [`Self::is_target_attendee`]: holders of the
    /// manage-appointments permission see everything.
    pub async fn can_see(&self, appointment: &Appointment, user_id: &str) -> Result<bool> {
        if self.directory.has_manage_permission(user_id).await? {
            return Ok(true);
        }
        self.is_target_attendee(appointment, user_id).await
    }

    /// Resolve the full target-attendee set for bulk fan-out.
    ///
    /// Open audiences cover every directory user, narrowed by the global
    /// group whitelist when one is configured. Restricted audiences are
    /// the union of explicit users, group members, and team members; the
    /// whitelist never applies to them.
    pub async fn expand_audience(&self, appointment: &Appointment) -> Result<BTreeSet<String>> {
        let audience = &appointment.audience;

        if audience.is_open() {
            let users = self.directory.list_all_users(None).await?;
            if self.config.restrict_to_groups.is_empty() {
                return Ok(users.into_iter().map(|user| user.id).collect());
            }

            let mut whitelisted = BTreeSet::new();
            for group_id in &self.config.restrict_to_groups {
                whitelisted.extend(self.directory.group_members(group_id).await?);
            }
            let targets: BTreeSet<String> = users
                .into_iter()
                .map(|user| user.id)
                .filter(|id| whitelisted.contains(id))
                .collect();
            debug!(
                appointment_id = appointment.id,
                targets = targets.len(),
                "open audience narrowed by group whitelist"
            );
            return Ok(targets);
        }

        let mut targets = audience.users.clone();
        for group_id in &audience.groups {
            targets.extend(self.directory.group_members(group_id).await?);
        }
        for team_id in &audience.teams {
            targets.extend(self.directory.team_members(team_id).await?);
        }
        debug!(
            appointment_id = appointment.id,
            targets = targets.len(),
            "restricted audience expanded"
        );
        Ok(targets)
    }
}
