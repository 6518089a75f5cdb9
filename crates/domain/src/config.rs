//! Configuration management

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_REMINDER_LOOKAHEAD_DAYS, MAX_REMINDER_LOOKAHEAD_DAYS, MIN_REMINDER_LOOKAHEAD_DAYS,
};
use crate::errors::{Result, RollcallError};

/// Reminder batch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderConfig {
    /// Master gate; when false the batch is a no-op
    pub enabled: bool,
    /// Look-ahead window in days (1-30)
    pub lookahead_days: u32,
    /// Cool-down between reminders for the same (appointment, user) pair.
    /// `0` means remind at most once ever per appointment per user.
    pub frequency_days: u32,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self { enabled: false, lookahead_days: DEFAULT_REMINDER_LOOKAHEAD_DAYS, frequency_days: 0 }
    }
}

impl ReminderConfig {
    /// Validate the configured window against the allowed bounds.
    pub fn validate(&self) -> Result<()> {
        if self.lookahead_days < MIN_REMINDER_LOOKAHEAD_DAYS
            || self.lookahead_days > MAX_REMINDER_LOOKAHEAD_DAYS
        {
            return Err(RollcallError::Config(format!(
                "reminder lookahead must be between {MIN_REMINDER_LOOKAHEAD_DAYS} and \
                 {MAX_REMINDER_LOOKAHEAD_DAYS} days, got {}",
                self.lookahead_days
            )));
        }
        Ok(())
    }
}

/// Audience resolution configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AudienceConfig {
    /// Optional global group whitelist. When non-empty, open-audience
    /// appointments only fan out to members of these groups. Restricted
    /// audiences are never filtered by it.
    pub restrict_to_groups: BTreeSet<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_reminder_config_is_valid() {
        assert!(ReminderConfig::default().validate().is_ok());
    }

    #[test]
    fn lookahead_out_of_range_is_rejected() {
        let config = ReminderConfig { lookahead_days: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(RollcallError::Config(_))));

        let config = ReminderConfig { lookahead_days: 31, ..Default::default() };
        assert!(matches!(config.validate(), Err(RollcallError::Config(_))));
    }
}
