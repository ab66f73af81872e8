//! Codec configuration.

use serde::{Deserialize, Serialize};

/// Default `PRODID` of generated calendars.
pub const DEFAULT_PRODUCT_ID: &str = "-//BC Lions Moabit//Basketball Calendar//DE";

/// Default domain part of event UIDs.
pub const DEFAULT_UID_DOMAIN: &str = "bc-lions-moabit";

/// Settings shared by the encoders and timeline builders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// `PRODID` of generated calendars.
    pub product_id: String,

    /// Domain part of event UIDs, `<match_id>@<uid_domain>`.
    pub uid_domain: String,

    /// Length of a game in whole hours.
    pub default_duration_hours: u32,

    /// Appended to the team name to form `X-WR-CALNAME`.
    pub calendar_name_suffix: String,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            product_id: DEFAULT_PRODUCT_ID.to_string(),
            uid_domain: DEFAULT_UID_DOMAIN.to_string(),
            default_duration_hours: 2,
            calendar_name_suffix: " - Spielplan".to_string(),
        }
    }
}

impl CodecConfig {
    /// Builder: set the product id.
    pub fn with_product_id(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = product_id.into();
        self
    }

    /// Builder: set the UID domain.
    pub fn with_uid_domain(mut self, domain: impl Into<String>) -> Self {
        self.uid_domain = domain.into();
        self
    }

    /// Builder: set the game duration.
    pub fn with_default_duration_hours(mut self, hours: u32) -> Self {
        self.default_duration_hours = hours;
        self
    }

    /// Builder: set the calendar name suffix.
    pub fn with_calendar_name_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.calendar_name_suffix = suffix.into();
        self
    }

    /// Returns the event UID for a match.
    pub fn uid_for(&self, match_id: u64) -> String {
        format!("{}@{}", match_id, self.uid_domain)
    }

    /// Returns the calendar display name for a team.
    pub fn calendar_name(&self, team_name: &str) -> String {
        format!("{}{}", team_name, self.calendar_name_suffix)
    }
}
