//! CLI configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/spielplan/config.toml` by default:
//!
//! ```toml
//! [codec]
//! uid_domain = "bc-lions-moabit"
//! default_duration_hours = 2
//!
//! [discovery]
//! team_name = "BC Lions Moabit"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use spielplan_core::CodecConfig;

use crate::error::{CliError, CliResult};

/// Configuration for the spielplan CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Calendar encoding settings.
    pub codec: CodecConfig,

    /// Team discovery settings.
    pub discovery: DiscoverySettings,
}

/// Team discovery settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoverySettings {
    /// Club name whose games are tracked; used to attribute wins and losses.
    pub team_name: String,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            team_name: "BC Lions Moabit".to_string(),
        }
    }
}

impl CliConfig {
    /// Loads configuration from the default path, or defaults if it does
    /// not exist.
    pub fn load() -> CliResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| CliError::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("spielplan")
    }
}
