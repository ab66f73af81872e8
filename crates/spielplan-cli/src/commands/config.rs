//! Configuration commands.

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

/// Renders the effective configuration as TOML.
pub fn render(config: &CliConfig) -> CliResult<String> {
    toml::to_string_pretty(config)
        .map_err(|e| CliError::Config(format!("failed to serialize config: {}", e)))
}

/// Dump the effective configuration to stdout.
pub fn dump(config: &CliConfig) -> CliResult<()> {
    println!("# config.toml ({})", CliConfig::default_path().display());
    println!("{}", render(config)?);
    Ok(())
}

/// Show the configuration file path.
pub fn path() -> CliResult<()> {
    println!("config: {}", CliConfig::default_path().display());
    Ok(())
}
