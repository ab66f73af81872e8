//! Subcommand implementations.

pub mod abbreviate;
pub mod config;
pub mod convert;
pub mod decode;
pub mod dedupe;
pub mod encode;

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{CliError, CliResult};

/// Reads a whole text file.
pub async fn read_text(path: &Path) -> CliResult<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CliError::io(path, e))
}

/// Reads and parses a JSON file.
pub async fn read_json<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let text = read_text(path).await?;
    serde_json::from_str(&text).map_err(|e| CliError::json(path, e))
}

/// Writes `content` to `path`, or to stdout when no path is given.
pub async fn write_output(path: Option<&Path>, content: &str) -> CliResult<()> {
    match path {
        Some(path) => tokio::fs::write(path, content)
            .await
            .map_err(|e| CliError::io(path, e)),
        None => {
            print!("{}", content);
            Ok(())
        }
    }
}

/// Returns the file stem of `path` as text.
pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
