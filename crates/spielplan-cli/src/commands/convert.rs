//! `spielplan convert`: raw fixture records to games JSON.
//!
//! Input is a JSON array of fixture records as returned by the fixture API,
//! each optionally carrying its match details under `matchInfo`.

use std::path::{Path, PathBuf};

use serde_json::Value;
use spielplan_core::{Game, ResultExtractor, game_from_record, involves_team};
use tracing::info;

use super::{read_json, write_output};
use crate::error::{CliError, CliResult};

/// Converts fixture records, keeping only games of `team` when given.
pub fn convert_records(records: &[Value], team: Option<&str>) -> Vec<Game> {
    let extractor = ResultExtractor::default();
    records
        .iter()
        .filter(|record| team.is_none_or(|team| involves_team(record, team)))
        .filter_map(|record| {
            let match_info = record.get("matchInfo").unwrap_or(&Value::Null);
            game_from_record(record, match_info, &extractor)
        })
        .collect()
}

/// Runs the convert command.
pub async fn run(fixtures: &Path, team: Option<&str>, output: Option<PathBuf>) -> CliResult<()> {
    let records: Vec<Value> = read_json(fixtures).await?;
    let games = convert_records(&records, team);
    info!(
        records = records.len(),
        games = games.len(),
        "Converted fixtures"
    );

    let json = serde_json::to_string_pretty(&games).map_err(|e| CliError::json(fixtures, e))?;
    write_output(output.as_deref(), &format!("{}\n", json)).await
}
