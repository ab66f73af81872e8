//! `spielplan encode`: games JSON to an iCalendar file.

use std::path::{Path, PathBuf};

use spielplan_core::{GameOutcome, Game, TeamConfig};
use spielplan_ics::{CalendarEncoder, EncodedCalendar, TeamSchedule, source_id};
use tracing::{info, warn};

use super::{file_stem, read_json, write_output};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

/// Arguments of the encode command.
#[derive(Debug, Clone)]
pub struct EncodeArgs {
    pub games: PathBuf,
    pub name: Option<String>,
    pub output: Option<PathBuf>,
    pub schedule: Option<PathBuf>,
}

/// Win/loss tally of the tracked club.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Record {
    pub won: usize,
    pub lost: usize,
    pub pending: usize,
}

impl Record {
    /// Counts outcomes from the perspective of `tracked_team`.
    pub fn tally(games: &[Game], tracked_team: &str) -> Self {
        games
            .iter()
            .fold(Self::default(), |mut record, game| {
                match GameOutcome::for_team(game, tracked_team) {
                    GameOutcome::Won { .. } => record.won += 1,
                    GameOutcome::Lost { .. } => record.lost += 1,
                    GameOutcome::Pending => record.pending += 1,
                    GameOutcome::Score { .. } | GameOutcome::Finished => {}
                }
                record
            })
    }
}

/// Encodes `games` into a calendar named after `team_name`.
pub fn encode_games(config: &CliConfig, team_name: &str, games: &[Game]) -> EncodedCalendar {
    CalendarEncoder::new(config.codec.clone()).encode_games(team_name, games)
}

/// Runs the encode command.
pub async fn run(args: EncodeArgs, config: &CliConfig) -> CliResult<()> {
    let games: Vec<Game> = read_json(&args.games).await?;
    let team_name = args.name.unwrap_or_else(|| file_stem(&args.games));

    let encoded = encode_games(config, &team_name, &games);
    if encoded.event_count == 0 && !games.is_empty() {
        warn!(team = %team_name, "No game could be encoded");
    }

    let record = Record::tally(&games, &config.discovery.team_name);
    info!(
        team = %team_name,
        events = encoded.event_count,
        skipped = encoded.skipped.len(),
        won = record.won,
        lost = record.lost,
        pending = record.pending,
        "Encoded calendar"
    );

    write_output(args.output.as_deref(), &encoded.ics).await?;

    if let Some(ref path) = args.schedule {
        let schedule = team_schedule(config, &args.games, &team_name, &games);
        let json = serde_json::to_string_pretty(&schedule).map_err(|e| CliError::json(path, e))?;
        write_output(Some(path), &json).await?;
    }

    Ok(())
}

fn team_schedule(config: &CliConfig, games_path: &Path, team_name: &str, games: &[Game]) -> TeamSchedule {
    let team = TeamConfig {
        competition_id: 0,
        team_name: team_name.to_string(),
        team_id: source_id(&games_path.to_string_lossy()),
        league_url: String::new(),
    };
    TeamSchedule::new(&team, games, &config.codec)
}
