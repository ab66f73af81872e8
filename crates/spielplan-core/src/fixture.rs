//! Conversion of raw fixture API records into [`Game`]s.
//!
//! A fixture record carries kickoff date and time, both teams and the match
//! id; the separately fetched match info carries the venue (`spielfeld`) and
//! possibly the result.

use serde_json::Value;
use tracing::warn;

use crate::event::{Game, Venue};
use crate::result::ResultExtractor;

fn text<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key)?.as_str().map(str::trim).filter(|s| !s.is_empty())
}

fn team_name<'a>(record: &'a Value, side: &str) -> Option<&'a str> {
    text(record.get(side)?, "teamname")
}

/// Returns true if either side's name contains `tracked`.
pub fn involves_team(record: &Value, tracked: &str) -> bool {
    ["homeTeam", "guestTeam"]
        .iter()
        .filter_map(|side| team_name(record, side))
        .any(|name| name.contains(tracked))
}

/// Reads the venue from a match info record.
pub fn venue_from_match_info(match_info: &Value) -> Option<Venue> {
    let field = match_info.get("spielfeld")?;
    let venue = Venue {
        name: text(field, "bezeichnung").map(str::to_string),
        street: text(field, "strasse").map(str::to_string),
        zip: text(field, "plz").map(str::to_string),
        city: text(field, "ort").map(str::to_string),
    };
    (venue != Venue::default()).then_some(venue)
}

/// Builds a game from a fixture record and its match info.
///
/// Records without a kickoff date, teams or match id are skipped.
pub fn game_from_record(
    record: &Value,
    match_info: &Value,
    extractor: &ResultExtractor,
) -> Option<Game> {
    let match_id = record.get("matchId").and_then(Value::as_u64);
    let Some(match_id) = match_id else {
        warn!("Skipping fixture without matchId");
        return None;
    };

    let Some(date) = text(record, "kickoffDate") else {
        warn!(match_id, "Skipping fixture without kickoffDate");
        return None;
    };

    let (Some(home), Some(guest)) = (team_name(record, "homeTeam"), team_name(record, "guestTeam"))
    else {
        warn!(match_id, "Skipping fixture without team names");
        return None;
    };

    let time = text(record, "kickoffTime").unwrap_or(crate::time::PLACEHOLDER_TIME);
    let mut game = Game::new(match_id, date, time, home, guest);
    game.venue = venue_from_match_info(match_info);
    game.result = extractor.extract(match_info, record);
    Some(game)
}
