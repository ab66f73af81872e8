//! JSON event timelines.
//!
//! Two document shapes are produced for the web frontend:
//! - [`TeamSchedule`]: a team's games, one event per game
//! - [`CalendarTimeline`]: the decoded events of a public club calendar

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use spielplan_core::identifier::sanitize_for_filename;
use spielplan_core::time::{EventTime, local_datetime};
use spielplan_core::{CalendarEvent, CodecConfig, CodecResult, Game, GameInfo, TeamConfig};
use thiserror::Error;
use tracing::{debug, warn};

use crate::decode::decode;

/// Base URL of public Google calendar feeds.
const GOOGLE_CALENDAR_BASE: &str = "https://calendar.google.com/calendar/ical";

/// Converts games into timeline events.
///
/// Start is the announced local kickoff (midnight for placeholder times),
/// end is start plus the configured duration. Games with unsupported dates
/// are left out.
pub fn games_to_events(games: &[Game], config: &CodecConfig) -> Vec<CalendarEvent> {
    let duration = Duration::hours(i64::from(config.default_duration_hours));

    games
        .iter()
        .filter_map(|game| {
            let start = match local_datetime(&game.date, &game.time) {
                Ok(start) => start,
                Err(e) => {
                    warn!(match_id = game.match_id, error = %e, "Skipping game in timeline");
                    return None;
                }
            };

            let mut event = CalendarEvent::new(
                format!("{} vs {}", game.home, game.guest),
                EventTime::from_local(start),
                EventTime::from_local(start + duration),
            )
            .with_game(GameInfo::from(game));

            if let Some(ref venue) = game.venue {
                if let Some(name) = venue.display_name() {
                    event = event.with_venue_name(name);
                }
                if let Some(address) = venue.plain_address() {
                    event = event.with_location(address);
                }
            }

            Some(event)
        })
        .collect()
}

/// A team's games as a JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSchedule {
    pub team_name: String,
    pub team_id: String,
    pub competition_id: u64,
    pub events: Vec<CalendarEvent>,
}

impl TeamSchedule {
    /// Builds the schedule of a configured team.
    pub fn new(team: &TeamConfig, games: &[Game], config: &CodecConfig) -> Self {
        let events = games_to_events(games, config);
        debug!(team_id = %team.team_id, events = events.len(), "Built team schedule");
        Self {
            team_name: team.team_name.clone(),
            team_id: team.team_id.clone(),
            competition_id: team.competition_id,
            events,
        }
    }
}

/// Errors in calendar source definitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// `label` or `calId` is missing or blank.
    #[error("missing required fields (label, calId) in {filename}")]
    MissingFields { filename: String },
}

/// A public calendar to mirror, as configured in a `*.json` source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarSource {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub cal_id: String,
}

impl CalendarSource {
    /// Checks that both fields are present.
    pub fn validate(&self, filename: &str) -> Result<(), SourceError> {
        if self.label.trim().is_empty() || self.cal_id.trim().is_empty() {
            return Err(SourceError::MissingFields {
                filename: filename.to_string(),
            });
        }
        Ok(())
    }

    /// Returns the public feed URL of this calendar.
    pub fn feed_url(&self) -> String {
        public_calendar_url(&self.cal_id)
    }
}

/// Returns the public ICS feed URL of a Google calendar.
pub fn public_calendar_url(cal_id: &str) -> String {
    format!(
        "{}/{}/public/basic.ics",
        GOOGLE_CALENDAR_BASE,
        urlencoding::encode(cal_id)
    )
}

/// Derives a timeline id from a source file name: the file stem, sanitized.
pub fn source_id(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);
    sanitize_for_filename(stem)
}

/// The decoded events of a public calendar as a JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarTimeline {
    pub label: String,
    pub id: String,
    pub cal_id: String,
    pub last_updated: DateTime<Utc>,
    pub events: Vec<CalendarEvent>,
}

impl CalendarTimeline {
    /// A timeline without events.
    pub fn empty(source: &CalendarSource, id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            label: source.label.clone(),
            id: id.into(),
            cal_id: source.cal_id.clone(),
            last_updated: now,
            events: Vec::new(),
        }
    }

    /// Decodes a calendar document into a timeline, sorted by start.
    ///
    /// # Errors
    ///
    /// Fails when the document has no calendar envelope.
    pub fn try_from_ics(
        source: &CalendarSource,
        id: impl Into<String>,
        ics: &str,
        now: DateTime<Utc>,
    ) -> CodecResult<Self> {
        let mut events = decode(ics)?;
        events.sort_by_key(|event| event.start.sort_key());
        let mut timeline = Self::empty(source, id, now);
        timeline.events = events;
        Ok(timeline)
    }

    /// Like [`CalendarTimeline::try_from_ics`], but a document that cannot
    /// be decoded yields an empty timeline.
    pub fn from_ics(
        source: &CalendarSource,
        id: impl Into<String>,
        ics: &str,
        now: DateTime<Utc>,
    ) -> Self {
        let id = id.into();
        Self::try_from_ics(source, id.clone(), ics, now).unwrap_or_else(|e| {
            warn!(label = %source.label, error = %e, "Failed to decode calendar");
            Self::empty(source, id, now)
        })
    }
}
