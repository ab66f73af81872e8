//! iCalendar encoding.
//!
//! [`EventEncoder`] turns a single [`Game`] (or a decoded [`CalendarEvent`])
//! into the property lines of one `VEVENT`; [`CalendarEncoder`] wraps those
//! into a `VCALENDAR` document with CRLF line endings.
//!
//! Game times are written as floating local time (`YYYYMMDDTHHMMSS`, no
//! `Z`), so subscribers see the kickoff at the announced wall-clock time in
//! whatever zone they are in.

use chrono::{DateTime, Duration, Utc};
use spielplan_core::event::UNKNOWN_VENUE_FIELD;
use spielplan_core::time::{
    EventTime, format_ics_date, format_ics_local, format_ics_utc, to_local_ics_end_timestamp,
    to_local_ics_timestamp,
};
use spielplan_core::{CalendarEvent, CodecConfig, CodecError, CodecResult, Game, Venue};
use tracing::{debug, warn};

const CRLF: &str = "\r\n";

/// Escapes a free-text value (`\`, `;`, `,` and newlines).
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Trimmed and escaped venue field, `None` when blank.
fn venue_field(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(escape_text)
}

/// `"<zip> <city>"` with blank parts dropped.
fn venue_place(venue: &Venue) -> String {
    [venue_field(venue.zip.as_deref()), venue_field(venue.city.as_deref())]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns `"<street>\, <zip> <city>"`, or an empty string without a street.
pub fn game_location(venue: Option<&Venue>) -> String {
    let Some(venue) = venue else {
        return String::new();
    };
    let Some(street) = venue_field(venue.street.as_deref()) else {
        return String::new();
    };

    let place = venue_place(venue);
    if place.is_empty() {
        street
    } else {
        format!("{}\\, {}", street, place)
    }
}

/// Returns `"Venue: <name>\nAddress: <street>; <zip> <city>"` with a literal
/// `\n`, or an empty string without a venue.
pub fn game_description(venue: Option<&Venue>) -> String {
    let Some(venue) = venue else {
        return String::new();
    };

    let unknown = || UNKNOWN_VENUE_FIELD.to_string();
    let address = format!(
        "{}; {}",
        venue_field(venue.street.as_deref()).unwrap_or_else(unknown),
        venue_place(venue)
    );

    format!(
        "Venue: {}\\nAddress: {}",
        venue_field(venue.name.as_deref()).unwrap_or_else(unknown),
        address.trim_end()
    )
}

/// Encodes individual events.
#[derive(Debug, Clone)]
pub struct EventEncoder<'a> {
    config: &'a CodecConfig,
    stamp: DateTime<Utc>,
}

impl<'a> EventEncoder<'a> {
    /// Creates an encoder that writes `stamp` as `DTSTAMP`.
    pub fn new(config: &'a CodecConfig, stamp: DateTime<Utc>) -> Self {
        Self { config, stamp }
    }

    /// Encodes a game as `VEVENT` property lines.
    ///
    /// # Errors
    ///
    /// Fails when the game date or time is in an unsupported format.
    pub fn encode_game(&self, game: &Game) -> CodecResult<Vec<String>> {
        let start = to_local_ics_timestamp(&game.date, &game.time)?;
        let end = to_local_ics_end_timestamp(
            &game.date,
            &game.time,
            self.config.default_duration_hours,
        )?;

        Ok(vec![
            "BEGIN:VEVENT".to_string(),
            format!("UID:{}", self.config.uid_for(game.match_id)),
            format!("DTSTART:{}", start),
            format!("DTEND:{}", end),
            format!("SUMMARY:{}", escape_text(&game.summary())),
            format!("LOCATION:{}", game_location(game.venue.as_ref())),
            format!("DESCRIPTION:{}", game_description(game.venue.as_ref())),
            format!("DTSTAMP:{}", format_ics_utc(&self.stamp)),
            "STATUS:CONFIRMED".to_string(),
            "END:VEVENT".to_string(),
        ])
    }

    /// Encodes a normalized event as `VEVENT` property lines.
    ///
    /// All-day events are written with `VALUE=DATE` and the exclusive end
    /// date, undoing the decoder's inclusive correction.
    pub fn encode_event(&self, event: &CalendarEvent, uid: &str) -> Vec<String> {
        let mut lines = vec![
            "BEGIN:VEVENT".to_string(),
            format!("UID:{}", uid),
            format_boundary("DTSTART", &event.start, false),
            format_boundary("DTEND", &event.end, true),
            format!("SUMMARY:{}", escape_text(&event.summary)),
        ];

        if let Some(ref location) = event.location {
            lines.push(format!("LOCATION:{}", escape_text(location)));
        }
        if let Some(ref description) = event.description {
            lines.push(format!("DESCRIPTION:{}", escape_text(description)));
        }

        lines.push(format!("DTSTAMP:{}", format_ics_utc(&self.stamp)));
        lines.push("END:VEVENT".to_string());
        lines
    }
}

fn format_boundary(name: &str, time: &EventTime, is_end: bool) -> String {
    match time {
        EventTime::DateTime(dt) => format!("{}:{}", name, format_ics_utc(dt)),
        EventTime::Local(dt) => format!("{}:{}", name, format_ics_local(dt)),
        EventTime::AllDay(date) => {
            let date = if is_end {
                *date + Duration::days(1)
            } else {
                *date
            };
            format!("{};VALUE=DATE:{}", name, format_ics_date(&date))
        }
    }
}

/// A game left out of a calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedGame {
    /// Upstream match identifier.
    pub match_id: u64,
    /// Why the game was skipped.
    pub error: CodecError,
}

/// The result of encoding a batch of games.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedCalendar {
    /// The calendar document.
    pub ics: String,
    /// Number of events written.
    pub event_count: usize,
    /// Games that could not be encoded.
    pub skipped: Vec<SkippedGame>,
}

/// Encodes whole calendars.
#[derive(Debug, Clone, Default)]
pub struct CalendarEncoder {
    config: CodecConfig,
    stamp: Option<DateTime<Utc>>,
}

impl CalendarEncoder {
    /// Creates an encoder with the given configuration.
    pub fn new(config: CodecConfig) -> Self {
        Self {
            config,
            stamp: None,
        }
    }

    /// Fixes the `DTSTAMP` value instead of using the current time.
    pub fn with_stamp(mut self, stamp: DateTime<Utc>) -> Self {
        self.stamp = Some(stamp);
        self
    }

    fn event_encoder(&self) -> EventEncoder<'_> {
        EventEncoder::new(&self.config, self.stamp.unwrap_or_else(Utc::now))
    }

    /// Encodes a team's games.
    ///
    /// Games with unsupported dates or times are skipped and reported in
    /// [`EncodedCalendar::skipped`]; the rest of the batch is still encoded.
    pub fn encode_games(&self, team_name: &str, games: &[Game]) -> EncodedCalendar {
        let encoder = self.event_encoder();
        let mut events = Vec::with_capacity(games.len());
        let mut skipped = Vec::new();

        for game in games {
            match encoder.encode_game(game) {
                Ok(lines) => events.push(lines),
                Err(error) => {
                    warn!(
                        match_id = game.match_id,
                        date = %game.date,
                        time = %game.time,
                        error = %error,
                        "Skipping game"
                    );
                    skipped.push(SkippedGame {
                        match_id: game.match_id,
                        error,
                    });
                }
            }
        }

        debug!(
            team = %team_name,
            events = events.len(),
            skipped = skipped.len(),
            "Encoded team calendar"
        );

        EncodedCalendar {
            event_count: events.len(),
            ics: self.encode_calendar(&self.config.calendar_name(team_name), events),
            skipped,
        }
    }

    /// Encodes normalized events; UIDs are derived from `uid_prefix` and
    /// the event position.
    pub fn encode_events(
        &self,
        calendar_name: &str,
        uid_prefix: &str,
        events: &[CalendarEvent],
    ) -> String {
        let encoder = self.event_encoder();
        let vevents = events
            .iter()
            .enumerate()
            .map(|(i, event)| {
                let uid = match event.game {
                    Some(ref game) => self.config.uid_for(game.match_id),
                    None => format!("{}-{}@{}", uid_prefix, i, self.config.uid_domain),
                };
                encoder.encode_event(event, &uid)
            })
            .collect();
        self.encode_calendar(calendar_name, vevents)
    }

    /// Wraps `VEVENT` line groups in a `VCALENDAR` envelope.
    ///
    /// An empty calendar carries `METHOD:PUBLISH` so clients accept it.
    pub fn encode_calendar(&self, calendar_name: &str, events: Vec<Vec<String>>) -> String {
        let mut lines = vec![
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            format!("PRODID:{}", self.config.product_id),
            format!("X-WR-CALNAME:{}", calendar_name),
            "CALSCALE:GREGORIAN".to_string(),
        ];

        if events.is_empty() {
            lines.push("METHOD:PUBLISH".to_string());
        }
        lines.extend(events.into_iter().flatten());
        lines.push("END:VCALENDAR".to_string());

        let mut ics = lines.join(CRLF);
        ics.push_str(CRLF);
        ics
    }
}
