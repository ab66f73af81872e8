//! Game and calendar event types.
//!
//! This module provides the record types shared by the encoder and decoder:
//! - [`Game`]: a fixture as delivered by the fixture API
//! - [`Venue`]: where a game is played, every field optional
//! - [`GameResult`]: a (possibly score-less) result
//! - [`CalendarEvent`]: the normalized event both codec directions agree on

use serde::{Deserialize, Serialize};

use crate::time::{EventTime, is_placeholder_time};

/// Text used in place of a missing venue name or street.
pub const UNKNOWN_VENUE_FIELD: &str = "TBD";

/// The venue of a game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    /// Hall or field name.
    pub name: Option<String>,
    /// Street and house number.
    pub street: Option<String>,
    /// Postal code.
    pub zip: Option<String>,
    /// City.
    pub city: Option<String>,
}

impl Venue {
    /// Creates an empty venue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the venue name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder method to set the street.
    pub fn with_street(mut self, street: impl Into<String>) -> Self {
        self.street = Some(street.into());
        self
    }

    /// Builder method to set postal code and city.
    pub fn with_city(mut self, zip: impl Into<String>, city: impl Into<String>) -> Self {
        self.zip = Some(zip.into());
        self.city = Some(city.into());
        self
    }

    /// Returns the venue name if it is present and not blank.
    pub fn display_name(&self) -> Option<&str> {
        non_blank(self.name.as_deref())
    }

    /// Returns `"street, zip city"` with blank parts dropped.
    ///
    /// Used for JSON timelines where map integrations read the value directly.
    pub fn plain_address(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.street, &self.zip, &self.city]
            .into_iter()
            .filter_map(|part| non_blank(part.as_deref()))
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// The result of a game.
///
/// Scores are optional: some upstream records only say that a game is over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    /// Points scored by the home side.
    pub home_score: Option<u32>,
    /// Points scored by the guest side.
    pub guest_score: Option<u32>,
    /// Whether the game has been played.
    pub is_finished: bool,
}

impl GameResult {
    /// Creates a finished result with both scores known.
    pub fn scored(home_score: u32, guest_score: u32) -> Self {
        Self {
            home_score: Some(home_score),
            guest_score: Some(guest_score),
            is_finished: true,
        }
    }

    /// Creates a finished result without scores.
    pub fn finished() -> Self {
        Self {
            home_score: None,
            guest_score: None,
            is_finished: true,
        }
    }

    /// Returns both scores if both are known.
    pub fn scores(&self) -> Option<(u32, u32)> {
        self.home_score.zip(self.guest_score)
    }
}

/// A fixture as delivered by the fixture API, enriched with venue details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    /// Kickoff date, `YYYY-MM-DD` or `DD.MM.YYYY`.
    pub date: String,
    /// Kickoff time, `HH:MM`; `23:59` means not yet announced.
    pub time: String,
    /// Home team name.
    pub home: String,
    /// Guest team name.
    pub guest: String,
    /// Stable upstream match identifier.
    pub match_id: u64,
    /// Venue details, if known.
    #[serde(default)]
    pub venue: Option<Venue>,
    /// Result, if the game has been played.
    #[serde(default)]
    pub result: Option<GameResult>,
}

impl Game {
    /// Creates a game without venue or result.
    pub fn new(
        match_id: u64,
        date: impl Into<String>,
        time: impl Into<String>,
        home: impl Into<String>,
        guest: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            time: time.into(),
            home: home.into(),
            guest: guest.into(),
            match_id,
            venue: None,
            result: None,
        }
    }

    /// Builder method to set the venue.
    pub fn with_venue(mut self, venue: Venue) -> Self {
        self.venue = Some(venue);
        self
    }

    /// Builder method to set the result.
    pub fn with_result(mut self, result: GameResult) -> Self {
        self.result = Some(result);
        self
    }

    /// Returns true if the kickoff time has not been announced.
    pub fn has_placeholder_time(&self) -> bool {
        is_placeholder_time(&self.time)
    }

    /// Returns the venue name, if any.
    pub fn venue_name(&self) -> Option<&str> {
        self.venue.as_ref().and_then(Venue::display_name)
    }

    /// Returns the game summary: `"<home> vs <guest>"` followed by the
    /// result, the placeholder-time marker and the venue name, in that order.
    pub fn summary(&self) -> String {
        let mut summary = format!("{} vs {}", self.home, self.guest);

        if let Some(ref result) = self.result {
            if let Some((home, guest)) = result.scores() {
                summary.push_str(&format!(" {}:{}", home, guest));
            } else if result.is_finished {
                summary.push_str(" (Beendet)");
            }
        }

        if self.has_placeholder_time() {
            summary.push_str(" (Zeit TBD)");
        }

        if let Some(name) = self.venue_name() {
            summary.push_str(&format!(" ({})", name));
        }

        summary
    }
}

/// Game details embedded in a [`CalendarEvent`] for result rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameInfo {
    /// Home team name.
    pub home: String,
    /// Guest team name.
    pub guest: String,
    /// Upstream match identifier.
    pub match_id: u64,
    /// Result, if available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<GameResult>,
}

impl From<&Game> for GameInfo {
    fn from(game: &Game) -> Self {
        Self {
            home: game.home.clone(),
            guest: game.guest.clone(),
            match_id: game.match_id,
            result: game.result,
        }
    }
}

/// A normalized calendar event.
///
/// Produced from games (for team timelines) and from decoded ICS documents
/// (for public calendars). For all-day events `end` is the inclusive last
/// day, never the exclusive ICS boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// The event title.
    pub summary: String,
    /// When the event starts.
    #[serde(rename = "startDate")]
    pub start: EventTime,
    /// When the event ends.
    #[serde(rename = "endDate")]
    pub end: EventTime,
    /// Location, free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Description, free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Venue name annotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue_name: Option<String>,
    /// The game this event was built from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game: Option<GameInfo>,
}

impl CalendarEvent {
    /// Creates a new event.
    ///
    /// An `end` before `start` is raised to `start`.
    pub fn new(summary: impl Into<String>, start: EventTime, end: EventTime) -> Self {
        let end = if end < start { start.clone() } else { end };
        Self {
            summary: summary.into(),
            start,
            end,
            location: None,
            description: None,
            venue_name: None,
            game: None,
        }
    }

    /// Returns true if this is an all-day event.
    pub fn is_all_day(&self) -> bool {
        self.start.is_all_day()
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder method to set the venue name.
    pub fn with_venue_name(mut self, name: impl Into<String>) -> Self {
        self.venue_name = Some(name.into());
        self
    }

    /// Builder method to attach game details.
    pub fn with_game(mut self, game: GameInfo) -> Self {
        self.game = Some(game);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_game() -> Game {
        Game::new(4711, "2024-01-15", "18:00", "BC Lions Moabit 1", "TuS Lichterfelde")
    }

    fn hall() -> Venue {
        Venue::new()
            .with_name("Halle Moabit")
            .with_street("Turmstr. 75")
            .with_city("10551", "Berlin")
    }

    mod summary {
        use super::*;

        #[test]
        fn plain() {
            assert_eq!(
                sample_game().summary(),
                "BC Lions Moabit 1 vs TuS Lichterfelde"
            );
        }

        #[test]
        fn full_ordering() {
            let game = Game::new(1, "2024-01-15", "23:59", "A", "B")
                .with_result(GameResult::scored(78, 65))
                .with_venue(hall());
            assert_eq!(game.summary(), "A vs B 78:65 (Zeit TBD) (Halle Moabit)");
        }

        #[test]
        fn finished_without_score() {
            let game = sample_game().with_result(GameResult::finished());
            assert_eq!(
                game.summary(),
                "BC Lions Moabit 1 vs TuS Lichterfelde (Beendet)"
            );
        }

        #[test]
        fn unfinished_result_adds_nothing() {
            let game = sample_game().with_result(GameResult::default());
            assert_eq!(game.summary(), "BC Lions Moabit 1 vs TuS Lichterfelde");
        }

        #[test]
        fn blank_venue_name_is_ignored() {
            let game = sample_game().with_venue(Venue::new().with_name("  "));
            assert_eq!(game.summary(), "BC Lions Moabit 1 vs TuS Lichterfelde");
        }
    }

    mod venue {
        use super::*;

        #[test]
        fn plain_address_drops_missing_parts() {
            assert_eq!(
                hall().plain_address(),
                Some("Turmstr. 75, 10551, Berlin".to_string())
            );
            let partial = Venue::new().with_street("Turmstr. 75");
            assert_eq!(partial.plain_address(), Some("Turmstr. 75".to_string()));
            assert_eq!(Venue::new().plain_address(), None);
        }
    }

    mod calendar_event {
        use super::*;

        fn day(d: u32) -> EventTime {
            EventTime::from_date(NaiveDate::from_ymd_opt(2025, 10, d).unwrap())
        }

        #[test]
        fn end_never_precedes_start() {
            let event = CalendarEvent::new("Backwards", day(20), day(18));
            assert_eq!(event.end, day(20));
        }

        #[test]
        fn json_shape() {
            let game = sample_game().with_result(GameResult::scored(70, 60));
            let event = CalendarEvent::new("Turnier", day(20), day(23))
                .with_venue_name("Halle")
                .with_game(GameInfo::from(&game));

            let json = serde_json::to_value(&event).unwrap();
            assert_eq!(json["startDate"]["value"], "2025-10-20");
            assert_eq!(json["endDate"]["value"], "2025-10-23");
            assert_eq!(json["venueName"], "Halle");
            assert_eq!(json["game"]["matchId"], 4711);
            assert_eq!(json["game"]["result"]["homeScore"], 70);
            assert!(json.get("location").is_none());

            let parsed: CalendarEvent = serde_json::from_value(json).unwrap();
            assert_eq!(parsed, event);
        }
    }
}
