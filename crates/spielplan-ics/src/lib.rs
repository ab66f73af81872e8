//! iCalendar encoding/decoding and JSON event timelines.
//!
//! - [`CalendarEncoder`] - Games (or normalized events) to `VCALENDAR` text
//! - [`decode`] - `VCALENDAR` text to normalized [`CalendarEvent`]s
//! - [`TeamSchedule`] / [`CalendarTimeline`] - JSON documents for the web frontend
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐                        ┌──────────────────┐
//! │  Game JSON  │                        │  Public ICS feed │
//! └──────┬──────┘                        └────────┬─────────┘
//!        │ EventEncoder                           │ decode()
//!        ▼                                        ▼
//! ┌─────────────┐                        ┌──────────────────┐
//! │  VEVENT     │                        │  CalendarEvent   │
//! └──────┬──────┘                        └────────┬─────────┘
//!        │ CalendarEncoder                        │
//!        ▼                                        ▼
//! ┌─────────────┐                        ┌──────────────────┐
//! │  <team>.ics │                        │ CalendarTimeline │
//! └─────────────┘                        └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use spielplan_core::{CodecConfig, Game};
//! use spielplan_ics::{CalendarEncoder, decode};
//!
//! let games = vec![Game::new(4711, "2024-01-15", "18:00", "Lions", "Alba")];
//! let encoded = CalendarEncoder::new(CodecConfig::default()).encode_games("Herren 1", &games);
//! let events = decode(&encoded.ics)?;
//! ```

pub mod decode;
pub mod encode;
pub mod timeline;

pub use decode::{decode, unescape_text, unfold_lines};
pub use encode::{CalendarEncoder, EncodedCalendar, EventEncoder, SkippedGame, escape_text};
pub use spielplan_core::CalendarEvent;
pub use timeline::{
    CalendarSource, CalendarTimeline, SourceError, TeamSchedule, games_to_events,
    public_calendar_url, source_id,
};
