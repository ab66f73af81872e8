//! Core types: games, fixtures, event times, results, identifiers, team discovery

pub mod config;
pub mod discovery;
pub mod error;
pub mod event;
pub mod fixture;
pub mod identifier;
pub mod result;
pub mod time;
pub mod tracing;

pub use config::CodecConfig;
pub use discovery::{
    TeamCandidate, TeamConfig, TeamRef, dedupe, find_team, should_skip_league, team_configs,
};
pub use error::{CodecError, CodecResult};
pub use event::{CalendarEvent, Game, GameInfo, GameResult, Venue};
pub use fixture::{game_from_record, involves_team};
pub use identifier::{Abbreviator, AbbreviationRule, abbreviate, sanitize_for_filename};
pub use result::{GameOutcome, ResultExtractor, ResultStrategy};
pub use time::{EventTime, add_duration, local_datetime, to_local_ics_timestamp};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
