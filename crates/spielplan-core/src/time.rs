//! Date and time normalization for fixtures and calendar events.
//!
//! Upstream fixtures carry their kickoff as two loose text fields: a date in
//! either `YYYY-MM-DD` or `DD.MM.YYYY` form and an `HH:MM` time. This module
//! turns those into the ICS local-time form `YYYYMMDDTHHMMSS` and provides
//! [`EventTime`], the start/end representation shared by the encoder and the
//! decoder.
//!
//! All game times are venue wall-clock times. No timezone conversion is
//! performed and local timestamps never carry a `Z` suffix.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CodecError, CodecResult};

/// Kickoff time used upstream when the real time has not been announced yet.
pub const PLACEHOLDER_TIME: &str = "23:59";

/// Returns true if `time` is the "time not yet announced" sentinel.
pub fn is_placeholder_time(time: &str) -> bool {
    time.trim() == PLACEHOLDER_TIME
}

/// Parses a fixture date.
///
/// The separator decides the component order: `-` means year-month-day,
/// `.` means day-month-year. Anything else is rejected.
pub fn parse_game_date(date: &str) -> CodecResult<NaiveDate> {
    let date = date.trim();

    let (year, month, day) = if date.contains('-') {
        let [y, m, d] = split_three(date, '-')?;
        (y, m, d)
    } else if date.contains('.') {
        let [d, m, y] = split_three(date, '.')?;
        (y, m, d)
    } else {
        return Err(CodecError::unsupported_date(date));
    };

    let year = i32::try_from(year).map_err(|_| CodecError::unsupported_date(date))?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| CodecError::unsupported_date(date))
}

fn split_three(date: &str, separator: char) -> CodecResult<[u32; 3]> {
    let parts: Vec<&str> = date.split(separator).collect();
    if parts.len() != 3 {
        return Err(CodecError::unsupported_date(date));
    }

    let mut out = [0u32; 3];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part
            .trim()
            .parse()
            .map_err(|_| CodecError::unsupported_date(date))?;
    }
    Ok(out)
}

/// Parses an `HH:MM` kickoff time. Trailing seconds (`HH:MM:SS`) are accepted
/// and discarded.
pub fn parse_game_time(time: &str) -> CodecResult<NaiveTime> {
    let time = time.trim();
    let parts: Vec<&str> = time.split(':').collect();
    let [hours, minutes] = match parts.as_slice() {
        [h, m] | [h, m, _] => [*h, *m],
        _ => return Err(CodecError::unsupported_time(time)),
    };

    let hours: u32 = hours
        .parse()
        .map_err(|_| CodecError::unsupported_time(time))?;
    let minutes: u32 = minutes
        .parse()
        .map_err(|_| CodecError::unsupported_time(time))?;

    NaiveTime::from_hms_opt(hours, minutes, 0).ok_or_else(|| CodecError::unsupported_time(time))
}

/// Returns the wall-clock kickoff of a fixture.
///
/// The placeholder time maps to midnight of the game day.
pub fn local_datetime(date: &str, time: &str) -> CodecResult<NaiveDateTime> {
    let day = parse_game_date(date)?;
    if is_placeholder_time(time) {
        return Ok(day.and_time(NaiveTime::MIN));
    }
    Ok(day.and_time(parse_game_time(time)?))
}

/// Converts a fixture date and time to the ICS local form `YYYYMMDDTHHMMSS`.
///
/// The placeholder time `23:59` is emitted as `T000000`; the "to be
/// announced" semantic travels in the event summary, not in the timestamp.
///
/// # Errors
///
/// Returns [`CodecError::UnsupportedDateFormat`] if the date has neither a
/// `-` nor a `.` separator (or is not a real calendar date), and
/// [`CodecError::UnsupportedTimeFormat`] for an unreadable time.
pub fn to_local_ics_timestamp(date: &str, time: &str) -> CodecResult<String> {
    Ok(format_ics_local(&local_datetime(date, time)?))
}

/// Adds whole hours to an `HH:MM` time without ever crossing midnight.
///
/// Results at or past 24:00 are clamped to `23:59`. The placeholder time is
/// passed through unchanged.
pub fn add_duration(time: &str, hours: u32) -> CodecResult<String> {
    if is_placeholder_time(time) {
        return Ok(PLACEHOLDER_TIME.to_string());
    }

    let parsed = parse_game_time(time)?;
    let total = parsed.hour().saturating_add(hours);
    if total >= 24 {
        return Ok(PLACEHOLDER_TIME.to_string());
    }

    Ok(format!("{:02}:{:02}", total, parsed.minute()))
}

/// Returns the ICS local end timestamp of a fixture lasting `hours`.
///
/// An end clamped by [`add_duration`] is written as `T235900` of the game
/// day, so it never precedes the start. A placeholder start gets an end
/// equal to the start.
pub fn to_local_ics_end_timestamp(date: &str, time: &str, hours: u32) -> CodecResult<String> {
    let end_time = add_duration(time, hours)?;
    if !is_placeholder_time(time) && is_placeholder_time(&end_time) {
        let day = parse_game_date(date)?;
        return Ok(format!("{}T235900", format_ics_date(&day)));
    }
    to_local_ics_timestamp(date, &end_time)
}

/// Formats a wall-clock time as an ICS local timestamp (`YYYYMMDDTHHMMSS`).
pub fn format_ics_local(dt: &NaiveDateTime) -> String {
    dt.format("%Y%m%dT%H%M%S").to_string()
}

/// Formats a UTC instant as an ICS UTC timestamp (`YYYYMMDDTHHMMSSZ`).
pub fn format_ics_utc(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Formats a date as an ICS `DATE` value (`YYYYMMDD`).
pub fn format_ics_date(date: &NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// The start or end of a calendar event.
///
/// Calendar events come in three flavours:
/// - **DateTime**: an absolute instant (ICS values with a `Z` suffix)
/// - **Local**: a floating wall-clock time (fixtures, `TZID` values)
/// - **AllDay**: a date without a time of day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum EventTime {
    /// An absolute instant, stored in UTC.
    DateTime(DateTime<Utc>),
    /// A wall-clock time without timezone information.
    Local(NaiveDateTime),
    /// An all-day event date.
    AllDay(NaiveDate),
}

impl EventTime {
    /// Creates a new `EventTime::DateTime` from a UTC datetime.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self::DateTime(dt)
    }

    /// Creates a new `EventTime::Local` from a wall-clock datetime.
    pub fn from_local(dt: NaiveDateTime) -> Self {
        Self::Local(dt)
    }

    /// Creates a new `EventTime::AllDay` from a date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self::AllDay(date)
    }

    /// Returns `true` if this is an all-day event time.
    pub fn is_all_day(&self) -> bool {
        matches!(self, Self::AllDay(_))
    }

    /// Returns `true` if this carries a time of day.
    pub fn is_datetime(&self) -> bool {
        !self.is_all_day()
    }

    /// Returns the date if this is an `AllDay` variant.
    pub fn as_date(&self) -> Option<&NaiveDate> {
        match self {
            Self::AllDay(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the calendar date of this event time.
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::DateTime(dt) => dt.date_naive(),
            Self::Local(dt) => dt.date(),
            Self::AllDay(date) => *date,
        }
    }

    /// Returns a naive timestamp used for ordering.
    ///
    /// UTC instants compare by their UTC wall clock, all-day dates at midnight.
    pub fn sort_key(&self) -> NaiveDateTime {
        match self {
            Self::DateTime(dt) => dt.naive_utc(),
            Self::Local(dt) => *dt,
            Self::AllDay(date) => date.and_time(NaiveTime::MIN),
        }
    }

    fn variant_rank(&self) -> u8 {
        match self {
            Self::AllDay(_) => 0,
            Self::Local(_) => 1,
            Self::DateTime(_) => 2,
        }
    }
}

impl PartialOrd for EventTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EventTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key()
            .cmp(&other.sort_key())
            .then_with(|| self.variant_rank().cmp(&other.variant_rank()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    mod dates {
        use super::*;

        #[test]
        fn iso_form() {
            assert_eq!(parse_game_date("2024-01-15").unwrap(), date(2024, 1, 15));
        }

        #[test]
        fn day_first_form() {
            assert_eq!(parse_game_date("15.01.2024").unwrap(), date(2024, 1, 15));
            assert_eq!(parse_game_date("5.1.2024").unwrap(), date(2024, 1, 5));
        }

        #[test]
        fn rejects_other_separators() {
            let err = parse_game_date("2024/01/15").unwrap_err();
            assert_eq!(err, CodecError::unsupported_date("2024/01/15"));
            assert!(parse_game_date("").is_err());
        }

        #[test]
        fn rejects_impossible_dates() {
            assert!(parse_game_date("2024-02-30").unwrap_err().is_unsupported_format());
            assert!(parse_game_date("2024-01").is_err());
            assert!(parse_game_date("aa.bb.cccc").is_err());
        }
    }

    mod ics_timestamps {
        use super::*;

        #[test]
        fn iso_date_and_time() {
            assert_eq!(
                to_local_ics_timestamp("2024-01-15", "18:00").unwrap(),
                "20240115T180000"
            );
        }

        #[test]
        fn day_first_date_is_padded() {
            assert_eq!(
                to_local_ics_timestamp("5.3.2025", "9:30").unwrap(),
                "20250305T093000"
            );
        }

        #[test]
        fn placeholder_time_becomes_midnight() {
            assert_eq!(
                to_local_ics_timestamp("2024-01-15", "23:59").unwrap(),
                "20240115T000000"
            );
        }

        #[test]
        fn no_utc_suffix() {
            let ts = to_local_ics_timestamp("01.12.2024", "14:15").unwrap();
            assert!(!ts.ends_with('Z'));
        }

        #[test]
        fn unsupported_date_is_an_error() {
            let err = to_local_ics_timestamp("20240115", "18:00").unwrap_err();
            assert!(matches!(err, CodecError::UnsupportedDateFormat { .. }));
        }

        #[test]
        fn unreadable_time_is_an_error() {
            let err = to_local_ics_timestamp("2024-01-15", "abends").unwrap_err();
            assert!(matches!(err, CodecError::UnsupportedTimeFormat { .. }));
        }

        #[test]
        fn utc_stamp_format() {
            let dt = Utc.with_ymd_and_hms(2025, 2, 5, 10, 0, 7).unwrap();
            assert_eq!(format_ics_utc(&dt), "20250205T100007Z");
        }
    }

    mod durations {
        use super::*;

        #[test]
        fn adds_hours() {
            assert_eq!(add_duration("18:00", 2).unwrap(), "20:00");
            assert_eq!(add_duration("9:45", 2).unwrap(), "11:45");
        }

        #[test]
        fn clamps_at_midnight() {
            assert_eq!(add_duration("23:00", 2).unwrap(), "23:59");
            assert_eq!(add_duration("22:00", 2).unwrap(), "23:59");
            assert_eq!(add_duration("21:59", 2).unwrap(), "23:59");
        }

        #[test]
        fn placeholder_passes_through() {
            assert_eq!(add_duration("23:59", 2).unwrap(), "23:59");
        }

        #[test]
        fn end_timestamps() {
            assert_eq!(
                to_local_ics_end_timestamp("2024-01-15", "18:00", 2).unwrap(),
                "20240115T200000"
            );
            assert_eq!(
                to_local_ics_end_timestamp("2024-03-02", "23:00", 2).unwrap(),
                "20240302T235900"
            );
            assert_eq!(
                to_local_ics_end_timestamp("2024-03-02", "23:59", 2).unwrap(),
                "20240302T000000"
            );
        }

        #[test]
        fn rejects_bad_time() {
            assert!(add_duration("24:00", 1).is_err());
            assert!(add_duration("18", 1).is_err());
        }
    }

    mod event_time {
        use super::*;

        #[test]
        fn kinds() {
            let all_day = EventTime::from_date(date(2025, 10, 20));
            assert!(all_day.is_all_day());
            assert_eq!(all_day.as_date(), Some(&date(2025, 10, 20)));

            let local = EventTime::from_local(date(2025, 10, 20).and_hms_opt(18, 0, 0).unwrap());
            assert!(local.is_datetime());
            assert_eq!(local.date(), date(2025, 10, 20));
        }

        #[test]
        fn ordering_mixes_kinds() {
            let day = EventTime::from_date(date(2025, 2, 5));
            let morning = EventTime::from_local(date(2025, 2, 5).and_hms_opt(9, 0, 0).unwrap());
            let utc = EventTime::from_utc(Utc.with_ymd_and_hms(2025, 2, 5, 12, 0, 0).unwrap());

            let mut times = vec![utc.clone(), morning.clone(), day.clone()];
            times.sort();
            assert_eq!(times, vec![day, morning, utc]);
        }

        #[test]
        fn serde_roundtrip() {
            let time = EventTime::from_local(date(2024, 1, 15).and_hms_opt(18, 0, 0).unwrap());
            let json = serde_json::to_string(&time).unwrap();
            assert_eq!(json, r#"{"type":"Local","value":"2024-01-15T18:00:00"}"#);
            let parsed: EventTime = serde_json::from_str(&json).unwrap();
            assert_eq!(time, parsed);
        }
    }
}
