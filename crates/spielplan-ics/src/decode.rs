//! iCalendar decoding.
//!
//! Public calendars are decoded block by block: the document is unfolded,
//! split into `VEVENT` blocks and every block is parsed on its own, so one
//! broken event never takes the rest of the calendar down with it.
//!
//! All-day events are stored with an *exclusive* `DTEND` in iCalendar
//! (`DTSTART;VALUE=DATE:20251208` / `DTEND;VALUE=DATE:20251209` is a single
//! day). The decoder turns that into an inclusive last day, which is what
//! the timeline consumers display.

use chrono::{Duration, NaiveDate};
use icalendar::{
    Calendar, CalendarComponent, CalendarDateTime, Component, DatePerhapsTime, Event,
};
use spielplan_core::time::EventTime;
use spielplan_core::{CalendarEvent, CodecError, CodecResult};
use tracing::{debug, warn};

const BEGIN_CALENDAR: &str = "BEGIN:VCALENDAR";
const BEGIN_EVENT: &str = "BEGIN:VEVENT";
const END_EVENT: &str = "END:VEVENT";
const BEGIN_ALARM: &str = "BEGIN:VALARM";
const END_ALARM: &str = "END:VALARM";

/// Joins folded continuation lines (lines starting with a space or tab).
pub fn unfold_lines(ics: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for raw in ics.lines() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        match line.strip_prefix([' ', '\t']) {
            Some(rest) if !lines.is_empty() => {
                if let Some(last) = lines.last_mut() {
                    last.push_str(rest);
                }
            }
            _ => lines.push(line.to_string()),
        }
    }
    lines
}

/// Reverses text escaping (`\,` `\;` `\n` `\N` `\\`).
pub fn unescape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn is_marker(line: &str, marker: &str) -> bool {
    line.trim().eq_ignore_ascii_case(marker)
}

/// Byte offset of the first `:` outside a quoted parameter value.
fn value_separator(line: &str) -> Option<usize> {
    let mut quoted = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => quoted = !quoted,
            ':' if !quoted => return Some(i),
            _ => {}
        }
    }
    None
}

/// Blank lines and properties without a value (`LOCATION:`) carry nothing.
fn has_empty_value(line: &str) -> bool {
    let line = line.trim_end();
    line.is_empty() || value_separator(line).is_some_and(|i| i + 1 == line.len())
}

/// Raw, still escaped value of the first property called `name`.
fn raw_property<'a>(block: &[&'a str], name: &str) -> Option<&'a str> {
    block.iter().copied().find_map(|line| {
        let separator = value_separator(line)?;
        let key = line[..separator].split(';').next()?;
        key.trim()
            .eq_ignore_ascii_case(name)
            .then(|| &line[separator + 1..])
    })
}

/// Parses an RFC 5545 `DURATION` value (`PT2H`, `P1D`, `-PT15M`).
fn parse_duration(value: &str) -> Option<Duration> {
    let value = value.trim();
    let (negative, value) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    let duration: std::time::Duration = iso8601::duration(value).ok()?.into();
    let duration = Duration::from_std(duration).ok()?;
    Some(if negative { -duration } else { duration })
}

/// Splits unfolded lines into `VEVENT` blocks, alarms and empty properties
/// removed.
///
/// A block that is never closed is dropped.
fn split_event_blocks(lines: &[String]) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current: Option<Vec<&str>> = None;
    let mut in_alarm = false;

    for line in lines {
        let line = line.as_str();
        if is_marker(line, BEGIN_EVENT) {
            if current.is_some() {
                warn!("Unterminated VEVENT block, skipping");
            }
            current = Some(vec![BEGIN_EVENT]);
            in_alarm = false;
        } else if is_marker(line, END_EVENT) {
            if let Some(mut block) = current.take() {
                block.push(END_EVENT);
                blocks.push(block);
            }
        } else if let Some(ref mut block) = current {
            if is_marker(line, BEGIN_ALARM) {
                in_alarm = true;
            } else if is_marker(line, END_ALARM) {
                in_alarm = false;
            } else if !in_alarm && !has_empty_value(line) {
                block.push(line);
            }
        }
    }

    if current.is_some() {
        warn!("Unterminated VEVENT block at end of document, skipping");
    }

    blocks
}

/// Decodes a calendar document into normalized events.
///
/// # Errors
///
/// Returns [`CodecError::MalformedDocument`] when the text has no
/// `VCALENDAR` envelope. Individual events that cannot be decoded are
/// skipped with a warning.
pub fn decode(ics: &str) -> CodecResult<Vec<CalendarEvent>> {
    let lines = unfold_lines(ics);
    if !lines.iter().any(|line| is_marker(line, BEGIN_CALENDAR)) {
        return Err(CodecError::malformed_document("missing BEGIN:VCALENDAR"));
    }

    let blocks = split_event_blocks(&lines);
    let total = blocks.len();
    let events: Vec<CalendarEvent> = blocks
        .iter()
        .enumerate()
        .filter_map(|(index, block)| decode_block(index, block))
        .collect();

    debug!(
        blocks = total,
        decoded = events.len(),
        "Decoded calendar document"
    );

    Ok(events)
}

fn decode_block(index: usize, block: &[&str]) -> Option<CalendarEvent> {
    let document = format!(
        "BEGIN:VCALENDAR\r\nVERSION:2.0\r\n{}\r\nEND:VCALENDAR\r\n",
        block.join("\r\n")
    );

    let calendar = match document.parse::<Calendar>() {
        Ok(calendar) => calendar,
        Err(e) => {
            warn!(block = index, error = %e, "Failed to parse VEVENT block, skipping");
            return None;
        }
    };

    let event = calendar.iter().find_map(|component| match component {
        CalendarComponent::Event(event) => Some(event),
        _ => None,
    })?;

    convert_event(index, event, block)
}

fn convert_event(index: usize, event: &Event, block: &[&str]) -> Option<CalendarEvent> {
    let Some(start) = event.get_start().map(convert_boundary) else {
        warn!(
            block = index,
            uid = ?event.get_uid(),
            "VEVENT without usable DTSTART, skipping"
        );
        return None;
    };

    let end = event.get_end().map(convert_boundary).or_else(|| {
        let duration = event.property_value("DURATION").and_then(parse_duration)?;
        offset(&start, duration)
    });

    let end = match (&start, end) {
        (_, None) => start.clone(),
        (EventTime::AllDay(first), Some(end)) => {
            EventTime::AllDay(inclusive_last_day(*first, end))
        }
        (_, Some(end)) => end,
    };

    if event.property_value("RRULE").is_some() {
        debug!(block = index, "Recurring event decoded as a single instance");
    }

    // Unescaped from the raw lines; the parser turns `\\n` into a newline.
    let summary = raw_property(block, "SUMMARY")
        .map(unescape_text)
        .unwrap_or_default();
    let mut decoded = CalendarEvent::new(summary, start, end);

    if let Some(location) = non_empty(raw_property(block, "LOCATION")) {
        decoded = decoded.with_location(unescape_text(location));
    }
    if let Some(description) = non_empty(raw_property(block, "DESCRIPTION")) {
        decoded = decoded.with_description(unescape_text(description));
    }

    Some(decoded)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// `start` shifted by `duration`; all-day starts move by whole days.
fn offset(start: &EventTime, duration: Duration) -> Option<EventTime> {
    Some(match start {
        EventTime::DateTime(dt) => EventTime::from_utc(dt.checked_add_signed(duration)?),
        EventTime::Local(dt) => EventTime::from_local(dt.checked_add_signed(duration)?),
        EventTime::AllDay(date) => EventTime::from_date(date.checked_add_signed(duration)?),
    })
}

/// Converts the exclusive end of an all-day event into its inclusive last
/// day, never earlier than `first`.
fn inclusive_last_day(first: NaiveDate, end: EventTime) -> NaiveDate {
    let last = match end {
        EventTime::AllDay(exclusive) => exclusive - Duration::days(1),
        other => other.date(),
    };
    last.max(first)
}

fn convert_boundary(value: DatePerhapsTime) -> EventTime {
    match value {
        DatePerhapsTime::Date(date) => EventTime::from_date(date),
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(dt)) => EventTime::from_utc(dt),
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(naive)) => {
            EventTime::from_local(naive)
        }
        // Wall-clock time in the named zone; no zone database is consulted.
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, .. }) => {
            EventTime::from_local(date_time)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDateTime, TimeZone, Utc};

    fn calendar(events: &str) -> String {
        format!(
            "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//Test//Test//EN\r\n{}END:VCALENDAR\r\n",
            events
        )
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, min, 0).unwrap()
    }

    mod lines {
        use super::*;

        #[test]
        fn unfolds_continuations() {
            let lines = unfold_lines("SUMMARY:Saison\r\n eroeffnung\r\n\tim Park\r\nUID:1\r\n");
            assert_eq!(lines, vec!["SUMMARY:Saisoneroeffnungim Park", "UID:1"]);
        }

        #[test]
        fn accepts_bare_newlines() {
            let lines = unfold_lines("BEGIN:VCALENDAR\nEND:VCALENDAR\n");
            assert_eq!(lines, vec!["BEGIN:VCALENDAR", "END:VCALENDAR"]);
        }

        #[test]
        fn unescapes_text() {
            assert_eq!(unescape_text("Turmstr. 75\\, 10551 Berlin"), "Turmstr. 75, 10551 Berlin");
            assert_eq!(unescape_text("a\\;b\\nc\\\\d"), "a;b\nc\\d");
            assert_eq!(unescape_text("trailing\\"), "trailing\\");
        }

        #[test]
        fn blocks_drop_alarms_empty_values_and_unterminated_events() {
            let lines = unfold_lines(
                "BEGIN:VEVENT\nUID:1\nLOCATION:\nBEGIN:VALARM\nTRIGGER:-PT15M\nEND:VALARM\nEND:VEVENT\nBEGIN:VEVENT\nUID:2\n",
            );
            let blocks = split_event_blocks(&lines);
            assert_eq!(blocks, vec![vec!["BEGIN:VEVENT", "UID:1", "END:VEVENT"]]);
        }

        #[test]
        fn empty_value_means_nothing_after_the_separator() {
            assert!(has_empty_value("LOCATION:"));
            assert!(has_empty_value("LOCATION;ALTREP=\"cid:halle\":  "));
            assert!(!has_empty_value("SUMMARY:Treffpunkt:"));
            assert!(!has_empty_value("DESCRIPTION;LANGUAGE=de:Agenda:"));
            assert!(!has_empty_value("LOCATION;ALTREP=\"cid:halle\":Halle"));
        }

        #[test]
        fn raw_values_by_name() {
            let block = [
                "BEGIN:VEVENT",
                "SUMMARY;LANGUAGE=de:C:\\temp",
                "X-SUMMARY:nicht gemeint",
                "END:VEVENT",
            ];
            assert_eq!(raw_property(&block, "summary"), Some("C:\\temp"));
            assert_eq!(raw_property(&block, "LOCATION"), None);
        }

        #[test]
        fn durations() {
            assert_eq!(parse_duration("PT2H"), Some(Duration::hours(2)));
            assert_eq!(parse_duration("P1DT30M"), Some(Duration::minutes(24 * 60 + 30)));
            assert_eq!(parse_duration("-PT15M"), Some(Duration::minutes(-15)));
            assert_eq!(parse_duration("zwei Stunden"), None);
        }
    }

    mod all_day {
        use super::*;

        #[test]
        fn single_day_event() {
            let ics = calendar(
                "BEGIN:VEVENT\r\nUID:a@example.com\r\nDTSTART;VALUE=DATE:20251208\r\nDTEND;VALUE=DATE:20251209\r\nSUMMARY:Weihnachtsfeier\r\nEND:VEVENT\r\n",
            );
            let events = decode(&ics).unwrap();
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].start, EventTime::from_date(date(2025, 12, 8)));
            assert_eq!(events[0].end, events[0].start);
            assert!(events[0].is_all_day());
        }

        #[test]
        fn multi_day_event() {
            let ics = calendar(
                "BEGIN:VEVENT\r\nUID:b@example.com\r\nDTSTART;VALUE=DATE:20251020\r\nDTEND;VALUE=DATE:20251024\r\nSUMMARY:Herbstferien\r\nEND:VEVENT\r\n",
            );
            let events = decode(&ics).unwrap();
            assert_eq!(events[0].start, EventTime::from_date(date(2025, 10, 20)));
            assert_eq!(events[0].end, EventTime::from_date(date(2025, 10, 23)));
        }

        #[test]
        fn missing_or_degenerate_end() {
            let ics = calendar(
                "BEGIN:VEVENT\r\nUID:c@example.com\r\nDTSTART;VALUE=DATE:20251208\r\nSUMMARY:Ohne Ende\r\nEND:VEVENT\r\n\
                 BEGIN:VEVENT\r\nUID:d@example.com\r\nDTSTART;VALUE=DATE:20251208\r\nDTEND;VALUE=DATE:20251208\r\nSUMMARY:Gleich\r\nEND:VEVENT\r\n",
            );
            let events = decode(&ics).unwrap();
            assert_eq!(events.len(), 2);
            for event in &events {
                assert_eq!(event.end, EventTime::from_date(date(2025, 12, 8)));
            }
        }

        #[test]
        fn duration_in_days() {
            let ics = calendar(
                "BEGIN:VEVENT\r\nUID:m@example.com\r\nDTSTART;VALUE=DATE:20251020\r\nDURATION:P1D\r\nSUMMARY:Turnier\r\nEND:VEVENT\r\n\
                 BEGIN:VEVENT\r\nUID:n@example.com\r\nDTSTART;VALUE=DATE:20251020\r\nDURATION:P3D\r\nSUMMARY:Camp\r\nEND:VEVENT\r\n",
            );
            let events = decode(&ics).unwrap();
            assert_eq!(events[0].end, EventTime::from_date(date(2025, 10, 20)));
            assert_eq!(events[1].end, EventTime::from_date(date(2025, 10, 22)));
        }
    }

    mod timed {
        use super::*;

        #[test]
        fn utc_and_floating() {
            let ics = calendar(
                "BEGIN:VEVENT\r\nUID:e@example.com\r\nDTSTART:20250205T100000Z\r\nDTEND:20250205T110000Z\r\nSUMMARY:Vorstand\r\nEND:VEVENT\r\n\
                 BEGIN:VEVENT\r\nUID:f@example.com\r\nDTSTART:20240115T180000\r\nDTEND:20240115T200000\r\nSUMMARY:Training\r\nEND:VEVENT\r\n",
            );
            let events = decode(&ics).unwrap();
            assert_eq!(
                events[0].start,
                EventTime::from_utc(Utc.with_ymd_and_hms(2025, 2, 5, 10, 0, 0).unwrap())
            );
            assert_eq!(
                events[0].end,
                EventTime::from_utc(Utc.with_ymd_and_hms(2025, 2, 5, 11, 0, 0).unwrap())
            );
            assert_eq!(events[1].start, EventTime::from_local(local(2024, 1, 15, 18, 0)));
            assert_eq!(events[1].end, EventTime::from_local(local(2024, 1, 15, 20, 0)));
        }

        #[test]
        fn tzid_keeps_wall_clock() {
            let ics = calendar(
                "BEGIN:VEVENT\r\nUID:g@example.com\r\nDTSTART;TZID=Europe/Berlin:20240115T180000\r\nDTEND;TZID=Europe/Berlin:20240115T193000\r\nSUMMARY:Spiel\r\nEND:VEVENT\r\n",
            );
            let events = decode(&ics).unwrap();
            assert_eq!(events[0].start, EventTime::from_local(local(2024, 1, 15, 18, 0)));
            assert_eq!(events[0].end, EventTime::from_local(local(2024, 1, 15, 19, 30)));
        }

        #[test]
        fn text_fields_are_unescaped() {
            let ics = calendar(
                "BEGIN:VEVENT\r\nUID:h@example.com\r\nDTSTART:20240115T180000\r\nSUMMARY:Lions vs Alba\r\nLOCATION:Turmstr. 75\\, 10551 Berlin\r\nDESCRIPTION:Venue: Halle\\nAddress: Turmstr. 75\r\nEND:VEVENT\r\n",
            );
            let events = decode(&ics).unwrap();
            assert_eq!(events[0].summary, "Lions vs Alba");
            assert_eq!(
                events[0].location.as_deref(),
                Some("Turmstr. 75, 10551 Berlin")
            );
            assert_eq!(
                events[0].description.as_deref(),
                Some("Venue: Halle\nAddress: Turmstr. 75")
            );
            assert_eq!(events[0].end, events[0].start);
        }

        #[test]
        fn trailing_colons_survive() {
            let ics = calendar(
                "BEGIN:VEVENT\r\nUID:i@example.com\r\nDTSTART:20240115T180000\r\nSUMMARY:Treffpunkt:\r\nDESCRIPTION:Agenda:\r\nEND:VEVENT\r\n",
            );
            let events = decode(&ics).unwrap();
            assert_eq!(events[0].summary, "Treffpunkt:");
            assert_eq!(events[0].description.as_deref(), Some("Agenda:"));
        }

        #[test]
        fn escaped_backslashes_are_kept() {
            let ics = calendar(
                "BEGIN:VEVENT\r\nUID:j@example.com\r\nDTSTART:20240115T180000\r\nSUMMARY:C:\\\\temp\\\\new\r\nDESCRIPTION:a\\\\nb\r\nEND:VEVENT\r\n",
            );
            let events = decode(&ics).unwrap();
            assert_eq!(events[0].summary, "C:\\temp\\new");
            assert_eq!(events[0].description.as_deref(), Some("a\\nb"));
        }

        #[test]
        fn duration_without_end() {
            let ics = calendar(
                "BEGIN:VEVENT\r\nUID:k@example.com\r\nDTSTART:20240115T180000\r\nDURATION:PT2H\r\nSUMMARY:Training\r\nEND:VEVENT\r\n\
                 BEGIN:VEVENT\r\nUID:l@example.com\r\nDTSTART:20250205T100000Z\r\nDURATION:PT1H30M\r\nSUMMARY:Vorstand\r\nEND:VEVENT\r\n",
            );
            let events = decode(&ics).unwrap();
            assert_eq!(events[0].end, EventTime::from_local(local(2024, 1, 15, 20, 0)));
            assert_eq!(
                events[1].end,
                EventTime::from_utc(Utc.with_ymd_and_hms(2025, 2, 5, 11, 30, 0).unwrap())
            );
        }
    }

    mod robustness {
        use super::*;

        #[test]
        fn skips_blocks_without_start() {
            let ics = calendar(
                "BEGIN:VEVENT\r\nUID:broken@example.com\r\nSUMMARY:Kein Start\r\nEND:VEVENT\r\n\
                 BEGIN:VEVENT\r\nUID:bad-date@example.com\r\nDTSTART:kein-datum\r\nSUMMARY:Kaputt\r\nEND:VEVENT\r\n\
                 BEGIN:VEVENT\r\nUID:ok@example.com\r\nDTSTART:20240115T180000\r\nSUMMARY:Gut\r\nEND:VEVENT\r\n",
            );
            let events = decode(&ics).unwrap();
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].summary, "Gut");
        }

        #[test]
        fn empty_calendar() {
            assert!(decode(&calendar("")).unwrap().is_empty());
        }

        #[test]
        fn missing_envelope_is_an_error() {
            let err = decode("this is not a calendar").unwrap_err();
            assert!(matches!(err, CodecError::MalformedDocument { .. }));
            assert!(decode("").is_err());
        }
    }
}
