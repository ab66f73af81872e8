//! `spielplan decode`: an iCalendar file to a JSON event timeline.

use std::path::PathBuf;

use chrono::Utc;
use spielplan_ics::{CalendarSource, CalendarTimeline, source_id};

use super::{file_stem, read_text};
use crate::error::{CliError, CliResult};

/// Arguments of the decode command.
#[derive(Debug, Clone)]
pub struct DecodeArgs {
    pub ics: PathBuf,
    pub label: Option<String>,
    pub cal_id: Option<String>,
}

/// Decodes the calendar file into a timeline.
///
/// A file without a calendar envelope is an error here, unlike the lenient
/// timeline builder used for batches of feeds.
pub async fn timeline(args: &DecodeArgs) -> CliResult<CalendarTimeline> {
    let ics = read_text(&args.ics).await?;
    let source = CalendarSource {
        label: args.label.clone().unwrap_or_else(|| file_stem(&args.ics)),
        cal_id: args.cal_id.clone().unwrap_or_default(),
    };
    let id = source_id(&args.ics.to_string_lossy());

    Ok(CalendarTimeline::try_from_ics(&source, id, &ics, Utc::now())?)
}

/// Runs the decode command, printing the timeline as JSON.
pub async fn run(args: DecodeArgs) -> CliResult<()> {
    let timeline = timeline(&args).await?;
    let json =
        serde_json::to_string_pretty(&timeline).map_err(|e| CliError::json(&args.ics, e))?;
    println!("{}", json);
    Ok(())
}
