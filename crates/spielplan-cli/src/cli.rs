//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// spielplan - fixture calendars and event timelines
#[derive(Debug, Parser)]
#[command(name = "spielplan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "SPIELPLAN_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Emit logs as JSON lines (for scheduled runs)
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert raw fixture records (JSON) into games JSON
    Convert {
        /// Fixture file: a JSON array of fixture records
        fixtures: PathBuf,

        /// Keep only games whose home or guest name contains this text
        #[arg(long, short)]
        team: Option<String>,

        /// Write the games here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Encode a team's games (JSON) into an iCalendar file
    Encode {
        /// Games file: a JSON array of games
        games: PathBuf,

        /// Team name used for the calendar title
        #[arg(long, short)]
        name: Option<String>,

        /// Write the calendar here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Also write the team schedule JSON here
        #[arg(long)]
        schedule: Option<PathBuf>,
    },

    /// Decode an iCalendar file into a JSON event timeline
    Decode {
        /// Calendar file
        ics: PathBuf,

        /// Timeline label (defaults to the file stem)
        #[arg(long, short)]
        label: Option<String>,

        /// Calendar id recorded in the timeline
        #[arg(long)]
        cal_id: Option<String>,
    },

    /// Print the short identifier of competition names
    Abbreviate {
        /// Competition names
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Merge team candidate lists and print team configurations
    Dedupe {
        /// Candidate files: JSON arrays of team candidates
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Print the merged candidates instead of team configurations
        #[arg(long)]
        raw: bool,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump the effective configuration as TOML
    Dump,
    /// Show the configuration file path
    Path,
}
