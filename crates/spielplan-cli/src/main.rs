//! spielplan CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use spielplan_cli::cli::{Cli, Command, ConfigAction};
use spielplan_cli::commands::{self, decode::DecodeArgs, encode::EncodeArgs};
use spielplan_cli::config::CliConfig;
use spielplan_cli::error::CliResult;
use spielplan_core::tracing::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = if cli.debug {
        TracingConfig::cli_debug()
    } else if cli.json_logs {
        TracingConfig::batch()
    } else {
        TracingConfig::default()
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let config = match cli.config {
        Some(ref path) => CliConfig::load_from(path)?,
        None => CliConfig::load()?,
    };

    match cli.command {
        Command::Convert {
            fixtures,
            team,
            output,
        } => commands::convert::run(&fixtures, team.as_deref(), output).await,
        Command::Encode {
            games,
            name,
            output,
            schedule,
        } => {
            let args = EncodeArgs {
                games,
                name,
                output,
                schedule,
            };
            commands::encode::run(args, &config).await
        }
        Command::Decode { ics, label, cal_id } => {
            commands::decode::run(DecodeArgs { ics, label, cal_id }).await
        }
        Command::Abbreviate { names } => commands::abbreviate::run(&names),
        Command::Dedupe { files, raw } => commands::dedupe::run(&files, raw).await,
        Command::Config { action } => match action {
            ConfigAction::Dump => commands::config::dump(&config),
            ConfigAction::Path => commands::config::path(),
        },
    }
}
