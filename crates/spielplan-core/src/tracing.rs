//! Log output setup shared by the spielplan binaries.
//!
//! ```ignore
//! use spielplan_core::tracing::{init_tracing, TracingConfig};
//!
//! // Interactive use
//! init_tracing(TracingConfig::default())?;
//!
//! // Scheduled batch runs, one JSON object per line
//! init_tracing(TracingConfig::batch())?;
//! ```

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Target prefix matching every spielplan crate.
const TARGET_PREFIX: &str = "spielplan";

/// Errors that can occur during tracing initialization.
#[derive(Debug, Error)]
pub enum TracingError {
    /// A global subscriber was already installed.
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    /// The filter directive did not parse.
    #[error("failed to parse env filter: {0}")]
    EnvFilter(#[from] tracing_subscriber::filter::ParseError),
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingOutputFormat {
    /// Multi-line, human-readable.
    Pretty,
    /// Single line per event.
    #[default]
    Compact,
    /// One JSON object per event.
    Json,
}

/// Configuration for [`init_tracing`].
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Level used when `RUST_LOG` is not set.
    pub default_level: Level,
    /// Output format.
    pub output_format: TracingOutputFormat,
    /// Include file and line.
    pub include_location: bool,
    /// Include timestamps.
    pub include_timestamp: bool,
    /// Explicit filter directive, overrides `RUST_LOG` and `default_level`.
    pub env_filter: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: Level::WARN,
            output_format: TracingOutputFormat::Compact,
            include_location: false,
            include_timestamp: false,
            env_filter: None,
        }
    }
}

impl TracingConfig {
    /// Verbose output for `--debug`.
    #[must_use]
    pub fn cli_debug() -> Self {
        Self {
            default_level: Level::DEBUG,
            include_location: true,
            ..Self::default()
        }
    }

    /// Structured output for scheduled calendar builds.
    #[must_use]
    pub fn batch() -> Self {
        Self {
            default_level: Level::INFO,
            output_format: TracingOutputFormat::Json,
            include_location: false,
            include_timestamp: true,
            env_filter: None,
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: TracingOutputFormat) -> Self {
        self.output_format = format;
        self
    }

    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// The directive used when neither `env_filter` nor `RUST_LOG` is set.
    pub fn default_directive(&self) -> String {
        format!("{}={}", TARGET_PREFIX, self.default_level)
    }

    fn build_filter(&self) -> Result<EnvFilter, TracingError> {
        if let Some(ref filter) = self.env_filter {
            return Ok(EnvFilter::try_new(filter)?);
        }
        Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.default_directive())))
    }
}

/// Installs the global subscriber. Call once, at startup.
///
/// # Errors
///
/// Fails if a subscriber is already installed or the filter directive is
/// invalid.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let env_filter = config.build_filter()?;

    let layer = match config.output_format {
        TracingOutputFormat::Pretty => fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .boxed(),
        TracingOutputFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_file(config.include_location)
                .with_line_number(config.include_location);
            if config.include_timestamp {
                layer.boxed()
            } else {
                layer.without_time().boxed()
            }
        }
        TracingOutputFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .boxed(),
    };

    let subscriber = tracing_subscriber::registry().with(env_filter).with(layer);
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}
