//! Subscriber setup for the `ordo` binary.

use std::env;
use std::fmt;
use std::io;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub const TRACE_ENV: &str = "ORDO_TRACE";
pub const FORMAT_ENV: &str = "ORDO_LOG_FORMAT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggingError {
    InvalidFilter(String),
    InvalidFormat(String),
    Init(String),
}

impl LoggingError {
    pub fn code(&self) -> &'static str {
        match self {
            LoggingError::InvalidFilter(_) => "LOG_INVALID_FILTER",
            LoggingError::InvalidFormat(_) => "LOG_INVALID_FORMAT",
            LoggingError::Init(_) => "LOG_INIT_FAILED",
        }
    }
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoggingError::InvalidFilter(detail) => {
                write!(f, "[{}] Invalid log filter: {detail}", self.code())
            }
            LoggingError::InvalidFormat(value) => write!(
                f,
                "[{}] Invalid {FORMAT_ENV} '{value}' (expected 'json' or 'pretty')",
                self.code()
            ),
            LoggingError::Init(detail) => {
                write!(f, "[{}] Failed to initialize logging: {detail}", self.code())
            }
        }
    }
}

impl std::error::Error for LoggingError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Pretty,
    Json,
}

fn parse_format(value: &str) -> Result<LogFormat, LoggingError> {
    if value.eq_ignore_ascii_case("pretty") {
        Ok(LogFormat::Pretty)
    } else if value.eq_ignore_ascii_case("json") {
        Ok(LogFormat::Json)
    } else {
        Err(LoggingError::InvalidFormat(value.to_string()))
    }
}

fn build_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    if level.eq_ignore_ascii_case("off") {
        return Ok(EnvFilter::default().add_directive(LevelFilter::OFF.into()));
    }
    EnvFilter::try_new(level).map_err(|err| LoggingError::InvalidFilter(err.to_string()))
}

/// Install a stderr subscriber.
///
/// `level` wins over `ORDO_TRACE`; with neither set logging stays off.
/// Returns `false` when a subscriber was already installed.
pub fn init(level: Option<&str>) -> Result<bool, LoggingError> {
    if tracing::dispatcher::has_been_set() {
        return Ok(false);
    }

    let level = level
        .map(str::to_string)
        .or_else(|| env::var(TRACE_ENV).ok())
        .unwrap_or_else(|| "off".to_string());
    let filter = build_filter(&level)?;
    let format = parse_format(&env::var(FORMAT_ENV).unwrap_or_else(|_| "pretty".to_string()))?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(io::stderr)
                    .json(),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(io::stderr)
                    .pretty(),
            )
            .try_init(),
    };
    result.map_err(|err| LoggingError::Init(err.to_string()))?;
    Ok(true)
}
