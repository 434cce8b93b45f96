//! Structured logging for TrailSync
//!
//! Logs go to stderr in a pretty, compact or JSON format, and optionally to a
//! JSON log file that can rotate daily.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::{
    fmt::{self, writer::BoxMakeWriter},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: LogLevel,

    /// Format of the stderr output
    pub format: LogFormat,

    /// Also write JSON logs to this file
    pub file_path: Option<PathBuf>,

    /// Rotate the log file daily
    pub rotation: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            format: LogFormat::Compact,
            file_path: None,
            rotation: true,
        }
    }
}

impl LogConfig {
    /// Raise the configured level by the number of `-v` flags
    pub fn with_verbosity(mut self, verbose: u8) -> Self {
        self.level = match verbose {
            0 => self.level,
            1 => self.level.max(LogLevel::Info),
            2 => self.level.max(LogLevel::Debug),
            _ => LogLevel::Trace,
        };
        self
    }

    /// Filter directive for this crate, e.g. `trailsync=warn`
    pub fn filter_directive(&self) -> String {
        format!("trailsync={}", self.level.as_str())
    }
}

/// Ordered from least to most verbose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
    Compact,
}

fn stderr_layer<S>(format: LogFormat) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let layer = fmt::layer().with_writer(std::io::stderr).with_target(true);
    match format {
        LogFormat::Pretty => layer.pretty().with_line_number(true).boxed(),
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Compact => layer.compact().boxed(),
    }
}

fn file_writer(path: &Path, rotation: bool) -> anyhow::Result<BoxMakeWriter> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    if rotation {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("trailsync.log");
        return Ok(BoxMakeWriter::new(tracing_appender::rolling::daily(dir, name)));
    }

    let file = fs::OpenOptions::new().create(true).append(true).open(path)?;
    Ok(BoxMakeWriter::new(Mutex::new(file)))
}

/// Install the global subscriber. RUST_LOG wins over the configured level.
pub fn init_logging(config: &LogConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter_directive()));

    let file_layer = match &config.file_path {
        Some(path) => Some(
            fmt::layer()
                .json()
                .with_writer(file_writer(path, config.rotation)?),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer(config.format))
        .with(file_layer)
        .try_init()?;

    tracing::debug!(
        level = ?config.level,
        format = ?config.format,
        file = ?config.file_path,
        "Logging initialized"
    );

    Ok(())
}
