//! Logging configuration and initialization
//!
//! Centralized `tracing` setup for all vulnsync binaries. Supports console
//! and daily-rotating file output, text or JSON formatting, and
//! environment-based overrides so operators can tune verbosity without a
//! rebuild.
//!
//! Use the structured macros (`trace!`, `debug!`, `info!`, `warn!`,
//! `error!`) with fields rather than `println!`:
//!
//! ```rust,ignore
//! tracing::info!(feed = %url, bytes = body.len(), "Feed downloaded");
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Minimum level a message must have to be emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_tracing_level(self) -> Level {
        match self {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(anyhow::anyhow!("Invalid log level: {}", s)),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        write!(f, "{}", name)
    }
}

/// Where log lines are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Console,
    File,
    Both,
}

impl std::str::FromStr for LogOutput {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "console" | "stdout" => Ok(LogOutput::Console),
            "file" => Ok(LogOutput::File),
            "both" | "all" => Ok(LogOutput::Both),
            _ => Err(anyhow::anyhow!("Invalid log output: {}", s)),
        }
    }
}

/// Line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(anyhow::anyhow!("Invalid log format: {}", s)),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Minimum log level to emit
    pub level: LogLevel,

    /// Output target (console, file, or both)
    pub output: LogOutput,

    /// Line format (text or JSON)
    pub format: LogFormat,

    /// Directory for log files (only used when output includes file)
    pub log_dir: PathBuf,

    /// Log file prefix (e.g., "vulnsync" -> "vulnsync.2026-08-06.log")
    pub log_file_prefix: String,

    /// Extra filter directives (e.g., "sqlx=warn,reqwest=info")
    pub filter_directives: Option<String>,

    /// Whether to include module targets in log lines
    pub include_targets: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            output: LogOutput::Console,
            format: LogFormat::Text,
            log_dir: PathBuf::from("./logs"),
            log_file_prefix: "vulnsync".to_string(),
            filter_directives: None,
            include_targets: true,
        }
    }
}

impl LogConfig {
    /// Load configuration from environment variables
    ///
    /// Recognized variables: `LOG_LEVEL`, `LOG_OUTPUT`, `LOG_FORMAT`,
    /// `LOG_DIR`, `LOG_FILE_PREFIX`, `LOG_FILTER`, `LOG_INCLUDE_TARGETS`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.level = level.parse()?;
        }
        if let Ok(output) = std::env::var("LOG_OUTPUT") {
            config.output = output.parse()?;
        }
        if let Ok(format) = std::env::var("LOG_FORMAT") {
            config.format = format.parse()?;
        }
        if let Ok(dir) = std::env::var("LOG_DIR") {
            config.log_dir = PathBuf::from(dir);
        }
        if let Ok(prefix) = std::env::var("LOG_FILE_PREFIX") {
            config.log_file_prefix = prefix;
        }
        if let Ok(filter) = std::env::var("LOG_FILTER") {
            config.filter_directives = Some(filter);
        }
        if let Ok(val) = std::env::var("LOG_INCLUDE_TARGETS") {
            config.include_targets = val.parse().unwrap_or(true);
        }

        Ok(config)
    }

    pub fn builder() -> LogConfigBuilder {
        LogConfigBuilder::default()
    }
}

/// Builder for [`LogConfig`]
#[derive(Default)]
pub struct LogConfigBuilder {
    config: LogConfig,
}

impl LogConfigBuilder {
    pub fn level(mut self, level: LogLevel) -> Self {
        self.config.level = level;
        self
    }

    pub fn output(mut self, output: LogOutput) -> Self {
        self.config.output = output;
        self
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.log_dir = dir.into();
        self
    }

    pub fn log_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.log_file_prefix = prefix.into();
        self
    }

    pub fn filter_directives(mut self, filter: impl Into<String>) -> Self {
        self.config.filter_directives = Some(filter.into());
        self
    }

    pub fn include_targets(mut self, include: bool) -> Self {
        self.config.include_targets = include;
        self
    }

    pub fn build(self) -> LogConfig {
        self.config
    }
}

/// Initialize the global tracing subscriber
///
/// Must be called once at process startup, before any log macro fires.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let mut filter =
        EnvFilter::from_default_env().add_directive(config.level.as_tracing_level().into());

    if let Some(ref directives) = config.filter_directives {
        for directive in directives.split(',') {
            filter = filter.add_directive(
                directive
                    .parse()
                    .context("Failed to parse log filter directive")?,
            );
        }
    }

    match config.output {
        LogOutput::Console => init_console(config, filter)?,
        LogOutput::File => init_file(config, filter)?,
        LogOutput::Both => init_both(config, filter)?,
    }

    Ok(())
}

fn init_console(config: &LogConfig, filter: EnvFilter) -> Result<()> {
    let layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(config.include_targets)
        .with_span_events(FmtSpan::CLOSE);

    match config.format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init()?,
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .try_init()?,
    }

    Ok(())
}

fn init_file(config: &LogConfig, filter: EnvFilter) -> Result<()> {
    let layer = fmt::layer()
        .with_writer(file_writer(config)?)
        .with_target(config.include_targets)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(false);

    match config.format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init()?,
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .try_init()?,
    }

    Ok(())
}

fn init_both(config: &LogConfig, filter: EnvFilter) -> Result<()> {
    let file_writer = file_writer(config)?;

    match config.format {
        LogFormat::Text => {
            let console = fmt::layer()
                .with_writer(std::io::stdout)
                .with_target(config.include_targets)
                .with_span_events(FmtSpan::CLOSE);

            let file = fmt::layer()
                .with_writer(file_writer)
                .with_target(config.include_targets)
                .with_span_events(FmtSpan::CLOSE)
                .with_ansi(false);

            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .with(file)
                .try_init()?
        }
        LogFormat::Json => {
            let console = fmt::layer()
                .with_writer(std::io::stdout)
                .with_target(config.include_targets)
                .with_span_events(FmtSpan::CLOSE);

            let file = fmt::layer()
                .with_writer(file_writer)
                .with_target(config.include_targets)
                .with_span_events(FmtSpan::CLOSE)
                .with_ansi(false);

            tracing_subscriber::registry()
                .with(filter)
                .with(console.json())
                .with(file.json())
                .try_init()?
        }
    }

    Ok(())
}

fn file_writer(config: &LogConfig) -> Result<tracing_appender::non_blocking::NonBlocking> {
    std::fs::create_dir_all(&config.log_dir).context("Failed to create log directory")?;

    let appender = tracing_appender::rolling::daily(&config.log_dir, &config.log_file_prefix);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    // The guard flushes on drop; it must live for the whole process.
    std::mem::forget(guard);

    Ok(non_blocking)
}
