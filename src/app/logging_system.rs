use super::config::{LogFormat, LogLevel};
use std::sync::OnceLock;
use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoggingError {
    #[error("Invalid log directive '{directive}': {reason}")]
    InvalidDirective { directive: String, reason: String },
    #[error("Failed to install tracing subscriber: {0}")]
    InitFailed(String),
}

/// One `target=level` filter directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogDirective {
    pub target: String,
    pub level: LogLevel,
}

impl LogDirective {
    pub fn new(target: impl Into<String>, level: LogLevel) -> Self {
        Self {
            target: target.into(),
            level,
        }
    }

    pub fn parse(raw: &str) -> Result<Self, LoggingError> {
        let invalid = |reason: &str| LoggingError::InvalidDirective {
            directive: raw.to_string(),
            reason: reason.to_string(),
        };
        let (target, level) = raw
            .split_once('=')
            .ok_or_else(|| invalid("expected target=level"))?;
        let target = target.trim();
        if target.is_empty() {
            return Err(invalid("empty target"));
        }
        let level = <LogLevel as clap::ValueEnum>::from_str(level.trim(), true)
            .map_err(|_| invalid("unknown level"))?;
        Ok(Self::new(target, level))
    }

    pub fn to_filter_string(&self) -> String {
        format!("{}={}", self.target, self.level.as_str())
    }
}

/// Builds the subscriber filter and installs it.
#[derive(Debug, Clone)]
pub struct LoggingSystem {
    directives: Vec<LogDirective>,
    format: LogFormat,
}

impl Default for LoggingSystem {
    fn default() -> Self {
        Self::new(LogFormat::Pretty)
    }
}

impl LoggingSystem {
    pub fn new(format: LogFormat) -> Self {
        Self {
            directives: Vec::new(),
            format,
        }
    }

    pub fn add_directive(&mut self, raw: &str) -> Result<(), LoggingError> {
        self.directives.push(LogDirective::parse(raw)?);
        Ok(())
    }

    /// Quiets the runtime's own chatter.
    pub fn add_default_directives(&mut self) {
        for target in ["tokio", "runtime", "mio"] {
            self.directives.push(LogDirective::new(target, LogLevel::Warn));
        }
    }

    pub fn directive_count(&self) -> usize {
        self.directives.len()
    }

    pub fn build_filter_string(&self, default_level: LogLevel) -> String {
        std::iter::once(default_level.as_str().to_string())
            .chain(self.directives.iter().map(LogDirective::to_filter_string))
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn initialize_tracing(&self, default_level: LogLevel) -> Result<(), LoggingError> {
        let filter_string = self.build_filter_string(default_level);
        let env_filter = EnvFilter::try_new(&filter_string).map_err(|e| {
            LoggingError::InvalidDirective {
                directive: filter_string.clone(),
                reason: e.to_string(),
            }
        })?;

        let (pretty, json) = match self.format {
            LogFormat::Pretty => (
                Some(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true)
                        .compact(),
                ),
                None,
            ),
            LogFormat::Json => (
                None,
                Some(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .json()
                        .flatten_event(true)
                        .with_current_span(false),
                ),
            ),
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(pretty)
            .with(json)
            .try_init()
            .map_err(|e| LoggingError::InitFailed(e.to_string()))
    }
}

/// Installs the global subscriber once per process. Later calls return the
/// outcome of the first one.
pub fn setup_logging(
    level: LogLevel,
    format: LogFormat,
    directives: &[String],
) -> Result<(), LoggingError> {
    static INIT: OnceLock<Result<(), LoggingError>> = OnceLock::new();

    INIT.get_or_init(|| {
        let mut system = LoggingSystem::new(format);
        system.add_default_directives();
        for raw in directives {
            system.add_directive(raw)?;
        }
        system.initialize_tracing(level)
    })
    .clone()
}
