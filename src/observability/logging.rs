//! Structured logging configuration.

use crate::config::LoggingSettings;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Default filter when nothing else is configured.
const DEFAULT_FILTER: &str = "releasedup=warn";

/// Filter used when verbose output is requested.
const VERBOSE_FILTER: &str = "releasedup=debug";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format string, defaulting to pretty output.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Logging-related environment variables, captured once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogEnv {
    /// `RELEASEDUP_LOG` filter directive.
    pub releasedup_log: Option<String>,
    /// `RUST_LOG` filter directive.
    pub rust_log: Option<String>,
    /// `RELEASEDUP_LOG_FORMAT`.
    pub format: Option<String>,
    /// `RELEASEDUP_LOG_FILE`; blank values are treated as unset.
    pub file: Option<PathBuf>,
}

impl LogEnv {
    /// Reads the logging variables from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            releasedup_log: std::env::var("RELEASEDUP_LOG").ok(),
            rust_log: std::env::var("RUST_LOG").ok(),
            format: std::env::var("RELEASEDUP_LOG_FORMAT").ok(),
            file: std::env::var("RELEASEDUP_LOG_FILE")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        }
    }
}

/// Resolved logging configuration.
#[derive(Debug)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// Event filter.
    pub filter: EnvFilter,
    /// Directive the filter was built from.
    pub directive: String,
    /// Optional log file; stderr when unset.
    pub file: Option<PathBuf>,
    /// Directive that failed to parse and was replaced by the default.
    ///
    /// Reported once the subscriber is installed.
    pub rejected_filter: Option<RejectedFilter>,
}

/// A filter directive that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedFilter {
    /// The directive as configured.
    pub directive: String,
    /// Parse error.
    pub error: String,
}

impl LoggingConfig {
    /// Builds logging configuration from config settings with env overrides.
    #[must_use]
    pub fn from_settings(settings: Option<&LoggingSettings>, verbose: bool) -> Self {
        Self::resolve(settings, verbose, &LogEnv::from_env())
    }

    /// Builds logging configuration from config settings and captured env.
    ///
    /// Filter precedence: `RELEASEDUP_LOG`, then `RUST_LOG`, then the
    /// verbose flag, then the config file, then the default. Format and file
    /// take the env value over the config file.
    #[must_use]
    pub fn resolve(settings: Option<&LoggingSettings>, verbose: bool, env: &LogEnv) -> Self {
        let format = env
            .format
            .clone()
            .or_else(|| settings.and_then(|s| s.format.clone()))
            .map(|f| LogFormat::parse(&f))
            .unwrap_or_default();

        let file = env
            .file
            .clone()
            .or_else(|| settings.and_then(|s| s.file.clone()));

        let directive = env
            .releasedup_log
            .clone()
            .or_else(|| env.rust_log.clone())
            .or_else(|| verbose.then(|| VERBOSE_FILTER.to_string()))
            .or_else(|| settings.and_then(|s| s.filter.clone()))
            .unwrap_or_else(|| DEFAULT_FILTER.to_string());

        let (filter, directive, rejected_filter) = match EnvFilter::try_new(&directive) {
            Ok(filter) => (filter, directive, None),
            Err(e) => (
                EnvFilter::new(DEFAULT_FILTER),
                DEFAULT_FILTER.to_string(),
                Some(RejectedFilter {
                    directive,
                    error: e.to_string(),
                }),
            ),
        };

        Self {
            format,
            filter,
            directive,
            file,
            rejected_filter,
        }
    }
}
