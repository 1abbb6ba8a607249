//! Configuration management.

use crate::services::deduplication::DeduplicationConfig;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Main configuration for releasedup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleasedupConfig {
    /// Duplicate detection settings.
    pub dedup: DeduplicationConfig,
    /// Logging settings, applied when the binary initializes observability.
    pub logging: LoggingSettings,
}

/// Logging settings from the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoggingSettings {
    /// Output format: "pretty" or "json".
    pub format: Option<String>,
    /// Filter directive, e.g. `releasedup=debug`.
    pub filter: Option<String>,
    /// Optional log file path. Logs go to stderr when unset.
    pub file: Option<PathBuf>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Searching section.
    pub searching: Option<ConfigFileSearching>,
    /// Logging section.
    pub logging: Option<LoggingSettings>,
}

/// Searching section in config file.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFileSearching {
    /// Enable duplicate detection.
    pub duplicate_detection: Option<bool>,
    /// Age difference threshold in hours.
    pub duplicate_age_threshold: Option<f32>,
    /// Size difference threshold in percent.
    pub duplicate_size_threshold_in_percent: Option<f32>,
}

/// Outcome of searching the default config locations.
#[derive(Debug)]
pub struct DefaultConfigLoad {
    /// The effective configuration.
    pub config: ReleasedupConfig,
    /// File the configuration came from; `None` when defaults were used.
    pub source: Option<PathBuf>,
    /// Files that exist but could not be used.
    pub ignored: Vec<IgnoredConfigFile>,
}

/// A config file that was found but rejected.
#[derive(Debug)]
pub struct IgnoredConfigFile {
    /// Path of the rejected file.
    pub path: PathBuf,
    /// Why it was rejected.
    pub error: crate::Error,
}

impl fmt::Display for IgnoredConfigFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.error)
    }
}

impl ReleasedupConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// Environment overrides are applied on top of the file and the result is
    /// validated.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a
    /// threshold is invalid.
    pub fn load_from_file(path: &Path) -> crate::Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| crate::Error::OperationFailed {
                operation: "read_config_file".to_string(),
                cause: format!("{}: {e}", path.display()),
            })?;

        let config = Self::from_toml(&contents)?;
        config.dedup.validate()?;
        Ok(config)
    }

    /// Parses configuration from TOML text and applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this layout.
    pub fn from_toml(contents: &str) -> crate::Result<Self> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|e| crate::Error::OperationFailed {
                operation: "parse_config_file".to_string(),
                cause: e.to_string(),
            })?;

        let mut config = Self::from_config_file(file);
        config.dedup = config.dedup.with_env_overrides();
        Ok(config)
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform-specific config dir (`~/Library/Application Support/releasedup/` on macOS)
    /// 2. XDG config dir (`~/.config/releasedup/` for Unix compatibility)
    ///
    /// Falls back to the default configuration (with environment overrides)
    /// if no valid config file is found. Files that exist but fail to load
    /// are listed in [`DefaultConfigLoad::ignored`] for the caller to report.
    #[must_use]
    pub fn load_default() -> DefaultConfigLoad {
        Self::load_first_valid(&Self::default_paths())
    }

    /// Returns the default config file locations, most specific first.
    #[must_use]
    pub fn default_paths() -> Vec<PathBuf> {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Vec::new();
        };

        vec![
            base_dirs
                .config_dir()
                .join("releasedup")
                .join("config.toml"),
            base_dirs
                .home_dir()
                .join(".config")
                .join("releasedup")
                .join("config.toml"),
        ]
    }

    /// Loads the first candidate that exists and is valid.
    ///
    /// Missing candidates are skipped silently; candidates that exist but
    /// fail to read, parse or validate are recorded as ignored.
    #[must_use]
    pub fn load_first_valid(candidates: &[PathBuf]) -> DefaultConfigLoad {
        let mut ignored = Vec::new();

        for path in candidates {
            if !path.exists() {
                continue;
            }
            match Self::load_from_file(path) {
                Ok(config) => {
                    return DefaultConfigLoad {
                        config,
                        source: Some(path.clone()),
                        ignored,
                    };
                },
                Err(error) => ignored.push(IgnoredConfigFile {
                    path: path.clone(),
                    error,
                }),
            }
        }

        DefaultConfigLoad {
            config: Self {
                dedup: DeduplicationConfig::from_env(),
                logging: LoggingSettings::default(),
            },
            source: None,
            ignored,
        }
    }

    /// Converts a `ConfigFile` to `ReleasedupConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(searching) = file.searching {
            if let Some(enabled) = searching.duplicate_detection {
                config.dedup.enabled = enabled;
            }
            if let Some(hours) = searching.duplicate_age_threshold {
                config.dedup.age_threshold_hours = hours;
            }
            if let Some(percent) = searching.duplicate_size_threshold_in_percent {
                config.dedup.size_threshold_percent = percent;
            }
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }

        config
    }

    /// Sets the duplicate detection configuration.
    #[must_use]
    pub const fn with_dedup(mut self, dedup: DeduplicationConfig) -> Self {
        self.dedup = dedup;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_toml_reads_searching_section() {
        let config = ReleasedupConfig::from_toml(
            r#"
            [searching]
            duplicateDetection = true
            duplicateAgeThreshold = 6.0
            duplicateSizeThresholdInPercent = 2.5

            [logging]
            format = "json"
            filter = "releasedup=trace"
            "#,
        )
        .unwrap();

        assert!(config.dedup.enabled);
        assert!((config.dedup.age_threshold_hours - 6.0).abs() < f32::EPSILON);
        assert!((config.dedup.size_threshold_percent - 2.5).abs() < f32::EPSILON);
        assert_eq!(config.logging.format.as_deref(), Some("json"));
        assert_eq!(config.logging.filter.as_deref(), Some("releasedup=trace"));
    }

    #[test]
    fn test_from_toml_empty_uses_defaults() {
        let config = ReleasedupConfig::from_toml("").unwrap();
        assert_eq!(config.logging, LoggingSettings::default());
        assert!(config.dedup.validate().is_ok());
    }

    #[test]
    fn test_from_toml_rejects_bad_types() {
        let err = ReleasedupConfig::from_toml("[searching]\nduplicateAgeThreshold = \"two\"")
            .unwrap_err();
        assert!(err.to_string().contains("parse_config_file"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[searching]\nduplicateDetection = false").unwrap();

        let config = ReleasedupConfig::load_from_file(file.path()).unwrap();
        assert!(!config.dedup.enabled);
    }

    #[test]
    fn test_load_from_file_validates_thresholds() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[searching]\nduplicateSizeThresholdInPercent = -3.0").unwrap();

        let err = ReleasedupConfig::load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("invalid input"));
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReleasedupConfig::load_from_file(&dir.path().join("missing.toml")).unwrap_err();
        assert!(err.to_string().contains("read_config_file"));
    }

    #[test]
    fn test_load_first_valid_reports_rejected_file() {
        let dir = tempfile::tempdir().unwrap();
        let rejected = dir.path().join("platform.toml");
        std::fs::write(
            &rejected,
            "[searching]\nduplicateAgeThreshold = 12.0\nduplicateSizeThresholdInPercent = -3.0\n",
        )
        .unwrap();
        let fallback = dir.path().join("xdg.toml");
        std::fs::write(&fallback, "[searching]\nduplicateDetection = false\n").unwrap();

        let loaded = ReleasedupConfig::load_first_valid(&[
            dir.path().join("missing.toml"),
            rejected.clone(),
            fallback.clone(),
        ]);

        assert!(!loaded.config.dedup.enabled);
        assert_eq!(loaded.source, Some(fallback));
        assert_eq!(loaded.ignored.len(), 1);
        assert_eq!(loaded.ignored[0].path, rejected);
        let report = loaded.ignored[0].to_string();
        assert!(report.contains("platform.toml"));
        assert!(report.contains("size_threshold_percent"));
    }

    #[test]
    fn test_load_first_valid_falls_back_to_defaults_and_keeps_report() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("config.toml");
        std::fs::write(&broken, "[searching\n").unwrap();

        let loaded = ReleasedupConfig::load_first_valid(&[broken]);

        assert_eq!(loaded.source, None);
        assert_eq!(loaded.ignored.len(), 1);
        assert!(loaded.ignored[0].to_string().contains("parse_config_file"));
        assert!(loaded.config.dedup.validate().is_ok());
    }

    #[test]
    fn test_load_first_valid_skips_missing_files_silently() {
        let dir = tempfile::tempdir().unwrap();

        let loaded = ReleasedupConfig::load_first_valid(&[dir.path().join("missing.toml")]);

        assert_eq!(loaded.source, None);
        assert!(loaded.ignored.is_empty());
    }

    #[test]
    fn test_with_dedup() {
        let dedup = DeduplicationConfig::default().with_age_threshold_hours(1.0);
        let config = ReleasedupConfig::new().with_dedup(dedup.clone());
        assert_eq!(config.dedup, dedup);
    }
}
