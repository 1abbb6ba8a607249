//! Deduplication configuration.
//!
//! This module defines the thresholds used by the sameness test and the
//! switch that turns detection off entirely.

use crate::{Error, Result};

/// Default age-difference threshold in hours.
pub const DEFAULT_AGE_THRESHOLD_HOURS: f32 = 2.0;

/// Default size-difference threshold in percent of the average size.
pub const DEFAULT_SIZE_THRESHOLD_PERCENT: f32 = 1.0;

/// Age and size tolerances applied when comparing two results.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DuplicateThresholds {
    /// Maximum publish-age difference in whole hours (inclusive).
    pub age_hours: f32,
    /// Maximum size difference in percent of the average size (exclusive).
    pub size_percent: f32,
}

impl DuplicateThresholds {
    /// Creates thresholds from explicit values.
    #[must_use]
    pub const fn new(age_hours: f32, size_percent: f32) -> Self {
        Self {
            age_hours,
            size_percent,
        }
    }

    /// Returns both thresholds multiplied by two.
    #[must_use]
    pub fn doubled(self) -> Self {
        Self {
            age_hours: self.age_hours * 2.0,
            size_percent: self.size_percent * 2.0,
        }
    }
}

impl Default for DuplicateThresholds {
    fn default() -> Self {
        Self::new(DEFAULT_AGE_THRESHOLD_HOURS, DEFAULT_SIZE_THRESHOLD_PERCENT)
    }
}

/// Configuration for duplicate detection.
///
/// # Environment Variables
///
/// | Variable | Type | Default | Description |
/// |----------|------|---------|-------------|
/// | `RELEASEDUP_DEDUP_ENABLED` | bool | `true` | Enable duplicate detection |
/// | `RELEASEDUP_DUPLICATE_AGE_THRESHOLD` | f32 | `2.0` | Age difference in hours |
/// | `RELEASEDUP_DUPLICATE_SIZE_THRESHOLD` | f32 | `1.0` | Size difference in percent |
///
/// # Example
///
/// ```rust
/// use releasedup::services::deduplication::DeduplicationConfig;
///
/// let config = DeduplicationConfig::default()
///     .with_age_threshold_hours(6.0)
///     .with_size_threshold_percent(2.5);
///
/// assert!(config.enabled);
/// assert_eq!(config.thresholds().age_hours, 6.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DeduplicationConfig {
    /// Enable/disable duplicate detection.
    ///
    /// When disabled every item ends up in its own cluster.
    pub enabled: bool,

    /// Publish-age difference in hours below which two results may match.
    pub age_threshold_hours: f32,

    /// Size difference in percent below which two results may match.
    pub size_threshold_percent: f32,
}

impl DeduplicationConfig {
    /// Creates a new configuration from environment variables.
    ///
    /// Falls back to defaults for any unset or unparsable variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Applies environment variable overrides on top of this configuration.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = std::env::var("RELEASEDUP_DEDUP_ENABLED") {
            self.enabled = v.to_lowercase() != "false" && v != "0";
        }

        if let Some(hours) = parse_env("RELEASEDUP_DUPLICATE_AGE_THRESHOLD") {
            self.age_threshold_hours = hours;
        }

        if let Some(percent) = parse_env("RELEASEDUP_DUPLICATE_SIZE_THRESHOLD") {
            self.size_threshold_percent = percent;
        }

        self
    }

    /// Returns the configured thresholds.
    #[must_use]
    pub const fn thresholds(&self) -> DuplicateThresholds {
        DuplicateThresholds::new(self.age_threshold_hours, self.size_threshold_percent)
    }

    /// Checks that both thresholds are finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] naming the offending threshold.
    pub fn validate(&self) -> Result<()> {
        check_threshold("age_threshold_hours", self.age_threshold_hours)?;
        check_threshold("size_threshold_percent", self.size_threshold_percent)
    }

    /// Builder method to set enabled state.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Builder method to set the age threshold.
    #[must_use]
    pub const fn with_age_threshold_hours(mut self, hours: f32) -> Self {
        self.age_threshold_hours = hours;
        self
    }

    /// Builder method to set the size threshold.
    #[must_use]
    pub const fn with_size_threshold_percent(mut self, percent: f32) -> Self {
        self.size_threshold_percent = percent;
        self
    }
}

impl Default for DeduplicationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            age_threshold_hours: DEFAULT_AGE_THRESHOLD_HOURS,
            size_threshold_percent: DEFAULT_SIZE_THRESHOLD_PERCENT,
        }
    }
}

fn parse_env(key: &str) -> Option<f32> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn check_threshold(name: &str, value: f32) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidInput(format!(
            "{name} must be a finite, non-negative number (got {value})"
        )));
    }
    Ok(())
}
