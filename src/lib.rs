//! # Releasedup
//!
//! Duplicate detection for search results aggregated from multiple indexers.
//!
//! Several indexers often report the same release under slightly different
//! titles, sizes or publish dates. Releasedup partitions one search's results
//! into clusters that represent the same release and counts, per indexer, the
//! results that had no duplicate anywhere else.
//!
//! ## Features
//!
//! - Cheap title grouping to bound comparison work
//! - Greedy, deterministic newest-first clustering
//! - Multi-signal sameness test (indexer, group, poster, age, size)
//! - Explicit index-to-cluster assignments, with optional in-place annotation
//! - Per-indexer unique-hit statistics
//!
//! ## Example
//!
//! ```rust
//! use releasedup::{DeduplicationConfig, DuplicateDetector, IndexerId, SearchResultItem};
//!
//! let mut items = vec![
//!     SearchResultItem::new("Some.Release", IndexerId::new("a")),
//!     SearchResultItem::new("Some.Release", IndexerId::new("b")),
//! ];
//!
//! let detector = DuplicateDetector::new(DeduplicationConfig::default());
//! let result = detector.detect(&items);
//! result.annotate(&mut items);
//!
//! // No dates or sizes: the results cannot be matched.
//! assert_eq!(result.cluster_count(), 2);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod config;
pub mod models;
pub mod observability;
pub mod services;

// Re-exports for convenience
pub use config::ReleasedupConfig;
pub use models::{DuplicateCluster, DuplicateDetectionResult, IndexerId, SearchResultItem};
pub use services::deduplication::{
    DeduplicationConfig, DuplicateDetector, DuplicateThresholds, SamenessTester, SamenessVerdict,
};

/// Error type for releasedup operations.
///
/// Detection itself never fails; these errors come from the layers around it.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Negative or non-finite thresholds, malformed result JSON |
/// | `OperationFailed` | Config/input file I/O, TOML parsing, logging init |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - A threshold is negative, NaN or infinite
    /// - A results file does not contain a JSON array of items
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - Config or results files cannot be read
    /// - The config file is not valid TOML
    /// - The tracing subscriber cannot be installed
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for releasedup operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("test error".to_string());
        assert_eq!(err.to_string(), "invalid input: test error");

        let err = Error::OperationFailed {
            operation: "test".to_string(),
            cause: "failed".to_string(),
        };
        assert_eq!(err.to_string(), "operation 'test' failed: failed");
    }
}
