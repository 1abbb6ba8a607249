//! Duplicate detection across indexers.
//!
//! This module partitions the results of one search into clusters that
//! represent the same release:
//! 1. **Title grouping**: only results with the same normalized title are compared
//! 2. **Clustering**: greedy, newest-first assignment to the first matching cluster
//! 3. **Sameness test**: indexer, group, poster, age and size signals in fixed order
//! 4. **Aggregation**: global cluster identifiers and per-indexer unique hits
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                      DuplicateDetector                        │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌─────────────────┐  │
//! │  │ group_by_    │  │ cluster_title_   │  │ SamenessTester  │  │
//! │  │ title        │─▶│ group            │─▶│                 │  │
//! │  │              │  │                  │  │ indexer, group, │  │
//! │  │ first sep.   │  │ newest first,    │  │ poster, age,    │  │
//! │  │ removed      │  │ first match wins │  │ size            │  │
//! │  └──────────────┘  └──────────────────┘  └─────────────────┘  │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use releasedup::services::deduplication::{DeduplicationConfig, DuplicateDetector};
//!
//! let detector = DuplicateDetector::new(DeduplicationConfig::from_env());
//! let result = detector.detect(&items);
//! result.annotate(&mut items);
//! ```

mod clustering;
mod config;
mod detector;
mod sameness;
mod title;
mod types;

pub use clustering::{GroupClustering, cluster_title_group, sort_newest_first};
pub use config::{
    DEFAULT_AGE_THRESHOLD_HOURS, DEFAULT_SIZE_THRESHOLD_PERCENT, DeduplicationConfig,
    DuplicateThresholds,
};
pub use detector::DuplicateDetector;
pub use sameness::{SamenessTester, SamenessVerdict};
pub use title::{TitleGroup, group_by_title, normalize_title};
pub use types::SamenessPredicate;
