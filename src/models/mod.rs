//! Data models for releasedup.
//!
//! This module contains the search result items fed into detection and the
//! result types it produces.

mod detection;
mod release;

pub use detection::{DuplicateCluster, DuplicateDetectionResult};
pub use release::{IndexerId, SearchResultItem};
