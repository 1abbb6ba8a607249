//! Business logic services.
//!
//! Services are pure in-memory transformations over search results.

pub mod deduplication;

pub use deduplication::{DeduplicationConfig, DuplicateDetector};
