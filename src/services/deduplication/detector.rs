//! Duplicate detection orchestrator.
//!
//! Runs the full pipeline for one search:
//! 1. **Group** results by normalized title
//! 2. **Cluster** each title group with the sameness test
//! 3. **Number** clusters globally in group-then-cluster order
//! 4. **Aggregate** clusters, assignments and per-indexer unique hits
//!
//! The detector holds only its configuration; every run is independent.

use crate::models::{DuplicateCluster, DuplicateDetectionResult, SearchResultItem};
use std::collections::HashMap;
use std::time::Instant;
use tracing::instrument;

use super::clustering::cluster_title_group;
use super::config::DeduplicationConfig;
use super::sameness::SamenessTester;
use super::title::group_by_title;

/// Detects duplicate results reported by different indexers.
///
/// # Example
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use releasedup::models::{IndexerId, SearchResultItem};
/// use releasedup::services::deduplication::{DeduplicationConfig, DuplicateDetector};
///
/// let date = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let mut items = vec![
///     SearchResultItem::new("Some.Release", IndexerId::new("a"))
///         .with_pub_date(date)
///         .with_size(1_000),
///     SearchResultItem::new("Some Release", IndexerId::new("b"))
///         .with_pub_date(date)
///         .with_size(1_002),
/// ];
///
/// let detector = DuplicateDetector::new(DeduplicationConfig::default());
/// let result = detector.detect(&items);
/// result.annotate(&mut items);
///
/// assert_eq!(result.cluster_count(), 1);
/// assert_eq!(items[0].duplicate_identifier, items[1].duplicate_identifier);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateDetector {
    /// Configuration.
    config: DeduplicationConfig,
    /// Sameness test built from the configured thresholds.
    tester: SamenessTester,
}

impl DuplicateDetector {
    /// Creates a detector with the given configuration.
    #[must_use]
    pub const fn new(config: DeduplicationConfig) -> Self {
        let tester = SamenessTester::new(config.thresholds());
        Self { config, tester }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &DeduplicationConfig {
        &self.config
    }

    /// Returns true if duplicate detection is enabled.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Partitions `items` into duplicate clusters.
    ///
    /// The items are not modified; use [`DuplicateDetectionResult::annotate`]
    /// to write the identifiers back onto them.
    #[allow(clippy::cast_possible_truncation)] // Duration in ms won't exceed u64::MAX
    #[instrument(
        skip(self, items),
        fields(operation = "detect_duplicates", item_count = items.len())
    )]
    pub fn detect(&self, items: &[SearchResultItem]) -> DuplicateDetectionResult {
        let start = Instant::now();

        if items.is_empty() {
            tracing::debug!("No results to check for duplicates");
            return DuplicateDetectionResult::empty();
        }

        let mut result = if self.config.enabled {
            self.cluster_all(items)
        } else {
            tracing::debug!("Duplicate detection disabled, every result is its own cluster");
            Self::singletons(items)
        };

        result.duration_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(
            item_count = result.item_count,
            cluster_count = result.cluster_count(),
            duplicates_found = result.duplicates_found,
            duration_ms = result.duration_ms,
            "Duplicate detection finished"
        );
        record_metrics(&result);

        result
    }

    fn cluster_all(&self, items: &[SearchResultItem]) -> DuplicateDetectionResult {
        let title_groups = group_by_title(items);
        tracing::trace!(title_groups = title_groups.len(), "Grouped results by title");

        let mut clusters: Vec<DuplicateCluster> = Vec::new();
        let mut unique_hits = HashMap::new();
        let mut duplicates_found = 0;

        for group in &title_groups {
            let clustering = cluster_title_group(items, &group.indices, &self.tester);
            if let Some(indexer) = clustering.unique_hit {
                *unique_hits.entry(indexer).or_insert(0) += 1;
            }
            duplicates_found += clustering.duplicates_found;
            clusters.extend(clustering.clusters);
        }

        let assignments = assign_identifiers(&clusters, items.len());

        DuplicateDetectionResult {
            clusters,
            assignments,
            unique_hits,
            duplicates_found,
            item_count: items.len(),
            duration_ms: 0,
        }
    }

    fn singletons(items: &[SearchResultItem]) -> DuplicateDetectionResult {
        DuplicateDetectionResult {
            clusters: (0..items.len()).map(DuplicateCluster::founded_by).collect(),
            assignments: (0..items.len()).collect(),
            unique_hits: HashMap::new(),
            duplicates_found: 0,
            item_count: items.len(),
            duration_ms: 0,
        }
    }
}

impl Default for DuplicateDetector {
    fn default() -> Self {
        Self::new(DeduplicationConfig::default())
    }
}

/// Maps each input index to the position of the cluster holding it.
fn assign_identifiers(clusters: &[DuplicateCluster], item_count: usize) -> Vec<usize> {
    let mut assignments = vec![0; item_count];
    for (identifier, cluster) in clusters.iter().enumerate() {
        for &member in cluster.members() {
            assignments[member] = identifier;
        }
    }
    assignments
}

#[allow(clippy::cast_precision_loss)]
fn record_metrics(result: &DuplicateDetectionResult) {
    metrics::counter!("duplicate_detection_runs_total").increment(1);
    metrics::counter!("duplicate_detection_items_total").increment(result.item_count as u64);
    metrics::counter!("duplicate_detection_duplicates_total")
        .increment(result.duplicates_found as u64);
    metrics::histogram!("duplicate_detection_duration_ms").record(result.duration_ms as f64);
}
