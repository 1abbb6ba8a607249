//! Duplicate detection result types.
//!
//! Clusters hold indices into the caller's item slice rather than the items
//! themselves, so the result never aliases the input.

use super::{IndexerId, SearchResultItem};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A set of items believed to represent the same release.
///
/// Members are stored as indices into the slice passed to detection, in the
/// order they joined the cluster.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DuplicateCluster {
    members: Vec<usize>,
}

impl DuplicateCluster {
    /// Creates a cluster holding a single founding item.
    #[must_use]
    pub fn founded_by(index: usize) -> Self {
        Self {
            members: vec![index],
        }
    }

    /// Appends an item to the cluster.
    ///
    /// Indices already present are ignored.
    pub fn push(&mut self, index: usize) {
        if !self.members.contains(&index) {
            self.members.push(index);
        }
    }

    /// Member indices in insertion order.
    #[must_use]
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if the cluster has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns true if exactly one item is in the cluster.
    #[must_use]
    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1
    }

    /// Returns true if the item at `index` belongs to this cluster.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.members.contains(&index)
    }
}

/// Output of one duplicate detection run.
///
/// # Example
///
/// ```rust
/// use releasedup::models::{DuplicateDetectionResult, IndexerId, SearchResultItem};
///
/// let result = DuplicateDetectionResult::empty();
/// assert_eq!(result.cluster_count(), 0);
/// assert!(result.unique_hits.is_empty());
///
/// let mut items: Vec<SearchResultItem> = Vec::new();
/// result.annotate(&mut items);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DuplicateDetectionResult {
    /// Clusters in discovery order. A cluster's position is its identifier.
    pub clusters: Vec<DuplicateCluster>,

    /// Duplicate-group identifier for each input item, indexed by input position.
    pub assignments: Vec<usize>,

    /// Per-indexer count of items left alone in the last cluster of their title group.
    pub unique_hits: HashMap<IndexerId, usize>,

    /// Number of items that joined an existing cluster.
    pub duplicates_found: usize,

    /// Number of items the run was given.
    pub item_count: usize,

    /// Duration of the detection run in milliseconds.
    pub duration_ms: u64,
}

impl DuplicateDetectionResult {
    /// Creates the result for an empty input.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of clusters.
    #[must_use]
    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    /// Duplicate-group identifier of the item at `index`.
    #[must_use]
    pub fn duplicate_identifier(&self, index: usize) -> Option<usize> {
        self.assignments.get(index).copied()
    }

    /// Cluster the item at `index` was placed in.
    #[must_use]
    pub fn cluster_of(&self, index: usize) -> Option<&DuplicateCluster> {
        self.duplicate_identifier(index)
            .and_then(|id| self.clusters.get(id))
    }

    /// Unique hits recorded for one indexer.
    #[must_use]
    pub fn unique_hits_for(&self, indexer: &IndexerId) -> usize {
        self.unique_hits.get(indexer).copied().unwrap_or(0)
    }

    /// Sum of unique hits across all indexers.
    #[must_use]
    pub fn total_unique_hits(&self) -> usize {
        self.unique_hits.values().sum()
    }

    /// Writes each item's duplicate-group identifier onto the item.
    ///
    /// `items` should be the slice the result was computed from. When the
    /// lengths differ, only the common prefix is annotated: extra items keep
    /// their current identifier and extra assignments are skipped. Returns
    /// the number of items written.
    pub fn annotate(&self, items: &mut [SearchResultItem]) -> usize {
        if items.len() != self.assignments.len() {
            tracing::warn!(
                items = items.len(),
                assignments = self.assignments.len(),
                "Annotating a slice that does not match the detection input"
            );
        }

        let mut written = 0;
        for (item, &identifier) in items.iter_mut().zip(&self.assignments) {
            item.duplicate_identifier = Some(identifier);
            written += 1;
        }
        written
    }
}
