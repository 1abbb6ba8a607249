//! Greedy clustering of one title group.
//!
//! Items are visited newest first. Each item joins the first existing
//! cluster holding a member it matches, or founds a new cluster. Placement is
//! never revisited.

use crate::models::{DuplicateCluster, IndexerId, SearchResultItem};

use super::types::SamenessPredicate;

/// Clusters produced for one title group.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupClustering {
    /// Clusters in creation order; members are indices into the input slice.
    pub clusters: Vec<DuplicateCluster>,
    /// Indexer credited with a unique hit, if the last cluster is a singleton.
    pub unique_hit: Option<IndexerId>,
    /// Number of items that joined an existing cluster.
    pub duplicates_found: usize,
}

/// Orders member indices by publish date, newest first.
///
/// Items without a date sort after every dated item. The sort is stable, so
/// ties keep their input order.
#[must_use]
pub fn sort_newest_first(items: &[SearchResultItem], indices: &[usize]) -> Vec<usize> {
    let mut sorted = indices.to_vec();
    sorted.sort_by(|&a, &b| items[b].pub_date.cmp(&items[a].pub_date));
    sorted
}

/// Clusters the items of one title group.
///
/// `indices` selects the group's members from `items`. Only the last cluster
/// created is inspected for a unique hit; earlier singletons are not
/// credited.
pub fn cluster_title_group<P>(
    items: &[SearchResultItem],
    indices: &[usize],
    predicate: &P,
) -> GroupClustering
where
    P: SamenessPredicate + ?Sized,
{
    let ordered = sort_newest_first(items, indices);
    let Some((&founder, rest)) = ordered.split_first() else {
        return GroupClustering::default();
    };

    let mut clusters = vec![DuplicateCluster::founded_by(founder)];
    let mut duplicates_found = 0;

    for &index in rest {
        let candidate = &items[index];
        let matched = clusters.iter().position(|cluster| {
            cluster
                .members()
                .iter()
                .any(|&member| predicate.is_same(candidate, &items[member]))
        });

        match matched {
            Some(position) => {
                clusters[position].push(index);
                duplicates_found += 1;
            },
            None => clusters.push(DuplicateCluster::founded_by(index)),
        }
    }

    let unique_hit = clusters
        .last()
        .filter(|cluster| cluster.is_singleton())
        .and_then(|cluster| cluster.members().first())
        .map(|&member| items[member].indexer.clone());

    GroupClustering {
        clusters,
        unique_hit,
        duplicates_found,
    }
}
