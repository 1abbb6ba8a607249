//! Deduplication seams.

use crate::models::SearchResultItem;

/// Trait for deciding whether two results are duplicates.
///
/// The clustering engine only depends on this trait, which allows for
/// different matching rules (e.g., a simple closure in tests).
pub trait SamenessPredicate {
    /// Returns true if `a` and `b` describe the same release.
    fn is_same(&self, a: &SearchResultItem, b: &SearchResultItem) -> bool;
}

impl<F> SamenessPredicate for F
where
    F: Fn(&SearchResultItem, &SearchResultItem) -> bool,
{
    fn is_same(&self, a: &SearchResultItem, b: &SearchResultItem) -> bool {
        self(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IndexerId;

    #[test]
    fn test_closure_predicate() {
        let same_title = |a: &SearchResultItem, b: &SearchResultItem| a.title == b.title;
        let a = SearchResultItem::new("x", IndexerId::new("a"));
        let b = SearchResultItem::new("x", IndexerId::new("b"));
        let c = SearchResultItem::new("y", IndexerId::new("c"));

        assert!(same_title.is_same(&a, &b));
        assert!(!same_title.is_same(&a, &c));
    }
}
