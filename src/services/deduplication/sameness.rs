//! Pairwise sameness test.
//!
//! Decides whether two results from different indexers describe the same
//! release. Rules are evaluated in a fixed order and the first rule that
//! decides the outcome wins:
//!
//! 1. Same indexer: never the same
//! 2. Both group tags known and different: not the same
//! 3. Both posters known and different: not the same
//! 4. Publish-age and size proximity, with thresholds doubled when exactly
//!    one of group/poster is known and matches

use crate::models::SearchResultItem;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::config::DuplicateThresholds;
use super::types::SamenessPredicate;

const SECONDS_PER_HOUR: i64 = 60 * 60;

/// Outcome of comparing two results, naming the rule that decided it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamenessVerdict {
    /// Age and size within tolerance.
    ///
    /// `relaxed` is true when the doubled thresholds were applied.
    Same {
        /// Whether the doubled thresholds were used.
        relaxed: bool,
    },

    /// Both results come from the same indexer.
    SameIndexer,

    /// Both results carry a group tag and the tags differ.
    GroupMismatch,

    /// Both results carry a poster and the posters differ.
    PosterMismatch,

    /// At least one result has no publish date.
    MissingPubDate,

    /// Publish dates are further apart than the age threshold.
    AgeExceeded,

    /// At least one result has no size.
    MissingSize,

    /// Sizes differ by at least the size threshold.
    SizeExceeded,
}

impl SamenessVerdict {
    /// Returns true if the verdict means both results are the same release.
    #[must_use]
    pub const fn is_same(self) -> bool {
        matches!(self, Self::Same { .. })
    }
}

impl fmt::Display for SamenessVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Same { relaxed: false } => write!(f, "same"),
            Self::Same { relaxed: true } => write!(f, "same_relaxed"),
            Self::SameIndexer => write!(f, "same_indexer"),
            Self::GroupMismatch => write!(f, "group_mismatch"),
            Self::PosterMismatch => write!(f, "poster_mismatch"),
            Self::MissingPubDate => write!(f, "missing_pub_date"),
            Self::AgeExceeded => write!(f, "age_exceeded"),
            Self::MissingSize => write!(f, "missing_size"),
            Self::SizeExceeded => write!(f, "size_exceeded"),
        }
    }
}

/// Multi-signal sameness test.
///
/// # Example
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use releasedup::models::{IndexerId, SearchResultItem};
/// use releasedup::services::deduplication::{DuplicateThresholds, SamenessTester};
///
/// let date = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let a = SearchResultItem::new("Release", IndexerId::new("a"))
///     .with_pub_date(date)
///     .with_size(1_000);
/// let b = SearchResultItem::new("Release", IndexerId::new("b"))
///     .with_pub_date(date)
///     .with_size(1_005);
///
/// let tester = SamenessTester::new(DuplicateThresholds::new(2.0, 1.0));
/// assert!(tester.is_same(&a, &b));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamenessTester {
    thresholds: DuplicateThresholds,
}

impl SamenessTester {
    /// Creates a tester with the given base thresholds.
    #[must_use]
    pub const fn new(thresholds: DuplicateThresholds) -> Self {
        Self { thresholds }
    }

    /// Returns the base thresholds.
    #[must_use]
    pub const fn thresholds(&self) -> DuplicateThresholds {
        self.thresholds
    }

    /// Returns true if both results describe the same release.
    #[must_use]
    pub fn is_same(&self, a: &SearchResultItem, b: &SearchResultItem) -> bool {
        self.compare(a, b).is_same()
    }

    /// Compares two results and reports which rule decided the outcome.
    #[must_use]
    pub fn compare(&self, a: &SearchResultItem, b: &SearchResultItem) -> SamenessVerdict {
        let verdict = self.evaluate(a, b);
        tracing::debug!(
            first = %a,
            second = %b,
            verdict = %verdict,
            "Compared results"
        );
        verdict
    }

    fn evaluate(&self, a: &SearchResultItem, b: &SearchResultItem) -> SamenessVerdict {
        if a.indexer == b.indexer {
            return SamenessVerdict::SameIndexer;
        }

        let (group_known, same_group) = signal(a.group.as_deref(), b.group.as_deref());
        let (poster_known, same_poster) = signal(a.poster.as_deref(), b.poster.as_deref());

        if group_known && !same_group {
            return SamenessVerdict::GroupMismatch;
        }
        if poster_known && !same_poster {
            return SamenessVerdict::PosterMismatch;
        }

        let relaxed = (same_group && !poster_known) || (same_poster && !group_known);
        let thresholds = if relaxed {
            self.thresholds.doubled()
        } else {
            self.thresholds
        };

        if let Some(verdict) = age_verdict(a, b, thresholds.age_hours) {
            return verdict;
        }
        if let Some(verdict) = size_verdict(a, b, thresholds.size_percent) {
            return verdict;
        }

        SamenessVerdict::Same { relaxed }
    }
}

impl SamenessPredicate for SamenessTester {
    fn is_same(&self, a: &SearchResultItem, b: &SearchResultItem) -> bool {
        Self::is_same(self, a, b)
    }
}

/// Returns `(known, equal)` for an optional signal present on both sides.
fn signal(a: Option<&str>, b: Option<&str>) -> (bool, bool) {
    match (a, b) {
        (Some(a), Some(b)) => (true, a == b),
        _ => (false, false),
    }
}

/// Returns a failing verdict, or `None` when the age test passes.
#[allow(clippy::cast_precision_loss)] // Hour differences are far below f32 precision limits
fn age_verdict(
    a: &SearchResultItem,
    b: &SearchResultItem,
    threshold_hours: f32,
) -> Option<SamenessVerdict> {
    let (Some(first), Some(second)) = (a.pub_date, b.pub_date) else {
        return Some(SamenessVerdict::MissingPubDate);
    };

    let seconds = (i128::from(first.timestamp()) - i128::from(second.timestamp())).abs();
    let hours = seconds / i128::from(SECONDS_PER_HOUR);

    if hours as f32 <= threshold_hours {
        None
    } else {
        Some(SamenessVerdict::AgeExceeded)
    }
}

/// Returns a failing verdict, or `None` when the size test passes.
///
/// The average is computed with integer division before the percentage.
#[allow(clippy::cast_precision_loss)] // Sizes are compared as percentages, f32 is sufficient
fn size_verdict(
    a: &SearchResultItem,
    b: &SearchResultItem,
    threshold_percent: f32,
) -> Option<SamenessVerdict> {
    let (Some(first), Some(second)) = (a.size, b.size) else {
        return Some(SamenessVerdict::MissingSize);
    };

    let (first, second) = (i128::from(first), i128::from(second));
    let difference = (first - second).abs() as f32;
    let average = ((first + second) / 2) as f32;
    let difference_percent = (difference / average).abs() * 100.0;

    // A zero average yields NaN or infinity, neither of which passes.
    if difference_percent < threshold_percent {
        None
    } else {
        Some(SamenessVerdict::SizeExceeded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IndexerId;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use test_case::test_case;

    fn base_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn item(indexer: &str) -> SearchResultItem {
        SearchResultItem::new("Some.Release", IndexerId::new(indexer))
            .with_pub_date(base_date())
            .with_size(1_000_000)
    }

    fn tester(age_hours: f32, size_percent: f32) -> SamenessTester {
        SamenessTester::new(DuplicateThresholds::new(age_hours, size_percent))
    }

    #[test]
    fn test_identical_items_from_different_indexers_are_same() {
        let verdict = tester(2.0, 1.0).compare(&item("a"), &item("b"));
        assert_eq!(verdict, SamenessVerdict::Same { relaxed: false });
    }

    #[test]
    fn test_same_indexer_is_never_same() {
        let verdict = tester(2.0, 1.0).compare(&item("a"), &item("a"));
        assert_eq!(verdict, SamenessVerdict::SameIndexer);
    }

    #[test]
    fn test_same_indexer_checked_before_missing_fields() {
        let a = SearchResultItem::new("x", IndexerId::new("a"));
        let b = SearchResultItem::new("x", IndexerId::new("a"));
        assert_eq!(tester(2.0, 1.0).compare(&a, &b), SamenessVerdict::SameIndexer);
    }

    #[test]
    fn test_group_mismatch() {
        let a = item("a").with_group("GRP1");
        let b = item("b").with_group("GRP2");
        assert_eq!(tester(2.0, 1.0).compare(&a, &b), SamenessVerdict::GroupMismatch);
    }

    #[test]
    fn test_group_checked_before_poster() {
        let a = item("a").with_group("GRP1").with_poster("p1");
        let b = item("b").with_group("GRP2").with_poster("p2");
        assert_eq!(tester(2.0, 1.0).compare(&a, &b), SamenessVerdict::GroupMismatch);
    }

    #[test]
    fn test_poster_mismatch() {
        let a = item("a").with_poster("p1");
        let b = item("b").with_poster("p2");
        assert_eq!(tester(2.0, 1.0).compare(&a, &b), SamenessVerdict::PosterMismatch);
    }

    #[test]
    fn test_group_known_on_one_side_only_is_ignored() {
        let a = item("a").with_group("GRP1");
        let b = item("b");
        assert_eq!(
            tester(2.0, 1.0).compare(&a, &b),
            SamenessVerdict::Same { relaxed: false }
        );
    }

    #[test]
    fn test_both_signals_matching_keeps_base_thresholds() {
        let a = item("a").with_group("GRP").with_poster("p");
        let b = item("b")
            .with_group("GRP")
            .with_poster("p")
            .with_size(1_015_000);
        // 1.5% difference fails the 1% base threshold and is not relaxed.
        assert_eq!(tester(2.0, 1.0).compare(&a, &b), SamenessVerdict::SizeExceeded);
    }

    #[test_case(Some("GRP"), None ; "matching group only")]
    #[test_case(None, Some("poster") ; "matching poster only")]
    fn test_single_matching_signal_doubles_thresholds(group: Option<&str>, poster: Option<&str>) {
        let mut a = item("a");
        let mut b = item("b").with_size(1_015_000);
        a.group = group.map(str::to_string);
        b.group = group.map(str::to_string);
        a.poster = poster.map(str::to_string);
        b.poster = poster.map(str::to_string);

        assert_eq!(
            tester(2.0, 1.0).compare(&a, &b),
            SamenessVerdict::Same { relaxed: true }
        );
    }

    #[test]
    fn test_doubled_age_threshold() {
        let a = item("a").with_poster("p");
        let b = item("b")
            .with_poster("p")
            .with_pub_date(base_date() + Duration::hours(4));
        assert!(tester(2.0, 1.0).is_same(&a, &b));

        let a = item("a");
        let b = item("b").with_pub_date(base_date() + Duration::hours(4));
        assert_eq!(tester(2.0, 1.0).compare(&a, &b), SamenessVerdict::AgeExceeded);
    }

    #[test]
    fn test_missing_pub_date() {
        let mut a = item("a");
        a.pub_date = None;
        assert_eq!(
            tester(2.0, 1.0).compare(&a, &item("b")),
            SamenessVerdict::MissingPubDate
        );
    }

    #[test]
    fn test_missing_size() {
        let mut b = item("b");
        b.size = None;
        assert_eq!(
            tester(2.0, 1.0).compare(&item("a"), &b),
            SamenessVerdict::MissingSize
        );
    }

    #[test_case(0, true ; "same time")]
    #[test_case(2 * 3600, true ; "exactly at threshold")]
    #[test_case(3 * 3600 - 1, true ; "partial hour truncated")]
    #[test_case(3 * 3600, false ; "one hour over")]
    fn test_age_uses_whole_hours_inclusive(offset_secs: i64, expected: bool) {
        let a = item("a");
        let b = item("b").with_pub_date(base_date() - Duration::seconds(offset_secs));
        assert_eq!(tester(2.0, 1.0).is_same(&a, &b), expected);
        assert_eq!(tester(2.0, 1.0).is_same(&b, &a), expected);
    }

    #[test_case(1_000, 1_009, 1.0, true ; "under threshold")]
    #[test_case(75, 125, 50.0, false ; "difference equal to threshold")]
    #[test_case(75, 125, 50.5, true ; "difference just under threshold")]
    #[test_case(0, 0, 100.0, false ; "zero sizes never match")]
    fn test_size_threshold_is_strict(first: i64, second: i64, percent: f32, expected: bool) {
        let a = item("a").with_size(first);
        let b = item("b").with_size(second);
        assert_eq!(tester(2.0, percent).is_same(&a, &b), expected);
    }

    #[test]
    fn test_size_average_uses_integer_division() {
        // Average of 1 and 2 truncates to 1, so the difference is 100%.
        let a = item("a").with_size(1);
        let b = item("b").with_size(2);
        assert!(!tester(2.0, 100.0).is_same(&a, &b));
        assert!(tester(2.0, 100.1).is_same(&a, &b));
    }

    #[test]
    fn test_extreme_sizes_do_not_overflow() {
        let a = item("a").with_size(i64::MAX);
        let b = item("b").with_size(i64::MAX - 1);
        assert!(tester(2.0, 1.0).is_same(&a, &b));
    }

    #[test]
    fn test_verdict_display() {
        assert_eq!(SamenessVerdict::Same { relaxed: false }.to_string(), "same");
        assert_eq!(
            SamenessVerdict::Same { relaxed: true }.to_string(),
            "same_relaxed"
        );
        assert_eq!(SamenessVerdict::SameIndexer.to_string(), "same_indexer");
        assert_eq!(SamenessVerdict::SizeExceeded.to_string(), "size_exceeded");
    }
}
