//! Title normalization and grouping.
//!
//! Only items whose normalized titles are equal are ever compared with each
//! other. Normalization is deliberately shallow: it drops the first separator
//! character and nothing else.

use crate::models::SearchResultItem;
use std::collections::HashMap;

/// Characters treated as title separators.
const SEPARATORS: [char; 4] = [' ', '.', '-', '_'];

/// Items sharing one normalized title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleGroup {
    /// The normalized title shared by every member.
    pub key: String,
    /// Indices of the members in the input slice, in input order.
    pub indices: Vec<usize>,
}

/// Removes the first space, dot, hyphen or underscore from a title.
///
/// # Example
///
/// ```rust
/// use releasedup::services::deduplication::normalize_title;
///
/// assert_eq!(normalize_title("Some.Release.Name"), "SomeRelease.Name");
/// assert_eq!(normalize_title("NoSeparators"), "NoSeparators");
/// ```
#[must_use]
pub fn normalize_title(title: &str) -> String {
    match title.find(SEPARATORS) {
        Some(pos) => {
            let mut normalized = String::with_capacity(title.len());
            normalized.push_str(&title[..pos]);
            // Every separator is a single byte.
            normalized.push_str(&title[pos + 1..]);
            normalized
        },
        None => title.to_string(),
    }
}

/// Partitions items by normalized title.
///
/// Groups appear in the order their key is first seen in `items`; members
/// keep their relative input order.
#[must_use]
pub fn group_by_title(items: &[SearchResultItem]) -> Vec<TitleGroup> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<TitleGroup> = Vec::new();

    for (index, item) in items.iter().enumerate() {
        let key = normalize_title(&item.title);
        if let Some(&position) = positions.get(&key) {
            groups[position].indices.push(index);
        } else {
            positions.insert(key.clone(), groups.len());
            groups.push(TitleGroup {
                key,
                indices: vec![index],
            });
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IndexerId;
    use test_case::test_case;

    fn item(title: &str) -> SearchResultItem {
        SearchResultItem::new(title, IndexerId::new("indexer"))
    }

    #[test_case("Some Release", "SomeRelease" ; "space")]
    #[test_case("Some.Release", "SomeRelease" ; "dot")]
    #[test_case("Some-Release", "SomeRelease" ; "hyphen")]
    #[test_case("Some_Release", "SomeRelease" ; "underscore")]
    #[test_case("A.B.C", "AB.C" ; "only first separator removed")]
    #[test_case("A_B.C", "AB.C" ; "first of mixed separators removed")]
    #[test_case(".Leading", "Leading" ; "leading separator")]
    #[test_case("Trailing-", "Trailing" ; "trailing separator")]
    #[test_case("Plain", "Plain" ; "no separator")]
    #[test_case("", "" ; "empty")]
    #[test_case("Ünïcode.Tïtle", "ÜnïcodeTïtle" ; "multibyte prefix")]
    fn test_normalize_title(input: &str, expected: &str) {
        assert_eq!(normalize_title(input), expected);
    }

    #[test]
    fn test_group_by_title_empty() {
        assert!(group_by_title(&[]).is_empty());
    }

    #[test]
    fn test_group_by_title_collides_on_first_separator() {
        let items = vec![
            item("Show.S01E01.720p"),
            item("Show S01E01.720p"),
            item("Show.S01E01 720p"),
        ];

        let groups = group_by_title(&items);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, "ShowS01E01.720p");
        assert_eq!(groups[0].indices, vec![0, 1]);
        assert_eq!(groups[1].key, "ShowS01E01 720p");
        assert_eq!(groups[1].indices, vec![2]);
    }

    #[test]
    fn test_group_by_title_preserves_first_seen_order() {
        let items = vec![item("b"), item("a"), item("b"), item("c"), item("a")];

        let groups = group_by_title(&items);
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();

        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(groups[0].indices, vec![0, 2]);
        assert_eq!(groups[1].indices, vec![1, 4]);
        assert_eq!(groups[2].indices, vec![3]);
    }
}
