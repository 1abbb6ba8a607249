//! Search result items and indexer identities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of the indexer back-end that produced a result.
///
/// Only used for equality and as a counting key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexerId(String);

impl IndexerId {
    /// Creates a new indexer ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IndexerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for IndexerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for IndexerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One indexer's report of a release.
///
/// Items arrive already normalized into this shape by the indexer clients.
/// Nothing here is validated; a negative size is carried as-is.
///
/// # Example
///
/// ```rust
/// use releasedup::models::{IndexerId, SearchResultItem};
///
/// let item = SearchResultItem::new("Some.Release.1080p-GRP", IndexerId::new("nzbgeek"))
///     .with_size(4_294_967_296)
///     .with_group("GRP");
///
/// assert_eq!(item.group.as_deref(), Some("GRP"));
/// assert!(item.duplicate_identifier.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    /// Release title as reported by the indexer.
    pub title: String,
    /// Publish timestamp, if the indexer reported one.
    #[serde(default)]
    pub pub_date: Option<DateTime<Utc>>,
    /// Size in bytes.
    #[serde(default)]
    pub size: Option<i64>,
    /// Release-group tag.
    #[serde(default)]
    pub group: Option<String>,
    /// Poster or uploader identity.
    #[serde(default)]
    pub poster: Option<String>,
    /// Indexer that produced this result.
    pub indexer: IndexerId,
    /// Duplicate-group identifier, set by annotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate_identifier: Option<usize>,
}

impl SearchResultItem {
    /// Creates an item with only a title and an indexer.
    #[must_use]
    pub fn new(title: impl Into<String>, indexer: IndexerId) -> Self {
        Self {
            title: title.into(),
            pub_date: None,
            size: None,
            group: None,
            poster: None,
            indexer,
            duplicate_identifier: None,
        }
    }

    /// Sets the publish timestamp.
    #[must_use]
    pub const fn with_pub_date(mut self, pub_date: DateTime<Utc>) -> Self {
        self.pub_date = Some(pub_date);
        self
    }

    /// Sets the size in bytes.
    #[must_use]
    pub const fn with_size(mut self, size: i64) -> Self {
        self.size = Some(size);
        self
    }

    /// Sets the release-group tag.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Sets the poster identity.
    #[must_use]
    pub fn with_poster(mut self, poster: impl Into<String>) -> Self {
        self.poster = Some(poster.into());
        self
    }
}

impl fmt::Display for SearchResultItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.indexer)
    }
}
