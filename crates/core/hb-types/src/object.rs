//! Raw listing types returned by storage providers.

use chrono::{DateTime, Utc};

/// One object record as returned by a provider listing.
///
/// Every field is optional; providers are free to omit any of them and the
/// descriptor mapping degrades missing values to empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawObject {
    /// Object key (full path within the container)
    pub key: Option<String>,

    /// Size in bytes
    pub size: Option<i64>,

    /// Last modification time
    pub last_modified: Option<DateTime<Utc>>,

    /// Entity tag, possibly quoted
    pub etag: Option<String>,
}

impl RawObject {
    /// Create a record with only a key set.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Default::default()
        }
    }

    /// Set the size.
    pub fn with_size(mut self, size: i64) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the last modification time.
    pub fn with_last_modified(mut self, last_modified: DateTime<Utc>) -> Self {
        self.last_modified = Some(last_modified);
        self
    }

    /// Set the entity tag.
    pub fn with_etag(mut self, etag: impl Into<String>) -> Self {
        self.etag = Some(etag.into());
        self
    }
}

/// One page of a container listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectPage {
    /// Records in provider order
    pub objects: Vec<RawObject>,

    /// Opaque continuation token; `None` when this is the last page
    pub next_token: Option<String>,
}

impl ObjectPage {
    /// Create the final page of a listing.
    pub fn last(objects: Vec<RawObject>) -> Self {
        Self {
            objects,
            next_token: None,
        }
    }

    /// Create a page followed by another one.
    pub fn with_next(objects: Vec<RawObject>, next_token: impl Into<String>) -> Self {
        Self {
            objects,
            next_token: Some(next_token.into()),
        }
    }

    /// Whether the provider reported more pages after this one.
    pub fn has_more(&self) -> bool {
        self.next_token.is_some()
    }
}
