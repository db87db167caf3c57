//! Normalized object descriptors delivered to the host.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata key holding the normalized last-modified timestamp.
pub const LAST_MODIFIED_KEY: &str = "last_modified";

/// Metadata key holding the object size in bytes.
pub const SIZE_KEY: &str = "size";

/// Metadata key holding the unquoted entity tag.
pub const ETAG_KEY: &str = "etag";

/// Metadata key holding the container name.
pub const CONTAINER_KEY: &str = "container";

/// The normalized record emitted for one remote object.
///
/// `remote_id` is the stable join key the host uses to deduplicate records
/// across syncs. `uri` carries the same value and is the addressable
/// reference to the object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDescriptor {
    /// Provider-qualified unique identifier
    pub remote_id: String,

    /// Object key, verbatim
    pub resource_name: String,

    /// Resolvable reference to the object
    pub uri: String,

    /// String metadata; always contains [`LAST_MODIFIED_KEY`]
    pub metadata: BTreeMap<String, String>,
}

impl ObjectDescriptor {
    /// The normalized last-modified timestamp, empty if unknown.
    pub fn last_modified(&self) -> &str {
        self.metadata
            .get(LAST_MODIFIED_KEY)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

/// One page of descriptors, as handed to a sink.
pub type Page = Vec<ObjectDescriptor>;
