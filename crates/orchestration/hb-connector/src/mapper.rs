//! Raw record to descriptor mapping.

use chrono::{DateTime, Utc};
use hb_types::{
    CONTAINER_KEY, ETAG_KEY, LAST_MODIFIED_KEY, ObjectDescriptor, RawObject, SIZE_KEY,
};
use std::collections::BTreeMap;

/// Prefix of every global identifier.
pub const GLOBAL_ID_PREFIX: &str = "arn:aws:s3:::";

/// Timestamp layout used in descriptor metadata.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Build the global identifier for an object.
///
/// The same `(container, key)` pair always yields the same identifier.
pub fn global_id(container: &str, key: &str) -> String {
    format!("{GLOBAL_ID_PREFIX}{container}/{key}")
}

/// Format a timestamp as `YYYY-MM-DD HH:MM:SS` (UTC, no zone suffix).
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Map one provider record into a descriptor.
///
/// Never fails: every missing field degrades to an empty string.
pub fn map_descriptor(container: &str, obj: &RawObject) -> ObjectDescriptor {
    let key = obj.key.clone().unwrap_or_default();
    let id = global_id(container, &key);

    let mut metadata = BTreeMap::new();
    metadata.insert(
        LAST_MODIFIED_KEY.to_string(),
        obj.last_modified
            .as_ref()
            .map(format_timestamp)
            .unwrap_or_default(),
    );
    metadata.insert(
        SIZE_KEY.to_string(),
        obj.size.map(|s| s.to_string()).unwrap_or_default(),
    );
    metadata.insert(
        ETAG_KEY.to_string(),
        obj.etag
            .as_deref()
            .map(|e| e.trim_matches('"').to_string())
            .unwrap_or_default(),
    );
    metadata.insert(CONTAINER_KEY.to_string(), container.to_string());

    ObjectDescriptor {
        remote_id: id.clone(),
        resource_name: key,
        uri: id,
        metadata,
    }
}
