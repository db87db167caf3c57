//! Container resolution.

use hb_error::Result;
use hb_traits::StorageClient;
use hb_types::SyncConfiguration;
use tracing::debug;

/// Decide which containers a sync run scans.
///
/// An explicit `buckets` list (even an empty one) is returned verbatim and
/// discovery is never called. Otherwise the client's container listing is
/// used, with nameless containers kept as empty strings. A discovery failure
/// is returned as-is; no partial set is ever produced.
pub async fn resolve_containers(
    config: &SyncConfiguration,
    client: &dyn StorageClient,
) -> Result<Vec<String>> {
    if let Some(buckets) = &config.buckets {
        debug!(count = buckets.len(), "Using configured containers");
        return Ok(buckets.clone());
    }

    let discovered = client.list_containers().await?;
    let containers: Vec<String> = discovered
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect();

    debug!(count = containers.len(), "Discovered containers");
    Ok(containers)
}
