//! Storage client trait.

use async_trait::async_trait;
use hb_error::Result;
use hb_types::ObjectPage;
use std::sync::Arc;

/// Trait for object-storage providers.
///
/// Implementations include:
/// - AWS S3 (production, see `hb_connector::s3`)
/// - Scripted in-memory clients (tests)
///
/// A single client handle is shared read-only by every container walk of a
/// sync run, so implementations must not rely on per-call mutation of their
/// own configuration.
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Lists every container visible to the client's credentials.
    ///
    /// Entries are `None` when the provider returned a container without a
    /// retrievable name; callers decide how to represent those.
    async fn list_containers(&self) -> Result<Vec<Option<String>>>;

    /// Fetches one page of a container listing.
    ///
    /// # Arguments
    ///
    /// * `container` - Container to list
    /// * `continuation_token` - Token from the previous page, `None` for the first page
    /// * `page_size` - Upper bound on records per page, `None` for the provider default
    async fn list_objects_page(
        &self,
        container: &str,
        continuation_token: Option<&str>,
        page_size: Option<u32>,
    ) -> Result<ObjectPage>;
}

#[async_trait]
impl<T: StorageClient + ?Sized> StorageClient for Arc<T> {
    async fn list_containers(&self) -> Result<Vec<Option<String>>> {
        (**self).list_containers().await
    }

    async fn list_objects_page(
        &self,
        container: &str,
        continuation_token: Option<&str>,
        page_size: Option<u32>,
    ) -> Result<ObjectPage> {
        (**self)
            .list_objects_page(container, continuation_token, page_size)
            .await
    }
}
