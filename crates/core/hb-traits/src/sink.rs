//! Sink trait for delivered pages.

use async_trait::async_trait;
use hb_error::Result;
use hb_types::Page;
use std::sync::Arc;

/// Trait for receivers of descriptor pages.
///
/// The sink is called once per provider page, in provider order for a given
/// container. Ownership of the page moves into the sink. The returned result
/// is observed for logging only: a failed delivery never stops enumeration.
#[async_trait]
pub trait Sink: Send + Sync {
    /// Delivers one page of descriptors.
    async fn deliver(&self, container: &str, page: Page) -> Result<()>;

    /// Short name used in log fields.
    fn name(&self) -> &str {
        "sink"
    }
}

#[async_trait]
impl<T: Sink + ?Sized> Sink for Arc<T> {
    async fn deliver(&self, container: &str, page: Page) -> Result<()> {
        (**self).deliver(container, page).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
