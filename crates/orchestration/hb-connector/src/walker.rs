//! Page-by-page traversal of a single container.

use hb_traits::{Sink, StorageClient};
use hb_types::Page;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::mapper::map_descriptor;

/// How a container walk ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkStatus {
    /// The provider reported no more pages
    Completed,

    /// A page fetch failed; remaining pages were skipped
    Failed {
        /// Index of the page that could not be fetched
        page: usize,
        /// Error message
        error: String,
    },

    /// The run was cancelled before the listing finished
    Cancelled,
}

/// Result of walking one container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkOutcome {
    /// Container that was walked
    pub container: String,

    /// Pages handed to the sink
    pub pages_delivered: usize,

    /// Descriptors handed to the sink
    pub objects_delivered: usize,

    /// Deliveries the sink reported as failed
    pub deliveries_rejected: usize,

    /// How the walk ended
    pub status: WalkStatus,
}

impl WalkOutcome {
    fn new(container: &str) -> Self {
        Self {
            container: container.to_string(),
            pages_delivered: 0,
            objects_delivered: 0,
            deliveries_rejected: 0,
            status: WalkStatus::Completed,
        }
    }

    /// Whether the walk stopped on a page failure.
    pub fn is_failed(&self) -> bool {
        matches!(self.status, WalkStatus::Failed { .. })
    }
}

/// Walks container listings and forwards each page to a sink.
///
/// One walker is shared by every container of a sync run. Pages of one
/// container are fetched strictly in sequence since each request needs the
/// previous page's continuation token.
pub struct PageWalker<'a> {
    client: &'a dyn StorageClient,
    sink: &'a dyn Sink,
    page_size: Option<u32>,
    cancel: CancellationToken,
}

impl<'a> PageWalker<'a> {
    /// Create a new walker.
    ///
    /// # Arguments
    ///
    /// * `client` - Storage client shared by all walks
    /// * `sink` - Receiver of delivered pages
    /// * `page_size` - Per-page bound passed to the provider, `None` for its default
    /// * `cancel` - Checked before every page fetch
    pub fn new(
        client: &'a dyn StorageClient,
        sink: &'a dyn Sink,
        page_size: Option<u32>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            client,
            sink,
            page_size,
            cancel,
        }
    }

    /// Walk every page of `container`.
    ///
    /// Never fails: page fetch errors end this container's walk and delivery
    /// errors are logged and counted, both reported through the outcome.
    pub async fn walk(&self, container: &str) -> WalkOutcome {
        let mut outcome = WalkOutcome::new(container);
        let mut continuation_token: Option<String> = None;
        let mut page_index = 0usize;

        debug!(container = %container, page_size = ?self.page_size, "Walking container");

        loop {
            if self.cancel.is_cancelled() {
                outcome.status = WalkStatus::Cancelled;
                break;
            }

            let fetch = self.client.list_objects_page(
                container,
                continuation_token.as_deref(),
                self.page_size,
            );

            let result = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    outcome.status = WalkStatus::Cancelled;
                    break;
                }
                result = fetch => result,
            };

            let page = match result {
                Ok(page) => page,
                Err(e) => {
                    warn!(
                        container = %container,
                        page = page_index,
                        kind = %e.kind(),
                        error = %e,
                        "Page fetch failed, skipping rest of container"
                    );
                    outcome.status = WalkStatus::Failed {
                        page: page_index,
                        error: e.to_string(),
                    };
                    break;
                }
            };

            if let Some(limit) = self.page_size {
                if page.objects.len() > limit as usize {
                    warn!(
                        container = %container,
                        page = page_index,
                        records = page.objects.len(),
                        limit,
                        "Provider returned more records than requested"
                    );
                }
            }

            let descriptors: Page = page
                .objects
                .iter()
                .map(|obj| map_descriptor(container, obj))
                .collect();
            let count = descriptors.len();

            match self.sink.deliver(container, descriptors).await {
                Ok(()) => {
                    debug!(container = %container, page = page_index, records = count, "Delivered page");
                }
                Err(e) => {
                    warn!(
                        container = %container,
                        page = page_index,
                        sink = self.sink.name(),
                        kind = %e.kind(),
                        error = %e,
                        "Page delivery failed"
                    );
                    outcome.deliveries_rejected += 1;
                }
            }

            outcome.pages_delivered += 1;
            outcome.objects_delivered += count;
            page_index += 1;

            match page.next_token {
                Some(token) => continuation_token = Some(token),
                None => break,
            }
        }

        debug!(
            container = %container,
            pages = outcome.pages_delivered,
            objects = outcome.objects_delivered,
            status = ?outcome.status,
            "Finished container"
        );

        outcome
    }
}
