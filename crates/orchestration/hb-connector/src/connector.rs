//! Sync orchestration.

use async_trait::async_trait;
use futures::{StreamExt, stream};
use hb_error::{ErrorKind, Result};
use hb_traits::{Sink, StorageClient};
use hb_types::SyncConfiguration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::resolver::resolve_containers;
use crate::stats::SyncStats;
use crate::walker::{PageWalker, WalkOutcome};

/// Builds the storage client for one sync run.
///
/// The client is created once per run from the parsed configuration and
/// shared read-only by every container walk.
#[async_trait]
pub trait StorageClientFactory: Send + Sync {
    /// The client type produced.
    type Client: StorageClient + 'static;

    /// Create a client scoped to the configuration's profile and region.
    async fn create(&self, config: &SyncConfiguration) -> Result<Self::Client>;
}

/// Run-level options supplied by the host, separate from the payload.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Containers walked at the same time (1 = sequential)
    pub concurrency: usize,

    /// Checked at every page-fetch boundary
    pub cancel: CancellationToken,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            concurrency: 1,
            cancel: CancellationToken::new(),
        }
    }
}

impl SyncOptions {
    /// Create options for a sequential, non-cancellable run.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the container concurrency (values below 1 are treated as 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Set the cancellation token.
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// The enumeration connector.
///
/// Exposes a single operation: run a sync for a configuration payload,
/// delivering pages to a sink. Only a failure to build the storage client or
/// to discover containers is returned as an error; everything else is
/// contained, logged, and counted in [`SyncStats`].
pub struct Connector<F: StorageClientFactory> {
    factory: F,
}

impl<F: StorageClientFactory> Connector<F> {
    /// Create a connector around a storage client factory.
    pub fn new(factory: F) -> Self {
        Self { factory }
    }

    /// Run a sequential sync.
    pub async fn sync(&self, payload: &str, sink: &dyn Sink) -> Result<SyncStats> {
        self.sync_with_options(payload, sink, &SyncOptions::default())
            .await
    }

    /// Run a sync with host-supplied options.
    pub async fn sync_with_options(
        &self,
        payload: &str,
        sink: &dyn Sink,
        options: &SyncOptions,
    ) -> Result<SyncStats> {
        let mut stats = SyncStats::new();

        let parsed = SyncConfiguration::parse_lenient(payload);
        if parsed.is_defaulted() {
            stats.config_defaulted = true;
            for issue in &parsed.issues {
                warn!(
                    kind = %ErrorKind::ConfigurationMalformed,
                    issue = %issue,
                    "Sync configuration defaulted"
                );
                stats.record_error(issue);
            }
        }
        let config = parsed.config;

        info!(
            profile = %config.profile,
            region = %config.region,
            max_keys = config.max_keys,
            buckets = ?config.buckets,
            concurrency = options.concurrency,
            "Starting sync"
        );

        let client = self.factory.create(&config).await.inspect_err(|e| {
            error!(
                kind = %e.kind(),
                fatal = e.is_fatal(),
                error = %e,
                "Failed to create storage client"
            );
        })?;

        if options.cancel.is_cancelled() {
            info!("Sync cancelled before container resolution");
            stats.cancelled = true;
            stats.complete();
            return Ok(stats);
        }

        let resolved = tokio::select! {
            biased;
            _ = options.cancel.cancelled() => {
                info!("Sync cancelled during container resolution");
                stats.cancelled = true;
                stats.complete();
                return Ok(stats);
            }
            resolved = resolve_containers(&config, &client) => resolved,
        };
        let containers = resolved.inspect_err(|e| {
            error!(
                kind = %e.kind(),
                fatal = e.is_fatal(),
                error = %e,
                "Container resolution failed"
            );
        })?;
        stats.containers_resolved = containers.len();

        let walker = PageWalker::new(&client, sink, config.page_size(), options.cancel.clone());

        let outcomes: Vec<WalkOutcome> = stream::iter(containers.iter())
            .map(|container| walker.walk(container))
            .buffer_unordered(options.concurrency.max(1))
            .collect()
            .await;

        for outcome in &outcomes {
            stats.record_walk(outcome);
        }
        stats.complete();

        info!(
            containers = stats.containers_resolved,
            completed = stats.containers_completed,
            failed = stats.containers_failed,
            pages = stats.pages_delivered,
            objects = stats.objects_delivered,
            rejected = stats.deliveries_rejected,
            cancelled = stats.cancelled,
            "Sync completed"
        );

        Ok(stats)
    }
}
