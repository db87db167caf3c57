//! hb-connector - object-storage enumeration for harbor.
//!
//! This crate walks the object listings of one or more storage containers
//! and streams normalized descriptors to a host, one page at a time. It
//! provides:
//!
//! - Container resolution (explicit list or discovery fallback)
//! - Paginated listing with a bounded page size and per-page failure isolation
//! - Deterministic descriptor mapping with stable global identifiers
//! - An S3 storage client with retry and LocalStack support
//! - Stdout and HTTP sinks
//!
//! # Example
//!
//! ```ignore
//! use hb_connector::{Connector, S3ClientFactory, S3Config, StdoutSink};
//!
//! let connector = Connector::new(S3ClientFactory::new(S3Config::new()));
//! let sink = StdoutSink::default();
//!
//! let stats = connector
//!     .sync(r#"{"profile":"default","region":"us-east-1","buckets":["logs"],"max_keys":500}"#, &sink)
//!     .await?;
//! eprintln!("Delivered {} descriptors", stats.objects_delivered);
//! ```

pub mod connector;
pub mod mapper;
pub mod resolver;
pub mod s3;
pub mod sink;
pub mod stats;
pub mod walker;

#[cfg(test)]
mod testing;

pub use connector::{Connector, StorageClientFactory, SyncOptions};
pub use mapper::{format_timestamp, global_id, map_descriptor};
pub use resolver::resolve_containers;
pub use s3::{RetryConfig, S3ClientFactory, S3Config, S3StorageClient, create_s3_client};
pub use sink::{HttpSink, HttpSinkConfig, OutputFormat, PageRecord, StdoutSink};
pub use stats::SyncStats;
pub use walker::{PageWalker, WalkOutcome, WalkStatus};

pub use tokio_util::sync::CancellationToken;
