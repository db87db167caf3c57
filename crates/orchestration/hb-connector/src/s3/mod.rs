//! S3 storage client.
//!
//! This module provides the production [`StorageClient`](hb_traits::StorageClient):
//! - Client configuration with profile, region and LocalStack support
//! - Bucket discovery and paginated ListObjectsV2 calls
//! - Retry with exponential backoff for transient S3 errors

mod client;
mod retry;

pub use client::{S3ClientFactory, S3Config, S3StorageClient, create_s3_client};
pub use retry::{ErrorClassification, RetryConfig, classify_error, with_retry};
