//! S3 client configuration, creation, and the S3 storage client.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::operation::list_buckets::ListBucketsOutput;
use aws_sdk_s3::operation::list_objects_v2::ListObjectsV2Output;
use chrono::DateTime;
use hb_error::{Result, StorageError};
use hb_traits::StorageClient;
use hb_types::{ObjectPage, RawObject, SyncConfiguration};
use std::time::Duration;
use tracing::debug;

use super::retry::{RetryConfig, with_retry};
use crate::connector::StorageClientFactory;

/// Configuration for S3 access.
#[derive(Debug, Clone)]
pub struct S3Config {
    /// AWS region
    pub region: Option<String>,

    /// Custom endpoint URL (for LocalStack)
    pub endpoint: Option<String>,

    /// Explicit AWS access key (optional)
    pub access_key: Option<String>,

    /// Explicit AWS secret key (optional)
    pub secret_key: Option<String>,

    /// AWS profile name (optional)
    pub profile: Option<String>,

    /// Per-operation timeout in seconds
    pub timeout_secs: u64,

    /// Retry behavior for listing calls
    pub retry: RetryConfig,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            region: None,
            endpoint: None,
            access_key: None,
            secret_key: None,
            profile: None,
            timeout_secs: 30,
            retry: RetryConfig::default(),
        }
    }
}

impl S3Config {
    /// Create a new S3Config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom endpoint (for LocalStack).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the AWS region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set explicit credentials.
    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    /// Set the AWS profile.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Set the operation timeout in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set the retry configuration.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Overlay the scope of a sync request.
    ///
    /// Empty profile or region values in the request leave this
    /// configuration's values (and so the SDK's own resolution) in place.
    pub fn scoped_to(&self, config: &SyncConfiguration) -> Self {
        let mut scoped = self.clone();
        if !config.profile.is_empty() {
            scoped.profile = Some(config.profile.clone());
        }
        if !config.region.is_empty() {
            scoped.region = Some(config.region.clone());
        }
        scoped
    }
}

/// Create an S3 client from configuration.
pub async fn create_s3_client(config: &S3Config) -> Result<Client> {
    use aws_config::Region;
    use aws_config::timeout::TimeoutConfig;

    let mut aws_config_loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(profile) = &config.profile {
        aws_config_loader = aws_config_loader.profile_name(profile);
    }

    if let Some(region) = &config.region {
        aws_config_loader = aws_config_loader.region(Region::new(region.clone()));
    }

    if let Some(endpoint) = &config.endpoint {
        aws_config_loader = aws_config_loader.endpoint_url(endpoint);
    }

    if let (Some(access_key), Some(secret_key)) = (&config.access_key, &config.secret_key) {
        let credentials = aws_sdk_s3::config::Credentials::new(
            access_key,
            secret_key,
            None,
            None,
            "hb-connector",
        );
        aws_config_loader = aws_config_loader.credentials_provider(credentials);
    }

    let timeouts = TimeoutConfig::builder()
        .operation_timeout(Duration::from_secs(config.timeout_secs))
        .build();
    aws_config_loader = aws_config_loader.timeout_config(timeouts);

    let aws_config = aws_config_loader.load().await;

    let s3_config_builder = aws_sdk_s3::config::Builder::from(&aws_config);

    // LocalStack only serves path-style requests
    let s3_config = if config.endpoint.is_some() {
        s3_config_builder.force_path_style(true).build()
    } else {
        s3_config_builder.build()
    };

    Ok(Client::from_conf(s3_config))
}

/// [`StorageClient`] backed by the AWS SDK.
#[derive(Debug, Clone)]
pub struct S3StorageClient {
    client: Client,
    retry: RetryConfig,
}

impl S3StorageClient {
    /// Wrap an SDK client.
    pub fn new(client: Client, retry: RetryConfig) -> Self {
        Self { client, retry }
    }

    /// Build a client from configuration.
    pub async fn from_config(config: &S3Config) -> Result<Self> {
        let client = create_s3_client(config).await?;
        Ok(Self::new(client, config.retry.clone()))
    }
}

#[async_trait]
impl StorageClient for S3StorageClient {
    async fn list_containers(&self) -> Result<Vec<Option<String>>> {
        let resp = with_retry(&self.retry, "list_buckets", || {
            let req = self.client.list_buckets();
            async move {
                req.send()
                    .await
                    .map_err(|e| DisplayErrorContext(&e).to_string())
            }
        })
        .await
        .map_err(StorageError::Discovery)?;

        let buckets = bucket_names(&resp);

        debug!(count = buckets.len(), "Listed buckets");
        Ok(buckets)
    }

    async fn list_objects_page(
        &self,
        container: &str,
        continuation_token: Option<&str>,
        page_size: Option<u32>,
    ) -> Result<ObjectPage> {
        let max_keys = page_size.map(|n| i32::try_from(n).unwrap_or(i32::MAX));

        let resp = with_retry(&self.retry, "list_objects_v2", || {
            let mut req = self.client.list_objects_v2().bucket(container);

            if let Some(token) = continuation_token {
                req = req.continuation_token(token);
            }

            if let Some(max_keys) = max_keys {
                req = req.max_keys(max_keys);
            }

            async move {
                req.send()
                    .await
                    .map_err(|e| DisplayErrorContext(&e).to_string())
            }
        })
        .await
        .map_err(|message| StorageError::ListObjects {
            container: container.to_string(),
            message,
        })?;

        Ok(object_page_from(resp))
    }
}

/// Bucket names from a `ListBuckets` response; nameless buckets stay `None`.
fn bucket_names(output: &ListBucketsOutput) -> Vec<Option<String>> {
    output
        .buckets()
        .iter()
        .map(|b| b.name().map(str::to_string))
        .collect()
}

/// Convert one `ListObjectsV2` response into a page.
///
/// The continuation token is only kept when the listing is truncated.
fn object_page_from(output: ListObjectsV2Output) -> ObjectPage {
    let objects = output
        .contents
        .unwrap_or_default()
        .into_iter()
        .map(|obj| RawObject {
            key: obj.key,
            size: obj.size,
            last_modified: obj
                .last_modified
                .and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos())),
            etag: obj.e_tag,
        })
        .collect();

    let next_token = if output.is_truncated == Some(true) {
        output.next_continuation_token
    } else {
        None
    };

    ObjectPage {
        objects,
        next_token,
    }
}

/// Builds an [`S3StorageClient`] per sync, scoped to the request's
/// profile and region.
#[derive(Debug, Clone, Default)]
pub struct S3ClientFactory {
    base: S3Config,
}

impl S3ClientFactory {
    /// Create a factory from base settings shared by every sync.
    pub fn new(base: S3Config) -> Self {
        Self { base }
    }
}

#[async_trait]
impl StorageClientFactory for S3ClientFactory {
    type Client = S3StorageClient;

    async fn create(&self, config: &SyncConfiguration) -> Result<Self::Client> {
        let scoped = self.base.scoped_to(config);
        debug!(
            profile = ?scoped.profile,
            region = ?scoped.region,
            endpoint = ?scoped.endpoint,
            "Creating S3 client"
        );
        S3StorageClient::from_config(&scoped).await
    }
}
