//! LocalStack test context and utilities.

use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use hb_connector::{RetryConfig, S3ClientFactory, S3Config};
use hb_error::Result;
use hb_traits::Sink;
use hb_types::Page;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

const ACCESS_KEY: &str = "test";
const SECRET_KEY: &str = "test";

/// LocalStack test context providing an S3 client.
pub struct LocalStackTestContext {
    pub s3: S3Client,
    pub endpoint: String,
    pub region: String,
}

impl LocalStackTestContext {
    /// Create a new LocalStack test context.
    ///
    /// Uses the `LOCALSTACK_ENDPOINT` environment variable if set,
    /// otherwise defaults to `http://localhost:4566`.
    pub async fn new() -> Self {
        let endpoint = std::env::var("LOCALSTACK_ENDPOINT")
            .unwrap_or_else(|_| "http://localhost:4566".to_string());
        let region = "us-east-1".to_string();

        let credentials =
            aws_sdk_s3::config::Credentials::new(ACCESS_KEY, SECRET_KEY, None, None, "tests");
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new(region.clone()))
            .endpoint_url(&endpoint)
            .credentials_provider(credentials)
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(true)
            .build();

        Self {
            s3: S3Client::from_conf(s3_config),
            endpoint,
            region,
        }
    }

    /// Check if LocalStack is available and healthy.
    pub async fn is_available(&self) -> bool {
        self.s3.list_buckets().send().await.is_ok()
    }

    /// A connector factory pointed at LocalStack.
    pub fn factory(&self) -> S3ClientFactory {
        S3ClientFactory::new(
            S3Config::new()
                .with_endpoint(&self.endpoint)
                .with_region(&self.region)
                .with_credentials(ACCESS_KEY, SECRET_KEY)
                .with_timeout(10)
                .with_retry(RetryConfig::none()),
        )
    }

    /// Create an S3 bucket for testing.
    pub async fn create_bucket(&self, name: &str) -> std::result::Result<(), aws_sdk_s3::Error> {
        let buckets = self.s3.list_buckets().send().await?;
        let exists = buckets
            .buckets()
            .iter()
            .any(|b| b.name().unwrap_or_default() == name);

        if !exists {
            self.s3.create_bucket().bucket(name).send().await?;
        }
        Ok(())
    }

    /// Upload a small object.
    pub async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: &str,
    ) -> std::result::Result<(), aws_sdk_s3::Error> {
        self.s3
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(data.as_bytes().to_vec().into())
            .send()
            .await?;
        Ok(())
    }

    /// Create a bucket holding `count` objects named `obj-000`, `obj-001`, ...
    pub async fn seed_bucket(
        &self,
        bucket: &str,
        count: usize,
    ) -> std::result::Result<(), aws_sdk_s3::Error> {
        self.create_bucket(bucket).await?;
        for i in 0..count {
            self.put_object(bucket, &format!("obj-{:03}", i), &"x".repeat(i + 1))
                .await?;
        }
        Ok(())
    }

    /// Delete every object in a bucket, then the bucket.
    pub async fn remove_bucket(&self, bucket: &str) -> std::result::Result<(), aws_sdk_s3::Error> {
        let listing = self.s3.list_objects_v2().bucket(bucket).send().await?;
        for key in listing.contents().iter().filter_map(|o| o.key()) {
            self.s3.delete_object().bucket(bucket).key(key).send().await?;
        }
        self.s3.delete_bucket().bucket(bucket).send().await?;
        Ok(())
    }
}

/// Bucket name that does not collide across test runs.
pub fn unique_bucket(prefix: &str) -> String {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or_default();
    format!(
        "{}-{}-{}",
        prefix,
        nanos,
        COUNTER.fetch_add(1, Ordering::SeqCst)
    )
}

/// Sink that keeps every delivered page for verification.
#[derive(Default, Clone)]
pub struct CollectingSink {
    pages: Arc<Mutex<Vec<(String, Page)>>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pages delivered for one container, in delivery order.
    pub fn pages_for(&self, container: &str) -> Vec<Page> {
        self.pages
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| c == container)
            .map(|(_, p)| p.clone())
            .collect()
    }

    /// Containers that received at least one page.
    pub fn containers(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .pages
            .lock()
            .unwrap()
            .iter()
            .map(|(c, _)| c.clone())
            .collect();
        names.dedup();
        names
    }
}

#[async_trait]
impl Sink for CollectingSink {
    async fn deliver(&self, container: &str, page: Page) -> Result<()> {
        self.pages
            .lock()
            .unwrap()
            .push((container.to_string(), page));
        Ok(())
    }

    fn name(&self) -> &str {
        "collecting"
    }
}
