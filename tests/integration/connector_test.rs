//! Connector sync tests against LocalStack S3.

use crate::common::{CollectingSink, LocalStackTestContext, unique_bucket};
use hb_connector::Connector;
use hb_types::{CONTAINER_KEY, Page, SIZE_KEY};

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_sync_explicit_bucket_in_bounded_pages() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = unique_bucket("hb-pages");
    ctx.seed_bucket(&bucket, 5).await.unwrap();

    let connector = Connector::new(ctx.factory());
    let sink = CollectingSink::new();
    let payload = format!(r#"{{"buckets":["{}"],"max_keys":2}}"#, bucket);

    let stats = connector.sync(&payload, &sink).await.unwrap();

    let pages = sink.pages_for(&bucket);
    let sizes: Vec<usize> = pages.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![2, 2, 1]);
    assert_eq!(stats.pages_delivered, 3);
    assert_eq!(stats.objects_delivered, 5);
    assert!(!stats.has_errors());

    let first = &pages[0][0];
    assert_eq!(first.resource_name, "obj-000");
    assert_eq!(first.remote_id, format!("arn:aws:s3:::{}/obj-000", bucket));
    assert_eq!(first.metadata.get(SIZE_KEY).map(String::as_str), Some("1"));
    assert_eq!(
        first.metadata.get(CONTAINER_KEY).map(String::as_str),
        Some(bucket.as_str())
    );
    assert!(!first.last_modified().is_empty());

    ctx.remove_bucket(&bucket).await.unwrap();
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_missing_bucket_does_not_stop_others() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let present = unique_bucket("hb-present");
    let missing = unique_bucket("hb-missing");
    ctx.seed_bucket(&present, 3).await.unwrap();

    let connector = Connector::new(ctx.factory());
    let sink = CollectingSink::new();
    let payload = format!(r#"{{"buckets":["{}","{}"]}}"#, missing, present);

    let stats = connector.sync(&payload, &sink).await.unwrap();

    assert_eq!(stats.containers_failed, 1);
    assert_eq!(stats.containers_completed, 1);
    assert!(sink.pages_for(&missing).is_empty());
    assert_eq!(sink.pages_for(&present).concat().len(), 3);

    ctx.remove_bucket(&present).await.unwrap();
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_discovers_buckets_when_none_listed() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = unique_bucket("hb-discover");
    ctx.seed_bucket(&bucket, 1).await.unwrap();

    let connector = Connector::new(ctx.factory());
    let sink = CollectingSink::new();

    let stats = connector.sync(r#"{"max_keys":100}"#, &sink).await.unwrap();

    assert!(stats.containers_resolved >= 1);
    assert!(sink.containers().contains(&bucket));
    assert_eq!(sink.pages_for(&bucket).concat().len(), 1);

    ctx.remove_bucket(&bucket).await.unwrap();
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_empty_bucket_delivers_one_empty_page() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = unique_bucket("hb-empty");
    ctx.create_bucket(&bucket).await.unwrap();

    let connector = Connector::new(ctx.factory());
    let sink = CollectingSink::new();
    let payload = format!(r#"{{"buckets":["{}"]}}"#, bucket);

    let stats = connector.sync(&payload, &sink).await.unwrap();

    assert_eq!(sink.pages_for(&bucket), vec![Page::new()]);
    assert_eq!(stats.objects_delivered, 0);

    ctx.remove_bucket(&bucket).await.unwrap();
}
