//! Main execution logic for hb-connector CLI.

use anyhow::{Context, Result};
use hb_connector::{
    CancellationToken, Connector, HttpSink, HttpSinkConfig, RetryConfig, S3ClientFactory,
    S3Config, StdoutSink, SyncOptions, SyncStats,
};
use std::io::Read;
use tracing::warn;

use crate::args::{Cli, SinkType};

/// Read the sync payload from the configured source.
pub fn read_payload(args: &Cli) -> Result<String> {
    if let Some(config) = &args.config {
        return Ok(config.clone());
    }

    if let Some(path) = &args.config_file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read sync payload from {}", path.display()));
    }

    let mut payload = String::new();
    std::io::stdin()
        .read_to_string(&mut payload)
        .context("Failed to read sync payload from stdin")?;
    Ok(payload)
}

/// Build the S3 settings shared by the run.
fn build_s3_config(args: &Cli) -> S3Config {
    let mut s3_config = S3Config::new()
        .with_timeout(args.timeout_secs)
        .with_retry(RetryConfig::new().with_max_retries(args.max_retries));

    if let Some(endpoint) = &args.endpoint {
        s3_config = s3_config.with_endpoint(endpoint);
    }

    if let (Some(access_key), Some(secret_key)) = (&args.access_key, &args.secret_key) {
        s3_config = s3_config.with_credentials(access_key, secret_key);
    }

    s3_config
}

/// Cancel the run on Ctrl-C.
fn cancel_on_interrupt() -> CancellationToken {
    let cancel = CancellationToken::new();
    let token = cancel.clone();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling sync");
            token.cancel();
        }
    });

    cancel
}

/// Execute one sync with the provided arguments.
pub async fn execute(args: Cli) -> Result<SyncStats> {
    let payload = read_payload(&args)?;
    let connector = Connector::new(S3ClientFactory::new(build_s3_config(&args)));

    let options = SyncOptions::new()
        .with_concurrency(args.concurrency)
        .with_cancel(cancel_on_interrupt());

    let stats = match args.sink {
        SinkType::Stdout => {
            let sink = StdoutSink::new(args.output_format.into());
            connector.sync_with_options(&payload, &sink, &options).await?
        }
        SinkType::Http => {
            let callback_url = args
                .callback_url
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("--callback-url is required when sink=http"))?;

            let config = HttpSinkConfig::new(callback_url)
                .with_token(args.callback_token.clone())
                .with_timeout(args.timeout_secs);

            let sink = HttpSink::new(&config)?;
            connector.sync_with_options(&payload, &sink, &options).await?
        }
    };

    Ok(stats)
}
