//! HTTP callback sink.
//!
//! Delivers each page to the host by POSTing the descriptor array to a
//! callback URL. A non-success status is reported as a rejected delivery.

use async_trait::async_trait;
use hb_error::{DeliveryError, HbError, Result};
use hb_traits::Sink;
use hb_types::Page;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

/// Default timeout for callback requests in seconds.
pub const DEFAULT_CALLBACK_TIMEOUT_SECS: u64 = 30;

/// Configuration for the HTTP sink.
#[derive(Debug, Clone)]
pub struct HttpSinkConfig {
    /// Endpoint receiving pages
    pub callback_url: String,

    /// Bearer token for authorization
    pub callback_token: Option<String>,

    /// Timeout for each request in seconds
    pub timeout_secs: u64,
}

impl HttpSinkConfig {
    /// Create a configuration for a callback URL.
    pub fn new(callback_url: impl Into<String>) -> Self {
        Self {
            callback_url: callback_url.into(),
            callback_token: None,
            timeout_secs: DEFAULT_CALLBACK_TIMEOUT_SECS,
        }
    }

    /// Set the bearer token for authorization.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.callback_token = token;
        self
    }

    /// Set the timeout in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Sink that POSTs pages to a host endpoint.
pub struct HttpSink {
    client: Client,
    callback_url: String,
    callback_token: Option<String>,
}

impl HttpSink {
    /// Create a new HTTP sink.
    pub fn new(config: &HttpSinkConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| HbError::Config(format!("Failed to create HTTP client: {e}")))?;

        info!(callback_url = %config.callback_url, "HTTP sink enabled");

        Ok(Self {
            client,
            callback_url: config.callback_url.clone(),
            callback_token: config.callback_token.clone(),
        })
    }

    /// The endpoint pages are sent to.
    pub fn callback_url(&self) -> &str {
        &self.callback_url
    }
}

#[async_trait]
impl Sink for HttpSink {
    async fn deliver(&self, container: &str, page: Page) -> Result<()> {
        debug!(
            url = %self.callback_url,
            container = %container,
            records = page.len(),
            "Sending page"
        );

        let mut request = self.client.post(&self.callback_url).json(&page);

        if let Some(token) = &self.callback_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(format!("Failed to send page: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Rejected(format!("status {status}: {body}")).into());
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "http"
    }
}
