//! HTTP client for store search pages using wreq for TLS fingerprint emulation.

use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};
use wreq::Client;
use wreq_util::Emulation;

/// Trait for fetching raw page markup - enables mocking for tests.
#[async_trait]
pub trait PageFetch: Send + Sync {
    /// Fetches `url` and returns the response body.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Plain HTTP client shared by all static sources.
pub struct HttpClient {
    client: Client,
    user_agent: Option<String>,
}

impl HttpClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(config.static_timeout())
            .connect_timeout(Duration::from_secs(5));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self { client, user_agent: config.user_agent.clone() })
    }
}

#[async_trait]
impl PageFetch for HttpClient {
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);

        let request = self
            .client
            .get(url)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header("Accept-Language", "en-US,en;q=0.9");

        // A configured user agent replaces browser emulation entirely
        let request = match &self.user_agent {
            Some(agent) => request.header("User-Agent", agent.as_str()),
            None => request.emulation(Emulation::Chrome131),
        };

        let response = request.send().await.context("Failed to send request")?;

        let status = response.status();
        debug!("Response status: {}", status);

        if status == 403 || status == 429 {
            warn!("Blocked by {} ({}). Consider using a proxy.", url, status);
        }

        if !status.is_success() {
            anyhow::bail!("Request failed with status: {}", status);
        }

        response.text().await.context("Failed to read response body")
    }
}
