//! Headless browser rendering for stores that build results client-side.
//!
//! Every render opens its own WebDriver session and closes it before
//! returning, whether the page loaded, failed, or ran out of time.

use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use thirtyfour::prelude::*;
use thirtyfour::ChromeCapabilities;
use tracing::{debug, warn};

/// Upper bound on the share of the fetch deadline kept back for closing the session.
const SESSION_CLOSE_MARGIN: Duration = Duration::from_secs(5);

/// Trait for rendering a page to its final DOM - enables mocking for tests.
#[async_trait]
pub trait PageRender: Send + Sync {
    /// Loads `url`, waits up to the configured time for `ready_css` to match,
    /// and returns the rendered page source.
    async fn render(&self, url: &str, ready_css: &str) -> Result<String>;
}

/// Renderer backed by a chromedriver/Selenium endpoint.
pub struct WebDriverRenderer {
    webdriver_url: String,
    user_agent: Option<String>,
    ready_wait: Duration,
    page_timeout: Duration,
}

impl WebDriverRenderer {
    /// Creates a renderer from configuration.
    ///
    /// Opening and loading must finish short of the dynamic fetch deadline so
    /// the session is quit before the aggregator gives up on the source.
    pub fn new(config: &Config) -> Self {
        let deadline = config.dynamic_timeout();
        let margin = (deadline / 5).min(SESSION_CLOSE_MARGIN);

        Self {
            webdriver_url: config.webdriver_url.clone(),
            user_agent: config.user_agent.clone(),
            ready_wait: config.render_wait(),
            page_timeout: deadline - margin,
        }
    }

    fn capabilities(&self) -> WebDriverResult<ChromeCapabilities> {
        let mut caps = DesiredCapabilities::chrome();
        caps.set_headless()?;
        caps.set_disable_gpu()?;
        caps.set_no_sandbox()?;
        caps.set_disable_dev_shm_usage()?;
        if let Some(agent) = &self.user_agent {
            caps.add_arg(&format!("--user-agent={}", agent))?;
        }
        Ok(caps)
    }
}

#[async_trait]
impl PageRender for WebDriverRenderer {
    async fn render(&self, url: &str, ready_css: &str) -> Result<String> {
        let caps = self.capabilities().context("Failed to build browser capabilities")?;

        let mut session = None;
        let loaded = tokio::time::timeout(self.page_timeout, async {
            let opened = session.insert(BrowserSession::open(&self.webdriver_url, caps).await?);
            opened.load(url, ready_css, self.ready_wait).await
        })
        .await
        .unwrap_or_else(|_| {
            Err(anyhow::anyhow!("Page render timed out after {:?}", self.page_timeout))
        });

        if let Some(session) = session {
            session.close().await;
        }
        loaded
    }
}

/// One exclusive WebDriver session.
struct BrowserSession {
    driver: WebDriver,
}

impl BrowserSession {
    async fn open(webdriver_url: &str, caps: ChromeCapabilities) -> Result<Self> {
        debug!("Opening browser session at {}", webdriver_url);

        let driver = WebDriver::new(webdriver_url, caps)
            .await
            .with_context(|| format!("Failed to start browser session at {}", webdriver_url))?;

        Ok(Self { driver })
    }

    async fn load(&self, url: &str, ready_css: &str, ready_wait: Duration) -> Result<String> {
        debug!("Rendering {}", url);
        self.driver.goto(url).await.context("Failed to navigate")?;

        // No match just means an empty result page; the source is still taken
        if let Err(e) = self
            .driver
            .query(By::Css(ready_css.to_string()))
            .wait(ready_wait, Duration::from_millis(250))
            .first()
            .await
        {
            debug!("No '{}' after {:?}: {}", ready_css, ready_wait, e);
        }

        self.driver.source().await.context("Failed to read rendered page source")
    }

    async fn close(self) {
        if let Err(e) = self.driver.quit().await {
            warn!("Failed to close browser session: {}", e);
        }
    }
}
