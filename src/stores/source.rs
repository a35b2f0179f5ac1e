//! Offer sources: one adapter per store, static or browser rendered.

use crate::config::Config;
use crate::stores::browser::{PageRender, WebDriverRenderer};
use crate::stores::client::{HttpClient, PageFetch};
use crate::stores::models::{Offer, SourceKind};
use crate::stores::parser::Parser;
use crate::stores::store::Store;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// A pluggable strategy turning a query into offers from one storefront.
#[async_trait]
pub trait OfferSource: Send + Sync {
    /// Store name shown on offers and in logs.
    fn name(&self) -> &str;

    /// Fetch strategy, which selects the default timeout class.
    fn kind(&self) -> SourceKind;

    /// Searches the store, surfacing transport and render errors.
    async fn search(&self, query: &str) -> Result<Vec<Offer>>;

    /// Searches the store, degrading any error to an empty result.
    async fn fetch(&self, query: &str) -> Vec<Offer> {
        match self.search(query).await {
            Ok(offers) => {
                info!("{} returned {} offers", self.name(), offers.len());
                offers
            }
            Err(e) => {
                warn!("{} failed: {:#}", self.name(), e);
                Vec::new()
            }
        }
    }
}

/// Source that parses the store's search page as served over HTTP.
pub struct StaticSource {
    store: Store,
    client: Arc<dyn PageFetch>,
    base_url: Option<String>,
}

impl StaticSource {
    pub fn new(store: Store, client: Arc<dyn PageFetch>) -> Self {
        Self { store, client, base_url: None }
    }

    /// Overrides the store's site root (for testing).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or_else(|| self.store.base_url())
    }
}

#[async_trait]
impl OfferSource for StaticSource {
    fn name(&self) -> &str {
        self.store.name()
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Static
    }

    async fn search(&self, query: &str) -> Result<Vec<Offer>> {
        let url = self.store.search_url(self.base_url(), query);
        let html = self.client.fetch(&url).await?;

        Ok(Parser::with_base_url(self.store, self.base_url()).parse_search(&html, None))
    }
}

/// Source that renders the store's search page in a headless browser first.
pub struct DynamicSource {
    store: Store,
    renderer: Arc<dyn PageRender>,
    limit: usize,
    base_url: Option<String>,
}

impl DynamicSource {
    /// Result containers inspected per rendered page by default.
    pub const DEFAULT_LIMIT: usize = 10;

    pub fn new(store: Store, renderer: Arc<dyn PageRender>) -> Self {
        Self { store, renderer, limit: Self::DEFAULT_LIMIT, base_url: None }
    }

    /// Sets how many result containers are inspected.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Overrides the store's site root (for testing).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or_else(|| self.store.base_url())
    }
}

#[async_trait]
impl OfferSource for DynamicSource {
    fn name(&self) -> &str {
        self.store.name()
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Dynamic
    }

    async fn search(&self, query: &str) -> Result<Vec<Offer>> {
        let url = self.store.search_url(self.base_url(), query);
        let ready_css = self.store.selectors().container_css;
        let html = self.renderer.render(&url, ready_css).await?;

        Ok(Parser::with_base_url(self.store, self.base_url()).parse_search(&html, Some(self.limit)))
    }
}

/// Per-kind default timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub static_fetch: Duration,
    pub dynamic_fetch: Duration,
}

impl Timeouts {
    pub fn for_kind(&self, kind: SourceKind) -> Duration {
        match kind {
            SourceKind::Static => self.static_fetch,
            SourceKind::Dynamic => self.dynamic_fetch,
        }
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { static_fetch: Duration::from_secs(10), dynamic_fetch: Duration::from_secs(45) }
    }
}

/// A source together with its fetch deadline.
#[derive(Clone)]
pub struct RegisteredSource {
    pub source: Arc<dyn OfferSource>,
    pub timeout: Duration,
}

impl RegisteredSource {
    pub fn name(&self) -> &str {
        self.source.name()
    }

    pub fn kind(&self) -> SourceKind {
        self.source.kind()
    }
}

/// Ordered, read-only set of sources queried for every search.
#[derive(Clone, Default)]
pub struct Registry {
    timeouts: Timeouts,
    sources: Vec<RegisteredSource>,
}

impl Registry {
    /// Creates an empty registry using the given default timeouts.
    pub fn new(timeouts: Timeouts) -> Self {
        Self { timeouts, sources: Vec::new() }
    }

    /// Builds the registry of configured stores backed by real HTTP and WebDriver clients.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client: Arc<dyn PageFetch> = Arc::new(HttpClient::new(config)?);
        let renderer: Arc<dyn PageRender> = Arc::new(WebDriverRenderer::new(config));

        let mut registry = Self::new(config.timeouts());
        for store in config.enabled_stores() {
            let source: Arc<dyn OfferSource> = match store.kind() {
                SourceKind::Static => Arc::new(StaticSource::new(store, client.clone())),
                SourceKind::Dynamic => Arc::new(
                    DynamicSource::new(store, renderer.clone()).with_limit(config.dynamic_limit),
                ),
            };
            registry = registry.register(source);
        }

        Ok(registry)
    }

    /// Appends a source with the default timeout for its kind.
    pub fn register(self, source: Arc<dyn OfferSource>) -> Self {
        let timeout = self.timeouts.for_kind(source.kind());
        self.register_with_timeout(source, timeout)
    }

    /// Appends a source with an explicit timeout.
    pub fn register_with_timeout(mut self, source: Arc<dyn OfferSource>, timeout: Duration) -> Self {
        self.sources.push(RegisteredSource { source, timeout });
        self
    }

    pub fn sources(&self) -> &[RegisteredSource] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Fetcher returning canned markup and remembering requested URLs.
    struct MockFetch {
        body: Option<String>,
        urls: Mutex<Vec<String>>,
    }

    impl MockFetch {
        fn with_body(body: &str) -> Self {
            Self { body: Some(body.to_string()), urls: Mutex::new(Vec::new()) }
        }

        fn failing() -> Self {
            Self { body: None, urls: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl PageFetch for MockFetch {
        async fn fetch(&self, url: &str) -> Result<String> {
            self.urls.lock().unwrap().push(url.to_string());
            match &self.body {
                Some(body) => Ok(body.clone()),
                None => anyhow::bail!("Simulated network error"),
            }
        }
    }

    struct MockRender {
        body: String,
        ready: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PageRender for MockRender {
        async fn render(&self, _url: &str, ready_css: &str) -> Result<String> {
            self.ready.lock().unwrap().push(ready_css.to_string());
            Ok(self.body.clone())
        }
    }

    const CDKEYS_HTML: &str = r#"
        <div class="product-item">
          <a class="product-item-link" href="https://www.cdkeys.com/hades">Hades</a>
          <span class="price">$9.99</span>
        </div>
    "#;

    #[tokio::test]
    async fn test_static_source_encodes_query_and_parses() {
        let fetch = Arc::new(MockFetch::with_body(CDKEYS_HTML));
        let source = StaticSource::new(Store::CdKeys, fetch.clone());

        let offers = source.search("hades & zagreus").await.unwrap();
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].store, "CDKeys");

        let urls = fetch.urls.lock().unwrap();
        assert_eq!(urls[0], "https://www.cdkeys.com/catalogsearch/result/?q=hades%20%26%20zagreus");
    }

    #[tokio::test]
    async fn test_static_source_failure_degrades_to_empty() {
        let source = StaticSource::new(Store::CdKeys, Arc::new(MockFetch::failing()));

        assert!(source.search("hades").await.is_err());
        assert!(source.fetch("hades").await.is_empty());
    }

    #[tokio::test]
    async fn test_dynamic_source_caps_containers_and_waits_for_container() {
        let mut html = String::new();
        for i in 0..12 {
            html.push_str(&format!(
                r#"<div class="card"><a class="card__title" href="/en/game/{i}">G{i}</a><span class="price">€{i},00</span></div>"#
            ));
        }
        let render = Arc::new(MockRender { body: html, ready: Mutex::new(Vec::new()) });
        let source = DynamicSource::new(Store::Fanatical, render.clone());

        let offers = source.fetch("hades").await;
        assert_eq!(offers.len(), 10);
        assert_eq!(offers[0].url, "https://www.fanatical.com/en/game/0");
        assert_eq!(render.ready.lock().unwrap()[0], ".card");
    }

    #[test]
    fn test_registry_assigns_kind_timeouts() {
        let timeouts = Timeouts {
            static_fetch: Duration::from_millis(100),
            dynamic_fetch: Duration::from_millis(900),
        };
        let fetch: Arc<dyn PageFetch> = Arc::new(MockFetch::failing());
        let render: Arc<dyn PageRender> =
            Arc::new(MockRender { body: String::new(), ready: Mutex::new(Vec::new()) });

        let registry = Registry::new(timeouts)
            .register(Arc::new(StaticSource::new(Store::CdKeys, fetch)))
            .register(Arc::new(DynamicSource::new(Store::G2a, render)));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.sources()[0].timeout, Duration::from_millis(100));
        assert_eq!(registry.sources()[1].timeout, Duration::from_millis(900));
        assert_eq!(registry.sources()[1].name(), "G2A");
        assert_eq!(registry.sources()[1].kind(), SourceKind::Dynamic);
    }

    #[test]
    fn test_registry_from_config_follows_store_order() {
        let registry = Registry::from_config(&Config::default()).unwrap();

        let names: Vec<_> = registry.sources().iter().map(|s| s.name().to_string()).collect();
        assert_eq!(names, vec!["CDKeys", "Fanatical", "Instant Gaming", "G2A", "GreenManGaming"]);
        assert_eq!(registry.sources()[1].timeout, Duration::from_secs(45));
        assert_eq!(registry.sources()[0].timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_default_timeouts_differ_by_kind() {
        let timeouts = Timeouts::default();
        assert!(timeouts.for_kind(SourceKind::Dynamic) > timeouts.for_kind(SourceKind::Static));
    }
}
