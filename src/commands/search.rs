//! Search command implementation.

use crate::aggregator::Aggregator;
use crate::config::Config;
use crate::format::Formatter;
use crate::stores::Registry;
use anyhow::{Context, Result};
use tracing::info;

/// Runs one aggregated search from the command line.
pub struct SearchCommand {
    config: Config,
}

impl SearchCommand {
    /// Creates a new search command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Executes the search against the configured stores and returns formatted output.
    pub async fn execute(&self, query: &str) -> Result<String> {
        let registry = Registry::from_config(&self.config).context("Failed to set up stores")?;

        self.execute_with(&Aggregator::new(registry), query).await
    }

    /// Executes the search with a provided aggregator (for testing).
    pub async fn execute_with(&self, aggregator: &Aggregator, query: &str) -> Result<String> {
        let query = query.trim();
        if query.is_empty() {
            anyhow::bail!("Search query must not be empty");
        }

        info!("Searching for: {}", query);
        let offers = aggregator.aggregate(query).await;

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_offers(&offers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::stores::{PageFetch, StaticSource, Store, Timeouts};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    /// Mock fetcher serving one page for every URL.
    struct MockFetch {
        html: String,
        call_count: AtomicU32,
    }

    impl MockFetch {
        fn new(html: impl Into<String>) -> Arc<Self> {
            Arc::new(Self { html: html.into(), call_count: AtomicU32::new(0) })
        }

        fn call_count(&self) -> u32 {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PageFetch for MockFetch {
        async fn fetch(&self, _url: &str) -> Result<String> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            Ok(self.html.clone())
        }
    }

    fn make_search_html(items: &[(&str, &str)]) -> String {
        let mut html = String::from("<html><body>");
        for (title, price) in items {
            html.push_str(&format!(
                r#"<div class="product-item">
                    <a class="product-item-link" href="https://www.cdkeys.com/{}">{}</a>
                    <span class="price">{}</span>
                </div>"#,
                title.to_lowercase(),
                title,
                price
            ));
        }
        html.push_str("</body></html>");
        html
    }

    fn make_aggregator(fetch: Arc<MockFetch>) -> Aggregator {
        let registry = Registry::new(Timeouts::default())
            .register(Arc::new(StaticSource::new(Store::CdKeys, fetch)));
        Aggregator::new(registry)
    }

    fn make_test_config(format: OutputFormat) -> Config {
        Config { format, ..Config::default() }
    }

    #[tokio::test]
    async fn test_search_command_sorted_table() {
        let fetch = MockFetch::new(make_search_html(&[("Hades", "$19.99"), ("Celeste", "$4.99")]));
        let cmd = SearchCommand::new(make_test_config(OutputFormat::Table));

        let output = cmd.execute_with(&make_aggregator(fetch.clone()), "indie").await.unwrap();

        let celeste = output.find("Celeste").unwrap();
        let hades = output.find("Hades").unwrap();
        assert!(celeste < hades);
        assert_eq!(fetch.call_count(), 1);
    }

    #[tokio::test]
    async fn test_search_command_empty_results() {
        let cmd = SearchCommand::new(make_test_config(OutputFormat::Table));
        let aggregator = make_aggregator(MockFetch::new("<html></html>"));

        let output = cmd.execute_with(&aggregator, "nonexistent").await.unwrap();
        assert!(output.contains("No offers found"));
    }

    #[tokio::test]
    async fn test_search_command_json_format() {
        let fetch = MockFetch::new(make_search_html(&[("Hades", "$19.99")]));
        let cmd = SearchCommand::new(make_test_config(OutputFormat::Json));

        let output = cmd.execute_with(&make_aggregator(fetch), "hades").await.unwrap();
        assert!(output.starts_with('['));
        assert!(output.contains("\"store\": \"CDKeys\""));
    }

    #[tokio::test]
    async fn test_search_command_rejects_blank_query() {
        let fetch = MockFetch::new("<html></html>");
        let cmd = SearchCommand::new(make_test_config(OutputFormat::Table));

        let err = cmd.execute_with(&make_aggregator(fetch.clone()), "   ").await.unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
        assert_eq!(fetch.call_count(), 0);
    }
}
