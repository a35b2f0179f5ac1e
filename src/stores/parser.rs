//! HTML parser turning a store's search results page into offers.

use crate::stores::models::Offer;
use crate::stores::selectors::{LinkSource, SelectorTable};
use crate::stores::store::Store;
use scraper::{ElementRef, Html};
use tracing::{debug, trace};

/// Parser for one store's search results markup.
pub struct Parser {
    store: Store,
    base_url: String,
}

impl Parser {
    /// Creates a parser resolving links against the store's own site root.
    pub fn new(store: Store) -> Self {
        Self::with_base_url(store, store.base_url())
    }

    /// Creates a parser resolving relative links against `base_url`.
    pub fn with_base_url(store: Store, base_url: impl Into<String>) -> Self {
        Self { store, base_url: base_url.into() }
    }

    /// Parses search results HTML into offers.
    ///
    /// At most `limit` result containers are inspected when a limit is given.
    /// Containers lacking a title, price or link are skipped.
    pub fn parse_search(&self, html: &str, limit: Option<usize>) -> Vec<Offer> {
        let document = Html::parse_document(html);
        let table = self.store.selectors();

        let cards = document.select(&table.container).take(limit.unwrap_or(usize::MAX));

        let mut offers = Vec::new();
        for card in cards {
            match self.parse_card(table, card) {
                Some(offer) => {
                    trace!("Parsed offer: {} - {}", offer.title_or_empty(), offer.price);
                    offers.push(offer);
                }
                None => trace!("Skipping incomplete result card"),
            }
        }

        debug!("Parsed {} offers from {}", offers.len(), self.store.name());
        offers
    }

    fn parse_card(&self, table: &SelectorTable, card: ElementRef) -> Option<Offer> {
        let title_el = card.select(&table.title).next()?;
        let price_el = card.select(&table.price).next()?;

        let href = match &table.link {
            LinkSource::Title => title_el.value().attr("href"),
            LinkSource::Container => card.value().attr("href"),
            LinkSource::Child(selector) => {
                card.select(selector).next().and_then(|e| e.value().attr("href"))
            }
        }?;

        Some(Offer {
            store: self.store.name().to_string(),
            title: Some(element_text(title_el)),
            price: element_text(price_el),
            url: resolve_url(&self.base_url, href),
        })
    }
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Resolves a possibly relative `href` against `base`.
///
/// Protocol-relative links take the scheme of `base`. Query and fragment
/// links attach to the base path itself.
pub fn resolve_url(base: &str, href: &str) -> String {
    let href = href.trim();
    let base = base.trim_end_matches('/');
    let (scheme, authority_and_path) = base.split_once("://").unwrap_or(("https", base));

    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if let Some(rest) = href.strip_prefix("//") {
        format!("{}://{}", scheme, rest)
    } else if href.starts_with('/') {
        format!("{}{}", base, href)
    } else if (href.starts_with('?') || href.starts_with('#')) && authority_and_path.contains('/') {
        format!("{}{}", base, href)
    } else {
        format!("{}/{}", base, href)
    }
}
