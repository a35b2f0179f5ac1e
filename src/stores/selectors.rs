//! CSS selector tables for each storefront's search results page.
//!
//! Every store is described by the same shape: a result container, plus
//! title, price and link lookups relative to that container.
//!
//! **Update process**: When a store stops yielding offers, capture an HTML
//! sample, update the table here, and add a test fixture.

use scraper::Selector;
use std::sync::LazyLock;

/// Where a result card keeps its listing link.
#[derive(Debug)]
pub enum LinkSource {
    /// `href` of the matched title element
    Title,
    /// `href` of the container element itself
    Container,
    /// `href` of the first descendant matching this selector
    Child(Selector),
}

/// Container and per-field selectors for one store.
#[derive(Debug)]
pub struct SelectorTable {
    /// Raw CSS of the container, used to wait for rendered results
    pub container_css: &'static str,
    pub container: Selector,
    pub title: Selector,
    pub price: Selector,
    pub link: LinkSource,
}

impl SelectorTable {
    fn build(container: &'static str, title: &str, price: &str, link: LinkSource) -> Self {
        Self {
            container_css: container,
            container: css(container),
            title: css(title),
            price: css(price),
            link,
        }
    }
}

fn css(selector: &str) -> Selector {
    Selector::parse(selector).unwrap()
}

pub static CDKEYS: LazyLock<SelectorTable> = LazyLock::new(|| {
    SelectorTable::build(".product-item", ".product-item-link", ".price", LinkSource::Title)
});

pub static FANATICAL: LazyLock<SelectorTable> =
    LazyLock::new(|| SelectorTable::build(".card", ".card__title", ".price", LinkSource::Title));

pub static INSTANT_GAMING: LazyLock<SelectorTable> =
    LazyLock::new(|| SelectorTable::build(".item", ".title", ".price", LinkSource::Container));

pub static G2A: LazyLock<SelectorTable> = LazyLock::new(|| {
    SelectorTable::build("a.sc-1j3ie3s-0", "h3", ".sc-1x6crnh-2", LinkSource::Container)
});

pub static GREEN_MAN_GAMING: LazyLock<SelectorTable> = LazyLock::new(|| {
    SelectorTable::build(".product", ".product-title", ".product-price", LinkSource::Child(css("a")))
});
