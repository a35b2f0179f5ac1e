//! Data models for store offers and fetch strategies.

use crate::price::parse_price;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One storefront's listing for a searched game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    /// Display name of the store
    pub store: String,
    /// Listing title as shown by the store
    pub title: Option<String>,
    /// Price text in the store's own format ("€19,99", "$4.99")
    pub price: String,
    /// Absolute link to the listing
    pub url: String,
}

impl Offer {
    /// Creates an offer with a title.
    pub fn new(
        store: impl Into<String>,
        title: impl Into<String>,
        price: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self { store: store.into(), title: Some(title.into()), price: price.into(), url: url.into() }
    }

    /// Returns the numeric ordering key of the raw price text.
    pub fn price_value(&self) -> f64 {
        parse_price(&self.price)
    }

    /// Returns the title, or an empty string when the store gave none.
    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }
}

/// How a source obtains its markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Plain HTTP request, markup parsed as served
    Static,
    /// Page rendered in a headless browser before parsing
    Dynamic,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Static => write!(f, "static"),
            SourceKind::Dynamic => write!(f, "dynamic"),
        }
    }
}
