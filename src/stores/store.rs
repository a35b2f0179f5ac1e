//! Supported storefronts with their search endpoints and fetch strategy.

use crate::stores::models::SourceKind;
use crate::stores::selectors::{self, SelectorTable};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Storefronts searched for game keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Store {
    #[serde(rename = "cdkeys")]
    CdKeys,
    Fanatical,
    InstantGaming,
    G2a,
    GreenManGaming,
}

impl Store {
    /// Returns the display name used in offers.
    pub fn name(&self) -> &'static str {
        match self {
            Store::CdKeys => "CDKeys",
            Store::Fanatical => "Fanatical",
            Store::InstantGaming => "Instant Gaming",
            Store::G2a => "G2A",
            Store::GreenManGaming => "GreenManGaming",
        }
    }

    /// Returns the store's site root, used to absolutize relative links.
    pub fn base_url(&self) -> &'static str {
        match self {
            Store::CdKeys => "https://www.cdkeys.com",
            Store::Fanatical => "https://www.fanatical.com",
            Store::InstantGaming => "https://www.instant-gaming.com",
            Store::G2a => "https://www.g2a.com",
            Store::GreenManGaming => "https://www.greenmangaming.com",
        }
    }

    /// Builds the search page URL for `query` under `base`.
    ///
    /// The query is percent-encoded before substitution.
    pub fn search_url(&self, base: &str, query: &str) -> String {
        let base = base.trim_end_matches('/');
        let q = urlencoding::encode(query);

        match self {
            Store::CdKeys => format!("{}/catalogsearch/result/?q={}", base, q),
            Store::Fanatical => format!("{}/en/search?search={}", base, q),
            Store::InstantGaming => format!("{}/en/search/?query={}", base, q),
            Store::G2a => format!("{}/search?query={}", base, q),
            Store::GreenManGaming => format!("{}/search/{}/", base, q),
        }
    }

    /// Returns whether the store's results only exist after client-side rendering.
    pub fn kind(&self) -> SourceKind {
        match self {
            Store::Fanatical | Store::G2a => SourceKind::Dynamic,
            Store::CdKeys | Store::InstantGaming | Store::GreenManGaming => SourceKind::Static,
        }
    }

    /// Returns the selector table for the store's search results.
    pub fn selectors(&self) -> &'static SelectorTable {
        match self {
            Store::CdKeys => &selectors::CDKEYS,
            Store::Fanatical => &selectors::FANATICAL,
            Store::InstantGaming => &selectors::INSTANT_GAMING,
            Store::G2a => &selectors::G2A,
            Store::GreenManGaming => &selectors::GREEN_MAN_GAMING,
        }
    }

    /// Returns all supported stores in registration order.
    pub fn all() -> &'static [Store] {
        &[Store::CdKeys, Store::Fanatical, Store::InstantGaming, Store::G2a, Store::GreenManGaming]
    }
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Store::CdKeys => "cdkeys",
            Store::Fanatical => "fanatical",
            Store::InstantGaming => "instant-gaming",
            Store::G2a => "g2a",
            Store::GreenManGaming => "green-man-gaming",
        };
        write!(f, "{}", code)
    }
}

impl FromStr for Store {
    type Err = StoreParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cdkeys" | "cd-keys" => Ok(Store::CdKeys),
            "fanatical" => Ok(Store::Fanatical),
            "instant-gaming" | "instantgaming" | "ig" => Ok(Store::InstantGaming),
            "g2a" => Ok(Store::G2a),
            "green-man-gaming" | "greenmangaming" | "gmg" => Ok(Store::GreenManGaming),
            _ => Err(StoreParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreParseError(String);

impl fmt::Display for StoreParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown store '{}'. Valid stores: cdkeys, fanatical, instant-gaming, g2a, green-man-gaming",
            self.0
        )
    }
}

impl std::error::Error for StoreParseError {}
