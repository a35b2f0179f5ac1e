//! game-key-finder - Fan-out price search across PC game key storefronts
//!
//! Queries several stores for a title, extracts offers with per-store selector
//! tables, and merges them cheapest first. Slow or failing stores never hold
//! up or break the others.

pub mod aggregator;
pub mod commands;
pub mod config;
pub mod format;
pub mod price;
pub mod server;
pub mod stores;

pub use aggregator::Aggregator;
pub use config::Config;
pub use price::parse_price;
pub use stores::{Offer, OfferSource, Registry, SourceKind, Store};
