//! Storefront adapters: HTTP and browser fetching, selector tables, parsing.

pub mod browser;
pub mod client;
pub mod models;
pub mod parser;
pub mod selectors;
pub mod source;
pub mod store;

pub use browser::{PageRender, WebDriverRenderer};
pub use client::{HttpClient, PageFetch};
pub use models::{Offer, SourceKind};
pub use parser::Parser;
pub use source::{DynamicSource, OfferSource, RegisteredSource, Registry, StaticSource, Timeouts};
pub use store::Store;
