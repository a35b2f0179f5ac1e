//! Fan-out search across all registered sources with per-source deadlines.
//!
//! Static sources are polled inside the calling task. Dynamic sources run on
//! the runtime's worker pool so browser round-trips never hold up the others.
//! A source that errors, panics, or misses its deadline contributes nothing.

use crate::stores::{Offer, RegisteredSource, Registry, SourceKind};
use futures::future::join_all;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Runs one query against every source and merges the results by price.
#[derive(Clone)]
pub struct Aggregator {
    registry: Arc<Registry>,
}

impl Aggregator {
    pub fn new(registry: Registry) -> Self {
        Self { registry: Arc::new(registry) }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Searches all sources concurrently and returns offers cheapest first.
    ///
    /// Never fails: an empty vector means no source produced an offer.
    pub async fn aggregate(&self, query: &str) -> Vec<Offer> {
        let started = Instant::now();
        debug!("Fanning out '{}' to {} sources", query, self.registry.len());

        let launches = self.registry.sources().iter().map(|entry| launch(entry, query));
        let contributions = join_all(launches).await;

        let offers = sort_by_price(contributions.into_iter().flatten().collect());

        info!("'{}': {} offers in {:?}", query, offers.len(), started.elapsed());
        offers
    }
}

/// Stable sort by parsed price, ascending. Each price is parsed once.
pub fn sort_by_price(offers: Vec<Offer>) -> Vec<Offer> {
    let mut keyed: Vec<(f64, Offer)> =
        offers.into_iter().map(|offer| (offer.price_value(), offer)).collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    keyed.into_iter().map(|(_, offer)| offer).collect()
}

async fn launch(entry: &RegisteredSource, query: &str) -> Vec<Offer> {
    let name = entry.name().to_string();
    let deadline = entry.timeout;
    let source = entry.source.clone();
    let query = query.to_string();

    let outcome = match entry.kind() {
        SourceKind::Static => {
            let fetch = AssertUnwindSafe(async move { source.fetch(&query).await }).catch_unwind();
            // Dropped on expiry: static fetches hold nothing that needs releasing
            timeout(deadline, fetch).await.map(|r| r.map_err(|_| "panicked".to_string()))
        }
        SourceKind::Dynamic => {
            let mut handle = tokio::spawn(async move { source.fetch(&query).await });
            // Detached on expiry so the browser session is still closed
            timeout(deadline, &mut handle).await.map(|r| r.map_err(|e| e.to_string()))
        }
    };

    match outcome {
        Ok(Ok(offers)) => offers,
        Ok(Err(reason)) => {
            warn!("{} aborted: {}", name, reason);
            Vec::new()
        }
        Err(_) => {
            warn!("{} timed out after {:?}", name, deadline);
            Vec::new()
        }
    }
}
