//! Serve command: runs the HTTP query service.

use crate::aggregator::Aggregator;
use crate::config::Config;
use crate::server;
use crate::stores::Registry;
use anyhow::{Context, Result};
use tracing::info;

/// Starts the web front end and `/search` endpoint.
pub struct ServeCommand {
    config: Config,
}

impl ServeCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Builds the store registry once and serves until shutdown.
    pub async fn execute(&self) -> Result<()> {
        let registry = Registry::from_config(&self.config).context("Failed to set up stores")?;

        for entry in registry.sources() {
            info!("Registered {} ({}, timeout {:?})", entry.name(), entry.kind(), entry.timeout);
        }

        server::serve(Aggregator::new(registry), self.config.port).await
    }
}
