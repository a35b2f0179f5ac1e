//! game-key-finder - Fan-out price search across PC game key storefronts
//!
//! Runs the web service by default, or a single search from the terminal.

use anyhow::Result;
use clap::{Parser, Subcommand};
use game_key_finder::commands::{list_stores, SearchCommand, ServeCommand};
use game_key_finder::config::{Config, OutputFormat};
use game_key_finder::stores::Store;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "game-key-finder",
    version,
    about = "Compare PC game key prices across stores",
    long_about = "Searches several game key storefronts concurrently and lists offers cheapest first."
)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// WebDriver endpoint for browser-rendered stores
    #[arg(long, global = true, env = "GKF_WEBDRIVER_URL")]
    webdriver_url: Option<String>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "GKF_PROXY")]
    proxy: Option<String>,

    /// Only search these stores (comma-separated)
    #[arg(long, global = true, value_delimiter = ',')]
    stores: Option<Vec<Store>>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web front end and JSON search endpoint (default)
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Search all stores once and print the offers
    #[command(alias = "s")]
    Search {
        /// Game title to search for
        query: String,

        /// Output format
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },

    /// List the stores that will be searched
    Stores,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(url) = cli.webdriver_url {
        config.webdriver_url = url;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if let Some(stores) = cli.stores {
        config.stores = stores;
    }

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.port = port;
            }
            ServeCommand::new(config).execute().await?;
        }

        Commands::Search { query, format } => {
            if let Some(format) = format {
                config.format = format;
            }
            let output = SearchCommand::new(config).execute(&query).await?;
            println!("{}", output);
        }

        Commands::Stores => {
            println!("{}", list_stores(&config));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_port_not_read_from_env() {
        let saved = std::env::var("PORT").ok();
        std::env::set_var("PORT", "abc");

        let cli = Cli::try_parse_from(["game-key-finder", "serve"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Serve { port: None })));

        match saved {
            Some(v) => std::env::set_var("PORT", v),
            None => std::env::remove_var("PORT"),
        }
    }

    #[test]
    fn test_serve_port_flag() {
        let cli = Cli::try_parse_from(["game-key-finder", "serve", "--port", "8080"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Serve { port: Some(8080) })));
    }

    #[test]
    fn test_store_subset_flag() {
        let cli =
            Cli::try_parse_from(["game-key-finder", "--stores", "cdkeys,g2a", "stores"]).unwrap();
        assert_eq!(cli.stores, Some(vec![Store::CdKeys, Store::G2a]));
    }
}
