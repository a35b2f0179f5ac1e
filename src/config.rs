//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::stores::{Store, Timeouts};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Port the HTTP service listens on
    #[serde(default = "default_port")]
    pub port: u16,

    /// User agent for outbound requests (browser emulation when unset)
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// WebDriver endpoint used by browser-rendered stores
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Deadline for a plain HTTP store search
    #[serde(default = "default_static_timeout_ms")]
    pub static_timeout_ms: u64,

    /// Deadline for a browser-rendered store search
    #[serde(default = "default_dynamic_timeout_ms")]
    pub dynamic_timeout_ms: u64,

    /// How long a rendered page may take to show its first result
    #[serde(default = "default_render_wait_ms")]
    pub render_wait_ms: u64,

    /// Result containers inspected per rendered page
    #[serde(default = "default_dynamic_limit")]
    pub dynamic_limit: usize,

    /// Stores to search (all when empty)
    #[serde(default)]
    pub stores: Vec<Store>,

    /// Output format for the search command
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_port() -> u16 {
    5000
}

fn default_webdriver_url() -> String {
    "http://localhost:9515".to_string()
}

fn default_static_timeout_ms() -> u64 {
    10_000
}

fn default_dynamic_timeout_ms() -> u64 {
    45_000
}

fn default_render_wait_ms() -> u64 {
    8_000
}

fn default_dynamic_limit() -> usize {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            user_agent: None,
            proxy: None,
            webdriver_url: default_webdriver_url(),
            static_timeout_ms: default_static_timeout_ms(),
            dynamic_timeout_ms: default_dynamic_timeout_ms(),
            render_wait_ms: default_render_wait_ms(),
            dynamic_limit: default_dynamic_limit(),
            stores: Vec::new(),
            format: OutputFormat::Table,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("game-key-finder").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(port) = std::env::var("PORT") {
            if let Ok(p) = port.parse() {
                self.port = p;
            }
        }

        if let Ok(agent) = std::env::var("GKF_USER_AGENT") {
            self.user_agent = Some(agent);
        }

        if let Ok(proxy) = std::env::var("GKF_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(url) = std::env::var("GKF_WEBDRIVER_URL") {
            self.webdriver_url = url;
        }

        if let Ok(ms) = std::env::var("GKF_STATIC_TIMEOUT_MS") {
            if let Ok(ms) = ms.parse() {
                self.static_timeout_ms = ms;
            }
        }

        if let Ok(ms) = std::env::var("GKF_DYNAMIC_TIMEOUT_MS") {
            if let Ok(ms) = ms.parse() {
                self.dynamic_timeout_ms = ms;
            }
        }

        self
    }

    pub fn static_timeout(&self) -> Duration {
        Duration::from_millis(self.static_timeout_ms)
    }

    pub fn dynamic_timeout(&self) -> Duration {
        Duration::from_millis(self.dynamic_timeout_ms)
    }

    pub fn render_wait(&self) -> Duration {
        Duration::from_millis(self.render_wait_ms)
    }

    /// Returns the per-kind fetch deadlines.
    pub fn timeouts(&self) -> Timeouts {
        Timeouts { static_fetch: self.static_timeout(), dynamic_fetch: self.dynamic_timeout() }
    }

    /// Returns the stores to search, in registration order.
    pub fn enabled_stores(&self) -> Vec<Store> {
        Store::all()
            .iter()
            .copied()
            .filter(|store| self.stores.is_empty() || self.stores.contains(store))
            .collect()
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
