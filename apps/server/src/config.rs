//! Configuration management for the plan server

use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub broker: BrokerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Which search backend to wire up. `memory` keeps the projection in
    /// process (tests, local development); `http` targets an
    /// Elasticsearch-compatible REST endpoint.
    #[serde(default)]
    pub backend: SearchBackendKind,
    #[serde(default = "default_search_url")]
    pub url: String,
    #[serde(default = "default_search_index")]
    pub index: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchBackendKind {
    #[default]
    Memory,
    Http,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrokerConfig {
    /// Bounded capacity of the in-process event queue. When full, events are
    /// dropped (delivery is best-effort), never blocked on.
    #[serde(default = "default_event_queue_capacity")]
    pub event_queue_capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default tracing filter; `RUST_LOG` overrides it.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// `text` or `json`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Config {
    /// Load configuration from `config.{yaml,toml,json}` (optional) with
    /// `PLAN__`-prefixed environment overrides, e.g. `PLAN__SERVER__PORT=9090`.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("PLAN").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.search.index.is_empty() {
            return Err("search.index must not be empty".to_string());
        }
        if self.search.backend == SearchBackendKind::Http
            && !(self.search.url.starts_with("http://") || self.search.url.starts_with("https://"))
        {
            return Err(format!(
                "search.url '{}' must be an http(s) URL",
                self.search.url
            ));
        }
        if self.broker.event_queue_capacity == 0 {
            return Err("broker.event_queue_capacity must be at least 1".to_string());
        }
        match self.logging.format.as_str() {
            "text" | "json" => {}
            other => return Err(format!("logging.format '{other}' is not 'text' or 'json'")),
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            search: SearchConfig::default(),
            broker: BrokerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            backend: SearchBackendKind::default(),
            url: default_search_url(),
            index: default_search_index(),
        }
    }
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            event_queue_capacity: default_event_queue_capacity(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_search_url() -> String {
    "http://localhost:9200".to_string()
}

fn default_search_index() -> String {
    "plans".to_string()
}

fn default_event_queue_capacity() -> usize {
    1024
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}
