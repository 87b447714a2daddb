//! Server configuration read from the process environment (after `.env` is loaded).

use std::net::SocketAddr;
use std::time::Duration;

use finnhub_client::BASE_URL as FINNHUB_BASE_URL;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Where market data comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Live,
    Fixture,
}

impl DataSource {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fixture" | "fixtures" | "mock" => Some(DataSource::Fixture),
            "live" | "finnhub" => Some(DataSource::Live),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    pub data_source: DataSource,
    pub finnhub_api_key: Option<String>,
    pub finnhub_base_url: String,
    pub upstream_timeout: Duration,
    pub enable_hsts: bool,
    pub json_logging: bool,
    /// Problems found while reading the environment. Config is read before
    /// the subscriber exists, so these are logged once tracing is up.
    pub warnings: Vec<String>,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_addr", &self.bind_addr)
            .field("port", &self.port)
            .field("data_source", &self.data_source)
            .field("finnhub_api_key", &self.finnhub_api_key.as_ref().map(|_| "***"))
            .field("finnhub_base_url", &self.finnhub_base_url)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("enable_hsts", &self.enable_hsts)
            .field("json_logging", &self.json_logging)
            .field("warnings", &self.warnings)
            .finish()
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup, so tests need not touch the environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |key: &str| {
            lookup(key)
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(false)
        };

        let mut warnings = Vec::new();
        let data_source = match lookup("DATA_SOURCE") {
            None => DataSource::Live,
            Some(raw) => DataSource::parse(&raw).unwrap_or_else(|| {
                warnings.push(format!("Unknown DATA_SOURCE '{}', using live data", raw.trim()));
                DataSource::Live
            }),
        };

        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            port: lookup("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            data_source,
            finnhub_api_key: lookup("FINNHUB_API_KEY").filter(|k| !k.trim().is_empty()),
            finnhub_base_url: lookup("FINNHUB_BASE_URL")
                .unwrap_or_else(|| FINNHUB_BASE_URL.to_string()),
            upstream_timeout: Duration::from_secs(
                lookup("FINNHUB_TIMEOUT_SECS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            ),
            enable_hsts: flag("ENABLE_HSTS"),
            json_logging: lookup("RUST_LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
            warnings,
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.bind_addr, self.port);
        addr.parse()
            .map_err(|e| anyhow::anyhow!("Invalid bind address {}: {}", addr, e))
    }
}
