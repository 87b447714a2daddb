use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    #[error("Configuration missing: {0}")]
    ConfigurationMissing(String),

    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl MarketDataError {
    /// Short machine-readable kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            MarketDataError::ConfigurationMissing(_) => "configuration_missing",
            MarketDataError::SymbolNotFound(_) => "symbol_not_found",
            MarketDataError::UpstreamUnavailable(_) => "upstream_unavailable",
            MarketDataError::InvalidRequest(_) => "invalid_request",
        }
    }
}

pub type MarketDataResult<T> = Result<T, MarketDataError>;
