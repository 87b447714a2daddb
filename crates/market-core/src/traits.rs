use async_trait::async_trait;

use crate::{Candles, CompanyNewsItem, MarketDataError, Metrics, NewsWindow, Profile, Quote, TimeWindow};

/// Source of market data for the dashboard.
///
/// Implemented by the live Finnhub client and by the static fixture provider;
/// callers never need to know which one they hold.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Short label for logs and the health endpoint
    fn name(&self) -> &'static str;

    /// Current quote. An unknown symbol may come back as a zero price.
    async fn quote(&self, symbol: &str) -> Result<Quote, MarketDataError>;

    async fn profile(&self, symbol: &str) -> Result<Profile, MarketDataError>;

    async fn metrics(&self, symbol: &str) -> Result<Metrics, MarketDataError>;

    /// Daily candles between the window's epoch bounds
    async fn candles(&self, symbol: &str, window: &TimeWindow) -> Result<Candles, MarketDataError>;

    /// Company news, most recent first
    async fn company_news(
        &self,
        symbol: &str,
        window: &NewsWindow,
    ) -> Result<Vec<CompanyNewsItem>, MarketDataError>;
}
