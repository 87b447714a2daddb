use chrono::{DateTime, Utc};
use market_core::{
    derive_metrics, news_window_at, reshape_news, resolve_window_at, to_series, MarketDataError,
    MarketDataProvider, Metrics, NewsArticle, Profile, Quote, Snapshot, StockSummary, TimePeriod,
};
use std::sync::Arc;

/// Longest ticker accepted from clients
const MAX_SYMBOL_LEN: usize = 16;

/// Assembles dashboard responses from a market data provider.
///
/// Every call is independent: nothing is cached between requests and any
/// failing upstream call aborts the whole response.
#[derive(Clone)]
pub struct DashboardOrchestrator {
    provider: Arc<dyn MarketDataProvider>,
}

impl DashboardOrchestrator {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    /// Name of the provider in use ("finnhub", "fixture", ...)
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Quote, profile and metrics fetched concurrently and validated.
    pub async fn fetch_snapshot(&self, symbol: &str) -> Result<Snapshot, MarketDataError> {
        let symbol = normalize_symbol(symbol)?;
        let provider = self.provider.as_ref();

        let (quote, profile, metrics) = tokio::join!(
            provider.quote(&symbol),
            provider.profile(&symbol),
            provider.metrics(&symbol),
        );

        assemble_snapshot(symbol, quote, profile, metrics)
    }

    pub async fn get_stock_summary(
        &self,
        symbol: &str,
        period: &str,
    ) -> Result<StockSummary, MarketDataError> {
        self.get_stock_summary_at(symbol, period, Utc::now()).await
    }

    /// Build the full summary with the history window ending at `now`.
    pub async fn get_stock_summary_at(
        &self,
        symbol: &str,
        period: &str,
        now: DateTime<Utc>,
    ) -> Result<StockSummary, MarketDataError> {
        let symbol = normalize_symbol(symbol)?;
        let period_token = TimePeriod::parse_or_default(period);
        let window = resolve_window_at(period_token.token(), now);

        tracing::info!(
            "Fetching stock summary for {} (period: {}, days: {}, provider: {})",
            symbol,
            period_token,
            window.days,
            self.provider.name()
        );

        let provider = self.provider.as_ref();
        let (quote, profile, metrics, candles) = tokio::join!(
            provider.quote(&symbol),
            provider.profile(&symbol),
            provider.metrics(&symbol),
            provider.candles(&symbol, &window),
        );

        let (snapshot, candles) = assemble_snapshot(symbol.clone(), quote, profile, metrics)
            .and_then(|snapshot| Ok((snapshot, candles?)))
            .inspect_err(|e| tracing::warn!("Stock summary for {} failed: {}", symbol, e))?;

        let historical_data = to_series(&candles);
        let derived = derive_metrics(
            &snapshot.quote,
            &snapshot.profile,
            &snapshot.metrics,
            &candles,
        );

        tracing::info!(
            "Stock summary for {} ready: {} points, rating {}",
            symbol,
            historical_data.len(),
            derived.analyst_rating.to_label()
        );

        Ok(StockSummary {
            symbol: snapshot.symbol,
            name: snapshot.name,
            price: snapshot.quote.current_price,
            change: derived.change,
            change_percent: derived.change_percent,
            volume: derived.volume,
            market_cap: derived.market_cap,
            pe: derived.pe,
            low52: derived.low52,
            high52: derived.high52,
            week_range_52: format!("{} - {}", derived.low52, derived.high52),
            historical_data,
            prediction: derived.prediction,
            target_price: derived.target_price,
            analyst_rating: derived.analyst_rating,
        })
    }

    pub async fn get_news(&self, symbol: &str) -> Result<Vec<NewsArticle>, MarketDataError> {
        self.get_news_at(symbol, Utc::now()).await
    }

    /// Up to ten articles from the 30 days ending at `now`, in upstream order.
    pub async fn get_news_at(
        &self,
        symbol: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<NewsArticle>, MarketDataError> {
        let symbol = normalize_symbol(symbol)?;
        let window = news_window_at(now);

        tracing::info!("Fetching news for {} ({} to {})", symbol, window.from, window.to);

        let items = self
            .provider
            .company_news(&symbol, &window)
            .await
            .inspect_err(|e| tracing::warn!("News for {} failed: {}", symbol, e))?;

        let articles = reshape_news(items);
        tracing::info!("Fetched {} news articles for {}", articles.len(), symbol);
        Ok(articles)
    }
}

/// Combine the snapshot calls once all have settled. Errors are checked in a
/// fixed order, quote first, so a symbol with no quote is reported as not
/// found whatever the other calls returned.
fn assemble_snapshot(
    symbol: String,
    quote: Result<Quote, MarketDataError>,
    profile: Result<Profile, MarketDataError>,
    metrics: Result<Metrics, MarketDataError>,
) -> Result<Snapshot, MarketDataError> {
    let quote = quote?;
    validate_quote(&symbol, &quote)?;
    let profile = profile?;
    let metrics = metrics?;
    let name = validate_profile(&symbol, &profile)?;

    Ok(Snapshot {
        symbol,
        name,
        quote,
        profile,
        metrics,
    })
}

/// Trim and upper-case a client-supplied ticker.
pub fn normalize_symbol(raw: &str) -> Result<String, MarketDataError> {
    let symbol = raw.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(MarketDataError::InvalidRequest("symbol is required".to_string()));
    }
    if symbol.len() > MAX_SYMBOL_LEN
        || !symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | ':' | '^' | '='))
    {
        return Err(MarketDataError::InvalidRequest(format!("invalid symbol: {}", raw.trim())));
    }
    Ok(symbol)
}

/// A zero or missing current price means the upstream has no data for the symbol.
pub fn validate_quote(symbol: &str, quote: &Quote) -> Result<(), MarketDataError> {
    if quote.current_price == 0.0 || !quote.current_price.is_finite() {
        return Err(MarketDataError::SymbolNotFound(format!(
            "{}: no quote data",
            symbol
        )));
    }
    Ok(())
}

/// Returns the display name; a profile without one means the symbol is unknown.
pub fn validate_profile(symbol: &str, profile: &Profile) -> Result<String, MarketDataError> {
    profile
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .ok_or_else(|| MarketDataError::SymbolNotFound(format!("{}: no company profile", symbol)))
}

#[cfg(test)]
mod orchestrator_tests;
