use async_trait::async_trait;
use market_core::{
    Candles, CompanyNewsItem, MarketDataError, MarketDataProvider, Metrics, NewsWindow, Profile,
    Quote, TimeWindow,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

pub const BASE_URL: &str = "https://finnhub.io/api/v1";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone)]
pub struct FinnhubClient {
    api_key: String,
    base_url: String,
    client: Client,
}

impl std::fmt::Debug for FinnhubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinnhubClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl FinnhubClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, BASE_URL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_base_url(api_key: String, base_url: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// GET `path` with the token attached. No retries: a transport failure,
    /// non-success status or undecodable body surfaces immediately.
    ///
    /// Returns `Ok(None)` when the body is empty or JSON `null`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>, MarketDataError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("Finnhub GET {}", path);

        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("token", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| upstream_error(path, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Finnhub {} returned HTTP {}", path, status);
            return Err(MarketDataError::UpstreamUnavailable(format!(
                "{} HTTP {}: {}",
                path,
                status,
                body.trim()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| upstream_error(path, e))?;

        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(None);
        }

        serde_json::from_str(trimmed).map(Some).map_err(|e| {
            MarketDataError::UpstreamUnavailable(format!("{} returned malformed JSON: {}", path, e))
        })
    }

    pub async fn get_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        let body: QuoteResponse = self
            .get_json("/quote", &[("symbol", symbol.to_string())])
            .await?
            .ok_or_else(|| MarketDataError::SymbolNotFound(format!("{}: empty quote", symbol)))?;

        if let Some(error) = body.error {
            return Err(MarketDataError::SymbolNotFound(format!("{}: {}", symbol, error)));
        }

        Ok(Quote {
            current_price: body.c.unwrap_or(0.0),
            previous_close: body.pc.unwrap_or(0.0),
            day_low: body.l.unwrap_or(0.0),
            day_high: body.h.unwrap_or(0.0),
        })
    }

    pub async fn get_profile(&self, symbol: &str) -> Result<Profile, MarketDataError> {
        let body: Option<ProfileResponse> = self
            .get_json("/stock/profile2", &[("symbol", symbol.to_string())])
            .await?;

        Ok(body
            .map(|p| Profile {
                name: p.name.filter(|n| !n.trim().is_empty()),
                shares_outstanding: p.share_outstanding,
                market_capitalization_millions: p.market_capitalization,
            })
            .unwrap_or_default())
    }

    pub async fn get_metrics(&self, symbol: &str) -> Result<Metrics, MarketDataError> {
        let body: Option<MetricResponse> = self
            .get_json(
                "/stock/metric",
                &[("symbol", symbol.to_string()), ("metric", "all".to_string())],
            )
            .await?;

        let metric = body.and_then(|b| b.metric).unwrap_or_default();
        Ok(Metrics {
            week52_low: metric.week52_low,
            week52_high: metric.week52_high,
            pe_ratio_ttm: metric.pe_ttm.or(metric.pe_basic_excl_extra_ttm),
        })
    }

    pub async fn get_candles(
        &self,
        symbol: &str,
        window: &TimeWindow,
    ) -> Result<Candles, MarketDataError> {
        let body: Option<CandleResponse> = self
            .get_json(
                "/stock/candle",
                &[
                    ("symbol", symbol.to_string()),
                    ("resolution", "D".to_string()),
                    ("from", window.from_epoch.to_string()),
                    ("to", window.to_epoch.to_string()),
                ],
            )
            .await?;

        let Some(body) = body else {
            return Ok(Candles::default());
        };

        if body.s.as_deref() == Some("no_data") {
            tracing::debug!("Finnhub has no candles for {} in window", symbol);
            return Ok(Candles::default());
        }

        Ok(Candles {
            timestamps: body.t,
            closes: body.c.unwrap_or_default(),
            volumes: body.v.unwrap_or_default(),
        })
    }

    pub async fn get_company_news(
        &self,
        symbol: &str,
        window: &NewsWindow,
    ) -> Result<Vec<CompanyNewsItem>, MarketDataError> {
        let body: Option<Vec<NewsResult>> = self
            .get_json(
                "/company-news",
                &[
                    ("symbol", symbol.to_string()),
                    ("from", window.from.format("%Y-%m-%d").to_string()),
                    ("to", window.to.format("%Y-%m-%d").to_string()),
                ],
            )
            .await?;

        Ok(body
            .unwrap_or_default()
            .into_iter()
            .map(|r| CompanyNewsItem {
                headline: r.headline,
                summary: r.summary,
                datetime: r.datetime,
                sentiment: r.sentiment,
                source: r.source,
                url: r.url,
            })
            .collect())
    }
}

/// Strip the URL from reqwest errors so the token never reaches logs or clients.
fn upstream_error(path: &str, e: reqwest::Error) -> MarketDataError {
    let kind = if e.is_timeout() {
        "timed out"
    } else if e.is_connect() {
        "connection failed"
    } else if e.is_decode() {
        "undecodable body"
    } else {
        "request failed"
    };
    MarketDataError::UpstreamUnavailable(format!("{} {}: {}", path, kind, e.without_url()))
}

#[async_trait]
impl MarketDataProvider for FinnhubClient {
    fn name(&self) -> &'static str {
        "finnhub"
    }

    async fn quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        self.get_quote(symbol).await
    }

    async fn profile(&self, symbol: &str) -> Result<Profile, MarketDataError> {
        self.get_profile(symbol).await
    }

    async fn metrics(&self, symbol: &str) -> Result<Metrics, MarketDataError> {
        self.get_metrics(symbol).await
    }

    async fn candles(&self, symbol: &str, window: &TimeWindow) -> Result<Candles, MarketDataError> {
        self.get_candles(symbol, window).await
    }

    async fn company_news(
        &self,
        symbol: &str,
        window: &NewsWindow,
    ) -> Result<Vec<CompanyNewsItem>, MarketDataError> {
        self.get_company_news(symbol, window).await
    }
}

// Response structures
#[derive(Debug, Deserialize)]
struct QuoteResponse {
    c: Option<f64>,  // current price
    pc: Option<f64>, // previous close
    l: Option<f64>,  // day low
    h: Option<f64>,  // day high
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileResponse {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    share_outstanding: Option<f64>,
    /// In millions
    #[serde(default)]
    market_capitalization: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct MetricResponse {
    #[serde(default)]
    metric: Option<MetricValues>,
}

#[derive(Debug, Default, Deserialize)]
struct MetricValues {
    #[serde(rename = "52WeekLow", default)]
    week52_low: Option<f64>,
    #[serde(rename = "52WeekHigh", default)]
    week52_high: Option<f64>,
    #[serde(rename = "peTTM", default)]
    pe_ttm: Option<f64>,
    #[serde(rename = "peBasicExclExtraTTM", default)]
    pe_basic_excl_extra_ttm: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CandleResponse {
    #[serde(default)]
    s: Option<String>, // status: "ok" or "no_data"
    #[serde(default)]
    t: Option<Vec<i64>>, // timestamps, epoch seconds
    #[serde(default)]
    c: Option<Vec<f64>>, // closes
    #[serde(default)]
    v: Option<Vec<f64>>, // volumes
}

#[derive(Debug, Deserialize)]
struct NewsResult {
    #[serde(default)]
    headline: String,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    datetime: i64,
    #[serde(default)]
    sentiment: Option<String>,
    #[serde(default)]
    source: String,
    #[serde(default)]
    url: String,
}
