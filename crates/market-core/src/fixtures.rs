//! Static market data for offline use and demos.
//!
//! Mirrors how the live upstream answers for unknown tickers: a zero quote,
//! an empty profile, no candles and no news.

use async_trait::async_trait;

use crate::period::SECONDS_PER_DAY;
use crate::{
    Candles, CompanyNewsItem, MarketDataError, MarketDataProvider, Metrics, NewsWindow, Profile,
    Quote, TimeWindow,
};

struct FixtureTicker {
    symbol: &'static str,
    name: &'static str,
    price: f64,
    previous_close: f64,
    day_low: f64,
    day_high: f64,
    market_cap_millions: f64,
    shares_outstanding_millions: f64,
    pe: f64,
    low52: f64,
    high52: f64,
    average_volume: f64,
    news: &'static [FixtureNews],
}

struct FixtureNews {
    headline: &'static str,
    summary: &'static str,
    sentiment: &'static str,
    source: &'static str,
}

const TICKERS: &[FixtureTicker] = &[
    FixtureTicker {
        symbol: "AAPL",
        name: "Apple Inc",
        price: 189.25,
        previous_close: 186.82,
        day_low: 186.10,
        day_high: 190.05,
        market_cap_millions: 2_970_000.0,
        shares_outstanding_millions: 15_441.88,
        pe: 28.4,
        low52: 164.08,
        high52: 199.62,
        average_volume: 45_200_000.0,
        news: &[
            FixtureNews {
                headline: "Apple Reports Strong Q4 Earnings Despite Supply Chain Challenges",
                summary: "Apple Inc. reported better-than-expected quarterly earnings, driven by strong iPhone sales and services revenue growth.",
                sentiment: "positive",
                source: "Reuters",
            },
            FixtureNews {
                headline: "New iPad Pro Models Expected to Drive Next Quarter Growth",
                summary: "Industry analysts predict the upcoming iPad Pro refresh will boost Apple's tablet market share.",
                sentiment: "positive",
                source: "Bloomberg",
            },
            FixtureNews {
                headline: "Regulatory Concerns in EU May Impact App Store Revenue",
                summary: "The Digital Markets Act could force changes to App Store policies, potentially affecting revenue streams.",
                sentiment: "negative",
                source: "Financial Times",
            },
        ],
    },
    FixtureTicker {
        symbol: "TSLA",
        name: "Tesla Inc",
        price: 234.56,
        previous_close: 239.68,
        day_low: 231.02,
        day_high: 240.11,
        market_cap_millions: 745_200.0,
        shares_outstanding_millions: 3_178.92,
        pe: 65.2,
        low52: 138.80,
        high52: 299.29,
        average_volume: 89_300_000.0,
        news: &[
            FixtureNews {
                headline: "Tesla Delivers Record Number of Vehicles in Q4",
                summary: "Tesla reported record quarterly deliveries, exceeding analyst expectations.",
                sentiment: "positive",
                source: "CNBC",
            },
            FixtureNews {
                headline: "Cybertruck Production Ramp-Up Faces Manufacturing Challenges",
                summary: "Cybertruck production is experiencing delays due to complex manufacturing processes.",
                sentiment: "negative",
                source: "WSJ",
            },
            FixtureNews {
                headline: "Expansion into India Market Shows Promise",
                summary: "",
                sentiment: "",
                source: "Economic Times",
            },
        ],
    },
    FixtureTicker {
        symbol: "MSFT",
        name: "Microsoft Corp",
        price: 378.91,
        previous_close: 370.24,
        day_low: 369.80,
        day_high: 380.12,
        market_cap_millions: 2_810_000.0,
        shares_outstanding_millions: 7_432.31,
        pe: 34.1,
        low52: 309.45,
        high52: 384.30,
        average_volume: 32_100_000.0,
        news: &[
            FixtureNews {
                headline: "Microsoft Azure Growth Accelerates on AI Demand",
                summary: "Cloud revenue growth beat estimates as enterprise AI workloads ramp up.",
                sentiment: "positive",
                source: "Bloomberg",
            },
            FixtureNews {
                headline: "Microsoft Faces Antitrust Questions Over Teams Bundling",
                summary: "European regulators opened a formal review of the Teams and Office bundle.",
                sentiment: "negative",
                source: "Reuters",
            },
        ],
    },
];

/// Serves the built-in AAPL, TSLA and MSFT fixtures.
#[derive(Debug, Clone, Default)]
pub struct FixtureProvider;

impl FixtureProvider {
    pub fn new() -> Self {
        Self
    }

    /// Symbols with fixture data
    pub fn symbols() -> Vec<&'static str> {
        TICKERS.iter().map(|t| t.symbol).collect()
    }

    fn lookup(symbol: &str) -> Option<&'static FixtureTicker> {
        TICKERS.iter().find(|t| t.symbol.eq_ignore_ascii_case(symbol))
    }
}

#[async_trait]
impl MarketDataProvider for FixtureProvider {
    fn name(&self) -> &'static str {
        "fixture"
    }

    async fn quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        Ok(Self::lookup(symbol)
            .map(|t| Quote {
                current_price: t.price,
                previous_close: t.previous_close,
                day_low: t.day_low,
                day_high: t.day_high,
            })
            .unwrap_or_default())
    }

    async fn profile(&self, symbol: &str) -> Result<Profile, MarketDataError> {
        Ok(Self::lookup(symbol)
            .map(|t| Profile {
                name: Some(t.name.to_string()),
                shares_outstanding: Some(t.shares_outstanding_millions),
                market_capitalization_millions: Some(t.market_cap_millions),
            })
            .unwrap_or_default())
    }

    async fn metrics(&self, symbol: &str) -> Result<Metrics, MarketDataError> {
        Ok(Self::lookup(symbol)
            .map(|t| Metrics {
                week52_low: Some(t.low52),
                week52_high: Some(t.high52),
                pe_ratio_ttm: Some(t.pe),
            })
            .unwrap_or_default())
    }

    async fn candles(&self, symbol: &str, window: &TimeWindow) -> Result<Candles, MarketDataError> {
        let Some(ticker) = Self::lookup(symbol) else {
            return Ok(Candles::default());
        };
        Ok(synthetic_candles(ticker, window))
    }

    async fn company_news(
        &self,
        symbol: &str,
        window: &NewsWindow,
    ) -> Result<Vec<CompanyNewsItem>, MarketDataError> {
        let Some(ticker) = Self::lookup(symbol) else {
            return Ok(Vec::new());
        };

        // Anchor at 10:30 UTC on the last day of the window, one day apart
        let anchor = window
            .to
            .and_hms_opt(10, 30, 0)
            .map(|dt| dt.and_utc().timestamp())
            .unwrap_or_default();

        Ok(ticker
            .news
            .iter()
            .enumerate()
            .map(|(i, n)| CompanyNewsItem {
                headline: n.headline.to_string(),
                summary: Some(n.summary.to_string()),
                datetime: anchor - i as i64 * SECONDS_PER_DAY,
                sentiment: Some(n.sentiment.to_string()),
                source: n.source.to_string(),
                url: format!(
                    "https://news.example.com/{}/{}",
                    ticker.symbol.to_lowercase(),
                    i + 1
                ),
            })
            .collect())
    }
}

/// One candle per weekday in the window, deterministic in the epoch day so
/// overlapping windows agree on shared days.
fn synthetic_candles(ticker: &FixtureTicker, window: &TimeWindow) -> Candles {
    let first_day = window.from_epoch.div_euclid(SECONDS_PER_DAY) + 1;
    let last_day = window.to_epoch.div_euclid(SECONDS_PER_DAY);

    let mut candles = Candles {
        timestamps: Some(Vec::new()),
        closes: Vec::new(),
        volumes: Vec::new(),
    };

    let mid = (ticker.low52 + ticker.high52) / 2.0;
    let amplitude = (ticker.high52 - ticker.low52) / 2.0;

    for day in first_day..=last_day {
        // 1970-01-01 was a Thursday; 5 and 6 are Saturday and Sunday
        if (day + 3).rem_euclid(7) >= 5 {
            continue;
        }

        let t = day as f64;
        let close = mid + amplitude * (0.7 * (t / 47.0).sin() + 0.25 * (t / 9.0).sin());
        let volume = ticker.average_volume * (1.0 + 0.2 * (t / 3.0).sin());

        if let Some(ts) = candles.timestamps.as_mut() {
            ts.push(day * SECONDS_PER_DAY);
        }
        candles.closes.push((close * 100.0).round() / 100.0);
        candles.volumes.push(volume.round());
    }

    candles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{resolve_window_at, to_series};
    use chrono::{Datelike, NaiveDate, TimeZone, Utc, Weekday};

    #[tokio::test]
    async fn test_known_symbol_quote() {
        let provider = FixtureProvider::new();
        let quote = provider.quote("aapl").await.unwrap();
        assert_eq!(quote.current_price, 189.25);
        assert_eq!(quote.previous_close, 186.82);
    }

    #[tokio::test]
    async fn test_unknown_symbol_looks_like_upstream_miss() {
        let provider = FixtureProvider::new();
        assert_eq!(provider.quote("ZZZZ").await.unwrap().current_price, 0.0);
        assert!(provider.profile("ZZZZ").await.unwrap().name.is_none());
        let window = resolve_window_at("1M", Utc::now());
        assert!(provider.candles("ZZZZ", &window).await.unwrap().timestamps.is_none());
    }

    #[tokio::test]
    async fn test_candles_skip_weekends() {
        let provider = FixtureProvider::new();
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 20, 0, 0).unwrap();
        let window = resolve_window_at("1M", now);
        let candles = provider.candles("MSFT", &window).await.unwrap();

        let series = to_series(&candles);
        // 2024-02-15 through 2024-03-15 holds 22 weekdays
        assert_eq!(series.len(), 22);
        for point in &series {
            let day = NaiveDate::parse_from_str(&point.date, "%Y-%m-%d").unwrap();
            assert!(!matches!(day.weekday(), Weekday::Sat | Weekday::Sun));
        }
        assert_eq!(candles.volumes.len(), series.len());
    }

    #[tokio::test]
    async fn test_news_inside_window() {
        let provider = FixtureProvider::new();
        let window = NewsWindow {
            from: NaiveDate::from_ymd_opt(2024, 2, 14).unwrap(),
            to: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        };
        let news = provider.company_news("TSLA", &window).await.unwrap();
        assert_eq!(news.len(), 3);
        assert!(news.windows(2).all(|w| w[0].datetime > w[1].datetime));
    }
}
