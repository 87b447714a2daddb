use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Symbolic time-window selector for the price history chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimePeriod {
    OneMonth,
    ThreeMonths,
    SixMonths,
    #[default]
    OneYear,
    ThreeYears,
    FiveYears,
    TenYears,
}

impl TimePeriod {
    pub const ALL: [TimePeriod; 7] = [
        TimePeriod::OneMonth,
        TimePeriod::ThreeMonths,
        TimePeriod::SixMonths,
        TimePeriod::OneYear,
        TimePeriod::ThreeYears,
        TimePeriod::FiveYears,
        TimePeriod::TenYears,
    ];

    /// Calendar days covered by the window
    pub fn days(&self) -> i64 {
        match self {
            TimePeriod::OneMonth => 30,
            TimePeriod::ThreeMonths => 90,
            TimePeriod::SixMonths => 180,
            TimePeriod::OneYear => 365,
            TimePeriod::ThreeYears => 1095,
            TimePeriod::FiveYears => 1825,
            TimePeriod::TenYears => 3650,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            TimePeriod::OneMonth => "1M",
            TimePeriod::ThreeMonths => "3M",
            TimePeriod::SixMonths => "6M",
            TimePeriod::OneYear => "1Y",
            TimePeriod::ThreeYears => "3Y",
            TimePeriod::FiveYears => "5Y",
            TimePeriod::TenYears => "10Y",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.token().eq_ignore_ascii_case(token))
    }

    /// Unrecognized tokens resolve to the one-year window.
    pub fn parse_or_default(token: &str) -> Self {
        Self::from_token(token).unwrap_or_default()
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Resolved epoch bounds for a candle request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub days: i64,
    pub from_epoch: i64,
    pub to_epoch: i64,
}

/// Calendar-day bounds for a company news request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Current quote for a symbol
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub current_price: f64,
    pub previous_close: f64,
    pub day_low: f64,
    pub day_high: f64,
}

/// Company profile. A missing name means the symbol is unknown upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: Option<String>,
    pub shares_outstanding: Option<f64>,
    pub market_capitalization_millions: Option<f64>,
}

/// Fundamental metrics; every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub week52_low: Option<f64>,
    pub week52_high: Option<f64>,
    pub pe_ratio_ttm: Option<f64>,
}

/// Columnar daily candles.
///
/// `timestamps` is `None` when the upstream omitted the array entirely,
/// which happens for windows with no trading data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candles {
    pub timestamps: Option<Vec<i64>>,
    pub closes: Vec<f64>,
    pub volumes: Vec<f64>,
}

/// Validated quote, profile and metrics for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub symbol: String,
    pub name: String,
    pub quote: Quote,
    pub profile: Profile,
    pub metrics: Metrics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PricePoint {
    /// UTC calendar day, `YYYY-MM-DD`
    pub date: String,
    pub price: f64,
}

/// Discrete rating bucket derived from the latest change percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum AnalystRating {
    #[serde(rename = "Strong Buy")]
    StrongBuy,
    Buy,
    Hold,
    Sell,
}

impl AnalystRating {
    pub fn to_label(&self) -> &'static str {
        match self {
            AnalystRating::StrongBuy => "Strong Buy",
            AnalystRating::Buy => "Buy",
            AnalystRating::Hold => "Hold",
            AnalystRating::Sell => "Sell",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Prediction {
    Bullish,
    Bearish,
}

/// Everything the dashboard renders for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct StockSummary {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: String,
    pub market_cap: String,
    pub pe: f64,
    pub low52: f64,
    pub high52: f64,
    #[serde(rename = "weekRange52")]
    pub week_range_52: String,
    pub historical_data: Vec<PricePoint>,
    pub prediction: Prediction,
    pub target_price: f64,
    pub analyst_rating: AnalystRating,
}

/// Company news entry as the upstream returns it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyNewsItem {
    pub headline: String,
    pub summary: Option<String>,
    /// Publication time, epoch seconds
    pub datetime: i64,
    pub sentiment: Option<String>,
    pub source: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewsArticle {
    pub title: String,
    pub summary: String,
    pub time: String,
    pub sentiment: String,
    pub source: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewsFeed {
    pub news: Vec<NewsArticle>,
}
