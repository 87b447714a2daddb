use super::*;
use async_trait::async_trait;
use chrono::TimeZone;
use market_core::{
    AnalystRating, Candles, CompanyNewsItem, FixtureProvider, Metrics, NewsWindow, Prediction,
    TimeWindow,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Provider with canned responses that records the windows it was asked for.
#[derive(Default)]
struct StubProvider {
    quote: Quote,
    profile: Profile,
    metrics: Metrics,
    candles: Candles,
    news: Vec<CompanyNewsItem>,
    fail_metrics: bool,
    fail_candles: bool,
    /// Delays the quote so other calls settle first
    quote_delay: Option<Duration>,
    calls: AtomicUsize,
    last_window: Mutex<Option<TimeWindow>>,
    last_news_window: Mutex<Option<NewsWindow>>,
}

#[async_trait]
impl MarketDataProvider for StubProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn quote(&self, _symbol: &str) -> Result<Quote, MarketDataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.quote_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.quote.clone())
    }

    async fn profile(&self, _symbol: &str) -> Result<Profile, MarketDataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.profile.clone())
    }

    async fn metrics(&self, _symbol: &str) -> Result<Metrics, MarketDataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_metrics {
            return Err(MarketDataError::UpstreamUnavailable("metrics down".to_string()));
        }
        Ok(self.metrics.clone())
    }

    async fn candles(&self, _symbol: &str, window: &TimeWindow) -> Result<Candles, MarketDataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_window.lock().unwrap() = Some(*window);
        if self.fail_candles {
            return Err(MarketDataError::UpstreamUnavailable("candles down".to_string()));
        }
        Ok(self.candles.clone())
    }

    async fn company_news(
        &self,
        _symbol: &str,
        window: &NewsWindow,
    ) -> Result<Vec<CompanyNewsItem>, MarketDataError> {
        *self.last_news_window.lock().unwrap() = Some(*window);
        Ok(self.news.clone())
    }
}

fn healthy_stub() -> StubProvider {
    StubProvider {
        quote: Quote {
            current_price: 102.0,
            previous_close: 100.0,
            day_low: 99.5,
            day_high: 103.0,
        },
        profile: Profile {
            name: Some("Acme Corp".to_string()),
            shares_outstanding: Some(120.0),
            market_capitalization_millions: Some(12_240.0),
        },
        metrics: Metrics {
            week52_low: Some(80.0),
            week52_high: Some(110.0),
            pe_ratio_ttm: Some(18.2),
        },
        candles: Candles {
            timestamps: Some(vec![1_710_115_200, 1_710_201_600, 1_710_288_000]),
            closes: vec![100.5, 100.0, 102.0],
            volumes: vec![1_200_000.0, 950_000.0, 1_530_000.0],
        },
        ..Default::default()
    }
}

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 16, 0, 0).unwrap()
}

fn orchestrator(stub: StubProvider) -> (DashboardOrchestrator, Arc<StubProvider>) {
    let stub = Arc::new(stub);
    (DashboardOrchestrator::new(stub.clone()), stub)
}

#[tokio::test]
async fn test_summary_assembles_all_fields() {
    let (orch, stub) = orchestrator(healthy_stub());
    let summary = orch
        .get_stock_summary_at(" acme ", "3M", fixed_now())
        .await
        .unwrap();

    assert_eq!(summary.symbol, "ACME");
    assert_eq!(summary.name, "Acme Corp");
    assert_eq!(summary.price, 102.0);
    assert!((summary.change - 2.0).abs() < 1e-9);
    assert!((summary.change_percent - 2.0).abs() < 1e-9);
    assert_eq!(summary.analyst_rating, AnalystRating::Buy);
    assert_eq!(summary.prediction, Prediction::Bullish);
    assert_eq!(summary.volume, "1.53M");
    assert_eq!(summary.market_cap, "12.24B");
    assert_eq!(summary.pe, 18.2);
    assert_eq!(summary.low52, 80.0);
    assert_eq!(summary.high52, 110.0);
    assert_eq!(summary.week_range_52, "80 - 110");
    assert_eq!(summary.historical_data.len(), 3);
    assert_eq!(summary.historical_data[0].date, "2024-03-11");
    assert_eq!(summary.historical_data[2].price, 102.0);

    // quote, profile, metrics, candles
    assert_eq!(stub.calls.load(Ordering::SeqCst), 4);
    let window = stub.last_window.lock().unwrap().unwrap();
    assert_eq!(window.days, 90);
    assert_eq!(window.to_epoch, fixed_now().timestamp());
}

#[tokio::test]
async fn test_unknown_period_uses_one_year() {
    let (orch, stub) = orchestrator(healthy_stub());
    orch.get_stock_summary_at("ACME", "2W", fixed_now())
        .await
        .unwrap();
    assert_eq!(stub.last_window.lock().unwrap().unwrap().days, 365);
}

#[tokio::test]
async fn test_zero_quote_is_symbol_not_found() {
    let mut stub = healthy_stub();
    stub.quote.current_price = 0.0;
    let (orch, _) = orchestrator(stub);

    let err = orch
        .get_stock_summary_at("ACME", "1Y", fixed_now())
        .await
        .unwrap_err();
    assert!(matches!(err, MarketDataError::SymbolNotFound(_)));
}

#[tokio::test]
async fn test_zero_quote_wins_over_missing_profile() {
    let mut stub = healthy_stub();
    stub.quote.current_price = 0.0;
    stub.profile = Profile::default();
    let (orch, _) = orchestrator(stub);

    let err = orch.fetch_snapshot("ACME").await.unwrap_err();
    match err {
        MarketDataError::SymbolNotFound(msg) => assert!(msg.contains("quote")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_slow_zero_quote_wins_over_fast_failures() {
    let mut stub = healthy_stub();
    stub.quote.current_price = 0.0;
    stub.quote_delay = Some(Duration::from_millis(20));
    stub.fail_metrics = true;
    stub.fail_candles = true;
    let (orch, stub) = orchestrator(stub);

    let err = orch
        .get_stock_summary_at("ACME", "1Y", fixed_now())
        .await
        .unwrap_err();
    assert!(matches!(err, MarketDataError::SymbolNotFound(_)), "got {err:?}");
    assert_eq!(stub.calls.load(Ordering::SeqCst), 4);

    let err = orch.fetch_snapshot("ACME").await.unwrap_err();
    assert!(matches!(err, MarketDataError::SymbolNotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn test_candle_failure_aborts_summary() {
    let mut stub = healthy_stub();
    stub.fail_candles = true;
    let (orch, _) = orchestrator(stub);

    let err = orch
        .get_stock_summary_at("ACME", "1Y", fixed_now())
        .await
        .unwrap_err();
    assert!(matches!(err, MarketDataError::UpstreamUnavailable(_)));
}

#[tokio::test]
async fn test_missing_profile_name_is_symbol_not_found() {
    let mut stub = healthy_stub();
    stub.profile.name = Some("   ".to_string());
    let (orch, _) = orchestrator(stub);

    let err = orch.fetch_snapshot("ACME").await.unwrap_err();
    assert!(matches!(err, MarketDataError::SymbolNotFound(_)));
}

#[tokio::test]
async fn test_missing_metrics_fall_back_to_quote() {
    let mut stub = healthy_stub();
    stub.metrics = Metrics::default();
    let (orch, _) = orchestrator(stub);

    let summary = orch
        .get_stock_summary_at("ACME", "1M", fixed_now())
        .await
        .unwrap();
    assert_eq!(summary.low52, 99.5);
    assert_eq!(summary.high52, 103.0);
    assert_eq!(summary.pe, 0.0);
}

#[tokio::test]
async fn test_upstream_failure_aborts_summary() {
    let mut stub = healthy_stub();
    stub.fail_metrics = true;
    let (orch, _) = orchestrator(stub);

    let err = orch
        .get_stock_summary_at("ACME", "1Y", fixed_now())
        .await
        .unwrap_err();
    assert!(matches!(err, MarketDataError::UpstreamUnavailable(_)));
}

#[tokio::test]
async fn test_absent_candles_give_empty_history() {
    let mut stub = healthy_stub();
    stub.candles = Candles::default();
    let (orch, _) = orchestrator(stub);

    let summary = orch
        .get_stock_summary_at("ACME", "1Y", fixed_now())
        .await
        .unwrap();
    assert!(summary.historical_data.is_empty());
    assert_eq!(summary.volume, "0");
}

#[tokio::test]
async fn test_news_capped_and_ordered() {
    let mut stub = healthy_stub();
    stub.news = (0..15)
        .map(|i| CompanyNewsItem {
            headline: format!("Story {i}"),
            summary: None,
            datetime: 1_710_500_000 - i * 600,
            sentiment: None,
            source: "Wire".to_string(),
            url: format!("https://example.com/{i}"),
        })
        .collect();
    let (orch, stub) = orchestrator(stub);

    let news = orch.get_news_at("acme", fixed_now()).await.unwrap();
    assert_eq!(news.len(), 10);
    assert_eq!(news[0].title, "Story 0");
    assert_eq!(news[9].title, "Story 9");
    assert_eq!(news[0].summary, "Story 0");
    assert_eq!(news[0].sentiment, "neutral");

    let window = stub.last_news_window.lock().unwrap().unwrap();
    assert_eq!(window.to.to_string(), "2024-03-15");
    assert_eq!(window.from.to_string(), "2024-02-14");
}

#[tokio::test]
async fn test_blank_symbol_rejected() {
    let (orch, stub) = orchestrator(healthy_stub());
    let err = orch.get_news("  ").await.unwrap_err();
    assert!(matches!(err, MarketDataError::InvalidRequest(_)));
    assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_normalize_symbol() {
    assert_eq!(normalize_symbol(" brk.b ").unwrap(), "BRK.B");
    assert_eq!(normalize_symbol("^gspc").unwrap(), "^GSPC");
    assert!(normalize_symbol("AAPL&token=x").is_err());
    assert!(normalize_symbol("ABCDEFGHIJKLMNOPQ").is_err());
}

#[tokio::test]
async fn test_fixture_provider_end_to_end() {
    let orch = DashboardOrchestrator::new(Arc::new(FixtureProvider::new()));
    assert_eq!(orch.provider_name(), "fixture");

    let summary = orch
        .get_stock_summary_at("TSLA", "6M", fixed_now())
        .await
        .unwrap();
    assert_eq!(summary.name, "Tesla Inc");
    assert_eq!(summary.market_cap, "745.20B");
    assert_eq!(summary.analyst_rating, AnalystRating::Sell);
    assert_eq!(summary.prediction, Prediction::Bearish);
    assert!(!summary.historical_data.is_empty());

    let err = orch
        .get_stock_summary_at("ZZZZ", "6M", fixed_now())
        .await
        .unwrap_err();
    assert!(matches!(err, MarketDataError::SymbolNotFound(_)));

    let news = orch.get_news_at("TSLA", fixed_now()).await.unwrap();
    assert_eq!(news.len(), 3);
    assert_eq!(news[2].sentiment, "neutral");
    assert_eq!(news[2].summary, news[2].title);
}
