use crate::{format_magnitude, AnalystRating, Candles, Metrics, Prediction, Profile, Quote};

/// The target price amplifies the latest move by this factor.
pub const TARGET_AMPLIFICATION: f64 = 1.5;

/// Profile market cap is reported in millions.
const MARKET_CAP_UNIT: f64 = 1_000_000.0;

/// Summary numbers computed from one snapshot and its candles
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedMetrics {
    pub change: f64,
    pub change_percent: f64,
    pub target_price: f64,
    pub analyst_rating: AnalystRating,
    pub prediction: Prediction,
    pub volume: String,
    pub market_cap: String,
    pub pe: f64,
    pub low52: f64,
    pub high52: f64,
}

pub fn derive_metrics(
    quote: &Quote,
    profile: &Profile,
    metrics: &Metrics,
    candles: &Candles,
) -> DerivedMetrics {
    let change = quote.current_price - quote.previous_close;
    let change_percent = change_percent(change, quote.previous_close);

    let volume = candles
        .volumes
        .last()
        .copied()
        .map(format_magnitude)
        .unwrap_or_else(|| "0".to_string());

    let market_cap = format_magnitude(
        profile.market_capitalization_millions.unwrap_or(0.0) * MARKET_CAP_UNIT,
    );

    DerivedMetrics {
        change,
        change_percent,
        target_price: target_price(quote.current_price, change_percent),
        analyst_rating: analyst_rating(change_percent),
        prediction: prediction(change_percent),
        volume,
        market_cap,
        pe: metrics.pe_ratio_ttm.unwrap_or(0.0),
        low52: metrics.week52_low.unwrap_or(quote.day_low),
        high52: metrics.week52_high.unwrap_or(quote.day_high),
    }
}

/// Percent change against the previous close; zero when there is no previous close.
pub fn change_percent(change: f64, previous_close: f64) -> f64 {
    if previous_close == 0.0 {
        return 0.0;
    }
    change / previous_close * 100.0
}

pub fn target_price(current_price: f64, change_percent: f64) -> f64 {
    current_price * (1.0 + (change_percent / 100.0) * TARGET_AMPLIFICATION)
}

/// Strict thresholds: exactly 0% is a Hold and exactly -2% is a Sell.
pub fn analyst_rating(change_percent: f64) -> AnalystRating {
    if change_percent > 2.0 {
        AnalystRating::StrongBuy
    } else if change_percent > 0.0 {
        AnalystRating::Buy
    } else if change_percent > -2.0 {
        AnalystRating::Hold
    } else {
        AnalystRating::Sell
    }
}

pub fn prediction(change_percent: f64) -> Prediction {
    if change_percent > 0.0 {
        Prediction::Bullish
    } else {
        Prediction::Bearish
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(current: f64, previous: f64) -> Quote {
        Quote {
            current_price: current,
            previous_close: previous,
            day_low: current * 0.98,
            day_high: current * 1.01,
        }
    }

    #[test]
    fn test_rating_buckets() {
        assert_eq!(analyst_rating(2.5), AnalystRating::StrongBuy);
        assert_eq!(analyst_rating(0.5), AnalystRating::Buy);
        assert_eq!(analyst_rating(0.0), AnalystRating::Hold);
        assert_eq!(analyst_rating(-1.0), AnalystRating::Hold);
        assert_eq!(analyst_rating(-3.0), AnalystRating::Sell);
    }

    #[test]
    fn test_rating_boundaries_are_strict() {
        assert_eq!(analyst_rating(2.0), AnalystRating::Buy);
        assert_eq!(analyst_rating(-2.0), AnalystRating::Sell);
    }

    #[test]
    fn test_zero_previous_close_has_zero_percent() {
        let derived = derive_metrics(
            &quote(50.0, 0.0),
            &Profile::default(),
            &Metrics::default(),
            &Candles::default(),
        );
        assert_eq!(derived.change, 50.0);
        assert_eq!(derived.change_percent, 0.0);
        assert_eq!(derived.target_price, 50.0);
        assert_eq!(derived.analyst_rating, AnalystRating::Hold);
        assert_eq!(derived.prediction, Prediction::Bearish);
    }

    #[test]
    fn test_change_and_target() {
        let derived = derive_metrics(
            &quote(102.0, 100.0),
            &Profile::default(),
            &Metrics::default(),
            &Candles::default(),
        );
        assert!((derived.change - 2.0).abs() < 1e-9);
        assert!((derived.change_percent - 2.0).abs() < 1e-9);
        // 102 * (1 + 0.02 * 1.5) = 105.06
        assert!((derived.target_price - 105.06).abs() < 1e-9);
        assert_eq!(derived.prediction, Prediction::Bullish);
    }

    #[test]
    fn test_volume_uses_last_candle() {
        let candles = Candles {
            timestamps: Some(vec![1, 2]),
            closes: vec![1.0, 1.0],
            volumes: vec![10_000_000.0, 45_200_000.0],
        };
        let derived = derive_metrics(
            &quote(10.0, 10.0),
            &Profile::default(),
            &Metrics::default(),
            &candles,
        );
        assert_eq!(derived.volume, "45.20M");
    }

    #[test]
    fn test_missing_volume_and_cap_render_zero() {
        let derived = derive_metrics(
            &quote(10.0, 10.0),
            &Profile::default(),
            &Metrics::default(),
            &Candles::default(),
        );
        assert_eq!(derived.volume, "0");
        assert_eq!(derived.market_cap, "0");
    }

    #[test]
    fn test_market_cap_scaled_from_millions() {
        let profile = Profile {
            name: Some("Apple Inc".to_string()),
            shares_outstanding: Some(15_441.88),
            market_capitalization_millions: Some(2_970_000.0),
        };
        let derived = derive_metrics(
            &quote(190.0, 189.0),
            &profile,
            &Metrics::default(),
            &Candles::default(),
        );
        assert_eq!(derived.market_cap, "2.97T");
    }

    #[test]
    fn test_metrics_fallbacks() {
        let q = Quote {
            current_price: 100.0,
            previous_close: 99.0,
            day_low: 97.5,
            day_high: 101.25,
        };
        let derived = derive_metrics(&q, &Profile::default(), &Metrics::default(), &Candles::default());
        assert_eq!(derived.low52, 97.5);
        assert_eq!(derived.high52, 101.25);
        assert_eq!(derived.pe, 0.0);

        let m = Metrics {
            week52_low: Some(80.0),
            week52_high: Some(120.0),
            pe_ratio_ttm: Some(24.3),
        };
        let derived = derive_metrics(&q, &Profile::default(), &m, &Candles::default());
        assert_eq!(derived.low52, 80.0);
        assert_eq!(derived.high52, 120.0);
        assert_eq!(derived.pe, 24.3);
    }
}
