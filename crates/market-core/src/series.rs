use chrono::DateTime;

use crate::{Candles, PricePoint};

/// Convert columnar daily candles into `{date, price}` points.
///
/// Upstream order is kept as is. Missing timestamps yield an empty series.
/// When the arrays disagree in length only the aligned prefix is used.
pub fn to_series(candles: &Candles) -> Vec<PricePoint> {
    let Some(timestamps) = candles.timestamps.as_ref() else {
        return Vec::new();
    };

    if timestamps.len() != candles.closes.len() {
        tracing::warn!(
            timestamps = timestamps.len(),
            closes = candles.closes.len(),
            "Candle arrays misaligned, truncating to shorter"
        );
    }

    timestamps
        .iter()
        .zip(candles.closes.iter())
        .filter_map(|(&ts, &close)| {
            // Timestamps outside chrono's range cannot be rendered as a day
            let day = DateTime::from_timestamp(ts, 0)?.date_naive();
            Some(PricePoint {
                date: day.format("%Y-%m-%d").to_string(),
                price: close,
            })
        })
        .collect()
}
