use chrono::{DateTime, Duration, Utc};

use crate::{CompanyNewsItem, NewsArticle, NewsWindow};

/// Articles returned per request
pub const NEWS_LIMIT: usize = 10;

pub const NEWS_LOOKBACK_DAYS: i64 = 30;

const DEFAULT_SENTIMENT: &str = "neutral";

pub fn news_window() -> NewsWindow {
    news_window_at(Utc::now())
}

/// Lookback window ending on the UTC calendar day of `now`.
pub fn news_window_at(now: DateTime<Utc>) -> NewsWindow {
    NewsWindow {
        from: (now - Duration::days(NEWS_LOOKBACK_DAYS)).date_naive(),
        to: now.date_naive(),
    }
}

/// Keep the first [`NEWS_LIMIT`] items in upstream order and reshape them for display.
pub fn reshape_news(items: Vec<CompanyNewsItem>) -> Vec<NewsArticle> {
    items.into_iter().take(NEWS_LIMIT).map(to_article).collect()
}

fn to_article(item: CompanyNewsItem) -> NewsArticle {
    let summary = item
        .summary
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| item.headline.clone());

    let sentiment = item
        .sentiment
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SENTIMENT.to_string());

    NewsArticle {
        time: locale_time(item.datetime),
        title: item.headline,
        summary,
        sentiment,
        source: item.source,
        url: item.url,
    }
}

/// en-US style timestamp in UTC, e.g. `1/15/2024, 10:30:00 AM`.
fn locale_time(epoch_secs: i64) -> String {
    DateTime::from_timestamp(epoch_secs, 0)
        .map(|dt| dt.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string())
        .unwrap_or_default()
}
