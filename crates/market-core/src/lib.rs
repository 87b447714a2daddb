pub mod error;
pub mod fixtures;
pub mod format;
pub mod metrics;
pub mod news;
pub mod period;
pub mod series;
pub mod traits;
pub mod types;

pub use error::*;
pub use fixtures::FixtureProvider;
pub use format::format_magnitude;
pub use metrics::{analyst_rating, derive_metrics, DerivedMetrics};
pub use news::{news_window, news_window_at, reshape_news, NEWS_LIMIT, NEWS_LOOKBACK_DAYS};
pub use period::{resolve_window, resolve_window_at};
pub use series::to_series;
pub use traits::*;
pub use types::*;
