use chrono::{DateTime, Utc};

use crate::{TimePeriod, TimeWindow};

pub const SECONDS_PER_DAY: i64 = 86_400;

/// Resolve a period token into epoch bounds ending now.
pub fn resolve_window(token: &str) -> TimeWindow {
    resolve_window_at(token, Utc::now())
}

/// Resolve a period token into epoch bounds ending at `now`, truncated to whole seconds.
pub fn resolve_window_at(token: &str, now: DateTime<Utc>) -> TimeWindow {
    let days = TimePeriod::parse_or_default(token).days();
    let to_epoch = now.timestamp();

    TimeWindow {
        days,
        from_epoch: to_epoch - days * SECONDS_PER_DAY,
        to_epoch,
    }
}
