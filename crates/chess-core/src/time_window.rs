use chrono::{DateTime, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

/// Timezone used for "today" and for hour-of-day buckets.
pub const REPORT_TIMEZONE: Tz = chrono_tz::Europe::Lisbon;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Midnight-to-midnight interval as epoch milliseconds, `until_ms` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub since_ms: i64,
    pub until_ms: i64,
}

impl TimeWindow {
    /// The local day containing the current instant.
    pub fn today(tz: Tz) -> Self {
        Self::containing(Utc::now(), tz)
    }

    /// The local day in `tz` containing `now`; always exactly 24h long.
    pub fn containing(now: DateTime<Utc>, tz: Tz) -> Self {
        let midnight = now.with_timezone(&tz).date_naive().and_time(NaiveTime::MIN);
        let start = tz
            .from_local_datetime(&midnight)
            .earliest()
            .map(|dt| dt.timestamp_millis())
            // Midnight skipped by a DST jump
            .unwrap_or_else(|| midnight.and_utc().timestamp_millis());

        Self {
            since_ms: start,
            until_ms: start + DAY_MS,
        }
    }
}

/// Hour of day (0-23) in `tz` for an epoch-millisecond timestamp.
pub fn local_hour(timestamp_ms: i64, tz: Tz) -> Option<u32> {
    DateTime::from_timestamp_millis(timestamp_ms).map(|utc| utc.with_timezone(&tz).hour())
}
