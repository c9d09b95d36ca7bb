//! Calendar-day resolution and midnight rollover detection.
//!
//! Rollover is detected by polling: the session's one-second tick asks the
//! [`DayResolver`] whether the local date has changed since the last poll.
//! There is no separate midnight timer to schedule or cancel.

use crate::constants;
use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone};
use tracing::info;

/// The entry key (`YYYY-MM-DD`) for the local date of `now`.
pub fn today_key(now: &DateTime<Local>) -> String {
    now.format(constants::DATE_FORMAT_ISO).to_string()
}

/// Parses an entry key back into a date.
pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, constants::DATE_FORMAT_ISO).ok()
}

/// A local-date change observed between two polls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayChange {
    pub from: String,
    pub to: String,
}

/// Tracks the last observed local date.
#[derive(Debug, Clone)]
pub struct DayResolver {
    current: String,
}

impl DayResolver {
    pub fn new(now: &DateTime<Local>) -> Self {
        Self {
            current: today_key(now),
        }
    }

    /// The date key as of the most recent poll.
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Returns the change if the local date differs from the last poll.
    ///
    /// # Examples
    ///
    /// ```
    /// use daybook::day::DayResolver;
    /// use chrono::{Local, TimeZone};
    ///
    /// let evening = Local.with_ymd_and_hms(2024, 1, 15, 23, 59, 59).unwrap();
    /// let mut resolver = DayResolver::new(&evening);
    /// assert!(resolver.poll(&evening).is_none());
    ///
    /// let after = Local.with_ymd_and_hms(2024, 1, 16, 0, 0, 1).unwrap();
    /// let change = resolver.poll(&after).unwrap();
    /// assert_eq!(change.from, "2024-01-15");
    /// assert_eq!(change.to, "2024-01-16");
    /// ```
    pub fn poll(&mut self, now: &DateTime<Local>) -> Option<DayChange> {
        let today = today_key(now);
        if today == self.current {
            return None;
        }
        let change = DayChange {
            from: std::mem::replace(&mut self.current, today.clone()),
            to: today,
        };
        info!("Day changed from {} to {}", change.from, change.to);
        Some(change)
    }
}

/// Time remaining until the next local midnight.
pub fn time_until_midnight(now: &DateTime<Local>) -> Duration {
    let next_midnight = now
        .date_naive()
        .succ_opt()
        .and_then(|tomorrow| tomorrow.and_hms_opt(0, 0, 0))
        .and_then(|naive| Local.from_local_datetime(&naive).earliest());

    match next_midnight {
        Some(midnight) => (midnight - *now).max(Duration::zero()),
        None => Duration::zero(),
    }
}

/// Formats a duration as `"{h}h {m}m {s}s"`.
pub fn format_countdown(remaining: Duration) -> String {
    let total = remaining.num_seconds().max(0);
    format!(
        "{}h {}m {}s",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}
