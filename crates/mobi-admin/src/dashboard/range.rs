//! Reporting windows.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Period the dashboard reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    /// Since midnight UTC.
    Today,
    /// Last 7 days.
    Week,
    /// Last 30 days.
    #[default]
    Month,
    /// Last 90 days.
    Quarter,
    /// Last 365 days.
    Year,
}

impl DateRange {
    pub const ALL: [DateRange; 5] = [
        DateRange::Today,
        DateRange::Week,
        DateRange::Month,
        DateRange::Quarter,
        DateRange::Year,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DateRange::Today => "today",
            DateRange::Week => "week",
            DateRange::Month => "month",
            DateRange::Quarter => "quarter",
            DateRange::Year => "year",
        }
    }

    /// The window ending at `now` (inclusive).
    pub fn window(&self, now: DateTime<Utc>) -> Window {
        let end = now.timestamp() + 1;
        let start = match self {
            DateRange::Today => now.date_naive().and_time(NaiveTime::MIN).and_utc().timestamp(),
            DateRange::Week => (now - Duration::days(7)).timestamp(),
            DateRange::Month => (now - Duration::days(30)).timestamp(),
            DateRange::Quarter => (now - Duration::days(90)).timestamp(),
            DateRange::Year => (now - Duration::days(365)).timestamp(),
        };
        Window { start, end }
    }

    /// The window of equal length right before [`DateRange::window`].
    pub fn previous_window(&self, now: DateTime<Utc>) -> Window {
        let current = self.window(now);
        Window {
            start: current.start - current.len(),
            end: current.start,
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateRange::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown date range '{}'", s))
    }
}

/// Half-open span of unix seconds, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub start: i64,
    pub end: i64,
}

impl Window {
    /// Length in seconds.
    pub fn len(&self) -> i64 {
        (self.end - self.start).max(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        timestamp >= self.start && timestamp < self.end
    }
}
