//! Report windows anchored to a daily cutoff in a fixed civil timezone.

use chrono::{DateTime, Duration, FixedOffset, NaiveTime, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Where report windows end: the latest `cutoff` in `offset` civil time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowAnchor {
    pub offset: FixedOffset,
    pub cutoff: NaiveTime,
    pub label: &'static str,
}

impl WindowAnchor {
    /// 09:00 in UTC+09:00.
    pub fn jst() -> Self {
        Self {
            offset: FixedOffset::east_opt(9 * 3600).unwrap_or(Utc.fix()),
            cutoff: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            label: "JST",
        }
    }

    /// Most recent cutoff at or before `now`.
    pub fn last_cutoff(&self, now: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        let local = now.with_timezone(&self.offset);
        let naive = local.naive_local();
        let todays_cutoff = local + (naive.date().and_time(self.cutoff) - naive);
        if local < todays_cutoff {
            todays_cutoff - Duration::days(1)
        } else {
            todays_cutoff
        }
    }

    /// The 24 hours ending at the last cutoff.
    pub fn daily(&self, now: DateTime<FixedOffset>) -> TimeWindow {
        TimeWindow::ending_at(self.last_cutoff(now), Duration::days(1))
    }

    /// The 7 days ending at the last cutoff.
    pub fn rolling_weekly(&self, now: DateTime<FixedOffset>) -> TimeWindow {
        TimeWindow::ending_at(self.last_cutoff(now), Duration::days(7))
    }
}

impl Default for WindowAnchor {
    fn default() -> Self {
        Self::jst()
    }
}

/// Half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl TimeWindow {
    pub fn ending_at(end: DateTime<FixedOffset>, span: Duration) -> Self {
        Self {
            start: end - span,
            end,
        }
    }

    pub fn contains_millis(&self, epoch_millis: i64) -> bool {
        self.start.timestamp_millis() <= epoch_millis && epoch_millis < self.end.timestamp_millis()
    }
}
