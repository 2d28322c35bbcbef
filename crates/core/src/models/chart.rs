use chrono::{DateTime, Duration, NaiveTime, Utc};
use chrono_tz::Tz;

use super::color::Rgb;
use super::holding::Holding;

/// Wall-clock bounds of a chart's x-axis, expressed in the display timezone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl TimeWindow {
    /// US cash session (14:30–21:00 UTC) on the UTC date of `now`.
    pub fn session(now: DateTime<Utc>, tz: Tz) -> Self {
        let date = now.date_naive();
        let open = date.and_time(NaiveTime::from_hms_opt(14, 30, 0).unwrap_or_default());
        let close = date.and_time(NaiveTime::from_hms_opt(21, 0, 0).unwrap_or_default());
        Self {
            start: open.and_utc().with_timezone(&tz),
            end: close.and_utc().with_timezone(&tz),
        }
    }

    /// Window length in whole minutes.
    pub fn minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Wall-clock time of the `k`th sample: one sample per minute from `start`.
    pub fn time_of(&self, k: usize) -> DateTime<Tz> {
        self.start + Duration::minutes(k as i64)
    }

    /// Time `fraction` (0.0..=1.0) of the way through the window.
    pub fn at_fraction(&self, fraction: f64) -> DateTime<Tz> {
        let seconds = (self.end - self.start).num_seconds() as f64 * fraction;
        self.start + Duration::seconds(seconds.round() as i64)
    }
}

/// A laid-out line chart of one or more holdings, ready to print.
///
/// Borrowed from the ledger it was built from. `Display` produces the
/// ANSI text block.
#[derive(Debug, Clone)]
pub struct Chart<'a> {
    pub series: Vec<&'a Holding>,
    pub colors: Vec<Rgb>,
    pub window: TimeWindow,
    pub y_range: (f64, f64),
    pub width: u16,
    pub height: u16,
}

impl<'a> Chart<'a> {
    /// Plot coordinates of a series: sample `k` sits at `k` minutes into the window.
    /// Unrepaired gaps are left out.
    pub fn points(&self, idx: usize) -> Vec<(f64, f64)> {
        self.series[idx]
            .series()
            .samples()
            .iter()
            .enumerate()
            .filter(|(_, price)| price.is_finite())
            .map(|(k, &price)| (k as f64, price))
            .collect()
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.series.iter().map(|h| h.symbol()).collect()
    }
}
