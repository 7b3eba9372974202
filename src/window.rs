//! Analytics Windowing
//!
//! Pure helpers for period-over-period comparison: the current/previous
//! window split, the display delta percentage, and the dense daily series.
//! Everything here is side-effect free so the invariants are unit-testable
//! without a database.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::models::{DailyViewRow, DailyViews, PageCategory};

/// Supported reporting period lengths, in days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Days7,
    Days30,
    Days90,
}

impl Period {
    pub fn days(self) -> i64 {
        match self {
            Period::Days7 => 7,
            Period::Days30 => 30,
            Period::Days90 => 90,
        }
    }

    /// Coerce a requested period to a supported value.
    ///
    /// Anything outside {7, 30, 90} (including absence) falls back to the
    /// configured default rather than failing the request.
    pub fn coerce(requested: Option<i64>, fallback: Period) -> Period {
        match requested {
            Some(7) => Period::Days7,
            Some(30) => Period::Days30,
            Some(90) => Period::Days90,
            _ => fallback,
        }
    }
}

/// Half-open or unbounded time span used to scope one aggregate query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub from: DateTime<Utc>,
    /// Exclusive upper bound; `None` means "up to now".
    pub until: Option<DateTime<Utc>>,
}

/// The two equal-length, contiguous windows a period comparison runs over.
///
/// `previous` is `[previous_start, current_start)` and `current` is
/// `[current_start, now]` — contiguous and non-overlapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsWindow {
    pub current_start: DateTime<Utc>,
    pub previous_start: DateTime<Utc>,
    pub now: DateTime<Utc>,
}

impl AnalyticsWindow {
    pub fn ending_at(now: DateTime<Utc>, period: Period) -> Self {
        let current_start = now - Duration::days(period.days());
        let previous_start = current_start - Duration::days(period.days());
        Self {
            current_start,
            previous_start,
            now,
        }
    }

    pub fn current(&self) -> Span {
        Span {
            from: self.current_start,
            until: None,
        }
    }

    pub fn previous(&self) -> Span {
        Span {
            from: self.previous_start,
            until: Some(self.current_start),
        }
    }
}

/// Period-over-period delta percentage for KPI display.
///
/// When the previous window is empty there is no baseline: `None` when the
/// current count is also zero, otherwise a fixed 100. The 100 is a display
/// convention for "growth from zero", not a mathematically meaningful rate.
pub fn delta_percent(current: i64, previous: i64) -> Option<i64> {
    if previous > 0 {
        Some((((current - previous) as f64 / previous as f64) * 100.0).round() as i64)
    } else if current > 0 {
        Some(100)
    } else {
        None
    }
}

/// Pivot sparse per-(day, page) counts into a dense day-by-day series.
///
/// The result covers every calendar day from `start` through `end`
/// inclusive, in ascending order, with all four counters present on every
/// row. Rows outside the range are discarded.
pub fn dense_series(rows: &[DailyViewRow], start: NaiveDate, end: NaiveDate) -> Vec<DailyViews> {
    let mut series: Vec<DailyViews> = start
        .iter_days()
        .take_while(|day| *day <= end)
        .map(DailyViews::empty)
        .collect();

    for row in rows {
        let offset = (row.day - start).num_days();
        if offset < 0 || offset as usize >= series.len() {
            continue;
        }
        let entry = &mut series[offset as usize];
        match row.page {
            PageCategory::Changelog => entry.changelog = row.views,
            PageCategory::Roadmap => entry.roadmap = row.views,
            PageCategory::Feedback => entry.feedback = row.views,
            PageCategory::Widget => entry.widget = row.views,
        }
    }

    series
}
