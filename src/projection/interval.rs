//! Half-open date intervals and the calendar conventions the engine uses
//!
//! Fractional years are converted with a 365.25-day year: whole calendar
//! years are added first, then the remainder is rounded to days. A 29
//! February that lands in a non-leap year becomes 28 February.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Day-count convention for fractional years
pub const DAYS_PER_YEAR: f64 = 365.25;

/// A support window `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl SupportInterval {
    /// `None` when the window is empty or inverted
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (end > start).then_some(Self { start, end })
    }

    /// Length in days
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days().max(0)
    }

    /// Days shared with `[start, end)`
    pub fn overlap_days(&self, start: NaiveDate, end: NaiveDate) -> i64 {
        let from = self.start.max(start);
        let to = self.end.min(end);
        if to <= from {
            0
        } else {
            (to - from).num_days()
        }
    }

    /// Days shared with calendar `year`
    pub fn overlap_with_year(&self, year: i32) -> i64 {
        let (start, end) = year_bounds(year);
        self.overlap_days(start, end)
    }

    /// Share of calendar `year` covered by this interval, in [0, 1]
    pub fn year_fraction(&self, year: i32) -> f64 {
        let days = self.overlap_with_year(year);
        if days <= 0 {
            return 0.0;
        }
        days as f64 / days_in_year(year) as f64
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

/// `[1 January year, 1 January year+1)`
pub fn year_bounds(year: i32) -> (NaiveDate, NaiveDate) {
    let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MAX);
    let end = NaiveDate::from_ymd_opt(year.saturating_add(1), 1, 1).unwrap_or(NaiveDate::MAX);
    (start, end)
}

pub fn days_in_year(year: i32) -> i64 {
    let (start, end) = year_bounds(year);
    (end - start).num_days().max(1)
}

/// Add a possibly fractional number of years to `date`
pub fn add_years(date: NaiveDate, years: f64) -> NaiveDate {
    let whole = years.trunc();
    let fraction = years - whole;
    let saturated = if years >= 0.0 { NaiveDate::MAX } else { NaiveDate::MIN };

    let target_year = date.year().saturating_add(whole as i32);
    let shifted = match date
        .with_year(target_year)
        .or_else(|| NaiveDate::from_ymd_opt(target_year, 2, 28))
    {
        Some(shifted) => shifted,
        None => return saturated,
    };

    let extra_days = (fraction * DAYS_PER_YEAR).round() as i64;
    shifted
        .checked_add_signed(Duration::days(extra_days))
        .unwrap_or(saturated)
}

/// Age in years (days / 365.25), floored at 0
pub fn fractional_age(birth: NaiveDate, on: NaiveDate) -> f64 {
    let days = (on - birth).num_days() as f64;
    (days / DAYS_PER_YEAR).max(0.0)
}

/// Calendar age in whole years
pub fn calendar_age(birth: NaiveDate, on: NaiveDate) -> i32 {
    let mut age = on.year() - birth.year();
    if (on.month(), on.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

/// `reference`'s month and day in `year`
pub fn anniversary(year: i32, reference: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, reference.month(), reference.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 2, 28))
        .unwrap_or(NaiveDate::MAX)
}

/// 1 July of `year`, the reference date for mid-year ages
pub fn mid_year(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 7, 1).unwrap_or(NaiveDate::MAX)
}

/// Whole years, months and days of the inclusive span `[start, last]`,
/// where `last` is the day before `end`
pub fn span_ymd(start: NaiveDate, end: NaiveDate) -> (i32, i32, i32) {
    let Some(last) = end.pred_opt() else {
        return (0, 0, 0);
    };
    if last < start {
        return (0, 0, 0);
    }

    // Count through the day after `last` so a full month reads as one month
    let through = end;
    let mut years = through.year() - start.year();
    let mut months = through.month() as i32 - start.month() as i32;
    let mut days = through.day() as i32 - start.day() as i32;

    if days < 0 {
        months -= 1;
        let prev_month_end = NaiveDate::from_ymd_opt(through.year(), through.month(), 1)
            .and_then(|first| first.pred_opt())
            .map(|d| d.day() as i32)
            .unwrap_or(30);
        days += prev_month_end;
    }
    if months < 0 {
        years -= 1;
        months += 12;
    }

    (years, months, days)
}
