//! Header bucket generation for each timeline scale.
//!
//! The generator never aligns its input: callers pass a date that already sits
//! on a bucket boundary (see [`Scale::align`]).

use chrono::{Datelike, Duration, Month, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::Scale;

/// One labeled header segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBucket {
    pub label: String,
    pub duration_days: u32,
}

/// Proleptic Gregorian leap rule.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

pub fn days_in_month(year: i32, month: Month) -> u32 {
    match month {
        Month::February if is_leap_year(year) => 29,
        Month::February => 28,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
    }
}

/// Produce `count` consecutive buckets starting at `start`.
pub fn generate(scale: Scale, start: NaiveDateTime, count: usize) -> Vec<TimeBucket> {
    let start = start.date();
    match scale {
        Scale::Day => range_days(start, count),
        Scale::Month => range_months(start, count),
        Scale::Year => range_years(start, count),
    }
}

fn range_days(start: NaiveDate, count: usize) -> Vec<TimeBucket> {
    (0..count)
        .filter_map(|i| start.checked_add_signed(Duration::days(i as i64)))
        .map(|date| TimeBucket {
            label: day_label(date),
            duration_days: 1,
        })
        .collect()
}

fn range_months(start: NaiveDate, count: usize) -> Vec<TimeBucket> {
    let mut year = start.year();
    let mut month = Month::try_from(start.month() as u8).unwrap_or(Month::January);
    let mut buckets = Vec::with_capacity(count);
    for _ in 0..count {
        let first = NaiveDate::from_ymd_opt(year, month.number_from_month(), 1).unwrap_or(start);
        buckets.push(TimeBucket {
            label: first.format("%B %Y").to_string(),
            duration_days: days_in_month(year, month),
        });
        if month == Month::December {
            year += 1;
        }
        month = month.succ();
    }
    buckets
}

fn range_years(start: NaiveDate, count: usize) -> Vec<TimeBucket> {
    (start.year()..)
        .take(count)
        .map(|year| TimeBucket {
            label: year.to_string(),
            duration_days: days_in_year(year),
        })
        .collect()
}

/// Day of month followed by the English narrow weekday, e.g. `"10 W"`.
/// Narrow forms repeat: Tuesday and Thursday are both `T`.
fn day_label(date: NaiveDate) -> String {
    let weekday = date.format("%a").to_string();
    let narrow: String = weekday.chars().take(1).collect();
    format!("{} {}", date.day(), narrow)
}

/// Total span covered by a bucket sequence.
pub fn total_days(buckets: &[TimeBucket]) -> u64 {
    buckets.iter().map(|b| u64::from(b.duration_days)).sum()
}
