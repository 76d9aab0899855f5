//! Weekday countdown arithmetic.
//!
//! Everything here works on calendar dates. Exclusions therefore match by
//! day regardless of the time a request happened to arrive.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use serde::Serialize;
use utoipa::ToSchema;

/// Count Monday–Friday dates in `[start, end)` that are not in `excluded`.
///
/// Whole weeks are counted arithmetically, so the cost does not grow with
/// the length of the range. Returns `0` when `start >= end`.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use travelmap::domain::finance::remaining_weekdays;
///
/// let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let next_monday = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
/// assert_eq!(remaining_weekdays(monday, next_monday, &[]), 5);
/// ```
#[must_use]
pub fn remaining_weekdays(start: NaiveDate, end: NaiveDate, excluded: &[NaiveDate]) -> u32 {
    if start >= end {
        return 0;
    }
    let span = (end - start).num_days();
    let full_weeks = span / 7;
    let tail_start = u64::try_from(full_weeks * 7)
        .ok()
        .and_then(|offset| start.checked_add_days(Days::new(offset)))
        .unwrap_or(end);
    let tail = tail_start
        .iter_days()
        .take_while(|day| *day < end)
        .filter(|day| is_weekday(*day))
        .count();

    let mut skipped: Vec<NaiveDate> = excluded
        .iter()
        .copied()
        .filter(|day| (start..end).contains(day) && is_weekday(*day))
        .collect();
    skipped.sort_unstable();
    skipped.dedup();

    let count = full_weeks * 5 + i64::try_from(tail).unwrap_or(0)
        - i64::try_from(skipped.len()).unwrap_or(0);
    u32::try_from(count.max(0)).unwrap_or(u32::MAX)
}

fn is_weekday(day: NaiveDate) -> bool {
    !matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Countdown from `today` to `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct DaysLeft {
    /// Weekdays remaining after exclusions.
    pub weekdays: u32,
    /// Whole calendar months remaining.
    pub months: u32,
    /// Days remaining after the whole months.
    pub days: u32,
    /// Plain day difference, ignoring weekends and exclusions.
    pub total_days: i64,
}

/// Summarise the time left until `end`.
///
/// Months and days follow calendar arithmetic: adding `months` to `today`
/// (clamping to the end of shorter months) and then `days` lands on `end`.
/// Dates already past yield an all-zero countdown.
#[must_use]
pub fn days_left(today: NaiveDate, end: NaiveDate, excluded: &[NaiveDate]) -> DaysLeft {
    if end <= today {
        return DaysLeft {
            weekdays: 0,
            months: 0,
            days: 0,
            total_days: 0,
        };
    }

    let (months, anchor) = whole_months_between(today, end);
    let days = (end - anchor).num_days();
    DaysLeft {
        weekdays: remaining_weekdays(today, end, excluded),
        months,
        days: u32::try_from(days).unwrap_or(0),
        total_days: (end - today).num_days(),
    }
}

fn whole_months_between(from: NaiveDate, to: NaiveDate) -> (u32, NaiveDate) {
    let year_span = i64::from(to.year()) - i64::from(from.year());
    let month_span = i64::from(to.month()) - i64::from(from.month());
    let mut months = year_span * 12 + month_span;
    if to.day() < from.day() {
        months -= 1;
    }
    let months = u32::try_from(months.max(0)).unwrap_or(0);
    let anchor = from
        .checked_add_months(Months::new(months))
        .unwrap_or(from);
    (months, anchor)
}

/// End of the school-year countdown shown when no end date is requested.
#[must_use]
pub fn default_countdown_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 17).unwrap_or(NaiveDate::MIN)
}

/// Holidays excluded from the default countdown.
#[must_use]
pub fn default_excluded_dates() -> Vec<NaiveDate> {
    let spring_break = NaiveDate::from_ymd_opt(2024, 3, 25)
        .into_iter()
        .flat_map(|start| start.iter_days().take(12));
    spring_break
        .chain(NaiveDate::from_ymd_opt(2024, 5, 27))
        .collect()
}
