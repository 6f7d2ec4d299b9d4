//! Calendar dates and the Gregorian rules the picker is built on.
//!
//! Months are zero-based (`0` = January) everywhere in this crate. Weeks start on Sunday.

use std::fmt;
use std::ops::RangeInclusive;

use chrono::Datelike;
use chrono::Days;
use chrono::Months;
use chrono::NaiveDate;

use crate::error::CalendarError;
use crate::error::Result;

pub const MONTHS_PER_YEAR: u32 = 12;
pub const DAYS_PER_WEEK: usize = 7;

/// An immutable, always-valid calendar day.
///
/// All arithmetic returns a new value. If a result would leave the range the backing
/// [`NaiveDate`] can represent, the input is returned unchanged.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Builds a date from a year, a zero-based month, and a one-based day.
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self> {
        if month >= MONTHS_PER_YEAR {
            return Err(CalendarError::InvalidMonth(month));
        }
        let max = days_in_month(year, month);
        if day == 0 || day > max {
            return Err(CalendarError::InvalidDay {
                year,
                month,
                day,
                max,
            });
        }
        NaiveDate::from_ymd_opt(year, month + 1, day)
            .map(Self)
            .ok_or(CalendarError::OutOfRange(year))
    }

    /// The current local calendar day, read from the system clock.
    pub fn today() -> Self {
        Self(chrono::Local::now().date_naive())
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn as_naive(self) -> NaiveDate {
        self.0
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// Zero-based month (`0..=11`).
    pub fn month(self) -> u32 {
        self.0.month0()
    }

    pub fn day(self) -> u32 {
        self.0.day()
    }

    /// Day of week, `0` = Sunday.
    pub fn weekday_index(self) -> u32 {
        self.0.weekday().num_days_from_sunday()
    }

    pub fn add_days(self, delta: i64) -> Self {
        let moved = if delta >= 0 {
            self.0.checked_add_days(Days::new(delta.unsigned_abs()))
        } else {
            self.0.checked_sub_days(Days::new(delta.unsigned_abs()))
        };
        self.or_saturate(moved, "days", delta)
    }

    /// Moves by whole months; the day is clamped to the length of the target month
    /// (Jan 31 + 1 month = Feb 28 or 29).
    pub fn add_months(self, delta: i32) -> Self {
        let moved = if delta >= 0 {
            self.0.checked_add_months(Months::new(delta.unsigned_abs()))
        } else {
            self.0.checked_sub_months(Months::new(delta.unsigned_abs()))
        };
        self.or_saturate(moved, "months", i64::from(delta))
    }

    pub fn add_years(self, delta: i32) -> Self {
        self.add_months(delta.saturating_mul(MONTHS_PER_YEAR as i32))
    }

    pub fn first_of_month(self) -> Self {
        self.with_day(1)
    }

    pub fn last_of_month(self) -> Self {
        self.with_day(days_in_month(self.year(), self.month()))
    }

    /// `true` if both dates fall in the same month of the same year.
    pub fn same_month(self, other: Self) -> bool {
        self.year() == other.year() && self.month() == other.month()
    }

    fn with_day(self, day: u32) -> Self {
        // Only called with days known to exist in this month.
        self.0.with_day(day).map(Self).unwrap_or(self)
    }

    fn or_saturate(self, moved: Option<NaiveDate>, unit: &str, delta: i64) -> Self {
        match moved {
            Some(d) => Self(d),
            None => {
                tracing::warn!(date = %self, delta, unit, "calendar arithmetic saturated");
                self
            }
        }
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year(), self.month() + 1, self.day())
    }
}

impl fmt::Debug for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CalendarDate({self})")
    }
}

/// Years the date backend can represent.
pub fn supported_years() -> RangeInclusive<i32> {
    NaiveDate::MIN.year()..=NaiveDate::MAX.year()
}

pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Number of days in a zero-based month.
///
/// # Panics
///
/// Panics if `month` is not in `0..=11`.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        0 | 2 | 4 | 6 | 7 | 9 | 11 => 31,
        3 | 5 | 8 | 10 => 30,
        1 if is_leap_year(year) => 29,
        1 => 28,
        _ => panic!("month index {month} out of range (expected 0..=11)"),
    }
}

/// Day of week for a zero-based month, `0` = Sunday.
///
/// Works on the proleptic Gregorian calendar for any year, independent of the date backend.
pub fn weekday_index(year: i32, month: u32, day: u32) -> u32 {
    let days = days_from_civil(i64::from(year), i64::from(month) + 1, i64::from(day));
    // 1970-01-01 was a Thursday.
    (days + 4).rem_euclid(DAYS_PER_WEEK as i64) as u32
}

fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let mp = if month > 2 { month - 3 } else { month + 9 };
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> CalendarDate {
        CalendarDate::new(y, m, day).expect("valid date")
    }

    #[test]
    fn month_lengths_follow_leap_rules() {
        assert_eq!(days_in_month(2024, 1), 29);
        assert_eq!(days_in_month(2023, 1), 28);
        assert_eq!(days_in_month(2025, 0), 31);
        assert_eq!(days_in_month(2025, 3), 30);
        assert_eq!(days_in_month(1900, 1), 28);
        assert_eq!(days_in_month(2000, 1), 29);
    }

    #[test]
    fn weekday_of_known_days() {
        assert_eq!(weekday_index(2025, 0, 1), 3);
        assert_eq!(weekday_index(1970, 0, 1), 4);
        assert_eq!(weekday_index(2024, 1, 29), 4);
        assert_eq!(weekday_index(2000, 0, 1), 6);
        assert_eq!(d(2025, 0, 1).weekday_index(), 3);
    }

    #[test]
    fn pure_weekday_agrees_with_backend() {
        let mut date = d(1999, 11, 20);
        for _ in 0..800 {
            assert_eq!(
                weekday_index(date.year(), date.month(), date.day()),
                date.weekday_index(),
                "{date}"
            );
            date = date.add_days(1);
        }
    }

    #[test]
    fn construction_rejects_impossible_days() {
        assert_eq!(
            CalendarDate::new(2025, 12, 1),
            Err(CalendarError::InvalidMonth(12))
        );
        assert_eq!(
            CalendarDate::new(2023, 1, 29),
            Err(CalendarError::InvalidDay {
                year: 2023,
                month: 1,
                day: 29,
                max: 28
            })
        );
        assert!(CalendarDate::new(2023, 1, 0).is_err());
        assert!(CalendarDate::new(2024, 1, 29).is_ok());
    }

    #[test]
    fn day_arithmetic_rolls_over_months_and_years() {
        assert_eq!(d(2025, 0, 31).add_days(1), d(2025, 1, 1));
        assert_eq!(d(2025, 0, 1).add_days(-1), d(2024, 11, 31));
        assert_eq!(d(2024, 1, 28).add_days(1), d(2024, 1, 29));
        assert_eq!(d(2025, 0, 28).add_days(7), d(2025, 1, 4));
        assert_eq!(d(2025, 2, 3).add_days(-7), d(2025, 1, 24));
    }

    #[test]
    fn arithmetic_returns_new_values() {
        let start = d(2025, 0, 10);
        let moved = start.add_days(5);
        assert_eq!(start, d(2025, 0, 10));
        assert_eq!(moved, d(2025, 0, 15));
    }

    #[test]
    fn month_arithmetic_clamps_day() {
        assert_eq!(d(2025, 0, 31).add_months(1), d(2025, 1, 28));
        assert_eq!(d(2024, 0, 31).add_months(1), d(2024, 1, 29));
        assert_eq!(d(2025, 0, 15).add_months(-1), d(2024, 11, 15));
        assert_eq!(d(2024, 1, 29).add_years(1), d(2025, 1, 28));
    }

    #[test]
    fn arithmetic_saturates_at_backend_limits() {
        let max = CalendarDate::from_naive(NaiveDate::MAX);
        assert_eq!(max.add_days(1), max);
        assert_eq!(max.add_months(1), max);
    }

    #[test]
    fn years_past_the_backend_are_rejected() {
        let last = *supported_years().end();
        assert!(CalendarDate::new(last, 0, 1).is_ok());
        assert_eq!(
            CalendarDate::new(last + 1, 0, 1),
            Err(CalendarError::OutOfRange(last + 1))
        );
        assert_eq!(
            CalendarDate::new(300_000, 0, 1),
            Err(CalendarError::OutOfRange(300_000))
        );
    }

    #[test]
    fn month_bounds() {
        let date = d(2024, 1, 14);
        assert_eq!(date.first_of_month(), d(2024, 1, 1));
        assert_eq!(date.last_of_month(), d(2024, 1, 29));
        assert!(date.same_month(d(2024, 1, 1)));
        assert!(!date.same_month(d(2025, 1, 14)));
    }

    #[test]
    fn ordering_is_chronological() {
        assert!(d(2025, 0, 5) < d(2025, 0, 10));
        assert!(d(2024, 11, 31) < d(2025, 0, 1));
        assert_eq!(d(2025, 0, 5).to_string(), "2025-01-05");
    }
}
