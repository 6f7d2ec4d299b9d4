use std::iter::Take;
use std::ops::RangeInclusive;

use crate::date::CalendarDate;
use crate::date::MONTHS_PER_YEAR;
use crate::date::supported_years;
use crate::error::CalendarError;
use crate::error::Result;
use crate::grid::MonthGrid;

/// How many years either side of the current year the year picker offers.
pub const YEAR_SPAN: i32 = 100;

/// Which month the calendar grid shows. Independent of what is selected.
///
/// Always names a month the date backend can represent: stepping past the first or last
/// representable month leaves the view where it is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewState {
    first: CalendarDate,
}

impl ViewState {
    /// # Panics
    ///
    /// Panics if `month` is not in `0..=11` or `year` is outside [`supported_years`].
    pub fn new(year: i32, month: u32) -> Self {
        match Self::try_new(year, month) {
            Ok(view) => view,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_new(year: i32, month: u32) -> Result<Self> {
        CalendarDate::new(year, month, 1).map(Self::of)
    }

    pub fn of(date: CalendarDate) -> Self {
        Self {
            first: date.first_of_month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    /// Zero-based month.
    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn prev_month(&mut self) {
        self.first = self.first.add_months(-1);
    }

    pub fn next_month(&mut self) {
        self.first = self.first.add_months(1);
    }

    pub fn prev_year(&mut self) {
        self.first = self.first.add_years(-1);
    }

    pub fn next_year(&mut self) {
        self.first = self.first.add_years(1);
    }

    /// Jumps straight to `month` without touching the year.
    ///
    /// # Panics
    ///
    /// Panics if `month` is not in `0..=11`; that is a bug in the caller.
    pub fn set_month(&mut self, month: u32) {
        assert!(month < MONTHS_PER_YEAR, "month index {month} out of range");
        if let Err(err) = self.try_set_month(month) {
            panic!("{err}");
        }
    }

    pub fn try_set_month(&mut self, month: u32) -> Result<()> {
        if month >= MONTHS_PER_YEAR {
            return Err(CalendarError::InvalidMonth(month));
        }
        self.first = CalendarDate::new(self.year(), month, 1)?;
        Ok(())
    }

    /// Jumps straight to `year`, keeping the month. Years the backend cannot represent are
    /// rejected with [`CalendarError::OutOfRange`] and leave the view unchanged.
    pub fn try_set_year(&mut self, year: i32) -> Result<()> {
        self.first = CalendarDate::new(year, self.month(), 1)?;
        Ok(())
    }

    pub fn contains(&self, date: CalendarDate) -> bool {
        self.first.same_month(date)
    }

    /// Realigns the view onto `date`'s month. Returns `true` if the view moved.
    pub fn follow(&mut self, date: CalendarDate) -> bool {
        if self.contains(date) {
            return false;
        }
        *self = Self::of(date);
        true
    }

    pub fn grid(&self) -> MonthGrid {
        MonthGrid::of_month(self.first)
    }
}

/// Years offered by a direct year picker: the current real-world year ± [`YEAR_SPAN`].
///
/// Computed once, when the domain is created, from the system clock; it does not follow the
/// displayed month.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct YearDomain {
    years: RangeInclusive<i32>,
}

impl YearDomain {
    pub fn around_today() -> Self {
        Self::around(CalendarDate::today().year())
    }

    /// `year` ± [`YEAR_SPAN`], cut to the years the date backend can represent.
    pub fn around(year: i32) -> Self {
        let supported = supported_years();
        let lo = year.saturating_sub(YEAR_SPAN).max(*supported.start());
        let hi = year.saturating_add(YEAR_SPAN).min(*supported.end());
        Self { years: lo..=hi }
    }

    pub fn years(&self) -> RangeInclusive<i32> {
        self.years.clone()
    }

    pub fn len(&self) -> usize {
        self.years.clone().count()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn contains(&self, year: i32) -> bool {
        self.years.contains(&year)
    }

    /// The nearest year inside the domain.
    pub fn clamp(&self, year: i32) -> i32 {
        year.clamp(*self.years.start(), *self.years.end())
    }

    /// First year of the `page_len`-sized page that holds `year` (clamped into the domain).
    /// Pages start at the domain's first year; the last page may be short.
    pub fn page_start(&self, year: i32, page_len: usize) -> i32 {
        let first = *self.years.start();
        let page_len = i32::try_from(page_len.max(1)).unwrap_or(i32::MAX);
        let offset = self.clamp(year) - first;
        first + offset / page_len * page_len
    }

    /// Years of the page starting at `page_start`, stopping at the end of the domain.
    pub fn page(&self, page_start: i32, page_len: usize) -> Take<RangeInclusive<i32>> {
        let end = *self.years.end();
        (self.clamp(page_start)..=end).take(page_len)
    }
}
