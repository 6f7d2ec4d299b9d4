//! Month grids: the cells a calendar view lays out in rows of seven.

use crate::date::CalendarDate;
use crate::date::DAYS_PER_WEEK;
use crate::date::days_in_month;
use crate::date::weekday_index;
use crate::error::Result;

pub const WEEKDAY_LABELS: [&str; DAYS_PER_WEEK] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

/// Number of padding cells before day 1 in a Sunday-first grid.
pub fn leading_blanks(year: i32, month: u32) -> usize {
    weekday_index(year, month, 1) as usize
}

/// Cells for one month: `leading_blanks` `None`s followed by every day of the month.
///
/// There is no trailing padding; the last week may be short. Fails for an invalid month or a
/// year the date backend cannot represent.
pub fn generate_grid(year: i32, month: u32) -> Result<Vec<Option<CalendarDate>>> {
    CalendarDate::new(year, month, 1).map(month_cells)
}

fn month_cells(first: CalendarDate) -> Vec<Option<CalendarDate>> {
    let blanks = first.weekday_index() as usize;
    let days = days_in_month(first.year(), first.month());
    let mut cells = Vec::with_capacity(blanks + days as usize);
    cells.resize(blanks, None);
    cells.extend((0..days).map(|offset| Some(first.add_days(i64::from(offset)))));
    cells
}

/// A generated month with row/column helpers for layout and hit testing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthGrid {
    year: i32,
    month: u32,
    cells: Vec<Option<CalendarDate>>,
}

impl MonthGrid {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        CalendarDate::new(year, month, 1).map(Self::of_month)
    }

    /// The grid of the month `date` falls in.
    pub fn of_month(date: CalendarDate) -> Self {
        let first = date.first_of_month();
        Self {
            year: first.year(),
            month: first.month(),
            cells: month_cells(first),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn cells(&self) -> &[Option<CalendarDate>] {
        &self.cells
    }

    pub fn weeks(&self) -> impl Iterator<Item = &[Option<CalendarDate>]> {
        self.cells.chunks(DAYS_PER_WEEK)
    }

    pub fn week_count(&self) -> usize {
        self.cells.len().div_ceil(DAYS_PER_WEEK)
    }

    /// `(row, col)` of `date` if it belongs to this month.
    pub fn position_of(&self, date: CalendarDate) -> Option<(usize, usize)> {
        if date.year() != self.year || date.month() != self.month {
            return None;
        }
        let idx = leading_blanks(self.year, self.month) + date.day() as usize - 1;
        Some((idx / DAYS_PER_WEEK, idx % DAYS_PER_WEEK))
    }

    /// The date at `(row, col)`, or `None` for padding or out-of-range cells.
    pub fn date_at(&self, row: usize, col: usize) -> Option<CalendarDate> {
        if col >= DAYS_PER_WEEK {
            return None;
        }
        self.cells
            .get(row * DAYS_PER_WEEK + col)
            .copied()
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CalendarError;

    #[test]
    fn grid_length_is_blanks_plus_days() {
        for year in [1900, 2000, 2023, 2024, 2025, 2100] {
            for month in 0..12 {
                let grid = generate_grid(year, month).expect("valid month");
                let blanks = leading_blanks(year, month);
                assert_eq!(grid.len(), blanks + days_in_month(year, month) as usize);
                assert!(grid[..blanks].iter().all(Option::is_none));
                assert!(grid[blanks..].iter().all(Option::is_some));
            }
        }
    }

    #[test]
    fn january_2025_starts_on_wednesday() {
        let grid = generate_grid(2025, 0).expect("valid month");
        assert_eq!(leading_blanks(2025, 0), 3);
        assert_eq!(grid.len(), 34);
        assert_eq!(grid[3], CalendarDate::new(2025, 0, 1).ok());
        assert_eq!(grid[33], CalendarDate::new(2025, 0, 31).ok());
    }

    #[test]
    fn february_2026_fills_exactly_four_weeks() {
        // Feb 1 2026 is a Sunday; 28 days, no padding at all.
        let grid = MonthGrid::new(2026, 1).expect("valid month");
        assert_eq!(grid.cells().len(), 28);
        assert_eq!(grid.week_count(), 4);
        assert!(grid.weeks().all(|w| w.len() == 7));
    }

    #[test]
    fn positions_round_trip() {
        let grid = MonthGrid::new(2025, 0).expect("valid month");
        let jan_15 = CalendarDate::new(2025, 0, 15).expect("valid");
        let (row, col) = grid.position_of(jan_15).expect("in month");
        assert_eq!((row, col), (2, 3));
        assert_eq!(grid.date_at(row, col), Some(jan_15));
        assert_eq!(grid.date_at(0, 0), None);
        assert_eq!(grid.date_at(0, 7), None);
        assert_eq!(grid.date_at(9, 0), None);

        let feb_1 = CalendarDate::new(2025, 1, 1).expect("valid");
        assert_eq!(grid.position_of(feb_1), None);
    }

    #[test]
    fn each_call_returns_a_fresh_grid() {
        let mut a = generate_grid(2025, 5).expect("valid month");
        let b = generate_grid(2025, 5).expect("valid month");
        a.clear();
        assert!(!b.is_empty());
    }

    #[test]
    fn unrepresentable_years_have_no_grid() {
        assert_eq!(
            generate_grid(300_000, 0),
            Err(CalendarError::OutOfRange(300_000))
        );
        assert_eq!(generate_grid(2025, 12), Err(CalendarError::InvalidMonth(12)));
        assert!(MonthGrid::new(-300_000, 5).is_err());
    }
}
