use thiserror::Error;

/// Errors raised when a caller hands the engine calendar coordinates that do not name a real day.
///
/// Arithmetic on an existing [`crate::date::CalendarDate`] never produces one of these; only
/// construction from raw parts and the checked view setters do.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum CalendarError {
    /// Month index outside `0..=11`.
    #[error("invalid month index {0} (expected 0..=11)")]
    InvalidMonth(u32),

    /// Day outside `1..=days_in_month` for the given year/month.
    #[error("invalid day {day} for {year}-{mm:02} (month has {max} days)", mm = .month + 1)]
    InvalidDay {
        year: i32,
        month: u32,
        day: u32,
        max: u32,
    },

    /// Year outside what the date backend can represent.
    #[error("year {0} is out of the supported range")]
    OutOfRange(i32),
}

pub type Result<T> = std::result::Result<T, CalendarError>;
