use crate::date::CalendarDate;
use crate::selection::DateValue;
use crate::selection::RangeSelection;
use crate::view::ViewState;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// `MM/DD/YYYY`, or an empty string for `None`.
pub fn format_date(date: Option<CalendarDate>) -> String {
    match date {
        None => String::new(),
        Some(d) => format!("{:02}/{:02}/{:04}", d.month() + 1, d.day(), d.year()),
    }
}

pub fn format_range(range: &RangeSelection) -> String {
    match (range.start(), range.end()) {
        (None, _) => String::new(),
        (Some(start), None) => format_date(Some(start)),
        (Some(start), Some(end)) => {
            format!("{} - {}", format_date(Some(start)), format_date(Some(end)))
        }
    }
}

/// The text a trigger field shows for `value`.
pub fn format_value(value: &DateValue) -> String {
    match *value {
        DateValue::None => String::new(),
        DateValue::Single(date) => format_date(Some(date)),
        DateValue::Range { start, end: None } => format_range(&RangeSelection::Start(start)),
        DateValue::Range {
            start,
            end: Some(end),
        } => format_range(&RangeSelection::between(start, end)),
    }
}

/// English month name for a zero-based month; empty for out-of-range input.
pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES.get(month as usize).copied().unwrap_or("")
}

pub fn format_month_year(view: &ViewState) -> String {
    format!(
        "{} {}",
        month_name(view.month()),
        view.year()
    )
}
