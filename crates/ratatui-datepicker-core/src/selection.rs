//! Single-date and two-phase range selection.
//!
//! A range is picked with exactly two activations: the first sets the start, the second sets the
//! end. The second date may come before the first; endpoints are swapped so `start <= end` always
//! holds once a range is complete.

use std::fmt;
use std::rc::Rc;

use crate::date::CalendarDate;

/// Caller-supplied predicate marking dates that cannot be committed.
///
/// Focus may still land on a disabled date; only selection is blocked. A panicking predicate is
/// not caught.
pub type DisabledPredicate = Rc<dyn Fn(CalendarDate) -> bool>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SelectionMode {
    #[default]
    Single,
    Range,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RangeSelection {
    #[default]
    Unselected,
    /// First endpoint picked, waiting for the second.
    Start(CalendarDate),
    /// Both endpoints picked; `start <= end`.
    Complete {
        start: CalendarDate,
        end: CalendarDate,
    },
}

impl RangeSelection {
    /// A complete range from two endpoints given in any order.
    pub fn between(a: CalendarDate, b: CalendarDate) -> Self {
        let (start, end) = if b < a { (b, a) } else { (a, b) };
        Self::Complete { start, end }
    }

    pub fn start(&self) -> Option<CalendarDate> {
        match *self {
            Self::Unselected => None,
            Self::Start(start) | Self::Complete { start, .. } => Some(start),
        }
    }

    pub fn end(&self) -> Option<CalendarDate> {
        match *self {
            Self::Complete { end, .. } => Some(end),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete { .. })
    }

    /// `true` for dates inside a complete range, endpoints included, and for the start of a
    /// pending range.
    pub fn contains(&self, date: CalendarDate) -> bool {
        match *self {
            Self::Complete { start, end } => start <= date && date <= end,
            Self::Start(start) => start == date,
            Self::Unselected => false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionState {
    Single(Option<CalendarDate>),
    Range(RangeSelection),
}

impl SelectionState {
    pub fn empty(mode: SelectionMode) -> Self {
        match mode {
            SelectionMode::Single => Self::Single(None),
            SelectionMode::Range => Self::Range(RangeSelection::Unselected),
        }
    }

    pub fn mode(&self) -> SelectionMode {
        match self {
            Self::Single(_) => SelectionMode::Single,
            Self::Range(_) => SelectionMode::Range,
        }
    }
}

/// The value reported to callers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DateValue {
    #[default]
    None,
    Single(CalendarDate),
    Range {
        start: CalendarDate,
        end: Option<CalendarDate>,
    },
}

impl DateValue {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// The date the calendar should open on: the single date or the range start.
    pub fn anchor(&self) -> Option<CalendarDate> {
        match *self {
            Self::None => None,
            Self::Single(date) | Self::Range { start: date, .. } => Some(date),
        }
    }
}

impl From<SelectionState> for DateValue {
    fn from(state: SelectionState) -> Self {
        match state {
            SelectionState::Single(None) | SelectionState::Range(RangeSelection::Unselected) => {
                Self::None
            }
            SelectionState::Single(Some(date)) => Self::Single(date),
            SelectionState::Range(RangeSelection::Start(start)) => Self::Range { start, end: None },
            SelectionState::Range(RangeSelection::Complete { start, end }) => Self::Range {
                start,
                end: Some(end),
            },
        }
    }
}

/// Result of one selection attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Disabled date; nothing changed.
    Ignored,
    /// First range endpoint recorded; the range is still open.
    RangeStarted(CalendarDate),
    /// A single date or a full range was committed. Callers should close the popover.
    Committed(DateValue),
}

#[derive(Clone)]
pub struct DateSelection {
    state: SelectionState,
    disabled: Option<DisabledPredicate>,
}

impl fmt::Debug for DateSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateSelection")
            .field("state", &self.state)
            .field("disabled", &self.disabled.is_some())
            .finish()
    }
}

impl Default for DateSelection {
    fn default() -> Self {
        Self::new(SelectionMode::default())
    }
}

impl DateSelection {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            state: SelectionState::empty(mode),
            disabled: None,
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.state.mode()
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn value(&self) -> DateValue {
        self.state.into()
    }

    pub fn anchor(&self) -> Option<CalendarDate> {
        self.value().anchor()
    }

    pub fn set_disabled_dates(&mut self, predicate: Option<DisabledPredicate>) {
        self.disabled = predicate;
    }

    pub fn is_disabled(&self, date: CalendarDate) -> bool {
        self.disabled.as_ref().is_some_and(|f| f(date))
    }

    /// Applies an activation on `date` according to the current mode and phase.
    pub fn select(&mut self, date: CalendarDate) -> SelectOutcome {
        if self.is_disabled(date) {
            tracing::debug!(%date, "selection ignored: date is disabled");
            return SelectOutcome::Ignored;
        }

        match self.state {
            SelectionState::Single(_) => {
                self.state = SelectionState::Single(Some(date));
                tracing::debug!(%date, "single date committed");
                SelectOutcome::Committed(self.value())
            }
            SelectionState::Range(RangeSelection::Start(start)) => {
                let range = RangeSelection::between(start, date);
                self.state = SelectionState::Range(range);
                tracing::debug!(?range, "range committed");
                SelectOutcome::Committed(self.value())
            }
            SelectionState::Range(RangeSelection::Unselected | RangeSelection::Complete { .. }) => {
                self.state = SelectionState::Range(RangeSelection::Start(date));
                tracing::debug!(%date, "range started");
                SelectOutcome::RangeStarted(date)
            }
        }
    }

    pub fn clear(&mut self) {
        self.state = SelectionState::empty(self.mode());
    }

    /// Replaces the selection with an externally owned value, coerced to this selection's mode.
    ///
    /// In range mode a lone date becomes a pending start; reversed endpoints are swapped. In
    /// single mode a range collapses to its start.
    pub fn set_value(&mut self, value: DateValue) {
        self.state = match (self.mode(), value) {
            (mode, DateValue::None) => SelectionState::empty(mode),
            (SelectionMode::Single, value) => SelectionState::Single(value.anchor()),
            (SelectionMode::Range, DateValue::Single(start))
            | (SelectionMode::Range, DateValue::Range { start, end: None }) => {
                SelectionState::Range(RangeSelection::Start(start))
            }
            (
                SelectionMode::Range,
                DateValue::Range {
                    start,
                    end: Some(end),
                },
            ) => SelectionState::Range(RangeSelection::between(start, end)),
        };
    }

    /// `true` if `date` is the selected day or one of the range endpoints.
    pub fn is_selected(&self, date: CalendarDate) -> bool {
        match self.state {
            SelectionState::Single(selected) => selected == Some(date),
            SelectionState::Range(range) => range.start() == Some(date) || range.end() == Some(date),
        }
    }

    /// `true` if `date` lies strictly between the endpoints of a complete range.
    pub fn is_within_range(&self, date: CalendarDate) -> bool {
        match self.state {
            SelectionState::Range(range @ RangeSelection::Complete { start, end }) => {
                range.contains(date) && date != start && date != end
            }
            _ => false,
        }
    }
}
