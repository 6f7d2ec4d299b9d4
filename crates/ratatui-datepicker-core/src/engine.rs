//! The headless date picker: selection, navigation, and popover lifecycle behind one event API.
//!
//! Rendering layers translate pointer hits into [`DatePickerEngine::activate`],
//! [`DatePickerEngine::activate_trigger`], and [`DatePickerEngine::activate_outside`], and
//! forward keys to [`DatePickerEngine::handle_key`]. Every call returns a
//! [`DatePickerAction`] describing what the caller should do next.

use std::rc::Rc;

use crate::date::CalendarDate;
use crate::error::Result;
use crate::format;
use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::keymap;
use crate::listeners::ListenerKind;
use crate::listeners::ListenerRegistry;
use crate::listeners::SharedListenerRegistry;
use crate::navigation::KeyboardNavigator;
use crate::navigation::NavBindings;
use crate::navigation::NavOutcome;
use crate::popover::CloseReason;
use crate::popover::PopoverController;
use crate::selection::DateSelection;
use crate::selection::DateValue;
use crate::selection::DisabledPredicate;
use crate::selection::SelectOutcome;
use crate::selection::SelectionMode;
use crate::view::ViewState;
use crate::view::YearDomain;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DatePickerAction {
    None,
    Redraw,
    Opened,
    Closed(CloseReason),
    /// A commit completed: a single date, or both ends of a range. The popover is closed.
    Changed(DateValue),
}

/// Keys handled outside calendar navigation.
#[derive(Clone, Debug)]
pub struct TriggerBindings {
    /// Opens the popover from the (focused) trigger.
    pub open: Vec<KeyEvent>,
    /// Closes the popover without committing.
    pub dismiss: Vec<KeyEvent>,
}

impl Default for TriggerBindings {
    fn default() -> Self {
        Self {
            open: vec![
                keymap::key(KeyCode::Enter),
                keymap::key_char(' '),
                keymap::key(KeyCode::Down),
            ],
            dismiss: vec![keymap::key(KeyCode::Esc)],
        }
    }
}

pub struct DatePickerEngine {
    selection: DateSelection,
    popover: PopoverController,
    navigator: KeyboardNavigator,
    trigger: TriggerBindings,
    years: YearDomain,
    disabled: bool,
}

impl std::fmt::Debug for DatePickerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatePickerEngine")
            .field("selection", &self.selection)
            .field("popover", &self.popover)
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}

impl DatePickerEngine {
    /// An engine with its own private listener registry.
    pub fn new(mode: SelectionMode) -> Self {
        Self::with_registry(mode, Rc::new(SharedListenerRegistry::new()))
    }

    pub fn with_registry(mode: SelectionMode, registry: Rc<dyn ListenerRegistry>) -> Self {
        Self {
            selection: DateSelection::new(mode),
            popover: PopoverController::new(registry),
            navigator: KeyboardNavigator::default(),
            trigger: TriggerBindings::default(),
            years: YearDomain::around_today(),
            disabled: false,
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.selection.mode()
    }

    pub fn selection(&self) -> &DateSelection {
        &self.selection
    }

    pub fn value(&self) -> DateValue {
        self.selection.value()
    }

    /// The string the trigger field displays.
    pub fn display_text(&self) -> String {
        format::format_value(&self.value())
    }

    /// Synchronization point for a controlled value: replaces the selection and, if the popover
    /// is open, re-seeds focus and view from the new value.
    pub fn set_value(&mut self, value: DateValue) {
        if value == self.selection.value() {
            return;
        }
        self.selection.set_value(value);
        self.popover.sync_value(self.selection.anchor());
    }

    pub fn clear(&mut self) {
        self.set_value(DateValue::None);
    }

    pub fn set_disabled_dates(&mut self, predicate: Option<DisabledPredicate>) {
        self.selection.set_disabled_dates(predicate);
    }

    pub fn is_date_disabled(&self, date: CalendarDate) -> bool {
        self.selection.is_disabled(date)
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Disabling the whole widget closes an open popover and suppresses all interaction.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled {
            self.popover.close(CloseReason::Dismissed);
        }
    }

    pub fn nav_bindings(&self) -> &NavBindings {
        self.navigator.bindings()
    }

    pub fn set_nav_bindings(&mut self, bindings: NavBindings) {
        self.navigator.set_bindings(bindings);
    }

    pub fn set_trigger_bindings(&mut self, bindings: TriggerBindings) {
        self.trigger = bindings;
    }

    pub fn year_domain(&self) -> &YearDomain {
        &self.years
    }

    pub fn is_open(&self) -> bool {
        self.popover.is_open()
    }

    /// Whether the open popover still receives global events of `kind`. Always `false` when
    /// closed.
    pub fn listens_for(&self, kind: ListenerKind) -> bool {
        self.popover.listens_for(kind)
    }

    pub fn focus(&self) -> Option<CalendarDate> {
        self.popover.session().map(|s| s.focus)
    }

    pub fn view(&self) -> Option<ViewState> {
        self.popover.session().map(|s| s.view)
    }

    pub fn open(&mut self) -> DatePickerAction {
        if self.disabled {
            return DatePickerAction::None;
        }
        if self.popover.open(self.selection.anchor()) {
            DatePickerAction::Opened
        } else {
            DatePickerAction::None
        }
    }

    pub fn close(&mut self) -> DatePickerAction {
        self.close_for(CloseReason::Dismissed)
    }

    /// Activation of the trigger control: opens when closed, closes when open.
    pub fn activate_trigger(&mut self) -> DatePickerAction {
        if self.is_open() {
            self.close()
        } else {
            self.open()
        }
    }

    /// An activation that landed outside the popover (and outside the trigger).
    ///
    /// Only delivered while the open session holds a pointer subscription; a closed picker, or
    /// one whose subscription the registry dropped, ignores it.
    pub fn activate_outside(&mut self) -> DatePickerAction {
        if !self.popover.listens_for(ListenerKind::PointerActivation) {
            return DatePickerAction::None;
        }
        self.close_for(CloseReason::OutsideActivation)
    }

    /// Pointer activation of a day cell. Also the commit path for keyboard `Enter`.
    pub fn activate(&mut self, date: CalendarDate) -> DatePickerAction {
        if self.disabled || !self.is_open() {
            return DatePickerAction::None;
        }
        match self.selection.select(date) {
            SelectOutcome::Ignored => DatePickerAction::None,
            SelectOutcome::RangeStarted(start) => {
                if let Some(session) = self.popover.session_mut() {
                    session.focus = start;
                    session.view.follow(start);
                }
                DatePickerAction::Redraw
            }
            SelectOutcome::Committed(value) => {
                self.popover.close(CloseReason::Committed);
                DatePickerAction::Changed(value)
            }
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> DatePickerAction {
        if self.disabled {
            return DatePickerAction::None;
        }
        if !self.is_open() {
            if keymap::any_matches(&self.trigger.open, key) {
                return self.open();
            }
            return DatePickerAction::None;
        }
        if keymap::any_matches(&self.trigger.dismiss, key)
            && self.popover.listens_for(ListenerKind::Key)
        {
            return self.close_for(CloseReason::Escape);
        }

        let Some(session) = self.popover.session_mut() else {
            return DatePickerAction::None;
        };
        match self
            .navigator
            .handle_key(key, &mut session.focus, &mut session.view)
        {
            NavOutcome::Ignored => DatePickerAction::None,
            NavOutcome::Moved { .. } => DatePickerAction::Redraw,
            NavOutcome::Commit(date) => self.activate(date),
        }
    }

    pub fn prev_month(&mut self) -> DatePickerAction {
        self.with_view(ViewState::prev_month)
    }

    pub fn next_month(&mut self) -> DatePickerAction {
        self.with_view(ViewState::next_month)
    }

    pub fn prev_year(&mut self) -> DatePickerAction {
        self.with_view(ViewState::prev_year)
    }

    pub fn next_year(&mut self) -> DatePickerAction {
        self.with_view(ViewState::next_year)
    }

    /// Direct month jump.
    ///
    /// # Panics
    ///
    /// Panics if `month` is not in `0..=11`.
    pub fn set_month(&mut self, month: u32) -> DatePickerAction {
        self.with_view(|v| v.set_month(month))
    }

    /// Direct year jump. Years outside [`Self::year_domain`] are still accepted, since the domain
    /// only bounds what a year picker offers, but years the date backend cannot represent fail
    /// with [`crate::error::CalendarError::OutOfRange`] and leave the view where it was.
    pub fn set_year(&mut self, year: i32) -> Result<DatePickerAction> {
        if self.disabled {
            return Ok(DatePickerAction::None);
        }
        match self.popover.session_mut() {
            Some(session) => {
                session.view.try_set_year(year)?;
                Ok(DatePickerAction::Redraw)
            }
            None => Ok(DatePickerAction::None),
        }
    }

    fn with_view(&mut self, f: impl FnOnce(&mut ViewState)) -> DatePickerAction {
        if self.disabled {
            return DatePickerAction::None;
        }
        match self.popover.session_mut() {
            Some(session) => {
                f(&mut session.view);
                DatePickerAction::Redraw
            }
            None => DatePickerAction::None,
        }
    }

    fn close_for(&mut self, reason: CloseReason) -> DatePickerAction {
        if self.popover.close(reason) {
            DatePickerAction::Closed(reason)
        } else {
            DatePickerAction::None
        }
    }
}
