//! Keyboard movement of the focused day across the month grid.
//!
//! Focus moves through [`CalendarDate`] arithmetic, so it crosses month and year boundaries
//! freely; the view follows it. Disabled dates do not stop focus, only commits.

use crate::date::CalendarDate;
use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::keymap;
use crate::keymap::Binding;
use crate::view::ViewState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavAction {
    PrevDay,
    NextDay,
    PrevWeek,
    NextWeek,
    PrevMonth,
    NextMonth,
    PrevYear,
    NextYear,
    MonthStart,
    MonthEnd,
    Today,
    /// Same path as a pointer activation on the focused day.
    Commit,
}

/// Key bindings for calendar navigation.
///
/// Arrow keys move by day/week with `h/j/k/l` as Vim-style alternates; `PageUp`/`PageDown` move
/// by month and by year with `Shift`.
#[derive(Clone, Debug)]
pub struct NavBindings {
    pub prev_day: Vec<KeyEvent>,
    pub next_day: Vec<KeyEvent>,
    pub prev_week: Vec<KeyEvent>,
    pub next_week: Vec<KeyEvent>,
    pub prev_month: Vec<KeyEvent>,
    pub next_month: Vec<KeyEvent>,
    pub prev_year: Vec<KeyEvent>,
    pub next_year: Vec<KeyEvent>,
    pub month_start: Vec<KeyEvent>,
    pub month_end: Vec<KeyEvent>,
    pub today: Vec<KeyEvent>,
    pub commit: Vec<KeyEvent>,
}

impl Default for NavBindings {
    fn default() -> Self {
        Self {
            prev_day: vec![keymap::key(KeyCode::Left), keymap::key_char('h')],
            next_day: vec![keymap::key(KeyCode::Right), keymap::key_char('l')],
            prev_week: vec![keymap::key(KeyCode::Up), keymap::key_char('k')],
            next_week: vec![keymap::key(KeyCode::Down), keymap::key_char('j')],
            prev_month: vec![keymap::key(KeyCode::PageUp)],
            next_month: vec![keymap::key(KeyCode::PageDown)],
            prev_year: vec![keymap::key_shift(KeyCode::PageUp)],
            next_year: vec![keymap::key_shift(KeyCode::PageDown)],
            month_start: vec![keymap::key(KeyCode::Home)],
            month_end: vec![keymap::key(KeyCode::End)],
            today: vec![keymap::key_char('t')],
            commit: vec![keymap::key(KeyCode::Enter), keymap::key_char(' ')],
        }
    }
}

impl NavBindings {
    pub fn action_for(&self, key: &KeyEvent) -> Option<NavAction> {
        let table = [
            (&self.prev_day, NavAction::PrevDay),
            (&self.next_day, NavAction::NextDay),
            (&self.prev_week, NavAction::PrevWeek),
            (&self.next_week, NavAction::NextWeek),
            (&self.prev_month, NavAction::PrevMonth),
            (&self.next_month, NavAction::NextMonth),
            (&self.prev_year, NavAction::PrevYear),
            (&self.next_year, NavAction::NextYear),
            (&self.month_start, NavAction::MonthStart),
            (&self.month_end, NavAction::MonthEnd),
            (&self.today, NavAction::Today),
            (&self.commit, NavAction::Commit),
        ];
        table
            .into_iter()
            .find(|(keys, _)| keymap::any_matches(keys, key))
            .map(|(_, action)| action)
    }

    /// Short help entries for a footer.
    pub fn help(&self) -> Vec<Binding> {
        let mut arrows = self.prev_day.clone();
        arrows.extend(self.next_day.iter().cloned());
        arrows.extend(self.prev_week.iter().cloned());
        arrows.extend(self.next_week.iter().cloned());

        let mut months = self.prev_month.clone();
        months.extend(self.next_month.iter().cloned());

        vec![
            Binding::new("←↓↑→", "move", arrows),
            Binding::new("PgUp/PgDn", "month", months),
            Binding::new("⏎", "pick", self.commit.clone()),
            Binding::new("t", "today", self.today.clone()),
        ]
    }
}

/// Result of feeding one key to the navigator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavOutcome {
    /// Not a navigation key.
    Ignored,
    /// Focus moved; `view_changed` is `true` when the displayed month had to follow.
    Moved {
        focus: CalendarDate,
        view_changed: bool,
    },
    /// Commit requested on the focused date.
    Commit(CalendarDate),
}

#[derive(Clone, Debug, Default)]
pub struct KeyboardNavigator {
    bindings: NavBindings,
}

impl KeyboardNavigator {
    pub fn new(bindings: NavBindings) -> Self {
        Self { bindings }
    }

    pub fn bindings(&self) -> &NavBindings {
        &self.bindings
    }

    pub fn set_bindings(&mut self, bindings: NavBindings) {
        self.bindings = bindings;
    }

    /// Maps `key` to an action and applies it to `focus` and `view`.
    pub fn handle_key(
        &self,
        key: &KeyEvent,
        focus: &mut CalendarDate,
        view: &mut ViewState,
    ) -> NavOutcome {
        match self.bindings.action_for(key) {
            Some(action) => apply(action, focus, view),
            None => NavOutcome::Ignored,
        }
    }
}

/// Applies `action` to the focused date, keeping `view` on the focused month.
pub fn apply(action: NavAction, focus: &mut CalendarDate, view: &mut ViewState) -> NavOutcome {
    let next = match action {
        NavAction::Commit => return NavOutcome::Commit(*focus),
        NavAction::PrevDay => focus.add_days(-1),
        NavAction::NextDay => focus.add_days(1),
        NavAction::PrevWeek => focus.add_days(-7),
        NavAction::NextWeek => focus.add_days(7),
        NavAction::PrevMonth => focus.add_months(-1),
        NavAction::NextMonth => focus.add_months(1),
        NavAction::PrevYear => focus.add_years(-1),
        NavAction::NextYear => focus.add_years(1),
        NavAction::MonthStart => focus.first_of_month(),
        NavAction::MonthEnd => focus.last_of_month(),
        NavAction::Today => CalendarDate::today(),
    };
    *focus = next;
    let view_changed = view.follow(next);
    tracing::trace!(?action, focus = %next, view_changed, "focus moved");
    NavOutcome::Moved {
        focus: next,
        view_changed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyModifiers;

    fn date(y: i32, m: u32, d: u32) -> CalendarDate {
        CalendarDate::new(y, m, d).expect("valid date")
    }

    fn press(
        nav: &KeyboardNavigator,
        code: KeyCode,
        focus: &mut CalendarDate,
        view: &mut ViewState,
    ) -> NavOutcome {
        nav.handle_key(&KeyEvent::new(code), focus, view)
    }

    #[test]
    fn arrow_down_crosses_into_next_month() {
        let nav = KeyboardNavigator::default();
        let mut focus = date(2025, 0, 28);
        let mut view = ViewState::of(focus);
        let outcome = press(&nav, KeyCode::Down, &mut focus, &mut view);
        assert_eq!(
            outcome,
            NavOutcome::Moved {
                focus: date(2025, 1, 4),
                view_changed: true,
            }
        );
        assert_eq!(focus, date(2025, 1, 4));
        assert_eq!(view, ViewState::new(2025, 1));
    }

    #[test]
    fn arrows_move_by_day_and_week() {
        let nav = KeyboardNavigator::default();
        let mut focus = date(2025, 5, 15);
        let mut view = ViewState::of(focus);
        press(&nav, KeyCode::Left, &mut focus, &mut view);
        assert_eq!(focus, date(2025, 5, 14));
        press(&nav, KeyCode::Right, &mut focus, &mut view);
        press(&nav, KeyCode::Right, &mut focus, &mut view);
        assert_eq!(focus, date(2025, 5, 16));
        press(&nav, KeyCode::Up, &mut focus, &mut view);
        assert_eq!(focus, date(2025, 5, 9));
        assert_eq!(view, ViewState::new(2025, 5));
    }

    #[test]
    fn arrow_left_on_new_year_moves_view_back_a_year() {
        let nav = KeyboardNavigator::default();
        let mut focus = date(2025, 0, 1);
        let mut view = ViewState::of(focus);
        press(&nav, KeyCode::Left, &mut focus, &mut view);
        assert_eq!(focus, date(2024, 11, 31));
        assert_eq!(view, ViewState::new(2024, 11));
    }

    #[test]
    fn enter_requests_commit_without_moving() {
        let nav = KeyboardNavigator::default();
        let mut focus = date(2025, 2, 3);
        let mut view = ViewState::of(focus);
        assert_eq!(
            press(&nav, KeyCode::Enter, &mut focus, &mut view),
            NavOutcome::Commit(date(2025, 2, 3))
        );
        assert_eq!(focus, date(2025, 2, 3));
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        let nav = KeyboardNavigator::default();
        let mut focus = date(2025, 2, 3);
        let mut view = ViewState::of(focus);
        assert_eq!(
            press(&nav, KeyCode::Char('x'), &mut focus, &mut view),
            NavOutcome::Ignored
        );
        assert_eq!(
            press(&nav, KeyCode::Tab, &mut focus, &mut view),
            NavOutcome::Ignored
        );
        assert_eq!(focus, date(2025, 2, 3));
    }

    #[test]
    fn page_keys_move_by_month_and_year() {
        let nav = KeyboardNavigator::default();
        let mut focus = date(2025, 0, 31);
        let mut view = ViewState::of(focus);
        press(&nav, KeyCode::PageDown, &mut focus, &mut view);
        assert_eq!(focus, date(2025, 1, 28));
        assert_eq!(view, ViewState::new(2025, 1));

        let shift_up = KeyEvent::new(KeyCode::PageUp).with_modifiers(KeyModifiers::shift());
        nav.handle_key(&shift_up, &mut focus, &mut view);
        assert_eq!(focus, date(2024, 1, 28));
        assert_eq!(view, ViewState::new(2024, 1));
    }

    #[test]
    fn home_and_end_stay_in_month() {
        let nav = KeyboardNavigator::default();
        let mut focus = date(2024, 1, 10);
        let mut view = ViewState::of(focus);
        press(&nav, KeyCode::End, &mut focus, &mut view);
        assert_eq!(focus, date(2024, 1, 29));
        press(&nav, KeyCode::Home, &mut focus, &mut view);
        assert_eq!(focus, date(2024, 1, 1));
        assert_eq!(view, ViewState::new(2024, 1));
    }

    #[test]
    fn custom_bindings_replace_defaults() {
        let nav = KeyboardNavigator::new(NavBindings {
            next_week: vec![keymap::key_char('n')],
            ..NavBindings::default()
        });
        let mut focus = date(2025, 0, 1);
        let mut view = ViewState::of(focus);
        assert_eq!(
            press(&nav, KeyCode::Down, &mut focus, &mut view),
            NavOutcome::Ignored
        );
        press(&nav, KeyCode::Char('n'), &mut focus, &mut view);
        assert_eq!(focus, date(2025, 0, 8));
    }
}
