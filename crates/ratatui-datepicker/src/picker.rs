//! The date picker widget: a one-line trigger field plus a calendar popover.
//!
//! State lives in a [`DatePickerEngine`]; this module draws it and turns pointer hits into engine
//! calls. Hit areas come from the most recent [`DatePicker::render`], so mouse input always
//! refers to what the user actually saw.

use std::rc::Rc;

use crate::date::CalendarDate;
use crate::date::DAYS_PER_WEEK;
use crate::engine::DatePickerAction;
use crate::engine::DatePickerEngine;
use crate::engine::TriggerBindings;
use crate::error::Result;
use crate::format;
use crate::grid::MonthGrid;
use crate::grid::WEEKDAY_LABELS;
use crate::help::HelpBar;
use crate::help::HelpBarOptions;
use crate::input::InputEvent;
use crate::input::MouseEvent;
use crate::input::MouseEventKind;
use crate::keymap::Binding;
use crate::listeners::ListenerKind;
use crate::listeners::ListenerRegistry;
use crate::listeners::SharedListenerRegistry;
use crate::navigation::NavBindings;
use crate::selection::DateValue;
use crate::selection::DisabledPredicate;
use crate::selection::RangeSelection;
use crate::selection::SelectionMode;
use crate::selection::SelectionState;
use crate::theme::Theme;
use crate::view::ViewState;
use crate::view::YearDomain;
use ratatui::buffer::Buffer;
use ratatui::layout::Position;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::Block;
use ratatui::widgets::Clear;
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthStr;

/// Columns per day cell: two digits and a gap.
const CELL_W: u16 = 3;
const GRID_W: u16 = CELL_W * DAYS_PER_WEEK as u16 - 1;
/// Six weeks always fit any month; the popover keeps a stable height.
const GRID_ROWS: u16 = 6;
const PAD_X: u16 = 1;
/// Month and year choices are laid out four to a row, one blank row apart.
const CHOICE_W: u16 = 5;
const CHOICE_COLS: usize = 4;
const YEAR_PAGE: usize = 12;

#[derive(Clone, Debug)]
pub struct DatePickerOptions {
    /// Fixed for the lifetime of a picker; ignored by [`DatePicker::set_options`].
    pub mode: SelectionMode,
    pub placeholder: String,
    pub range_placeholder: String,
    pub show_help: bool,
    pub trigger_style: Style,
    pub focused_trigger_style: Style,
    pub popover_style: Style,
    pub nav: NavBindings,
    pub trigger: TriggerBindings,
}

impl Default for DatePickerOptions {
    fn default() -> Self {
        Self {
            mode: SelectionMode::Single,
            placeholder: "Pick a date".to_string(),
            range_placeholder: "Pick a date range".to_string(),
            show_help: true,
            trigger_style: Style::default(),
            focused_trigger_style: Style::default(),
            popover_style: Style::default(),
            nav: NavBindings::default(),
            trigger: TriggerBindings::default(),
        }
    }
}

/// What the popover body shows. The header title cycles days -> months -> years -> months.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Panel {
    #[default]
    Days,
    Months,
    Years { page_start: i32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Choice {
    Month(u32),
    Year(i32),
}

impl Choice {
    fn label(self) -> String {
        match self {
            Self::Month(month) => format::month_name(month).chars().take(3).collect(),
            Self::Year(year) => year.to_string(),
        }
    }
}

#[derive(Clone, Debug)]
struct PopoverLayout {
    area: Rect,
    prev: Rect,
    next: Rect,
    title: Rect,
    panel: Panel,
    grid_x: u16,
    grid_y: u16,
    grid: MonthGrid,
    choices: Vec<(Rect, Choice)>,
}

impl PopoverLayout {
    fn choice_at(&self, pos: Position) -> Option<Choice> {
        self.choices
            .iter()
            .find(|(rect, _)| rect.contains(pos))
            .map(|(_, choice)| *choice)
    }

    fn date_at(&self, x: u16, y: u16) -> Option<CalendarDate> {
        if self.panel != Panel::Days {
            return None;
        }
        if !self.area.contains(Position::new(x, y)) || x < self.grid_x || y < self.grid_y {
            return None;
        }
        let row = y - self.grid_y;
        let rel = x - self.grid_x;
        if row >= GRID_ROWS || rel >= GRID_W || rel % CELL_W == CELL_W - 1 {
            return None;
        }
        self.grid.date_at(usize::from(row), usize::from(rel / CELL_W))
    }
}

#[derive(Clone, Debug, Default)]
struct PickerLayout {
    trigger: Rect,
    popover: Option<PopoverLayout>,
}

#[derive(Debug)]
pub struct DatePicker {
    engine: DatePickerEngine,
    options: DatePickerOptions,
    help: HelpBar,
    focused: bool,
    panel: Panel,
    layout: Option<PickerLayout>,
}

impl DatePicker {
    pub fn new(mode: SelectionMode) -> Self {
        Self::with_options(DatePickerOptions {
            mode,
            ..Default::default()
        })
    }

    pub fn with_options(options: DatePickerOptions) -> Self {
        Self::with_registry(options, Rc::new(SharedListenerRegistry::new()))
    }

    /// A picker whose open popover subscribes to global events in `registry`.
    pub fn with_registry(options: DatePickerOptions, registry: Rc<dyn ListenerRegistry>) -> Self {
        let mut picker = Self {
            engine: DatePickerEngine::with_registry(options.mode, registry),
            options: options.clone(),
            help: HelpBar::default(),
            focused: false,
            panel: Panel::Days,
            layout: None,
        };
        picker.set_options(options);
        picker
    }

    pub fn options(&self) -> &DatePickerOptions {
        &self.options
    }

    pub fn set_options(&mut self, mut options: DatePickerOptions) {
        if options.mode != self.engine.mode() {
            tracing::warn!(
                requested = ?options.mode,
                current = ?self.engine.mode(),
                "selection mode is fixed per picker; keeping the current mode"
            );
            options.mode = self.engine.mode();
        }
        self.engine.set_nav_bindings(options.nav.clone());
        self.engine.set_trigger_bindings(options.trigger.clone());
        self.help.set_bindings(popover_help(&options));
        self.options = options;
    }

    pub fn engine(&self) -> &DatePickerEngine {
        &self.engine
    }

    pub fn mode(&self) -> SelectionMode {
        self.engine.mode()
    }

    pub fn value(&self) -> DateValue {
        self.engine.value()
    }

    pub fn set_value(&mut self, value: DateValue) {
        self.engine.set_value(value);
    }

    pub fn display_text(&self) -> String {
        self.engine.display_text()
    }

    pub fn set_disabled_dates(&mut self, predicate: Option<DisabledPredicate>) {
        self.engine.set_disabled_dates(predicate);
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.engine.set_disabled(disabled);
        self.settle_panel();
    }

    pub fn is_disabled(&self) -> bool {
        self.engine.is_disabled()
    }

    /// Marks the trigger as having keyboard focus (styling only; the host routes keys).
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn is_open(&self) -> bool {
        self.engine.is_open()
    }

    pub fn open(&mut self) -> DatePickerAction {
        self.engine.open()
    }

    pub fn close(&mut self) -> DatePickerAction {
        let action = self.engine.close();
        self.settle_panel();
        action
    }

    /// See [`DatePickerEngine::listens_for`].
    pub fn listens_for(&self, kind: ListenerKind) -> bool {
        self.engine.listens_for(kind)
    }

    pub fn year_domain(&self) -> &YearDomain {
        self.engine.year_domain()
    }

    pub fn set_month(&mut self, month: u32) -> DatePickerAction {
        self.engine.set_month(month)
    }

    pub fn set_year(&mut self, year: i32) -> Result<DatePickerAction> {
        self.engine.set_year(year)
    }

    /// Keys always act on the day grid; a key pressed over the month or year chooser returns
    /// to it first.
    pub fn handle_event(&mut self, event: InputEvent) -> DatePickerAction {
        match event {
            InputEvent::Key(key) => {
                self.panel = Panel::Days;
                self.engine.handle_key(&key)
            }
            InputEvent::Mouse(m) => self.handle_mouse_event(m),
        }
    }

    pub fn handle_mouse_event(&mut self, event: MouseEvent) -> DatePickerAction {
        let action = self.route_mouse(event);
        self.settle_panel();
        action
    }

    fn route_mouse(&mut self, event: MouseEvent) -> DatePickerAction {
        let Some(layout) = self.layout.as_ref() else {
            // Opened before anything was drawn: every activation lands outside.
            if event.is_activation() {
                return self.engine.activate_outside();
            }
            return DatePickerAction::None;
        };
        let pos = Position::new(event.x, event.y);
        let in_trigger = layout.trigger.contains(pos);
        let popover = layout
            .popover
            .as_ref()
            .filter(|_| self.engine.is_open())
            .cloned();

        match event.kind {
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                return match popover {
                    Some(p) if p.area.contains(pos) => {
                        self.step(event.kind == MouseEventKind::ScrollDown)
                    }
                    _ => DatePickerAction::None,
                };
            }
            _ if !event.is_activation() => return DatePickerAction::None,
            _ => {}
        }

        match popover {
            Some(p) if p.area.contains(pos) => {
                if p.prev.contains(pos) {
                    self.step(false)
                } else if p.next.contains(pos) {
                    self.step(true)
                } else if p.title.contains(pos) {
                    self.cycle_panel()
                } else if let Some(choice) = p.choice_at(pos) {
                    self.choose(choice)
                } else if let Some(date) = p.date_at(event.x, event.y) {
                    self.engine.activate(date)
                } else {
                    DatePickerAction::None
                }
            }
            _ if in_trigger => self.engine.activate_trigger(),
            // Also covers a popover opened by key since the last render: it has no layout yet.
            _ => self.engine.activate_outside(),
        }
    }

    /// Header arrows and scrolling: months over the day grid, years over the month chooser,
    /// pages over the year chooser.
    fn step(&mut self, forward: bool) -> DatePickerAction {
        match (self.panel, forward) {
            (Panel::Days, false) => self.engine.prev_month(),
            (Panel::Days, true) => self.engine.next_month(),
            (Panel::Months, false) => self.engine.prev_year(),
            (Panel::Months, true) => self.engine.next_year(),
            (Panel::Years { page_start }, _) => {
                let page = YEAR_PAGE as i32;
                let target = if forward {
                    page_start.saturating_add(page)
                } else {
                    page_start.saturating_sub(page)
                };
                let next = self.engine.year_domain().page_start(target, YEAR_PAGE);
                if next == page_start {
                    return DatePickerAction::None;
                }
                self.panel = Panel::Years { page_start: next };
                DatePickerAction::Redraw
            }
        }
    }

    fn cycle_panel(&mut self) -> DatePickerAction {
        let Some(view) = self.engine.view() else {
            return DatePickerAction::None;
        };
        self.panel = match self.panel {
            Panel::Days => Panel::Months,
            Panel::Months => Panel::Years {
                page_start: self.engine.year_domain().page_start(view.year(), YEAR_PAGE),
            },
            Panel::Years { .. } => Panel::Months,
        };
        DatePickerAction::Redraw
    }

    fn choose(&mut self, choice: Choice) -> DatePickerAction {
        match choice {
            Choice::Month(month) => {
                let action = self.engine.set_month(month);
                self.panel = Panel::Days;
                action
            }
            Choice::Year(year) => match self.engine.set_year(year) {
                Ok(action) => {
                    self.panel = Panel::Months;
                    action
                }
                Err(err) => {
                    tracing::warn!(%err, "year choice rejected");
                    DatePickerAction::None
                }
            },
        }
    }

    fn settle_panel(&mut self) {
        if !self.engine.is_open() {
            self.panel = Panel::Days;
        }
    }

    /// Draws the trigger into the first row of `area` and, when open, the popover below it
    /// (or above, if there is no room below). The popover may extend past `area` up to the
    /// buffer's bounds.
    pub fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let trigger = area.intersection(buf.area);
        if trigger.width == 0 || trigger.height == 0 {
            self.layout = None;
            return;
        }
        let trigger = Rect::new(trigger.x, trigger.y, trigger.width, 1);
        self.settle_panel();
        self.render_trigger(trigger, buf, theme);

        let popover = match (self.engine.view(), self.engine.focus()) {
            (Some(view), Some(focus)) => self.render_popover(trigger, view, focus, buf, theme),
            _ => None,
        };
        self.layout = Some(PickerLayout { trigger, popover });
    }

    fn render_trigger(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let base = if self.engine.is_disabled() {
            theme.text_muted
        } else if self.focused {
            theme.text_primary.patch(theme.accent).patch(self.options.focused_trigger_style)
        } else {
            theme.text_primary.patch(self.options.trigger_style)
        };
        buf.set_style(area, base);

        let text = self.engine.display_text();
        let (text, style) = if text.is_empty() {
            let placeholder = match self.engine.mode() {
                SelectionMode::Single => &self.options.placeholder,
                SelectionMode::Range => &self.options.range_placeholder,
            };
            (placeholder.clone(), base.patch(theme.text_muted))
        } else {
            (text, base)
        };

        let indicator = if self.engine.is_open() { "▴" } else { "▾" };
        let text_w = area.width.saturating_sub(2);
        buf.set_stringn(area.x, area.y, &text, usize::from(text_w), style);
        if area.width >= 2 {
            buf.set_stringn(area.right() - 1, area.y, indicator, 1, base);
        }
    }

    fn render_popover(
        &self,
        trigger: Rect,
        view: ViewState,
        focus: CalendarDate,
        buf: &mut Buffer,
        theme: &Theme,
    ) -> Option<PopoverLayout> {
        let help_h = u16::from(self.options.show_help);
        let help_w = if self.options.show_help {
            u16::try_from(self.help.width()).unwrap_or(u16::MAX)
        } else {
            0
        };
        let inner_w = (GRID_W + 2 * PAD_X).max(help_w);
        let inner_h = 2 + GRID_ROWS + help_h;
        let area = place_popover(trigger, buf.area, inner_w + 2, inner_h + 2);
        if area.width < 3 || area.height < 3 {
            return None;
        }

        let base = theme.text_primary.patch(self.options.popover_style);
        Clear.render(area, buf);
        let mut block = Block::bordered().border_style(theme.border).style(base);
        if let Some(title) = self.popover_title() {
            block = block.title(Line::styled(title, theme.text_muted));
        }
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return None;
        }

        let header_y = inner.y;
        let prev = Rect::new(inner.x, header_y, 1, 1);
        let next = Rect::new(inner.right() - 1, header_y, 1, 1);
        buf.set_stringn(prev.x, prev.y, "‹", 1, base.patch(theme.accent));
        buf.set_stringn(next.x, next.y, "›", 1, base.patch(theme.accent));
        let title = self.panel_title(&view);
        let title_w = u16::try_from(UnicodeWidthStr::width(title.as_str())).unwrap_or(u16::MAX);
        let title_x = inner.x + inner.width.saturating_sub(title_w) / 2;
        let title_rect = Rect::new(
            title_x,
            header_y,
            title_w.min(inner.right().saturating_sub(title_x)),
            1,
        );
        buf.set_stringn(
            title_x,
            header_y,
            &title,
            usize::from(title_rect.width),
            base.add_modifier(Modifier::BOLD),
        );

        let grid_x = inner.x + inner.width.saturating_sub(GRID_W) / 2;
        let grid_y = header_y + 2;
        let grid = view.grid();
        let mut layout = PopoverLayout {
            area,
            prev,
            next,
            title: title_rect,
            panel: self.panel,
            grid_x,
            grid_y,
            grid,
            choices: Vec::new(),
        };

        match self.panel {
            Panel::Days => self.render_days(&layout, focus, inner, base, buf, theme),
            Panel::Months => {
                let months = (0..12).map(Choice::Month).collect();
                let current = Choice::Month(view.month());
                layout.choices = render_choices(months, current, &layout, inner, base, buf, theme);
            }
            Panel::Years { page_start } => {
                let years = self
                    .engine
                    .year_domain()
                    .page(page_start, YEAR_PAGE)
                    .map(Choice::Year)
                    .collect();
                let current = Choice::Year(view.year());
                layout.choices = render_choices(years, current, &layout, inner, base, buf, theme);
            }
        }

        if self.options.show_help {
            let help_y = grid_y + GRID_ROWS;
            if help_y < inner.bottom() {
                let mut help = self.help.clone();
                help.set_options(HelpBarOptions {
                    style: base.patch(theme.text_muted),
                    key_style: base.patch(theme.accent),
                    ..HelpBarOptions::default()
                });
                help.render_ref(Rect::new(inner.x, help_y, inner.width, 1), buf);
            }
        }

        Some(layout)
    }

    fn render_days(
        &self,
        layout: &PopoverLayout,
        focus: CalendarDate,
        inner: Rect,
        base: Style,
        buf: &mut Buffer,
        theme: &Theme,
    ) {
        let (grid_x, grid_y) = (layout.grid_x, layout.grid_y);
        let labels_y = grid_y - 1;
        if labels_y < inner.bottom() {
            for (col, label) in WEEKDAY_LABELS.iter().enumerate() {
                let x = grid_x + col as u16 * CELL_W;
                if x + 2 <= inner.right() {
                    buf.set_stringn(x, labels_y, label, 2, base.patch(theme.text_muted));
                }
            }
        }

        let today = CalendarDate::today();
        for (row, week) in layout.grid.weeks().enumerate() {
            let y = grid_y + row as u16;
            if y >= inner.bottom() {
                break;
            }
            for (col, cell) in week.iter().enumerate() {
                let Some(date) = *cell else {
                    continue;
                };
                let x = grid_x + col as u16 * CELL_W;
                if x + 2 > inner.right() {
                    continue;
                }
                let style = self.day_style(date, focus, today, base, theme);
                buf.set_stringn(x, y, format!("{:>2}", date.day()), 2, style);
            }
        }
    }

    fn panel_title(&self, view: &ViewState) -> String {
        match self.panel {
            Panel::Days => format::format_month_year(view),
            Panel::Months => view.year().to_string(),
            Panel::Years { page_start } => {
                let mut page = self.engine.year_domain().page(page_start, YEAR_PAGE);
                let first = page.next().unwrap_or(page_start);
                let last = page.last().unwrap_or(first);
                format!("{first}-{last}")
            }
        }
    }

    fn day_style(
        &self,
        date: CalendarDate,
        focus: CalendarDate,
        today: CalendarDate,
        base: Style,
        theme: &Theme,
    ) -> Style {
        let selection = self.engine.selection();
        let mut style = base;
        if date == today {
            style = style.patch(theme.today);
        }
        if selection.is_within_range(date) {
            style = style.patch(theme.in_range);
        }
        if selection.is_selected(date) {
            style = style.patch(theme.selected);
        }
        if self.engine.is_date_disabled(date) {
            style = style.patch(theme.disabled);
        }
        if date == focus {
            style = style.patch(theme.focused);
        }
        style
    }

    fn popover_title(&self) -> Option<&'static str> {
        match self.engine.selection().state() {
            SelectionState::Single(_) => None,
            SelectionState::Range(RangeSelection::Start(_)) => Some(" end date "),
            SelectionState::Range(_) => Some(" start date "),
        }
    }
}

/// Draws `choices` four to a row from the grid origin and returns their hit areas. Choices that
/// do not fit inside `inner` are neither drawn nor clickable.
fn render_choices(
    choices: Vec<Choice>,
    current: Choice,
    layout: &PopoverLayout,
    inner: Rect,
    base: Style,
    buf: &mut Buffer,
    theme: &Theme,
) -> Vec<(Rect, Choice)> {
    let mut hits = Vec::with_capacity(choices.len());
    for (i, choice) in choices.into_iter().enumerate() {
        let col = (i % CHOICE_COLS) as u16;
        let row = (i / CHOICE_COLS) as u16;
        let rect = Rect::new(
            layout.grid_x + col * CHOICE_W,
            layout.grid_y + row * 2,
            CHOICE_W - 1,
            1,
        );
        if rect.y >= inner.bottom() || rect.right() > inner.right() {
            continue;
        }
        let style = if choice == current {
            base.patch(theme.selected)
        } else {
            base
        };
        buf.set_stringn(rect.x, rect.y, choice.label(), usize::from(rect.width), style);
        hits.push((rect, choice));
    }
    hits
}

fn popover_help(options: &DatePickerOptions) -> Vec<Binding> {
    vec![
        Binding::new("⏎", "pick", options.nav.commit.clone()),
        Binding::new("esc", "close", options.trigger.dismiss.clone()),
    ]
}

/// Below the trigger when it fits, above when only that fits, otherwise below and clipped.
fn place_popover(trigger: Rect, bounds: Rect, width: u16, height: u16) -> Rect {
    let x = trigger
        .x
        .min(bounds.right().saturating_sub(width))
        .max(bounds.x);
    let below = trigger.bottom();
    let y = if below.saturating_add(height) <= bounds.bottom() {
        below
    } else if trigger.y >= bounds.y.saturating_add(height) {
        trigger.y - height
    } else {
        below
    };
    Rect::new(x, y, width, height).intersection(bounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyCode;
    use crate::input::KeyEvent;
    use crate::popover::CloseReason;

    fn d(y: i32, m: u32, day: u32) -> CalendarDate {
        CalendarDate::new(y, m, day).expect("valid date")
    }

    fn rendered(picker: &mut DatePicker) -> Buffer {
        let mut buf = Buffer::empty(Rect::new(0, 0, 40, 16));
        picker.render(Rect::new(2, 1, 20, 1), &mut buf, &Theme::default());
        buf
    }

    fn popover(picker: &DatePicker) -> PopoverLayout {
        picker
            .layout
            .as_ref()
            .and_then(|l| l.popover.clone())
            .expect("popover rendered")
    }

    fn center_of(layout: &PopoverLayout, date: CalendarDate) -> (u16, u16) {
        let (row, col) = layout.grid.position_of(date).expect("date in grid");
        (
            layout.grid_x + col as u16 * CELL_W,
            layout.grid_y + row as u16,
        )
    }

    #[test]
    fn popover_sits_below_trigger() {
        let area = place_popover(Rect::new(2, 1, 20, 1), Rect::new(0, 0, 40, 16), 24, 11);
        assert_eq!(area, Rect::new(2, 2, 24, 11));
    }

    #[test]
    fn popover_flips_above_when_no_room_below() {
        let area = place_popover(Rect::new(0, 14, 20, 1), Rect::new(0, 0, 40, 16), 24, 11);
        assert_eq!(area, Rect::new(0, 3, 24, 11));
    }

    #[test]
    fn popover_shifts_left_at_right_edge() {
        let area = place_popover(Rect::new(30, 0, 10, 1), Rect::new(0, 0, 40, 16), 24, 11);
        assert_eq!(area.x, 16);
    }

    #[test]
    fn clicking_trigger_opens_and_day_commits() {
        let mut picker = DatePicker::new(SelectionMode::Single);
        picker.set_value(DateValue::Single(d(2025, 0, 5)));
        rendered(&mut picker);
        assert_eq!(
            picker.handle_event(InputEvent::Mouse(MouseEvent::click(3, 1))),
            DatePickerAction::Opened
        );
        rendered(&mut picker);

        let layout = popover(&picker);
        let (x, y) = center_of(&layout, d(2025, 0, 20));
        assert_eq!(
            picker.handle_event(InputEvent::Mouse(MouseEvent::click(x, y))),
            DatePickerAction::Changed(DateValue::Single(d(2025, 0, 20)))
        );
        assert!(!picker.is_open());
        assert_eq!(picker.display_text(), "01/20/2025");
    }

    #[test]
    fn clicking_outside_closes() {
        let mut picker = DatePicker::new(SelectionMode::Single);
        picker.open();
        rendered(&mut picker);
        assert_eq!(
            picker.handle_event(InputEvent::Mouse(MouseEvent::click(39, 15))),
            DatePickerAction::Closed(CloseReason::OutsideActivation)
        );
    }

    #[test]
    fn clicking_padding_or_gap_does_nothing() {
        let mut picker = DatePicker::new(SelectionMode::Single);
        picker.set_value(DateValue::Single(d(2025, 0, 15)));
        picker.open();
        rendered(&mut picker);
        let layout = popover(&picker);
        // Jan 2025 starts on Wednesday; the first cell is padding.
        assert_eq!(
            picker.handle_event(InputEvent::Mouse(MouseEvent::click(layout.grid_x, layout.grid_y))),
            DatePickerAction::None
        );
        let (x, y) = center_of(&layout, d(2025, 0, 15));
        assert_eq!(
            picker.handle_event(InputEvent::Mouse(MouseEvent::click(x + 2, y))),
            DatePickerAction::None
        );
        assert!(picker.is_open());
    }

    #[test]
    fn header_arrows_step_months() {
        let mut picker = DatePicker::new(SelectionMode::Single);
        picker.set_value(DateValue::Single(d(2025, 0, 15)));
        picker.open();
        rendered(&mut picker);
        let layout = popover(&picker);
        picker.handle_event(InputEvent::Mouse(MouseEvent::click(layout.prev.x, layout.prev.y)));
        assert_eq!(picker.engine().view(), Some(ViewState::new(2024, 11)));
        picker.handle_event(InputEvent::Mouse(MouseEvent::click(layout.next.x, layout.next.y)));
        picker.handle_event(InputEvent::Mouse(MouseEvent::click(layout.next.x, layout.next.y)));
        assert_eq!(picker.engine().view(), Some(ViewState::new(2025, 1)));
    }

    #[test]
    fn hits_use_the_month_that_was_drawn() {
        let mut picker = DatePicker::new(SelectionMode::Single);
        picker.set_value(DateValue::Single(d(2025, 0, 15)));
        picker.open();
        rendered(&mut picker);
        let layout = popover(&picker);
        picker.engine.next_month();
        let (x, y) = center_of(&layout, d(2025, 0, 10));
        assert_eq!(
            picker.handle_event(InputEvent::Mouse(MouseEvent::click(x, y))),
            DatePickerAction::Changed(DateValue::Single(d(2025, 0, 10)))
        );
    }

    #[test]
    fn disabled_cells_ignore_clicks() {
        let mut picker = DatePicker::new(SelectionMode::Range);
        picker.set_disabled_dates(Some(Rc::new(|date: CalendarDate| date.day() == 13)));
        picker.set_value(DateValue::Single(d(2025, 0, 10)));
        picker.open();
        rendered(&mut picker);
        let layout = popover(&picker);
        let (x, y) = center_of(&layout, d(2025, 0, 13));
        assert_eq!(
            picker.handle_event(InputEvent::Mouse(MouseEvent::click(x, y))),
            DatePickerAction::None
        );
        assert_eq!(
            picker.value(),
            DateValue::Range {
                start: d(2025, 0, 10),
                end: None
            }
        );
    }

    #[test]
    fn scroll_over_popover_changes_month() {
        let mut picker = DatePicker::new(SelectionMode::Single);
        picker.set_value(DateValue::Single(d(2025, 5, 1)));
        picker.open();
        rendered(&mut picker);
        let layout = popover(&picker);
        let scroll = MouseEvent {
            kind: MouseEventKind::ScrollDown,
            ..MouseEvent::click(layout.grid_x, layout.grid_y)
        };
        assert_eq!(
            picker.handle_event(InputEvent::Mouse(scroll)),
            DatePickerAction::Redraw
        );
        assert_eq!(picker.engine().view(), Some(ViewState::new(2025, 6)));
    }

    #[test]
    fn disabled_picker_ignores_trigger() {
        let mut picker = DatePicker::new(SelectionMode::Single);
        picker.set_disabled(true);
        rendered(&mut picker);
        assert_eq!(
            picker.handle_event(InputEvent::Mouse(MouseEvent::click(3, 1))),
            DatePickerAction::None
        );
        assert_eq!(
            picker.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Enter))),
            DatePickerAction::None
        );
        assert!(!picker.is_open());
    }

    #[test]
    fn mode_cannot_change_after_construction() {
        let mut picker = DatePicker::new(SelectionMode::Range);
        picker.set_options(DatePickerOptions::default());
        assert_eq!(picker.mode(), SelectionMode::Range);
        assert_eq!(picker.options().mode, SelectionMode::Range);
    }

    fn click_at(picker: &mut DatePicker, rect: Rect) -> DatePickerAction {
        picker.handle_event(InputEvent::Mouse(MouseEvent::click(rect.x, rect.y)))
    }

    fn choice_rect(layout: &PopoverLayout, choice: Choice) -> Rect {
        layout
            .choices
            .iter()
            .find(|(_, c)| *c == choice)
            .map(|(rect, _)| *rect)
            .expect("choice drawn")
    }

    #[test]
    fn title_opens_month_chooser_and_a_month_returns_to_days() {
        let mut picker = DatePicker::new(SelectionMode::Single);
        picker.set_value(DateValue::Single(d(2025, 0, 15)));
        picker.open();
        rendered(&mut picker);
        let layout = popover(&picker);
        assert_eq!(click_at(&mut picker, layout.title), DatePickerAction::Redraw);

        let buf = rendered(&mut picker);
        let layout = popover(&picker);
        assert_eq!(layout.panel, Panel::Months);
        assert_eq!(layout.choices.len(), 12);
        let jan = choice_rect(&layout, Choice::Month(0));
        assert_eq!(buf[(jan.x, jan.y)].symbol(), "J");
        assert!(buf[(jan.x, jan.y)].modifier.contains(Modifier::BOLD));

        // Arrows step years while months are shown.
        click_at(&mut picker, layout.next);
        assert_eq!(picker.engine().view(), Some(ViewState::new(2026, 0)));

        assert_eq!(
            click_at(&mut picker, choice_rect(&layout, Choice::Month(8))),
            DatePickerAction::Redraw
        );
        assert_eq!(picker.engine().view(), Some(ViewState::new(2026, 8)));
        rendered(&mut picker);
        assert_eq!(popover(&picker).panel, Panel::Days);
        assert_eq!(picker.value(), DateValue::Single(d(2025, 0, 15)));
    }

    #[test]
    fn year_chooser_offers_pages_of_the_year_domain() {
        let mut picker = DatePicker::new(SelectionMode::Single);
        picker.set_value(DateValue::Single(d(2025, 4, 1)));
        picker.open();
        rendered(&mut picker);
        { let rect = popover(&picker).title; click_at(&mut picker, rect) };
        rendered(&mut picker);
        { let rect = popover(&picker).title; click_at(&mut picker, rect) };
        rendered(&mut picker);

        let domain = picker.year_domain().clone();
        let start = domain.page_start(2025, YEAR_PAGE);
        let layout = popover(&picker);
        assert_eq!(layout.panel, Panel::Years { page_start: start });
        let offered: Vec<Choice> = layout.choices.iter().map(|(_, c)| *c).collect();
        let expected: Vec<Choice> = domain.page(start, YEAR_PAGE).map(Choice::Year).collect();
        assert_eq!(offered, expected);

        let target = domain.page(start, YEAR_PAGE).find(|y| *y != 2025).expect("another year");
        assert_eq!(
            click_at(&mut picker, choice_rect(&layout, Choice::Year(target))),
            DatePickerAction::Redraw
        );
        assert_eq!(picker.engine().view(), Some(ViewState::new(target, 4)));
        rendered(&mut picker);
        assert_eq!(popover(&picker).panel, Panel::Months);
    }

    #[test]
    fn year_pages_stop_at_the_domain_edges() {
        let mut picker = DatePicker::new(SelectionMode::Single);
        picker.open();
        rendered(&mut picker);
        { let rect = popover(&picker).title; click_at(&mut picker, rect) };
        rendered(&mut picker);
        { let rect = popover(&picker).title; click_at(&mut picker, rect) };

        let domain = picker.year_domain().clone();
        let last = domain.page_start(*domain.years().end(), YEAR_PAGE);
        while matches!(picker.panel, Panel::Years { page_start } if page_start != last) {
            rendered(&mut picker);
            assert_eq!({ let rect = popover(&picker).next; click_at(&mut picker, rect) }, DatePickerAction::Redraw);
        }
        rendered(&mut picker);
        assert_eq!({ let rect = popover(&picker).next; click_at(&mut picker, rect) }, DatePickerAction::None);
        let layout = popover(&picker);
        assert!(layout.choices.iter().all(|(_, c)| match c {
            Choice::Year(y) => domain.contains(*y),
            Choice::Month(_) => false,
        }));

        let first = *domain.years().start();
        picker.panel = Panel::Years { page_start: first };
        rendered(&mut picker);
        assert_eq!({ let rect = popover(&picker).prev; click_at(&mut picker, rect) }, DatePickerAction::None);
    }

    #[test]
    fn closing_or_a_key_resets_the_chooser() {
        let mut picker = DatePicker::new(SelectionMode::Single);
        picker.open();
        rendered(&mut picker);
        { let rect = popover(&picker).title; click_at(&mut picker, rect) };
        assert_eq!(picker.panel, Panel::Months);
        picker.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Left)));
        assert_eq!(picker.panel, Panel::Days);

        rendered(&mut picker);
        { let rect = popover(&picker).title; click_at(&mut picker, rect) };
        picker.close();
        picker.open();
        rendered(&mut picker);
        assert_eq!(popover(&picker).panel, Panel::Days);
    }

    #[test]
    fn popover_opened_before_first_render_closes_on_activation() {
        let mut picker = DatePicker::new(SelectionMode::Single);
        assert_eq!(
            picker.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Enter))),
            DatePickerAction::Opened
        );
        assert_eq!(
            picker.handle_event(InputEvent::Mouse(MouseEvent::click(10, 10))),
            DatePickerAction::Closed(CloseReason::OutsideActivation)
        );
    }

    #[test]
    fn popover_opened_since_last_render_closes_on_outside_activation() {
        let mut picker = DatePicker::new(SelectionMode::Single);
        rendered(&mut picker);
        picker.open();
        assert_eq!(
            picker.handle_event(InputEvent::Mouse(MouseEvent::click(39, 15))),
            DatePickerAction::Closed(CloseReason::OutsideActivation)
        );
        assert!(!picker.is_open());
    }

    #[test]
    fn events_before_first_render_are_ignored() {
        let mut picker = DatePicker::new(SelectionMode::Single);
        assert_eq!(
            picker.handle_event(InputEvent::Mouse(MouseEvent::click(0, 0))),
            DatePickerAction::None
        );
    }
}
