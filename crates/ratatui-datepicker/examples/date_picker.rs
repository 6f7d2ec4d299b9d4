use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableMouseCapture;
use crossterm::event::Event;
use crossterm::event::KeyCode;
use crossterm::event::KeyEventKind;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Constraint;
use ratatui::layout::Direction;
use ratatui::layout::Layout;
use ratatui::layout::Rect;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Widget;
use ratatui_datepicker::DatePicker;
use ratatui_datepicker::DatePickerOptions;
use ratatui_datepicker::crossterm_input::input_event_from_crossterm;
use ratatui_datepicker::date::CalendarDate;
use ratatui_datepicker::engine::DatePickerAction;
use ratatui_datepicker::help::HelpBar;
use ratatui_datepicker::help::HelpBarOptions;
use ratatui_datepicker::input::InputEvent;
use ratatui_datepicker::listeners::ListenerKind;
use ratatui_datepicker::listeners::SharedListenerRegistry;
use ratatui_datepicker::navigation::NavBindings;
use ratatui_datepicker::selection::SelectionMode;
use ratatui_datepicker::theme::Theme;
use std::io;
use std::rc::Rc;
use std::time::Duration;

struct App {
    pickers: [DatePicker; 2],
    focused: usize,
    registry: SharedListenerRegistry,
    last: String,
}

fn main() -> io::Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let theme = Theme::default();
    let registry = SharedListenerRegistry::new();
    let single =
        DatePicker::with_registry(DatePickerOptions::default(), Rc::new(registry.clone()));
    let mut range = DatePicker::with_registry(
        DatePickerOptions {
            mode: SelectionMode::Range,
            ..Default::default()
        },
        Rc::new(registry.clone()),
    );
    // Weekends are not bookable.
    range.set_disabled_dates(Some(Rc::new(|d: CalendarDate| {
        matches!(d.weekday_index(), 0 | 6)
    })));

    let mut app = App {
        pickers: [single, range],
        focused: 0,
        registry,
        last: String::from("-"),
    };
    app.pickers[0].set_focused(true);

    let res = run(&mut terminal, &theme, &mut app);

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    res
}

fn run<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    theme: &Theme,
    app: &mut App,
) -> io::Result<()> {
    let footer = HelpBar::with_options(
        NavBindings::default().help(),
        HelpBarOptions {
            style: theme.text_muted,
            key_style: theme.accent,
            ..Default::default()
        },
    );

    loop {
        terminal.draw(|f| {
            let area = f.area();
            let [main, status, help] = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Min(1),
                    Constraint::Length(1),
                    Constraint::Length(1),
                ])
                .areas(area);

            let block = Block::default()
                .title("Date picker (Tab switch, Enter open, Esc close, q quit)")
                .borders(Borders::ALL);
            let inner = block.inner(main);
            let buf = f.buffer_mut();
            block.render(main, buf);

            let [left, right] = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(inner);

            let labels = ["Due date", "Trip"];
            let columns = [left, right];
            // Draw the unfocused picker first so the focused popover ends up on top.
            let order = if app.focused == 0 { [1, 0] } else { [0, 1] };
            for i in order {
                let col = columns[i];
                if col.height < 2 {
                    continue;
                }
                let width = col.width.saturating_sub(2);
                buf.set_stringn(col.x + 1, col.y, labels[i], width as usize, theme.text_muted);
                let field = Rect::new(col.x + 1, col.y + 1, width.min(26), 1);
                app.pickers[i].render(field, buf, theme);
            }

            let status_line = format!(
                "due={}  trip={}  listeners={}  last={}",
                app.pickers[0].display_text(),
                app.pickers[1].display_text(),
                app.registry.active_count(),
                app.last,
            );
            buf.set_span(
                status.x,
                status.y,
                &Span::styled(status_line, theme.text_primary),
                status.width,
            );
            footer.render_ref(help, buf);
        })?;

        if !crossterm::event::poll(Duration::from_millis(50))? {
            continue;
        }
        let ev = crossterm::event::read()?;
        if let Event::Key(key) = &ev {
            if key.kind == KeyEventKind::Press {
                let open = app.registry.is_listening(ListenerKind::Key);
                match key.code {
                    KeyCode::Char('q') if !open => return Ok(()),
                    KeyCode::Tab if !open => {
                        app.pickers[app.focused].set_focused(false);
                        app.focused = (app.focused + 1) % app.pickers.len();
                        app.pickers[app.focused].set_focused(true);
                        continue;
                    }
                    _ => {}
                }
            }
        }

        let Some(ev) = input_event_from_crossterm(ev) else {
            continue;
        };
        match ev {
            InputEvent::Key(_) => {
                // A popover holding a key subscription gets keys ahead of the focused trigger.
                let target = (0..app.pickers.len())
                    .find(|&i| app.pickers[i].listens_for(ListenerKind::Key))
                    .unwrap_or(app.focused);
                let action = app.pickers[target].handle_event(ev);
                record(app, action);
            }
            InputEvent::Mouse(_) => {
                // While some popover listens for pointer activations, only listeners see clicks.
                let grabbed = app.registry.is_listening(ListenerKind::PointerActivation);
                for i in 0..app.pickers.len() {
                    if grabbed && !app.pickers[i].listens_for(ListenerKind::PointerActivation) {
                        continue;
                    }
                    let action = app.pickers[i].handle_event(ev.clone());
                    if matches!(action, DatePickerAction::Opened) {
                        app.pickers[app.focused].set_focused(false);
                        app.focused = i;
                        app.pickers[i].set_focused(true);
                    }
                    record(app, action);
                }
            }
        }
    }
}

fn record(app: &mut App, action: DatePickerAction) {
    match action {
        DatePickerAction::Changed(value) => app.last = format!("changed {value:?}"),
        DatePickerAction::Closed(reason) => app.last = format!("closed ({reason:?})"),
        DatePickerAction::Opened => app.last = String::from("opened"),
        DatePickerAction::Redraw | DatePickerAction::None => {}
    }
}
