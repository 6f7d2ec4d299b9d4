use ratatui::style::Modifier;
use ratatui::style::Style;

/// Styles shared by the trigger field and the calendar popover.
///
/// Day cell styles are layered in this order, later ones patching earlier ones:
/// `today`, `in_range`, `selected`, `disabled`, `focused`.
#[derive(Clone, Debug)]
pub struct Theme {
    pub text_primary: Style,
    pub text_muted: Style,
    pub accent: Style,
    pub border: Style,
    pub today: Style,
    pub in_range: Style,
    pub selected: Style,
    pub disabled: Style,
    pub focused: Style,
}

impl Default for Theme {
    fn default() -> Self {
        use ratatui::style::Stylize;

        Self {
            text_primary: Style::default(),
            text_muted: Style::default().dark_gray(),
            accent: Style::default().cyan(),
            border: Style::default().dark_gray(),
            today: Style::default().add_modifier(Modifier::UNDERLINED),
            in_range: Style::default().cyan(),
            selected: Style::default().black().on_cyan().add_modifier(Modifier::BOLD),
            disabled: Style::default()
                .dark_gray()
                .add_modifier(Modifier::CROSSED_OUT),
            focused: Style::default().add_modifier(Modifier::REVERSED),
        }
    }
}
