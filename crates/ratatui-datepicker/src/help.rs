use crate::keymap::Binding;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use unicode_width::UnicodeWidthStr;

#[derive(Clone, Debug)]
pub struct HelpBarOptions {
    pub style: Style,
    pub key_style: Style,
    pub separator: String,
    pub space: String,
}

impl Default for HelpBarOptions {
    fn default() -> Self {
        Self {
            style: Style::default(),
            key_style: Style::default(),
            separator: " · ".to_string(),
            space: " ".to_string(),
        }
    }
}

/// One-line key help, e.g. `←↓↑→ move · ⏎ pick · esc close`.
#[derive(Clone, Debug, Default)]
pub struct HelpBar {
    bindings: Vec<Binding>,
    options: HelpBarOptions,
}

impl HelpBar {
    pub fn new(bindings: Vec<Binding>) -> Self {
        Self {
            bindings,
            options: HelpBarOptions::default(),
        }
    }

    pub fn with_options(bindings: Vec<Binding>, options: HelpBarOptions) -> Self {
        Self { bindings, options }
    }

    pub fn set_bindings(&mut self, bindings: Vec<Binding>) {
        self.bindings = bindings;
    }

    pub fn set_options(&mut self, options: HelpBarOptions) {
        self.options = options;
    }

    /// Display width of the full line, in terminal columns.
    pub fn width(&self) -> usize {
        self.to_spans()
            .iter()
            .map(|s| UnicodeWidthStr::width(s.content.as_ref()))
            .sum()
    }

    /// Renders as many whole bindings as fit in `area.width`. The first binding is always drawn,
    /// clipped if it has to be.
    pub fn render_ref(&self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        buf.set_style(area, self.options.style);
        let line = Line::from(self.spans_within(usize::from(area.width)));
        buf.set_line(area.x, area.y, &line, area.width);
    }

    fn spans_within(&self, max_width: usize) -> Vec<Span<'static>> {
        let mut spans: Vec<Span<'static>> = Vec::new();
        let mut used = 0;
        for (i, b) in self.bindings.iter().enumerate() {
            let mut group = Vec::with_capacity(4);
            if i > 0 {
                group.push(Span::styled(
                    self.options.separator.clone(),
                    self.options.style,
                ));
            }
            group.push(Span::styled(b.help_key.clone(), self.options.key_style));
            group.push(Span::styled(self.options.space.clone(), self.options.style));
            group.push(Span::styled(b.help_desc.clone(), self.options.style));

            let w: usize = group
                .iter()
                .map(|s| UnicodeWidthStr::width(s.content.as_ref()))
                .sum();
            if i > 0 && used + w > max_width {
                break;
            }
            used += w;
            spans.extend(group);
        }
        spans
    }

    fn to_spans(&self) -> Vec<Span<'static>> {
        self.spans_within(usize::MAX)
    }
}
