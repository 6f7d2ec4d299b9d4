pub mod theme;

pub mod help;
pub mod picker;

pub use ratatui_datepicker_core::date;
pub use ratatui_datepicker_core::engine;
pub use ratatui_datepicker_core::error;
pub use ratatui_datepicker_core::format;
pub use ratatui_datepicker_core::grid;
pub use ratatui_datepicker_core::input;
pub use ratatui_datepicker_core::keymap;
pub use ratatui_datepicker_core::listeners;
pub use ratatui_datepicker_core::navigation;
pub use ratatui_datepicker_core::popover;
pub use ratatui_datepicker_core::selection;
pub use ratatui_datepicker_core::view;

#[cfg(feature = "crossterm")]
pub use ratatui_datepicker_core::crossterm_input;

pub use picker::DatePicker;
pub use picker::DatePickerOptions;
