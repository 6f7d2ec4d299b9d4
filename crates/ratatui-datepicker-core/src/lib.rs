//! `ratatui-datepicker-core` is the headless engine behind `ratatui-datepicker`.
//!
//! Nothing in this crate draws. It models a Gregorian, Sunday-first calendar with naive local
//! dates, and the state machines a date picker needs on top of it. Rendering crates feed it
//! input and read its state back.
//!
//! ## Design goals
//!
//! - Event-loop agnostic: you drive input + rendering from your app.
//! - No async runtime: every transition completes inside the call that triggered it.
//! - Values, not references: [`date::CalendarDate`] is `Copy` and all arithmetic returns new
//!   values, so focus and view can never alias one another.
//!
//! ## Getting started
//!
//! Most users should depend on the facade crate `ratatui-datepicker`. Use this crate directly if
//! you render the calendar yourself.
//!
//! Useful entry points:
//! - [`engine::DatePickerEngine`]: the complete picker state machine.
//! - [`grid::generate_grid`]: Sunday-first month cells.
//! - [`selection::DateSelection`]: single and two-phase range selection.
//! - [`navigation::KeyboardNavigator`]: arrow-key focus movement across months.
//! - [`popover::PopoverController`]: open/close lifecycle with scoped global listeners.
//!
//! ## Lifecycle
//!
//! While open, the picker holds one pointer and one key subscription in a
//! [`listeners::ListenerRegistry`]. Your event loop can ask a
//! [`listeners::SharedListenerRegistry`] whether anyone wants global events before routing
//! clicks outside a widget's area to it.
pub mod error;

pub mod date;
pub mod format;
pub mod grid;

#[cfg(feature = "crossterm")]
pub mod crossterm_input;

pub mod input;
pub mod keymap;

pub mod engine;
pub mod listeners;
pub mod navigation;
pub mod popover;
pub mod selection;
pub mod view;
