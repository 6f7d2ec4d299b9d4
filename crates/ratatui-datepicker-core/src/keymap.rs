//! Key patterns and the help text attached to them.
//!
//! A pattern matches an event when the codes are equal and `ctrl`/`alt` agree. `shift` must also
//! agree for non-character keys (`Shift+PageUp` is a different binding than `PageUp`), but is
//! ignored for [`KeyCode::Char`]: terminals disagree on whether shifted characters carry it, and
//! the character itself already encodes the case.

use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::input::KeyModifiers;

/// Keys that trigger one picker action, plus how a help footer names them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub keys: Vec<KeyEvent>,
    pub help_key: String,
    pub help_desc: String,
}

impl Binding {
    pub fn new(
        help_key: impl Into<String>,
        help_desc: impl Into<String>,
        keys: Vec<KeyEvent>,
    ) -> Self {
        Self {
            keys,
            help_key: help_key.into(),
            help_desc: help_desc.into(),
        }
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        any_matches(&self.keys, event)
    }
}

pub fn pattern_matches(pattern: &KeyEvent, event: &KeyEvent) -> bool {
    if pattern.code != event.code {
        return false;
    }
    let (p, e) = (pattern.modifiers, event.modifiers);
    let shift_ok = matches!(pattern.code, KeyCode::Char(_)) || p.shift == e.shift;
    shift_ok && p.ctrl == e.ctrl && p.alt == e.alt
}

pub fn any_matches(patterns: &[KeyEvent], event: &KeyEvent) -> bool {
    patterns.iter().any(|p| pattern_matches(p, event))
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code)
}

pub fn key_char(c: char) -> KeyEvent {
    key(KeyCode::Char(c))
}

pub fn key_shift(code: KeyCode) -> KeyEvent {
    key(code).with_modifiers(KeyModifiers::shift())
}

pub fn key_ctrl(c: char) -> KeyEvent {
    key_char(c).with_modifiers(KeyModifiers {
        ctrl: true,
        ..KeyModifiers::none()
    })
}
