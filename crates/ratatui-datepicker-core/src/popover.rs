//! Open/close lifecycle of the calendar surface.
//!
//! Focus and view only exist while the popover is open: they live in the [`OpenSession`] and are
//! discarded on close. The session also owns the [`ListenerScope`], so the global listeners are
//! held for exactly as long as the popover is open.

use std::fmt;
use std::rc::Rc;

use crate::date::CalendarDate;
use crate::listeners::ListenerKind;
use crate::listeners::ListenerRegistry;
use crate::listeners::ListenerScope;
use crate::view::ViewState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloseReason {
    /// A single date or a full range was committed.
    Committed,
    /// An activation landed outside the popover.
    OutsideActivation,
    /// The dismiss key (`Esc` by default) was pressed.
    Escape,
    /// Closed by the owner (API call, widget disabled, trigger toggled).
    Dismissed,
}

#[derive(Debug)]
pub struct OpenSession {
    pub focus: CalendarDate,
    pub view: ViewState,
    listeners: ListenerScope,
}

impl OpenSession {
    fn seeded(anchor: CalendarDate, listeners: ListenerScope) -> Self {
        Self {
            focus: anchor,
            view: ViewState::of(anchor),
            listeners,
        }
    }

    /// Whether global events of `kind` are still routed to this session.
    pub fn listens_for(&self, kind: ListenerKind) -> bool {
        self.listeners.covers(kind)
    }

    /// Moves focus and view onto `anchor`.
    pub fn reseed(&mut self, anchor: CalendarDate) {
        self.focus = anchor;
        self.view = ViewState::of(anchor);
    }
}

#[derive(Debug, Default)]
pub enum PopoverState {
    #[default]
    Closed,
    Open(OpenSession),
}

pub struct PopoverController {
    state: PopoverState,
    registry: Rc<dyn ListenerRegistry>,
}

impl fmt::Debug for PopoverController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PopoverController")
            .field("state", &self.state)
            .finish()
    }
}

impl PopoverController {
    pub fn new(registry: Rc<dyn ListenerRegistry>) -> Self {
        Self {
            state: PopoverState::Closed,
            registry,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, PopoverState::Open(_))
    }

    /// `false` when closed, otherwise whether the open session holds a `kind` subscription.
    pub fn listens_for(&self, kind: ListenerKind) -> bool {
        self.session().is_some_and(|s| s.listens_for(kind))
    }

    pub fn state(&self) -> &PopoverState {
        &self.state
    }

    pub fn session(&self) -> Option<&OpenSession> {
        match &self.state {
            PopoverState::Open(session) => Some(session),
            PopoverState::Closed => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut OpenSession> {
        match &mut self.state {
            PopoverState::Open(session) => Some(session),
            PopoverState::Closed => None,
        }
    }

    /// `Closed -> Open`, seeding focus and view from `anchor`, or today when there is none.
    ///
    /// Returns `false` if the popover was already open.
    pub fn open(&mut self, anchor: Option<CalendarDate>) -> bool {
        self.open_with_fallback(anchor, CalendarDate::today())
    }

    pub(crate) fn open_with_fallback(
        &mut self,
        anchor: Option<CalendarDate>,
        today: CalendarDate,
    ) -> bool {
        if self.is_open() {
            return false;
        }
        let seed = anchor.unwrap_or(today);
        let listeners = ListenerScope::acquire(Rc::clone(&self.registry));
        self.state = PopoverState::Open(OpenSession::seeded(seed, listeners));
        tracing::debug!(focus = %seed, seeded_from_value = anchor.is_some(), "popover opened");
        true
    }

    /// `Open -> Closed`. Dropping the session releases the global listeners.
    ///
    /// Returns `false` if the popover was already closed.
    pub fn close(&mut self, reason: CloseReason) -> bool {
        match std::mem::take(&mut self.state) {
            PopoverState::Open(session) => {
                drop(session);
                tracing::debug!(?reason, "popover closed");
                true
            }
            PopoverState::Closed => false,
        }
    }

    /// Re-seeds focus/view after the externally owned value changed while open.
    pub fn sync_value(&mut self, anchor: Option<CalendarDate>) {
        if let Some(session) = self.session_mut() {
            let seed = anchor.unwrap_or_else(CalendarDate::today);
            session.reseed(seed);
            tracing::trace!(focus = %seed, "popover re-seeded from value");
        }
    }
}
