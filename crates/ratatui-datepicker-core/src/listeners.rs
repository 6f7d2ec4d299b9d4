//! Global listener subscriptions held by an open popover.
//!
//! An open calendar has to see activations and key presses that happen anywhere, not only over
//! its own cells, so it can close on an outside click or `Esc`. The host event loop owns a
//! [`ListenerRegistry`] and routes global events to whoever is subscribed. The popover acquires
//! its subscriptions through a [`ListenerScope`], which releases them on drop. A popover that is
//! closed, or dropped while still open, therefore never leaves a subscription behind.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ListenerKind {
    /// Pointer activations anywhere on screen.
    PointerActivation,
    /// Key presses regardless of focus.
    Key,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

pub trait ListenerRegistry {
    fn subscribe(&self, kind: ListenerKind) -> ListenerId;
    fn unsubscribe(&self, id: ListenerId);
    /// Whether `id` is still subscribed. Global events are only delivered to active ids.
    fn is_active(&self, id: ListenerId) -> bool;
}

#[derive(Debug, Default)]
struct RegistryInner {
    next_id: u64,
    active: BTreeMap<ListenerId, ListenerKind>,
    acquired: u64,
    released: u64,
}

/// A single-threaded registry shared between the host loop and the widgets it drives.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct SharedListenerRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl fmt::Debug for SharedListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("SharedListenerRegistry")
            .field("active", &inner.active.len())
            .field("acquired", &inner.acquired)
            .field("released", &inner.released)
            .finish()
    }
}

impl SharedListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_listening(&self, kind: ListenerKind) -> bool {
        self.inner.borrow().active.values().any(|k| *k == kind)
    }

    pub fn active_count(&self) -> usize {
        self.inner.borrow().active.len()
    }

    /// Total subscriptions ever handed out.
    pub fn acquired_total(&self) -> u64 {
        self.inner.borrow().acquired
    }

    /// Total subscriptions ever returned.
    pub fn released_total(&self) -> u64 {
        self.inner.borrow().released
    }
}

impl ListenerRegistry for SharedListenerRegistry {
    fn subscribe(&self, kind: ListenerKind) -> ListenerId {
        let mut inner = self.inner.borrow_mut();
        let id = ListenerId(inner.next_id);
        inner.next_id += 1;
        inner.active.insert(id, kind);
        inner.acquired += 1;
        id
    }

    fn unsubscribe(&self, id: ListenerId) {
        let mut inner = self.inner.borrow_mut();
        if inner.active.remove(&id).is_some() {
            inner.released += 1;
        } else {
            tracing::debug!(?id, "unsubscribe for unknown listener");
        }
    }

    fn is_active(&self, id: ListenerId) -> bool {
        self.inner.borrow().active.contains_key(&id)
    }
}

/// The pointer + key subscription pair of one open popover.
///
/// Acquired in [`ListenerScope::acquire`], released exactly once in `Drop`.
pub struct ListenerScope {
    registry: Rc<dyn ListenerRegistry>,
    pointer: ListenerId,
    key: ListenerId,
}

impl fmt::Debug for ListenerScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerScope")
            .field("pointer", &self.pointer)
            .field("key", &self.key)
            .finish()
    }
}

impl ListenerScope {
    pub fn acquire(registry: Rc<dyn ListenerRegistry>) -> Self {
        let pointer = registry.subscribe(ListenerKind::PointerActivation);
        let key = registry.subscribe(ListenerKind::Key);
        tracing::trace!(?pointer, ?key, "global listeners acquired");
        Self {
            registry,
            pointer,
            key,
        }
    }

    /// Whether this scope still holds an active subscription of `kind`.
    pub fn covers(&self, kind: ListenerKind) -> bool {
        let id = match kind {
            ListenerKind::PointerActivation => self.pointer,
            ListenerKind::Key => self.key,
        };
        self.registry.is_active(id)
    }
}

impl Drop for ListenerScope {
    fn drop(&mut self) {
        self.registry.unsubscribe(self.pointer);
        self.registry.unsubscribe(self.key);
        tracing::trace!(pointer = ?self.pointer, key = ?self.key, "global listeners released");
    }
}
