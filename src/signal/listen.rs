//! Listener registration types: change payloads, one-shot delivery, and
//! token-based cancellation.

use std::cell::Cell;
use std::rc::Rc;

/// Change notification delivered to listeners on every accepted write.
///
/// `prev` is a snapshot taken before the updater ran, so a listener sees a
/// true "before" value even when the new value was produced from the old one.
#[derive(Debug, Clone, PartialEq)]
pub struct Change<T> {
    /// Value before the write.
    pub prev: T,
    /// Value after the write.
    pub cur: T,
}

/// Options accepted by [`Signal::listen`](crate::signal::Signal::listen).
#[derive(Default, Clone)]
pub struct ListenOptions {
    /// Auto-unregister the listener after its first delivery.
    pub once: bool,
    /// Remove the listener as soon as this token is cancelled. The check runs
    /// immediately before each delivery, so a token cancelled mid-dispatch by
    /// an earlier listener suppresses every later delivery.
    pub cancel: Option<CancelToken>,
}

impl ListenOptions {
    /// Deliver exactly one notification, then unregister.
    pub fn once() -> Self {
        Self {
            once: true,
            cancel: None,
        }
    }

    /// Deliver notifications until `token` is cancelled.
    pub fn until(token: &CancelToken) -> Self {
        Self {
            once: false,
            cancel: Some(token.clone()),
        }
    }
}

/// Shared cancellation flag tied to some surrounding lifetime.
///
/// Cloned tokens observe the same flag. Cancellation is immediate: a listener
/// registered with a cancelled token never fires again, including later in the
/// dispatch that triggered the cancellation.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancelToken {
    /// Create a fresh, un-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trip the token. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    /// Whether the token has been tripped.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}
