//! Derived, read-only cells.

use super::core::Signal;
use super::listen::{Change, ListenOptions};

/// A read-only cell derived from a parent signal via a pure mapping function.
///
/// Created by [`Signal::computed`]. The wrapper exposes no write operation:
/// a computed value can only change through its parent's propagation, and the
/// type system enforces that rather than a runtime flag.
pub struct Computed<T> {
    inner: Signal<T>,
}

impl<T> Clone for Computed<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + 'static> Computed<T> {
    pub(crate) fn from_signal(inner: Signal<T>) -> Self {
        debug_assert!(inner.is_computed());
        Self { inner }
    }

    /// Clone of the current derived value.
    pub fn get(&self) -> T {
        self.inner.get()
    }

    /// Read the current derived value without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.inner.with(f)
    }

    /// Always true.
    pub fn is_computed(&self) -> bool {
        self.inner.is_computed()
    }

    /// Register a change listener; fires whenever the parent chain pushes a
    /// new value through this cell.
    pub fn listen(&self, callback: impl Fn(&Change<T>) + 'static, options: ListenOptions) {
        self.inner.listen(callback, options);
    }

    /// Chain a further derived cell off this one.
    pub fn computed<U: Clone + 'static>(&self, mapper: impl Fn(&T) -> U + 'static) -> Computed<U> {
        self.inner.computed(mapper)
    }
}

impl<T: std::fmt::Debug + Clone + 'static> std::fmt::Debug for Computed<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Computed").field(&self.get()).finish()
    }
}
