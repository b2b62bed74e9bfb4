//! Completion cells: reactive views of work that finishes exactly once.
//!
//! A completion cell starts pending and flips, once, to done carrying an
//! `Ok`/`Err` outcome. It is assembled entirely from the ordinary
//! signal/computed primitives: resolution is a plain write, so listeners and
//! derived cells observe it through the usual synchronous propagation
//! regardless of which suspended context pushed the value in. The crate has
//! no async runtime of its own; whoever completes the work calls the
//! resolver.

use super::computed::Computed;
use super::core::{signal, Signal};

/// State of a one-shot operation observed through a completion cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion<T, E> {
    /// The operation has not finished yet.
    Pending,
    /// The operation finished with the given outcome.
    Done(Result<T, E>),
}

impl<T, E> Completion<T, E> {
    /// Whether the operation has finished.
    pub fn is_done(&self) -> bool {
        matches!(self, Completion::Done(_))
    }

    /// Whether the operation is still outstanding.
    pub fn is_pending(&self) -> bool {
        matches!(self, Completion::Pending)
    }

    /// The outcome, if the operation has finished.
    pub fn result(&self) -> Option<&Result<T, E>> {
        match self {
            Completion::Done(result) => Some(result),
            Completion::Pending => None,
        }
    }
}

/// Create a completion cell plus its one-shot resolver.
///
/// The read half is an ordinary [`Computed`]: it can be listened to, chained
/// with further `computed` mappers, or bound into the tree like any other
/// derived cell. The write half is consumed by resolution, so a completion
/// can never flip twice.
pub fn completion_signal<T, E>() -> (Computed<Completion<T, E>>, CompletionResolver<T, E>)
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    let state = signal(Completion::Pending);
    let cell = state.computed(|completion: &Completion<T, E>| completion.clone());
    (cell, CompletionResolver { state })
}

/// Write half of a completion cell.
///
/// Resolution moves the resolver, which is what makes the cell one-shot:
/// after `resolve` (or `fulfill`/`reject`) there is no handle left to write
/// through. Dropping an unresolved resolver leaves the cell pending forever.
pub struct CompletionResolver<T, E> {
    state: Signal<Completion<T, E>>,
}

impl<T: Clone + 'static, E: Clone + 'static> CompletionResolver<T, E> {
    /// Flip the cell to done with `outcome`.
    pub fn resolve(self, outcome: Result<T, E>) {
        self.state.set(Completion::Done(outcome));
    }

    /// Shorthand for `resolve(Ok(value))`.
    pub fn fulfill(self, value: T) {
        self.resolve(Ok(value));
    }

    /// Shorthand for `resolve(Err(error))`.
    pub fn reject(self, error: E) {
        self.resolve(Err(error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::ListenOptions;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_completion_starts_pending() {
        let (cell, _resolver) = completion_signal::<i32, String>();
        assert!(cell.get().is_pending());
        assert_eq!(cell.get().result(), None);
    }

    #[test]
    fn test_fulfill_flips_to_done_with_the_value() {
        let (cell, resolver) = completion_signal::<i32, String>();
        resolver.fulfill(42);

        let state = cell.get();
        assert!(state.is_done());
        assert_eq!(state.result(), Some(&Ok(42)));
    }

    #[test]
    fn test_reject_carries_the_error() {
        let (cell, resolver) = completion_signal::<i32, String>();
        resolver.reject(String::from("boom"));

        assert_eq!(
            cell.get().result(),
            Some(&Err(String::from("boom"))),
            "the error outcome must be observable through the cell"
        );
    }

    #[test]
    fn test_listeners_observe_the_single_flip() {
        let (cell, resolver) = completion_signal::<i32, String>();
        let seen: Rc<RefCell<Vec<(bool, bool)>>> = Rc::new(RefCell::new(Vec::new()));

        let seen_clone = seen.clone();
        cell.listen(
            move |change| {
                seen_clone
                    .borrow_mut()
                    .push((change.prev.is_pending(), change.cur.is_done()));
            },
            ListenOptions::default(),
        );

        resolver.resolve(Ok(7));
        assert_eq!(
            *seen.borrow(),
            vec![(true, true)],
            "exactly one notification, pending to done"
        );
    }

    #[test]
    fn test_derived_views_track_resolution() {
        let (cell, resolver) = completion_signal::<i32, String>();
        let label = cell.computed(|completion| match completion.result() {
            None => String::from("loading"),
            Some(Ok(value)) => format!("got {value}"),
            Some(Err(error)) => format!("failed: {error}"),
        });

        assert_eq!(label.get(), "loading");
        resolver.fulfill(9);
        assert_eq!(label.get(), "got 9");
    }

    #[test]
    fn test_dropped_resolver_leaves_the_cell_pending() {
        let (cell, resolver) = completion_signal::<i32, String>();
        drop(resolver);
        assert!(cell.get().is_pending(), "no resolver, no flip");
    }
}
