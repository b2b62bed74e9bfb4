//! The mutable reactive cell.
//!
//! A [`Signal`] owns a current value, an ordered list of change listeners, and
//! an ordered list of dependant computed signals. Everything is synchronous
//! and single-threaded: a write notifies listeners and propagates to
//! dependants before it returns, on the caller's stack, with no batching and
//! no deduplication. Two writes mean two full notification rounds.
//!
//! # Write path
//!
//! [`Signal::update`] is the write path. It snapshots the previous value,
//! computes the next one from that snapshot, stores it, dispatches
//! [`Change`] notifications in registration order, and then walks the
//! dependant chain depth-first via the propagation [`Worklist`].
//! [`Signal::set`] is shorthand that funnels through the same dispatch.
//!
//! # Failure
//!
//! A panicking updater or mapper unwinds out of the triggering write. Nothing
//! further down the chain is notified; there is no catch or retry.
//!
//! # Re-entrancy
//!
//! Listeners may freely read signals and write *other* signals; a nested
//! write completes its whole notification round before the outer dispatch
//! continues. A listener must not write the signal whose DOM region is being
//! patched while the patch is in flight (see the binder docs).

use std::cell::RefCell;
use std::rc::Rc;

use super::computed::Computed;
use super::listen::{CancelToken, Change, ListenOptions};
use super::worklist::Worklist;

type ListenerFn<T> = Rc<dyn Fn(&Change<T>)>;

struct ListenerEntry<T> {
    id: u64,
    callback: ListenerFn<T>,
    once: bool,
    cancel: Option<CancelToken>,
}

/// A propagation edge to one dependant computed signal. The closure maps the
/// parent's new value and applies it to the child, queueing the child's own
/// dependants on the shared worklist.
struct Dependant<T> {
    propagate: Rc<dyn Fn(&T, &mut Worklist)>,
}

struct Inner<T> {
    value: T,
    is_computed: bool,
    listeners: Vec<ListenerEntry<T>>,
    dependants: Vec<Dependant<T>>,
    next_listener_id: u64,
}

/// A mutable reactive cell.
///
/// `Signal` is a cheap handle (`Rc` inner); clones share the same cell. It is
/// deliberately not `Send`/`Sync`; the whole runtime is cooperative and
/// single-threaded, driven by whoever calls [`update`](Signal::update).
pub struct Signal<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

/// Create a signal with the given initial value.
///
/// Free-function constructor mirroring [`Signal::new`]. A signal with "no
/// initial value" is spelled `signal::<Option<T>>(None)`.
pub fn signal<T: Clone + 'static>(initial: T) -> Signal<T> {
    Signal::new(initial)
}

impl<T: Clone + 'static> Signal<T> {
    /// Create a signal with the given initial value.
    pub fn new(initial: T) -> Self {
        Self::with_flag(initial, false)
    }

    /// Internal constructor used by `computed` to tag derived cells.
    pub(crate) fn with_flag(initial: T, is_computed: bool) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                value: initial,
                is_computed,
                listeners: Vec::new(),
                dependants: Vec::new(),
                next_listener_id: 0,
            })),
        }
    }

    /// Clone of the current value. No side effects.
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Read the current value without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Whether this cell is derived. Always false for handles created through
    /// [`Signal::new`]; the derived flavour is only reachable as [`Computed`].
    pub fn is_computed(&self) -> bool {
        self.inner.borrow().is_computed
    }

    /// Write through a pure reducer: `next = f(&prev)`.
    ///
    /// The updater receives the pre-write snapshot, so it may read the signal
    /// and will see the old value. After the value is stored, listeners are
    /// notified in registration order and the dependant chain is propagated
    /// depth-first, all before `update` returns.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let mut worklist = Worklist::new();
        self.apply(f, &mut worklist);
        worklist.drain();
    }

    /// Replace the value. Shorthand for `update(move |_| value)`.
    pub fn set(&self, value: T) {
        self.update(move |_| value);
    }

    /// Register a change listener. Listeners fire synchronously on every
    /// write, in registration order, and stay registered until a `once`
    /// delivery or their cancel token removes them.
    pub fn listen(&self, callback: impl Fn(&Change<T>) + 'static, options: ListenOptions) {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_listener_id;
        inner.next_listener_id += 1;
        inner.listeners.push(ListenerEntry {
            id,
            callback: Rc::new(callback),
            once: options.once,
            cancel: options.cancel,
        });
    }

    /// Derive a read-only cell: `child.get() == mapper(&self.get())` at
    /// creation and after every subsequent write to `self`.
    ///
    /// The returned handle is jointly owned by this signal's dependants list
    /// (for propagation) and by the caller (for reads). Derivation always
    /// targets a freshly created cell, so the dependants graph is a forest
    /// and cycles cannot be constructed through this API.
    pub fn computed<U: Clone + 'static>(&self, mapper: impl Fn(&T) -> U + 'static) -> Computed<U> {
        let seed = self.with(|value| mapper(value));
        let derived = Signal::with_flag(seed, true);

        let child = derived.clone();
        let mapper = Rc::new(mapper);
        self.inner.borrow_mut().dependants.push(Dependant {
            propagate: Rc::new(move |cur: &T, worklist: &mut Worklist| {
                let next = mapper(cur);
                child.apply(move |_| next, worklist);
            }),
        });

        Computed::from_signal(derived)
    }

    /// Store a new value and run one notification round, queueing dependant
    /// propagation on `worklist`. Shared by root writes and computed chains.
    pub(crate) fn apply(&self, f: impl FnOnce(&T) -> T, worklist: &mut Worklist) {
        // Snapshot first; the updater runs with no borrow held so it may read
        // this signal (and sees the pre-write value).
        let prev = self.get();
        let next = f(&prev);
        let cur = next.clone();
        self.inner.borrow_mut().value = next;

        self.notify(&prev, &cur);
        self.queue_dependants(&cur, worklist);
    }

    /// Dispatch one `Change` to every listener registered at the start of the
    /// round, honoring `once` and cancellation per listener.
    fn notify(&self, prev: &T, cur: &T) {
        let snapshot: Vec<(u64, ListenerFn<T>, bool, Option<CancelToken>)> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|entry| {
                (
                    entry.id,
                    Rc::clone(&entry.callback),
                    entry.once,
                    entry.cancel.clone(),
                )
            })
            .collect();

        let change = Change {
            prev: prev.clone(),
            cur: cur.clone(),
        };

        for (id, callback, once, cancel) in snapshot {
            if cancel.is_some_and(|token| token.is_cancelled()) {
                self.remove_listener(id);
                continue;
            }
            // A nested write from an earlier callback may already have
            // consumed a one-shot registration.
            if !self.has_listener(id) {
                continue;
            }
            callback(&change);
            if once {
                self.remove_listener(id);
            }
        }
    }

    /// Queue propagation jobs for every dependant, in reverse registration
    /// order so the worklist pops them in registration order.
    fn queue_dependants(&self, cur: &T, worklist: &mut Worklist) {
        let propagators: Vec<Rc<dyn Fn(&T, &mut Worklist)>> = self
            .inner
            .borrow()
            .dependants
            .iter()
            .map(|dep| Rc::clone(&dep.propagate))
            .collect();

        for propagate in propagators.into_iter().rev() {
            let cur = cur.clone();
            worklist.push(move |worklist| propagate(&cur, worklist));
        }
    }

    fn has_listener(&self, id: u64) -> bool {
        self.inner
            .borrow()
            .listeners
            .iter()
            .any(|entry| entry.id == id)
    }

    fn remove_listener(&self, id: u64) {
        self.inner
            .borrow_mut()
            .listeners
            .retain(|entry| entry.id != id);
    }
}

impl<T: std::fmt::Debug + Clone + 'static> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("value", &self.inner.borrow().value)
            .field("is_computed", &self.inner.borrow().is_computed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_update_applies_reducer_to_previous_value() {
        let count = signal(1);
        count.update(|prev| prev + 9);
        assert_eq!(count.get(), 10, "value must equal f(prev) after update");
        count.update(|prev| prev * 2);
        assert_eq!(count.get(), 20);
    }

    #[test]
    fn test_set_is_sugar_over_update() {
        let name = signal(String::from("a"));
        name.set(String::from("b"));
        assert_eq!(name.get(), "b");
    }

    #[test]
    fn test_updater_sees_pre_write_value_through_reads() {
        let count = signal(5);
        let reader = count.clone();
        count.update(move |prev| {
            assert_eq!(reader.get(), 5, "reads inside the updater see the old value");
            prev + 1
        });
        assert_eq!(count.get(), 6);
    }

    #[test]
    fn test_listeners_fire_in_registration_order_with_prev_and_cur() {
        let count = signal(0);
        let order: Rc<RefCell<Vec<(u32, i32, i32)>>> = Rc::new(RefCell::new(Vec::new()));

        for tag in 0..3u32 {
            let order = order.clone();
            count.listen(
                move |change| order.borrow_mut().push((tag, change.prev, change.cur)),
                ListenOptions::default(),
            );
        }

        count.set(7);
        assert_eq!(
            *order.borrow(),
            vec![(0, 0, 7), (1, 0, 7), (2, 0, 7)],
            "notification order must equal registration order"
        );
    }

    #[test]
    fn test_prev_is_a_true_snapshot_for_owned_values() {
        let items = signal(vec![1, 2]);
        let seen: Rc<RefCell<Option<(Vec<i32>, Vec<i32>)>>> = Rc::new(RefCell::new(None));

        let seen_clone = seen.clone();
        items.listen(
            move |change| {
                *seen_clone.borrow_mut() = Some((change.prev.clone(), change.cur.clone()));
            },
            ListenOptions::default(),
        );

        // Produce the new value by mutating a copy of the old one in place.
        items.update(|prev| {
            let mut next = prev.clone();
            next.push(3);
            next
        });

        let (prev, cur) = seen.borrow().clone().expect("listener fired");
        assert_eq!(prev, vec![1, 2]);
        assert_eq!(cur, vec![1, 2, 3]);
    }

    #[test]
    fn test_once_listener_fires_exactly_once() {
        let count = signal(0);
        let hits = Rc::new(RefCell::new(0));

        let hits_clone = hits.clone();
        count.listen(
            move |_| *hits_clone.borrow_mut() += 1,
            ListenOptions::once(),
        );

        count.set(1);
        count.set(2);
        count.set(3);
        assert_eq!(*hits.borrow(), 1, "once listener must fire exactly once");
    }

    #[test]
    fn test_cancelled_listener_never_fires_again() {
        let count = signal(0);
        let token = CancelToken::new();
        let hits = Rc::new(RefCell::new(0));

        let hits_clone = hits.clone();
        count.listen(
            move |_| *hits_clone.borrow_mut() += 1,
            ListenOptions::until(&token),
        );

        count.set(1);
        assert_eq!(*hits.borrow(), 1);

        token.cancel();
        count.set(2);
        assert_eq!(
            *hits.borrow(),
            1,
            "a cancelled registration must be observably inert"
        );
    }

    #[test]
    fn test_cancellation_mid_dispatch_suppresses_later_listener() {
        let count = signal(0);
        let token = CancelToken::new();
        let hits = Rc::new(RefCell::new(0));

        // First listener trips the token; the second was registered with it
        // and must not fire in the same dispatch.
        let trip = token.clone();
        count.listen(move |_| trip.cancel(), ListenOptions::default());

        let hits_clone = hits.clone();
        count.listen(
            move |_| *hits_clone.borrow_mut() += 1,
            ListenOptions::until(&token),
        );

        count.set(1);
        assert_eq!(
            *hits.borrow(),
            0,
            "per-listener cancel check must cover deliveries already in flight"
        );
    }

    #[test]
    fn test_nested_writes_complete_before_outer_dispatch_continues() {
        let first = signal(0);
        let second = signal(0);
        let order: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));

        let order_a = order.clone();
        let second_clone = second.clone();
        first.listen(
            move |_| {
                order_a.borrow_mut().push("first.a");
                second_clone.set(1);
            },
            ListenOptions::default(),
        );

        let order_b = order.clone();
        second.listen(
            move |_| order_b.borrow_mut().push("second"),
            ListenOptions::default(),
        );

        let order_c = order.clone();
        first.listen(
            move |_| order_c.borrow_mut().push("first.b"),
            ListenOptions::default(),
        );

        first.set(1);
        assert_eq!(
            *order.borrow(),
            vec!["first.a", "second", "first.b"],
            "a nested write runs its whole round inside the outer dispatch"
        );
    }

    #[test]
    fn test_every_write_notifies_no_coalescing() {
        let count = signal(0);
        let hits = Rc::new(RefCell::new(0));

        let hits_clone = hits.clone();
        count.listen(
            move |_| *hits_clone.borrow_mut() += 1,
            ListenOptions::default(),
        );

        for i in 0..5 {
            count.set(i);
        }
        assert_eq!(*hits.borrow(), 5, "writes are never coalesced");
    }

    #[test]
    fn test_plain_signal_is_not_computed() {
        assert!(!signal(0).is_computed());
    }
}
