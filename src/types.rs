//! Core value and descriptor types.
//!
//! Each seam between "plain value", "reactive value", and "event handler" is
//! an explicit sum type checked by pattern matching: [`Value`] for scalars,
//! [`Prop`] for element properties, [`Child`] for child descriptors, with
//! liberal `From` conversions so call sites stay terse.

use std::fmt;
use std::rc::Rc;

use crate::dom::{Event, Node};
use crate::signal::{Change, Computed, ListenOptions, Signal};

/// Native event callback (`Rc` so handlers clone into dispatch snapshots).
pub type EventHandler = Rc<dyn Fn(&Event)>;

// =============================================================================
// Value - attribute / property scalar
// =============================================================================

/// Scalar value accepted for attributes and live properties.
///
/// `Display` is the stringification rule used for attributes and text.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Num(f64),
    Bool(bool),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{i}"),
            Value::Num(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Num(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

// =============================================================================
// Prop - one element property
// =============================================================================

/// One entry in an element's property bag.
#[derive(Clone)]
pub enum Prop {
    /// Plain value, applied once.
    Static(Value),
    /// Writable signal; the property follows every change.
    Signal(Signal<Value>),
    /// Derived signal; same following behavior, read-only source.
    Computed(Computed<Value>),
    /// Event handler; only meaningful under an `on*` key.
    Handler(EventHandler),
}

impl From<Value> for Prop {
    fn from(value: Value) -> Self {
        Prop::Static(value)
    }
}

impl From<&str> for Prop {
    fn from(value: &str) -> Self {
        Prop::Static(value.into())
    }
}

impl From<String> for Prop {
    fn from(value: String) -> Self {
        Prop::Static(value.into())
    }
}

impl From<i64> for Prop {
    fn from(value: i64) -> Self {
        Prop::Static(value.into())
    }
}

impl From<i32> for Prop {
    fn from(value: i32) -> Self {
        Prop::Static(value.into())
    }
}

impl From<f64> for Prop {
    fn from(value: f64) -> Self {
        Prop::Static(value.into())
    }
}

impl From<bool> for Prop {
    fn from(value: bool) -> Self {
        Prop::Static(value.into())
    }
}

impl From<Signal<Value>> for Prop {
    fn from(signal: Signal<Value>) -> Self {
        Prop::Signal(signal)
    }
}

impl From<Computed<Value>> for Prop {
    fn from(computed: Computed<Value>) -> Self {
        Prop::Computed(computed)
    }
}

// =============================================================================
// Child - child descriptor
// =============================================================================

/// Declarative child descriptor consumed by the children renderer.
///
/// Arbitrarily nestable: a `List` may hold further lists, thunks expand once
/// at render time, and `Signal` children become live marker-delimited regions.
#[derive(Clone)]
pub enum Child {
    /// Renders nothing.
    None,
    /// Primitive content; stringified, with embedded newlines becoming `<br>`.
    Text(Value),
    /// A concrete node appended as-is.
    Node(Node),
    /// Ordered sequence, flattened recursively.
    List(Vec<Child>),
    /// Zero-argument closure invoked once; its result is rendered. Static
    /// expansion, not reactive.
    Thunk(Rc<dyn Fn() -> Child>),
    /// Reactive content, kept in sync by the signal-DOM binder.
    Signal(ChildSignal),
}

impl fmt::Debug for Child {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Child::None => f.write_str("Child::None"),
            Child::Text(value) => write!(f, "Child::Text({value:?})"),
            Child::Node(node) => write!(f, "Child::Node({node:?})"),
            Child::List(items) => write!(f, "Child::List({items:?})"),
            Child::Thunk(_) => f.write_str("Child::Thunk(..)"),
            Child::Signal(_) => f.write_str("Child::Signal(..)"),
        }
    }
}

/// One-time child expansion from a closure.
pub fn thunk(f: impl Fn() -> Child + 'static) -> Child {
    Child::Thunk(Rc::new(f))
}

/// Either flavour of reactive cell bound as a child.
///
/// The binder treats both identically; the split only records (and pattern
/// matching enforces) whether external code may write the source.
#[derive(Clone)]
pub enum ChildSignal {
    Writable(Signal<Child>),
    Computed(Computed<Child>),
}

impl ChildSignal {
    /// Current child value.
    pub fn get(&self) -> Child {
        match self {
            ChildSignal::Writable(signal) => signal.get(),
            ChildSignal::Computed(computed) => computed.get(),
        }
    }

    /// Register a change listener on the underlying cell.
    pub fn listen(&self, callback: impl Fn(&Change<Child>) + 'static, options: ListenOptions) {
        match self {
            ChildSignal::Writable(signal) => signal.listen(callback, options),
            ChildSignal::Computed(computed) => computed.listen(callback, options),
        }
    }

    /// Whether the source is derived.
    pub fn is_computed(&self) -> bool {
        matches!(self, ChildSignal::Computed(_))
    }
}

impl From<Value> for Child {
    fn from(value: Value) -> Self {
        Child::Text(value)
    }
}

impl From<&str> for Child {
    fn from(value: &str) -> Self {
        Child::Text(value.into())
    }
}

impl From<String> for Child {
    fn from(value: String) -> Self {
        Child::Text(value.into())
    }
}

impl From<i64> for Child {
    fn from(value: i64) -> Self {
        Child::Text(value.into())
    }
}

impl From<i32> for Child {
    fn from(value: i32) -> Self {
        Child::Text(value.into())
    }
}

impl From<f64> for Child {
    fn from(value: f64) -> Self {
        Child::Text(value.into())
    }
}

impl From<bool> for Child {
    fn from(value: bool) -> Self {
        Child::Text(value.into())
    }
}

impl From<Node> for Child {
    fn from(node: Node) -> Self {
        Child::Node(node)
    }
}

impl From<ChildSignal> for Child {
    fn from(signal: ChildSignal) -> Self {
        Child::Signal(signal)
    }
}

impl From<Signal<Child>> for Child {
    fn from(signal: Signal<Child>) -> Self {
        Child::Signal(ChildSignal::Writable(signal))
    }
}

impl From<Computed<Child>> for Child {
    fn from(computed: Computed<Child>) -> Self {
        Child::Signal(ChildSignal::Computed(computed))
    }
}

impl<T: Into<Child>> From<Vec<T>> for Child {
    fn from(items: Vec<T>) -> Self {
        Child::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Child>> From<Option<T>> for Child {
    fn from(item: Option<T>) -> Self {
        match item {
            Some(value) => value.into(),
            None => Child::None,
        }
    }
}

impl<T: Clone + Into<Child> + 'static> Signal<T> {
    /// Bridge a typed signal into a reactive child: derives a `Child`-valued
    /// cell that follows this signal, so the DOM region tracks every write.
    pub fn to_child(&self) -> Child {
        Child::Signal(ChildSignal::Computed(
            self.computed(|value: &T| -> Child { value.clone().into() }),
        ))
    }
}

impl<T: Clone + Into<Child> + 'static> Computed<T> {
    /// Bridge a typed derived cell into a reactive child.
    pub fn to_child(&self) -> Child {
        Child::Signal(ChildSignal::Computed(
            self.computed(|value: &T| -> Child { value.clone().into() }),
        ))
    }
}

// =============================================================================
// Props - the element descriptor
// =============================================================================

/// Declarative property bag consumed by [`build`](crate::element::build).
///
/// Keys resolve in insertion order. `on*` keys carry event handlers,
/// `className` aliases the `class` attribute, names on the live-property
/// table assign properties, and everything else becomes an attribute.
#[derive(Default, Clone)]
pub struct Props {
    pub(crate) entries: Vec<(String, Prop)>,
    pub(crate) children: Option<Child>,
}

impl Props {
    /// Empty property bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property under `key`.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Prop>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    /// Register an event handler; `event` is the native event name, so
    /// `.on("click", ..)` is the `onClick` prop of the descriptor form.
    pub fn on(mut self, event: &str, handler: impl Fn(&Event) + 'static) -> Self {
        self.entries
            .push((format!("on{event}"), Prop::Handler(Rc::new(handler))));
        self
    }

    /// Set the child descriptor.
    pub fn children(mut self, children: impl Into<Child>) -> Self {
        self.children = Some(children.into());
        self
    }
}
