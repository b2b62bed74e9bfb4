//! The element builder.
//!
//! Consumes a tag name and a [`Props`] descriptor and produces one concrete
//! element, wiring static values, reactive values, and event handlers as it
//! goes. The descriptor is not retained - signals registered here keep their
//! listeners, the bag itself is gone after `build` returns.

use crate::dom::{is_live_property, Node};
use crate::render::render_children;
use crate::signal::{Change, Computed, ListenOptions, Signal};
use crate::types::{Child, Prop, Props, Value};

/// Build one element from a tag name and a property bag.
///
/// Per key, in insertion order:
/// - `on*` keys register the remainder (lower-cased) as a native event
///   listener; a non-handler value under an `on*` key is silently skipped.
/// - `className` is aliased to the `class` attribute.
/// - names on the live-property table are assigned as element properties;
///   everything else becomes an attribute, stringified.
/// - signal values are applied immediately and re-applied on every change.
///   The change listener holds the element weakly and follows it for its
///   whole attached lifetime; there is no unsubscribe on unmount.
/// - a handler under a non-`on` key is skipped with a diagnostic event.
pub fn build(tag: &str, props: Props) -> Node {
    let element = Node::element(tag);
    for (key, prop) in props.entries {
        apply_prop(&element, &key, prop);
    }
    if let Some(children) = props.children {
        render_children(&element, &children);
    }
    element
}

/// Build a fragment from a child descriptor (the `Frag` form of the
/// descriptor language). Adopting the fragment moves its content out.
pub fn fragment(children: impl Into<Child>) -> Node {
    let frag = Node::fragment();
    render_children(&frag, &children.into());
    frag
}

fn apply_prop(element: &Node, key: &str, prop: Prop) {
    if let Some(event) = key.strip_prefix("on") {
        if let Prop::Handler(handler) = prop {
            element.on(&event.to_ascii_lowercase(), handler);
        }
        // Non-callable on* props are skipped without diagnostics.
        return;
    }

    if matches!(prop, Prop::Handler(_)) {
        tracing::error!(key, "function prop is neither an event nor a signal; skipping");
        return;
    }

    let name = if key == "className" { "class" } else { key };
    if is_live_property(name) {
        match prop {
            Prop::Static(value) => element.set_property(name, value),
            Prop::Signal(signal) => bind_property(element, name, Source::Writable(signal)),
            Prop::Computed(computed) => bind_property(element, name, Source::Computed(computed)),
            Prop::Handler(_) => {}
        }
    } else {
        match prop {
            Prop::Static(value) => element.set_attribute(name, &value.to_string()),
            Prop::Signal(signal) => bind_attribute(element, name, Source::Writable(signal)),
            Prop::Computed(computed) => bind_attribute(element, name, Source::Computed(computed)),
            Prop::Handler(_) => {}
        }
    }
}

/// Either flavour of reactive cell carrying a prop value.
enum Source {
    Writable(Signal<Value>),
    Computed(Computed<Value>),
}

impl Source {
    fn get(&self) -> Value {
        match self {
            Source::Writable(signal) => signal.get(),
            Source::Computed(computed) => computed.get(),
        }
    }

    fn listen(&self, callback: impl Fn(&Change<Value>) + 'static) {
        match self {
            Source::Writable(signal) => signal.listen(callback, ListenOptions::default()),
            Source::Computed(computed) => computed.listen(callback, ListenOptions::default()),
        }
    }
}

fn bind_property(element: &Node, name: &str, source: Source) {
    element.set_property(name, source.get());
    let weak = element.downgrade();
    let name = name.to_string();
    source.listen(move |change| {
        if let Some(element) = weak.upgrade() {
            element.set_property(&name, change.cur.clone());
        }
    });
}

fn bind_attribute(element: &Node, name: &str, source: Source) {
    element.set_attribute(name, &source.get().to_string());
    let weak = element.downgrade();
    let name = name.to_string();
    source.listen(move |change| {
        if let Some(element) = weak.upgrade() {
            element.set_attribute(&name, &change.cur.to_string());
        }
    });
}
