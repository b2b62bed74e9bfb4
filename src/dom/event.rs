//! Native event registration and dispatch.
//!
//! Listeners live on the element they were registered on and fire in
//! registration order. There is no capture/bubble phase: dispatch targets a
//! single node, which is all the element builder's `on*` props require.

use crate::dom::node::{Node, NodeKind};
use crate::types::EventHandler;

/// An event delivered to listeners registered on its target node.
pub struct Event {
    name: String,
    target: Node,
}

impl Event {
    /// Lower-cased event name (`"click"`, `"input"`, ...).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The node the event was dispatched on.
    pub fn target(&self) -> &Node {
        &self.target
    }
}

impl Node {
    /// Register `handler` for `event` on this element. Ignored with a debug
    /// event on non-element nodes.
    pub fn on(&self, event: &str, handler: EventHandler) {
        match &self.data.kind {
            NodeKind::Element(el) => {
                el.listeners
                    .borrow_mut()
                    .push((event.to_string(), handler));
            }
            _ => tracing::debug!(event, "event listener on a non-element node; ignored"),
        }
    }

    /// Fire every listener registered for `event` on this node, in
    /// registration order. Returns the number of listeners invoked.
    pub fn dispatch(&self, event: &str) -> usize {
        let handlers: Vec<EventHandler> = match &self.data.kind {
            NodeKind::Element(el) => el
                .listeners
                .borrow()
                .iter()
                .filter(|(name, _)| name == event)
                .map(|(_, handler)| handler.clone())
                .collect(),
            _ => Vec::new(),
        };

        let payload = Event {
            name: event.to_string(),
            target: self.clone(),
        };
        for handler in &handlers {
            handler(&payload);
        }
        handlers.len()
    }
}
