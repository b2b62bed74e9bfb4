//! Minimal in-memory document tree: the host the binder patches.
//!
//! There is no browser here, so the crate carries its own node tree - just
//! enough DOM to express elements, text, comments, fragments, ordered child
//! splicing, and a connectivity check.

pub mod event;
pub mod node;

pub use event::Event;
pub use node::{is_live_property, Node, NodeType, WeakNode};
