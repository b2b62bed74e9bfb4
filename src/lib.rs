//! # weft-dom
//!
//! Fine-grained reactive signals with marker-anchored DOM binding.
//!
//! Writable cells ([`signal`]) and derived cells ([`Computed`]) propagate
//! synchronously and depth-first: by the time a write call returns, every
//! listener and every transitively derived cell has observed it. There is no
//! batching, no scheduler, and no equality cutoff; each write is delivered.
//!
//! ## Architecture
//!
//! The view layer is deliberately small:
//! ```text
//! Signal / Computed → Child descriptors → render_children → Node tree
//!                                  └── bind: marker-delimited live regions
//! ```
//! [`build`] assembles an element from a tag and a [`Props`] bag.
//! [`render_children`] expands [`Child`] descriptors (text, nodes, nested
//! lists, thunks) into the tree, splitting embedded newlines into `<br>`
//! elements. A signal-valued child becomes a live region: a pair of comment
//! markers whose in-between siblings are fully replaced on every write. No
//! diffing, no keyed reconciliation; the region's contents are always exactly
//! the rendering of the signal's current value.
//!
//! The node tree is this crate's own single-threaded host model
//! ([`Node`]), with parent links, ordered children, live-property dispatch
//! and HTML serialization. Handles are `Rc`-based and not `Send`.
//!
//! ## Modules
//!
//! - [`signal`] - Writable and derived reactive cells
//! - [`dom`] - The host node tree and synthetic events
//! - [`element`] - Element builder (tag + prop bag)
//! - [`render`] - Children renderer
//! - [`bind`] - Signal-DOM binder (live regions)

pub mod bind;
pub mod dom;
pub mod element;
pub mod error;
pub mod render;
pub mod signal;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use signal::{
    completion_signal, signal, CancelToken, Change, Completion, CompletionResolver, Computed,
    ListenOptions, Signal,
};

pub use dom::{is_live_property, Event, Node, NodeType};

pub use element::{build, fragment};

pub use render::render_children;

pub use bind::{bind, REGION_END, REGION_START};

pub use error::DomError;
