//! Error types for structural DOM operations.
//!
//! Only tree mutations are fallible. Reactive updates never return errors:
//! per the recovery model, a detached region is a silent no-op and a malformed
//! prop is logged and skipped.

use thiserror::Error;

use crate::dom::NodeType;

/// Errors produced by structural operations on the document tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The target node kind cannot hold children (text, comment).
    #[error("{kind:?} nodes cannot contain children")]
    NotAContainer {
        /// Kind of the node that was asked to adopt a child.
        kind: NodeType,
    },

    /// The reference node passed to an insertion is not a child of the target.
    #[error("reference node is not a child of this node")]
    NotAChild,

    /// The insertion index is past the end of the child list.
    #[error("insertion index {index} is out of bounds for {len} children")]
    IndexOutOfBounds {
        /// Requested index.
        index: usize,
        /// Current child count.
        len: usize,
    },

    /// Adopting this child would make a node its own ancestor.
    #[error("a node cannot adopt itself or one of its ancestors")]
    WouldCycle,
}
