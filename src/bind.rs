//! The signal-DOM binder.
//!
//! Mounts a signal's value as a contiguous run of siblings delimited by two
//! comment markers, and fully replaces that run on every change. No wrapper
//! element is introduced, so surrounding CSS/layout semantics are untouched;
//! no diffing is attempted, so the invariant is simple and absolute: outside
//! of the brief splice window, the nodes strictly between the markers are
//! exactly the rendering of the signal's current value.
//!
//! # Detachment
//!
//! A region whose markers are no longer inside a connected tree drops updates
//! silently - never an error. Updates missed while detached are not replayed;
//! if the subtree is re-attached, the next write re-renders the region in
//! full. A region whose subtree was dropped entirely simply never finds its
//! parent again.
//!
//! # Re-entrancy
//!
//! A change listener must not write the same signal while its region is being
//! patched; the splice is not re-entrant. Documented constraint, not defended
//! against.

use crate::dom::Node;
use crate::render::render_children;
use crate::signal::ListenOptions;
use crate::types::{Child, ChildSignal};

/// Comment text of the marker that opens a reactive region.
///
/// Together with [`REGION_END`] this is a stable contract: external tooling
/// that walks the tree may locate dynamic regions by this literal pair.
pub const REGION_START: &str = "signal:start";

/// Comment text of the marker that closes a reactive region.
pub const REGION_END: &str = "signal:end";

/// Mount `source` as a marker-delimited region at the current append position
/// of `parent`, and keep the region in sync on every change.
pub fn bind(parent: &Node, source: &ChildSignal) {
    let start = Node::comment(REGION_START);
    let end = Node::comment(REGION_END);

    if let Err(err) = parent.append(&start) {
        tracing::error!(error = %err, "cannot mount reactive region; value will not render");
        return;
    }
    let initial = source.get();
    render_children(parent, &initial);
    if let Err(err) = parent.append(&end) {
        tracing::error!(error = %err, "cannot close reactive region; region is inert");
        return;
    }

    let region = Region { start, end };
    source.listen(
        move |change| region.patch(&change.cur),
        ListenOptions::default(),
    );
}

/// One live region. The markers are the region's whole identity: the current
/// parent is re-resolved from them on every update, so content that was
/// rendered into a fragment keeps working after the fragment is adopted.
struct Region {
    start: Node,
    end: Node,
}

impl Region {
    /// Replace everything strictly between the markers with the rendering of
    /// `cur`. Applied synchronously, once per write, in write order.
    fn patch(&self, cur: &Child) {
        let Some(parent) = self.start.parent() else {
            // Never mounted, or the subtree was dropped.
            return;
        };
        if !parent.is_connected() {
            // Detached region: silent no-op, orphaned nodes stay as they are.
            return;
        }

        let (Some(from), Some(to)) = (parent.index_of(&self.start), parent.index_of(&self.end))
        else {
            tracing::error!("reactive region markers are no longer siblings; region is inert");
            return;
        };
        if to < from {
            tracing::error!("reactive region markers are out of order; region is inert");
            return;
        }

        parent.remove_range(from + 1, to);

        // Render into a fragment, then splice: content lands between the
        // markers in logical order in one adoption.
        let staging = Node::fragment();
        render_children(&staging, cur);
        if let Err(err) = parent.insert_at(from + 1, &staging) {
            tracing::error!(error = %err, "failed to splice reactive region content");
        }
    }
}
