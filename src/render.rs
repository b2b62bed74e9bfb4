//! The children renderer.
//!
//! Normalizes an arbitrarily nested [`Child`] descriptor into concrete nodes
//! appended to a parent element or fragment. Static shapes render here;
//! reactive shapes delegate to the [`bind`](crate::bind) module, which owns
//! the live region from then on.

use crate::bind;
use crate::dom::Node;
use crate::types::Child;

/// Render `child` into `parent`, appending at the current end position.
///
/// - `None` renders nothing.
/// - Lists recurse in order, to arbitrary depth.
/// - Nodes append directly.
/// - Thunks are invoked once and their result rendered - a static, one-time
///   expansion, not reactive.
/// - Signals become marker-delimited live regions.
/// - Primitives stringify; embedded newlines split the text, with a `<br>`
///   between interior lines (none before the first or after the last).
pub fn render_children(parent: &Node, child: &Child) {
    match child {
        Child::None => {}
        Child::List(items) => {
            for item in items {
                render_children(parent, item);
            }
        }
        Child::Node(node) => {
            if let Err(err) = parent.append(node) {
                tracing::error!(error = %err, "cannot append child node; skipping");
            }
        }
        Child::Thunk(expand) => {
            let produced = expand();
            render_children(parent, &produced);
        }
        Child::Signal(source) => bind::bind(parent, source),
        Child::Text(value) => render_text(parent, &value.to_string()),
    }
}

/// Append `text` as text nodes with `<br>` separators at embedded newlines.
fn render_text(parent: &Node, text: &str) {
    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            if let Err(err) = parent.append(&Node::line_break()) {
                tracing::error!(error = %err, "cannot append line break; skipping");
            }
        }
        if let Err(err) = parent.append(&Node::text(line)) {
            tracing::error!(error = %err, "cannot append text node; skipping");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{thunk, Child};
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_none_renders_nothing() {
        let parent = Node::element("div");
        render_children(&parent, &Child::None);
        assert_eq!(parent.child_count(), 0);
    }

    #[test]
    fn test_nested_lists_flatten_in_order() {
        let parent = Node::element("div");
        let child: Child = vec![
            Child::from("a"),
            Child::List(vec![Child::from("b"), Child::List(vec![Child::from("c")])]),
            Child::from("d"),
        ]
        .into();

        render_children(&parent, &child);

        let texts: Vec<String> = parent
            .children()
            .iter()
            .filter_map(Node::text_content)
            .collect();
        assert_eq!(texts, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_node_children_append_directly() {
        let parent = Node::element("div");
        let span = Node::element("span");
        render_children(&parent, &Child::from(span.clone()));
        assert_eq!(parent.child(0), Some(span));
    }

    #[test]
    fn test_multiline_text_gets_interior_breaks_only() {
        let parent = Node::element("p");
        render_children(&parent, &Child::from("one\ntwo\nthree"));

        let kids = parent.children();
        assert_eq!(kids.len(), 5, "three lines, two separators");
        assert_eq!(kids[0].text_content().as_deref(), Some("one"));
        assert_eq!(kids[1].tag(), Some("br"));
        assert_eq!(kids[2].text_content().as_deref(), Some("two"));
        assert_eq!(kids[3].tag(), Some("br"));
        assert_eq!(kids[4].text_content().as_deref(), Some("three"));
    }

    #[test]
    fn test_single_line_text_gets_no_breaks() {
        let parent = Node::element("p");
        render_children(&parent, &Child::from("plain"));
        assert_eq!(parent.child_count(), 1);
        assert_eq!(parent.child(0).unwrap().tag(), None);
    }

    #[test]
    fn test_numbers_and_bools_stringify() {
        let parent = Node::element("p");
        render_children(&parent, &vec![Child::from(7i64), Child::from(false)].into());

        let texts: Vec<String> = parent
            .children()
            .iter()
            .filter_map(Node::text_content)
            .collect();
        assert_eq!(texts, vec!["7", "false"]);
    }

    #[test]
    fn test_thunk_expands_exactly_once_and_is_static() {
        let parent = Node::element("div");
        let calls = Rc::new(Cell::new(0));

        let calls_clone = calls.clone();
        let child = thunk(move || {
            calls_clone.set(calls_clone.get() + 1);
            Child::from("expanded")
        });

        render_children(&parent, &child);
        assert_eq!(calls.get(), 1, "thunk is invoked once at render time");
        assert_eq!(
            parent.child(0).unwrap().text_content().as_deref(),
            Some("expanded")
        );
    }

    #[test]
    fn test_thunk_result_renders_recursively() {
        let parent = Node::element("div");
        let child = thunk(|| vec![Child::from("x"), Child::from("y")].into());
        render_children(&parent, &child);
        assert_eq!(parent.child_count(), 2);
    }
}
