//! The in-memory document tree.
//!
//! [`Node`] is a cheap handle over one tree node; clones share identity and
//! equality is pointer identity. Parent links are weak, so a subtree that
//! nothing else references is collected as a unit; a reactive region whose
//! subtree was dropped simply fails to find its parent and goes inert.
//!
//! Child order is the only order: there is no sibling linking, and every
//! structural operation is expressed as index arithmetic on the parent's
//! child vector. Attribute and live-property maps preserve insertion order
//! (observable through [`Node::outer_html`]).

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;

use crate::error::DomError;
use crate::types::{EventHandler, Value};

// =============================================================================
// Node kinds
// =============================================================================

/// Public discriminant for a node's kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Root of a live tree; connectivity checks terminate here.
    Document,
    /// Transparent container: adopting one moves its children out of it.
    Fragment,
    /// Tagged element with attributes, live properties, and event listeners.
    Element,
    /// Character data leaf.
    Text,
    /// Positional anchor leaf; carries no rendered content.
    Comment,
}

pub(crate) enum NodeKind {
    Document,
    Fragment,
    Element(ElementData),
    Text(RefCell<String>),
    Comment(String),
}

pub(crate) struct ElementData {
    pub(crate) tag: String,
    pub(crate) attributes: RefCell<IndexMap<String, String>>,
    pub(crate) properties: RefCell<IndexMap<String, Value>>,
    pub(crate) listeners: RefCell<Vec<(String, EventHandler)>>,
}

pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) parent: RefCell<Weak<NodeData>>,
    pub(crate) children: RefCell<Vec<Node>>,
}

// =============================================================================
// Node handle
// =============================================================================

/// Handle to one node of the document tree.
pub struct Node {
    pub(crate) data: Rc<NodeData>,
}

impl Clone for Node {
    fn clone(&self) -> Self {
        Self {
            data: Rc::clone(&self.data),
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }
}

impl Eq for Node {}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data.kind {
            NodeKind::Document => write!(f, "Node(Document)"),
            NodeKind::Fragment => write!(f, "Node(Fragment)"),
            NodeKind::Element(el) => write!(f, "Node(<{}>)", el.tag),
            NodeKind::Text(text) => write!(f, "Node({:?})", text.borrow()),
            NodeKind::Comment(text) => write!(f, "Node(<!--{text}-->)"),
        }
    }
}

/// Weak handle used by listeners that must not keep an element alive.
pub struct WeakNode {
    data: Weak<NodeData>,
}

impl Clone for WeakNode {
    fn clone(&self) -> Self {
        Self {
            data: Weak::clone(&self.data),
        }
    }
}

impl WeakNode {
    /// Recover a strong handle if the node is still alive.
    pub fn upgrade(&self) -> Option<Node> {
        self.data.upgrade().map(|data| Node { data })
    }
}

// =============================================================================
// Construction
// =============================================================================

impl Node {
    fn from_kind(kind: NodeKind) -> Self {
        Self {
            data: Rc::new(NodeData {
                kind,
                parent: RefCell::new(Weak::new()),
                children: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Create a document root. Subtrees reachable from one are "connected".
    pub fn document() -> Self {
        Self::from_kind(NodeKind::Document)
    }

    /// Create an empty fragment.
    pub fn fragment() -> Self {
        Self::from_kind(NodeKind::Fragment)
    }

    /// Create an element with the given tag.
    pub fn element(tag: &str) -> Self {
        Self::from_kind(NodeKind::Element(ElementData {
            tag: tag.to_string(),
            attributes: RefCell::new(IndexMap::new()),
            properties: RefCell::new(IndexMap::new()),
            listeners: RefCell::new(Vec::new()),
        }))
    }

    /// Create a text node.
    pub fn text(content: &str) -> Self {
        Self::from_kind(NodeKind::Text(RefCell::new(content.to_string())))
    }

    /// Create a comment node.
    pub fn comment(content: &str) -> Self {
        Self::from_kind(NodeKind::Comment(content.to_string()))
    }

    /// Create a `<br>` element, the separator inserted between the lines of
    /// multi-line text content.
    pub fn line_break() -> Self {
        Self::element("br")
    }

    /// Downgrade to a weak handle.
    pub fn downgrade(&self) -> WeakNode {
        WeakNode {
            data: Rc::downgrade(&self.data),
        }
    }
}

// =============================================================================
// Inspection
// =============================================================================

impl Node {
    /// This node's kind.
    pub fn node_type(&self) -> NodeType {
        match &self.data.kind {
            NodeKind::Document => NodeType::Document,
            NodeKind::Fragment => NodeType::Fragment,
            NodeKind::Element(_) => NodeType::Element,
            NodeKind::Text(_) => NodeType::Text,
            NodeKind::Comment(_) => NodeType::Comment,
        }
    }

    /// Element tag, if this is an element.
    pub fn tag(&self) -> Option<&str> {
        match &self.data.kind {
            NodeKind::Element(el) => Some(&el.tag),
            _ => None,
        }
    }

    /// Text content, if this is a text node.
    pub fn text_content(&self) -> Option<String> {
        match &self.data.kind {
            NodeKind::Text(text) => Some(text.borrow().clone()),
            _ => None,
        }
    }

    /// Comment text, if this is a comment node.
    pub fn comment_text(&self) -> Option<&str> {
        match &self.data.kind {
            NodeKind::Comment(text) => Some(text),
            _ => None,
        }
    }

    /// Whether this node kind can hold children.
    pub fn can_have_children(&self) -> bool {
        matches!(
            self.data.kind,
            NodeKind::Document | NodeKind::Fragment | NodeKind::Element(_)
        )
    }

    /// Current parent, if attached.
    pub fn parent(&self) -> Option<Node> {
        self.data.parent.borrow().upgrade().map(|data| Node { data })
    }

    /// Snapshot of the child handles, in order.
    pub fn children(&self) -> Vec<Node> {
        self.data.children.borrow().clone()
    }

    /// Number of children.
    pub fn child_count(&self) -> usize {
        self.data.children.borrow().len()
    }

    /// Child at `index`, if any.
    pub fn child(&self, index: usize) -> Option<Node> {
        self.data.children.borrow().get(index).cloned()
    }

    /// Index of `child` in this node's child list (pointer identity).
    pub fn index_of(&self, child: &Node) -> Option<usize> {
        self.data
            .children
            .borrow()
            .iter()
            .position(|node| node == child)
    }

    /// True iff the parent chain from this node reaches a document root.
    pub fn is_connected(&self) -> bool {
        let mut cursor = Rc::clone(&self.data);
        loop {
            if matches!(cursor.kind, NodeKind::Document) {
                return true;
            }
            let parent = cursor.parent.borrow().upgrade();
            match parent {
                Some(next) => cursor = next,
                None => return false,
            }
        }
    }

    fn is_same_or_ancestor_of(&self, other: &Node) -> bool {
        let mut cursor = Rc::clone(&other.data);
        loop {
            if Rc::ptr_eq(&cursor, &self.data) {
                return true;
            }
            let parent = cursor.parent.borrow().upgrade();
            match parent {
                Some(next) => cursor = next,
                None => return false,
            }
        }
    }
}

// =============================================================================
// Structural mutation
// =============================================================================

impl Node {
    /// Append `child` at the end of this node's children, detaching it from
    /// any previous parent. Appending a fragment moves the fragment's
    /// children and leaves the fragment empty.
    pub fn append(&self, child: &Node) -> Result<(), DomError> {
        let mut at = self.child_count();
        if self.index_of(child).is_some() {
            at -= 1;
        }
        self.insert_at(at, child)
    }

    /// Insert `child` immediately before `reference`, detaching it from any
    /// previous parent. A failed insertion leaves the child where it was.
    pub fn insert_before(&self, child: &Node, reference: &Node) -> Result<(), DomError> {
        let mut at = self.index_of(reference).ok_or(DomError::NotAChild)?;
        // A same-parent move shifts the reference down once the child leaves
        // its old slot.
        if self.index_of(child).is_some_and(|own| own < at) {
            at -= 1;
        }
        self.insert_at(at, child)
    }

    /// Insert `child` at `index`, detaching it from any previous parent.
    /// `index` addresses the child list as it looks after the detach. A
    /// failed insertion leaves the child where it was.
    pub fn insert_at(&self, index: usize, child: &Node) -> Result<(), DomError> {
        if !self.can_have_children() {
            return Err(DomError::NotAContainer {
                kind: self.node_type(),
            });
        }
        if child.is_same_or_ancestor_of(self) {
            return Err(DomError::WouldCycle);
        }

        if child.node_type() == NodeType::Fragment {
            return self.adopt_fragment(index, child);
        }

        // Validate bounds before touching anything; only then detach.
        let mut len = self.child_count();
        if self.index_of(child).is_some() {
            len -= 1;
        }
        if index > len {
            return Err(DomError::IndexOutOfBounds { index, len });
        }

        child.detach();
        *child.data.parent.borrow_mut() = Rc::downgrade(&self.data);
        self.data.children.borrow_mut().insert(index, child.clone());
        Ok(())
    }

    /// Move every child out of `fragment` into this node starting at `index`.
    fn adopt_fragment(&self, index: usize, fragment: &Node) -> Result<(), DomError> {
        let len = self.child_count();
        if index > len {
            return Err(DomError::IndexOutOfBounds { index, len });
        }
        let moved: Vec<Node> = fragment.data.children.borrow_mut().drain(..).collect();
        let mut children = self.data.children.borrow_mut();
        for (offset, node) in moved.into_iter().enumerate() {
            *node.data.parent.borrow_mut() = Rc::downgrade(&self.data);
            children.insert(index + offset, node);
        }
        Ok(())
    }

    /// Remove this node from its parent, if it has one. Idempotent.
    pub fn detach(&self) {
        let Some(parent) = self.parent() else { return };
        if let Some(index) = parent.index_of(self) {
            parent.data.children.borrow_mut().remove(index);
        }
        *self.data.parent.borrow_mut() = Weak::new();
    }

    /// Remove and return the children in `from..to`, clearing their parent
    /// links. Out-of-range bounds are clamped.
    pub(crate) fn remove_range(&self, from: usize, to: usize) -> Vec<Node> {
        let len = self.child_count();
        let from = from.min(len);
        let to = to.min(len).max(from);
        let removed: Vec<Node> = self.data.children.borrow_mut().drain(from..to).collect();
        for node in &removed {
            *node.data.parent.borrow_mut() = Weak::new();
        }
        removed
    }
}

// =============================================================================
// Attributes and live properties
// =============================================================================

/// Names resolved as live element properties rather than attributes.
///
/// A fixed, documented table rather than a per-host probe. `class` is
/// deliberately absent; `className` is aliased to the `class` *attribute* by
/// the element builder.
const LIVE_PROPERTIES: &[&str] = &[
    "id", "title", "lang", "dir", "hidden", "tabIndex", "value", "checked", "disabled",
    "placeholder", "href", "src", "alt", "type", "name",
];

/// Whether `name` is assigned as a live property on elements.
pub fn is_live_property(name: &str) -> bool {
    LIVE_PROPERTIES.contains(&name)
}

impl Node {
    /// Set an attribute. Ignored with a debug event on non-element nodes.
    pub fn set_attribute(&self, name: &str, value: &str) {
        match &self.data.kind {
            NodeKind::Element(el) => {
                el.attributes
                    .borrow_mut()
                    .insert(name.to_string(), value.to_string());
            }
            _ => tracing::debug!(name, "set_attribute on a non-element node; ignored"),
        }
    }

    /// Attribute value, if present.
    pub fn attribute(&self, name: &str) -> Option<String> {
        match &self.data.kind {
            NodeKind::Element(el) => el.attributes.borrow().get(name).cloned(),
            _ => None,
        }
    }

    /// Assign a live property. Ignored with a debug event on non-elements.
    pub fn set_property(&self, name: &str, value: Value) {
        match &self.data.kind {
            NodeKind::Element(el) => {
                el.properties.borrow_mut().insert(name.to_string(), value);
            }
            _ => tracing::debug!(name, "set_property on a non-element node; ignored"),
        }
    }

    /// Live property value, if assigned.
    pub fn property(&self, name: &str) -> Option<Value> {
        match &self.data.kind {
            NodeKind::Element(el) => el.properties.borrow().get(name).cloned(),
            _ => None,
        }
    }
}

// =============================================================================
// Serialization
// =============================================================================

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

impl Node {
    /// Serialize this node (and its subtree) as markup.
    ///
    /// Documents and fragments serialize as the concatenation of their
    /// children. Live properties are not reflected, matching host-DOM
    /// behavior.
    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match &self.data.kind {
            NodeKind::Document | NodeKind::Fragment => {
                for child in self.data.children.borrow().iter() {
                    child.write_html(out);
                }
            }
            NodeKind::Text(text) => out.push_str(&escape_text(&text.borrow())),
            NodeKind::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            NodeKind::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                for (name, value) in el.attributes.borrow().iter() {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_attribute(value));
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&el.tag.as_str()) {
                    return;
                }
                for child in self.data.children.borrow().iter() {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(&el.tag);
                out.push('>');
            }
        }
    }
}

fn escape_text(raw: &str) -> String {
    raw.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attribute(raw: &str) -> String {
    escape_text(raw).replace('"', "&quot;")
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_sets_parent_and_order() {
        let parent = Node::element("div");
        let a = Node::text("a");
        let b = Node::text("b");

        parent.append(&a).unwrap();
        parent.append(&b).unwrap();

        assert_eq!(parent.child_count(), 2);
        assert_eq!(parent.index_of(&b), Some(1));
        assert_eq!(a.parent(), Some(parent.clone()));
    }

    #[test]
    fn test_append_reparents() {
        let first = Node::element("div");
        let second = Node::element("div");
        let child = Node::text("x");

        first.append(&child).unwrap();
        second.append(&child).unwrap();

        assert_eq!(first.child_count(), 0, "append must detach from old parent");
        assert_eq!(child.parent(), Some(second));
    }

    #[test]
    fn test_leaf_nodes_reject_children() {
        let text = Node::text("leaf");
        let err = text.append(&Node::text("child")).unwrap_err();
        assert_eq!(err, DomError::NotAContainer { kind: NodeType::Text });
    }

    #[test]
    fn test_adopting_an_ancestor_is_rejected() {
        let outer = Node::element("div");
        let inner = Node::element("span");
        outer.append(&inner).unwrap();

        assert_eq!(inner.append(&outer).unwrap_err(), DomError::WouldCycle);
        assert_eq!(outer.append(&outer).unwrap_err(), DomError::WouldCycle);
    }

    #[test]
    fn test_insert_before_and_not_a_child() {
        let parent = Node::element("ul");
        let a = Node::element("li");
        let c = Node::element("li");
        parent.append(&a).unwrap();
        parent.append(&c).unwrap();

        let b = Node::element("li");
        parent.insert_before(&b, &c).unwrap();
        assert_eq!(parent.index_of(&b), Some(1));

        let stranger = Node::element("li");
        assert_eq!(
            parent.insert_before(&Node::element("li"), &stranger).unwrap_err(),
            DomError::NotAChild
        );
    }

    #[test]
    fn test_failed_insert_before_leaves_the_child_in_place() {
        let old_parent = Node::element("div");
        let child = Node::text("x");
        old_parent.append(&child).unwrap();

        let new_parent = Node::element("div");
        let stranger = Node::element("span");
        assert_eq!(
            new_parent.insert_before(&child, &stranger).unwrap_err(),
            DomError::NotAChild
        );
        assert_eq!(
            child.parent(),
            Some(old_parent.clone()),
            "a failed insert must not detach the child"
        );
        assert_eq!(old_parent.child_count(), 1);
    }

    #[test]
    fn test_out_of_bounds_insert_keeps_the_old_parent() {
        let old_parent = Node::element("div");
        let child = Node::text("x");
        old_parent.append(&child).unwrap();

        let new_parent = Node::element("div");
        assert_eq!(
            new_parent.insert_at(5, &child).unwrap_err(),
            DomError::IndexOutOfBounds { index: 5, len: 0 }
        );
        assert_eq!(child.parent(), Some(old_parent));
    }

    #[test]
    fn test_rejected_cycle_leaves_the_ancestor_attached() {
        let document = Node::document();
        let outer = Node::element("div");
        let inner = Node::element("span");
        document.append(&outer).unwrap();
        outer.append(&inner).unwrap();

        assert_eq!(inner.append(&outer).unwrap_err(), DomError::WouldCycle);
        assert_eq!(
            outer.parent(),
            Some(document),
            "a rejected adoption must not move the ancestor"
        );
    }

    #[test]
    fn test_same_parent_insert_before_reorders() {
        let parent = Node::element("ul");
        let a = Node::element("li");
        let b = Node::element("li");
        let c = Node::element("li");
        for kid in [&a, &b, &c] {
            parent.append(kid).unwrap();
        }

        // Move a later: its departure shifts the reference index.
        parent.insert_before(&a, &c).unwrap();
        assert_eq!(parent.index_of(&b), Some(0));
        assert_eq!(parent.index_of(&a), Some(1));
        assert_eq!(parent.index_of(&c), Some(2));
        assert_eq!(parent.child_count(), 3);
    }

    #[test]
    fn test_same_parent_append_moves_to_end() {
        let parent = Node::element("ul");
        let a = Node::element("li");
        let b = Node::element("li");
        parent.append(&a).unwrap();
        parent.append(&b).unwrap();

        parent.append(&a).unwrap();
        assert_eq!(parent.index_of(&a), Some(1), "re-append moves to the end");
        assert_eq!(parent.child_count(), 2);
    }

    #[test]
    fn test_fragment_adoption_moves_children() {
        let frag = Node::fragment();
        frag.append(&Node::text("a")).unwrap();
        frag.append(&Node::text("b")).unwrap();

        let parent = Node::element("div");
        parent.append(&Node::text("0")).unwrap();
        parent.append(&frag).unwrap();

        assert_eq!(frag.child_count(), 0, "fragment must be emptied");
        assert_eq!(parent.child_count(), 3);
        assert_eq!(parent.child(1).unwrap().text_content().as_deref(), Some("a"));
    }

    #[test]
    fn test_is_connected_through_parent_chain() {
        let document = Node::document();
        let section = Node::element("section");
        let leaf = Node::text("x");
        section.append(&leaf).unwrap();

        assert!(!leaf.is_connected());
        document.append(&section).unwrap();
        assert!(leaf.is_connected());

        section.detach();
        assert!(!leaf.is_connected(), "detaching severs connectivity");
    }

    #[test]
    fn test_remove_range_clears_parents() {
        let parent = Node::element("div");
        let kids: Vec<Node> = (0..4).map(|i| Node::text(&i.to_string())).collect();
        for kid in &kids {
            parent.append(kid).unwrap();
        }

        let removed = parent.remove_range(1, 3);
        assert_eq!(removed.len(), 2);
        assert_eq!(parent.child_count(), 2);
        assert_eq!(removed[0].parent(), None);
        assert_eq!(parent.child(1), Some(kids[3].clone()));
    }

    #[test]
    fn test_attributes_and_properties() {
        let input = Node::element("input");
        input.set_attribute("class", "wide");
        input.set_property("value", Value::from("hello"));

        assert_eq!(input.attribute("class").as_deref(), Some("wide"));
        assert_eq!(input.property("value"), Some(Value::from("hello")));
        assert_eq!(input.property("class"), None);

        assert!(is_live_property("value"));
        assert!(!is_live_property("class"));
        assert!(!is_live_property("data-role"));
    }

    #[test]
    fn test_outer_html_escapes_and_voids() {
        let div = Node::element("div");
        div.set_attribute("title", "a\"b");
        div.append(&Node::text("1 < 2 & 3")).unwrap();
        div.append(&Node::line_break()).unwrap();
        div.append(&Node::comment("mark")).unwrap();

        assert_eq!(
            div.outer_html(),
            "<div title=\"a&quot;b\">1 &lt; 2 &amp; 3<br><!--mark--></div>"
        );
    }

    #[test]
    fn test_node_equality_is_identity() {
        let a = Node::text("same");
        let b = Node::text("same");
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_weak_handle_goes_dead_with_subtree() {
        let weak = {
            let parent = Node::element("div");
            parent.downgrade()
        };
        assert!(weak.upgrade().is_none());
    }
}
