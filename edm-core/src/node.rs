//! Core data structures of the document model.
//!
//! A [`Node`] is a `(Kind, Payload, Children)` triple. The set of kinds is
//! open: plugins introduce them at registration time, so [`Kind`] is a
//! string identifier rather than an enum. Payloads are owned by the plugin
//! that defines the kind and are stored behind the [`Payload`] capability
//! trait; the owning plugin recovers the concrete type with
//! [`Node::payload_as`].
//!
//! Trees are immutable values. Edits build new subtrees (see
//! [`Node::with_children`]) and payloads are reference counted, so cloning a
//! tree or sharing it between threads is cheap.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Identifier of a node's semantic role.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kind(Cow<'static, str>);

impl Kind {
    /// Root container produced when an import yields several blocks.
    pub const DOCUMENT: Kind = Kind::from_static("document");
    /// Grouping container produced by the import fallback.
    pub const FRAGMENT: Kind = Kind::from_static("fragment");

    pub const fn from_static(name: &'static str) -> Self {
        Kind(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<String>) -> Self {
        Kind(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Kind({})", self.0)
    }
}

impl From<&'static str> for Kind {
    fn from(name: &'static str) -> Self {
        Kind::from_static(name)
    }
}

/// Kind-specific data carried by a node.
///
/// Implement this for the payload struct of a kind; equality and downcasting
/// come for free through [`PayloadValue`] as long as the type is
/// `PartialEq`. Override [`Payload::literal`] when the payload holds the
/// literal text of the node (text, code spans), so kind-agnostic code such as
/// alt-text collection can read it without knowing the concrete type.
pub trait Payload: PayloadValue + fmt::Debug + Send + Sync + 'static {
    fn literal(&self) -> Option<&str> {
        None
    }
}

/// Object-safe equality and downcasting for payloads.
///
/// Blanket-implemented for every `'static + PartialEq` type.
pub trait PayloadValue {
    fn as_any(&self) -> &dyn Any;
    fn eq_payload(&self, other: &dyn Payload) -> bool;
}

impl<T: Any + PartialEq> PayloadValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_payload(&self, other: &dyn Payload) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }
}

/// A node of the document tree.
///
/// The default value is the absent node: empty kind, no payload, no
/// children. It means "no content here" and every output walk treats it as
/// the identity.
#[derive(Clone, Default)]
pub struct Node {
    kind: Kind,
    payload: Option<Arc<dyn Payload>>,
    children: Vec<Node>,
    // Set once import has validated this subtree; ignored by equality.
    normalized: bool,
}

impl Node {
    pub fn new(kind: Kind, payload: impl Payload, children: Vec<Node>) -> Self {
        Node {
            kind,
            payload: Some(Arc::new(payload)),
            children,
            normalized: false,
        }
    }

    /// A node whose meaning is carried entirely by its kind and children.
    pub fn structural(kind: Kind, children: Vec<Node>) -> Self {
        Node {
            kind,
            payload: None,
            children,
            normalized: false,
        }
    }

    /// A childless node carrying a payload.
    pub fn leaf(kind: Kind, payload: impl Payload) -> Self {
        Node::new(kind, payload, Vec::new())
    }

    pub fn document(children: Vec<Node>) -> Self {
        Node::structural(Kind::DOCUMENT, children)
    }

    pub fn fragment(children: Vec<Node>) -> Self {
        Node::structural(Kind::FRAGMENT, children)
    }

    pub fn absent() -> Self {
        Node::default()
    }

    pub(crate) fn from_parts(
        kind: Kind,
        payload: Option<Arc<dyn Payload>>,
        children: Vec<Node>,
    ) -> Self {
        Node {
            kind,
            payload,
            children,
            normalized: false,
        }
    }

    pub fn is_absent(&self) -> bool {
        self.kind.is_empty() && self.payload.is_none() && self.children.is_empty()
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    pub fn is(&self, kind: &Kind) -> bool {
        &self.kind == kind
    }

    pub fn payload(&self) -> Option<&dyn Payload> {
        self.payload.as_deref()
    }

    /// Recovers the concrete payload type owned by this node's plugin.
    pub fn payload_as<T: Payload>(&self) -> Option<&T> {
        self.payload.as_deref()?.as_any().downcast_ref::<T>()
    }

    /// Literal text of the payload, if the payload exposes one.
    pub fn literal(&self) -> Option<&str> {
        self.payload.as_deref()?.literal()
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn into_children(self) -> Vec<Node> {
        self.children
    }

    /// Same kind and payload, new children.
    pub fn with_children(&self, children: Vec<Node>) -> Node {
        Node {
            kind: self.kind.clone(),
            payload: self.payload.clone(),
            children,
            normalized: false,
        }
    }

    pub(crate) fn replace_children(mut self, children: Vec<Node>) -> Node {
        self.children = children;
        self
    }

    /// Moves the children out, leaving the node childless.
    pub(crate) fn take_children(mut self) -> (Node, Vec<Node>) {
        let children = std::mem::take(&mut self.children);
        (self, children)
    }

    pub(crate) fn is_normalized(&self) -> bool {
        self.normalized
    }

    pub(crate) fn mark_normalized(mut self) -> Node {
        self.normalized = true;
        self
    }

    /// Number of levels in the tree rooted here (a leaf has depth 1).
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Node::depth).max().unwrap_or(0)
    }

    /// Concatenated literals of every descendant, in reading order.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        collect_literals(self, &mut out);
        out
    }
}

fn collect_literals(node: &Node, out: &mut String) {
    if let Some(literal) = node.literal() {
        out.push_str(literal);
    }
    for child in &node.children {
        collect_literals(child, out);
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        if self.kind != other.kind {
            return false;
        }
        let payload_eq = match (&self.payload, &other.payload) {
            (None, None) => true,
            (Some(a), Some(b)) => a.eq_payload(b.as_ref()),
            _ => false,
        };
        payload_eq && self.children == other.children
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_absent() {
            return f.write_str("Node(<absent>)");
        }
        let mut s = f.debug_struct("Node");
        s.field("kind", &self.kind.as_str());
        if let Some(payload) = &self.payload {
            s.field("payload", payload);
        }
        if !self.children.is_empty() {
            s.field("children", &self.children);
        }
        s.finish()
    }
}
