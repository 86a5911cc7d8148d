//! Structural specs and tree normalization.
//!
//! Every kind may register one [`NodeSpec`] describing its flow (inline or
//! block) and which children it admits. Normalization walks a freshly built
//! tree post-order and rejects any node whose children break its spec. This
//! is what lets a paragraph refuse a nested list without knowing which
//! inline kinds exist: a new inline plugin only has to declare
//! `Flow::Inline` to become a legal paragraph child.
//!
//! Kinds without a spec are passed through unexamined. As a child, a
//! fragment is transparent: it is admitted when every one of its own
//! children would be.

use crate::error::{ConfigurationError, EdmError, ValidationError};
use crate::node::{Kind, Node};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Inline vs. block classification used for nesting rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flow {
    Inline,
    Block,
}

/// Which children a kind admits.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChildRule {
    /// The kind must be childless.
    #[default]
    None,
    /// Any child whose own spec declares this flow.
    Flow(Flow),
    /// Exactly these kinds.
    Kinds(Vec<Kind>),
}

/// Reshapes or rejects already-normalized children before admission. The
/// node is handed over with its children taken out.
pub type CoerceFn =
    Box<dyn Fn(&Node, Vec<Node>, &SpecTable) -> Result<Vec<Node>, EdmError> + Send + Sync>;

/// Per-kind structural contract.
pub struct NodeSpec {
    pub kind: Kind,
    pub flow: Flow,
    pub children: ChildRule,
    pub coerce: Option<CoerceFn>,
}

impl NodeSpec {
    /// A childless spec; chain [`NodeSpec::children_flow`] or
    /// [`NodeSpec::allowed_children`] to admit children.
    pub fn new(kind: Kind, flow: Flow) -> Self {
        NodeSpec {
            kind,
            flow,
            children: ChildRule::None,
            coerce: None,
        }
    }

    pub fn children_flow(mut self, flow: Flow) -> Self {
        self.children = ChildRule::Flow(flow);
        self
    }

    pub fn allowed_children(mut self, kinds: impl IntoIterator<Item = Kind>) -> Self {
        self.children = ChildRule::Kinds(kinds.into_iter().collect());
        self
    }

    pub fn coerce<F>(mut self, f: F) -> Self
    where
        F: Fn(&Node, Vec<Node>, &SpecTable) -> Result<Vec<Node>, EdmError> + Send + Sync + 'static,
    {
        self.coerce = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for NodeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeSpec")
            .field("kind", &self.kind)
            .field("flow", &self.flow)
            .field("children", &self.children)
            .field("coerce", &self.coerce.is_some())
            .finish()
    }
}

/// One spec per kind, registered once at startup.
#[derive(Debug, Default)]
pub struct SpecTable {
    specs: HashMap<Kind, NodeSpec>,
}

impl SpecTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a spec. A second spec for the same kind is a configuration
    /// error; unlike output behaviors, specs are never replaced.
    pub fn register(&mut self, spec: NodeSpec) -> Result<(), ConfigurationError> {
        if self.specs.contains_key(&spec.kind) {
            return Err(ConfigurationError::DuplicateSpec { kind: spec.kind });
        }
        debug!(kind = %spec.kind, flow = ?spec.flow, "registered node spec");
        self.specs.insert(spec.kind.clone(), spec);
        Ok(())
    }

    pub fn get(&self, kind: &Kind) -> Option<&NodeSpec> {
        self.specs.get(kind)
    }

    pub fn flow_of(&self, kind: &Kind) -> Option<Flow> {
        self.get(kind).map(|spec| spec.flow)
    }

    /// Registered kinds, sorted.
    pub fn kinds(&self) -> Vec<&Kind> {
        let mut kinds: Vec<_> = self.specs.keys().collect();
        kinds.sort();
        kinds
    }

    /// Validates `node` and its whole subtree, children before parents.
    ///
    /// Either the entire tree is valid and returned (possibly reshaped by
    /// coercion functions), or the first violation is returned. A partially
    /// fixed tree never escapes.
    pub fn normalize(&self, node: Node) -> Result<Node, EdmError> {
        if node.is_absent() {
            return Ok(node);
        }
        let (node, children) = node.take_children();
        let children = self.normalize_all(children)?;
        self.normalize_shallow(node.replace_children(children))
    }

    /// Normalization for trees built during import. Subtrees an earlier
    /// import step already validated are admitted as they are, so each node
    /// is examined once no matter how deep it sits.
    pub(crate) fn normalize_imported(&self, node: Node) -> Result<Node, EdmError> {
        if node.is_absent() || node.is_normalized() {
            return Ok(node);
        }
        let (node, children) = node.take_children();
        let children = children
            .into_iter()
            .map(|child| self.normalize_imported(child))
            .collect::<Result<Vec<_>, _>>()?;
        let node = self.normalize_shallow(node.replace_children(children))?;
        Ok(node.mark_normalized())
    }

    /// Coerces and admits the children of `node` without descending into
    /// them. The children must already be normalized, as everything an
    /// importer receives from the import continuation is.
    pub fn normalize_shallow(&self, node: Node) -> Result<Node, EdmError> {
        if node.is_absent() {
            return Ok(node);
        }

        // Open kinds degrade gracefully; their subtree was validated below.
        let Some(spec) = self.get(node.kind()) else {
            return Ok(node);
        };

        let (node, mut children) = node.take_children();
        if let Some(coerce) = &spec.coerce {
            children = coerce(&node, children, self)?;
        }

        match &spec.children {
            ChildRule::None => {
                if !children.is_empty() {
                    debug!(kind = %spec.kind, "rejected children of childless kind");
                    return Err(ValidationError::ChildrenForbidden {
                        kind: spec.kind.clone(),
                    }
                    .into());
                }
            }
            rule => {
                for child in &children {
                    self.admit(rule, node.kind(), child)?;
                }
            }
        }

        Ok(node.replace_children(children))
    }

    fn normalize_all(&self, children: Vec<Node>) -> Result<Vec<Node>, EdmError> {
        children
            .into_iter()
            .map(|child| self.normalize(child))
            .collect()
    }

    fn admit(&self, rule: &ChildRule, parent: &Kind, child: &Node) -> Result<(), EdmError> {
        let allowed = match rule {
            ChildRule::None => false,
            ChildRule::Kinds(kinds) => kinds.contains(child.kind()),
            ChildRule::Flow(flow) => self.flow_of(child.kind()) == Some(*flow),
        };
        if allowed {
            return Ok(());
        }

        if child.is(&Kind::FRAGMENT) && self.get(&Kind::FRAGMENT).is_none() {
            for grandchild in child.children() {
                self.admit(rule, parent, grandchild)?;
            }
            return Ok(());
        }

        debug!(child = %child.kind(), parent = %parent, "child not admitted");
        Err(ValidationError::ChildNotAllowed {
            child: child.kind().clone(),
            parent: parent.clone(),
        }
        .into())
    }
}

/// Coercion shared by inline containers: merges runs of adjacent nodes of
/// `text_kind` through `merge`, so that the same text always ends up in one
/// node no matter how the external parser split it.
pub fn merge_adjacent(
    children: Vec<Node>,
    text_kind: &Kind,
    merge: impl Fn(&Node, &Node) -> Option<Node>,
) -> Vec<Node> {
    let mut out: Vec<Node> = Vec::with_capacity(children.len());
    for child in children {
        if child.is(text_kind) {
            if let Some(last) = out.last_mut().filter(|last| last.is(text_kind)) {
                if let Some(merged) = merge(last, &child) {
                    *last = merged;
                    continue;
                }
            }
        }
        out.push(child);
    }
    out
}

/// Wraps runs of consecutive inline children into block nodes built by
/// `wrap`, leaving block children in place.
pub fn wrap_inlines(
    children: Vec<Node>,
    table: &SpecTable,
    wrap: impl Fn(Vec<Node>) -> Result<Node, EdmError>,
) -> Result<Vec<Node>, EdmError> {
    let mut out = Vec::new();
    let mut run = Vec::new();
    for child in children {
        if table.flow_of(child.kind()) == Some(Flow::Inline) {
            run.push(child);
        } else {
            if !run.is_empty() {
                out.push(wrap(std::mem::take(&mut run))?);
            }
            out.push(child);
        }
    }
    if !run.is_empty() {
        out.push(wrap(run)?);
    }
    Ok(out)
}
