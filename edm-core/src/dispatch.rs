//! Output dispatch
//!
//! The three output walks (Markdown, HTML, debug) look up the behavior
//! registered for a node's kind and call it with a [`Walk`] one level deeper.
//! Behaviors recurse by calling back into the walk for their children, so a
//! container never needs to know which kinds it holds. The absent node is the
//! identity of every walk and never reaches a behavior.

use crate::error::{DispatchError, EdmError, Output};
use crate::node::Node;
use crate::registry::KindRegistry;

/// Cursor of one output walk.
#[derive(Clone, Copy)]
pub struct Walk<'r> {
    registry: &'r KindRegistry,
    depth: usize,
    max_depth: usize,
}

impl<'r> Walk<'r> {
    pub fn new(registry: &'r KindRegistry, max_depth: usize) -> Self {
        Walk {
            registry,
            depth: 0,
            max_depth,
        }
    }

    pub fn registry(&self) -> &'r KindRegistry {
        self.registry
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    fn descend(&self) -> Result<Walk<'r>, EdmError> {
        let depth = self.depth + 1;
        if depth > self.max_depth {
            return Err(DispatchError::NestingTooDeep {
                limit: self.max_depth,
            }
            .into());
        }
        Ok(Walk { depth, ..*self })
    }

    fn unbound(node: &Node, output: Output) -> EdmError {
        DispatchError::NoBehavior {
            kind: node.kind().clone(),
            output,
        }
        .into()
    }

    /// Emits `node` as Markdown.
    pub fn markdown(&self, node: &Node) -> Result<String, EdmError> {
        if node.is_absent() {
            return Ok(String::new());
        }
        let inner = self.descend()?;
        let emitter = self
            .registry
            .markdown_emitter(node.kind())
            .ok_or_else(|| Self::unbound(node, Output::Markdown))?;
        emitter(node, &inner)
    }

    /// Renders `node` as an HTML fragment.
    pub fn html(&self, node: &Node) -> Result<String, EdmError> {
        if node.is_absent() {
            return Ok(String::new());
        }
        let inner = self.descend()?;
        let renderer = self
            .registry
            .html_renderer(node.kind())
            .ok_or_else(|| Self::unbound(node, Output::Html))?;
        renderer(node, &inner)
    }

    /// Prints `node` as an indented tree at nesting level `indent`.
    pub fn debug(&self, node: &Node, indent: usize) -> Result<String, EdmError> {
        if node.is_absent() {
            return Ok(format!("{}<nil>\n", pad(indent)));
        }
        let inner = self.descend()?;
        let printer = self
            .registry
            .debug_printer(node.kind())
            .ok_or_else(|| Self::unbound(node, Output::Debug))?;
        printer(node, indent, &inner)
    }

    /// Concatenated Markdown of every child.
    pub fn markdown_children(&self, node: &Node) -> Result<String, EdmError> {
        node.children().iter().map(|c| self.markdown(c)).collect()
    }

    /// Concatenated HTML of every child.
    pub fn html_children(&self, node: &Node) -> Result<String, EdmError> {
        node.children().iter().map(|c| self.html(c)).collect()
    }

    /// Debug dump of every child at nesting level `indent`.
    pub fn debug_children(&self, node: &Node, indent: usize) -> Result<String, EdmError> {
        node.children()
            .iter()
            .map(|c| self.debug(c, indent))
            .collect()
    }
}

/// Indentation for debug nesting level `level` (two spaces per level).
pub fn pad(level: usize) -> String {
    "  ".repeat(level)
}

/// One debug line: `label` at nesting level `indent`.
pub fn debug_line(indent: usize, label: impl AsRef<str>) -> String {
    format!("{}{}\n", pad(indent), label.as_ref())
}
