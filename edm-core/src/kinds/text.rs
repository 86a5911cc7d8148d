//! Text and hard line breaks
//!
//! Soft breaks do not get a kind of their own: they import as text, either a
//! space or a newline depending on [`Options::soft_break`](crate::options::Options).
//! Inline containers merge adjacent text nodes during normalization, so the
//! way the parser happened to split a run of characters never leaks into the
//! tree.

use crate::common::escape::escape_markdown_text;
use crate::dispatch::{debug_line, Walk};
use crate::error::EdmError;
use crate::import::{ExternalKind, ImportContext};
use crate::node::{Kind, Node, Payload};
use crate::registry::KindRegistry;
use crate::spec::{merge_adjacent, Flow, NodeSpec};
use comrak::nodes::{AstNode, NodeValue};
use serde::{Deserialize, Serialize};

pub const TEXT: Kind = Kind::from_static("text");
pub const HARD_BREAK: Kind = Kind::from_static("hard_break");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Text {
    pub value: String,
}

impl Payload for Text {
    fn literal(&self) -> Option<&str> {
        Some(&self.value)
    }
}

pub fn text(value: impl Into<String>) -> Node {
    Node::leaf(
        TEXT,
        Text {
            value: value.into(),
        },
    )
}

pub fn hard_break() -> Node {
    Node::structural(HARD_BREAK, Vec::new())
}

/// Coalesces adjacent text nodes. Used as the coercion of inline containers.
pub fn merge_text(children: Vec<Node>) -> Vec<Node> {
    merge_adjacent(children, &TEXT, |a, b| {
        Some(text(format!("{}{}", a.literal()?, b.literal()?)))
    })
}

fn value_of(node: &Node) -> Result<&str, EdmError> {
    node.payload_as::<Text>()
        .map(|t| t.value.as_str())
        .ok_or_else(|| EdmError::payload_mismatch(node.kind()))
}

fn import_text<'a>(node: &'a AstNode<'a>, cx: &ImportContext<'_>) -> Result<Vec<Node>, EdmError> {
    match &node.data.borrow().value {
        NodeValue::Text(value) if value.is_empty() => Ok(Vec::new()),
        NodeValue::Text(value) => Ok(vec![text(value.clone())]),
        _ => Err(cx.malformed(node, "expected a text node")),
    }
}

fn import_soft_break<'a>(
    _node: &'a AstNode<'a>,
    cx: &ImportContext<'_>,
) -> Result<Vec<Node>, EdmError> {
    Ok(vec![text(cx.options().soft_break.as_str())])
}

fn import_line_break<'a>(
    _node: &'a AstNode<'a>,
    _cx: &ImportContext<'_>,
) -> Result<Vec<Node>, EdmError> {
    Ok(vec![hard_break()])
}

fn emit_text(node: &Node, _walk: &Walk<'_>) -> Result<String, EdmError> {
    let mut out = escape_markdown_text(value_of(node)?);
    // A link may follow, and `![` opens an image.
    if out.ends_with('!') {
        out.insert(out.len() - 1, '\\');
    }
    Ok(out)
}

// Text goes to HTML as-is; escaping it is the embedding page's concern.
fn render_text(node: &Node, _walk: &Walk<'_>) -> Result<String, EdmError> {
    Ok(value_of(node)?.to_string())
}

fn debug_text(node: &Node, indent: usize, _walk: &Walk<'_>) -> Result<String, EdmError> {
    Ok(debug_line(indent, format!("TEXT({:?})", value_of(node)?)))
}

pub fn register(registry: &mut KindRegistry) -> Result<(), EdmError> {
    registry.register_spec(NodeSpec::new(TEXT, Flow::Inline))?;
    registry.register_spec(NodeSpec::new(HARD_BREAK, Flow::Inline))?;
    registry.register_payload::<Text>(TEXT)?;

    registry.register(TEXT, emit_text, render_text, debug_text);
    registry.register(
        HARD_BREAK,
        |_, _| Ok("\\\n".to_string()),
        |_, _| Ok("<br />".to_string()),
        |_, indent, _| Ok(debug_line(indent, "HARD_BREAK")),
    );

    registry.register_importer(ExternalKind::TEXT, import_text);
    registry.register_importer(ExternalKind::SOFT_BREAK, import_soft_break);
    registry.register_importer(ExternalKind::LINE_BREAK, import_line_break);
    Ok(())
}
