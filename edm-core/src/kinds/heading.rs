//! ATX and setext headings
//!
//! Headings emit in ATX form (`## Title`). A level 1 or 2 heading whose text
//! spans several lines can only be written as a setext heading, so it is.

use super::text::merge_text;
use crate::common::escape::escape_line_starts;
use crate::dispatch::{debug_line, Walk};
use crate::error::EdmError;
use crate::import::{ExternalKind, ImportContext};
use crate::node::{Kind, Node, Payload};
use crate::registry::KindRegistry;
use crate::spec::{Flow, NodeSpec};
use comrak::nodes::{AstNode, NodeValue};
use serde::{Deserialize, Serialize};

pub const HEADING: Kind = Kind::from_static("heading");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub level: u8,
}

impl Payload for Heading {}

pub fn heading(level: u8, children: Vec<Node>) -> Node {
    Node::new(HEADING, Heading { level }, children)
}

fn level_of(node: &Node) -> Result<u8, EdmError> {
    node.payload_as::<Heading>()
        .map(|h| h.level.clamp(1, 6))
        .ok_or_else(|| EdmError::payload_mismatch(node.kind()))
}

fn import_heading<'a>(
    node: &'a AstNode<'a>,
    cx: &ImportContext<'_>,
) -> Result<Vec<Node>, EdmError> {
    let level = match &node.data.borrow().value {
        NodeValue::Heading(h) => h.level,
        _ => return Err(cx.malformed(node, "expected a heading node")),
    };
    Ok(vec![heading(level, cx.import_children(node)?)])
}

fn emit_heading(node: &Node, walk: &Walk<'_>) -> Result<String, EdmError> {
    let level = level_of(node)?;
    let content = walk.markdown_children(node)?;
    if content.contains('\n') && level <= 2 {
        let underline = if level == 1 { "===" } else { "---" };
        return Ok(format!("{}\n{underline}\n\n", escape_line_starts(&content)));
    }
    let hashes = "#".repeat(usize::from(level));
    Ok(format!("{hashes} {}\n\n", content.replace('\n', " ")))
}

fn render_heading(node: &Node, walk: &Walk<'_>) -> Result<String, EdmError> {
    let level = level_of(node)?;
    Ok(format!("<h{level}>{}</h{level}>", walk.html_children(node)?))
}

fn debug_heading(node: &Node, indent: usize, walk: &Walk<'_>) -> Result<String, EdmError> {
    let level = level_of(node)?;
    Ok(debug_line(indent, format!("HEADING level={level}"))
        + &walk.debug_children(node, indent + 1)?)
}

pub fn register(registry: &mut KindRegistry) -> Result<(), EdmError> {
    registry.register_spec(
        NodeSpec::new(HEADING, Flow::Block)
            .children_flow(Flow::Inline)
            .coerce(|_, children, _| Ok(merge_text(children))),
    )?;
    registry.register_payload::<Heading>(HEADING)?;
    registry.register(HEADING, emit_heading, render_heading, debug_heading);
    registry.register_importer(ExternalKind::HEADING, import_heading);
    Ok(())
}
