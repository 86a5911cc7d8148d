//! Paragraphs and plain (tight) paragraphs
//!
//! Inside a tight list the external parser still produces paragraphs; they
//! import as `plain` so that emitting them does not introduce blank lines and
//! HTML output does not wrap them in `<p>`.

use super::text::merge_text;
use crate::common::escape::escape_line_starts;
use crate::dispatch::{debug_line, Walk};
use crate::error::EdmError;
use crate::import::{ExternalKind, ImportContext};
use crate::node::{Kind, Node};
use crate::registry::KindRegistry;
use crate::spec::{Flow, NodeSpec, SpecTable};
use comrak::nodes::{AstNode, NodeValue};

pub const PARAGRAPH: Kind = Kind::from_static("paragraph");
pub const PLAIN: Kind = Kind::from_static("plain");

pub fn paragraph(children: Vec<Node>) -> Node {
    Node::structural(PARAGRAPH, children)
}

pub fn plain(children: Vec<Node>) -> Node {
    Node::structural(PLAIN, children)
}

fn reject_blocks(parent: &Node, children: Vec<Node>, table: &SpecTable) -> Result<Vec<Node>, EdmError> {
    if let Some(block) = children
        .iter()
        .find(|child| table.flow_of(child.kind()) == Some(Flow::Block))
    {
        return Err(EdmError::rejected(
            parent.kind(),
            format!("block child {} in inline content", block.kind()),
        ));
    }
    Ok(merge_text(children))
}

fn spec(kind: Kind) -> NodeSpec {
    NodeSpec::new(kind, Flow::Block)
        .children_flow(Flow::Inline)
        .coerce(reject_blocks)
}

/// True when the paragraph sits directly in an item of a tight list.
fn in_tight_list<'a>(node: &'a AstNode<'a>) -> bool {
    let Some(item) = node.parent() else {
        return false;
    };
    if !matches!(item.data.borrow().value, NodeValue::Item(..)) {
        return false;
    }
    let Some(list) = item.parent() else {
        return false;
    };
    let tight = matches!(&list.data.borrow().value, NodeValue::List(nl) if nl.tight);
    tight
}

fn import_paragraph<'a>(
    node: &'a AstNode<'a>,
    cx: &ImportContext<'_>,
) -> Result<Vec<Node>, EdmError> {
    let children = cx.import_children(node)?;
    let kind = if in_tight_list(node) { PLAIN } else { PARAGRAPH };
    Ok(vec![Node::structural(kind, children)])
}

fn emit_paragraph(node: &Node, walk: &Walk<'_>) -> Result<String, EdmError> {
    Ok(escape_line_starts(&walk.markdown_children(node)?) + "\n\n")
}

fn emit_plain(node: &Node, walk: &Walk<'_>) -> Result<String, EdmError> {
    Ok(escape_line_starts(&walk.markdown_children(node)?) + "\n")
}

fn render_paragraph(node: &Node, walk: &Walk<'_>) -> Result<String, EdmError> {
    Ok(format!("<p>{}</p>", walk.html_children(node)?))
}

fn render_plain(node: &Node, walk: &Walk<'_>) -> Result<String, EdmError> {
    walk.html_children(node)
}

pub fn register(registry: &mut KindRegistry) -> Result<(), EdmError> {
    registry.register_spec(spec(PARAGRAPH))?;
    registry.register_spec(spec(PLAIN))?;

    registry.register(
        PARAGRAPH,
        emit_paragraph,
        render_paragraph,
        |node, indent, walk| {
            Ok(debug_line(indent, "PARAGRAPH") + &walk.debug_children(node, indent + 1)?)
        },
    );
    registry.register(PLAIN, emit_plain, render_plain, |node, indent, walk| {
        Ok(debug_line(indent, "PLAIN") + &walk.debug_children(node, indent + 1)?)
    });

    registry.register_importer(ExternalKind::PARAGRAPH, import_paragraph);
    Ok(())
}
