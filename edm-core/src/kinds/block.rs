//! Block quotes and thematic breaks

use crate::common::escape::prefix_lines;
use crate::dispatch::{debug_line, Walk};
use crate::error::EdmError;
use crate::import::{ExternalKind, ImportContext};
use crate::node::{Kind, Node};
use crate::registry::KindRegistry;
use crate::spec::{Flow, NodeSpec};
use comrak::nodes::AstNode;

pub const BLOCK_QUOTE: Kind = Kind::from_static("block_quote");
pub const THEMATIC_BREAK: Kind = Kind::from_static("thematic_break");

pub fn block_quote(children: Vec<Node>) -> Node {
    Node::structural(BLOCK_QUOTE, children)
}

pub fn thematic_break() -> Node {
    Node::structural(THEMATIC_BREAK, Vec::new())
}

fn import_block_quote<'a>(
    node: &'a AstNode<'a>,
    cx: &ImportContext<'_>,
) -> Result<Vec<Node>, EdmError> {
    Ok(vec![block_quote(cx.import_children(node)?)])
}

fn import_thematic_break<'a>(
    _node: &'a AstNode<'a>,
    _cx: &ImportContext<'_>,
) -> Result<Vec<Node>, EdmError> {
    Ok(vec![thematic_break()])
}

fn emit_block_quote(node: &Node, walk: &Walk<'_>) -> Result<String, EdmError> {
    let mut blocks = Vec::new();
    for child in node.children() {
        let emitted = walk.markdown(child)?;
        let emitted = emitted.trim_end_matches('\n');
        if !emitted.is_empty() {
            blocks.push(emitted.to_string());
        }
    }
    if blocks.is_empty() {
        return Ok(">\n\n".to_string());
    }
    Ok(prefix_lines(&blocks.join("\n\n"), "> ", "> ", ">") + "\n\n")
}

pub fn register(registry: &mut KindRegistry) -> Result<(), EdmError> {
    registry.register_spec(NodeSpec::new(BLOCK_QUOTE, Flow::Block).children_flow(Flow::Block))?;
    registry.register_spec(NodeSpec::new(THEMATIC_BREAK, Flow::Block))?;

    registry.register(
        BLOCK_QUOTE,
        emit_block_quote,
        |node, walk| Ok(format!("<blockquote>{}</blockquote>", walk.html_children(node)?)),
        |node, indent, walk| {
            Ok(debug_line(indent, "BLOCK_QUOTE") + &walk.debug_children(node, indent + 1)?)
        },
    );
    registry.register(
        THEMATIC_BREAK,
        |_, _| Ok("***\n\n".to_string()),
        |_, _| Ok("<hr />".to_string()),
        |_, indent, _| Ok(debug_line(indent, "THEMATIC_BREAK")),
    );

    registry.register_importer(ExternalKind::BLOCK_QUOTE, import_block_quote);
    registry.register_importer(ExternalKind::THEMATIC_BREAK, import_thematic_break);
    Ok(())
}
