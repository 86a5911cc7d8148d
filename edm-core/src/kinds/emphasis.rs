//! Emphasis, strong emphasis and strikethrough
//!
//! Delimiters are chosen so that nested emphasis survives a round trip.
//! `*` and `**` are used wherever possible: unlike `_`, they open and close
//! inside words, and merged runs such as `***b***` or `***a** b*` re-parse
//! to the same nesting. The one shape `*` runs cannot express is a lone
//! `emph` child, since `**x**` and `***x***` read as strong on the outside.
//! Those nodes use `_` and `__` instead.

use super::text::merge_text;
use crate::dispatch::{debug_line, Walk};
use crate::error::EdmError;
use crate::import::{ExternalKind, ImportContext};
use crate::node::{Kind, Node};
use crate::registry::KindRegistry;
use crate::spec::{Flow, NodeSpec};
use comrak::nodes::AstNode;

pub const EMPH: Kind = Kind::from_static("emph");
pub const STRONG: Kind = Kind::from_static("strong");
pub const STRIKE: Kind = Kind::from_static("strike");

pub fn emph(children: Vec<Node>) -> Node {
    Node::structural(EMPH, children)
}

pub fn strong(children: Vec<Node>) -> Node {
    Node::structural(STRONG, children)
}

pub fn strike(children: Vec<Node>) -> Node {
    Node::structural(STRIKE, children)
}

fn spec(kind: Kind) -> NodeSpec {
    NodeSpec::new(kind, Flow::Inline)
        .children_flow(Flow::Inline)
        .coerce(|_, children, _| Ok(merge_text(children)))
}

fn import_as<'a>(
    kind: Kind,
    node: &'a AstNode<'a>,
    cx: &ImportContext<'_>,
) -> Result<Vec<Node>, EdmError> {
    Ok(vec![Node::structural(kind, cx.import_children(node)?)])
}

fn import_emph<'a>(node: &'a AstNode<'a>, cx: &ImportContext<'_>) -> Result<Vec<Node>, EdmError> {
    import_as(EMPH, node, cx)
}

fn import_strong<'a>(
    node: &'a AstNode<'a>,
    cx: &ImportContext<'_>,
) -> Result<Vec<Node>, EdmError> {
    import_as(STRONG, node, cx)
}

fn import_strike<'a>(
    node: &'a AstNode<'a>,
    cx: &ImportContext<'_>,
) -> Result<Vec<Node>, EdmError> {
    import_as(STRIKE, node, cx)
}

fn wraps_lone_emph(node: &Node) -> bool {
    matches!(node.children(), [only] if only.is(&EMPH))
}

fn delimited(node: &Node, walk: &Walk<'_>, delimiter: &str) -> Result<String, EdmError> {
    let inner = walk.markdown_children(node)?;
    Ok(format!("{delimiter}{inner}{delimiter}"))
}

fn emit_emph(node: &Node, walk: &Walk<'_>) -> Result<String, EdmError> {
    let delimiter = if wraps_lone_emph(node) { "_" } else { "*" };
    delimited(node, walk, delimiter)
}

fn emit_strong(node: &Node, walk: &Walk<'_>) -> Result<String, EdmError> {
    let delimiter = if wraps_lone_emph(node) { "__" } else { "**" };
    delimited(node, walk, delimiter)
}

fn emit_strike(node: &Node, walk: &Walk<'_>) -> Result<String, EdmError> {
    delimited(node, walk, "~~")
}

fn html_tag(tag: &'static str) -> impl Fn(&Node, &Walk<'_>) -> Result<String, EdmError> {
    move |node: &Node, walk: &Walk<'_>| {
        Ok(format!("<{tag}>{}</{tag}>", walk.html_children(node)?))
    }
}

fn debug_label(
    label: &'static str,
) -> impl Fn(&Node, usize, &Walk<'_>) -> Result<String, EdmError> {
    move |node: &Node, indent: usize, walk: &Walk<'_>| {
        let mut out = debug_line(indent, label);
        if node.children().is_empty() {
            out.push_str(&debug_line(indent + 1, "<no children>"));
        } else {
            out.push_str(&walk.debug_children(node, indent + 1)?);
        }
        Ok(out)
    }
}

pub fn register(registry: &mut KindRegistry) -> Result<(), EdmError> {
    registry.register_spec(spec(EMPH))?;
    registry.register_spec(spec(STRONG))?;
    registry.register_spec(spec(STRIKE))?;

    registry.register(EMPH, emit_emph, html_tag("em"), debug_label("EMPH"));
    registry.register(STRONG, emit_strong, html_tag("strong"), debug_label("STRONG"));
    registry.register(STRIKE, emit_strike, html_tag("del"), debug_label("STRIKE"));

    registry.register_importer(ExternalKind::EMPH, import_emph);
    registry.register_importer(ExternalKind::STRONG, import_strong);
    registry.register_importer(ExternalKind::STRIKETHROUGH, import_strike);
    Ok(())
}
