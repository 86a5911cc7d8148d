//! Kinds registered from outside the crate
//!
//! Inline HTML has no built-in importer. A downstream crate can claim it with
//! its own kind without touching anything in edm-core.

use comrak::nodes::{AstNode, NodeValue};
use edm_core::dispatch::{debug_line, Walk};
use edm_core::kinds::emphasis::{emph, EMPH};
use edm_core::kinds::paragraph::paragraph;
use edm_core::kinds::text::text;
use edm_core::{
    DocModel, EdmError, ExternalKind, Flow, ImportContext, Kind, KindRegistry, Node, NodeSpec,
    Options, Payload,
};
use serde::{Deserialize, Serialize};

const RAW_HTML: Kind = Kind::from_static("raw_html");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct RawHtml(String);

impl Payload for RawHtml {}

fn raw(node: &Node) -> Result<&str, EdmError> {
    node.payload_as::<RawHtml>()
        .map(|r| r.0.as_str())
        .ok_or_else(|| EdmError::payload_mismatch(node.kind()))
}

fn import_raw<'a>(node: &'a AstNode<'a>, cx: &ImportContext<'_>) -> Result<Vec<Node>, EdmError> {
    match &node.data.borrow().value {
        NodeValue::HtmlInline(html) => Ok(vec![Node::leaf(RAW_HTML, RawHtml(html.clone()))]),
        _ => Err(cx.malformed(node, "expected inline html")),
    }
}

fn model_with_raw_html() -> DocModel {
    let mut registry = KindRegistry::with_defaults().unwrap();
    registry
        .register_spec(NodeSpec::new(RAW_HTML, Flow::Inline))
        .unwrap();
    registry.register_payload::<RawHtml>(RAW_HTML).unwrap();
    registry.register(
        RAW_HTML,
        |node: &Node, _: &Walk<'_>| raw(node).map(str::to_string),
        |node: &Node, _: &Walk<'_>| raw(node).map(str::to_string),
        |node: &Node, indent: usize, _: &Walk<'_>| {
            Ok(debug_line(indent, format!("RAW_HTML({:?})", raw(node)?)))
        },
    );
    registry.register_importer(ExternalKind::HTML_INLINE, import_raw);
    DocModel::new(registry, Options::default())
}

#[test]
fn test_new_kind_participates_everywhere() {
    let model = model_with_raw_html();
    let tree = model.parse_markdown("a <b>x</b>").unwrap();
    assert_eq!(
        tree,
        paragraph(vec![
            text("a "),
            Node::leaf(RAW_HTML, RawHtml("<b>".into())),
            text("x"),
            Node::leaf(RAW_HTML, RawHtml("</b>".into())),
        ])
    );
    assert_eq!(model.to_html(&tree).unwrap(), "<p>a <b>x</b></p>");
    assert_eq!(model.to_markdown(&tree).unwrap(), "a <b>x</b>\n\n");

    let json = model.to_json(&tree).unwrap();
    assert_eq!(model.parse_json(&json).unwrap(), tree);
}

#[test]
fn test_new_inline_kind_is_admitted_by_existing_containers() {
    let model = model_with_raw_html();
    let tree = emph(vec![Node::leaf(RAW_HTML, RawHtml("<br>".into()))]);
    assert!(model.normalize(tree).is_ok());
}

#[test]
fn test_output_behavior_can_be_replaced() {
    let mut registry = KindRegistry::with_defaults().unwrap();
    registry.register_html(EMPH, |node: &Node, walk: &Walk<'_>| {
        Ok(format!("<i>{}</i>", walk.html_children(node)?))
    });
    let model = DocModel::new(registry, Options::default());
    let tree = model.parse_markdown("*x*").unwrap();
    assert_eq!(model.to_html(&tree).unwrap(), "<p><i>x</i></p>");
}

#[test]
fn test_default_model_rejects_the_unknown_kind() {
    let model = DocModel::with_defaults().unwrap();
    let tree = paragraph(vec![Node::leaf(RAW_HTML, RawHtml("<b>".into()))]);
    assert!(model.normalize(tree.clone()).is_err());
    assert!(model.to_html(&tree).is_err());
}
