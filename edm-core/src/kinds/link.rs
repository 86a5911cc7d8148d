//! Links and images

use super::text::merge_text;
use crate::common::escape::escape_html;
use crate::dispatch::{debug_line, Walk};
use crate::error::EdmError;
use crate::import::{ExternalKind, ImportContext};
use crate::node::{Kind, Node, Payload};
use crate::registry::KindRegistry;
use crate::spec::{Flow, NodeSpec};
use comrak::nodes::{AstNode, NodeValue};
use serde::{Deserialize, Serialize};

pub const LINK: Kind = Kind::from_static("link");
pub const IMAGE: Kind = Kind::from_static("image");

/// Destination shared by links and images.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Target {
    pub url: String,
    pub title: String,
}

impl Payload for Target {}

pub fn link(url: impl Into<String>, title: impl Into<String>, children: Vec<Node>) -> Node {
    Node::new(
        LINK,
        Target {
            url: url.into(),
            title: title.into(),
        },
        children,
    )
}

pub fn image(url: impl Into<String>, title: impl Into<String>, alt: Vec<Node>) -> Node {
    Node::new(
        IMAGE,
        Target {
            url: url.into(),
            title: title.into(),
        },
        alt,
    )
}

fn target_of(node: &Node) -> Result<&Target, EdmError> {
    node.payload_as::<Target>()
        .ok_or_else(|| EdmError::payload_mismatch(node.kind()))
}

fn import_target<'a>(node: &'a AstNode<'a>, cx: &ImportContext<'_>) -> Result<Target, EdmError> {
    match &node.data.borrow().value {
        NodeValue::Link(l) | NodeValue::Image(l) => Ok(Target {
            url: l.url.clone(),
            title: l.title.clone(),
        }),
        _ => Err(cx.malformed(node, "expected a link or image")),
    }
}

fn import_link<'a>(node: &'a AstNode<'a>, cx: &ImportContext<'_>) -> Result<Vec<Node>, EdmError> {
    let target = import_target(node, cx)?;
    Ok(vec![Node::new(LINK, target, cx.import_children(node)?)])
}

fn import_image<'a>(node: &'a AstNode<'a>, cx: &ImportContext<'_>) -> Result<Vec<Node>, EdmError> {
    let target = import_target(node, cx)?;
    Ok(vec![Node::new(IMAGE, target, cx.import_children(node)?)])
}

/// `(url "title")` with the destination bracketed when it would not parse
/// bare.
fn destination(target: &Target) -> String {
    let bare_ok = !target.url.is_empty()
        && !target
            .url
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '<' | '>' | '(' | ')'));
    let url = if bare_ok {
        target.url.clone()
    } else {
        format!("<{}>", target.url.replace('<', "\\<").replace('>', "\\>"))
    };
    if target.title.is_empty() {
        format!("({url})")
    } else {
        let title = target.title.replace('\\', "\\\\").replace('"', "\\\"");
        format!("({url} \"{title}\")")
    }
}

fn emit_link(node: &Node, walk: &Walk<'_>) -> Result<String, EdmError> {
    let target = target_of(node)?;
    Ok(format!("[{}]{}", walk.markdown_children(node)?, destination(target)))
}

fn emit_image(node: &Node, walk: &Walk<'_>) -> Result<String, EdmError> {
    let target = target_of(node)?;
    Ok(format!("![{}]{}", walk.markdown_children(node)?, destination(target)))
}

fn title_attr(target: &Target) -> String {
    if target.title.is_empty() {
        String::new()
    } else {
        format!(" title=\"{}\"", escape_html(&target.title))
    }
}

fn render_link(node: &Node, walk: &Walk<'_>) -> Result<String, EdmError> {
    let target = target_of(node)?;
    Ok(format!(
        "<a href=\"{}\"{}>{}</a>",
        escape_html(&target.url),
        title_attr(target),
        walk.html_children(node)?
    ))
}

fn render_image(node: &Node, _walk: &Walk<'_>) -> Result<String, EdmError> {
    let target = target_of(node)?;
    Ok(format!(
        "<img src=\"{}\" alt=\"{}\"{} />",
        escape_html(&target.url),
        escape_html(&node.plain_text()),
        title_attr(target)
    ))
}

fn debug_target(
    label: &'static str,
) -> impl Fn(&Node, usize, &Walk<'_>) -> Result<String, EdmError> {
    move |node: &Node, indent: usize, walk: &Walk<'_>| {
        let target = target_of(node)?;
        let header = format!("{label} url={:?} title={:?}", target.url, target.title);
        Ok(debug_line(indent, header) + &walk.debug_children(node, indent + 1)?)
    }
}

fn spec(kind: Kind) -> NodeSpec {
    NodeSpec::new(kind, Flow::Inline)
        .children_flow(Flow::Inline)
        .coerce(|_, children, _| Ok(merge_text(children)))
}

pub fn register(registry: &mut KindRegistry) -> Result<(), EdmError> {
    registry.register_spec(spec(LINK))?;
    registry.register_spec(spec(IMAGE))?;
    registry.register_payload::<Target>(LINK)?;
    registry.register_payload::<Target>(IMAGE)?;

    registry.register(LINK, emit_link, render_link, debug_target("LINK"));
    registry.register(IMAGE, emit_image, render_image, debug_target("IMAGE"));

    registry.register_importer(ExternalKind::LINK, import_link);
    registry.register_importer(ExternalKind::IMAGE, import_image);
    Ok(())
}
