//! Code spans and code blocks
//!
//! Both kinds are childless: the code is the payload literal. Fences are
//! always longer than any run of the fence character inside the code.

use crate::common::escape::{escape_html, longest_run};
use crate::dispatch::{debug_line, Walk};
use crate::error::EdmError;
use crate::import::{ExternalKind, ImportContext};
use crate::node::{Kind, Node, Payload};
use crate::registry::KindRegistry;
use crate::spec::{Flow, NodeSpec};
use comrak::nodes::{AstNode, NodeValue};
use serde::{Deserialize, Serialize};

pub const CODE: Kind = Kind::from_static("code");
pub const CODE_BLOCK: Kind = Kind::from_static("code_block");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeSpan {
    pub literal: String,
}

impl Payload for CodeSpan {
    fn literal(&self) -> Option<&str> {
        Some(&self.literal)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeBlock {
    /// Info string after the opening fence, usually the language.
    pub info: String,
    pub literal: String,
}

impl Payload for CodeBlock {
    fn literal(&self) -> Option<&str> {
        Some(&self.literal)
    }
}

pub fn code(literal: impl Into<String>) -> Node {
    Node::leaf(
        CODE,
        CodeSpan {
            literal: literal.into(),
        },
    )
}

pub fn code_block(info: impl Into<String>, literal: impl Into<String>) -> Node {
    Node::leaf(
        CODE_BLOCK,
        CodeBlock {
            info: info.into(),
            literal: literal.into(),
        },
    )
}

fn import_code<'a>(node: &'a AstNode<'a>, cx: &ImportContext<'_>) -> Result<Vec<Node>, EdmError> {
    match &node.data.borrow().value {
        NodeValue::Code(c) => Ok(vec![code(c.literal.clone())]),
        _ => Err(cx.malformed(node, "expected a code span")),
    }
}

fn import_code_block<'a>(
    node: &'a AstNode<'a>,
    cx: &ImportContext<'_>,
) -> Result<Vec<Node>, EdmError> {
    match &node.data.borrow().value {
        NodeValue::CodeBlock(block) => Ok(vec![code_block(
            block.info.trim(),
            block.literal.clone(),
        )]),
        _ => Err(cx.malformed(node, "expected a code block")),
    }
}

fn span_of(node: &Node) -> Result<&CodeSpan, EdmError> {
    node.payload_as::<CodeSpan>()
        .ok_or_else(|| EdmError::payload_mismatch(node.kind()))
}

fn block_of(node: &Node) -> Result<&CodeBlock, EdmError> {
    node.payload_as::<CodeBlock>()
        .ok_or_else(|| EdmError::payload_mismatch(node.kind()))
}

fn emit_code(node: &Node, _walk: &Walk<'_>) -> Result<String, EdmError> {
    let literal = &span_of(node)?.literal;
    let fence = "`".repeat(longest_run(literal, '`') + 1);
    let padded = literal.starts_with('`')
        || literal.ends_with('`')
        || (literal.starts_with(' ') && literal.ends_with(' ') && !literal.trim().is_empty());
    if padded {
        Ok(format!("{fence} {literal} {fence}"))
    } else {
        Ok(format!("{fence}{literal}{fence}"))
    }
}

fn emit_code_block(node: &Node, _walk: &Walk<'_>) -> Result<String, EdmError> {
    let block = block_of(node)?;
    let fence_char = if block.info.contains('`') { '~' } else { '`' };
    let width = (longest_run(&block.literal, fence_char) + 1).max(3);
    let fence = fence_char.to_string().repeat(width);

    let mut out = format!("{fence}{}\n{}", block.info, block.literal);
    if !block.literal.is_empty() && !block.literal.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&fence);
    out.push_str("\n\n");
    Ok(out)
}

fn render_code(node: &Node, _walk: &Walk<'_>) -> Result<String, EdmError> {
    Ok(format!("<code>{}</code>", escape_html(&span_of(node)?.literal)))
}

fn render_code_block(node: &Node, _walk: &Walk<'_>) -> Result<String, EdmError> {
    let block = block_of(node)?;
    let code = escape_html(&block.literal);
    match block.info.split_whitespace().next() {
        Some(lang) => Ok(format!(
            "<pre><code class=\"language-{}\">{code}</code></pre>",
            escape_html(lang)
        )),
        None => Ok(format!("<pre><code>{code}</code></pre>")),
    }
}

pub fn register(registry: &mut KindRegistry) -> Result<(), EdmError> {
    registry.register_spec(NodeSpec::new(CODE, Flow::Inline))?;
    registry.register_spec(NodeSpec::new(CODE_BLOCK, Flow::Block))?;
    registry.register_payload::<CodeSpan>(CODE)?;
    registry.register_payload::<CodeBlock>(CODE_BLOCK)?;

    registry.register(CODE, emit_code, render_code, |node, indent, _| {
        Ok(debug_line(indent, format!("CODE({:?})", span_of(node)?.literal)))
    });
    registry.register(CODE_BLOCK, emit_code_block, render_code_block, |node, indent, _| {
        let block = block_of(node)?;
        Ok(debug_line(
            indent,
            format!("CODE_BLOCK info={:?} {:?}", block.info, block.literal),
        ))
    });

    registry.register_importer(ExternalKind::CODE, import_code);
    registry.register_importer(ExternalKind::CODE_BLOCK, import_code_block);
    Ok(())
}
