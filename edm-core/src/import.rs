//! Import adapter: external syntax tree → document model
//!
//! Markdown is parsed by comrak into its arena-allocated syntax tree. This
//! module walks that tree and lets the importer registered for each external
//! node kind decide what it becomes:
//!
//!   1. If an importer is registered for the node's [`ExternalKind`], its
//!      result is used. Importers recurse through the [`ImportContext`] they
//!      are handed, so they control whether and how children are imported.
//!   2. Otherwise the children are imported. If that yields anything, the
//!      results are wrapped in a fragment; if not, the node cannot be
//!      represented and import fails with the source position and an excerpt.
//!   3. Absent results are dropped and everything else is normalized against
//!      the registered specs before it is handed to the parent. Subtrees the
//!      continuation returned are already normalized and are not walked again.
//!
//! The document root is special: zero blocks import as the absent node, a
//! single block is returned unwrapped, and several blocks are wrapped in a
//! document node.

use crate::error::{EdmError, ImportError};
use crate::node::Node;
use crate::options::Options;
use crate::registry::KindRegistry;
use comrak::nodes::{AstNode, NodeValue};
use comrak::{parse_document, Arena};
use std::fmt;
use tracing::{debug, trace};

/// Longest source excerpt carried by an import error.
const EXCERPT_LEN: usize = 40;

/// Kind of a node in the external (comrak) syntax tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExternalKind(&'static str);

impl ExternalKind {
    pub const DOCUMENT: ExternalKind = ExternalKind("document");
    pub const FRONT_MATTER: ExternalKind = ExternalKind("front_matter");
    pub const BLOCK_QUOTE: ExternalKind = ExternalKind("block_quote");
    pub const LIST: ExternalKind = ExternalKind("list");
    pub const ITEM: ExternalKind = ExternalKind("item");
    pub const CODE_BLOCK: ExternalKind = ExternalKind("code_block");
    pub const HTML_BLOCK: ExternalKind = ExternalKind("html_block");
    pub const PARAGRAPH: ExternalKind = ExternalKind("paragraph");
    pub const HEADING: ExternalKind = ExternalKind("heading");
    pub const THEMATIC_BREAK: ExternalKind = ExternalKind("thematic_break");
    pub const FOOTNOTE_DEFINITION: ExternalKind = ExternalKind("footnote_definition");
    pub const TABLE: ExternalKind = ExternalKind("table");
    pub const TABLE_ROW: ExternalKind = ExternalKind("table_row");
    pub const TABLE_CELL: ExternalKind = ExternalKind("table_cell");
    pub const TEXT: ExternalKind = ExternalKind("text");
    pub const TASK_ITEM: ExternalKind = ExternalKind("task_item");
    pub const SOFT_BREAK: ExternalKind = ExternalKind("soft_break");
    pub const LINE_BREAK: ExternalKind = ExternalKind("line_break");
    pub const CODE: ExternalKind = ExternalKind("code");
    pub const HTML_INLINE: ExternalKind = ExternalKind("html_inline");
    pub const EMPH: ExternalKind = ExternalKind("emph");
    pub const STRONG: ExternalKind = ExternalKind("strong");
    pub const STRIKETHROUGH: ExternalKind = ExternalKind("strikethrough");
    pub const SUPERSCRIPT: ExternalKind = ExternalKind("superscript");
    pub const LINK: ExternalKind = ExternalKind("link");
    pub const IMAGE: ExternalKind = ExternalKind("image");
    pub const FOOTNOTE_REFERENCE: ExternalKind = ExternalKind("footnote_reference");
    pub const MATH: ExternalKind = ExternalKind("math");
    /// Any comrak node without a dedicated constant.
    pub const OTHER: ExternalKind = ExternalKind("other");

    pub fn of(value: &NodeValue) -> Self {
        match value {
            NodeValue::Document => Self::DOCUMENT,
            NodeValue::FrontMatter(..) => Self::FRONT_MATTER,
            NodeValue::BlockQuote => Self::BLOCK_QUOTE,
            NodeValue::List(..) => Self::LIST,
            NodeValue::Item(..) => Self::ITEM,
            NodeValue::CodeBlock(..) => Self::CODE_BLOCK,
            NodeValue::HtmlBlock(..) => Self::HTML_BLOCK,
            NodeValue::Paragraph => Self::PARAGRAPH,
            NodeValue::Heading(..) => Self::HEADING,
            NodeValue::ThematicBreak => Self::THEMATIC_BREAK,
            NodeValue::FootnoteDefinition(..) => Self::FOOTNOTE_DEFINITION,
            NodeValue::Table(..) => Self::TABLE,
            NodeValue::TableRow(..) => Self::TABLE_ROW,
            NodeValue::TableCell => Self::TABLE_CELL,
            NodeValue::Text(..) => Self::TEXT,
            NodeValue::TaskItem(..) => Self::TASK_ITEM,
            NodeValue::SoftBreak => Self::SOFT_BREAK,
            NodeValue::LineBreak => Self::LINE_BREAK,
            NodeValue::Code(..) => Self::CODE,
            NodeValue::HtmlInline(..) => Self::HTML_INLINE,
            NodeValue::Emph => Self::EMPH,
            NodeValue::Strong => Self::STRONG,
            NodeValue::Strikethrough => Self::STRIKETHROUGH,
            NodeValue::Superscript => Self::SUPERSCRIPT,
            NodeValue::Link(..) => Self::LINK,
            NodeValue::Image(..) => Self::IMAGE,
            NodeValue::FootnoteReference(..) => Self::FOOTNOTE_REFERENCE,
            NodeValue::Math(..) => Self::MATH,
            _ => Self::OTHER,
        }
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ExternalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// State threaded through one import.
///
/// Importers receive the context of their own node and use it to import
/// children one level deeper.
#[derive(Clone, Copy)]
pub struct ImportContext<'s> {
    registry: &'s KindRegistry,
    options: &'s Options,
    source: &'s str,
    depth: usize,
}

impl<'s> ImportContext<'s> {
    pub fn new(registry: &'s KindRegistry, options: &'s Options, source: &'s str) -> Self {
        ImportContext {
            registry,
            options,
            source,
            depth: 0,
        }
    }

    pub fn registry(&self) -> &'s KindRegistry {
        self.registry
    }

    pub fn options(&self) -> &'s Options {
        self.options
    }

    /// The Markdown buffer being imported.
    pub fn source(&self) -> &'s str {
        self.source
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// A context one level deeper, for importers that synthesize an
    /// intermediate level (list items) before importing grandchildren.
    pub fn nested(&self) -> Result<ImportContext<'s>, EdmError> {
        let depth = self.depth + 1;
        if depth > self.options.max_depth {
            return Err(ImportError::NestingTooDeep {
                limit: self.options.max_depth,
            }
            .into());
        }
        Ok(ImportContext { depth, ..*self })
    }

    /// Imports one external node and normalizes everything it produced.
    pub fn import<'a>(&self, node: &'a AstNode<'a>) -> Result<Vec<Node>, EdmError> {
        let inner = self.nested()?;
        let external = ExternalKind::of(&node.data.borrow().value);
        trace!(kind = %external, depth = inner.depth, "importing node");

        let produced = match self.registry.importer(external) {
            Some(importer) => importer(node, &inner)?,
            None => {
                let children = inner.import_children(node)?;
                if children.is_empty() {
                    return Err(self.unsupported(node));
                }
                debug!(kind = %external, "no importer, wrapping children in a fragment");
                vec![Node::fragment(children)]
            }
        };

        produced
            .into_iter()
            .filter(|node| !node.is_absent())
            .map(|node| self.registry.normalize_imported(node))
            .collect()
    }

    /// Imports every child of `node` in order, concatenating the results.
    pub fn import_children<'a>(&self, node: &'a AstNode<'a>) -> Result<Vec<Node>, EdmError> {
        let mut out = Vec::new();
        for child in node.children() {
            out.extend(self.import(child)?);
        }
        Ok(out)
    }

    /// Error for an external node that has no representation.
    pub fn unsupported<'a>(&self, node: &'a AstNode<'a>) -> EdmError {
        let ast = node.data.borrow();
        let line = ast.sourcepos.start.line;
        let column = ast.sourcepos.start.column;
        ImportError::Unsupported {
            kind: ExternalKind::of(&ast.value),
            line,
            column,
            excerpt: self.excerpt(line, column),
        }
        .into()
    }

    /// Error for an external node whose shape its importer did not expect.
    pub fn malformed<'a>(&self, node: &'a AstNode<'a>, reason: impl Into<String>) -> EdmError {
        ImportError::Malformed {
            kind: ExternalKind::of(&node.data.borrow().value),
            reason: reason.into(),
        }
        .into()
    }

    fn excerpt(&self, line: usize, column: usize) -> String {
        let Some(text) = line.checked_sub(1).and_then(|i| self.source.lines().nth(i)) else {
            return String::new();
        };
        text.chars()
            .skip(column.saturating_sub(1))
            .take(EXCERPT_LEN)
            .collect::<String>()
            .trim_end()
            .to_string()
    }
}

/// Imports a comrak document root.
pub fn import_document<'a>(root: &'a AstNode<'a>, cx: &ImportContext<'_>) -> Result<Node, EdmError> {
    let mut blocks = cx.import_children(root)?;
    let node = match blocks.len() {
        0 => Node::absent(),
        1 => blocks.remove(0),
        _ => cx.registry().normalize_imported(Node::document(blocks))?,
    };
    Ok(node)
}

/// Parses Markdown with comrak and imports the result.
pub fn parse_markdown(
    registry: &KindRegistry,
    options: &Options,
    source: &str,
) -> Result<Node, EdmError> {
    let arena = Arena::new();
    let root = parse_document(&arena, source, &options.comrak_options());
    let cx = ImportContext::new(registry, options, source);
    import_document(root, &cx)
}
