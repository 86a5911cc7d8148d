//! Bullet lists, ordered lists and list items
//!
//! Markdown emission of a list item:
//!
//!   - the marker (`- `, `1. `) is followed by the first block's text;
//!   - later blocks, nested lists included, follow on their own lines,
//!     separated by a blank line when the list is loose;
//!   - every line after the first is indented by the marker width, so each
//!     nesting level adds exactly that much indentation. Blank lines stay
//!     empty.
//!
//! An item may hold inline children directly when a tree is built by hand or
//! decoded from JSON. Normalization wraps such runs in `plain` blocks.

use super::paragraph::plain;
use crate::common::escape::prefix_lines;
use crate::dispatch::{debug_line, Walk};
use crate::error::EdmError;
use crate::import::{ExternalKind, ImportContext};
use crate::node::{Kind, Node, Payload};
use crate::registry::KindRegistry;
use crate::spec::{wrap_inlines, Flow, NodeSpec};
use comrak::nodes::{AstNode, ListDelimType, ListType, NodeValue};
use serde::{Deserialize, Serialize};

pub const BULLET_LIST: Kind = Kind::from_static("bullet_list");
pub const ORDERED_LIST: Kind = Kind::from_static("ordered_list");
pub const LIST_ITEM: Kind = Kind::from_static("list_item");

/// Largest number a Markdown list marker can carry (nine digits).
pub const MAX_ORDERED_START: usize = 999_999_999;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletList {
    pub marker: char,
    pub tight: bool,
}

impl Default for BulletList {
    fn default() -> Self {
        BulletList {
            marker: '-',
            tight: true,
        }
    }
}

impl Payload for BulletList {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderedList {
    pub start: usize,
    pub delimiter: char,
    pub tight: bool,
}

impl Default for OrderedList {
    fn default() -> Self {
        OrderedList {
            start: 1,
            delimiter: '.',
            tight: true,
        }
    }
}

impl Payload for OrderedList {}

pub fn bullet_list(style: BulletList, items: Vec<Node>) -> Node {
    Node::new(BULLET_LIST, style, items)
}

pub fn ordered_list(style: OrderedList, items: Vec<Node>) -> Node {
    Node::new(ORDERED_LIST, style, items)
}

pub fn list_item(blocks: Vec<Node>) -> Node {
    Node::structural(LIST_ITEM, blocks)
}

fn import_list<'a>(node: &'a AstNode<'a>, cx: &ImportContext<'_>) -> Result<Vec<Node>, EdmError> {
    let list = match &node.data.borrow().value {
        NodeValue::List(list) => list.clone(),
        _ => return Err(cx.malformed(node, "expected a list node")),
    };

    let item_cx = cx.nested()?;
    let mut items = Vec::new();
    for item in node.children() {
        if !matches!(item.data.borrow().value, NodeValue::Item(..)) {
            return Err(cx.malformed(item, "list child is not an item"));
        }
        let mut blocks = Vec::new();
        for block in item.children() {
            blocks.extend(item_cx.import(block)?);
        }
        items.push(list_item(blocks));
    }

    let node = match list.list_type {
        ListType::Bullet => bullet_list(
            BulletList {
                marker: char::from(list.bullet_char),
                tight: list.tight,
            },
            items,
        ),
        ListType::Ordered => ordered_list(
            OrderedList {
                start: list.start,
                delimiter: match list.delimiter {
                    ListDelimType::Period => '.',
                    ListDelimType::Paren => ')',
                },
                tight: list.tight,
            },
            items,
        ),
    };
    Ok(vec![node])
}

/// Emits one item with `marker` in front of its first line.
fn emit_item(item: &Node, marker: &str, tight: bool, walk: &Walk<'_>) -> Result<String, EdmError> {
    let mut blocks = Vec::new();
    for block in item.children() {
        let emitted = walk.markdown(block)?;
        let emitted = emitted.trim_end_matches('\n');
        if !emitted.is_empty() {
            blocks.push(emitted.to_string());
        }
    }
    if blocks.is_empty() {
        return Ok(marker.trim_end().to_string());
    }

    let body = blocks.join(if tight { "\n" } else { "\n\n" });
    let indent = " ".repeat(marker.len());
    Ok(prefix_lines(&body, marker, &indent, ""))
}

fn join_items(items: Vec<String>, tight: bool) -> String {
    items.join(if tight { "\n" } else { "\n\n" }) + "\n\n"
}

fn emit_bullet_list(node: &Node, walk: &Walk<'_>) -> Result<String, EdmError> {
    let style = node
        .payload_as::<BulletList>()
        .ok_or_else(|| EdmError::payload_mismatch(node.kind()))?;
    let marker = format!("{} ", style.marker);
    let items = node
        .children()
        .iter()
        .map(|item| emit_item(item, &marker, style.tight, walk))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(join_items(items, style.tight))
}

fn checked_start(node: &Node) -> Result<&OrderedList, EdmError> {
    let style = node
        .payload_as::<OrderedList>()
        .ok_or_else(|| EdmError::payload_mismatch(node.kind()))?;
    if style.start > MAX_ORDERED_START {
        return Err(EdmError::rejected(
            node.kind(),
            format!("start {} exceeds {MAX_ORDERED_START}", style.start),
        ));
    }
    Ok(style)
}

fn emit_ordered_list(node: &Node, walk: &Walk<'_>) -> Result<String, EdmError> {
    let style = checked_start(node)?;
    let items = node
        .children()
        .iter()
        .enumerate()
        .map(|(i, item)| {
            // Only the first number is significant; later markers stay
            // within nine digits.
            let number = style.start.saturating_add(i).min(MAX_ORDERED_START);
            let marker = format!("{number}{} ", style.delimiter);
            emit_item(item, &marker, style.tight, walk)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(join_items(items, style.tight))
}

fn render_bullet_list(node: &Node, walk: &Walk<'_>) -> Result<String, EdmError> {
    Ok(format!("<ul>{}</ul>", walk.html_children(node)?))
}

fn render_ordered_list(node: &Node, walk: &Walk<'_>) -> Result<String, EdmError> {
    let style = node
        .payload_as::<OrderedList>()
        .ok_or_else(|| EdmError::payload_mismatch(node.kind()))?;
    let items = walk.html_children(node)?;
    if style.start == 1 {
        Ok(format!("<ol>{items}</ol>"))
    } else {
        Ok(format!("<ol start=\"{}\">{items}</ol>", style.start))
    }
}

fn debug_items(node: &Node, indent: usize, walk: &Walk<'_>, header: String) -> Result<String, EdmError> {
    let mut out = debug_line(indent, header);
    for (i, item) in node.children().iter().enumerate() {
        out.push_str(&debug_line(indent + 1, format!("ITEM {i}")));
        out.push_str(&walk.debug_children(item, indent + 2)?);
    }
    Ok(out)
}

fn debug_bullet_list(node: &Node, indent: usize, walk: &Walk<'_>) -> Result<String, EdmError> {
    debug_items(node, indent, walk, "BULLET_LIST".to_string())
}

fn debug_ordered_list(node: &Node, indent: usize, walk: &Walk<'_>) -> Result<String, EdmError> {
    let style = node
        .payload_as::<OrderedList>()
        .ok_or_else(|| EdmError::payload_mismatch(node.kind()))?;
    debug_items(node, indent, walk, format!("ORDERED_LIST start={}", style.start))
}

pub fn register(registry: &mut KindRegistry) -> Result<(), EdmError> {
    registry.register_spec(NodeSpec::new(BULLET_LIST, Flow::Block).allowed_children([LIST_ITEM]))?;
    registry.register_spec(
        NodeSpec::new(ORDERED_LIST, Flow::Block)
            .allowed_children([LIST_ITEM])
            .coerce(|node, children, _| checked_start(node).map(|_| children)),
    )?;
    registry.register_spec(
        NodeSpec::new(LIST_ITEM, Flow::Block)
            .children_flow(Flow::Block)
            .coerce(|_, children, table| {
                wrap_inlines(children, table, |run| table.normalize_shallow(plain(run)))
            }),
    )?;
    registry.register_payload::<BulletList>(BULLET_LIST)?;
    registry.register_payload::<OrderedList>(ORDERED_LIST)?;

    registry.register(BULLET_LIST, emit_bullet_list, render_bullet_list, debug_bullet_list);
    registry.register(ORDERED_LIST, emit_ordered_list, render_ordered_list, debug_ordered_list);
    registry.register(
        LIST_ITEM,
        |node, walk| emit_item(node, "- ", true, walk),
        |node, walk| Ok(format!("<li>{}</li>", walk.html_children(node)?)),
        |node, indent, walk| {
            Ok(debug_line(indent, "ITEM") + &walk.debug_children(node, indent + 1)?)
        },
    );

    registry.register_importer(ExternalKind::LIST, import_list);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::kinds::paragraph::paragraph;
    use crate::kinds::text::text;

    fn item(s: &str) -> Node {
        list_item(vec![plain(vec![text(s)])])
    }

    fn md(node: &Node) -> String {
        let registry = KindRegistry::with_defaults().unwrap();
        Walk::new(&registry, 32).markdown(node).unwrap()
    }

    #[test]
    fn tight_bullet_list() {
        let list = bullet_list(BulletList::default(), vec![item("one"), item("two")]);
        assert_eq!(md(&list), "- one\n- two\n\n");
    }

    #[test]
    fn nested_lists_indent_by_marker_width() {
        let inner = bullet_list(BulletList::default(), vec![item("c")]);
        let middle = bullet_list(
            BulletList::default(),
            vec![list_item(vec![plain(vec![text("b")]), inner])],
        );
        let outer = bullet_list(
            BulletList::default(),
            vec![list_item(vec![plain(vec![text("a")]), middle])],
        );
        assert_eq!(md(&outer), "- a\n  - b\n    - c\n\n");
    }

    #[test]
    fn loose_items_are_separated_by_blank_lines() {
        let style = BulletList {
            marker: '*',
            tight: false,
        };
        let list = bullet_list(
            style,
            vec![
                list_item(vec![paragraph(vec![text("a")]), paragraph(vec![text("b")])]),
                list_item(vec![paragraph(vec![text("c")])]),
            ],
        );
        assert_eq!(md(&list), "* a\n\n  b\n\n* c\n\n");
    }

    #[test]
    fn ordered_markers_count_from_start() {
        let style = OrderedList {
            start: 9,
            delimiter: ')',
            tight: true,
        };
        let list = ordered_list(style, vec![item("nine"), item("ten")]);
        assert_eq!(md(&list), "9) nine\n10) ten\n\n");
    }

    #[test]
    fn start_beyond_nine_digits_is_rejected() {
        let registry = KindRegistry::with_defaults().unwrap();
        let style = OrderedList {
            start: usize::MAX,
            ..OrderedList::default()
        };
        let list = ordered_list(style, vec![item("a"), item("b")]);
        assert!(matches!(
            registry.normalize(list.clone()),
            Err(EdmError::Validation(ValidationError::Rejected { ref kind, .. })) if *kind == ORDERED_LIST
        ));
        // Emitting an unnormalized tree fails instead of overflowing.
        assert!(Walk::new(&registry, 32).markdown(&list).is_err());
    }

    #[test]
    fn markers_never_grow_past_nine_digits() {
        let style = OrderedList {
            start: MAX_ORDERED_START,
            ..OrderedList::default()
        };
        let list = ordered_list(style, vec![item("a"), item("b")]);
        assert_eq!(md(&list), "999999999. a\n999999999. b\n\n");
    }

    #[test]
    fn empty_item_emits_bare_marker() {
        let list = bullet_list(BulletList::default(), vec![list_item(vec![]), item("x")]);
        assert_eq!(md(&list), "-\n- x\n\n");
    }

    #[test]
    fn html_nests_one_ul_per_level() {
        let registry = KindRegistry::with_defaults().unwrap();
        let inner = bullet_list(BulletList::default(), vec![item("b")]);
        let outer = bullet_list(
            BulletList::default(),
            vec![list_item(vec![plain(vec![text("a")]), inner])],
        );
        let html = Walk::new(&registry, 32).html(&outer).unwrap();
        assert_eq!(html, "<ul><li>a<ul><li>b</li></ul></li></ul>");
    }

    #[test]
    fn inline_children_of_items_are_wrapped() {
        let registry = KindRegistry::with_defaults().unwrap();
        let raw = list_item(vec![text("a"), text("b")]);
        let normalized = registry.normalize(raw).unwrap();
        assert_eq!(normalized, list_item(vec![plain(vec![text("ab")])]));
    }

    #[test]
    fn debug_prints_item_indices() {
        let registry = KindRegistry::with_defaults().unwrap();
        let list = bullet_list(BulletList::default(), vec![item("x")]);
        let out = Walk::new(&registry, 32).debug(&list, 0).unwrap();
        assert_eq!(out, "BULLET_LIST\n  ITEM 0\n    PLAIN\n      TEXT(\"x\")\n");
    }
}
