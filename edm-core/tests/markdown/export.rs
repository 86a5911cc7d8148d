//! Export tests for the Markdown format (tree → Markdown)

use crate::common::{parse, to_markdown};
use edm_core::kinds::code::code_block;
use edm_core::kinds::emphasis::emph;
use edm_core::kinds::heading::heading;
use edm_core::kinds::link::link;
use edm_core::kinds::list::{bullet_list, list_item, ordered_list, BulletList, OrderedList};
use edm_core::kinds::paragraph::{paragraph, plain};
use edm_core::kinds::text::text;
use edm_core::{FormatRegistry, Node};
use insta::assert_snapshot;

#[test]
fn test_paragraph_gets_blank_line_separator() {
    let tree = paragraph(vec![text("Hello "), emph(vec![text("world")])]);
    assert_eq!(to_markdown(&tree), "Hello *world*\n\n");
}

#[test]
fn test_absent_emits_nothing() {
    assert_eq!(to_markdown(&Node::absent()), "");
}

#[test]
fn test_nested_list_indents_two_spaces_per_level() {
    let md = "- a\n  - b\n    - c\n";
    assert_eq!(to_markdown(&parse(md)), "- a\n  - b\n    - c\n\n");
}

#[test]
fn test_multi_block_items_indent_continuation_lines() {
    let item = list_item(vec![
        plain(vec![text("first line\nsecond line")]),
        code_block("", "code\n"),
    ]);
    let tree = bullet_list(BulletList::default(), vec![item]);
    assert_snapshot!(to_markdown(&tree), @r"
- first line
  second line
  ```
  code
  ```
");
}

#[test]
fn test_ordered_marker_width_sets_indent() {
    let nested = bullet_list(
        BulletList::default(),
        vec![list_item(vec![plain(vec![text("inner")])])],
    );
    let tree = ordered_list(
        OrderedList {
            start: 10,
            ..OrderedList::default()
        },
        vec![list_item(vec![plain(vec![text("ten")]), nested])],
    );
    assert_eq!(to_markdown(&tree), "10. ten\n    - inner\n\n");
}

#[test]
fn test_special_characters_are_escaped() {
    let tree = paragraph(vec![text("1. not a list *or* [link]")]);
    assert_eq!(to_markdown(&tree), "1\\. not a list \\*or\\* \\[link\\]\n\n");
}

#[test]
fn test_document_layout() {
    let doc = Node::document(vec![
        heading(2, vec![text("Section")]),
        paragraph(vec![
            text("See "),
            link("https://example.com", "Example", vec![text("this")]),
        ]),
        code_block("rust", "fn main() {}\n"),
    ]);
    assert_snapshot!(to_markdown(&doc), @r#"
## Section

See [this](https://example.com "Example")

```rust
fn main() {}
```
"#);
}

#[test]
fn test_format_registry_markdown() {
    let model = crate::common::model();
    let formats = FormatRegistry::default();
    let tree = formats.parse(&model, "*hi*", "markdown").unwrap();
    assert_eq!(formats.serialize(&model, &tree, "markdown").unwrap(), "*hi*\n\n");
}
