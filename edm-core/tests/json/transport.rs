//! JSON encode/decode through the format layer

use crate::common::{model, parse};
use edm_core::kinds::list::{bullet_list, list_item, BulletList};
use edm_core::kinds::paragraph::plain;
use edm_core::kinds::text::text;
use edm_core::{EdmError, FormatRegistry};
use insta::assert_snapshot;

#[test]
fn test_markdown_through_json_is_unchanged() {
    let model = model();
    let tree = parse("# T\n\n1. *a* [b](/c)\n2. `d`\n\n```rust\nx\n```\n");
    let json = model.to_json(&tree).unwrap();
    assert_eq!(model.parse_json(&json).unwrap(), tree);
}

#[test]
fn test_wire_format() {
    let model = model();
    let tree = parse("- a\n");
    assert_snapshot!(model.to_json(&tree).unwrap(), @r#"
{
  "kind": "bullet_list",
  "payload": {
    "marker": "-",
    "tight": true
  },
  "children": [
    {
      "kind": "list_item",
      "children": [
        {
          "kind": "plain",
          "children": [
            {
              "kind": "text",
              "payload": "a"
            }
          ]
        }
      ]
    }
  ]
}
"#);
}

#[test]
fn test_hand_written_json_is_normalized() {
    let model = model();
    let json = r#"{
        "kind": "bullet_list",
        "payload": {},
        "children": [
            { "kind": "list_item", "children": [
                { "kind": "text", "payload": "loose " },
                { "kind": "text", "payload": "text" }
            ] }
        ]
    }"#;
    let tree = model.parse_json(json).unwrap();
    assert_eq!(
        tree,
        bullet_list(
            BulletList::default(),
            vec![list_item(vec![plain(vec![text("loose text")])])]
        )
    );
    assert_eq!(model.to_markdown(&tree).unwrap(), "- loose text\n\n");
}

#[test]
fn test_invalid_json_tree_is_rejected() {
    let model = model();
    let formats = FormatRegistry::default();
    let json = r#"{"kind":"paragraph","children":[{"kind":"bullet_list"}]}"#;
    assert!(matches!(
        formats.parse(&model, json, "json"),
        Err(EdmError::Validation(_))
    ));
}

#[test]
fn test_ordered_list_start_out_of_range_is_rejected() {
    let model = model();
    let json = r#"{
        "kind": "ordered_list",
        "payload": { "start": 18446744073709551615 },
        "children": [
            { "kind": "list_item", "children": [{ "kind": "text", "payload": "a" }] },
            { "kind": "list_item", "children": [{ "kind": "text", "payload": "b" }] }
        ]
    }"#;
    assert!(matches!(model.parse_json(json), Err(EdmError::Validation(_))));
}
