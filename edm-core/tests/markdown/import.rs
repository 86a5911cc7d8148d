//! Import tests for the Markdown format (Markdown → tree)

use crate::common::{model, model_with, parse};
use edm_core::kinds::block::{block_quote, thematic_break};
use edm_core::kinds::code::{code, code_block};
use edm_core::kinds::emphasis::{emph, strike, strong};
use edm_core::kinds::heading::heading;
use edm_core::kinds::link::link;
use edm_core::kinds::list::{bullet_list, list_item, ordered_list, BulletList, OrderedList};
use edm_core::kinds::paragraph::{paragraph, plain};
use edm_core::kinds::text::{hard_break, text};
use edm_core::{EdmError, ExternalKind, ImportError, Kind, Node, Options, SoftBreak};
use insta::assert_snapshot;

#[test]
fn test_paragraph_with_emphasis() {
    assert_eq!(
        parse("Hello *world*"),
        paragraph(vec![text("Hello "), emph(vec![text("world")])])
    );
}

#[test]
fn test_empty_input_is_absent() {
    assert!(parse("").is_absent());
    assert!(parse("   \n\n").is_absent());
}

#[test]
fn test_several_blocks_make_a_document() {
    let doc = parse("# Title\n\nBody\n");
    assert_eq!(
        doc,
        Node::document(vec![
            heading(1, vec![text("Title")]),
            paragraph(vec![text("Body")]),
        ])
    );
}

#[test]
fn test_tight_bullet_list() {
    assert_eq!(
        parse("- one\n- *two*\n"),
        bullet_list(
            BulletList::default(),
            vec![
                list_item(vec![plain(vec![text("one")])]),
                list_item(vec![plain(vec![emph(vec![text("two")])])]),
            ]
        )
    );
}

#[test]
fn test_loose_list_keeps_paragraphs() {
    let style = BulletList {
        marker: '*',
        tight: false,
    };
    assert_eq!(
        parse("* a\n\n* b\n"),
        bullet_list(
            style,
            vec![
                list_item(vec![paragraph(vec![text("a")])]),
                list_item(vec![paragraph(vec![text("b")])]),
            ]
        )
    );
}

#[test]
fn test_ordered_list_start_and_delimiter() {
    let style = OrderedList {
        start: 3,
        delimiter: ')',
        tight: true,
    };
    assert_eq!(
        parse("3) x\n4) y\n"),
        ordered_list(
            style,
            vec![
                list_item(vec![plain(vec![text("x")])]),
                list_item(vec![plain(vec![text("y")])]),
            ]
        )
    );
}

#[test]
fn test_nested_list_lives_inside_the_item() {
    let inner = bullet_list(
        BulletList::default(),
        vec![list_item(vec![plain(vec![text("b")])])],
    );
    assert_eq!(
        parse("- a\n  - b\n"),
        bullet_list(
            BulletList::default(),
            vec![list_item(vec![plain(vec![text("a")]), inner])]
        )
    );
}

#[test]
fn test_soft_break_policy() {
    assert_eq!(parse("a\nb"), paragraph(vec![text("a b")]));

    let newline = model_with(Options {
        soft_break: SoftBreak::Newline,
        ..Options::default()
    });
    assert_eq!(
        newline.parse_markdown("a\nb").unwrap(),
        paragraph(vec![text("a\nb")])
    );
}

#[test]
fn test_hard_break() {
    assert_eq!(
        parse("one  \ntwo"),
        paragraph(vec![text("one"), hard_break(), text("two")])
    );
}

#[test]
fn test_inline_kinds() {
    let doc = parse("**b** ~~s~~ `c` [l](/u \"t\")");
    assert_eq!(
        doc,
        paragraph(vec![
            strong(vec![text("b")]),
            text(" "),
            strike(vec![text("s")]),
            text(" "),
            code("c"),
            text(" "),
            link("/u", "t", vec![text("l")]),
        ])
    );
}

#[test]
fn test_gfm_switch() {
    let strict = model_with(Options {
        gfm: false,
        ..Options::default()
    });
    assert_eq!(
        strict.parse_markdown("~~s~~").unwrap(),
        paragraph(vec![text("~~s~~")])
    );
}

#[test]
fn test_blocks() {
    let doc = parse("> quoted\n\n***\n\n```sh\nls\n```\n");
    assert_eq!(
        doc,
        Node::document(vec![
            block_quote(vec![paragraph(vec![text("quoted")])]),
            thematic_break(),
            code_block("sh", "ls\n"),
        ])
    );
}

#[test]
fn test_debug_dump() {
    let doc = parse("# Title\n\nSome `code` here.\n\n```rust\nlet x = 1;\n```\n");
    assert_snapshot!(model().debug(&doc).unwrap(), @r#"
document
  HEADING level=1
    TEXT("Title")
  PARAGRAPH
    TEXT("Some ")
    CODE("code")
    TEXT(" here.")
  CODE_BLOCK info="rust" "let x = 1;\n"
"#);
}

#[test]
fn test_raw_html_block_is_unsupported() {
    let err = model().parse_markdown("<div>\nhi\n</div>\n").unwrap_err();
    match err {
        EdmError::Import(ImportError::Unsupported { kind, line, .. }) => {
            assert_eq!(kind, ExternalKind::HTML_BLOCK);
            assert_eq!(line, 1);
        }
        other => panic!("expected unsupported import, got {other:?}"),
    }
}

#[test]
fn test_inline_html_reports_position() {
    let err = model().parse_markdown("a <b>x</b>").unwrap_err();
    assert_eq!(
        err,
        ImportError::Unsupported {
            kind: ExternalKind::HTML_INLINE,
            line: 1,
            column: 3,
            excerpt: "<b>x</b>".to_string(),
        }
        .into()
    );
}

#[test]
fn test_every_node_is_known() {
    fn check(node: &Node, model: &edm_core::DocModel) {
        if !node.is_absent() {
            assert!(model.registry().has_kind(node.kind()), "{}", node.kind());
            assert_ne!(node.kind(), &Kind::FRAGMENT);
        }
        node.children().iter().for_each(|c| check(c, model));
    }
    let model = model();
    let doc = model
        .parse_markdown("# H\n\n- a\n  1. b\n\n> q `c` ![i](p.png)\n")
        .unwrap();
    check(&doc, &model);
}
