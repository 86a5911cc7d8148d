//! Export tests for the HTML format

use crate::common::{model, parse, to_html};
use edm_core::kinds::paragraph::paragraph;
use edm_core::kinds::text::text;
use edm_core::{EdmError, FormatRegistry, Node};
use insta::assert_snapshot;

#[test]
fn test_paragraph_with_emphasis() {
    assert_eq!(to_html(&parse("Hello *world*")), "<p>Hello <em>world</em></p>");
}

#[test]
fn test_tight_list_items_are_not_wrapped_in_paragraphs() {
    let html = to_html(&parse("- one\n- *two*\n"));
    assert!(html.contains("<ul><li>one</li><li><em>two</em></li></ul>"));
}

#[test]
fn test_loose_list_items_keep_paragraphs() {
    assert_eq!(
        to_html(&parse("- a\n\n- b\n")),
        "<ul><li><p>a</p></li><li><p>b</p></li></ul>"
    );
}

#[test]
fn test_one_ul_per_nesting_level() {
    let html = to_html(&parse("- a\n  - b\n    - c\n"));
    assert_eq!(html, "<ul><li>a<ul><li>b<ul><li>c</li></ul></li></ul></li></ul>");
    assert_eq!(html.matches("<ul>").count(), 3);
}

#[test]
fn test_ordered_list_start() {
    assert_eq!(
        to_html(&parse("4. four\n5. five\n")),
        "<ol start=\"4\"><li>four</li><li>five</li></ol>"
    );
}

#[test]
fn test_text_is_emitted_as_is() {
    let tree = paragraph(vec![text("1 < 2 & 3")]);
    assert_eq!(to_html(&tree), "<p>1 < 2 & 3</p>");
    assert_eq!(to_html(&parse("1 < 2 & 3")), "<p>1 < 2 & 3</p>");
}

#[test]
fn test_absent_renders_empty() {
    assert_eq!(to_html(&Node::absent()), "");
    assert_eq!(to_html(&parse("")), "");
}

#[test]
fn test_document() {
    let md = "## Notes\n\n> Quote with `a<b>`\n\n---\n\n![alt *text*](pic.png \"Pic\")\n";
    assert_snapshot!(to_html(&parse(md)), @r#"<h2>Notes</h2><blockquote><p>Quote with <code>a&lt;b&gt;</code></p></blockquote><hr /><p><img src="pic.png" alt="alt text" title="Pic" /></p>"#);
}

#[test]
fn test_html_format_is_export_only() {
    let model = model();
    let formats = FormatRegistry::default();
    let tree = parse("x");
    assert_eq!(formats.serialize(&model, &tree, "html").unwrap(), "<p>x</p>");
    assert!(matches!(
        formats.parse(&model, "<p>x</p>", "html"),
        Err(EdmError::NotSupported(_))
    ));
}
