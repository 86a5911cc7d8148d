//! Round trip tests: Markdown → tree → Markdown → tree must be equal

use crate::common::{model, round_trip, to_html};
use proptest::prelude::*;

const SOURCES: &[&str] = &[
    "Hello *world*",
    "- one\n- *two*\n",
    "# Title\n\nBody with **bold** and `code`.\n",
    "1. a\n2. b\n   - nested\n",
    "- a\n\n- b\n",
    "- a\n  - b\n    - c\n",
    "> quoted *text*\n>\n> second\n",
    "Text with \\*escaped\\* stars, 1. numbers and a # hash\n",
    "[link](http://x.com \"title\") and ![img](a.png)",
    "[spaced](<a b.html>)",
    "***\n",
    "line one  \nline two",
    "```\ncode\n```\n",
    "~~~\n```\n~~~\n",
    "``a`b`` and ` `` `",
    "~~gone~~ and kept",
    "***strong emph*** and *__nested__*",
    "Setext\nheading\n=======\n",
    "- item\n\n  second paragraph\n- other\n",
    "7) seven\n8) eight\n",
    "+ plus\n+ list\n",
    "a***b***c",
    "x***a** b*",
    "_*x*_ and __*y*__",
    "\\![x](y)",
    "\\![x][r]\n\n[r]: /u\n",
    "wow! [x](y) and done!",
    "999999999. a\n999999999. b\n",
];

#[test]
fn test_sources_round_trip() {
    for source in SOURCES {
        let (first, second) = round_trip(source);
        assert_eq!(first, second, "round trip changed the tree of {source:?}");
    }
}

#[test]
fn test_html_is_stable_across_round_trip() {
    for source in SOURCES {
        let (first, second) = round_trip(source);
        assert_eq!(to_html(&first), to_html(&second), "{source:?}");
    }
}

fn word() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

/// Punctuation written with a backslash in the source.
fn escaped() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        '!', '*', '_', '[', ']', '<', '>', '&', '~', '#', '`', '\\', '(', ')', '.',
    ])
    .prop_map(|c| format!("\\{c}"))
}

/// Punctuation that needs no escape after a word.
fn bare() -> impl Strategy<Value = char> {
    prop::sample::select(vec!['.', ',', ':', ';', '?', '!', '\'', '"'])
}

fn segment() -> impl Strategy<Value = String> {
    prop_oneof![
        word(),
        word().prop_map(|w| format!("*{w}*")),
        word().prop_map(|w| format!("**{w}**")),
        word().prop_map(|w| format!("`{w}`")),
        (word(), word()).prop_map(|(a, b)| format!("*{a} **{b}***")),
        (word(), bare()).prop_map(|(w, c)| format!("{w}{c}")),
        (word(), escaped()).prop_map(|(w, e)| format!("{w}{e}")),
        word().prop_map(|w| format!("(*{w}*)")),
        word().prop_map(|w| format!("**{w}**.")),
        (word(), word(), word()).prop_map(|(a, b, c)| format!("{a}*{b}*{c}")),
        (word(), word(), word()).prop_map(|(a, b, c)| format!("{a}**{b}**{c}")),
        (word(), word(), word()).prop_map(|(a, b, c)| format!("{a}***{b}***{c}")),
        (word(), word(), word()).prop_map(|(a, b, c)| format!("{a}***{b}** {c}*")),
        (word(), word()).prop_map(|(a, b)| format!("[{a}](/{b})")),
        (word(), word(), word()).prop_map(|(w, a, b)| format!("{w}\\![{a}](/{b})")),
    ]
}

fn paragraph_source() -> impl Strategy<Value = String> {
    prop::collection::vec(segment(), 1..8).prop_map(|segments| segments.join(" "))
}

proptest! {
    #[test]
    fn test_generated_paragraphs_round_trip(source in paragraph_source()) {
        let (first, second) = round_trip(&source);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_generated_lists_round_trip(
        items in prop::collection::vec(paragraph_source(), 1..5),
        ordered in any::<bool>(),
    ) {
        let source: String = items
            .iter()
            .enumerate()
            .map(|(i, item)| if ordered { format!("{}. {item}\n", i + 1) } else { format!("- {item}\n") })
            .collect();
        let (first, second) = round_trip(&source);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_arbitrary_text_never_panics(source in "\\PC{0,64}") {
        let _ = model().parse_markdown(&source);
    }
}
