//! Helpers shared by the integration tests.

use edm_core::{DocModel, Node, Options};

pub fn model() -> DocModel {
    DocModel::with_defaults().expect("built-in kinds register")
}

pub fn model_with(options: Options) -> DocModel {
    DocModel::with_options(options).expect("built-in kinds register")
}

/// Parse Markdown with the default model
pub fn parse(md: &str) -> Node {
    model()
        .parse_markdown(md)
        .unwrap_or_else(|e| panic!("failed to parse {md:?}: {e}"))
}

pub fn to_markdown(node: &Node) -> String {
    model().to_markdown(node).expect("markdown emission")
}

pub fn to_html(node: &Node) -> String {
    model().to_html(node).expect("html rendering")
}

/// Markdown → tree → Markdown → tree; returns both trees.
pub fn round_trip(md: &str) -> (Node, Node) {
    let first = parse(md);
    let emitted = to_markdown(&first);
    let second = model()
        .parse_markdown(&emitted)
        .unwrap_or_else(|e| panic!("emitted markdown {emitted:?} failed to parse: {e}"));
    (first, second)
}
