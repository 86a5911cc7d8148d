//! Document and fragment containers
//!
//! Neither carries meaning of its own. A document is the root produced when
//! an import yields several blocks. A fragment groups whatever the import
//! fallback collected; it has no spec, so it passes normalization as a
//! transparent child of any container whose rule its own children satisfy.

use crate::dispatch::{debug_line, Walk};
use crate::error::EdmError;
use crate::node::{Kind, Node};
use crate::registry::KindRegistry;
use crate::spec::{Flow, NodeSpec};

fn emit_document(node: &Node, walk: &Walk<'_>) -> Result<String, EdmError> {
    let mut out = String::new();
    for child in node.children() {
        let emitted = walk.markdown(child)?;
        let emitted = emitted.trim_end_matches('\n');
        if !emitted.is_empty() {
            out.push_str(emitted);
            out.push_str("\n\n");
        }
    }
    Ok(out)
}

fn debug_container(
    label: &'static str,
) -> impl Fn(&Node, usize, &Walk<'_>) -> Result<String, EdmError> {
    move |node: &Node, indent: usize, walk: &Walk<'_>| {
        let mut out = debug_line(indent, label);
        if node.children().is_empty() {
            out.push_str(&debug_line(indent + 1, "<empty>"));
        } else {
            out.push_str(&walk.debug_children(node, indent + 1)?);
        }
        Ok(out)
    }
}

pub fn register(registry: &mut KindRegistry) -> Result<(), EdmError> {
    registry.register_spec(NodeSpec::new(Kind::DOCUMENT, Flow::Block).children_flow(Flow::Block))?;

    registry.register(
        Kind::DOCUMENT,
        emit_document,
        |node, walk| walk.html_children(node),
        debug_container("document"),
    );
    registry.register(
        Kind::FRAGMENT,
        |node, walk| walk.markdown_children(node),
        |node, walk| walk.html_children(node),
        debug_container("fragment"),
    );
    Ok(())
}
