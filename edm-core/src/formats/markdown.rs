//! Markdown format
//!
//! Parsing goes through comrak and the import adapter; serialization through
//! the per-kind Markdown emitters. Output re-parses to a structurally equal
//! tree for everything the built-in kinds can represent.

use crate::error::EdmError;
use crate::format::Format;
use crate::node::Node;
use crate::DocModel;

/// Format implementation for Markdown
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "CommonMark Markdown with strikethrough and autolinks"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, model: &DocModel, source: &str) -> Result<Node, EdmError> {
        model.parse_markdown(source)
    }

    fn serialize(&self, model: &DocModel, node: &Node) -> Result<String, EdmError> {
        model.to_markdown(node)
    }
}
