//! JSON format
//!
//! The transport form from [`crate::serialize`]. Parsed trees are normalized,
//! so a hand-edited file is held to the same rules as imported Markdown.

use crate::error::EdmError;
use crate::format::Format;
use crate::node::Node;
use crate::DocModel;

pub struct JsonFormat;

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Document tree as JSON"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, model: &DocModel, source: &str) -> Result<Node, EdmError> {
        model.parse_json(source)
    }

    fn serialize(&self, model: &DocModel, node: &Node) -> Result<String, EdmError> {
        model.to_json(node)
    }
}
