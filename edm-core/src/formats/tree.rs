//! Debug tree format
//!
//! Indented dump of the tree, two spaces per level, one node per line.
//! Meant for inspecting what an import produced, not for parsing back.

use crate::error::EdmError;
use crate::format::Format;
use crate::node::Node;
use crate::DocModel;

pub struct TreeFormat;

impl Format for TreeFormat {
    fn name(&self) -> &str {
        "tree"
    }

    fn description(&self) -> &str {
        "Indented debug dump of the document tree"
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, model: &DocModel, node: &Node) -> Result<String, EdmError> {
        model.debug(node)
    }
}
