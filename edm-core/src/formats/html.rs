//! HTML format (export only)
//!
//! Produces a fragment for embedding in a trusted page. Text content is not
//! escaped; sanitizing untrusted documents is the host page's job.

use crate::error::EdmError;
use crate::format::Format;
use crate::node::Node;
use crate::DocModel;

/// Format implementation for HTML fragments
pub struct HtmlFormat;

impl Format for HtmlFormat {
    fn name(&self) -> &str {
        "html"
    }

    fn description(&self) -> &str {
        "HTML fragment (export only)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, model: &DocModel, node: &Node) -> Result<String, EdmError> {
        model.to_html(node)
    }
}
