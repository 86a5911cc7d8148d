//! Format trait and format registry
//!
//! A format is a named surface over the document model: Markdown in and out,
//! HTML out, the debug tree out, JSON in and out. Formats hold no state;
//! every call receives the [`DocModel`] whose registry and options it should
//! use.

use crate::error::EdmError;
use crate::node::Node;
use crate::DocModel;
use std::collections::HashMap;

/// Trait for document formats
///
/// Implementors provide conversion between a string representation and the
/// document tree. Formats can support parsing, serialization, or both.
///
/// # Examples
///
/// ```ignore
/// struct MyFormat;
///
/// impl Format for MyFormat {
///     fn name(&self) -> &str {
///         "my-format"
///     }
///
///     fn supports_serialization(&self) -> bool {
///         true
///     }
///
///     fn serialize(&self, model: &DocModel, node: &Node) -> Result<String, EdmError> {
///         model.to_html(node)
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "markdown", "html")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions associated with this format, without the leading dot.
    /// Used for automatic format detection from filenames.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Whether this format supports parsing (source → tree)
    fn supports_parsing(&self) -> bool {
        false
    }

    /// Whether this format supports serialization (tree → source)
    fn supports_serialization(&self) -> bool {
        false
    }

    /// Parse source text into a normalized tree
    fn parse(&self, _model: &DocModel, _source: &str) -> Result<Node, EdmError> {
        Err(EdmError::NotSupported(format!(
            "Format '{}' does not support parsing",
            self.name()
        )))
    }

    /// Serialize a tree into text
    fn serialize(&self, _model: &DocModel, _node: &Node) -> Result<String, EdmError> {
        Err(EdmError::NotSupported(format!(
            "Format '{}' does not support serialization",
            self.name()
        )))
    }
}

/// Registry of document formats
///
/// # Examples
///
/// ```ignore
/// let formats = FormatRegistry::default();
/// let model = DocModel::with_defaults()?;
/// let tree = formats.parse(&model, "Hello *world*", "markdown")?;
/// let html = formats.serialize(&model, &tree, "html")?;
/// ```
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format
    ///
    /// If a format with the same name already exists, it will be replaced.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    /// Get a format by name
    pub fn get(&self, name: &str) -> Result<&dyn Format, EdmError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| EdmError::FormatNotFound(name.to_string()))
    }

    /// Check if a format exists
    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// Detect format from filename based on file extension
    pub fn detect_format_from_filename(&self, filename: &str) -> Option<String> {
        let extension = std::path::Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())?;

        self.formats
            .values()
            .find(|format| format.file_extensions().contains(&extension))
            .map(|format| format.name().to_string())
    }

    /// Parse source text using the specified format
    pub fn parse(&self, model: &DocModel, source: &str, format: &str) -> Result<Node, EdmError> {
        let fmt = self.get(format)?;
        if !fmt.supports_parsing() {
            return Err(EdmError::NotSupported(format!(
                "Format '{format}' does not support parsing"
            )));
        }
        fmt.parse(model, source)
    }

    /// Serialize a tree using the specified format
    pub fn serialize(&self, model: &DocModel, node: &Node, format: &str) -> Result<String, EdmError> {
        let fmt = self.get(format)?;
        if !fmt.supports_serialization() {
            return Err(EdmError::NotSupported(format!(
                "Format '{format}' does not support serialization"
            )));
        }
        fmt.serialize(model, node)
    }

    /// Create a registry with the built-in formats
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(crate::formats::MarkdownFormat);
        registry.register(crate::formats::HtmlFormat);
        registry.register(crate::formats::TreeFormat);
        registry.register(crate::formats::JsonFormat);
        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::text::text;

    struct TestFormat;
    impl Format for TestFormat {
        fn name(&self) -> &str {
            "test"
        }
        fn supports_parsing(&self) -> bool {
            true
        }
        fn parse(&self, _model: &DocModel, source: &str) -> Result<Node, EdmError> {
            Ok(text(source))
        }
    }

    #[test]
    fn test_registry_creation() {
        let registry = FormatRegistry::new();
        assert!(registry.list_formats().is_empty());
    }

    #[test]
    fn test_registry_register_and_get() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);
        assert!(registry.has("test"));
        assert_eq!(registry.get("test").unwrap().name(), "test");
        assert_eq!(registry.list_formats(), vec!["test"]);
    }

    #[test]
    fn test_registry_get_nonexistent() {
        let registry = FormatRegistry::new();
        match registry.get("nonexistent") {
            Err(EdmError::FormatNotFound(name)) => assert_eq!(name, "nonexistent"),
            _ => panic!("Expected FormatNotFound error"),
        }
    }

    #[test]
    fn test_unsupported_direction() {
        let model = DocModel::with_defaults().unwrap();
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);

        assert_eq!(registry.parse(&model, "x", "test").unwrap(), text("x"));
        let result = registry.serialize(&model, &text("x"), "test");
        assert!(matches!(result, Err(EdmError::NotSupported(_))));
    }

    #[test]
    fn test_defaults_and_detection() {
        let registry = FormatRegistry::default();
        assert_eq!(registry.list_formats(), vec!["html", "json", "markdown", "tree"]);
        assert_eq!(
            registry.detect_format_from_filename("notes.md"),
            Some("markdown".to_string())
        );
        assert_eq!(
            registry.detect_format_from_filename("page.htm"),
            Some("html".to_string())
        );
        assert_eq!(registry.detect_format_from_filename("file.unknown"), None);
        assert_eq!(registry.detect_format_from_filename("no_extension"), None);
    }
}
