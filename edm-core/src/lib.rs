//! Extensible document model
//!
//!     This crate mediates between three representations of a text document: Markdown source,
//!     a semantic tree, and rendered HTML. Markdown emitted from a tree parses back to an equal
//!     tree, which is what editing workflows rely on.
//!
//!     TLDR: For kind authors:
//!         - A kind is a string identifier, not an enum variant. Nothing central matches on kinds.
//!         - A kind plugin registers a NodeSpec (flow + child rule + optional coercion), a Markdown
//!           emitter, an HTML renderer, a debug printer, a payload codec if it carries data, and
//!           importers for the comrak node kinds it claims.
//!         - Every behavior recurses through the context it is handed (ImportContext or Walk),
//!           never through globals.
//!         - Every failure is an EdmError returned up the whole recursion. Nothing panics.
//!
//! Architecture
//!
//!     Markdown → comrak syntax tree → import adapter (per-kind importers) → raw tree →
//!     normalization against the specs → validated tree → {Markdown | HTML | debug | JSON}.
//!
//!     The registry is an explicit value, filled once at startup and read-only afterwards. It is
//!     carried by a DocModel together with the import options, so two models with different
//!     kind sets can live side by side.
//!
//!     The file structure :
//!     .
//!     ├── error.rs                # EdmError and the per-stage error enums
//!     ├── node.rs                 # Kind, Payload, Node
//!     ├── spec.rs                 # NodeSpec, SpecTable, normalization
//!     ├── registry.rs             # KindRegistry: behaviors per kind
//!     ├── import.rs               # comrak syntax tree → Node
//!     ├── dispatch.rs             # Markdown / HTML / debug walks
//!     ├── serialize.rs            # JSON transport
//!     ├── options.rs              # import options
//!     ├── kinds                   # built-in kind plugins
//!     ├── common                  # escaping helpers shared by plugins
//!     ├── format.rs               # Format trait + FormatRegistry
//!     └── formats                 # markdown, html, tree, json
//!
//! Testing
//!     tests
//!     └── <format>
//!         └── <testname>.rs
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include these
//!     in the mod.
//!
//! The absent node
//!
//!     Node::default() means "no content". Importing an empty document yields it, and every
//!     output walk maps it to the empty string (the debug walk prints `<nil>`).

pub mod common;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod formats;
pub mod import;
pub mod kinds;
pub mod node;
pub mod options;
pub mod registry;
pub mod serialize;
pub mod spec;

pub use error::{
    ConfigurationError, DispatchError, EdmError, ImportError, Output, ValidationError,
};
pub use format::{Format, FormatRegistry};
pub use import::{ExternalKind, ImportContext};
pub use node::{Kind, Node, Payload};
pub use options::{Options, SoftBreak};
pub use registry::KindRegistry;
pub use spec::{ChildRule, Flow, NodeSpec};

use dispatch::Walk;

/// A kind registry and the options it is used with.
///
/// All entry points of the crate hang off this value. It is `Send + Sync`
/// and never mutated after construction, so one model can serve any number
/// of threads.
pub struct DocModel {
    registry: KindRegistry,
    options: Options,
}

impl DocModel {
    pub fn new(registry: KindRegistry, options: Options) -> Self {
        DocModel { registry, options }
    }

    /// Built-in kinds with default options.
    pub fn with_defaults() -> Result<Self, EdmError> {
        Self::with_options(Options::default())
    }

    /// Built-in kinds with the given options.
    pub fn with_options(options: Options) -> Result<Self, EdmError> {
        Ok(Self::new(KindRegistry::with_defaults()?, options))
    }

    pub fn registry(&self) -> &KindRegistry {
        &self.registry
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    fn walk(&self) -> Walk<'_> {
        Walk::new(&self.registry, self.options.max_depth)
    }

    /// Parses and imports Markdown into a normalized tree.
    pub fn parse_markdown(&self, source: &str) -> Result<Node, EdmError> {
        import::parse_markdown(&self.registry, &self.options, source)
    }

    /// Validates a hand-built tree against the registered specs.
    pub fn normalize(&self, node: Node) -> Result<Node, EdmError> {
        self.registry.normalize(node)
    }

    pub fn to_markdown(&self, node: &Node) -> Result<String, EdmError> {
        self.walk().markdown(node)
    }

    pub fn to_html(&self, node: &Node) -> Result<String, EdmError> {
        self.walk().html(node)
    }

    /// Indented debug dump, starting at nesting level 0.
    pub fn debug(&self, node: &Node) -> Result<String, EdmError> {
        self.walk().debug(node, 0)
    }

    pub fn to_json(&self, node: &Node) -> Result<String, EdmError> {
        serialize::to_string(&self.registry, node)
    }

    /// Decodes a JSON tree and normalizes it. Trees deeper than
    /// `max_depth` are refused like an over-nested import.
    pub fn parse_json(&self, json: &str) -> Result<Node, EdmError> {
        let node = serialize::from_str(&self.registry, json)?;
        if node.depth() > self.options.max_depth {
            return Err(ImportError::NestingTooDeep {
                limit: self.options.max_depth,
            }
            .into());
        }
        Ok(node)
    }
}
