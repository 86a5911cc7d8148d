//! Kind registry for behavior discovery and selection
//!
//! This module binds each [`Kind`] to the behaviors plugins provide for it:
//! a structural spec, a Markdown emitter, an HTML renderer, a debug printer
//! and a payload codec. Importers are bound to external syntax-tree kinds
//! instead. The registry is an explicit value: it is filled once at startup
//! and then only read, so it can be shared by reference between threads.
//!
//! Output behaviors and importers may be replaced (last writer wins), which
//! keeps plugin load order irrelevant. Specs and payload codecs may not: a
//! second registration is a [`ConfigurationError`].

use crate::dispatch::Walk;
use crate::error::{ConfigurationError, DispatchError, EdmError};
use crate::import::{ExternalKind, ImportContext};
use crate::node::{Kind, Node, Payload};
use crate::spec::{NodeSpec, SpecTable};
use comrak::nodes::AstNode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::debug;

/// Converts a node to its Markdown source.
pub type MarkdownEmitter =
    Box<dyn Fn(&Node, &Walk<'_>) -> Result<String, EdmError> + Send + Sync>;

/// Converts a node to an HTML fragment.
pub type HtmlRenderer = Box<dyn Fn(&Node, &Walk<'_>) -> Result<String, EdmError> + Send + Sync>;

/// Prints a node as an indented tree dump at the given nesting level.
pub type DebugPrinter =
    Box<dyn Fn(&Node, usize, &Walk<'_>) -> Result<String, EdmError> + Send + Sync>;

/// Converts one external syntax-tree node into zero or more nodes.
///
/// The context is the continuation: importers call
/// [`ImportContext::import_children`] or [`ImportContext::import`] to decide
/// how their own children are imported.
pub type Importer = Box<
    dyn for<'a> Fn(&'a AstNode<'a>, &ImportContext<'_>) -> Result<Vec<Node>, EdmError>
        + Send
        + Sync,
>;

struct PayloadCodec {
    encode: fn(&dyn Payload) -> Option<Result<Value, serde_json::Error>>,
    decode: fn(Value) -> Result<Arc<dyn Payload>, serde_json::Error>,
}

fn encode_payload<T: Payload + Serialize>(
    payload: &dyn Payload,
) -> Option<Result<Value, serde_json::Error>> {
    payload
        .as_any()
        .downcast_ref::<T>()
        .map(serde_json::to_value)
}

fn decode_payload<T: Payload + DeserializeOwned>(
    value: Value,
) -> Result<Arc<dyn Payload>, serde_json::Error> {
    let payload: T = serde_json::from_value(value)?;
    Ok(Arc::new(payload))
}

/// Registry of node kinds and their behaviors
///
/// # Examples
///
/// ```ignore
/// let mut registry = KindRegistry::new();
/// registry.register_spec(NodeSpec::new(WIDGET, Flow::Inline))?;
/// registry.register(WIDGET, emit_widget, render_widget, debug_widget);
/// registry.register_importer(ExternalKind::SUPERSCRIPT, import_widget);
/// ```
#[derive(Default)]
pub struct KindRegistry {
    specs: SpecTable,
    markdown: HashMap<Kind, MarkdownEmitter>,
    html: HashMap<Kind, HtmlRenderer>,
    debug: HashMap<Kind, DebugPrinter>,
    importers: HashMap<ExternalKind, Importer>,
    codecs: HashMap<Kind, PayloadCodec>,
}

impl KindRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in kinds
    pub fn with_defaults() -> Result<Self, EdmError> {
        let mut registry = Self::new();
        crate::kinds::register_defaults(&mut registry)?;
        Ok(registry)
    }

    pub fn register_spec(&mut self, spec: NodeSpec) -> Result<(), ConfigurationError> {
        self.specs.register(spec)
    }

    /// Binds the three output behaviors of a kind at once.
    pub fn register<E, R, D>(&mut self, kind: Kind, emitter: E, renderer: R, printer: D)
    where
        E: Fn(&Node, &Walk<'_>) -> Result<String, EdmError> + Send + Sync + 'static,
        R: Fn(&Node, &Walk<'_>) -> Result<String, EdmError> + Send + Sync + 'static,
        D: Fn(&Node, usize, &Walk<'_>) -> Result<String, EdmError> + Send + Sync + 'static,
    {
        self.register_markdown(kind.clone(), emitter);
        self.register_html(kind.clone(), renderer);
        self.register_debug(kind, printer);
    }

    pub fn register_markdown<E>(&mut self, kind: Kind, emitter: E)
    where
        E: Fn(&Node, &Walk<'_>) -> Result<String, EdmError> + Send + Sync + 'static,
    {
        if self.markdown.insert(kind.clone(), Box::new(emitter)).is_some() {
            debug!(kind = %kind, "replaced markdown emitter");
        }
    }

    pub fn register_html<R>(&mut self, kind: Kind, renderer: R)
    where
        R: Fn(&Node, &Walk<'_>) -> Result<String, EdmError> + Send + Sync + 'static,
    {
        if self.html.insert(kind.clone(), Box::new(renderer)).is_some() {
            debug!(kind = %kind, "replaced html renderer");
        }
    }

    pub fn register_debug<D>(&mut self, kind: Kind, printer: D)
    where
        D: Fn(&Node, usize, &Walk<'_>) -> Result<String, EdmError> + Send + Sync + 'static,
    {
        if self.debug.insert(kind.clone(), Box::new(printer)).is_some() {
            debug!(kind = %kind, "replaced debug printer");
        }
    }

    pub fn register_importer<F>(&mut self, external: ExternalKind, importer: F)
    where
        F: for<'a> Fn(&'a AstNode<'a>, &ImportContext<'_>) -> Result<Vec<Node>, EdmError>
            + Send
            + Sync
            + 'static,
    {
        if self.importers.insert(external, Box::new(importer)).is_some() {
            debug!(external = %external, "replaced importer");
        }
    }

    /// Declares `T` as the payload type of `kind` for JSON transport.
    pub fn register_payload<T>(&mut self, kind: Kind) -> Result<(), ConfigurationError>
    where
        T: Payload + Serialize + DeserializeOwned,
    {
        if self.codecs.contains_key(&kind) {
            return Err(ConfigurationError::DuplicatePayloadCodec { kind });
        }
        self.codecs.insert(
            kind,
            PayloadCodec {
                encode: encode_payload::<T>,
                decode: decode_payload::<T>,
            },
        );
        Ok(())
    }

    pub fn specs(&self) -> &SpecTable {
        &self.specs
    }

    pub fn spec(&self, kind: &Kind) -> Option<&NodeSpec> {
        self.specs.get(kind)
    }

    pub fn markdown_emitter(&self, kind: &Kind) -> Option<&MarkdownEmitter> {
        self.markdown.get(kind)
    }

    pub fn html_renderer(&self, kind: &Kind) -> Option<&HtmlRenderer> {
        self.html.get(kind)
    }

    pub fn debug_printer(&self, kind: &Kind) -> Option<&DebugPrinter> {
        self.debug.get(kind)
    }

    pub fn importer(&self, external: ExternalKind) -> Option<&Importer> {
        self.importers.get(&external)
    }

    /// Check if anything at all is registered for a kind
    pub fn has_kind(&self, kind: &Kind) -> bool {
        self.specs.get(kind).is_some()
            || self.markdown.contains_key(kind)
            || self.html.contains_key(kind)
            || self.debug.contains_key(kind)
            || self.codecs.contains_key(kind)
    }

    /// List every kind with at least one registered behavior (sorted)
    pub fn list_kinds(&self) -> Vec<Kind> {
        let mut kinds: BTreeSet<Kind> = BTreeSet::new();
        kinds.extend(self.specs.kinds().into_iter().cloned());
        kinds.extend(self.markdown.keys().cloned());
        kinds.extend(self.html.keys().cloned());
        kinds.extend(self.debug.keys().cloned());
        kinds.extend(self.codecs.keys().cloned());
        kinds.into_iter().collect()
    }

    /// Validates a tree against the registered specs.
    pub fn normalize(&self, node: Node) -> Result<Node, EdmError> {
        self.specs.normalize(node)
    }

    pub(crate) fn normalize_imported(&self, node: Node) -> Result<Node, EdmError> {
        self.specs.normalize_imported(node)
    }

    pub(crate) fn encode_payload(&self, kind: &Kind, payload: &dyn Payload) -> Result<Value, EdmError> {
        let codec = self
            .codecs
            .get(kind)
            .ok_or_else(|| DispatchError::NoPayloadCodec { kind: kind.clone() })?;
        match (codec.encode)(payload) {
            Some(encoded) => encoded.map_err(|e| {
                EdmError::Serialization(format!("cannot encode payload of {kind}: {e}"))
            }),
            None => Err(EdmError::payload_mismatch(kind)),
        }
    }

    pub(crate) fn decode_payload(&self, kind: &Kind, value: Value) -> Result<Arc<dyn Payload>, EdmError> {
        let codec = self
            .codecs
            .get(kind)
            .ok_or_else(|| DispatchError::NoPayloadCodec { kind: kind.clone() })?;
        (codec.decode)(value)
            .map_err(|e| EdmError::Serialization(format!("cannot decode payload of {kind}: {e}")))
    }
}
