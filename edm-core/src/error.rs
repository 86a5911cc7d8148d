//! Error types for document model operations
//!
//! Every failure surfaces as an [`EdmError`]. The variants mirror the four
//! stages a document goes through: importing the external syntax tree,
//! validating it against the registered specs, configuring the registry, and
//! dispatching a node to an output behavior. Format-level failures (unknown
//! format name, unsupported direction) come from the format layer used by the
//! CLI.

use crate::import::ExternalKind;
use crate::node::Kind;
use std::fmt;
use thiserror::Error;

/// Errors that can occur during document model operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EdmError {
    /// The external syntax tree could not be imported
    #[error("Import error: {0}")]
    Import(#[from] ImportError),
    /// A tree violated a registered node spec
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    /// The registry was configured inconsistently (startup only)
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    /// A node could not be sent to an output behavior
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
    /// Format not found in the format registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    /// Format does not support the requested direction
    #[error("Operation not supported: {0}")]
    NotSupported(String),
    /// Transport (JSON) encoding or decoding failed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Failures raised while walking the external syntax tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    /// No importer is registered and the node has no children to fall back on.
    #[error("unsupported {kind} node at {line}:{column}: {excerpt:?}")]
    Unsupported {
        kind: ExternalKind,
        line: usize,
        column: usize,
        excerpt: String,
    },
    #[error("document nesting exceeds the limit of {limit}")]
    NestingTooDeep { limit: usize },
    /// The external node did not have the shape its importer expects.
    #[error("malformed {kind} node: {reason}")]
    Malformed { kind: ExternalKind, reason: String },
}

/// Structural spec violations found during normalization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("node {kind} must not have children")]
    ChildrenForbidden { kind: Kind },
    #[error("child {child} not allowed in {parent}")]
    ChildNotAllowed { child: Kind, parent: Kind },
    /// A coercion function refused the children of `kind`.
    #[error("{kind} rejected its children: {reason}")]
    Rejected { kind: Kind, reason: String },
}

/// Registry misconfiguration. Raised while plugins register, never later.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("duplicate NodeSpec for kind {kind}")]
    DuplicateSpec { kind: Kind },
    #[error("duplicate payload codec for kind {kind}")]
    DuplicatePayloadCodec { kind: Kind },
}

/// Failures of the emit / render / debug walks and of payload transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("no {output} behavior registered for kind {kind}")]
    NoBehavior { kind: Kind, output: Output },
    /// The node's payload is not the type its kind's plugin owns.
    #[error("payload of kind {kind} has an unexpected type")]
    PayloadMismatch { kind: Kind },
    #[error("no payload codec registered for kind {kind}")]
    NoPayloadCodec { kind: Kind },
    #[error("tree nesting exceeds the limit of {limit}")]
    NestingTooDeep { limit: usize },
}

/// The output a dispatch walk produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Output {
    Markdown,
    Html,
    Debug,
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Markdown => write!(f, "markdown"),
            Output::Html => write!(f, "html"),
            Output::Debug => write!(f, "debug"),
        }
    }
}

impl EdmError {
    /// Creates a coercion rejection for `kind`.
    pub fn rejected(kind: &Kind, reason: impl Into<String>) -> Self {
        ValidationError::Rejected {
            kind: kind.clone(),
            reason: reason.into(),
        }
        .into()
    }

    /// Creates a payload type mismatch for `kind`.
    pub fn payload_mismatch(kind: &Kind) -> Self {
        DispatchError::PayloadMismatch { kind: kind.clone() }.into()
    }
}
