//! JSON transport of document trees
//!
//! A node travels as `{"kind": ..., "payload": ..., "children": [...]}`.
//! Payloads are encoded by the codec their kind registered, so the wire form
//! of a payload is whatever the owning plugin's serde derive produces.
//! `payload` is omitted for structural nodes and `children` for leaves; the
//! absent node is `{"kind": ""}`.
//!
//! Decoding never trusts its input: the decoded tree is normalized before it
//! is returned, exactly like a freshly imported one.

use crate::error::EdmError;
use crate::node::{Kind, Node};
use crate::registry::KindRegistry;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize, Deserialize)]
struct WireNode {
    kind: Kind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payload: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<WireNode>,
}

fn encode(registry: &KindRegistry, node: &Node) -> Result<WireNode, EdmError> {
    let payload = match node.payload() {
        Some(payload) => Some(registry.encode_payload(node.kind(), payload)?),
        None => None,
    };
    let children = node
        .children()
        .iter()
        .map(|child| encode(registry, child))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(WireNode {
        kind: node.kind().clone(),
        payload,
        children,
    })
}

fn decode(registry: &KindRegistry, wire: WireNode) -> Result<Node, EdmError> {
    let payload = match wire.payload {
        Some(Value::Null) | None => None,
        Some(value) => Some(registry.decode_payload(&wire.kind, value)?),
    };
    let children = wire
        .children
        .into_iter()
        .map(|child| decode(registry, child))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Node::from_parts(wire.kind, payload, children))
}

/// Encodes a tree as a JSON value.
pub fn to_value(registry: &KindRegistry, node: &Node) -> Result<Value, EdmError> {
    let wire = encode(registry, node)?;
    serde_json::to_value(wire).map_err(|e| EdmError::Serialization(e.to_string()))
}

/// Encodes a tree as pretty-printed JSON.
pub fn to_string(registry: &KindRegistry, node: &Node) -> Result<String, EdmError> {
    let wire = encode(registry, node)?;
    serde_json::to_string_pretty(&wire).map_err(|e| EdmError::Serialization(e.to_string()))
}

/// Decodes and normalizes a tree.
///
/// Nesting is bounded by the JSON parser's own recursion limit.
pub fn from_str(registry: &KindRegistry, json: &str) -> Result<Node, EdmError> {
    let wire: WireNode =
        serde_json::from_str(json).map_err(|e| EdmError::Serialization(e.to_string()))?;
    let node = decode(registry, wire)?;
    registry.normalize(node)
}
