use crate::{Error, PayloadOptions, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Role tag assigned by the content source. Unknown tags degrade to
/// [`NodeKind::Other`] so a newer content source never breaks validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    Root,
    Category,
    Leaf,
    Participant,
    Event,
    Other(String),
}

impl Default for NodeKind {
    fn default() -> Self {
        Self::Leaf
    }
}

impl From<String> for NodeKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "root" => Self::Root,
            "category" => Self::Category,
            "leaf" => Self::Leaf,
            "participant" => Self::Participant,
            "event" => Self::Event,
            _ => Self::Other(raw),
        }
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Root => "root".to_string(),
            NodeKind::Category => "category".to_string(),
            NodeKind::Leaf => "leaf".to_string(),
            NodeKind::Participant => "participant".to_string(),
            NodeKind::Event => "event".to_string(),
            NodeKind::Other(raw) => raw,
        }
    }
}

/// Immutable node record. Identity is the `id`; everything else is display
/// metadata carried through to the caller untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(default)]
    pub kind: NodeKind,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover: Option<String>,
}

/// Directed edge. Multiple edges between the same pair are permitted and are
/// laid out independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEdge {
    #[serde(default)]
    id: Option<String>,
    source: String,
    target: String,
    #[serde(default)]
    kind: Option<String>,
}

/// Validated node/edge collection.
///
/// Construction from a loose payload follows the boundary contract: unknown
/// extra fields are ignored, malformed elements are skipped (lenient mode),
/// and edges referencing unknown node ids are dropped in both modes — a
/// dangling reference is a content defect, not a caller error.
#[derive(Debug, Clone, Default)]
pub struct GraphModel {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    index: FxHashMap<String, usize>,
    dropped_edges: usize,
}

impl GraphModel {
    pub fn from_payload(payload: &Value, options: PayloadOptions) -> Result<Self> {
        let mut nodes: Vec<Node> = Vec::new();
        let mut index: FxHashMap<String, usize> = FxHashMap::default();

        for (i, item) in payload_array(payload, "nodes", options)?.iter().enumerate() {
            let node: Node = match serde_json::from_value(item.clone()) {
                Ok(node) => node,
                Err(err) => {
                    if options.suppress_errors {
                        tracing::debug!(index = i, %err, "skipping malformed node");
                        continue;
                    }
                    return Err(Error::InvalidPayload {
                        section: "nodes".to_string(),
                        message: err.to_string(),
                    });
                }
            };
            if node.id.is_empty() {
                if options.suppress_errors {
                    tracing::debug!(index = i, "skipping node with empty id");
                    continue;
                }
                return Err(Error::InvalidPayload {
                    section: "nodes".to_string(),
                    message: format!("node at index {i} has an empty id"),
                });
            }
            if index.contains_key(&node.id) {
                if options.suppress_errors {
                    tracing::warn!(id = %node.id, "duplicate node id; keeping the first occurrence");
                    continue;
                }
                return Err(Error::DuplicateId { id: node.id });
            }
            index.insert(node.id.clone(), nodes.len());
            nodes.push(node);
        }

        let mut edges: Vec<Edge> = Vec::new();
        let mut dropped_edges = 0usize;

        for (i, item) in payload_array(payload, "edges", options)?.iter().enumerate() {
            let raw: RawEdge = match serde_json::from_value(item.clone()) {
                Ok(raw) => raw,
                Err(err) => {
                    if options.suppress_errors {
                        tracing::debug!(index = i, %err, "skipping malformed edge");
                        continue;
                    }
                    return Err(Error::InvalidPayload {
                        section: "edges".to_string(),
                        message: err.to_string(),
                    });
                }
            };
            if !index.contains_key(&raw.source) || !index.contains_key(&raw.target) {
                tracing::warn!(
                    source = %raw.source,
                    target = %raw.target,
                    "dropping edge with unknown endpoint"
                );
                dropped_edges += 1;
                continue;
            }
            let id = raw
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| format!("edge_{}_{}_{i}", raw.source, raw.target));
            edges.push(Edge {
                id,
                source: raw.source,
                target: raw.target,
                kind: raw.kind,
            });
        }

        Ok(Self {
            nodes,
            edges,
            index,
            dropped_edges,
        })
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).and_then(|&i| self.nodes.get(i))
    }

    /// Stable index assigned at construction. Layout simulations use this as
    /// an arena slot so the hot loop never touches string ids.
    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of edges dropped at the boundary for referencing unknown node
    /// ids. Exposed for diagnostics; never an error.
    pub fn dropped_edge_count(&self) -> usize {
        self.dropped_edges
    }
}

pub(crate) fn payload_array<'a>(
    payload: &'a Value,
    key: &str,
    options: PayloadOptions,
) -> Result<&'a [Value]> {
    match payload.get(key) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(other) => {
            if options.suppress_errors {
                tracing::debug!(key, "payload field is not an array; treating as empty");
                Ok(&[])
            } else {
                Err(Error::InvalidPayload {
                    section: key.to_string(),
                    message: format!("expected an array, got {}", value_kind(other)),
                })
            }
        }
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
