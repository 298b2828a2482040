#![forbid(unsafe_code)]

//! `selkie` is a headless layout engine for chat-generated diagrams.
//!
//! It turns a loose node/edge payload (as produced by a content/LLM backend)
//! into 2-D geometry for four diagram families: radial mind maps, directed
//! knowledge graphs, sequence diagrams and vertical timelines. It performs
//! no network I/O and owns no view state — pan, zoom and hover belong to the
//! caller, which re-invokes the engine only when content changes.
//!
//! The boundary is fail-soft: every payload, however degenerate, yields a
//! valid (possibly empty) [`DiagramLayout`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use selkie_core::{
    Activation, Edge, Fragment, FragmentKind, GraphModel, Hierarchy, LineStyle, Message, Node,
    NodeKind, Participant, ParticipantKind, PayloadOptions, SequenceModel, TimelineEntry,
    TimelineModel,
};
pub use selkie_layout::{
    Bounds, DiagramLayout, ForceLayout, ForceOptions, Position, PositionMap, RadialLayout,
    RadialOptions, SequenceLayout, SequenceOptions, TextScale, TimelineLayout, TimelineOptions,
    TreeLayout, TreeOptions, layout_force, layout_radial, layout_sequence, layout_timeline,
    layout_tree,
};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Model(#[from] selkie_core::Error),
    #[error(transparent)]
    Layout(#[from] selkie_layout::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagramKind {
    MindMap,
    KnowledgeGraph,
    Sequence,
    Timeline,
}

impl DiagramKind {
    /// Maps a content-source type string (e.g. from a chat response) to a
    /// diagram kind. Unknown strings fall back to the knowledge graph,
    /// which handles arbitrary node/edge content.
    pub fn from_type_str(raw: &str) -> Self {
        match raw {
            "mindmap" | "mindMap" | "mind_map" => Self::MindMap,
            "sequence" | "sequenceDiagram" => Self::Sequence,
            "timeline" => Self::Timeline,
            _ => Self::KnowledgeGraph,
        }
    }
}

/// Per-family layout options with workable defaults for a ~1200x800 canvas.
#[derive(Debug, Clone, Default)]
pub struct LayoutOptions {
    pub tree: TreeOptions,
    pub radial: RadialOptions,
    pub force: ForceOptions,
    pub sequence: SequenceOptions,
    pub timeline: TimelineOptions,
}

/// Lays out one diagram payload.
///
/// The payload is validated leniently: malformed entries are skipped, edges
/// with unknown endpoints are dropped, unknown extra fields are ignored.
/// Knowledge graphs use the hierarchical tree layout when a single root
/// reaches every node, and fall back to the force-directed layout otherwise
/// (disconnected graphs, multiple roots, cycles hiding the root).
pub fn layout_payload(
    kind: DiagramKind,
    payload: &Value,
    options: &LayoutOptions,
) -> Result<DiagramLayout> {
    match kind {
        DiagramKind::MindMap => {
            let model = GraphModel::from_payload(payload, PayloadOptions::lenient())?;
            let layout = match Hierarchy::build(&model) {
                Some(hierarchy) => layout_radial(&hierarchy, &options.radial)?,
                None => RadialLayout::default(),
            };
            Ok(DiagramLayout::MindMap(layout))
        }
        DiagramKind::KnowledgeGraph => {
            let model = GraphModel::from_payload(payload, PayloadOptions::lenient())?;
            match Hierarchy::build(&model) {
                Some(hierarchy) if hierarchy.is_spanning() => {
                    Ok(DiagramLayout::Tree(layout_tree(&hierarchy, &options.tree)?))
                }
                _ => Ok(DiagramLayout::Force(layout_force(&model, &options.force)?)),
            }
        }
        DiagramKind::Sequence => {
            let model = SequenceModel::from_payload(payload, PayloadOptions::lenient())?;
            Ok(DiagramLayout::Sequence(layout_sequence(
                &model,
                &options.sequence,
            )?))
        }
        DiagramKind::Timeline => {
            let model = TimelineModel::from_payload(payload, PayloadOptions::lenient())?;
            Ok(DiagramLayout::Timeline(layout_timeline(
                &model,
                &options.timeline,
            )?))
        }
    }
}
