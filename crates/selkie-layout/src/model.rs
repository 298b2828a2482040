use indexmap::IndexMap;
use selkie_core::{FragmentKind, LineStyle};
use serde::{Deserialize, Serialize};

/// Node id → position, in layout placement order. Positions are in an
/// abstract plane; the caller applies its own scale/translate for pan and
/// zoom.
pub type PositionMap = IndexMap<String, Position>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut it = points.into_iter();
        let (x0, y0) = it.next()?;
        let mut b = Self {
            min_x: x0,
            min_y: y0,
            max_x: x0,
            max_y: y0,
        };
        for (x, y) in it {
            b.min_x = b.min_x.min(x);
            b.min_y = b.min_y.min(y);
            b.max_x = b.max_x.max(x);
            b.max_y = b.max_y.max(y);
        }
        Some(b)
    }

    pub fn from_positions<'a>(positions: impl IntoIterator<Item = &'a Position>) -> Option<Self> {
        Self::from_points(positions.into_iter().map(|p| (p.x, p.y)))
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreeLayout {
    pub positions: PositionMap,
    pub bounds: Option<Bounds>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RadialLayout {
    pub positions: PositionMap,
    pub bounds: Option<Bounds>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForceLayout {
    pub positions: PositionMap,
    pub bounds: Option<Bounds>,
    /// False when the simulation exhausted its iteration budget. Best-effort
    /// positions are still returned; this flag exists for diagnostics only.
    pub converged: bool,
    pub iterations: usize,
}

/// Participant header box plus its lifeline. `x`/`y` are the box top-left;
/// the lifeline runs vertically through `center_x`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantBox {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub center_x: f64,
    pub lifeline_top: f64,
    pub lifeline_bottom: f64,
}

/// Message geometry: a polyline through `points`. Normal messages are a
/// horizontal two-point segment; self-messages bow outward from the
/// lifeline as a four-point loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageLine {
    pub step: u32,
    pub source: String,
    pub target: String,
    pub points: Vec<Position>,
    pub self_message: bool,
    pub line: LineStyle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivationBar {
    pub participant: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FragmentBox {
    pub kind: FragmentKind,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SequenceLayout {
    pub participants: Vec<ParticipantBox>,
    pub messages: Vec<MessageLine>,
    pub activations: Vec<ActivationBar>,
    pub fragments: Vec<FragmentBox>,
    pub bounds: Option<Bounds>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelineSide {
    Left,
    Right,
}

/// One timeline entry card. `entry` indexes into the source
/// [`selkie_core::TimelineModel`] entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineCard {
    pub entry: usize,
    pub side: TimelineSide,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimelineLayout {
    pub cards: Vec<TimelineCard>,
    pub spine_x: f64,
    pub spine_top: f64,
    pub spine_bottom: f64,
    pub bounds: Option<Bounds>,
}

/// The layout produced for one diagram render. Knowledge graphs dispatch to
/// either the tree or the force variant depending on whether a spanning
/// hierarchy exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DiagramLayout {
    MindMap(RadialLayout),
    Tree(TreeLayout),
    Force(ForceLayout),
    Sequence(SequenceLayout),
    Timeline(TimelineLayout),
}

impl DiagramLayout {
    /// The node-position map, for the families that produce one.
    pub fn positions(&self) -> Option<&PositionMap> {
        match self {
            Self::MindMap(l) => Some(&l.positions),
            Self::Tree(l) => Some(&l.positions),
            Self::Force(l) => Some(&l.positions),
            Self::Sequence(_) | Self::Timeline(_) => None,
        }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            Self::MindMap(l) => l.bounds,
            Self::Tree(l) => l.bounds,
            Self::Force(l) => l.bounds,
            Self::Sequence(l) => l.bounds,
            Self::Timeline(l) => l.bounds,
        }
    }
}
