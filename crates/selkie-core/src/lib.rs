#![forbid(unsafe_code)]

//! Diagram content model + hierarchy derivation (headless).
//!
//! Design goals:
//! - fail-soft payload boundary: degenerate content yields an empty/partial
//!   model, never an error (strict validation is opt-in)
//! - deterministic derived structures (the same payload always produces the
//!   same model and the same hierarchy)
//! - no I/O and no view state; everything downstream operates on the
//!   validated records only

pub mod entities;
pub mod error;
pub mod hierarchy;
pub mod model;

pub use entities::{
    Activation, Fragment, FragmentKind, LineStyle, Message, Participant, ParticipantKind,
    SequenceModel, TimelineEntry, TimelineModel,
};
pub use error::{Error, Result};
pub use hierarchy::{Hierarchy, HierarchyEntry};
pub use model::{Edge, GraphModel, Node, NodeKind};

#[derive(Debug, Clone, Copy, Default)]
pub struct PayloadOptions {
    pub suppress_errors: bool,
}

impl PayloadOptions {
    /// Strict validation (malformed payload entries are returned as errors).
    pub fn strict() -> Self {
        Self {
            suppress_errors: false,
        }
    }

    /// Lenient validation: malformed entries are skipped, missing or
    /// non-array fields yield an empty collection. This is the mode UI
    /// integrations should use — every payload, however degenerate,
    /// produces a usable (possibly empty) model.
    pub fn lenient() -> Self {
        Self {
            suppress_errors: true,
        }
    }
}
