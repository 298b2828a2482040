#![forbid(unsafe_code)]

//! Headless layout algorithms for selkie diagram models.
//!
//! Every layout here is pure and synchronous: given the same validated model
//! and the same options, output positions are bit-identical across runs. No
//! layout holds state between invocations, and none of them errors on
//! degenerate content — an empty model produces an empty layout, and the
//! force simulation degrades to best-effort positions when its iteration
//! budget runs out. The only errors are programmer errors (non-finite or
//! non-positive options).

pub mod force;
pub mod geom;
pub mod model;
pub mod radial;
pub mod sequence;
pub mod text;
pub mod timeline;
pub mod tree;

pub use force::{ForceOptions, layout_force};
pub use model::{
    ActivationBar, Bounds, DiagramLayout, ForceLayout, FragmentBox, MessageLine, ParticipantBox,
    Position, PositionMap, RadialLayout, SequenceLayout, TimelineCard, TimelineLayout,
    TimelineSide, TreeLayout,
};
pub use radial::{RadialOptions, layout_radial};
pub use sequence::{SequenceOptions, layout_sequence};
pub use text::{TextMetrics, TextScale};
pub use timeline::{TimelineOptions, layout_timeline};
pub use tree::{TreeOptions, layout_tree};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("layout extent must be finite and positive: {width}x{height} (padding {padding})")]
    InvalidExtent {
        width: f64,
        height: f64,
        padding: f64,
    },

    #[error("invalid layout options: {message}")]
    InvalidOptions { message: String },
}

pub(crate) fn validate_extent(width: f64, height: f64, padding: f64) -> Result<()> {
    let usable = width.is_finite()
        && height.is_finite()
        && padding.is_finite()
        && padding >= 0.0
        && width > 2.0 * padding
        && height > 2.0 * padding;
    if usable {
        Ok(())
    } else {
        Err(Error::InvalidExtent {
            width,
            height,
            padding,
        })
    }
}
