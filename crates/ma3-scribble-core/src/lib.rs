//! MA3 Scribble Core Library
//!
//! Reinterprets traced SVG path data as cubic segments, normalizes them into
//! the unit square and encodes them as an MA3 scribble document.

pub mod color;
pub mod config;
pub mod convert;
pub mod error;
pub mod normalize;
pub mod path;
pub mod preview;
pub mod scribble;
pub mod svg;
pub mod transform;

pub use color::StrokeColor;
pub use config::ScribbleConfig;
pub use convert::{
    build_scribble, encode_svg_bytes_to_scribble, encode_svg_to_scribble, normalized_segments,
    preview_svg_bytes,
};
pub use error::{ScribbleError, ScribbleResult};
pub use normalize::Normalization;
pub use path::{Segment, SegmentBuilder, SegmentKind};
pub use preview::stroke_preview;
pub use scribble::{ScribbleDocument, ScribbleRecord, thickness_to_scribble};
pub use svg::{RawPath, VectorDocument, VectorGroup};
pub use transform::GroupTransform;
