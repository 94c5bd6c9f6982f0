//! Mapping from document space into the 0..1 scribble space.

use crate::path::Segment;
use crate::transform::GroupTransform;
use kurbo::{Point, Vec2};

/// Scale and centering derived once from the document dimensions.
///
/// The larger dimension spans the full unit range and the shorter one is
/// centered. Y is shifted by the normalized height to flip the axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    pub scale_factor: f64,
    pub normalized_width: f64,
    pub normalized_height: f64,
    pub offset: Vec2,
}

impl Normalization {
    /// Both dimensions must be positive; the document decoder guarantees it.
    pub fn new(width: f64, height: f64) -> Self {
        let larger_dimension = width.max(height);
        let scale_factor = 1.0 / larger_dimension;

        let normalized_width = width * scale_factor;
        let normalized_height = height * scale_factor;

        let offset = if width > height {
            Vec2::new(0.0, (1.0 - normalized_height) / 2.0)
        } else {
            Vec2::new((1.0 - normalized_width) / 2.0, 0.0)
        };

        Self {
            scale_factor,
            normalized_width,
            normalized_height,
            offset,
        }
    }

    /// Map one document-space point. Operation order is kept fixed so the
    /// six-decimal output is reproducible.
    pub fn map_point(&self, point: Point, group_scale: Vec2) -> Point {
        let x = point.x * group_scale.x * self.scale_factor + self.offset.x;
        let y = point.y * group_scale.y * self.scale_factor + self.offset.y + self.normalized_height;
        Point::new(x, y)
    }

    /// Map all four points of a segment using the group's scale.
    pub fn apply(&self, segment: &Segment, transform: &GroupTransform) -> Segment {
        segment.map_points(|p| self.map_point(p, transform.scale))
    }
}
