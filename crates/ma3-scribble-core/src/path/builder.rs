//! Segment builders.
//!
//! A builder is rooted at the current pen position and accumulates the
//! relative values of one command run until a full segment is known.

use super::tokenizer::SegmentKind;
use kurbo::{CubicBez, Point, Vec2};

/// Accumulates `Δx Δy` for a relative line.
///
/// The Y delta is subtracted from the origin, unlike the cubic variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineBuilder {
    origin: Point,
    end: Point,
    fed: usize,
}

impl LineBuilder {
    pub fn new(origin: Point) -> Self {
        Self {
            origin,
            end: origin,
            fed: 0,
        }
    }

    fn feed(&mut self, value: f64) -> bool {
        match self.fed {
            0 => self.end.x = self.origin.x + value,
            1 => self.end.y = self.origin.y - value,
            _ => return true,
        }
        self.fed += 1;
        self.fed == SegmentKind::Line.arity()
    }

    /// Straight line expressed as a cubic with both controls at the midpoint.
    fn control_points(&self) -> CubicBez {
        let mid = self.origin.midpoint(self.end);
        CubicBez::new(self.origin, mid, mid, self.end)
    }
}

/// Accumulates `Δcx1 Δcy1 Δcx2 Δcy2 Δex Δey` for a relative cubic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBuilder {
    origin: Point,
    deltas: [Vec2; 3],
    fed: usize,
}

impl CubicBuilder {
    pub fn new(origin: Point) -> Self {
        Self {
            origin,
            deltas: [Vec2::ZERO; 3],
            fed: 0,
        }
    }

    fn feed(&mut self, value: f64) -> bool {
        if self.fed >= SegmentKind::Cubic.arity() {
            return true;
        }
        let delta = &mut self.deltas[self.fed / 2];
        if self.fed % 2 == 0 {
            delta.x = value;
        } else {
            delta.y = value;
        }
        self.fed += 1;
        self.fed == SegmentKind::Cubic.arity()
    }

    fn control_points(&self) -> CubicBez {
        let [c1, c2, end] = self.deltas;
        CubicBez::new(
            self.origin,
            self.origin + c1,
            self.origin + c2,
            self.origin + end,
        )
    }
}

/// Builder for the segment kind of the active command run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentBuilder {
    Line(LineBuilder),
    Cubic(CubicBuilder),
}

impl SegmentBuilder {
    /// Create an empty builder of `kind` rooted at `origin`.
    pub fn new(kind: SegmentKind, origin: Point) -> Self {
        match kind {
            SegmentKind::Line => SegmentBuilder::Line(LineBuilder::new(origin)),
            SegmentKind::Cubic => SegmentBuilder::Cubic(CubicBuilder::new(origin)),
        }
    }

    pub fn kind(&self) -> SegmentKind {
        match self {
            SegmentBuilder::Line(_) => SegmentKind::Line,
            SegmentBuilder::Cubic(_) => SegmentKind::Cubic,
        }
    }

    /// Feed the next relative value. Returns true once the segment is complete.
    pub fn feed(&mut self, value: f64) -> bool {
        match self {
            SegmentBuilder::Line(b) => b.feed(value),
            SegmentBuilder::Cubic(b) => b.feed(value),
        }
    }

    /// Start, both controls and end of the segment in document space.
    pub fn control_points(&self) -> CubicBez {
        match self {
            SegmentBuilder::Line(b) => b.control_points(),
            SegmentBuilder::Cubic(b) => b.control_points(),
        }
    }

    /// End point of the segment, which becomes the next origin.
    pub fn current_endpoint(&self) -> Point {
        self.control_points().p3
    }

    /// Fresh builder of the same kind rooted at this segment's end point.
    pub fn restart(&self) -> Self {
        Self::new(self.kind(), self.current_endpoint())
    }

    /// Whether some but not all values of the segment have been fed.
    pub fn is_partial(&self) -> bool {
        let fed = match self {
            SegmentBuilder::Line(b) => b.fed,
            SegmentBuilder::Cubic(b) => b.fed,
        };
        fed > 0 && fed < self.kind().arity()
    }
}
