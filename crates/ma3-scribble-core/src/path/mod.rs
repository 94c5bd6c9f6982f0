//! Reconstruction of cubic segments from traced path data.

mod builder;
mod tokenizer;

pub use builder::{CubicBuilder, LineBuilder, SegmentBuilder};
pub use tokenizer::{PathToken, SegmentKind, tokenize};

use crate::error::{ScribbleError, ScribbleResult};
use kurbo::{CubicBez, Point};

/// One drawable unit: start, two control points and end.
///
/// Lines are stored as degenerate cubics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment(pub CubicBez);

impl Segment {
    pub fn points(&self) -> [Point; 4] {
        [self.0.p0, self.0.p1, self.0.p2, self.0.p3]
    }

    /// The 8 coordinates, X before Y for each point.
    pub fn to_array(&self) -> [f64; 8] {
        let [p0, p1, p2, p3] = self.points();
        [p0.x, p0.y, p1.x, p1.y, p2.x, p2.y, p3.x, p3.y]
    }

    /// Apply `f` to every point.
    pub fn map_points(&self, mut f: impl FnMut(Point) -> Point) -> Self {
        let [p0, p1, p2, p3] = self.points();
        Segment(CubicBez::new(f(p0), f(p1), f(p2), f(p3)))
    }
}

impl From<CubicBez> for Segment {
    fn from(bez: CubicBez) -> Self {
        Segment(bez)
    }
}

/// Turn raw path data into document-space segments, in emission order.
pub fn trace(data: &str) -> ScribbleResult<Vec<Segment>> {
    let tokens = tokenize(data)?;
    trace_tokens(&tokens)
}

/// Drive segment builders over an already tokenized path.
///
/// The first two numbers are the absolute move-to. Every later number is fed
/// to the builder of the current command run; when it completes, a fresh
/// builder of the same kind continues from the segment's end point.
pub fn trace_tokens(tokens: &[PathToken]) -> ScribbleResult<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut cursor = Point::ZERO;
    let mut move_to_values = 0;
    let mut builder: Option<SegmentBuilder> = None;

    for (index, token) in tokens.iter().enumerate() {
        match *token {
            PathToken::Command(kind) => {
                if move_to_values < 2 {
                    return Err(ScribbleError::MalformedPathData {
                        token: marker(kind).to_string(),
                        index,
                    });
                }
                if let Some(previous) = builder.as_ref() {
                    warn_if_partial(previous, index);
                }
                builder = Some(SegmentBuilder::new(kind, cursor));
            }
            PathToken::Number(value) if move_to_values < 2 => {
                if move_to_values == 0 {
                    cursor.x = value as f64;
                } else {
                    cursor.y = value as f64;
                }
                move_to_values += 1;
            }
            PathToken::Number(value) => {
                let Some(active) = builder.as_mut() else {
                    return Err(ScribbleError::BuilderStateViolation { index, value });
                };
                if active.feed(value as f64) {
                    segments.push(Segment(active.control_points()));
                    cursor = active.current_endpoint();
                    *active = active.restart();
                }
            }
        }
    }

    if let Some(active) = builder.as_ref() {
        warn_if_partial(active, tokens.len());
    }

    Ok(segments)
}

fn warn_if_partial(builder: &SegmentBuilder, index: usize) {
    if builder.is_partial() {
        log::warn!(
            "Dropping unfinished {:?} segment before token {}",
            builder.kind(),
            index
        );
    }
}

fn marker(kind: SegmentKind) -> &'static str {
    match kind {
        SegmentKind::Line => "l",
        SegmentKind::Cubic => "c",
    }
}
