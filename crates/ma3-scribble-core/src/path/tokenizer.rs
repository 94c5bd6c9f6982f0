//! Tokenizer for the restricted path-data mini-language.
//!
//! The tracer emits an absolute move-to followed by runs of relative `l` and
//! `c` commands with whole-unit coordinates, optionally closed with `z`:
//!
//! ```text
//! M2410 4468 c-137 -20 -264 -71 -372 -150 l-62 -16z
//! ```

use crate::error::{ScribbleError, ScribbleResult};

/// Kind of segment a command marker starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Relative line (`l`), two values per segment.
    Line,
    /// Relative cubic curve (`c`), six values per segment.
    Cubic,
}

impl SegmentKind {
    /// Number of values a builder of this kind consumes.
    pub fn arity(self) -> usize {
        match self {
            SegmentKind::Line => 2,
            SegmentKind::Cubic => 6,
        }
    }

    fn from_marker(token: &str) -> Option<Self> {
        match token {
            "l" => Some(SegmentKind::Line),
            "c" => Some(SegmentKind::Cubic),
            _ => None,
        }
    }
}

/// A single element of the token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathToken {
    /// A command marker starting a new run.
    Command(SegmentKind),
    /// An integer coordinate literal.
    Number(i64),
}

/// Markers that carry no coordinate payload and are dropped before splitting.
const DROPPED_MARKERS: [char; 3] = ['M', 'z', 'Z'];

/// Normalize raw path data so that every element is separated by a space.
fn prepare(data: &str) -> String {
    let mut prepared = String::with_capacity(data.len() + data.len() / 4);
    for ch in data.trim().chars() {
        match ch {
            '\n' => prepared.push(' '),
            '\r' | '\t' => {}
            c if DROPPED_MARKERS.contains(&c) => {}
            'c' | 'l' => {
                prepared.push(ch);
                prepared.push(' ');
            }
            c => prepared.push(c),
        }
    }
    prepared
}

/// Split path data into command markers and integer literals.
///
/// Empty fields produced by consecutive separators are skipped. Any other
/// token that is neither `l`, `c` nor an integer is rejected.
pub fn tokenize(data: &str) -> ScribbleResult<Vec<PathToken>> {
    prepare(data)
        .split(' ')
        .filter(|token| !token.is_empty())
        .enumerate()
        .map(|(index, token)| {
            if let Some(kind) = SegmentKind::from_marker(token) {
                return Ok(PathToken::Command(kind));
            }
            token
                .parse::<i64>()
                .map(PathToken::Number)
                .map_err(|_| ScribbleError::MalformedPathData {
                    token: token.to_string(),
                    index,
                })
        })
        .collect()
}
