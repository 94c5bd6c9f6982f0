//! Stroke preview of a traced SVG.
//!
//! The tracer emits filled shapes. For previewing, the fills are swapped for
//! a stroke in the scribble color so the result looks like the console
//! drawing.

use crate::color::StrokeColor;

/// Fill attributes the tracer writes on its shapes.
pub const TRACED_FILLS: [&str; 2] = [
    r##"fill="#000000" stroke="none""##,
    r##"fill="#ffffff" stroke="none""##,
];

/// Stroke width of the preview, in document units.
pub const PREVIEW_STROKE_WIDTH: u32 = 50;

/// Attributes replacing each traced fill.
pub fn preview_attributes(color: &StrokeColor) -> String {
    format!(
        r#"fill="transparent" stroke="{}" stroke-width="{}""#,
        color.to_hex_rgba(),
        PREVIEW_STROKE_WIDTH
    )
}

/// Rewrite the traced fills of `svg` into colored strokes.
pub fn stroke_preview(svg: &str, color: &StrokeColor) -> String {
    let replacement = preview_attributes(color);
    let mut out = svg.to_string();
    for fill in TRACED_FILLS {
        let count = out.matches(fill).count();
        if count > 0 {
            log::debug!("Replacing {} traced fills {:?}", count, fill);
            out = out.replace(fill, &replacement);
        }
    }
    out
}
