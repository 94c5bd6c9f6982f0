//! End-to-end conversion of a traced SVG document into a scribble.

use crate::config::ScribbleConfig;
use crate::error::{ScribbleError, ScribbleResult};
use crate::normalize::Normalization;
use crate::path::{self, Segment};
use crate::preview;
use crate::scribble::ScribbleDocument;
use crate::svg::VectorDocument;
use crate::transform::GroupTransform;

/// Normalize every path of the document, in group then path then emission order.
pub fn normalized_segments(document: &VectorDocument) -> ScribbleResult<Vec<Segment>> {
    let normalization = Normalization::new(document.width, document.height);
    let mut segments = Vec::new();

    for (group_index, group) in document.groups.iter().enumerate() {
        let transform = GroupTransform::parse(&group.transform)?;
        log::debug!(
            "Building group {} from {} paths (scale {:?}, translate {:?})",
            group_index,
            group.paths.len(),
            transform.scale,
            transform.translate
        );

        for raw in &group.paths {
            let traced = path::trace(&raw.command_string)?;
            log::trace!("Path produced {} segments", traced.len());
            segments.extend(
                traced
                    .iter()
                    .map(|segment| normalization.apply(segment, &transform)),
            );
        }
    }

    Ok(segments)
}

/// Build the scribble document for an already decoded SVG.
pub fn build_scribble(
    config: &ScribbleConfig,
    document: &VectorDocument,
) -> ScribbleResult<ScribbleDocument> {
    let segments = normalized_segments(document)?;
    Ok(ScribbleDocument::from_segments(
        config.name.clone(),
        &config.stroke_color,
        config.stroke_thickness,
        &segments,
    ))
}

/// Convert SVG text into serialized scribble XML.
pub fn encode_svg_to_scribble(config: &ScribbleConfig, svg: &str) -> ScribbleResult<String> {
    let document = VectorDocument::parse(svg)?;
    log::debug!(
        "Decoded svg {}x{} with {} groups and {} paths",
        document.width,
        document.height,
        document.groups.len(),
        document.path_count()
    );
    let scribble = build_scribble(config, &document)?;
    log::debug!("Encoding scribble {:?} with {} records", scribble.name, scribble.len());
    scribble.to_xml()
}

/// Same as [`encode_svg_to_scribble`] for raw bytes, which must be UTF-8.
pub fn encode_svg_bytes_to_scribble(config: &ScribbleConfig, svg: &[u8]) -> ScribbleResult<String> {
    encode_svg_to_scribble(config, decode_utf8(svg)?)
}

/// Validate a traced SVG and rewrite its fills into preview strokes in the
/// configured color.
pub fn preview_svg_bytes(config: &ScribbleConfig, svg: &[u8]) -> ScribbleResult<String> {
    let svg = decode_utf8(svg)?;
    let document = VectorDocument::parse(svg)?;
    log::debug!(
        "Previewing svg {}x{} with {} paths",
        document.width,
        document.height,
        document.path_count()
    );
    Ok(preview::stroke_preview(svg, &config.stroke_color))
}

fn decode_utf8(svg: &[u8]) -> ScribbleResult<&str> {
    std::str::from_utf8(svg)
        .map_err(|e| ScribbleError::InputDecode(format!("Svg is not valid UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::StrokeColor;

    fn record_fields(xml: &str) -> Vec<Vec<String>> {
        xml.split("<I>")
            .skip(1)
            .map(|chunk| {
                let body = &chunk[..chunk.find("</I>").unwrap()];
                body.split(',').map(str::to_string).collect()
            })
            .collect()
    }

    #[test]
    fn test_single_line_landscape() {
        let svg = r#"<svg width="100pt" height="50pt"><g transform="scale(1,1)"><path d="M0 0 l 10 10"/></g></svg>"#;
        let xml = encode_svg_to_scribble(&ScribbleConfig::default(), svg).unwrap();
        let records = record_fields(&xml);
        assert_eq!(records.len(), 1);
        let fields = &records[0];
        assert_eq!(fields.len(), 10);
        assert_eq!(fields[0], "FFFFFF");
        assert_eq!(fields[1], "0.022000");
        // Start (0,0): y = 0 + offsetY 0.25 + normalizedHeight 0.5.
        assert_eq!(fields[2], "0.000000");
        assert_eq!(fields[3], "0.750000");
        // Midpoint controls at (5,-5).
        assert_eq!(fields[4], "0.050000");
        assert_eq!(fields[5], "0.700000");
        // End (10,-10).
        assert_eq!(fields[8], "0.100000");
        assert_eq!(fields[9], "0.650000");
    }

    #[test]
    fn test_full_document_shape() {
        let config = ScribbleConfig::new()
            .with_name("Logo")
            .unwrap()
            .with_stroke_thickness(10.0)
            .unwrap()
            .with_stroke_color(StrokeColor::new(0x12, 0x34, 0x56, 0x00));
        let svg = r#"<svg width="10pt" height="10pt"><g transform="scale(0.1,0.1)"><path d="M0 0 c 0 0 0 0 10 10"/></g></svg>"#;
        let xml = encode_svg_to_scribble(&config, svg).unwrap();
        assert_eq!(
            xml,
            concat!(
                r#"<GMA3 DataVersion="2.2.1.1"><Scribble Name="Logo"><Scribble Size="1">"#,
                "<I>123456,0.120000,0.000000,1.000000,0.000000,1.000000,0.000000,1.000000,0.100000,1.100000</I>",
                "</Scribble></Scribble></GMA3>"
            )
        );
    }

    #[test]
    fn test_order_across_groups_and_paths() {
        let svg = r#"<svg width="100pt" height="100pt">
            <g transform="scale(1,1)"><path d="M0 0 l 10 0"/><path d="M0 0 l 20 0"/></g>
            <g transform="scale(1,1)"><path d="M0 0 l 30 0 40 0"/></g>
        </svg>"#;
        let xml = encode_svg_to_scribble(&ScribbleConfig::default(), svg).unwrap();
        let ends: Vec<String> = record_fields(&xml)
            .into_iter()
            .map(|fields| fields[8].clone())
            .collect();
        assert_eq!(ends, vec!["0.100000", "0.200000", "0.300000", "0.700000"]);
    }

    #[test]
    fn test_group_scale_applies_per_group() {
        let svg = r#"<svg width="100pt" height="100pt">
            <g transform="scale(1,1)"><path d="M10 0 l 0 0"/></g>
            <g transform="scale(2,1)"><path d="M10 0 l 0 0"/></g>
        </svg>"#;
        let document = VectorDocument::parse(svg).unwrap();
        let segments = normalized_segments(&document).unwrap();
        assert_eq!(segments.len(), 2);
        assert!((segments[0].0.p0.x - 0.1).abs() < 1e-12);
        assert!((segments[1].0.p0.x - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_deterministic_output() {
        let svg = r#"<svg width="640pt" height="480pt"><g transform="translate(0,480) scale(0.1,-0.1)"><path d="M100 200 c1 2 3 4 5 6 l 7 8z"/></g></svg>"#;
        let config = ScribbleConfig::default();
        let first = encode_svg_to_scribble(&config, svg).unwrap();
        let second = encode_svg_to_scribble(&config, svg).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_paths_produce_no_records() {
        let svg = r#"<svg width="10pt" height="20pt"><g transform="scale(1,1)"><path d="M5 5z"/></g></svg>"#;
        let xml = encode_svg_to_scribble(&ScribbleConfig::default(), svg).unwrap();
        assert!(xml.contains(r#"<Scribble Size="0"></Scribble>"#));
    }

    #[test]
    fn test_preview_rewrites_valid_svg() {
        let svg = r##"<svg width="10pt" height="10pt"><g fill="#000000" stroke="none" transform="scale(1,1)"><path d="M0 0 l 1 1"/></g></svg>"##;
        let config = ScribbleConfig::new().with_stroke_color(StrokeColor::new(1, 2, 3, 4));
        let out = preview_svg_bytes(&config, svg.as_bytes()).unwrap();
        assert!(out.contains(r##"<g fill="transparent" stroke="#01020304" stroke-width="50" transform="scale(1,1)">"##));
    }

    #[test]
    fn test_preview_rejects_non_svg() {
        let config = ScribbleConfig::default();
        assert!(matches!(
            preview_svg_bytes(&config, b"<html/>"),
            Err(ScribbleError::InputDecode(_))
        ));
        assert!(matches!(
            preview_svg_bytes(&config, &[0xff]),
            Err(ScribbleError::InputDecode(_))
        ));
    }

    #[test]
    fn test_errors_propagate() {
        let config = ScribbleConfig::default();
        let bad_path = r#"<svg width="1pt" height="1pt"><g transform="scale(1,1)"><path d="M0 0 l x y"/></g></svg>"#;
        assert!(matches!(
            encode_svg_to_scribble(&config, bad_path),
            Err(ScribbleError::MalformedPathData { .. })
        ));

        let bad_transform = r#"<svg width="1pt" height="1pt"><g transform="scale(x,1)"><path d="M0 0"/></g></svg>"#;
        assert!(matches!(
            encode_svg_to_scribble(&config, bad_transform),
            Err(ScribbleError::MalformedTransform { .. })
        ));

        assert!(matches!(
            encode_svg_bytes_to_scribble(&config, &[0xff, 0xfe, 0x00]),
            Err(ScribbleError::InputDecode(_))
        ));
    }
}
