//! Decoding of traced SVG documents.
//!
//! Only the structure the tracer produces is read: the root `svg` element's
//! `width`/`height`, its direct `g` children and their direct `path`
//! children. Everything else is skipped.

use crate::error::{ScribbleError, ScribbleResult};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Unit suffix the tracer appends to the root dimensions.
pub const DIMENSION_UNIT: &str = "pt";

/// Raw path data of one drawable shape.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawPath {
    pub command_string: String,
}

/// A top-level group with its transform description and paths.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VectorGroup {
    pub transform: String,
    pub paths: Vec<RawPath>,
}

/// Decoded input document.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorDocument {
    pub width: f64,
    pub height: f64,
    pub groups: Vec<VectorGroup>,
}

impl VectorDocument {
    /// Decode an SVG document.
    pub fn parse(svg: &str) -> ScribbleResult<Self> {
        let mut reader = Reader::from_str(svg);
        reader.config_mut().trim_text(true);

        let mut dimensions: Option<(f64, f64)> = None;
        let mut groups = Vec::new();
        let mut current_group: Option<VectorGroup> = None;
        let mut depth = 0usize;

        loop {
            let event = reader.read_event().map_err(|e| {
                ScribbleError::InputDecode(format!(
                    "Malformed XML at byte {}: {}",
                    reader.buffer_position(),
                    e
                ))
            })?;

            match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    let is_empty = matches!(event, Event::Empty(_));
                    let name = e.local_name();
                    match depth {
                        0 => {
                            if dimensions.is_some() {
                                return Err(ScribbleError::InputDecode(
                                    "Multiple root elements".to_string(),
                                ));
                            }
                            if name.as_ref() != b"svg" {
                                return Err(ScribbleError::InputDecode(format!(
                                    "Expected root element <svg>, found <{}>",
                                    String::from_utf8_lossy(name.as_ref())
                                )));
                            }
                            dimensions = Some(read_dimensions(e)?);
                        }
                        1 if name.as_ref() == b"g" => {
                            let group = VectorGroup {
                                transform: attribute(e, "transform")?.unwrap_or_default(),
                                paths: Vec::new(),
                            };
                            if is_empty {
                                groups.push(group);
                            } else {
                                current_group = Some(group);
                            }
                        }
                        2 if name.as_ref() == b"path" => {
                            if let Some(group) = current_group.as_mut() {
                                group.paths.push(RawPath {
                                    command_string: attribute(e, "d")?.unwrap_or_default(),
                                });
                            }
                        }
                        _ => {}
                    }
                    if !is_empty {
                        depth += 1;
                    }
                }
                Event::End(ref e) => {
                    depth = depth.saturating_sub(1);
                    if depth == 1 && e.local_name().as_ref() == b"g" {
                        if let Some(group) = current_group.take() {
                            log::trace!("Decoded group with {} paths", group.paths.len());
                            groups.push(group);
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if depth != 0 {
            return Err(ScribbleError::InputDecode(
                "Unexpected end of document".to_string(),
            ));
        }
        let Some((width, height)) = dimensions else {
            return Err(ScribbleError::InputDecode(
                "Missing <svg> root element".to_string(),
            ));
        };

        Ok(Self {
            width,
            height,
            groups,
        })
    }

    /// Total number of paths across all groups.
    pub fn path_count(&self) -> usize {
        self.groups.iter().map(|g| g.paths.len()).sum()
    }
}

/// Read an attribute value, unescaped.
fn attribute(element: &BytesStart, name: &str) -> ScribbleResult<Option<String>> {
    let attr = element.try_get_attribute(name).map_err(|e| {
        ScribbleError::InputDecode(format!("Malformed attribute {}: {}", name, e))
    })?;
    match attr {
        Some(attr) => attr
            .unescape_value()
            .map(|v| Some(v.into_owned()))
            .map_err(|e| ScribbleError::InputDecode(format!("Malformed attribute {}: {}", name, e))),
        None => Ok(None),
    }
}

fn read_dimensions(svg: &BytesStart) -> ScribbleResult<(f64, f64)> {
    let width = read_dimension(svg, "width")?;
    let height = read_dimension(svg, "height")?;
    Ok((width, height))
}

/// Parse a dimension like `1024.000000pt`.
fn read_dimension(svg: &BytesStart, name: &str) -> ScribbleResult<f64> {
    let raw = attribute(svg, name)?.ok_or_else(|| {
        ScribbleError::InputDecode(format!("Missing svg {} attribute", name))
    })?;
    let number = raw.trim().strip_suffix(DIMENSION_UNIT).unwrap_or(raw.trim());
    match number.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        Ok(_) => Err(ScribbleError::InputDecode(format!(
            "Svg {} must be positive, was {:?}",
            name, raw
        ))),
        Err(e) => Err(ScribbleError::InputDecode(format!(
            "Parse svg {} {:?}: {}",
            name, raw, e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACED: &str = r##"<?xml version="1.0" standalone="no"?>
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 20010904//EN"
 "http://www.w3.org/TR/2001/REC-SVG-20010904/DTD/svg10.dtd">
<svg version="1.0" xmlns="http://www.w3.org/2000/svg"
 width="640.000000pt" height="480.000000pt" viewBox="0 0 640.000000 480.000000"
 preserveAspectRatio="xMidYMid meet">
<metadata>
Created by potrace 1.16, written by Peter Selinger 2001-2019
</metadata>
<g transform="translate(0.000000,480.000000) scale(0.100000,-0.100000)"
fill="#ffffff" stroke="none">
<path d="M100 200 l10 10z"/>
<path d="M300 400 c1 2 3 4 5 6z"/>
</g>
</svg>
"##;

    #[test]
    fn test_parse_traced_document() {
        let doc = VectorDocument::parse(TRACED).unwrap();
        assert_eq!(doc.width, 640.0);
        assert_eq!(doc.height, 480.0);
        assert_eq!(doc.groups.len(), 1);
        assert_eq!(
            doc.groups[0].transform,
            "translate(0.000000,480.000000) scale(0.100000,-0.100000)"
        );
        assert_eq!(doc.path_count(), 2);
        assert_eq!(doc.groups[0].paths[1].command_string, "M300 400 c1 2 3 4 5 6z");
    }

    #[test]
    fn test_nested_elements_are_skipped() {
        let svg = r#"<svg width="10pt" height="10pt">
            <path d="M0 0 l 1 1"/>
            <g><g><path d="M0 0 l 2 2"/></g><path d="M0 0 l 3 3"/></g>
            <g/>
        </svg>"#;
        let doc = VectorDocument::parse(svg).unwrap();
        assert_eq!(doc.groups.len(), 2);
        assert_eq!(doc.groups[0].paths.len(), 1);
        assert_eq!(doc.groups[0].paths[0].command_string, "M0 0 l 3 3");
        assert!(doc.groups[0].transform.is_empty());
        assert!(doc.groups[1].paths.is_empty());
    }

    #[test]
    fn test_dimension_without_unit() {
        let doc = VectorDocument::parse(r#"<svg width="12" height="8.5"></svg>"#).unwrap();
        assert_eq!(doc.width, 12.0);
        assert_eq!(doc.height, 8.5);
        assert!(doc.groups.is_empty());
    }

    #[test]
    fn test_missing_dimension() {
        let err = VectorDocument::parse(r#"<svg width="10pt"></svg>"#).unwrap_err();
        assert!(matches!(err, ScribbleError::InputDecode(ref m) if m.contains("height")));
    }

    #[test]
    fn test_zero_dimension() {
        assert!(matches!(
            VectorDocument::parse(r#"<svg width="0pt" height="10pt"></svg>"#),
            Err(ScribbleError::InputDecode(_))
        ));
    }

    #[test]
    fn test_unparsable_dimension() {
        assert!(matches!(
            VectorDocument::parse(r#"<svg width="10px" height="10pt"></svg>"#),
            Err(ScribbleError::InputDecode(_))
        ));
    }

    #[test]
    fn test_wrong_root() {
        assert!(matches!(
            VectorDocument::parse(r#"<html width="1" height="1"></html>"#),
            Err(ScribbleError::InputDecode(_))
        ));
    }

    #[test]
    fn test_not_xml() {
        assert!(VectorDocument::parse("<svg width=\"1pt\" height=\"1pt\"><g></svg>").is_err());
        assert!(VectorDocument::parse("").is_err());
    }

    #[test]
    fn test_escaped_attribute() {
        let doc = VectorDocument::parse(
            r#"<svg width="1pt" height="1pt"><g transform="scale(1,&#49;)"/></svg>"#,
        )
        .unwrap();
        assert_eq!(doc.groups[0].transform, "scale(1,1)");
    }
}
