//! MA3 scribble document model and XML serialization.
//!
//! The console imports scribbles as
//!
//! ```text
//! <GMA3 DataVersion="2.2.1.1">
//!   <Scribble Name="...">
//!     <Scribble Size="2">
//!       <I>RRGGBB,thickness,x0,y0,x1,y1,x2,y2,x3,y3</I>
//!       ...
//! ```
//!
//! written without whitespace between elements.

use crate::color::StrokeColor;
use crate::error::{ScribbleError, ScribbleResult};
use crate::path::Segment;
use quick_xml::Writer;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use std::borrow::Cow;
use std::io::Write;

/// Format version expected by the console.
pub const DATA_VERSION: &str = "2.2.1.1";
/// Record thickness for input thickness 0.
pub const MIN_THICKNESS: f64 = 0.02;
/// Record thickness for input thickness 10.
pub const MAX_THICKNESS: f64 = 0.12;

/// Map a 0..10 stroke thickness onto the record thickness range.
pub fn thickness_to_scribble(thickness: f64) -> f64 {
    thickness / 10.0 * (MAX_THICKNESS - MIN_THICKNESS) + MIN_THICKNESS
}

/// One `<I>` line item.
#[derive(Debug, Clone, PartialEq)]
pub struct ScribbleRecord {
    pub color_hex: String,
    pub thickness: f64,
    pub points: [f64; 8],
}

impl ScribbleRecord {
    pub fn new(color: &StrokeColor, thickness: f64, segment: &Segment) -> Self {
        Self {
            color_hex: color.to_hex_rgb(),
            thickness,
            points: segment.to_array(),
        }
    }

    /// Color, thickness and the 8 coordinates, comma separated, with six
    /// fractional digits for every number.
    pub fn to_line(&self) -> String {
        let mut fields = Vec::with_capacity(10);
        fields.push(self.color_hex.clone());
        fields.push(format!("{:.6}", self.thickness));
        fields.extend(self.points.iter().map(|v| format!("{:.6}", v)));
        fields.join(",")
    }
}

/// A complete scribble ready to be serialized.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScribbleDocument {
    pub name: String,
    pub records: Vec<ScribbleRecord>,
}

impl ScribbleDocument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: Vec::new(),
        }
    }

    /// Build one record per normalized segment, keeping their order.
    pub fn from_segments(
        name: impl Into<String>,
        color: &StrokeColor,
        thickness: f64,
        segments: &[Segment],
    ) -> Self {
        let scribble_thickness = thickness_to_scribble(thickness);
        Self {
            name: name.into(),
            records: segments
                .iter()
                .map(|segment| ScribbleRecord::new(color, scribble_thickness, segment))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Write the document as console XML.
    pub fn write_xml<W: Write>(&self, out: W) -> ScribbleResult<()> {
        let mut writer = Writer::new(out);
        let size = self.records.len().to_string();

        write(
            &mut writer,
            Event::Start(BytesStart::new("GMA3").with_attributes([("DataVersion", DATA_VERSION)])),
        )?;
        let name = escape_attribute(&self.name);
        let mut named = BytesStart::new("Scribble");
        named.push_attribute(Attribute {
            key: QName(b"Name"),
            value: Cow::Borrowed(name.as_bytes()),
        });
        write(&mut writer, Event::Start(named))?;
        write(
            &mut writer,
            Event::Start(BytesStart::new("Scribble").with_attributes([("Size", size.as_str())])),
        )?;
        for record in &self.records {
            let line = record.to_line();
            write(&mut writer, Event::Start(BytesStart::new("I")))?;
            write(&mut writer, Event::Text(BytesText::new(&line)))?;
            write(&mut writer, Event::End(BytesEnd::new("I")))?;
        }
        write(&mut writer, Event::End(BytesEnd::new("Scribble")))?;
        write(&mut writer, Event::End(BytesEnd::new("Scribble")))?;
        write(&mut writer, Event::End(BytesEnd::new("GMA3")))?;
        Ok(())
    }

    /// Serialize into a string.
    pub fn to_xml(&self) -> ScribbleResult<String> {
        let mut buf = Vec::new();
        self.write_xml(&mut buf)?;
        String::from_utf8(buf).map_err(|e| ScribbleError::OutputEncode(e.to_string()))
    }
}

/// Escape an attribute value so that it reads back unchanged.
///
/// Tab, newline and carriage return become character references, since
/// attribute-value normalization would fold them into spaces. Characters
/// XML 1.0 does not allow are replaced with U+FFFD.
fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' => out.push_str("&#x9;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            c if !is_xml_char(c) => out.push(char::REPLACEMENT_CHARACTER),
            other => out.push(other),
        }
    }
    out
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

fn write<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> ScribbleResult<()> {
    writer
        .write_event(event)
        .map_err(|e| ScribbleError::OutputEncode(e.to_string()))
}
