//! Caller-facing conversion options.

use crate::color::StrokeColor;
use crate::error::{ScribbleError, ScribbleResult};
use serde::{Deserialize, Serialize};

/// Name used when the caller does not provide one.
pub const DEFAULT_NAME: &str = "MyScribble";
/// Default stroke thickness on the 0..10 input scale.
pub const DEFAULT_STROKE_THICKNESS: f64 = 0.2;
/// Maximum scribble name length in bytes.
pub const MAX_NAME_LEN: usize = 1000;
/// Upper bound of the input thickness scale.
pub const MAX_STROKE_THICKNESS: f64 = 10.0;

/// Options for one conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScribbleConfig {
    /// Name of the scribble object in the console.
    pub name: String,
    /// Stroke thickness from 0.0 to 10.0.
    pub stroke_thickness: f64,
    /// Stroke color; alpha is not written to records.
    pub stroke_color: StrokeColor,
}

impl Default for ScribbleConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            stroke_thickness: DEFAULT_STROKE_THICKNESS,
            stroke_color: StrokeColor::white(),
        }
    }
}

impl ScribbleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scribble name, bounded by [`MAX_NAME_LEN`].
    pub fn with_name(mut self, name: impl Into<String>) -> ScribbleResult<Self> {
        let name = name.into();
        if name.len() > MAX_NAME_LEN {
            return Err(ScribbleError::InvalidOption {
                field: "name",
                value: name,
                reason: format!("name exceeded max length of {}", MAX_NAME_LEN),
            });
        }
        self.name = name;
        Ok(self)
    }

    /// Set the stroke thickness, clamped into `0..=10`. Infinities clamp to
    /// the nearest bound; NaN is rejected.
    pub fn with_stroke_thickness(mut self, thickness: f64) -> ScribbleResult<Self> {
        if thickness.is_nan() {
            return Err(ScribbleError::InvalidOption {
                field: "stroke_thickness",
                value: thickness.to_string(),
                reason: "must be a number".to_string(),
            });
        }
        self.stroke_thickness = thickness.clamp(0.0, MAX_STROKE_THICKNESS);
        Ok(self)
    }

    pub fn with_stroke_color(mut self, color: StrokeColor) -> Self {
        self.stroke_color = color;
        self
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load options from JSON, re-applying the name and thickness bounds.
    pub fn from_json(json: &str) -> ScribbleResult<Self> {
        let raw: Self = serde_json::from_str(json).map_err(|e| ScribbleError::InvalidOption {
            field: "config",
            value: json.to_string(),
            reason: e.to_string(),
        })?;
        Self::new()
            .with_name(raw.name)?
            .with_stroke_thickness(raw.stroke_thickness)
            .map(|config| config.with_stroke_color(raw.stroke_color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScribbleConfig::default();
        assert_eq!(config.name, "MyScribble");
        assert!((config.stroke_thickness - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.stroke_color, StrokeColor::white());
    }

    #[test]
    fn test_thickness_is_clamped() {
        let config = ScribbleConfig::new().with_stroke_thickness(42.0).unwrap();
        assert_eq!(config.stroke_thickness, 10.0);
        let config = config.with_stroke_thickness(-3.0).unwrap();
        assert_eq!(config.stroke_thickness, 0.0);
    }

    #[test]
    fn test_thickness_rejects_nan() {
        assert!(ScribbleConfig::new().with_stroke_thickness(f64::NAN).is_err());
    }

    #[test]
    fn test_thickness_infinity_is_clamped() {
        let config = ScribbleConfig::new().with_stroke_thickness(f64::INFINITY).unwrap();
        assert_eq!(config.stroke_thickness, MAX_STROKE_THICKNESS);
        let config = config.with_stroke_thickness(f64::NEG_INFINITY).unwrap();
        assert_eq!(config.stroke_thickness, 0.0);
    }

    #[test]
    fn test_name_length_bound() {
        assert!(ScribbleConfig::new().with_name("a".repeat(MAX_NAME_LEN)).is_ok());
        let err = ScribbleConfig::new()
            .with_name("a".repeat(MAX_NAME_LEN + 1))
            .unwrap_err();
        assert!(err.is_client_fault());
    }

    #[test]
    fn test_json_load_applies_bounds() {
        let json = r#"{"name":"Stage","stroke_thickness":25.0,"stroke_color":{"r":1,"g":2,"b":3,"a":4}}"#;
        let config = ScribbleConfig::from_json(json).unwrap();
        assert_eq!(config.name, "Stage");
        assert_eq!(config.stroke_thickness, 10.0);
        assert_eq!(config.stroke_color, StrokeColor::new(1, 2, 3, 4));

        let saved = config.to_json().unwrap();
        assert_eq!(ScribbleConfig::from_json(&saved).unwrap(), config);
        assert!(ScribbleConfig::from_json("{").unwrap_err().is_client_fault());
    }
}
