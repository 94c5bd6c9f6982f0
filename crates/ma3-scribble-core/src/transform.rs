//! Group transform resolution.

use crate::error::{ScribbleError, ScribbleResult};
use kurbo::Vec2;

/// Translate and scale factors of a group's `transform` attribute.
///
/// Only `scale` is applied to geometry; `translate` is kept for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupTransform {
    pub translate: Vec2,
    pub scale: Vec2,
}

impl Default for GroupTransform {
    /// Identity: no translation, unit scale.
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            scale: Vec2::new(1.0, 1.0),
        }
    }
}

impl GroupTransform {
    /// Parse a list of `name(a,b)` calls such as
    /// `translate(0.000000,1024.000000) scale(0.100000,-0.100000)`.
    ///
    /// Unknown function names are skipped. A later call of the same name
    /// overrides an earlier one.
    pub fn parse(description: &str) -> ScribbleResult<Self> {
        let mut transform = Self::default();
        let mut rest = description.trim();

        while !rest.is_empty() {
            let Some(open) = rest.find('(') else {
                log::debug!("Ignoring trailing transform text {:?}", rest);
                break;
            };
            let head = rest[..open].trim();
            let name = match head.rsplit_once(char::is_whitespace) {
                Some((skipped, name)) => {
                    log::debug!("Ignoring transform text {:?}", skipped.trim());
                    name
                }
                None => head,
            };
            let Some(close) = rest[open..].find(')').map(|i| open + i) else {
                if is_recognized(name) {
                    return Err(malformed(rest, "missing closing parenthesis"));
                }
                log::debug!("Ignoring unterminated transform function {:?}", name);
                break;
            };
            let action = format!("{}{}", name, &rest[open..=close]);
            let params = &rest[open + 1..close];

            match name {
                "translate" => transform.translate = parse_pair(&action, params)?,
                "scale" => transform.scale = parse_pair(&action, params)?,
                other => log::debug!("Ignoring transform function {:?}", other),
            }

            rest = rest[close + 1..].trim_start();
        }

        Ok(transform)
    }
}

fn is_recognized(name: &str) -> bool {
    matches!(name, "translate" | "scale")
}

fn malformed(action: &str, reason: &str) -> ScribbleError {
    ScribbleError::MalformedTransform {
        action: action.to_string(),
        reason: reason.to_string(),
    }
}

/// Parse exactly two finite floats separated by a comma and/or whitespace.
fn parse_pair(action: &str, params: &str) -> ScribbleResult<Vec2> {
    let values: Vec<&str> = params
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();
    let [first, second] = values.as_slice() else {
        return Err(malformed(
            action,
            &format!("expected 2 parameters, got {}", values.len()),
        ));
    };

    let parse = |raw: &str, position: &str| -> ScribbleResult<f64> {
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(malformed(
                action,
                &format!("parameter {} {:?} is not a finite number", position, raw),
            )),
        }
    };

    Ok(Vec2::new(parse(*first, "1")?, parse(*second, "2")?))
}
