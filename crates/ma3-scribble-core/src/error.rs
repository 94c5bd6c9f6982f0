//! Conversion errors.

use thiserror::Error;

/// Errors raised while converting an SVG document into a scribble.
///
/// Every variant is terminal for the conversion that produced it.
#[derive(Debug, Error)]
pub enum ScribbleError {
    /// The input is not well-formed XML or lacks usable dimensions.
    #[error("Input decode error: {0}")]
    InputDecode(String),
    /// A transform function carries parameters that are not two floats.
    #[error("Malformed transform {action:?}: {reason}")]
    MalformedTransform { action: String, reason: String },
    /// A path-data token is neither a command marker nor an integer.
    #[error("Malformed path data: token {token:?} at index {index}")]
    MalformedPathData { token: String, index: usize },
    /// A numeric token arrived while no segment builder was active.
    #[error("Builder state violation: value {value} at index {index} has no active builder")]
    BuilderStateViolation { index: usize, value: i64 },
    /// The scribble document could not be written.
    #[error("Output encode error: {0}")]
    OutputEncode(String),
    /// A caller-supplied conversion option is out of bounds.
    #[error("Invalid option {field}={value:?}: {reason}")]
    InvalidOption {
        field: &'static str,
        value: String,
        reason: String,
    },
}

impl ScribbleError {
    /// Whether the error was caused by the caller's input rather than by
    /// an internal failure.
    pub fn is_client_fault(&self) -> bool {
        match self {
            ScribbleError::InputDecode(_)
            | ScribbleError::MalformedTransform { .. }
            | ScribbleError::MalformedPathData { .. }
            | ScribbleError::InvalidOption { .. } => true,
            ScribbleError::BuilderStateViolation { .. } | ScribbleError::OutputEncode(_) => false,
        }
    }

    /// Short machine-readable name of the error class.
    pub fn kind(&self) -> &'static str {
        match self {
            ScribbleError::InputDecode(_) => "input_decode",
            ScribbleError::MalformedTransform { .. } => "malformed_transform",
            ScribbleError::MalformedPathData { .. } => "malformed_path_data",
            ScribbleError::BuilderStateViolation { .. } => "builder_state_violation",
            ScribbleError::OutputEncode(_) => "output_encode",
            ScribbleError::InvalidOption { .. } => "invalid_option",
        }
    }
}

/// Result type for conversion operations.
pub type ScribbleResult<T> = Result<T, ScribbleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_fault_classes() {
        assert!(ScribbleError::InputDecode("bad".into()).is_client_fault());
        assert!(
            ScribbleError::MalformedPathData {
                token: "x".into(),
                index: 3
            }
            .is_client_fault()
        );
        assert!(
            ScribbleError::MalformedTransform {
                action: "scale(a,b)".into(),
                reason: "invalid float literal".into()
            }
            .is_client_fault()
        );
        assert!(!ScribbleError::BuilderStateViolation { index: 2, value: 5 }.is_client_fault());
        assert!(!ScribbleError::OutputEncode("closed".into()).is_client_fault());
    }

    #[test]
    fn test_message_carries_offending_token() {
        let err = ScribbleError::MalformedPathData {
            token: "x".into(),
            index: 4,
        };
        let message = err.to_string();
        assert!(message.contains("\"x\""));
        assert!(message.contains("index 4"));
        assert_eq!(err.kind(), "malformed_path_data");
    }
}
