//! Error types for the node-field core.
//!
//! Rendering itself never fails: an unavailable or zero-area surface is a
//! silent no-op. These errors only cover the fallible edges around it
//! (scene descriptions, configuration overrides, color strings, snapshots).

use thiserror::Error;

/// Errors produced while building or exporting a node field.
#[derive(Debug, Error)]
pub enum FieldError {
    /// Width or height was zero, or `width * height` overflowed.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A configuration value was present but unusable.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParam { name: String, reason: String },

    /// The parameter object itself had the wrong shape.
    #[error("invalid params: {0}")]
    InvalidParams(String),

    /// Writing a snapshot failed.
    #[error("i/o error: {0}")]
    Io(String),
}

impl FieldError {
    pub(crate) fn param(name: &str, reason: impl Into<String>) -> Self {
        FieldError::InvalidParam {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for FieldError {
    fn from(e: serde_json::Error) -> Self {
        FieldError::InvalidParams(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_dimensions_mentions_width_and_height() {
        let msg = FieldError::InvalidDimensions.to_string();
        assert!(msg.contains("width") && msg.contains("height"), "got: {msg}");
    }

    #[test]
    fn invalid_param_includes_name_and_reason() {
        let msg = FieldError::param("max_nodes", "must be finite").to_string();
        assert!(msg.contains("max_nodes"), "missing name in: {msg}");
        assert!(msg.contains("must be finite"), "missing reason in: {msg}");
    }

    #[test]
    fn invalid_color_includes_message() {
        let msg = FieldError::InvalidColor("bad hex".into()).to_string();
        assert!(msg.contains("bad hex"), "got: {msg}");
    }

    #[test]
    fn serde_errors_become_invalid_params() {
        let err = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        assert!(matches!(FieldError::from(err), FieldError::InvalidParams(_)));
    }

    #[test]
    fn field_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync + std::error::Error>() {}
        assert_send_sync::<FieldError>();
    }
}
