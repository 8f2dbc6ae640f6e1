//! CLI errors and their exit codes.
//!
//! - 0:  success
//! - 2:  clap argument error (raised before our code runs)
//! - 10: field error (bad dimensions, invalid parameter or color)
//! - 11: I/O error (reading a scene, writing a snapshot)
//! - 12: input error (malformed flag values)
//! - 13: serialization error

use node_field_core::FieldError;
use std::fmt;

pub enum CliError {
    Field(FieldError),
    Io(String),
    Input(String),
    Serialization(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Field(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Field(e) => write!(f, "{e}"),
            CliError::Io(msg) | CliError::Input(msg) | CliError::Serialization(msg) => {
                f.write_str(msg)
            }
        }
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CliError({}): {self}", self.exit_code())
    }
}

impl From<FieldError> for CliError {
    fn from(e: FieldError) -> Self {
        match e {
            FieldError::Io(msg) => CliError::Io(msg),
            other => CliError::Field(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [
            CliError::Field(FieldError::InvalidDimensions).exit_code(),
            CliError::Io("x".into()).exit_code(),
            CliError::Input("x".into()).exit_code(),
            CliError::Serialization("x".into()).exit_code(),
        ];
        assert_eq!(codes, [10, 11, 12, 13]);
    }

    #[test]
    fn field_io_routes_to_cli_io() {
        let err = CliError::from(FieldError::Io("disk full".into()));
        assert_eq!(err.exit_code(), 11);
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn other_field_errors_route_to_field() {
        let err = CliError::from(FieldError::InvalidColor("#zz".into()));
        assert_eq!(err.exit_code(), 10);
        assert!(err.to_string().contains("#zz"));
    }

    #[test]
    fn serde_errors_route_to_serialization() {
        let bad = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        assert_eq!(CliError::from(bad).exit_code(), 13);
    }
}
