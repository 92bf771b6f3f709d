//! Error types for road network generation

use thiserror::Error;

/// Main error type for the crate
///
/// Constraint violations and malformed grammar arguments are not errors: they
/// end a branch or fall back to defaults inside the interpreter.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Grammar error: {0}")]
    Grammar(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Config("divisions must be non-zero".into());
        assert_eq!(err.to_string(), "Config error: divisions must be non-zero");

        let err = Error::Grammar("script too long".into());
        assert_eq!(err.to_string(), "Grammar error: script too long");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
