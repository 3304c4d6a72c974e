//! Error types for Sextant operations.
//!
//! Domain data never produces an error: malformed or incomplete payloads
//! degrade to partial or empty scenes. [`SextantError`] covers the
//! operational failures around the layout core (reading input, decoding
//! JSON, validating configuration and exporting scenes).

use std::io;

use thiserror::Error;

/// The main error type for Sextant operations.
#[derive(Debug, Error)]
pub enum SextantError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl From<crate::export::Error> for SextantError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_error_is_wrapped() {
        let err: SextantError = crate::export::Error::Render("no engine".to_string()).into();
        assert!(matches!(err, SextantError::Export(_)));
        assert_eq!(err.to_string(), "Export error: Render error: no engine");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: SextantError = json_err.into();
        assert!(err.to_string().starts_with("Invalid JSON input:"));
    }
}
