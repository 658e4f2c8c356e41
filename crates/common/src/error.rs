//! Error types shared across cursorcast crates.

use std::path::PathBuf;

/// Top-level error type for cursorcast operations.
#[derive(Debug, thiserror::Error)]
pub enum CursorcastError {
    /// A prediction was requested before the template library was installed.
    #[error("Predictor not ready: template library has not finished loading")]
    NotReady,

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Template library error: {message}")]
    Template { message: String },

    #[error("Input tracking error: {message}")]
    InputTracking { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using CursorcastError.
pub type CursorcastResult<T> = Result<T, CursorcastError>;

impl CursorcastError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn template(msg: impl Into<String>) -> Self {
        Self::Template {
            message: msg.into(),
        }
    }

    pub fn input_tracking(msg: impl Into<String>) -> Self {
        Self::InputTracking {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_ready_message() {
        let err = CursorcastError::NotReady;
        assert!(err.to_string().contains("not finished loading"));
    }

    #[test]
    fn test_helper_constructors() {
        assert!(matches!(
            CursorcastError::config("k must be positive"),
            CursorcastError::Config { .. }
        ));
        assert_eq!(
            CursorcastError::template("bad lbos").to_string(),
            "Template library error: bad lbos"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: CursorcastError = io.into();
        assert!(matches!(err, CursorcastError::Io(_)));
    }
}
