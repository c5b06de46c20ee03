//! Error types for document configuration (thiserror-based).
//!
//! The history engine itself never fails: every degenerate call is a no-op or
//! a boolean signal. Only configuration can be rejected.

use thiserror::Error;

/// Errors raised while loading or validating a [`crate::HistoryConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `max_entries` must allow at least one undo step.
    #[error("history entry limit must be at least 1")]
    ZeroEntries,

    /// `max_bytes` must be non-zero.
    #[error("history byte budget must be at least 1 byte")]
    ZeroBytes,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        assert!(ConfigError::ZeroEntries.to_string().contains("entry limit"));
        assert!(ConfigError::ZeroBytes.to_string().contains("byte budget"));
    }

    #[test]
    fn json_error_conversion() {
        let result: Result<serde_json::Value, _> = serde_json::from_str("not json");
        let err: ConfigError = result.unwrap_err().into();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
