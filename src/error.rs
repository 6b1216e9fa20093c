//! Error types for rule compilation.

use thiserror::Error;

/// Boxed error returned by external collaborators (the full-text preparer).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The main error type for rule compilation.
///
/// Degenerate rules (no operator, blank values, wrong arity) are not errors;
/// they compile to an empty fragment.
#[derive(Debug, Error)]
pub enum RuleError {
    /// The full-text query preparer failed. Passed through untouched.
    #[error(transparent)]
    FullText(BoxError),

    /// The output sink rejected a write.
    #[error("Failed to write fragment to output")]
    Sink(#[from] std::fmt::Error),

    /// Failed to parse the compact rule syntax.
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// Unknown value type id.
    #[error("Invalid value type: '{0}'")]
    InvalidValueType(String),

    /// Rule JSON could not be decoded.
    #[error("Invalid rule JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RuleError {
    /// Create a parse error at the given position.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    /// Wrap a full-text preparer failure.
    pub fn full_text(err: impl Into<BoxError>) -> Self {
        Self::FullText(err.into())
    }
}

/// Result type alias for rule compilation.
pub type RuleResult<T> = Result<T, RuleError>;
