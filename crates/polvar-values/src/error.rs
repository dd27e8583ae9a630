//! Errors raised while loading values input.

/// Failures reading a values document or parsing `--set` overrides.
#[derive(Debug, thiserror::Error)]
pub enum ValuesError {
    #[error("failed to read values file {path}: {message}")]
    Io { path: String, message: String },

    #[error("failed to parse values document: {0}")]
    Parse(String),

    #[error("unexpected values document kind `{0}` (expected `Value`)")]
    UnexpectedKind(String),

    #[error("invalid override `{0}`: expected key=value")]
    InvalidOverride(String),
}
