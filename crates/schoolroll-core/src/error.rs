use thiserror::Error;

/// Core error type shared across schoolroll crates.
#[derive(Debug, Error)]
pub enum Error {
    /// Distribution targets are out of range or inconsistent.
    #[error("invalid targets: {0}")]
    InvalidTargets(String),
    /// A stored categorical value does not match any known label.
    #[error("unknown {kind} '{value}'")]
    UnknownCategory { kind: &'static str, value: String },
}

/// Convenience alias for results returned by schoolroll crates.
pub type Result<T> = std::result::Result<T, Error>;
