use thiserror::Error;

use schoolroll_store::StoreError;

/// Errors emitted by the generation engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    #[error("core error: {0}")]
    Targets(#[from] schoolroll_core::Error),
    #[error("malformed family address '{address}': {reason}")]
    MalformedAddress {
        address: String,
        reason: &'static str,
    },
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
