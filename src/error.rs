//! Error types for monster generation.

use thiserror::Error;

/// Failures raised by the generation pipeline.
///
/// Partial mutagen fills and exhausted re-rolls are outcomes, not errors,
/// and never show up here.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ForgeError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unknown type: {0}")]
    UnknownType(String),

    #[error("invalid pairing {primary}/{secondary}: {reason}")]
    InvalidPairing {
        primary: String,
        secondary: String,
        reason: String,
    },
}

impl ForgeError {
    /// Errors a batch generator should answer with a fresh type draw.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ForgeError::UnknownType(_) | ForgeError::InvalidPairing { .. })
    }
}

pub type Result<T> = std::result::Result<T, ForgeError>;
