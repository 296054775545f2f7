//! Selection policy errors.

use crate::failure::FailureKind;

/// Errors that can occur while constructing a selection policy.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("Namespace prefix must not be empty")]
    EmptyPrefix,

    #[error("Invalid namespace prefix {prefix:?}: {message}")]
    InvalidPrefix { prefix: String, message: String },

    #[error("Failure kind {kind} cannot be placed in a catch-set")]
    ReservedKind { kind: FailureKind },
}
