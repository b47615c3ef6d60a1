//! Envelope misuse errors.

use thiserror::Error;

/// Raised when an envelope is rendered in an invalid state.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeError {
    /// No status was ever set for this request.
    #[error("response status was never set")]
    StatusUnset,

    /// The status is not a valid HTTP status code.
    #[error("invalid HTTP status code: {0}")]
    InvalidStatus(u16),
}
