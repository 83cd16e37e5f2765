//! Error types for datagram dissection.

use thiserror::Error;
use wire::DecodeError;

/// Result type for dissection.
pub type DissectResult<T> = Result<T, DissectError>;

/// Errors that abort the dissection of a whole datagram.
///
/// Per-command extraction failures do not abort a datagram; they are listed
/// in [`Dissection::rejected`](crate::Dissection::rejected) instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DissectError {
    /// The datagram envelope is malformed.
    #[error("malformed datagram: {0}")]
    Wire(#[from] DecodeError),
}
