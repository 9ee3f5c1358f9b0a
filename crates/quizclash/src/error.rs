//! Unified error type for Quizclash.

use quizclash_protocol::ProtocolError;

use crate::Rejection;

/// Top-level error for engine entry points that take untrusted input.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum QuizclashError {
    /// Malformed client input (a room code that isn't six digits).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The operation was understood but turned down.
    #[error("rejected: {0}")]
    Rejected(#[from] Rejection),
}

impl QuizclashError {
    /// The rejection to report back to the client.
    ///
    /// Malformed room codes can never name a room, so they read as
    /// [`Rejection::NotFound`].
    pub fn rejection(&self) -> Rejection {
        match self {
            Self::Protocol(_) => Rejection::NotFound,
            Self::Rejected(reason) => *reason,
        }
    }
}
