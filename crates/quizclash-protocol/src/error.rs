//! Error types for the protocol layer.

/// Errors that can occur in the protocol layer.
///
/// Encoding failures come from the codec; `InvalidRoomId` comes from
/// parsing identifiers that arrive as untrusted strings.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// A room identifier was not a 6-digit number in `100000..=999999`.
    #[error("invalid room id: {0:?}")]
    InvalidRoomId(String),
}
