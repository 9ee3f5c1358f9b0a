//! Error types for the room layer.

use quizclash_protocol::{PlayerId, RoomId};

/// Internal faults during room operations.
///
/// None of these are expected in normal play. The manager catches them
/// at the operation boundary, logs them, and reports the not-found
/// outcome instead of propagating.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The player index points at a room that no longer exists.
    #[error("player {player_id} indexed to missing room {room_id}")]
    StaleIndex { player_id: PlayerId, room_id: RoomId },

    /// The player index says the player is in a room that doesn't list them.
    #[error("player {player_id} not listed in room {room_id}")]
    MissingMember { player_id: PlayerId, room_id: RoomId },

    /// The end-of-game resolver failed.
    #[error("end-of-game resolution failed for room {room_id}: {reason}")]
    Resolution { room_id: RoomId, reason: String },
}
