//! Outbound notifications.

use quizclash_protocol::{PlayerId, Recipient, RoomId};
use quizclash_room::Room;
use serde::{Deserialize, Serialize};

/// Why an operation was turned down. Sent back to the caller only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rejection {
    #[error("NOT_FOUND")]
    NotFound,
    #[error("IN_PROGRESS")]
    InProgress,
    #[error("FULL")]
    Full,
    #[error("NOT_HOST")]
    NotHost,
    #[error("INVALID_STATE")]
    InvalidState,
    /// Quick join found no public room with a free seat.
    #[error("NO_OPEN_ROOM")]
    NoOpenRoom,
}

/// A notification for clients, tagged by `type` on the wire.
///
/// ```json
/// {"type":"playerLeft","roomId":"482913","playerId":"sock-7","newHost":"sock-2"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    /// Full current state of a room.
    RoomUpdated { room: Room },

    /// Someone left a room that still exists.
    PlayerLeft {
        room_id: RoomId,
        player_id: PlayerId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        new_host: Option<PlayerId>,
    },

    /// The host deleted the room the recipient was in.
    RoomDeleted { room_id: RoomId },

    /// Room clock tick.
    Countdown { room_id: RoomId, remaining_secs: u64 },

    /// Room clock ran out.
    TimeUp { room_id: RoomId },

    /// The recipient's request was turned down.
    Rejected { reason: Rejection },
}

/// An encoded notification and who it is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub recipient: Recipient,
    pub payload: Vec<u8>,
}
