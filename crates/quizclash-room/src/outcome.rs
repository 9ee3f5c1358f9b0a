//! Per-operation results.
//!
//! These are expected, client-facing outcomes, not faults. Variants that
//! carry a room borrow it from the manager, so the reference can't be
//! held across the next mutation.

use quizclash_protocol::{PlayerId, RoomId};

use crate::Room;

/// Result of a direct join or a quick join.
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub enum JoinOutcome<'a> {
    /// The player is seated (or was already seated) in this room.
    Joined(&'a Room),
    /// No such room, or (quick join) no candidate room.
    NotFound,
    /// The room is not waiting for players.
    InProgress,
    /// The room is at `max_players`.
    Full,
}

impl JoinOutcome<'_> {
    pub fn room(&self) -> Option<&Room> {
        match self {
            Self::Joined(room) => Some(room),
            _ => None,
        }
    }
}

/// A successful leave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveOutcome {
    pub room_id: RoomId,
    /// `false` when the leaver was the last player and the room was deleted.
    pub room_still_exists: bool,
    /// Set when the leaver was host and someone else took over.
    pub new_host: Option<PlayerId>,
}

/// Result of a host settings update.
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub enum SettingsOutcome<'a> {
    Updated(&'a Room),
    NotFound,
    NotHost,
}

/// A deleted room and who was in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedRoom {
    pub room_id: RoomId,
    /// Players unregistered by the deletion, in seat order.
    pub evicted: Vec<PlayerId>,
}

/// Result of a host delete.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum DeleteOutcome {
    Deleted(DeletedRoom),
    NotFound,
    NotHost,
}

/// Result of a rematch request.
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub enum ContinueOutcome<'a> {
    Continued(&'a Room),
    NotFound,
    NotHost,
    /// The room hasn't finished yet.
    InvalidState,
}
