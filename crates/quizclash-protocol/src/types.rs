//! Core identifier and routing types.
//!
//! These are the values that cross the transport boundary in both
//! directions: clients name rooms by their 6-digit code, the transport
//! names players by their connection id.

use serde::{Deserialize, Serialize};

use std::fmt;

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Identifier of a connected player.
///
/// This is the transport-session id (one per connection), so it is an
/// opaque string rather than a number. `#[serde(transparent)]` keeps the
/// JSON form a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Wraps a transport-session id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrows the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PlayerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A room code: a 6-digit decimal string in `100000..=999999`.
///
/// Room codes are typed by players, so they stay strings on the wire.
/// Construction always goes through validation, so deserializing a
/// malformed code fails instead of producing an unreachable room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomId(pub(crate) String);

impl RoomId {
    /// Smallest valid room number.
    pub const MIN: u32 = 100_000;
    /// Largest valid room number.
    pub const MAX: u32 = 999_999;

    /// Builds a room id from its numeric value.
    ///
    /// # Errors
    /// Returns [`ProtocolError::InvalidRoomId`] if `value` is outside
    /// `MIN..=MAX`.
    pub fn from_number(value: u32) -> Result<Self, ProtocolError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value.to_string()))
        } else {
            Err(ProtocolError::InvalidRoomId(value.to_string()))
        }
    }

    /// Parses a room code typed by a player.
    ///
    /// # Errors
    /// Returns [`ProtocolError::InvalidRoomId`] unless `value` is exactly
    /// six ASCII digits without a leading zero.
    pub fn parse(value: &str) -> Result<Self, ProtocolError> {
        let well_formed = value.len() == 6
            && value.bytes().all(|b| b.is_ascii_digit())
            && !value.starts_with('0');
        if well_formed {
            Ok(Self(value.to_string()))
        } else {
            Err(ProtocolError::InvalidRoomId(value.to_string()))
        }
    }

    /// Borrows the code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RoomId> for String {
    fn from(id: RoomId) -> Self {
        id.0
    }
}

impl std::str::FromStr for RoomId {
    type Err = ProtocolError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Difficulty
// ---------------------------------------------------------------------------

/// Question difficulty tier, configured per room.
///
/// Serialized as `"EASY" | "MEDIUM" | "HARD"` to match the client.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// All tiers, easiest first.
    pub const ALL: [Difficulty; 3] =
        [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Easy => write!(f, "EASY"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::Hard => write!(f, "HARD"),
        }
    }
}

// ---------------------------------------------------------------------------
// Recipient
// ---------------------------------------------------------------------------

/// Specifies who should receive an outbound notification.
///
/// The transport layer owns the mapping from rooms to connections; the
/// engine only says which audience a notification targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    /// Send to one specific player.
    Player(PlayerId),

    /// Send to every member of a room.
    Room(RoomId),
}

// =========================================================================
// Tests
// =========================================================================
