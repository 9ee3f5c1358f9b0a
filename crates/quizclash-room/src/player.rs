//! Player records.

use quizclash_protocol::PlayerId;
use serde::{Deserialize, Serialize};

/// A participant in a room.
///
/// `health`, `score`, `current_question_index` and `elimination_time` are
/// owned by the combat layer; the room manager only initializes them and
/// resets them when a finished room goes back to waiting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub username: String,
    pub avatar_id: u32,
    pub health: u32,
    pub score: u32,
    pub current_question_index: u32,
    pub is_host: bool,
    /// Milliseconds since the Unix epoch at which health reached zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elimination_time: Option<u64>,
}

impl Player {
    /// Avatar assigned when the client doesn't pick one.
    pub const DEFAULT_AVATAR: u32 = 1;

    /// A fresh player with zeroed combat fields.
    pub fn new(
        id: PlayerId,
        username: impl Into<String>,
        avatar_id: Option<u32>,
        is_host: bool,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            avatar_id: avatar_id.unwrap_or(Self::DEFAULT_AVATAR),
            health: 0,
            score: 0,
            current_question_index: 0,
            is_host,
            elimination_time: None,
        }
    }

    /// Whether the player is still in the fight.
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Zeroes combat stats for a rematch.
    pub(crate) fn reset_for_new_game(&mut self) {
        self.health = 0;
        self.score = 0;
        self.current_question_index = 0;
        self.elimination_time = None;
    }
}
