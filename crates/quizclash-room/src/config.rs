//! Room configuration and state machine.

use quizclash_protocol::Difficulty;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Settings for one room.
///
/// Immutable except through the host's settings update, which applies a
/// [`RoomConfigPatch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomConfig {
    /// Game clock in seconds.
    pub time_limit: u32,

    /// Tier passed to the question generator.
    #[serde(alias = "Difficulty")]
    pub difficulty: Difficulty,

    /// Maximum players allowed in the room.
    pub max_players: usize,

    /// Damage dealt by a correct answer.
    pub attack_damage: u32,

    /// Health restored by a heal.
    pub heal_amount: u32,

    /// Health lost on a wrong answer.
    pub wrong_answer_penalty: u32,

    /// Whether quick join may place players here.
    pub is_public: bool,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            time_limit: 60,
            difficulty: Difficulty::Medium,
            max_players: 4,
            attack_damage: 5,
            heal_amount: 3,
            wrong_answer_penalty: 3,
            is_public: false,
        }
    }
}

impl RoomConfig {
    /// Defaults with `patch` merged over them.
    pub fn from_patch(patch: RoomConfigPatch) -> Self {
        let mut config = Self::default();
        config.apply(patch);
        config
    }

    /// Shallow merge: fields present in `patch` replace the current
    /// values, absent fields are left untouched.
    pub fn apply(&mut self, patch: RoomConfigPatch) {
        let RoomConfigPatch {
            time_limit,
            difficulty,
            max_players,
            attack_damage,
            heal_amount,
            wrong_answer_penalty,
            is_public,
        } = patch;

        if let Some(v) = time_limit {
            self.time_limit = v;
        }
        if let Some(v) = difficulty {
            self.difficulty = v;
        }
        if let Some(v) = max_players {
            self.max_players = v;
        }
        if let Some(v) = attack_damage {
            self.attack_damage = v;
        }
        if let Some(v) = heal_amount {
            self.heal_amount = v;
        }
        if let Some(v) = wrong_answer_penalty {
            self.wrong_answer_penalty = v;
        }
        if let Some(v) = is_public {
            self.is_public = v;
        }
    }
}

/// A partial [`RoomConfig`]: `None` means "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoomConfigPatch {
    pub time_limit: Option<u32>,
    #[serde(alias = "Difficulty")]
    pub difficulty: Option<Difficulty>,
    pub max_players: Option<usize>,
    pub attack_damage: Option<u32>,
    pub heal_amount: Option<u32>,
    pub wrong_answer_penalty: Option<u32>,
    pub is_public: Option<bool>,
}

// ---------------------------------------------------------------------------
// RoomStatus
// ---------------------------------------------------------------------------

/// The lifecycle state of a room.
///
/// ```text
/// Waiting ──(game start)──→ InProgress ──(elimination)──→ Finished
///    ↑                                                       │
///    └──────────────────────(continue)───────────────────────┘
/// ```
///
/// Start and finish are driven by the combat layer; the manager itself
/// only performs `Finished → Waiting`. Deletion can happen in any state
/// and is not a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomStatus {
    #[default]
    Waiting,
    InProgress,
    Finished,
}

impl RoomStatus {
    /// Returns `true` if the room is accepting new players.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Waiting)
    }

    /// The single valid successor of this state.
    pub fn next(self) -> Self {
        match self {
            Self::Waiting => Self::InProgress,
            Self::InProgress => Self::Finished,
            Self::Finished => Self::Waiting,
        }
    }

    /// Returns `true` if transitioning to `target` is valid.
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == target
    }
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Waiting => write!(f, "WAITING"),
            Self::InProgress => write!(f, "IN_PROGRESS"),
            Self::Finished => write!(f, "FINISHED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_config_defaults() {
        let c = RoomConfig::default();
        assert_eq!(c.time_limit, 60);
        assert_eq!(c.difficulty, Difficulty::Medium);
        assert_eq!(c.max_players, 4);
        assert_eq!(c.attack_damage, 5);
        assert_eq!(c.heal_amount, 3);
        assert_eq!(c.wrong_answer_penalty, 3);
        assert!(!c.is_public);
    }

    #[test]
    fn test_apply_is_partial() {
        let mut c = RoomConfig::default();
        c.apply(RoomConfigPatch {
            max_players: Some(6),
            is_public: Some(true),
            ..RoomConfigPatch::default()
        });
        assert_eq!(c.max_players, 6);
        assert!(c.is_public);
        assert_eq!(c.time_limit, 60);
        assert_eq!(c.difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_from_patch_merges_over_defaults() {
        let c = RoomConfig::from_patch(RoomConfigPatch {
            difficulty: Some(Difficulty::Hard),
            ..RoomConfigPatch::default()
        });
        assert_eq!(c.difficulty, Difficulty::Hard);
        assert_eq!(c.max_players, 4);
    }

    #[test]
    fn test_patch_deserializes_partial_camel_case() {
        let patch: RoomConfigPatch =
            serde_json::from_str(r#"{"timeLimit": 90, "Difficulty": "EASY"}"#).unwrap();
        assert_eq!(patch.time_limit, Some(90));
        assert_eq!(patch.difficulty, Some(Difficulty::Easy));
        assert_eq!(patch.max_players, None);
    }

    #[test]
    fn test_config_json_is_camel_case() {
        let json = serde_json::to_value(RoomConfig::default()).unwrap();
        assert_eq!(json["timeLimit"], 60);
        assert_eq!(json["maxPlayers"], 4);
        assert_eq!(json["wrongAnswerPenalty"], 3);
        assert_eq!(json["isPublic"], false);
        assert_eq!(json["difficulty"], "MEDIUM");
    }

    #[test]
    fn test_room_status_cycle() {
        assert_eq!(RoomStatus::Waiting.next(), RoomStatus::InProgress);
        assert_eq!(RoomStatus::InProgress.next(), RoomStatus::Finished);
        assert_eq!(RoomStatus::Finished.next(), RoomStatus::Waiting);
    }

    #[test]
    fn test_room_status_can_transition_to() {
        assert!(RoomStatus::Waiting.can_transition_to(RoomStatus::InProgress));
        assert!(!RoomStatus::Waiting.can_transition_to(RoomStatus::Finished));
        assert!(RoomStatus::Finished.can_transition_to(RoomStatus::Waiting));
        assert!(!RoomStatus::InProgress.can_transition_to(RoomStatus::Waiting));
    }

    #[test]
    fn test_room_status_is_joinable() {
        assert!(RoomStatus::Waiting.is_joinable());
        assert!(!RoomStatus::InProgress.is_joinable());
        assert!(!RoomStatus::Finished.is_joinable());
    }

    #[test]
    fn test_room_status_display_and_json() {
        assert_eq!(RoomStatus::InProgress.to_string(), "IN_PROGRESS");
        assert_eq!(
            serde_json::to_string(&RoomStatus::Finished).unwrap(),
            "\"FINISHED\""
        );
    }
}
