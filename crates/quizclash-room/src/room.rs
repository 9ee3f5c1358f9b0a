//! Room records.

use quizclash_protocol::{PlayerId, RoomId};
use serde::{Deserialize, Serialize};

use crate::{Player, RoomConfig, RoomStatus};

/// A lobby or in-progress game.
///
/// Invariants held by the manager between operations:
/// - `players` is never empty (an empty room is deleted);
/// - exactly one player has `is_host`, and their id is `host_id`;
/// - `players.len() <= config.max_players` at join time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub host_id: PlayerId,
    /// Insertion order; index 0 is the next host if the host leaves.
    pub players: Vec<Player>,
    pub config: RoomConfig,
    pub status: RoomStatus,

    /// Creation order within the registry, for stable matchmaking ties.
    #[serde(skip)]
    pub(crate) created_seq: u64,
}

impl Room {
    pub(crate) fn new(
        id: RoomId,
        name: String,
        host: Player,
        config: RoomConfig,
        created_seq: u64,
    ) -> Self {
        Self {
            id,
            name,
            host_id: host.id.clone(),
            players: vec![host],
            config,
            status: RoomStatus::Waiting,
            created_seq,
        }
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Seats left before `max_players` is reached.
    pub fn open_slots(&self) -> usize {
        self.config.max_players.saturating_sub(self.players.len())
    }

    pub fn is_full(&self) -> bool {
        self.open_slots() == 0
    }

    pub fn is_host(&self, player_id: &PlayerId) -> bool {
        self.host_id == *player_id
    }

    pub fn contains(&self, player_id: &PlayerId) -> bool {
        self.players.iter().any(|p| p.id == *player_id)
    }

    pub fn player(&self, player_id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == *player_id)
    }

    pub(crate) fn player_mut(&mut self, player_id: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == *player_id)
    }

    /// Players with health above zero.
    pub fn alive_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_alive()).count()
    }

    /// Candidate for quick join: public, waiting, and not full.
    pub fn is_open_to_matchmaking(&self) -> bool {
        self.config.is_public && self.status.is_joinable() && !self.is_full()
    }

    /// Removes a player, returning their record.
    pub(crate) fn remove_player(&mut self, player_id: &PlayerId) -> Option<Player> {
        let pos = self.players.iter().position(|p| p.id == *player_id)?;
        Some(self.players.remove(pos))
    }

    /// Hands host to the first remaining player. Returns the new host.
    pub(crate) fn promote_first(&mut self) -> Option<PlayerId> {
        let next = self.players.first_mut()?;
        next.is_host = true;
        self.host_id = next.id.clone();
        Some(self.host_id.clone())
    }

    /// Zeroes every player's combat stats and returns to waiting.
    pub(crate) fn reset_for_new_game(&mut self) {
        for player in &mut self.players {
            player.reset_for_new_game();
        }
        self.status = RoomStatus::Waiting;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(max_players: usize) -> Room {
        let host = Player::new(PlayerId::from("h"), "host", None, true);
        let config = RoomConfig {
            max_players,
            ..RoomConfig::default()
        };
        Room::new(RoomId::from_number(123_456).unwrap(), "lobby".into(), host, config, 0)
    }

    #[test]
    fn test_new_room_has_host_only() {
        let r = room(4);
        assert_eq!(r.player_count(), 1);
        assert!(r.is_host(&PlayerId::from("h")));
        assert!(r.players[0].is_host);
        assert_eq!(r.status, RoomStatus::Waiting);
        assert_eq!(r.open_slots(), 3);
    }

    #[test]
    fn test_open_slots_saturates() {
        let mut r = room(1);
        assert!(r.is_full());
        r.players.push(Player::new(PlayerId::from("x"), "x", None, false));
        assert_eq!(r.open_slots(), 0);
    }

    #[test]
    fn test_promote_first_after_host_removed() {
        let mut r = room(4);
        r.players.push(Player::new(PlayerId::from("p2"), "two", Some(3), false));
        r.players.push(Player::new(PlayerId::from("p3"), "three", None, false));

        let removed = r.remove_player(&PlayerId::from("h")).unwrap();
        assert!(removed.is_host);
        assert_eq!(r.promote_first(), Some(PlayerId::from("p2")));
        assert_eq!(r.host_id, PlayerId::from("p2"));
        assert_eq!(r.players.iter().filter(|p| p.is_host).count(), 1);
    }

    #[test]
    fn test_alive_count() {
        let mut r = room(4);
        r.players.push(Player::new(PlayerId::from("p2"), "two", None, false));
        assert_eq!(r.alive_count(), 0);
        r.players[0].health = 10;
        assert_eq!(r.alive_count(), 1);
    }

    #[test]
    fn test_reset_for_new_game() {
        let mut r = room(4);
        r.status = RoomStatus::Finished;
        r.players[0].health = 0;
        r.players[0].score = 40;
        r.players[0].current_question_index = 7;
        r.players[0].elimination_time = Some(1_700_000_000_000);

        r.reset_for_new_game();

        assert_eq!(r.status, RoomStatus::Waiting);
        let p = &r.players[0];
        assert_eq!((p.health, p.score, p.current_question_index), (0, 0, 0));
        assert_eq!(p.elimination_time, None);
    }

    #[test]
    fn test_room_json_shape() {
        let json = serde_json::to_value(room(4)).unwrap();
        assert_eq!(json["id"], "123456");
        assert_eq!(json["hostId"], "h");
        assert_eq!(json["status"], "WAITING");
        assert_eq!(json["players"][0]["avatarId"], 1);
        assert_eq!(json["players"][0]["isHost"], true);
        assert!(json["players"][0].get("eliminationTime").is_none());
        assert!(json.get("createdSeq").is_none());
    }
}
