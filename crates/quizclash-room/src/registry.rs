//! The session registry: every room, the player → room index, and the
//! timers attached to rooms and players.

use std::collections::HashMap;

use quizclash_protocol::{PlayerId, RoomId};
use quizclash_timer::TimerHandle;
use rand::Rng;
use tracing::debug;

use crate::Room;

/// Process-wide session state, owned by one [`RoomManager`](crate::RoomManager).
///
/// Reads are public; every write goes through the manager so the
/// cross-collection invariants hold after each operation:
/// - `player_rooms[p] == r` iff `p` is in `rooms[r].players`;
/// - a room timer exists only for a room in `rooms`;
/// - a player timer exists only for an indexed player.
///
/// Build a fresh one per test to get isolated state.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    rooms: HashMap<RoomId, Room>,
    player_rooms: HashMap<PlayerId, RoomId>,
    room_timers: HashMap<RoomId, TimerHandle>,
    player_timers: HashMap<PlayerId, TimerHandle>,
    next_seq: u64,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub fn room(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    /// The room id a player is registered in, if any.
    pub fn room_id_of(&self, player_id: &PlayerId) -> Option<&RoomId> {
        self.player_rooms.get(player_id)
    }

    pub fn room_of(&self, player_id: &PlayerId) -> Option<&Room> {
        self.room_id_of(player_id).and_then(|id| self.rooms.get(id))
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn player_count(&self) -> usize {
        self.player_rooms.len()
    }

    /// All rooms in creation order.
    pub fn rooms(&self) -> Vec<&Room> {
        let mut rooms: Vec<&Room> = self.rooms.values().collect();
        rooms.sort_by_key(|r| r.created_seq);
        rooms
    }

    pub fn has_room_timer(&self, room_id: &RoomId) -> bool {
        self.room_timers.contains_key(room_id)
    }

    pub fn has_player_timer(&self, player_id: &PlayerId) -> bool {
        self.player_timers.contains_key(player_id)
    }

    // -----------------------------------------------------------------------
    // Writes (manager only)
    // -----------------------------------------------------------------------

    pub(crate) fn room_mut(&mut self, room_id: &RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(room_id)
    }

    /// Draws random codes until one is not in use.
    pub(crate) fn fresh_room_id<R: Rng + ?Sized>(&self, rng: &mut R) -> RoomId {
        loop {
            let id = RoomId::random(rng);
            if !self.rooms.contains_key(&id) {
                return id;
            }
            debug!(room_id = %id, "room code collision, redrawing");
        }
    }

    /// Next creation sequence number.
    pub(crate) fn next_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    pub(crate) fn insert_room(&mut self, room: Room) -> &mut Room {
        self.rooms.entry(room.id.clone()).or_insert(room)
    }

    /// Removes a room and cancels its timer.
    pub(crate) fn remove_room(&mut self, room_id: &RoomId) -> Option<Room> {
        self.clear_room_timer(room_id);
        self.rooms.remove(room_id)
    }

    pub(crate) fn index_player(&mut self, player_id: PlayerId, room_id: RoomId) {
        self.player_rooms.insert(player_id, room_id);
    }

    /// Drops a player's index entry and cancels their timer.
    pub(crate) fn unindex_player(&mut self, player_id: &PlayerId) -> Option<RoomId> {
        self.clear_player_timer(player_id);
        self.player_rooms.remove(player_id)
    }

    /// Stores a room timer, cancelling any it replaces.
    pub(crate) fn set_room_timer(&mut self, room_id: RoomId, handle: TimerHandle) {
        if let Some(old) = self.room_timers.insert(room_id, handle) {
            old.cancel();
        }
    }

    /// Stores a player timer, cancelling any it replaces.
    pub(crate) fn set_player_timer(&mut self, player_id: PlayerId, handle: TimerHandle) {
        if let Some(old) = self.player_timers.insert(player_id, handle) {
            old.cancel();
        }
    }

    /// Cancels and forgets a room timer. No-op if there is none.
    pub(crate) fn clear_room_timer(&mut self, room_id: &RoomId) -> bool {
        match self.room_timers.remove(room_id) {
            Some(handle) => {
                handle.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancels and forgets a player timer. No-op if there is none.
    pub(crate) fn clear_player_timer(&mut self, player_id: &PlayerId) -> bool {
        match self.player_timers.remove(player_id) {
            Some(handle) => {
                handle.cancel();
                true
            }
            None => false,
        }
    }
}
