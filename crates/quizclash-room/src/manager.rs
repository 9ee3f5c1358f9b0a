//! Room manager: creates, tracks, and routes players to rooms.

use quizclash_protocol::{PlayerId, RoomId};
use quizclash_timer::TimerHandle;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, error, info, warn};

use crate::{
    ContinueOutcome, DeleteOutcome, DeletedRoom, GameResolver, JoinOutcome, LeaveOutcome,
    MarkFinished, Player, Room, RoomConfig, RoomConfigPatch, RoomError, RoomStatus,
    SessionRegistry, SettingsOutcome,
};

/// Owns the [`SessionRegistry`] and performs every room transition.
///
/// All methods take `&mut self` and finish before returning. Callers that
/// share a manager across tasks wrap it in a mutex and hold the lock for
/// the duration of one call (see the `quizclash` engine).
///
/// A player is in at most one room. Creating or joining a different room
/// first runs the full leave path for the old one.
pub struct RoomManager<R: GameResolver = MarkFinished> {
    registry: SessionRegistry,
    resolver: R,
    rng: StdRng,
}

impl RoomManager<MarkFinished> {
    /// A manager over an empty registry that marks games finished.
    pub fn new() -> Self {
        Self::with_resolver(MarkFinished)
    }
}

impl Default for RoomManager<MarkFinished> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: GameResolver> RoomManager<R> {
    /// A manager over an empty registry with a custom end-of-game hook.
    pub fn with_resolver(resolver: R) -> Self {
        Self::from_parts(SessionRegistry::new(), resolver)
    }

    /// A manager over an existing registry.
    pub fn from_parts(registry: SessionRegistry, resolver: R) -> Self {
        Self {
            registry,
            resolver,
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Reseeds the room-code generator, for reproducible codes in tests.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn room(&self, room_id: &RoomId) -> Option<&Room> {
        self.registry.room(room_id)
    }

    /// The room a player is currently in, if any.
    pub fn room_of(&self, player_id: &PlayerId) -> Option<&Room> {
        self.registry.room_of(player_id)
    }

    pub fn room_count(&self) -> usize {
        self.registry.room_count()
    }

    /// Rooms quick join could place a player in, in creation order.
    pub fn public_rooms(&self) -> Vec<&Room> {
        self.registry
            .rooms()
            .into_iter()
            .filter(|r| r.is_open_to_matchmaking())
            .collect()
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Creates a room with `player_id` as its only player and host.
    ///
    /// `config` is merged over [`RoomConfig::default`]. The room code is
    /// redrawn until it doesn't collide with a live room.
    pub fn create_room(
        &mut self,
        player_id: PlayerId,
        username: impl Into<String>,
        room_name: impl Into<String>,
        avatar_id: Option<u32>,
        config: RoomConfigPatch,
    ) -> &Room {
        if self.registry.room_id_of(&player_id).is_some() {
            let _ = self.leave_room(&player_id);
        }

        let room_id = self.registry.fresh_room_id(&mut self.rng);
        let seq = self.registry.next_seq();
        let host = Player::new(player_id.clone(), username, avatar_id, true);
        let room = Room::new(
            room_id.clone(),
            room_name.into(),
            host,
            RoomConfig::from_patch(config),
            seq,
        );

        info!(%room_id, host = %player_id, "room created");
        self.registry.index_player(player_id, room_id);
        self.registry.insert_room(room)
    }

    /// Seats a player in an existing room.
    ///
    /// Checks, in order: the room exists, it is waiting, it has a free
    /// seat. A player already in this room gets it back unchanged.
    pub fn join_room(
        &mut self,
        player_id: PlayerId,
        room_id: &RoomId,
        username: impl Into<String>,
        avatar_id: Option<u32>,
    ) -> JoinOutcome<'_> {
        let (already_seated, status, full) = match self.registry.room(room_id) {
            Some(room) => (room.contains(&player_id), room.status, room.is_full()),
            None => {
                debug!(%room_id, %player_id, "join rejected, room not found");
                return JoinOutcome::NotFound;
            }
        };

        if already_seated {
            return self.joined(room_id);
        }
        if !status.is_joinable() {
            debug!(%room_id, %player_id, %status, "join rejected, game in progress");
            return JoinOutcome::InProgress;
        }
        if full {
            debug!(%room_id, %player_id, "join rejected, room full");
            return JoinOutcome::Full;
        }

        if self.registry.room_id_of(&player_id).is_some() {
            let _ = self.leave_room(&player_id);
        }

        let player = Player::new(player_id.clone(), username, avatar_id, false);
        match self.registry.room_mut(room_id) {
            Some(room) => {
                room.players.push(player);
                info!(%room_id, %player_id, players = room.players.len(), "player joined room");
            }
            None => return JoinOutcome::NotFound,
        }
        self.registry.index_player(player_id, room_id.clone());
        self.joined(room_id)
    }

    fn joined(&self, room_id: &RoomId) -> JoinOutcome<'_> {
        match self.registry.room(room_id) {
            Some(room) => JoinOutcome::Joined(room),
            None => JoinOutcome::NotFound,
        }
    }

    /// Removes a player from whatever room they are in.
    ///
    /// The last player out deletes the room. A departing host hands over
    /// to the first remaining player. If an in-progress game is left with
    /// at most one player alive, the [`GameResolver`] ends it. The
    /// player's timer is cancelled in every case.
    ///
    /// Returns `None` if the player wasn't in a room, or if an internal
    /// fault occurred (which is logged).
    pub fn leave_room(&mut self, player_id: &PlayerId) -> Option<LeaveOutcome> {
        match self.try_leave(player_id) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(%player_id, error = %e, "leave failed");
                None
            }
        }
    }

    fn try_leave(&mut self, player_id: &PlayerId) -> Result<Option<LeaveOutcome>, RoomError> {
        let Some(room_id) = self.registry.unindex_player(player_id) else {
            debug!(%player_id, "leave ignored, player not in a room");
            return Ok(None);
        };

        let room = self
            .registry
            .room_mut(&room_id)
            .ok_or_else(|| RoomError::StaleIndex {
                player_id: player_id.clone(),
                room_id: room_id.clone(),
            })?;
        room.remove_player(player_id)
            .ok_or_else(|| RoomError::MissingMember {
                player_id: player_id.clone(),
                room_id: room_id.clone(),
            })?;

        if room.players.is_empty() {
            self.registry.remove_room(&room_id);
            info!(%room_id, %player_id, "last player left, room deleted");
            return Ok(Some(LeaveOutcome {
                room_id,
                room_still_exists: false,
                new_host: None,
            }));
        }

        let new_host = if room.is_host(player_id) {
            room.promote_first()
        } else {
            None
        };
        info!(
            %room_id,
            %player_id,
            new_host = new_host.as_ref().map(|h| h.as_str()),
            players = room.players.len(),
            "player left room"
        );

        if room.status == RoomStatus::InProgress && room.alive_count() <= 1 {
            info!(%room_id, alive = room.alive_count(), "too few players alive, ending game");
            self.resolver.end_game(room)?;
        }

        Ok(Some(LeaveOutcome {
            room_id,
            room_still_exists: true,
            new_host,
        }))
    }

    /// Host-only partial update of a room's config.
    pub fn update_room_settings(
        &mut self,
        player_id: &PlayerId,
        room_id: &RoomId,
        patch: RoomConfigPatch,
    ) -> SettingsOutcome<'_> {
        let Some(room) = self.registry.room_mut(room_id) else {
            return SettingsOutcome::NotFound;
        };
        if !room.is_host(player_id) {
            debug!(%room_id, %player_id, "settings update rejected, not host");
            return SettingsOutcome::NotHost;
        }

        room.config.apply(patch);
        info!(%room_id, "room settings updated");
        SettingsOutcome::Updated(room)
    }

    /// Seats a player in the public waiting room with the fewest open
    /// seats. Ties go to the oldest room.
    ///
    /// Returns [`JoinOutcome::NotFound`] when no room qualifies.
    pub fn quick_join(
        &mut self,
        player_id: PlayerId,
        username: impl Into<String>,
        avatar_id: Option<u32>,
    ) -> JoinOutcome<'_> {
        let target = self
            .public_rooms()
            .into_iter()
            .min_by_key(|r| r.open_slots())
            .map(|r| r.id.clone());

        match target {
            Some(room_id) => self.join_room(player_id, &room_id, username, avatar_id),
            None => {
                debug!(%player_id, "quick join found no open public room");
                JoinOutcome::NotFound
            }
        }
    }

    /// Host-only teardown: removes the room, unregisters everyone in it,
    /// and cancels the room's and its players' timers.
    pub fn delete_room(&mut self, player_id: &PlayerId, room_id: &RoomId) -> DeleteOutcome {
        match self.registry.room(room_id) {
            None => return DeleteOutcome::NotFound,
            Some(room) if !room.is_host(player_id) => {
                debug!(%room_id, %player_id, "delete rejected, not host");
                return DeleteOutcome::NotHost;
            }
            Some(_) => {}
        }

        let Some(room) = self.registry.remove_room(room_id) else {
            return DeleteOutcome::NotFound;
        };
        let evicted: Vec<PlayerId> = room.players.into_iter().map(|p| p.id).collect();
        for id in &evicted {
            if self.registry.room_id_of(id) == Some(room_id) {
                self.registry.unindex_player(id);
            }
        }

        info!(%room_id, evicted = evicted.len(), "room deleted");
        DeleteOutcome::Deleted(DeletedRoom {
            room_id: room_id.clone(),
            evicted,
        })
    }

    /// Host-only rematch: zeroes everyone's stats and returns a finished
    /// room to waiting.
    pub fn continue_game(
        &mut self,
        player_id: &PlayerId,
        room_id: &RoomId,
    ) -> ContinueOutcome<'_> {
        let Some(room) = self.registry.room_mut(room_id) else {
            return ContinueOutcome::NotFound;
        };
        if !room.is_host(player_id) {
            debug!(%room_id, %player_id, "continue rejected, not host");
            return ContinueOutcome::NotHost;
        }
        if room.status != RoomStatus::Finished {
            debug!(%room_id, status = %room.status, "continue rejected, game not finished");
            return ContinueOutcome::InvalidState;
        }

        room.reset_for_new_game();
        info!(%room_id, "room reset for a new game");
        ContinueOutcome::Continued(room)
    }

    // -----------------------------------------------------------------------
    // Combat-layer hooks
    // -----------------------------------------------------------------------

    /// Moves a room to `status` if that is its next state
    /// (`Waiting → InProgress → Finished → Waiting`).
    ///
    /// Returns `false`, leaving the room untouched, for an unknown room or
    /// an out-of-order transition.
    pub fn set_room_status(&mut self, room_id: &RoomId, status: RoomStatus) -> bool {
        let Some(room) = self.registry.room_mut(room_id) else {
            return false;
        };
        if !room.status.can_transition_to(status) {
            debug!(%room_id, from = %room.status, to = %status, "invalid status transition");
            return false;
        }
        room.status = status;
        info!(%room_id, %status, "room status changed");
        true
    }

    /// Mutable access to a registered player's combat fields.
    pub fn player_mut(&mut self, player_id: &PlayerId) -> Option<&mut Player> {
        let room_id = self.registry.room_id_of(player_id)?.clone();
        self.registry.room_mut(&room_id)?.player_mut(player_id)
    }

    // -----------------------------------------------------------------------
    // Timers
    // -----------------------------------------------------------------------

    /// Attaches a timer to a live room, replacing (and cancelling) any
    /// previous one. A timer for an unknown room is cancelled immediately
    /// and `false` is returned.
    pub fn set_room_timer(&mut self, room_id: &RoomId, handle: TimerHandle) -> bool {
        if self.registry.room(room_id).is_none() {
            handle.cancel();
            warn!(%room_id, "timer for unknown room discarded");
            return false;
        }
        self.registry.set_room_timer(room_id.clone(), handle);
        true
    }

    /// Attaches a timer to a registered player, with the same replace and
    /// discard rules as [`set_room_timer`](Self::set_room_timer).
    pub fn set_player_timer(&mut self, player_id: &PlayerId, handle: TimerHandle) -> bool {
        if self.registry.room_id_of(player_id).is_none() {
            handle.cancel();
            warn!(%player_id, "timer for unregistered player discarded");
            return false;
        }
        self.registry.set_player_timer(player_id.clone(), handle);
        true
    }

    /// Cancels a room's timer. Returns whether one was running.
    pub fn clear_room_timer(&mut self, room_id: &RoomId) -> bool {
        self.registry.clear_room_timer(room_id)
    }

    /// Cancels a player's timer. Returns whether one was running.
    pub fn clear_player_timer(&mut self, player_id: &PlayerId) -> bool {
        self.registry.clear_player_timer(player_id)
    }
}
