//! The shared engine: one lock around the room manager, notifications
//! sent after the lock is released.
//!
//! Every public operation follows the same shape:
//!   1. lock the manager
//!   2. run one synchronous transition and collect notifications
//!   3. unlock
//!   4. encode and send the notifications
//!
//! Step 4 can't fail the operation: the registry is already consistent by
//! the time anything is sent, and a closed receiver is only logged.

use std::sync::Arc;
use std::time::Duration;

use quizclash_protocol::{Codec, JsonCodec, PlayerId, Recipient, RoomId};
use quizclash_question::{generate_question, Question};
use quizclash_room::{
    ContinueOutcome, DeleteOutcome, DeletedRoom, GameResolver, JoinOutcome, LeaveOutcome,
    MarkFinished, Room, RoomConfigPatch, RoomManager, RoomStatus, SettingsOutcome,
};
use quizclash_timer::{spawn_countdown, CountdownConfig, CountdownEvent};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, warn};

use crate::{telemetry, Outbound, QuizclashError, Rejection, ServerEvent};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Engine-wide settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// When set, [`EngineBuilder::build`] installs a global tracing
    /// subscriber with this default directive (`RUST_LOG` still wins).
    pub log_filter: Option<String>,
    /// Spacing of room clock ticks. Default: 1 second.
    pub countdown_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_filter: None,
            countdown_interval: Duration::from_secs(1),
        }
    }
}

/// Builder for an [`Engine`].
///
/// # Example
///
/// ```rust
/// use quizclash::{Engine, EngineConfig};
///
/// let (engine, outbound) = Engine::builder()
///     .config(EngineConfig::default())
///     .seed(7)
///     .build();
/// # drop((engine, outbound));
/// ```
pub struct EngineBuilder<R = MarkFinished, C = JsonCodec> {
    config: EngineConfig,
    resolver: R,
    codec: C,
    seed: Option<u64>,
}

impl EngineBuilder {
    /// Defaults: [`MarkFinished`], [`JsonCodec`], 1 s ticks.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            resolver: MarkFinished,
            codec: JsonCodec,
            seed: None,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: GameResolver, C: Codec + Clone> EngineBuilder<R, C> {
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn countdown_interval(mut self, interval: Duration) -> Self {
        self.config.countdown_interval = interval;
        self
    }

    /// Makes room codes reproducible.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replaces the end-of-game hook.
    pub fn resolver<R2: GameResolver>(self, resolver: R2) -> EngineBuilder<R2, C> {
        EngineBuilder {
            config: self.config,
            resolver,
            codec: self.codec,
            seed: self.seed,
        }
    }

    /// Replaces the notification codec.
    pub fn codec<C2: Codec + Clone>(self, codec: C2) -> EngineBuilder<R, C2> {
        EngineBuilder {
            config: self.config,
            resolver: self.resolver,
            codec,
            seed: self.seed,
        }
    }

    /// Builds the engine and the receiving end of its notification stream.
    pub fn build(self) -> (Engine<R, C>, mpsc::UnboundedReceiver<Outbound>) {
        if let Some(filter) = &self.config.log_filter {
            telemetry::init_tracing(filter);
        }

        let mut manager = RoomManager::with_resolver(self.resolver);
        if let Some(seed) = self.seed {
            manager = manager.with_seed(seed);
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let engine = Engine {
            shared: Arc::new(Shared {
                rooms: Mutex::new(manager),
                dispatcher: Dispatcher {
                    codec: self.codec,
                    tx,
                },
                config: self.config,
            }),
        };
        (engine, rx)
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Encodes events and pushes them onto the outbound channel.
#[derive(Clone)]
struct Dispatcher<C> {
    codec: C,
    tx: mpsc::UnboundedSender<Outbound>,
}

impl<C: Codec> Dispatcher<C> {
    fn send(&self, recipient: Recipient, event: &ServerEvent) {
        let payload = match self.codec.encode(event) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(error = %e, "failed to encode notification");
                return;
            }
        };
        if self.tx.send(Outbound { recipient, payload }).is_err() {
            warn!("notification receiver dropped");
        }
    }

    fn send_all(&self, notes: Notes) {
        for (recipient, event) in notes {
            self.send(recipient, &event);
        }
    }
}

type Notes = Vec<(Recipient, ServerEvent)>;

fn room_updated(room: &Room) -> (Recipient, ServerEvent) {
    (
        Recipient::Room(room.id.clone()),
        ServerEvent::RoomUpdated { room: room.clone() },
    )
}

fn rejected(player_id: &PlayerId, reason: Rejection) -> (Recipient, ServerEvent) {
    (
        Recipient::Player(player_id.clone()),
        ServerEvent::Rejected { reason },
    )
}

/// The room a player was in before an operation that may move them.
struct Seat {
    room_id: RoomId,
    host_id: PlayerId,
}

impl Seat {
    fn of<R: GameResolver>(rooms: &RoomManager<R>, player_id: &PlayerId) -> Option<Self> {
        rooms.room_of(player_id).map(|room| Self {
            room_id: room.id.clone(),
            host_id: room.host_id.clone(),
        })
    }

    /// Notices for the old room if the player has left it.
    fn departure<R: GameResolver>(
        self,
        rooms: &RoomManager<R>,
        player_id: &PlayerId,
        notes: &mut Notes,
    ) {
        if rooms.registry().room_id_of(player_id) == Some(&self.room_id) {
            return;
        }
        if let Some(room) = rooms.room(&self.room_id) {
            let new_host = (room.host_id != self.host_id).then(|| room.host_id.clone());
            notes.push((
                Recipient::Room(self.room_id.clone()),
                ServerEvent::PlayerLeft {
                    room_id: self.room_id,
                    player_id: player_id.clone(),
                    new_host,
                },
            ));
            notes.push(room_updated(room));
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

struct Shared<R: GameResolver, C> {
    rooms: Mutex<RoomManager<R>>,
    dispatcher: Dispatcher<C>,
    config: EngineConfig,
}

/// Cloneable handle to the shared session state.
///
/// Operations are serialized by one async mutex: two concurrent joins for
/// the last seat of a room can't both succeed.
pub struct Engine<R: GameResolver = MarkFinished, C: Codec + Clone = JsonCodec> {
    shared: Arc<Shared<R, C>>,
}

impl<R: GameResolver, C: Codec + Clone> Clone for Engine<R, C> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }
}

impl<R: GameResolver, C: Codec + Clone> Engine<R, C> {
    pub fn config(&self) -> &EngineConfig {
        &self.shared.config
    }

    /// Creates a room hosted by the caller. Notifies the new room and,
    /// if the caller moved, the room they left.
    pub async fn create_room(
        &self,
        player_id: PlayerId,
        username: impl Into<String>,
        room_name: impl Into<String>,
        avatar_id: Option<u32>,
        config: RoomConfigPatch,
    ) -> Room {
        let (room, notes) = {
            let mut rooms = self.shared.rooms.lock().await;
            let seat = Seat::of(&*rooms, &player_id);
            let room = rooms
                .create_room(player_id.clone(), username, room_name, avatar_id, config)
                .clone();

            let mut notes = vec![room_updated(&room)];
            if let Some(seat) = seat {
                seat.departure(&*rooms, &player_id, &mut notes);
            }
            (room, notes)
        };

        self.shared.dispatcher.send_all(notes);
        room
    }

    /// Seats the caller in `room_id`.
    pub async fn join_room(
        &self,
        player_id: PlayerId,
        room_id: &RoomId,
        username: impl Into<String>,
        avatar_id: Option<u32>,
    ) -> Result<Room, Rejection> {
        let (result, notes) = {
            let mut rooms = self.shared.rooms.lock().await;
            let seat = Seat::of(&*rooms, &player_id);
            let result = joined(rooms.join_room(player_id.clone(), room_id, username, avatar_id));
            let notes = join_notes(&*rooms, &player_id, seat, &result, Rejection::NotFound);
            (result, notes)
        };

        self.shared.dispatcher.send_all(notes);
        result.map_err(|r| r.unwrap_or(Rejection::NotFound))
    }

    /// Seats the caller in the room named by a raw client-supplied code.
    ///
    /// A malformed code is rejected to the caller as `NOT_FOUND` and
    /// returned as [`QuizclashError::Protocol`].
    pub async fn join_by_code(
        &self,
        player_id: PlayerId,
        code: &str,
        username: impl Into<String>,
        avatar_id: Option<u32>,
    ) -> Result<Room, QuizclashError> {
        let room_id = match RoomId::parse(code) {
            Ok(id) => id,
            Err(e) => {
                debug!(%player_id, code, "join rejected, malformed room code");
                let (to, event) = rejected(&player_id, Rejection::NotFound);
                self.shared.dispatcher.send(to, &event);
                return Err(e.into());
            }
        };
        Ok(self.join_room(player_id, &room_id, username, avatar_id).await?)
    }

    /// Seats the caller in the fullest open public room.
    pub async fn quick_join(
        &self,
        player_id: PlayerId,
        username: impl Into<String>,
        avatar_id: Option<u32>,
    ) -> Result<Room, Rejection> {
        let (result, notes) = {
            let mut rooms = self.shared.rooms.lock().await;
            let seat = Seat::of(&*rooms, &player_id);
            let result = joined(rooms.quick_join(player_id.clone(), username, avatar_id));
            let notes = join_notes(&*rooms, &player_id, seat, &result, Rejection::NoOpenRoom);
            (result, notes)
        };

        self.shared.dispatcher.send_all(notes);
        result.map_err(|r| r.unwrap_or(Rejection::NoOpenRoom))
    }

    /// Removes the caller from their room. Notifies whoever remains.
    pub async fn leave_room(&self, player_id: &PlayerId) -> Option<LeaveOutcome> {
        let (outcome, notes) = {
            let mut rooms = self.shared.rooms.lock().await;
            let outcome = rooms.leave_room(player_id);

            let mut notes = Notes::new();
            if let Some(left) = outcome.as_ref().filter(|o| o.room_still_exists) {
                notes.push((
                    Recipient::Room(left.room_id.clone()),
                    ServerEvent::PlayerLeft {
                        room_id: left.room_id.clone(),
                        player_id: player_id.clone(),
                        new_host: left.new_host.clone(),
                    },
                ));
                if let Some(room) = rooms.room(&left.room_id) {
                    notes.push(room_updated(room));
                }
            }
            (outcome, notes)
        };

        self.shared.dispatcher.send_all(notes);
        outcome
    }

    /// Host-only settings change.
    pub async fn update_room_settings(
        &self,
        player_id: &PlayerId,
        room_id: &RoomId,
        patch: RoomConfigPatch,
    ) -> Result<Room, Rejection> {
        let (result, notes) = {
            let mut rooms = self.shared.rooms.lock().await;
            let result = match rooms.update_room_settings(player_id, room_id, patch) {
                SettingsOutcome::Updated(room) => Ok(room.clone()),
                SettingsOutcome::NotFound => Err(Rejection::NotFound),
                SettingsOutcome::NotHost => Err(Rejection::NotHost),
            };
            (result.clone(), outcome_notes(player_id, &result))
        };

        self.shared.dispatcher.send_all(notes);
        result
    }

    /// Host-only teardown. Every evicted player is told individually.
    pub async fn delete_room(
        &self,
        player_id: &PlayerId,
        room_id: &RoomId,
    ) -> Result<DeletedRoom, Rejection> {
        let result = {
            let mut rooms = self.shared.rooms.lock().await;
            match rooms.delete_room(player_id, room_id) {
                DeleteOutcome::Deleted(deleted) => Ok(deleted),
                DeleteOutcome::NotFound => Err(Rejection::NotFound),
                DeleteOutcome::NotHost => Err(Rejection::NotHost),
            }
        };

        let notes: Notes = match &result {
            Ok(deleted) => deleted
                .evicted
                .iter()
                .map(|id| {
                    (
                        Recipient::Player(id.clone()),
                        ServerEvent::RoomDeleted {
                            room_id: deleted.room_id.clone(),
                        },
                    )
                })
                .collect(),
            Err(reason) => vec![rejected(player_id, *reason)],
        };
        self.shared.dispatcher.send_all(notes);
        result
    }

    /// Host-only rematch of a finished room.
    pub async fn continue_game(
        &self,
        player_id: &PlayerId,
        room_id: &RoomId,
    ) -> Result<Room, Rejection> {
        let (result, notes) = {
            let mut rooms = self.shared.rooms.lock().await;
            let result = match rooms.continue_game(player_id, room_id) {
                ContinueOutcome::Continued(room) => Ok(room.clone()),
                ContinueOutcome::NotFound => Err(Rejection::NotFound),
                ContinueOutcome::NotHost => Err(Rejection::NotHost),
                ContinueOutcome::InvalidState => Err(Rejection::InvalidState),
            };
            (result.clone(), outcome_notes(player_id, &result))
        };

        self.shared.dispatcher.send_all(notes);
        result
    }

    /// Applies an external status transition and notifies the room.
    pub async fn set_room_status(&self, room_id: &RoomId, status: RoomStatus) -> bool {
        let (changed, notes) = {
            let mut rooms = self.shared.rooms.lock().await;
            let changed = rooms.set_room_status(room_id, status);
            let notes: Notes = match rooms.room(room_id) {
                Some(room) if changed => vec![room_updated(room)],
                _ => Vec::new(),
            };
            (changed, notes)
        };

        self.shared.dispatcher.send_all(notes);
        changed
    }

    /// Starts the room clock for `timeLimit` seconds, replacing any clock
    /// already running. Ticks go to the room as [`ServerEvent::Countdown`],
    /// expiry as [`ServerEvent::TimeUp`].
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn start_room_countdown(&self, room_id: &RoomId) -> Result<(), Rejection> {
        let mut rooms = self.shared.rooms.lock().await;
        let Some(room) = rooms.room(room_id) else {
            return Err(Rejection::NotFound);
        };

        let config = CountdownConfig::from_secs(u64::from(room.config.time_limit))
            .with_interval(self.shared.config.countdown_interval);
        let dispatcher = self.shared.dispatcher.clone();
        let id = room_id.clone();
        let handle = spawn_countdown(config, move |event| {
            let event = match event {
                CountdownEvent::Tick { remaining_secs, .. } => ServerEvent::Countdown {
                    room_id: id.clone(),
                    remaining_secs,
                },
                CountdownEvent::Expired => ServerEvent::TimeUp { room_id: id.clone() },
            };
            dispatcher.send(Recipient::Room(id.clone()), &event);
        });

        debug!(%room_id, secs = config.duration.as_secs(), "room countdown started");
        rooms.set_room_timer(room_id, handle);
        Ok(())
    }

    /// Stops the room clock. Returns whether one was running.
    pub async fn stop_room_countdown(&self, room_id: &RoomId) -> bool {
        self.shared.rooms.lock().await.clear_room_timer(room_id)
    }

    /// A fresh question at the room's configured difficulty.
    pub async fn next_question(&self, room_id: &RoomId) -> Result<Question, Rejection> {
        let difficulty = {
            let rooms = self.shared.rooms.lock().await;
            rooms
                .room(room_id)
                .map(|r| r.config.difficulty)
                .ok_or(Rejection::NotFound)?
        };
        Ok(generate_question(difficulty))
    }

    /// A copy of a room's current state.
    pub async fn room(&self, room_id: &RoomId) -> Option<Room> {
        self.shared.rooms.lock().await.room(room_id).cloned()
    }

    /// A copy of the room a player is in.
    pub async fn room_of(&self, player_id: &PlayerId) -> Option<Room> {
        self.shared.rooms.lock().await.room_of(player_id).cloned()
    }

    /// Copies of the rooms quick join could pick.
    pub async fn public_rooms(&self) -> Vec<Room> {
        let rooms = self.shared.rooms.lock().await;
        rooms.public_rooms().into_iter().cloned().collect()
    }

    /// Runs `f` under the engine lock, for the combat layer's own updates.
    ///
    /// No notifications are sent for changes made here.
    pub async fn with_manager<T>(&self, f: impl FnOnce(&mut RoomManager<R>) -> T) -> T {
        let mut rooms = self.shared.rooms.lock().await;
        f(&mut *rooms)
    }
}

/// Flattens a join outcome. `Err(None)` means "not found", whose
/// rejection depends on the caller (direct join vs. quick join).
fn joined(outcome: JoinOutcome<'_>) -> Result<Room, Option<Rejection>> {
    match outcome {
        JoinOutcome::Joined(room) => Ok(room.clone()),
        JoinOutcome::NotFound => Err(None),
        JoinOutcome::InProgress => Err(Some(Rejection::InProgress)),
        JoinOutcome::Full => Err(Some(Rejection::Full)),
    }
}

fn join_notes<R: GameResolver>(
    rooms: &RoomManager<R>,
    player_id: &PlayerId,
    seat: Option<Seat>,
    result: &Result<Room, Option<Rejection>>,
    not_found: Rejection,
) -> Notes {
    match result {
        Ok(room) => {
            let mut notes = vec![room_updated(room)];
            if let Some(seat) = seat {
                seat.departure(rooms, player_id, &mut notes);
            }
            notes
        }
        Err(reason) => vec![rejected(player_id, reason.unwrap_or(not_found))],
    }
}

fn outcome_notes(player_id: &PlayerId, result: &Result<Room, Rejection>) -> Notes {
    match result {
        Ok(room) => vec![room_updated(room)],
        Err(reason) => vec![rejected(player_id, *reason)],
    }
}
