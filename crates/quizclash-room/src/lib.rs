//! Room lifecycle management for Quizclash.
//!
//! A [`RoomManager`] owns a [`SessionRegistry`] (rooms, the player → room
//! index, and active timer handles) and is the only thing that mutates
//! it. Every operation is a single synchronous transition: it runs to
//! completion before returning, so no caller can observe a half-updated
//! room.
//!
//! # Key types
//!
//! - [`RoomManager`]: create/join/leave/quick-join/settings/delete/continue
//! - [`SessionRegistry`]: the state the manager operates on
//! - [`Room`], [`Player`]: the records clients see
//! - [`RoomStatus`]: `Waiting → InProgress → Finished → Waiting`
//! - [`RoomConfig`], [`RoomConfigPatch`]: settings and partial updates
//! - [`GameResolver`]: hook into the combat layer's end-of-game logic
//!
//! Recoverable outcomes (not found, not host, full, ...) are variants of
//! per-operation outcome enums, not errors. [`RoomError`] is reserved for
//! internal faults, which are logged and degraded at the operation
//! boundary.

mod config;
mod error;
mod manager;
mod outcome;
mod player;
mod registry;
mod resolver;
mod room;

pub use config::{RoomConfig, RoomConfigPatch, RoomStatus};
pub use error::RoomError;
pub use manager::RoomManager;
pub use outcome::{
    ContinueOutcome, DeleteOutcome, DeletedRoom, JoinOutcome, LeaveOutcome,
    SettingsOutcome,
};
pub use player::Player;
pub use registry::SessionRegistry;
pub use resolver::{GameResolver, MarkFinished};
pub use room::Room;
