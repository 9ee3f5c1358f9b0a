//! # Quizclash
//!
//! Session engine for real-time head-to-head quiz battles.
//!
//! Quizclash owns the lobby side of a quiz game: rooms identified by
//! 6-digit codes, hosts and host migration, matchmaking into public
//! rooms, rematches, room clocks, and procedurally generated arithmetic
//! questions. The transport (sockets, connection ids) and the combat
//! rules (damage, healing, answer checking) plug in from outside.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quizclash::prelude::*;
//!
//! # async fn run() {
//! let (engine, mut outbound) = Engine::builder().build();
//!
//! let room = engine
//!     .create_room(
//!         PlayerId::from("sock-1"),
//!         "Ada",
//!         "Lunch quiz",
//!         None,
//!         RoomConfigPatch::default(),
//!     )
//!     .await;
//! let _ = engine.join_room(PlayerId::from("sock-2"), &room.id, "Bob", Some(3)).await;
//!
//! while let Some(out) = outbound.recv().await {
//!     // hand `out.payload` to the transport for `out.recipient`
//! }
//! # }
//! ```

mod engine;
mod error;
mod events;
pub mod telemetry;

pub use engine::{Engine, EngineBuilder, EngineConfig};
pub use error::QuizclashError;
pub use events::{Outbound, Rejection, ServerEvent};

pub mod prelude {
    pub use crate::{
        Engine, EngineBuilder, EngineConfig, Outbound, QuizclashError, Rejection, ServerEvent,
    };
    pub use quizclash_protocol::{Codec, Difficulty, JsonCodec, PlayerId, Recipient, RoomId};
    pub use quizclash_question::{generate_question, Question};
    pub use quizclash_room::{
        GameResolver, LeaveOutcome, MarkFinished, Player, Room, RoomConfig, RoomConfigPatch,
        RoomStatus,
    };
}
