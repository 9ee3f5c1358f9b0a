//! Wire-facing vocabulary for Quizclash.
//!
//! This crate defines the small set of types every other layer agrees on:
//!
//! - **Identifiers** ([`PlayerId`], [`RoomId`]): who is playing, and where.
//! - **Tiers** ([`Difficulty`]): shared by rooms and the question generator.
//! - **Routing** ([`Recipient`]): who an outbound notification is for.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how notifications become
//!   bytes for the transport layer.
//! - **Randomness** ([`random`]): bounded integers and short tokens,
//!   used for room codes and question ids.
//! - **Errors** ([`ProtocolError`]).
//!
//! It knows nothing about room state or game rules.

mod codec;
mod error;
pub mod random;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{Difficulty, PlayerId, Recipient, RoomId};
