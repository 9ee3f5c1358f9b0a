//! End-of-game hook.

use crate::{Room, RoomError, RoomStatus};

/// Decides what happens when a game can no longer continue.
///
/// The manager calls [`end_game`](Self::end_game) after a departure
/// leaves an in-progress room with one or zero players alive. The
/// implementation lives with the combat layer (winner selection, scoring);
/// it must not add or remove players.
pub trait GameResolver: Send + 'static {
    fn end_game(&self, room: &mut Room) -> Result<(), RoomError>;
}

/// Default resolver: moves the room to [`RoomStatus::Finished`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkFinished;

impl GameResolver for MarkFinished {
    fn end_game(&self, room: &mut Room) -> Result<(), RoomError> {
        room.status = RoomStatus::Finished;
        Ok(())
    }
}

impl<F> GameResolver for F
where
    F: Fn(&mut Room) -> Result<(), RoomError> + Send + 'static,
{
    fn end_game(&self, room: &mut Room) -> Result<(), RoomError> {
        self(room)
    }
}
