//! Error types for the room layer.

use snapmatch_game::GameError;
use snapmatch_protocol::RoomCode;

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// No room with this code exists.
    #[error("room {0} not found")]
    NotFound(RoomCode),

    /// The room has no free participant slot.
    #[error("room {0} is full")]
    Full(RoomCode),

    /// The room's game is already in progress; late joins are rejected.
    #[error("room {0} has already started")]
    AlreadyStarted(RoomCode),

    /// The room's command channel is closed or congested.
    #[error("room {0} is unavailable")]
    Unavailable(RoomCode),

    /// Code minting kept colliding with live rooms. Practically
    /// unreachable given the 36^6 code space; fatal when it happens.
    #[error("room code space exhausted after {0} attempts")]
    CodeSpaceExhausted(u32),

    /// A fatal game configuration problem (catalog too small).
    #[error(transparent)]
    Game(#[from] GameError),
}
