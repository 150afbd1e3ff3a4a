//! Game configuration and the room lifecycle state machine.

use std::time::Duration;

use snapmatch_game::{Catalog, GameError, CARD_SIZE};

// ---------------------------------------------------------------------------
// GameConfig
// ---------------------------------------------------------------------------

/// Configuration shared by every room a registry creates.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// The symbol pool rounds draw from.
    pub catalog: Catalog,

    /// Symbols per card.
    pub card_size: usize,

    /// How long participants have to name the match.
    pub round_duration: Duration,

    /// Pause between a resolved round and the automatic next round.
    pub intermission: Duration,
}

impl GameConfig {
    /// Validates that the catalog can supply card pairs of the configured
    /// size. Called at server startup so a bad catalog is fatal before the
    /// first room exists, never silently degraded.
    pub fn validate(&self) -> Result<(), GameError> {
        self.catalog.check_card_size(self.card_size)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            catalog: Catalog::default(),
            card_size: CARD_SIZE,
            round_duration: Duration::from_secs(15),
            intermission: Duration::from_secs(3),
        }
    }
}

// ---------------------------------------------------------------------------
// RoomPhase
// ---------------------------------------------------------------------------

/// The lifecycle state of a room.
///
/// ```text
/// Lobby ⇄ Ready → Playing → Ended
/// ```
///
/// - **Lobby**: below capacity, accepting joins.
/// - **Ready**: capacity reached (2 participants, or 1 in solo mode);
///   waiting for a `start_game` command. Drops back to Lobby if a
///   participant leaves before the game starts.
/// - **Playing**: rounds are cycling. Stays Playing across round
///   resolution and expiry, and even if one participant leaves.
/// - **Ended**: all participants gone; the actor stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomPhase {
    Lobby,
    Ready,
    Playing,
    Ended,
}

impl RoomPhase {
    /// Whether the room is accepting new participants.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Lobby)
    }

    /// Whether a `start_game` command is valid in this phase.
    pub fn can_start(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

impl std::fmt::Display for RoomPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lobby => write!(f, "Lobby"),
            Self::Ready => write!(f, "Ready"),
            Self::Playing => write!(f, "Playing"),
            Self::Ended => write!(f, "Ended"),
        }
    }
}
