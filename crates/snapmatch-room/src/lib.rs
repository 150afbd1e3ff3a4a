//! Room lifecycle management for Snapmatch.
//!
//! Each room runs as an isolated Tokio task (actor model) that owns the
//! roster, scores, and the current round. All mutation — joins, guesses,
//! timer expiries — flows through the actor's command channel one message
//! at a time, which is what makes round resolution exactly-once under
//! concurrent guesses. Rooms are fully independent and run in parallel.
//!
//! # Key types
//!
//! - [`RoomRegistry`] — mints room codes, creates/removes rooms
//! - [`RoomHandle`] — send commands to a running room actor
//! - [`RoomPhase`] — lifecycle state machine (lobby → ready → playing → ended)
//! - [`GameConfig`] — catalog, card size, round timing
//! - [`Round`] — one timed challenge and its resolution state

mod config;
mod error;
mod registry;
mod room;
mod round;

pub use config::{GameConfig, RoomPhase};
pub use error::RoomError;
pub use registry::RoomRegistry;
pub use room::{spawn_room, JoinedPlayer, PlayerSender, RoomHandle, RoomInfo};
pub use round::{GuessOutcome, Round};
