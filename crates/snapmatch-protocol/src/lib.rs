//! Wire protocol for Snapmatch.
//!
//! This crate defines the "language" that clients and the server speak over
//! a room's realtime channel, plus the room state snapshot both sides share:
//!
//! - **Identity** ([`PlayerId`], [`RoomCode`]) — who and where.
//! - **Inbound** ([`ClientMessage`]) — the commands a client may send.
//! - **Outbound** ([`ServerMessage`]) — the events the server broadcasts,
//!   each tagged by `type` in JSON.
//! - **Snapshot** ([`RoomSnapshot`]) — the full post-mutation room state
//!   carried by most outbound events.
//!
//! The protocol layer knows nothing about sockets or rooms — it only
//! defines shapes and their JSON representation.

mod snapshot;
mod types;

pub use snapshot::RoomSnapshot;
pub use types::{ClientMessage, PlayerId, Recipient, RoomCode, ServerMessage};
