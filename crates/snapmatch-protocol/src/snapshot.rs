//! The room state snapshot broadcast after every mutation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use snapmatch_game::Card;

use crate::{PlayerId, RoomCode};

/// A consistent view of one room, built inside the room actor immediately
/// after the mutation that triggered it — clients never see a partial or
/// stale state.
///
/// `BTreeMap` keys participants by id; ids are assigned in join order, so
/// map order equals join order on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    /// The room's code.
    pub room_code: RoomCode,

    /// Roster: participant id → display name, in join order.
    pub players: BTreeMap<PlayerId, String>,

    /// Scores: participant id → rounds won.
    pub scores: BTreeMap<PlayerId, u32>,

    /// Whether the room has reached capacity (2, or 1 in solo mode).
    pub is_full: bool,

    /// Whether round play has begun.
    pub game_started: bool,

    /// Whether this is a solo room.
    pub solo_mode: bool,

    /// The current round's cards as seen by each participant: their own
    /// card first, the opponent's second. Empty between game start and the
    /// first round only.
    pub cards: BTreeMap<PlayerId, [Card; 2]>,

    /// Absolute deadline of the current round, unix epoch milliseconds.
    /// Display only — expiry itself runs on the server's monotonic clock.
    pub round_deadline: Option<u64>,

    /// Configured round length in seconds.
    pub round_duration: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_ids_serialize_as_string_map_keys() {
        let mut snapshot = RoomSnapshot::default();
        snapshot.players.insert(PlayerId(1), "Player 1".into());
        snapshot.players.insert(PlayerId(2), "Player 2".into());
        snapshot.scores.insert(PlayerId(1), 3);

        let json: serde_json::Value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["players"]["1"], "Player 1");
        assert_eq!(json["players"]["2"], "Player 2");
        assert_eq!(json["scores"]["1"], 3);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut snapshot = RoomSnapshot {
            room_code: RoomCode::new("AB12CD"),
            is_full: true,
            game_started: true,
            solo_mode: false,
            round_deadline: Some(1_700_000_000_000),
            round_duration: 15,
            ..RoomSnapshot::default()
        };
        snapshot.players.insert(PlayerId(1), "Player 1".into());
        snapshot.scores.insert(PlayerId(1), 0);

        let bytes = serde_json::to_vec(&snapshot).unwrap();
        let decoded: RoomSnapshot = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(snapshot, decoded);
    }

    #[test]
    fn test_roster_order_is_join_order() {
        // Ids are assigned in join order, and BTreeMap iterates keys in
        // ascending order — the wire roster must list earlier joiners first.
        let mut snapshot = RoomSnapshot::default();
        snapshot.players.insert(PlayerId(2), "Player 2".into());
        snapshot.players.insert(PlayerId(1), "Player 1".into());

        let names: Vec<&String> = snapshot.players.values().collect();
        assert_eq!(names, ["Player 1", "Player 2"]);
    }
}
