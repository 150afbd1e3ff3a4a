//! Core protocol types: identities and the two message directions.
//!
//! Every inbound and outbound message is a closed tagged union. Serde's
//! internal tagging (`#[serde(tag = "type")]`) produces the flat JSON the
//! clients expect: `{"type": "guess", "guess": "banana peel"}`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::RoomSnapshot;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a participant, scoped to their connection.
///
/// Newtype over `u64` so a player id can't be confused with a score or a
/// round index. `#[serde(transparent)]` keeps the JSON a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

/// Manual `Deserialize` because player ids appear in two JSON positions:
/// as plain numbers (`"player_id": 1`) and as map keys in the snapshot,
/// which serde_json writes as strings (`"1"`). Internally tagged enums
/// additionally buffer their content, where a string key reaches this
/// type directly instead of going through serde_json's map-key parser,
/// so both shapes must be accepted here.
impl<'de> Deserialize<'de> for PlayerId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct IdVisitor;

        impl serde::de::Visitor<'_> for IdVisitor {
            type Value = PlayerId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a player id as an integer or a decimal string")
            }

            fn visit_u64<E>(self, v: u64) -> Result<PlayerId, E>
            where
                E: serde::de::Error,
            {
                Ok(PlayerId(v))
            }

            fn visit_i64<E>(self, v: i64) -> Result<PlayerId, E>
            where
                E: serde::de::Error,
            {
                u64::try_from(v).map(PlayerId).map_err(|_| {
                    E::invalid_value(serde::de::Unexpected::Signed(v), &self)
                })
            }

            fn visit_str<E>(self, v: &str) -> Result<PlayerId, E>
            where
                E: serde::de::Error,
            {
                v.parse().map(PlayerId).map_err(|_| {
                    E::invalid_value(serde::de::Unexpected::Str(v), &self)
                })
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A six-character room identifier, uppercase alphanumeric.
///
/// Lookup is case-insensitive: construction upper-cases the input, so
/// `RoomCode::new("ab12cd")` equals the minted `"AB12CD"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Expected length of a minted room code.
    pub const LEN: usize = 6;

    /// Creates a room code, normalizing to uppercase.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_ascii_uppercase())
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Recipient — who should receive an outbound event?
// ---------------------------------------------------------------------------

/// Specifies who should receive an outbound event.
///
/// Room logic produces `(Recipient, ServerMessage)` pairs; the room actor
/// fans them out. This never travels on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// Every participant in the room.
    All,
    /// One specific participant (e.g. a private `wrong_guess`).
    Player(PlayerId),
    /// Everyone except the named participant (e.g. `player_joined`).
    AllExcept(PlayerId),
}

// ---------------------------------------------------------------------------
// Inbound: client → server
// ---------------------------------------------------------------------------

/// Commands a client may send over the room channel.
///
/// Anything that fails to parse as one of these variants is ignored by the
/// hub — one malformed message never tears down a connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Start the first round. Accepted only while the room is ready.
    StartGame,
    /// Name the symbol the sender believes both cards share.
    Guess { guess: String },
    /// Application-level keep-alive; answered with [`ServerMessage::Pong`].
    Ping,
}

// ---------------------------------------------------------------------------
// Outbound: server → client
// ---------------------------------------------------------------------------

/// Events the server sends over the room channel, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Join acknowledgement, sent only to the joining connection.
    Connected {
        player_id: PlayerId,
        player_name: String,
        room_code: RoomCode,
    },

    /// Someone else joined; sent to the existing participants.
    PlayerJoined { state: RoomSnapshot },

    /// Full state refresh, sent to a participant who just joined.
    StateUpdate { state: RoomSnapshot },

    /// Capacity reached in a two-player room.
    RoomFull { message: String },

    /// Ready to start (solo room reached its single participant).
    RoomReady { message: String },

    /// The first round has begun.
    GameStarted { state: RoomSnapshot },

    /// A subsequent round has begun.
    NewRound { state: RoomSnapshot },

    /// A participant named the match first; the round is resolved.
    MatchFound {
        state: RoomSnapshot,
        player_id: PlayerId,
        player_name: String,
        r#match: String,
        solo_mode: bool,
    },

    /// Private rejection of an incorrect (or late) guess.
    WrongGuess { message: String },

    /// The round timed out with no winner.
    RoundExpired { message: String, state: RoomSnapshot },

    /// A participant disconnected.
    PlayerLeft {
        player_id: PlayerId,
        state: RoomSnapshot,
    },

    /// Reply to [`ClientMessage::Ping`].
    Pong,

    /// Terminal error on this connection (unknown room, room full).
    Error { message: String },
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! The clients parse these messages by their `type` tag; these tests
    //! pin the exact JSON shapes so a serde attribute change can't silently
    //! break the protocol.

    use super::*;

    #[test]
    fn test_player_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&PlayerId(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn test_player_id_display() {
        assert_eq!(PlayerId(7).to_string(), "P-7");
    }

    #[test]
    fn test_player_id_deserializes_from_number_and_string() {
        // Map keys arrive as strings, plain fields as numbers; both must
        // decode to the same id.
        assert_eq!(serde_json::from_str::<PlayerId>("7").unwrap(), PlayerId(7));
        assert_eq!(
            serde_json::from_str::<PlayerId>(r#""7""#).unwrap(),
            PlayerId(7)
        );
        assert!(serde_json::from_str::<PlayerId>(r#""seven""#).is_err());
        assert!(serde_json::from_str::<PlayerId>("-7").is_err());
    }

    #[test]
    fn test_tagged_message_with_roster_round_trips() {
        // The internal `type` tag makes serde buffer the message content,
        // so snapshot map keys reach PlayerId as strings rather than
        // through serde_json's map-key parser. A populated roster must
        // still round-trip through the tagged enum.
        let mut state = RoomSnapshot::default();
        state.players.insert(PlayerId(1), "Player 1".into());
        state.players.insert(PlayerId(2), "Player 2".into());
        state.scores.insert(PlayerId(1), 2);
        state.scores.insert(PlayerId(2), 0);

        let msg = ServerMessage::StateUpdate { state };
        let json = serde_json::to_string(&msg).unwrap();
        let decoded: ServerMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(msg, decoded);
    }

    #[test]
    fn test_room_code_normalizes_to_uppercase() {
        assert_eq!(RoomCode::new("ab12cd"), RoomCode::new("AB12CD"));
        assert_eq!(RoomCode::new("ab12cd").as_str(), "AB12CD");
    }

    #[test]
    fn test_client_message_start_game_json() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"start_game"}"#).unwrap();
        assert_eq!(msg, ClientMessage::StartGame);
    }

    #[test]
    fn test_client_message_guess_json() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"guess","guess":"banana peel"}"#)
                .unwrap();
        assert_eq!(
            msg,
            ClientMessage::Guess {
                guess: "banana peel".into()
            }
        );
    }

    #[test]
    fn test_unknown_client_message_type_is_error() {
        let result: Result<ClientMessage, _> =
            serde_json::from_str(r#"{"type":"fly_to_moon"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_connected_json_shape() {
        let msg = ServerMessage::Connected {
            player_id: PlayerId(1),
            player_name: "Player 1".into(),
            room_code: RoomCode::new("AB12CD"),
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "connected");
        assert_eq!(json["player_id"], 1);
        assert_eq!(json["player_name"], "Player 1");
        assert_eq!(json["room_code"], "AB12CD");
    }

    #[test]
    fn test_match_found_carries_match_field() {
        // `match` is a Rust keyword; the raw identifier must still
        // serialize as plain "match" on the wire.
        let msg = ServerMessage::MatchFound {
            state: RoomSnapshot::default(),
            player_id: PlayerId(2),
            player_name: "Player 2".into(),
            r#match: "rubber duck".into(),
            solo_mode: false,
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "match_found");
        assert_eq!(json["match"], "rubber duck");
        assert_eq!(json["solo_mode"], false);
    }

    #[test]
    fn test_wrong_guess_is_snake_case_tagged() {
        let msg = ServerMessage::WrongGuess {
            message: "keep looking".into(),
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "wrong_guess");
        assert_eq!(json["message"], "keep looking");
    }

    #[test]
    fn test_round_expired_round_trip() {
        let msg = ServerMessage::RoundExpired {
            message: "time's up".into(),
            state: RoomSnapshot::default(),
        };
        let bytes = serde_json::to_vec(&msg).unwrap();
        let decoded: ServerMessage = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(msg, decoded);
    }

    #[test]
    fn test_decode_garbage_returns_error() {
        let garbage = b"not json at all";
        let result: Result<ClientMessage, _> = serde_json::from_slice(garbage);
        assert!(result.is_err());
    }
}
