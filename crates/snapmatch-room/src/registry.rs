//! Room registry: mints codes and tracks live room handles.

use std::collections::HashMap;

use rand::Rng;
use snapmatch_protocol::RoomCode;

use crate::{GameConfig, RoomError, RoomHandle, spawn_room};

/// Alphabet for room codes. Uppercase plus digits, matching what players
/// type in from a share link or read over a call.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// How many mint retries before giving up. With 36^6 codes this only
/// trips if the registry is essentially full.
const MINT_ATTEMPTS: u32 = 16;

/// Command queue depth per room actor.
const ROOM_CHANNEL_SIZE: usize = 64;

/// Owns all live rooms. The server wraps this in a mutex; individual
/// room traffic goes through the handles and never touches the registry.
pub struct RoomRegistry {
    rooms: HashMap<RoomCode, RoomHandle>,
    config: GameConfig,
}

impl RoomRegistry {
    pub fn new(config: GameConfig) -> Self {
        Self {
            rooms: HashMap::new(),
            config,
        }
    }

    /// Creates a room with a freshly minted code and spawns its actor.
    pub fn create_room(&mut self, solo_mode: bool) -> Result<RoomHandle, RoomError> {
        let code = self.mint_code()?;
        let handle = spawn_room(
            code.clone(),
            solo_mode,
            self.config.clone(),
            ROOM_CHANNEL_SIZE,
        );
        self.rooms.insert(code.clone(), handle.clone());
        tracing::info!(room = %code, solo = solo_mode, total = self.rooms.len(), "room created");
        Ok(handle)
    }

    /// Looks up a room by code.
    pub fn get(&self, code: &RoomCode) -> Result<RoomHandle, RoomError> {
        self.rooms
            .get(code)
            .cloned()
            .ok_or_else(|| RoomError::NotFound(code.clone()))
    }

    pub fn contains(&self, code: &RoomCode) -> bool {
        self.rooms.contains_key(code)
    }

    /// Drops a room from the registry and shuts its actor down. Safe to
    /// call for a code that was already removed.
    pub async fn remove(&mut self, code: &RoomCode) {
        if let Some(handle) = self.rooms.remove(code) {
            handle.shutdown().await;
            tracing::info!(room = %code, total = self.rooms.len(), "room removed");
        }
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    fn mint_code(&self) -> Result<RoomCode, RoomError> {
        let mut rng = rand::rng();
        for _ in 0..MINT_ATTEMPTS {
            let code: String = (0..RoomCode::LEN)
                .map(|_| {
                    CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char
                })
                .collect();
            let code = RoomCode::new(code);
            if !self.rooms.contains_key(&code) {
                return Ok(code);
            }
        }
        Err(RoomError::CodeSpaceExhausted(MINT_ATTEMPTS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> RoomRegistry {
        RoomRegistry::new(GameConfig::default())
    }

    #[tokio::test]
    async fn minted_codes_are_six_chars_from_alphabet() {
        let mut reg = registry();
        for _ in 0..20 {
            let handle = reg.create_room(false).unwrap();
            let code = handle.code().as_str();
            assert_eq!(code.len(), RoomCode::LEN);
            assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)));
        }
        assert_eq!(reg.room_count(), 20);
    }

    #[tokio::test]
    async fn lookup_of_unknown_code_fails() {
        let reg = registry();
        let missing = RoomCode::new("ZZZZZZ");
        assert!(matches!(reg.get(&missing), Err(RoomError::NotFound(_))));
        assert!(!reg.contains(&missing));
    }

    #[tokio::test]
    async fn remove_drops_the_room() {
        let mut reg = registry();
        let handle = reg.create_room(true).unwrap();
        let code = handle.code().clone();
        assert!(reg.contains(&code));

        reg.remove(&code).await;
        assert!(!reg.contains(&code));
        assert_eq!(reg.room_count(), 0);

        // Second removal of the same code is a no-op.
        reg.remove(&code).await;
    }
}
