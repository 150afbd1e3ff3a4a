//! The Snapmatch server: HTTP endpoints for room creation and status,
//! plus the WebSocket hub that bridges connections to room actors.

pub mod config;
pub mod http;
pub mod hub;

use tokio::sync::Mutex;

use snapmatch_room::{GameConfig, RoomRegistry};

/// Shared server state. The registry mutex is held only for room
/// creation, lookup, and removal; all gameplay traffic flows through
/// room handles without touching it.
pub struct AppState {
    pub registry: Mutex<RoomRegistry>,
}

impl AppState {
    pub fn new(config: GameConfig) -> Self {
        Self {
            registry: Mutex::new(RoomRegistry::new(config)),
        }
    }
}
