//! Environment-driven server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use snapmatch_game::Catalog;
use snapmatch_room::GameConfig;

/// Runtime settings, read once at startup.
///
/// - `SNAPMATCH_PORT` — listen port (default 8000)
/// - `SNAPMATCH_SYMBOLS` — optional path to a symbols file, one symbol
///   per line; the built-in catalog is used when unset
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub symbols_file: Option<PathBuf>,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let port = match std::env::var("SNAPMATCH_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("invalid SNAPMATCH_PORT: {raw:?}"))?,
            Err(_) => 8000,
        };
        let symbols_file = std::env::var("SNAPMATCH_SYMBOLS").ok().map(PathBuf::from);

        Ok(Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], port)),
            symbols_file,
        })
    }

    /// Builds the game configuration all rooms will share, validating it
    /// so a catalog too small for full cards is fatal at startup.
    pub fn game_config(&self) -> anyhow::Result<GameConfig> {
        let catalog = match &self.symbols_file {
            Some(path) => Catalog::from_file(path)
                .with_context(|| format!("failed to load symbols from {}", path.display()))?,
            None => Catalog::default(),
        };
        let config = GameConfig {
            catalog,
            ..GameConfig::default()
        };
        config.validate().context("symbol catalog is too small")?;
        Ok(config)
    }
}
