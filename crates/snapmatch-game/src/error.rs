//! Error types for the game layer.

/// Errors that can occur while generating cards.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// The symbol catalog cannot fill two cards that overlap in exactly
    /// one symbol. Fatal configuration error — there is no degraded mode,
    /// callers surface this at startup or at round start.
    #[error("symbol catalog too small: need at least {need} distinct symbols, have {have}")]
    CatalogTooSmall { need: usize, have: usize },

    /// Cards must carry at least one symbol.
    #[error("card size must be at least 1, got {0}")]
    InvalidCardSize(usize),

    /// The catalog file could not be read.
    #[error("failed to read symbol catalog: {0}")]
    CatalogUnreadable(#[from] std::io::Error),
}
