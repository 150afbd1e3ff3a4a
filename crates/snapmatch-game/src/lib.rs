//! Card-pair generation for Snapmatch.
//!
//! A round of Snapmatch shows each participant a pair of symbol cards that
//! share exactly one symbol. This crate produces those pairs: it owns the
//! symbol [`Catalog`], the [`generate_pair`] algorithm, and the guess
//! normalization rule. Everything here is pure and synchronous — the
//! generator takes an explicit `Rng` and has no side effects, so the room
//! layer can call it every round without locking.
//!
//! # Key types
//!
//! - [`Catalog`] — the configured pool of candidate symbol names
//! - [`Card`] — an ordered set of `card_size` distinct symbols
//! - [`CardPair`] — two cards plus their guaranteed single match
//! - [`GameError`] — configuration failures (catalog too small)

mod catalog;
mod error;
mod generator;

pub use catalog::Catalog;
pub use error::GameError;
pub use generator::{generate_pair, Card, CardPair, CARD_SIZE};

/// Normalizes guess text for comparison: trims surrounding whitespace and
/// case-folds. `" Banana"` and `"banana"` compare equal after this.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_lowercases() {
        assert_eq!(normalize(" Banana"), "banana");
        assert_eq!(normalize("ANGRY CAT\t"), "angry cat");
        assert_eq!(normalize("toothbrush"), "toothbrush");
    }

    #[test]
    fn test_normalize_whitespace_only_is_empty() {
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize(""), "");
    }
}
