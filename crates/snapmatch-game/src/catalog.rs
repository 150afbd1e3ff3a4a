//! The symbol catalog: the pool of names the generator draws from.

use std::fs;
use std::path::Path;

use crate::GameError;

/// Built-in symbol names used when no catalog file is configured.
///
/// The generator needs `2 * card_size - 1` distinct entries; this list is
/// comfortably larger than the 15 required for the default card size of 8.
const DEFAULT_SYMBOLS: &[&str] = &[
    "banana peel",
    "toothbrush",
    "angry cat",
    "toilet paper roll",
    "screaming sun",
    "spilled coffee",
    "dancing pickle",
    "flying pizza",
    "confused robot",
    "melting clock",
    "rubber duck",
    "haunted sock",
    "grumpy cloud",
    "sneaky ninja",
    "invisible sandwich",
    "disco ball",
    "left shoe",
    "broken umbrella",
    "winking moon",
    "suspicious broccoli",
    "tiny accordion",
    "upside-down turtle",
    "sleepy volcano",
    "juggling octopus",
];

/// An ordered pool of symbol names available to the generator.
///
/// Construction deduplicates by value while preserving first-occurrence
/// order: the exactly-one-match guarantee compares symbols by value, so a
/// duplicated name in the input would otherwise let both halves of a pair
/// contain "the same" symbol twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    symbols: Vec<String>,
}

impl Catalog {
    /// Creates a catalog from a list of names, dropping duplicate values.
    pub fn new(symbols: impl IntoIterator<Item = String>) -> Self {
        let mut seen = std::collections::HashSet::new();
        let symbols = symbols
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty() && seen.insert(s.clone()))
            .collect();
        Self { symbols }
    }

    /// Loads a catalog from a text file, one symbol per line.
    ///
    /// Blank lines are skipped. Fails with [`GameError::CatalogUnreadable`]
    /// if the file cannot be read.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let contents = fs::read_to_string(path)?;
        Ok(Self::new(contents.lines().map(str::to_string)))
    }

    /// Number of distinct symbols in the catalog.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The symbol at `index`. Panics if out of range.
    pub(crate) fn symbol(&self, index: usize) -> &str {
        &self.symbols[index]
    }

    /// All symbols in catalog order.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Checks that the catalog can supply a card pair of the given size.
    ///
    /// This is the ConfigurationError precondition from the round
    /// generator, exposed separately so servers can fail fast at startup
    /// instead of at first round start.
    pub fn check_card_size(&self, card_size: usize) -> Result<(), GameError> {
        if card_size == 0 {
            return Err(GameError::InvalidCardSize(card_size));
        }
        let need = 2 * card_size - 1;
        if self.symbols.len() < need {
            return Err(GameError::CatalogTooSmall {
                need,
                have: self.symbols.len(),
            });
        }
        Ok(())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(DEFAULT_SYMBOLS.iter().map(|s| s.to_string()))
    }
}
