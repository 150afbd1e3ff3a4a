//! The card-pair generator.
//!
//! Produces one round's two cards with the core guarantee of the game:
//! the cards intersect in exactly one symbol, and that symbol is reported
//! as the match. The construction makes a second intersection impossible
//! rather than checking for it — the distractor halves are drawn disjoint.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Catalog, GameError};

/// Default number of symbols per card.
pub const CARD_SIZE: usize = 8;

/// An ordered sequence of distinct symbol values shown to one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Card(Vec<String>);

impl Card {
    /// The card's symbols in display order.
    pub fn symbols(&self) -> &[String] {
        &self.0
    }

    /// Number of symbols on the card.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the card is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the card carries the given symbol (exact value match).
    pub fn contains(&self, symbol: &str) -> bool {
        self.0.iter().any(|s| s == symbol)
    }
}

/// One round's generated cards and their single shared symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardPair {
    pub card_a: Card,
    pub card_b: Card,
    pub match_symbol: String,
}

/// Generates a card pair sharing exactly one symbol.
///
/// Algorithm:
/// 1. Choose the match symbol uniformly from the catalog.
/// 2. Draw `2 * (card_size - 1)` distinct distractors uniformly without
///    replacement from the rest of the catalog.
/// 3. Card A gets the match plus the first half of the distractors, card B
///    the match plus the second half. The halves are disjoint, so the
///    cards cannot intersect anywhere but the match.
/// 4. Shuffle each card's display order so the match position gives
///    nothing away.
///
/// Fails with [`GameError::CatalogTooSmall`] when the catalog cannot
/// supply enough distinct symbols, and [`GameError::InvalidCardSize`]
/// for a zero card size. Stateless — safe to call every round with a
/// fresh or shared `Rng`.
pub fn generate_pair<R: Rng + ?Sized>(
    catalog: &Catalog,
    card_size: usize,
    rng: &mut R,
) -> Result<CardPair, GameError> {
    catalog.check_card_size(card_size)?;

    let match_idx = rng.random_range(0..catalog.len());
    let match_symbol = catalog.symbol(match_idx).to_string();

    // Sample distractor indices from the catalog minus the match symbol:
    // draw from a range one shorter and shift past the match index.
    let picks =
        rand::seq::index::sample(rng, catalog.len() - 1, 2 * (card_size - 1));
    let mut distractors: Vec<String> = picks
        .iter()
        .map(|i| {
            let i = if i >= match_idx { i + 1 } else { i };
            catalog.symbol(i).to_string()
        })
        .collect();

    let second_half = distractors.split_off(card_size - 1);

    let mut card_a = distractors;
    card_a.push(match_symbol.clone());
    card_a.shuffle(rng);

    let mut card_b = second_half;
    card_b.push(match_symbol.clone());
    card_b.shuffle(rng);

    Ok(CardPair {
        card_a: Card(card_a),
        card_b: Card(card_b),
        match_symbol,
    })
}
