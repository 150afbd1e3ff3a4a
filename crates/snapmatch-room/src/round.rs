//! One timed round: its card pair, deadline, and resolution state.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use snapmatch_game::{generate_pair, normalize, Card, CardPair, GameError};
use snapmatch_protocol::PlayerId;
use tokio::time::Instant;

use crate::GameConfig;

/// The outcome of evaluating one guess against a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    /// First correct guess: the round is now resolved with this winner.
    Win,
    /// Incorrect guess; the round stays active.
    Wrong,
    /// The round was already resolved when the guess arrived.
    Late,
    /// Empty or whitespace-only guess; ignored entirely.
    Empty,
}

/// A single round owned by one room.
///
/// `expires_at` is a monotonic instant used for the actual expiry timer;
/// `deadline_unix_ms` is the wall-clock deadline clients display. The two
/// are computed together at round start and never re-derived from each
/// other.
#[derive(Debug)]
pub struct Round {
    index: u64,
    cards: CardPair,
    /// Participants in join order at round start; seat 0 holds card A,
    /// seat 1 holds card B. Fixed for the round's lifetime even if a
    /// participant leaves mid-round.
    seats: Vec<PlayerId>,
    deadline_unix_ms: u64,
    expires_at: Instant,
    winner: Option<PlayerId>,
}

impl Round {
    /// Generates a fresh round from the configured catalog, assigning
    /// cards to `seats` in join order.
    pub fn start(
        index: u64,
        config: &GameConfig,
        seats: Vec<PlayerId>,
    ) -> Result<Self, GameError> {
        let cards =
            generate_pair(&config.catalog, config.card_size, &mut rand::rng())?;
        Ok(Self {
            index,
            cards,
            seats,
            deadline_unix_ms: unix_ms_after(config.round_duration),
            expires_at: Instant::now() + config.round_duration,
            winner: None,
        })
    }

    /// Monotonic round number within its room.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// The generated card pair.
    pub fn cards(&self) -> &CardPair {
        &self.cards
    }

    /// The symbol both cards share.
    pub fn match_symbol(&self) -> &str {
        &self.cards.match_symbol
    }

    /// The card pair as seen by one participant: their own card first.
    /// `None` for a participant who held no seat when the round started.
    pub fn card_view(&self, player: PlayerId) -> Option<[Card; 2]> {
        let seat = self.seats.iter().position(|p| *p == player)?;
        let CardPair { card_a, card_b, .. } = &self.cards;
        Some(if seat == 0 {
            [card_a.clone(), card_b.clone()]
        } else {
            [card_b.clone(), card_a.clone()]
        })
    }

    /// Wall-clock deadline in unix epoch milliseconds, for display.
    pub fn deadline_unix_ms(&self) -> u64 {
        self.deadline_unix_ms
    }

    /// Monotonic instant at which the round expires.
    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    /// Whether the round has been resolved with a winner.
    pub fn resolved(&self) -> bool {
        self.winner.is_some()
    }

    /// The winning participant, once resolved.
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// Evaluates a guess. The first correct guess transitions the round to
    /// resolved and records the winner; every later guess — correct or not
    /// — observes the resolved state and is reported as [`GuessOutcome::Late`].
    ///
    /// Comparison is whitespace-trimmed and case-folded on both sides.
    pub fn evaluate(&mut self, player: PlayerId, guess: &str) -> GuessOutcome {
        let guess = normalize(guess);
        if guess.is_empty() {
            return GuessOutcome::Empty;
        }
        if self.winner.is_some() {
            return GuessOutcome::Late;
        }
        if guess == normalize(self.match_symbol()) {
            self.winner = Some(player);
            GuessOutcome::Win
        } else {
            GuessOutcome::Wrong
        }
    }
}

/// Wall-clock timestamp `duration` from now, in unix epoch milliseconds.
fn unix_ms_after(duration: Duration) -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
        + duration.as_millis() as u64
}
