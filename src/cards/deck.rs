//! The session deck.
//!
//! Cards are stored bottom to top: index 0 is the bottom, the last
//! element is the top card and is drawn first.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::card::{Card, DeckScope};
use crate::core::GameRng;

/// Number of cards in a complete deck (3^4).
pub const DECK_SIZE: usize = 81;

/// An ordered pile of cards belonging to one deck scope.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// The complete 81-card deck in enumeration order.
    #[must_use]
    pub fn new(scope: Option<DeckScope>) -> Self {
        Self::from_cards(scope, Card::all(scope).collect())
    }

    /// The complete deck, shuffled.
    #[must_use]
    pub fn shuffled(scope: Option<DeckScope>, rng: &mut GameRng) -> Self {
        let mut deck = Self::new(scope);
        deck.shuffle(rng);
        deck
    }

    /// Build a deck from explicit cards (bottom to top).
    ///
    /// Cards are re-tagged with `scope`.
    ///
    /// # Panics
    ///
    /// Panics if two cards share the same features: a deck scope holds
    /// each combination at most once.
    #[must_use]
    pub fn from_cards(scope: Option<DeckScope>, cards: Vec<Card>) -> Self {
        let mut seen = FxHashSet::default();
        let cards: Vec<Card> = cards
            .into_iter()
            .map(|card| {
                assert!(seen.insert(card), "duplicate card {} in deck", card);
                card.with_scope(scope)
            })
            .collect();
        assert!(cards.len() <= DECK_SIZE, "deck holds at most {} cards", DECK_SIZE);

        Self { cards }
    }

    /// Shuffle the remaining cards.
    pub fn shuffle(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.cards);
    }

    /// Remove and return the top card.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Remove up to `count` cards from the top, in draw order.
    pub fn draw_many(&mut self, count: usize) -> Vec<Card> {
        std::iter::from_fn(|| self.draw()).take(count).collect()
    }

    /// Remaining cards, bottom to top.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
