//! Match validity and the `MatchTriple` type.
//!
//! Three cards form a match when, on every axis, their values are all
//! equal or all different. Equivalently, each card is the complement of
//! the other two, which is how validity is checked here.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cards::{Card, CardKey, Color, DeckScope, Feature, Number, Shading, Symbol};
use crate::core::GameRng;

/// The card completing `a` and `b` into a match.
///
/// Returns `None` for two feature-equal cards of the same scope: such a
/// pair cannot occur within one deck. Otherwise the result carries the
/// shared scope, or no scope if the inputs disagree.
#[must_use]
pub fn derive_complement(a: &Card, b: &Card) -> Option<Card> {
    let same_scope = a.scope == b.scope;
    if same_scope && a == b {
        return None;
    }

    let card = Card::new(
        Number::third(a.number, b.number),
        Symbol::third(a.symbol, b.symbol),
        Shading::third(a.shading, b.shading),
        Color::third(a.color, b.color),
    );
    Some(card.with_scope(if same_scope { a.scope } else { None }))
}

/// Whether the three cards form a match.
#[must_use]
pub fn is_valid_match(a: &Card, b: &Card, c: &Card) -> bool {
    derive_complement(b, c).is_some_and(|complement| complement == *a)
}

/// Three cards rejected as a match.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cards {0}, {1} and {2} do not form a match")]
pub struct InvalidTriple(pub Card, pub Card, pub Card);

/// Three cards that form a match.
///
/// Only constructible through validation. Equality and hashing ignore
/// the order of the cards but respect their scopes.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(try_from = "[Card; 3]", into = "[Card; 3]")]
pub struct MatchTriple {
    cards: [Card; 3],
}

impl MatchTriple {
    /// Number of cards in a match.
    pub const SIZE: usize = 3;

    /// Validate three cards, keeping their order.
    #[must_use]
    pub fn new(a: Card, b: Card, c: Card) -> Option<Self> {
        is_valid_match(&a, &b, &c).then_some(Self { cards: [a, b, c] })
    }

    /// Complete a pair with its derived complement (placed first).
    #[must_use]
    pub fn from_pair(a: Card, b: Card) -> Option<Self> {
        let complement = derive_complement(&a, &b)?;
        Some(Self {
            cards: [complement, a, b],
        })
    }

    /// A random match whose cards all carry `scope`.
    #[must_use]
    pub fn random(scope: Option<DeckScope>, rng: &mut GameRng) -> Self {
        loop {
            let a = Card::random(scope, rng);
            let b = Card::random(scope, rng);
            if let Some(triple) = Self::from_pair(a, b) {
                return triple;
            }
        }
    }

    /// The cards, in construction order.
    #[must_use]
    pub fn cards(&self) -> &[Card; 3] {
        &self.cards
    }

    /// Whether `card` (by identity) is part of this match.
    #[must_use]
    pub fn contains(&self, card: &Card) -> bool {
        self.cards.iter().any(|c| c.is_same(card))
    }

    /// Identity keys in sorted order.
    #[must_use]
    pub fn keys(&self) -> [CardKey; 3] {
        let mut keys = self.cards.map(|c| c.key());
        keys.sort_unstable();
        keys
    }
}

impl PartialEq for MatchTriple {
    fn eq(&self, other: &Self) -> bool {
        self.keys() == other.keys()
    }
}

impl Eq for MatchTriple {}

impl Hash for MatchTriple {
    fn hash<H: Hasher>(&self, hasher: &mut H) {
        self.keys().hash(hasher);
    }
}

impl TryFrom<[Card; 3]> for MatchTriple {
    type Error = InvalidTriple;

    fn try_from([a, b, c]: [Card; 3]) -> Result<Self, Self::Error> {
        Self::new(a, b, c).ok_or(InvalidTriple(a, b, c))
    }
}

impl From<MatchTriple> for [Card; 3] {
    fn from(triple: MatchTriple) -> Self {
        triple.cards
    }
}

impl fmt::Display for MatchTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = &self.cards;
        write!(f, "{{{a}, {b}, {c}}}")
    }
}

/// Flatten a grave of matches into its cards, oldest first.
pub fn flatten<'a>(matches: impl IntoIterator<Item = &'a MatchTriple>) -> Vec<Card> {
    matches.into_iter().flat_map(|m| m.cards().iter().copied()).collect()
}
