//! Cards and deck scopes.
//!
//! A `Card` compares equal to another card with the same four feature
//! values, whatever deck it came from. Storage and lookup use `CardKey`,
//! which also includes the deck scope, so cards from two sessions never
//! alias each other.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::feature::{Color, Feature, Number, Shading, Symbol};
use crate::core::GameRng;

/// Token tying cards to the session deck they were generated for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DeckScope(pub Uuid);

impl DeckScope {
    /// Allocate a fresh random (v4) scope.
    ///
    /// Drawn from OS entropy, not from a session RNG, so two sessions
    /// built from the same seed still get distinct scopes.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the raw UUID.
    #[must_use]
    pub const fn raw(self) -> Uuid {
        self.0
    }
}

impl fmt::Display for DeckScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Deck({})", self.0)
    }
}

/// Exact identity of a card: all four features plus its scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardKey {
    pub number: Number,
    pub symbol: Symbol,
    pub shading: Shading,
    pub color: Color,
    pub scope: Option<DeckScope>,
}

/// A single playing card.
///
/// `PartialEq` and `Hash` look at the features only; use [`Card::key`]
/// or [`Card::is_same`] when the deck scope matters.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Card {
    pub number: Number,
    pub symbol: Symbol,
    pub shading: Shading,
    pub color: Color,
    pub scope: Option<DeckScope>,
}

impl Card {
    /// Create an unscoped card.
    #[must_use]
    pub const fn new(number: Number, symbol: Symbol, shading: Shading, color: Color) -> Self {
        Self {
            number,
            symbol,
            shading,
            color,
            scope: None,
        }
    }

    /// Attach a deck scope.
    #[must_use]
    pub fn with_scope(mut self, scope: Option<DeckScope>) -> Self {
        self.scope = scope;
        self
    }

    /// Identity key including the scope.
    #[must_use]
    pub const fn key(&self) -> CardKey {
        CardKey {
            number: self.number,
            symbol: self.symbol,
            shading: self.shading,
            color: self.color,
            scope: self.scope,
        }
    }

    /// Same features and same scope.
    #[must_use]
    pub fn is_same(&self, other: &Card) -> bool {
        self.key() == other.key()
    }

    /// Every feature combination, in axis order, all tagged with `scope`.
    pub fn all(scope: Option<DeckScope>) -> impl Iterator<Item = Card> {
        Number::ALL.iter().flat_map(move |&number| {
            Symbol::ALL.iter().flat_map(move |&symbol| {
                Shading::ALL.iter().flat_map(move |&shading| {
                    Color::ALL.iter().map(move |&color| {
                        Card::new(number, symbol, shading, color).with_scope(scope)
                    })
                })
            })
        })
    }

    /// A uniformly random card.
    #[must_use]
    pub fn random(scope: Option<DeckScope>, rng: &mut GameRng) -> Self {
        Card::new(
            Number::random(rng),
            Symbol::random(rng),
            Shading::random(rng),
            Color::random(rng),
        )
        .with_scope(scope)
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number
            && self.symbol == other.symbol
            && self.shading == other.shading
            && self.color == other.color
    }
}

impl Eq for Card {}

impl std::hash::Hash for Card {
    fn hash<H: std::hash::Hasher>(&self, hasher: &mut H) {
        self.number.hash(hasher);
        self.symbol.hash(hasher);
        self.shading.hash(hasher);
        self.color.hash(hasher);
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            self.number, self.symbol, self.shading, self.color
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_equality_ignores_scope() {
        let a = Card::new(Number::One, Symbol::Skull, Shading::Gray, Color::Red);
        let b = a.with_scope(Some(DeckScope::generate()));

        assert_eq!(a, b);
        assert!(!a.is_same(&b));
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn test_hash_matches_equality() {
        let a = Card::new(Number::Two, Symbol::Alien, Shading::Black, Color::Blue);
        let mut set = FxHashSet::default();
        set.insert(a.with_scope(Some(DeckScope::generate())));
        assert!(set.contains(&a.with_scope(Some(DeckScope::generate()))));
    }

    #[test]
    fn test_all_is_exhaustive() {
        let s = Some(DeckScope::generate());
        let cards: Vec<_> = Card::all(s).collect();
        assert_eq!(cards.len(), 81);
        assert!(cards.iter().all(|c| c.scope == s));

        let distinct: FxHashSet<_> = cards.iter().copied().collect();
        assert_eq!(distinct.len(), 81);
    }

    #[test]
    fn test_scopes_are_fresh() {
        let a = DeckScope::generate();
        assert_ne!(a, DeckScope::generate());
        assert_eq!(a.raw().get_version_num(), 4);
    }

    #[test]
    fn test_display() {
        let card = Card::new(Number::Three, Symbol::Swirl, Shading::White, Color::Yellow);
        assert_eq!(card.to_string(), "3-swirl-white-yellow");
    }

    #[test]
    fn test_card_serde_keeps_scope() {
        let card = Card::new(Number::One, Symbol::Alien, Shading::Gray, Color::Blue)
            .with_scope(Some(DeckScope::generate()));
        let json = serde_json::to_string(&card).unwrap();
        let back: Card = serde_json::from_str(&json).unwrap();
        assert!(card.is_same(&back));
    }
}
