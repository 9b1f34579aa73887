//! Card model: features, cards, and decks.
//!
//! ## Key Types
//!
//! - `Feature`: A closed 3-valued axis (`Number`, `Symbol`, `Shading`, `Color`)
//! - `Card`: Four feature values plus an optional `DeckScope`
//! - `CardKey`: Exact identity (features + scope) for storage and lookup
//! - `Deck`: The 81-card exhaustive deck of one session
//!
//! ## Equality vs Identity
//!
//! Gameplay compares cards by features only. Anything that stores or
//! removes a specific card goes through `CardKey`.

pub mod card;
pub mod deck;
pub mod feature;

pub use card::{Card, CardKey, DeckScope};
pub use deck::{Deck, DECK_SIZE};
pub use feature::{Color, Feature, Number, Shading, Symbol};
