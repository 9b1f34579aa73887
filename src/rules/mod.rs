//! Match rules and search.
//!
//! - `derive_complement`: the unique card completing a pair
//! - `is_valid_match`: the single gating rule for every match operation
//! - `MatchTriple`: three cards that passed validation
//! - `MatchEngine`: first/all match search over a field
//!
//! ## Unique Complement
//!
//! For any two feature-distinct cards of a complete deck there is exactly
//! one card in that deck completing a match with them. Hints rely on it.

pub mod engine;
pub mod triple;

pub use engine::MatchEngine;
pub use triple::{derive_complement, flatten, is_valid_match, InvalidTriple, MatchTriple};
