//! # set-engine
//!
//! Rules engine and session state for a Set-style triad matching game.
//!
//! ## Design Principles
//!
//! 1. **One Gating Rule**: Every match goes through `MatchTriple::new`.
//!    An invalid triple cannot be constructed.
//!
//! 2. **Equality vs Identity**: Cards compare by features for gameplay and
//!    by `CardKey` (features + deck scope) for storage and removal.
//!
//! 3. **Total Intents**: `draw`, `select` and `hint` never panic on player
//!    input. Failure is `false` with the session unchanged.
//!
//! ## Architecture
//!
//! - **Deterministic**: A seeded `GameRng` reproduces the shuffle, so
//!   hints and tests are repeatable. Deck scopes are always fresh.
//!
//! - **Polled Cooldown**: Hint readiness is an atomic flag refreshed by a
//!   Tokio task; the session itself never suspends.
//!
//! ## Modules
//!
//! - `core`: RNG, configuration, errors
//! - `cards`: Features, cards, decks
//! - `rules`: Complement derivation, match validation and search
//! - `cooldown`: Readiness gate and clocks
//! - `session`: Session state machine, events, snapshots, autoplay

pub mod cards;
pub mod cooldown;
pub mod core;
pub mod rules;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    ConfigError, CooldownConfig, GameRng, SessionConfig,
};

pub use crate::cards::{
    Card, CardKey, Color, Deck, DeckScope, Feature, Number, Shading, Symbol, DECK_SIZE,
};

pub use crate::rules::{derive_complement, is_valid_match, MatchEngine, MatchTriple};

pub use crate::cooldown::{Clock, CooldownTimer, ManualClock, PollerHandle, SystemClock};

pub use crate::session::{
    AutoPlayReport, AutoPlayer, ListenerId, Session, SessionEvent, SessionPhase,
    SessionSnapshot,
};
