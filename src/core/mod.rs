//! Core building blocks: RNG, configuration, errors.

pub mod config;
pub mod error;
pub mod rng;

pub use config::{
    CooldownConfig, SessionConfig, DEFAULT_HINT_INTERVAL_SECS, DEFAULT_REFRESH_RATE,
    MAX_REFRESH_RATE,
};
pub use error::ConfigError;
pub use rng::GameRng;
