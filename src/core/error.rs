//! Configuration errors.
//!
//! Gameplay never errors: rule violations and rate-limited hints are
//! reported as `false`. Only configuration is validated with `Result`.

use thiserror::Error;

/// Rejected session or cooldown configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Cooldown interval must be a non-negative, representable duration.
    #[error("cooldown interval must be a finite duration >= 0 seconds, got {0}")]
    InvalidInterval(f64),

    /// Refresh rate must be in `(0, 100]` polls per second.
    #[error("refresh rate must be in (0, {max}] polls/second, got {rate}")]
    InvalidRefreshRate { rate: f64, max: f64 },

    /// Cards per draw batch must be at least one.
    #[error("draw batch must be at least 1 card")]
    EmptyDrawBatch,

    /// The replenish floor must not exceed the draw guard.
    #[error("min field size {min_field} exceeds draw guard {max_field_for_draw}")]
    InvalidFieldLimits {
        min_field: usize,
        max_field_for_draw: usize,
    },
}

/// Result type for configuration.
pub type Result<T> = std::result::Result<T, ConfigError>;
