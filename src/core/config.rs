//! Session and cooldown configuration.
//!
//! Configuration is plain data with builder-style setters. Values are
//! checked by `validate()`, which `Session::new` and `CooldownTimer::new`
//! call before anything is built, so a bad value fails fast instead of
//! being silently clamped.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, Result};

/// Hint cooldown used when none is configured.
///
/// Short in debug builds so manual testing is not slowed down.
pub const DEFAULT_HINT_INTERVAL_SECS: f64 = if cfg!(debug_assertions) { 1.0 } else { 90.0 };

/// Default polls per second for the cooldown poller.
pub const DEFAULT_REFRESH_RATE: f64 = 50.0;

/// Upper bound for the cooldown refresh rate.
pub const MAX_REFRESH_RATE: f64 = 100.0;

/// Cooldown gate configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CooldownConfig {
    /// Recharge time after each activation, in seconds.
    pub interval: f64,

    /// Readiness polls per second.
    pub refresh_rate: f64,
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_HINT_INTERVAL_SECS,
            refresh_rate: DEFAULT_REFRESH_RATE,
        }
    }
}

impl CooldownConfig {
    /// Create a validated cooldown configuration.
    pub fn new(interval: f64, refresh_rate: f64) -> Result<Self> {
        let config = Self {
            interval,
            refresh_rate,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that both values are in range and fit in a `Duration`.
    pub fn validate(&self) -> Result<()> {
        if Duration::try_from_secs_f64(self.interval).is_err() {
            return Err(ConfigError::InvalidInterval(self.interval));
        }
        let in_range = self.refresh_rate > 0.0 && self.refresh_rate <= MAX_REFRESH_RATE;
        if !in_range || Duration::try_from_secs_f64(1.0 / self.refresh_rate).is_err() {
            return Err(ConfigError::InvalidRefreshRate {
                rate: self.refresh_rate,
                max: MAX_REFRESH_RATE,
            });
        }
        Ok(())
    }

    /// Recharge interval as a `Duration`.
    ///
    /// Saturates for values `validate` would reject.
    #[must_use]
    pub fn interval_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.interval).unwrap_or(Duration::MAX)
    }

    /// Time between two readiness polls.
    ///
    /// Saturates for values `validate` would reject.
    #[must_use]
    pub fn poll_period(&self) -> Duration {
        Duration::try_from_secs_f64(1.0 / self.refresh_rate).unwrap_or(Duration::MAX)
    }
}

/// Complete session configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// RNG seed. `None` seeds from entropy on every new session.
    pub seed: Option<u64>,

    /// Cards moved from deck to field per draw step.
    pub draw_batch: usize,

    /// Field size the draw policy tops up to.
    pub min_field: usize,

    /// Unforced draws are refused once the field holds this many cards.
    pub max_field_for_draw: usize,

    /// Hint cooldown.
    pub cooldown: CooldownConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: None,
            draw_batch: 3,
            min_field: 12,
            max_field_for_draw: 15,
            cooldown: CooldownConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the hint cooldown.
    #[must_use]
    pub fn with_cooldown(mut self, cooldown: CooldownConfig) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Set the hint recharge interval in seconds.
    #[must_use]
    pub fn with_hint_interval(mut self, secs: f64) -> Self {
        self.cooldown.interval = secs;
        self
    }

    /// Set the field sizes used by the draw policy.
    #[must_use]
    pub fn with_field_limits(mut self, min_field: usize, max_field_for_draw: usize) -> Self {
        self.min_field = min_field;
        self.max_field_for_draw = max_field_for_draw;
        self
    }

    /// Check every value.
    pub fn validate(&self) -> Result<()> {
        if self.draw_batch == 0 {
            return Err(ConfigError::EmptyDrawBatch);
        }
        if self.min_field > self.max_field_for_draw {
            return Err(ConfigError::InvalidFieldLimits {
                min_field: self.min_field,
                max_field_for_draw: self.max_field_for_draw,
            });
        }
        self.cooldown.validate()
    }
}
