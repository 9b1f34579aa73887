//! Cooldown gate for rate-limited actions (hints).
//!
//! ## Key Types
//!
//! - `CooldownTimer`: readiness flag plus recharge deadline, shared via `Arc`
//! - `PollerHandle`: background task publishing readiness at a fixed rate
//! - `Clock`: injectable time source (`SystemClock`, `ManualClock`)
//!
//! Readiness is polled, never pushed: a timer whose deadline has passed
//! reports ready only after the next `refresh`.

pub mod clock;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use timer::{CooldownTimer, PollerHandle};
