//! Game session state machine.
//!
//! ## Key Types
//!
//! - `Session`: owns deck, field, grave, selection, hint cooldown
//! - `SessionEvent`/`EventBus`: change notifications for UI layers
//! - `SessionSnapshot`: serializable, cheap copy of observable state
//! - `AutoPlayer`: plays a session to the end using hints
//!
//! ## Intents
//!
//! `new_session`, `draw`, `select`, `hint`. All of them run to completion
//! synchronously and report failure with `false`, never by panicking.

pub mod autoplay;
pub mod events;
pub mod snapshot;
pub mod state;

pub use autoplay::{AutoPlayReport, AutoPlayer};
pub use events::{EventBus, ListenerId, SessionEvent};
pub use snapshot::SessionSnapshot;
pub use state::{Session, SessionPhase};
