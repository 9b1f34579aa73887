//! Point-in-time view of a session for UI layers.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::state::SessionPhase;
use crate::cards::{Card, DeckScope};
use crate::rules::MatchTriple;

/// Observable session state.
///
/// The grave is a persistent vector, so taking a snapshot does not copy
/// match history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub scope: DeckScope,
    /// Cards left in the deck.
    pub deck_len: usize,
    pub field: Vec<Card>,
    pub grave: Vector<MatchTriple>,
    pub selected: SmallVec<[Card; 3]>,
    pub hints_used: u32,
    pub phase: SessionPhase,
    /// Last published cooldown readiness.
    pub hint_ready: bool,
    /// Seconds until the next hint; negative once recharged.
    pub hint_time_left: f64,
}

impl SessionSnapshot {
    /// Number of completed matches.
    #[must_use]
    pub fn matches(&self) -> usize {
        self.grave.len()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Finished
    }
}
