//! Automated player for demos and soak tests.
//!
//! Plays the way a patient human with hints would: wait for the hint
//! cooldown, take the hint, then pick the card that completes it.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::state::Session;
use crate::rules::derive_complement;

/// Outcome of an automated run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoPlayReport {
    /// Matches made during the run.
    pub matches: usize,
    /// Hints requested during the run.
    pub hints: u32,
    /// Cards left on the field at the end.
    pub cards_left: usize,
    /// Whether the session reached its terminal state.
    pub finished: bool,
}

/// Drives a session to completion using hints.
#[derive(Clone, Copy, Debug, Default)]
pub struct AutoPlayer {
    max_hints: Option<u32>,
}

impl AutoPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop after this many hints even if the game is not over.
    #[must_use]
    pub fn with_max_hints(mut self, max: u32) -> Self {
        self.max_hints = Some(max);
        self
    }

    /// Play until the session finishes or the hint budget runs out.
    ///
    /// Waits on the session's cooldown between hints, so with a long
    /// interval this takes real time. Dropping the future stops play.
    pub async fn play(&self, session: &mut Session) -> AutoPlayReport {
        let cooldown = session.cooldown().clone();
        let start_matches = session.grave().len();
        let start_hints = session.hints_used();

        if session.field().is_empty() {
            session.draw();
        }

        while !session.is_finished() {
            let hints = session.hints_used() - start_hints;
            if self.max_hints.is_some_and(|max| hints >= max) {
                debug!(hints, "hint budget exhausted");
                break;
            }

            cooldown.wait_until_ready().await;
            if !session.hint() {
                continue;
            }

            if !Self::complete_hint(session) {
                break;
            }
            if session.field().len() < session.config().min_field {
                session.draw();
            }
        }

        let report = AutoPlayReport {
            matches: session.grave().len() - start_matches,
            hints: session.hints_used() - start_hints,
            cards_left: session.field().len(),
            finished: session.is_finished(),
        };
        info!(?report, "autoplay stopped");
        report
    }

    /// Select the card completing the two hinted cards.
    fn complete_hint(session: &mut Session) -> bool {
        let &[a, b] = session.selected_cards() else {
            return false;
        };
        let Some(complement) = derive_complement(&a, &b) else {
            return false;
        };
        let Some(third) = session
            .field()
            .iter()
            .find(|c| **c == complement && !c.is_same(&a) && !c.is_same(&b))
            .copied()
        else {
            return false;
        };

        session.select(&third)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::DECK_SIZE;
    use crate::core::SessionConfig;

    fn instant_hints(seed: u64) -> Session {
        Session::new(SessionConfig::new().with_seed(seed).with_hint_interval(0.0)).unwrap()
    }

    #[tokio::test]
    async fn test_plays_to_completion() {
        let mut session = instant_hints(1);
        let report = AutoPlayer::new().play(&mut session).await;

        assert!(report.finished);
        assert!(session.is_finished());
        assert!(session.deck().is_empty());
        assert_eq!(report.matches, session.grave().len());
        // A final hint may find the deck exhausted without a match.
        assert!(report.hints as usize >= report.matches);
        assert!(report.hints as usize <= report.matches + 1);
        assert_eq!(report.matches * 3 + report.cards_left, DECK_SIZE);
    }

    #[tokio::test]
    async fn test_hint_budget() {
        let mut session = instant_hints(2);
        let report = AutoPlayer::new().with_max_hints(4).play(&mut session).await;

        assert_eq!(report.hints, 4);
        assert_eq!(report.matches, 4);
        assert!(!report.finished);
    }
}
