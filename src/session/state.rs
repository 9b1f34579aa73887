//! The game session: deck, field, grave, selection, hints.
//!
//! ## Draw Policy
//!
//! `draw` moves one batch, then keeps drawing batches while the field is
//! below `min_field`, then keeps drawing while the field holds no match.
//! Each loop stops as soon as the deck runs dry, so it always ends.
//!
//! ## Failure Semantics
//!
//! No intent panics on player input. Illegal moves, stale cards and
//! rate-limited hints return `false` and leave the session untouched.

use std::sync::Arc;

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, info, trace};

use super::events::{EventBus, ListenerId, SessionEvent};
use super::snapshot::SessionSnapshot;
use crate::cards::{Card, Deck, DeckScope};
use crate::cooldown::{Clock, CooldownTimer, SystemClock};
use crate::core::error::Result;
use crate::core::{GameRng, SessionConfig};
use crate::rules::{flatten, MatchEngine, MatchTriple};

/// Coarse session state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Cards remain in the deck or a match remains on the field.
    Active,
    /// Deck empty and no match on the field. Terminal.
    Finished,
}

/// One game of the triad-matching puzzle.
///
/// ## Usage
///
/// ```
/// use set_engine::core::SessionConfig;
/// use set_engine::rules::MatchEngine;
/// use set_engine::session::Session;
///
/// let mut session = Session::new(SessionConfig::new().with_seed(7)).unwrap();
/// assert!(session.draw());
/// assert!(session.field().len() >= 12);
///
/// let triple = MatchEngine::first_match(session.field()).unwrap();
/// let [a, b, c] = *triple.cards();
/// assert!(!session.select(&a));
/// assert!(!session.select(&b));
/// assert!(session.select(&c));
/// assert_eq!(session.grave().len(), 1);
/// ```
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    rng: GameRng,
    scope: DeckScope,
    deck: Deck,
    field: Vec<Card>,
    grave: Vector<MatchTriple>,
    selection: SmallVec<[Card; 3]>,
    cooldown: CooldownTimer,
    hints_used: u32,
    finished: bool,
    events: EventBus,
}

impl Session {
    /// Start a session on the system clock.
    pub fn new(config: SessionConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock::new()))
    }

    /// Start a session whose hint cooldown runs on `clock`.
    pub fn with_clock(config: SessionConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        let cooldown = CooldownTimer::with_clock(config.cooldown, clock)?;
        let rng = config.seed.map_or_else(GameRng::from_entropy, GameRng::new);
        let scope = DeckScope::generate();

        let mut session = Self {
            config,
            rng,
            scope,
            deck: Deck::new(Some(scope)),
            field: Vec::new(),
            grave: Vector::new(),
            selection: SmallVec::new(),
            cooldown,
            hints_used: 0,
            finished: false,
            events: EventBus::new(),
        };
        session.start(scope);
        Ok(session)
    }

    /// Start a session from an explicit layout instead of a shuffled deck.
    ///
    /// `deck` is listed bottom to top. All cards are tagged with the new
    /// session's scope.
    ///
    /// # Panics
    ///
    /// Panics if any two cards (across deck and field) share features.
    pub fn from_layout(config: SessionConfig, deck: Vec<Card>, field: Vec<Card>) -> Result<Self> {
        let mut session = Self::new(config)?;
        let field_len = field.len();
        let cards = deck.into_iter().chain(field.into_iter().rev()).collect();

        session.deck = Deck::from_cards(Some(session.scope), cards);
        session.field = session.deck.draw_many(field_len);
        session.finished = false;
        session.check_finished();
        Ok(session)
    }

    /// Throw away the current game and deal a fresh, shuffled deck.
    ///
    /// The new deck always gets a fresh scope; only the shuffle follows
    /// the configured seed.
    pub fn new_session(&mut self) {
        let scope = DeckScope::generate();
        self.start(scope);
    }

    fn start(&mut self, scope: DeckScope) {
        self.scope = scope;
        self.deck = Deck::shuffled(Some(scope), &mut self.rng);
        self.field.clear();
        self.grave = Vector::new();
        self.selection.clear();
        self.hints_used = 0;
        self.finished = false;
        self.cooldown.reset();

        info!(%scope, seed = self.rng.seed(), "new session");
        self.events.emit(&SessionEvent::Started { scope });
    }

    // === Read-only projections ===

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Scope token of the current deck.
    #[must_use]
    pub fn scope(&self) -> DeckScope {
        self.scope
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Cards in play, in layout order.
    #[must_use]
    pub fn field(&self) -> &[Card] {
        &self.field
    }

    /// Completed matches, oldest first.
    #[must_use]
    pub fn grave(&self) -> &Vector<MatchTriple> {
        &self.grave
    }

    /// Every card in the grave, oldest match first.
    #[must_use]
    pub fn grave_cards(&self) -> Vec<Card> {
        flatten(&self.grave)
    }

    /// Currently selected cards, in selection order.
    #[must_use]
    pub fn selected_cards(&self) -> &[Card] {
        &self.selection
    }

    /// Field positions of the selected cards.
    #[must_use]
    pub fn selected_indices(&self) -> Vec<usize> {
        self.selection
            .iter()
            .filter_map(|s| self.field_position(s))
            .collect()
    }

    #[must_use]
    pub fn hints_used(&self) -> u32 {
        self.hints_used
    }

    /// The hint cooldown gate.
    #[must_use]
    pub fn cooldown(&self) -> &CooldownTimer {
        &self.cooldown
    }

    /// Deck empty and no match on the field.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.deck.is_empty() && !MatchEngine::has_match(&self.field)
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.is_finished() {
            SessionPhase::Finished
        } else {
            SessionPhase::Active
        }
    }

    /// First match on the field in scan order.
    #[must_use]
    pub fn first_match(&self) -> Option<MatchTriple> {
        MatchEngine::first_match(&self.field)
    }

    /// Every distinct match on the field.
    #[must_use]
    pub fn all_matches(&self) -> Vec<MatchTriple> {
        MatchEngine::all_matches(&self.field)
    }

    /// Field positions of the first match, sorted. Empty when none.
    ///
    /// Development aid only; not compiled into release builds.
    #[cfg(debug_assertions)]
    #[must_use]
    pub fn first_possible_indices(&self) -> Vec<usize> {
        let mut positions = MatchEngine::first_match_positions(&self.field)
            .map(|p| p.to_vec())
            .unwrap_or_default();
        positions.sort_unstable();
        positions
    }

    /// Capture the observable state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            scope: self.scope,
            deck_len: self.deck.len(),
            field: self.field.clone(),
            grave: self.grave.clone(),
            selected: self.selection.clone(),
            hints_used: self.hints_used,
            phase: self.phase(),
            hint_ready: self.cooldown.is_ready(),
            hint_time_left: self.cooldown.time_left(),
        }
    }

    // === Events ===

    /// Register a change listener.
    pub fn subscribe(&mut self, listener: impl FnMut(&SessionEvent) + Send + 'static) -> ListenerId {
        self.events.subscribe(listener)
    }

    /// Remove a change listener.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.events.unsubscribe(id)
    }

    // === Drawing ===

    /// Draw with the field-size guard enabled.
    pub fn draw(&mut self) -> bool {
        self.draw_with(false)
    }

    /// Draw one batch, top up to `min_field`, then draw until a match exists.
    ///
    /// Unless `force` is set, refuses (returns `false`) when the field
    /// already holds `max_field_for_draw` cards.
    pub fn draw_with(&mut self, force: bool) -> bool {
        if !force && self.field.len() >= self.config.max_field_for_draw {
            debug!(field = self.field.len(), "draw refused: field is full");
            return false;
        }

        let batch = self.config.draw_batch;
        if self.draw_cards(batch) == batch {
            self.draw_until_enough(self.config.min_field);
            self.draw_until_match_exists();
        }

        #[cfg(debug_assertions)]
        self.trace_first_match();
        self.check_finished();
        true
    }

    /// Move up to `count` cards from deck to field. Returns how many moved.
    pub fn draw_cards(&mut self, count: usize) -> usize {
        let drawn = self.deck.draw_many(count);
        let moved = drawn.len();
        if moved == 0 {
            return 0;
        }

        self.field.extend(drawn);
        debug!(
            moved,
            field = self.field.len(),
            deck = self.deck.len(),
            "drew cards"
        );
        self.events.emit(&SessionEvent::Drew {
            count: moved,
            field_len: self.field.len(),
            deck_len: self.deck.len(),
        });
        moved
    }

    /// Draw batches until the field holds at least `n` cards.
    ///
    /// Returns whether the field reached `n`.
    pub fn draw_until_enough(&mut self, n: usize) -> bool {
        let batch = self.config.draw_batch;
        while self.field.len() < n {
            if self.draw_cards(batch) != batch {
                return self.field.len() >= n;
            }
        }
        true
    }

    /// Draw batches until the field holds a match.
    ///
    /// Returns whether a match exists afterwards.
    pub fn draw_until_match_exists(&mut self) -> bool {
        let batch = self.config.draw_batch;
        while !MatchEngine::has_match(&self.field) {
            if self.draw_cards(batch) == 0 {
                return false;
            }
        }
        true
    }

    // === Selection ===

    /// Toggle a field card in the selection; on the third card, try to match.
    ///
    /// Returns `true` only when this call completed a match. Cards not on
    /// the field (by identity) are ignored.
    pub fn select(&mut self, card: &Card) -> bool {
        let Some(card) = self.field.iter().find(|c| c.is_same(card)).copied() else {
            trace!(%card, "select ignored: card not on field");
            return false;
        };

        if let Some(pos) = self.selection.iter().position(|s| s.is_same(&card)) {
            self.selection.remove(pos);
            self.events.emit(&SessionEvent::Deselected { card });
            return false;
        }

        self.selection.push(card);
        self.events.emit(&SessionEvent::Selected { card });
        if self.selection.len() < MatchTriple::SIZE {
            return false;
        }

        let candidates = [self.selection[0], self.selection[1], self.selection[2]];
        let matched = self.try_match(candidates);
        self.selection.clear();
        matched
    }

    /// Drop the current selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Move three field cards to the grave if they form a match.
    fn try_match(&mut self, candidates: [Card; 3]) -> bool {
        if !candidates.iter().all(|c| self.field_position(c).is_some()) {
            return false;
        }

        let [a, b, c] = candidates;
        let Some(triple) = MatchTriple::new(a, b, c) else {
            debug!(%a, %b, %c, "not a match");
            self.events.emit(&SessionEvent::Mismatched { cards: candidates });
            return false;
        };

        self.field.retain(|card| !triple.contains(card));
        self.grave.push_back(triple);
        debug!(%triple, field = self.field.len(), grave = self.grave.len(), "matched");
        self.events.emit(&SessionEvent::Matched { triple });

        #[cfg(debug_assertions)]
        self.trace_first_match();
        self.check_finished();
        true
    }

    // === Hints ===

    /// Select two cards of a match on the field, rate-limited by the cooldown.
    ///
    /// Polls the cooldown once, then fails without side effects if it is
    /// still recharging. Otherwise the cooldown restarts, the selection
    /// is cleared and the field is replenished until a match exists.
    /// Returns `false` when no match can be found (the game is over).
    pub fn hint(&mut self) -> bool {
        self.cooldown.refresh();
        if !self.cooldown.activate() {
            let time_left = self.cooldown.time_left();
            debug!(time_left, "hint rejected: cooling down");
            self.events.emit(&SessionEvent::HintRejected { time_left });
            return false;
        }

        self.hints_used += 1;
        self.selection.clear();
        self.draw_until_match_exists();

        let Some(triple) = self.first_match() else {
            self.check_finished();
            return false;
        };

        let [a, b, _] = *triple.cards();
        self.select(&a);
        self.select(&b);
        info!(hints_used = self.hints_used, %a, %b, "hint given");
        self.events.emit(&SessionEvent::Hinted { cards: [a, b] });
        true
    }

    // === Internals ===

    fn field_position(&self, card: &Card) -> Option<usize> {
        self.field.iter().position(|c| c.is_same(card))
    }

    fn check_finished(&mut self) {
        if self.finished || !self.is_finished() {
            return;
        }
        self.finished = true;

        let matches = self.grave.len();
        let cards_left = self.field.len();
        info!(matches, cards_left, hints_used = self.hints_used, "session finished");
        self.events.emit(&SessionEvent::Finished {
            matches,
            cards_left,
        });
    }

    #[cfg(debug_assertions)]
    fn trace_first_match(&self) {
        trace!(positions = ?self.first_possible_indices(), "possible match");
    }
}
