//! Session change notifications.
//!
//! The session exposes plain state plus an event stream. Listeners are
//! called synchronously, in subscription order, after the mutation that
//! produced the event has completed.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, DeckScope};
use crate::rules::MatchTriple;

/// Listener registration handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListenerId(pub u32);

impl ListenerId {
    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Listener({})", self.0)
    }
}

/// Something that changed in a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A new game started with a fresh deck.
    Started { scope: DeckScope },

    /// Cards moved from deck to field.
    Drew {
        count: usize,
        field_len: usize,
        deck_len: usize,
    },

    /// A field card joined the selection.
    Selected { card: Card },

    /// A field card left the selection.
    Deselected { card: Card },

    /// Three selected cards formed a match and went to the grave.
    Matched { triple: MatchTriple },

    /// Three selected cards did not form a match.
    Mismatched { cards: [Card; 3] },

    /// A hint selected two cards of a match.
    Hinted { cards: [Card; 2] },

    /// A hint was refused because the cooldown is recharging.
    HintRejected { time_left: f64 },

    /// Deck is empty and the field holds no match.
    Finished { matches: usize, cards_left: usize },
}

type Listener = Box<dyn FnMut(&SessionEvent) + Send>;

/// Ordered list of event listeners.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u32,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener.
    pub fn subscribe(&mut self, listener: impl FnMut(&SessionEvent) + Send + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Deliver an event to every listener.
    pub fn emit(&mut self, event: &SessionEvent) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
