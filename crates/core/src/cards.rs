//! Card, slot and player identifiers, plus the dealer's deck.

use std::collections::VecDeque;
use std::fmt;

use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// A card id in `[0, deck_size)`.
///
/// Opaque to the engine; only the oracle interprets features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Card(u32);

impl Card {
    /// Create a card from its id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// unique id of this card.
    #[must_use]
    pub const fn id(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fixed grid position on the table, in `[0, table_size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Slot(usize);

impl Slot {
    /// Create a slot from its grid index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Grid index of this slot.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A seat id, `0` up to the configured player count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(usize);

impl PlayerId {
    /// Create a player id from its seat index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Seat index of this player.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The ordered cards not currently on the table. Owned exclusively by the
/// dealer: cards leave from the front on placement and return to the back
/// on reshuffle.
#[derive(Debug)]
pub struct Deck {
    cards: VecDeque<Card>,
}

impl Deck {
    /// A full deck holding the ids `[0, deck_size)` in order.
    #[must_use]
    pub fn new(deck_size: u32) -> Self {
        Self {
            cards: (0..deck_size).map(Card::new).collect(),
        }
    }

    /// Shuffle the deck in place.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.cards.make_contiguous().shuffle(rng);
    }

    /// Take the next card from the head of the deck.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop_front()
    }

    /// Return a card to the back of the deck.
    pub fn push(&mut self, card: Card) {
        self.cards.push_back(card);
    }

    /// Number of cards left in the deck.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// true when no cards are left.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Snapshot of the remaining cards, head first.
    #[must_use]
    pub fn cards(&self) -> Vec<Card> {
        self.cards.iter().copied().collect()
    }
}
