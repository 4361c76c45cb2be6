//! The UI sink consumed by the engine.

use crate::cards::{Card, PlayerId, Slot};

/// Receiver of every user-visible game event.
///
/// Calls may arrive concurrently from the dealer and any player worker, so
/// implementations must be internally thread safe; ordering is only
/// guaranteed within a single emitting worker.
pub trait GameUi: Send + Sync {
    /// A card appeared in a slot.
    fn place_card(&self, card: Card, slot: Slot);
    /// The card in `slot` was removed.
    fn remove_card(&self, slot: Slot);
    /// A player placed a token.
    fn place_token(&self, player: PlayerId, slot: Slot);
    /// A player's token was removed.
    fn remove_token(&self, player: PlayerId, slot: Slot);
    /// A player's score changed.
    fn set_score(&self, player: PlayerId, score: u32);
    /// Freeze countdown tick; `0` means the freeze ended.
    fn set_freeze(&self, player: PlayerId, millis_remaining: u64);
    /// Reshuffle countdown tick.
    fn set_countdown(&self, millis_remaining: u64, warning: bool);
    /// Game over; every player tied at the top score.
    fn announce_winner(&self, players: &[PlayerId]);
}

/// A sink that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullUi;

impl GameUi for NullUi {
    fn place_card(&self, _card: Card, _slot: Slot) {}
    fn remove_card(&self, _slot: Slot) {}
    fn place_token(&self, _player: PlayerId, _slot: Slot) {}
    fn remove_token(&self, _player: PlayerId, _slot: Slot) {}
    fn set_score(&self, _player: PlayerId, _score: u32) {}
    fn set_freeze(&self, _player: PlayerId, _millis_remaining: u64) {}
    fn set_countdown(&self, _millis_remaining: u64, _warning: bool) {}
    fn announce_winner(&self, _players: &[PlayerId]) {}
}
