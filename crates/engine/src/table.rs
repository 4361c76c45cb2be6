//! Shared table state: the card grid and the token multimaps.
//!
//! The two halves live under independent locks so card replenishment and
//! token play do not serialize against each other. Lock order discipline:
//! the cards lock is never acquired while the tokens lock is held, and no
//! operation nests the two.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use set_core::{Card, GameConfig, GameUi, PlayerId, SetOracle, Slot};
use tokio::time;

/// Card placement maps, kept mutually bijective on the defined domain.
#[derive(Debug)]
struct CardGrid {
    slot_to_card: Vec<Option<Card>>,
    card_to_slot: Vec<Option<Slot>>,
}

/// Token multimaps, kept mirrored: `slot` appears in a player's list iff
/// the player appears in the slot's list. Per-player lists are insertion
/// ordered so the oldest token can be evicted first.
#[derive(Debug)]
struct TokenBoard {
    player_tokens: Vec<Vec<Slot>>,
    slot_tokens: Vec<Vec<PlayerId>>,
}

/// The table shared by the dealer and every player worker.
pub struct Table {
    cards: Mutex<CardGrid>,
    tokens: Mutex<TokenBoard>,
    ui: Arc<dyn GameUi>,
    oracle: Arc<dyn SetOracle>,
    delay: Duration,
}

impl Table {
    pub fn new(config: &GameConfig, ui: Arc<dyn GameUi>, oracle: Arc<dyn SetOracle>) -> Self {
        let table_size = config.table_size();
        Self {
            cards: Mutex::new(CardGrid {
                slot_to_card: vec![None; table_size],
                card_to_slot: vec![None; config.deck_size as usize],
            }),
            tokens: Mutex::new(TokenBoard {
                player_tokens: vec![Vec::new(); config.players],
                slot_tokens: vec![Vec::new(); table_size],
            }),
            ui,
            oracle,
            delay: config.table_delay(),
        }
    }

    /// Place a card in a slot.
    ///
    /// The simulated placement latency elapses before the lock is taken so
    /// concurrent token work is not serialized behind it.
    pub async fn place_card(&self, card: Card, slot: Slot) {
        time::sleep(self.delay).await;
        {
            let mut grid = self.cards.lock().unwrap();
            grid.card_to_slot[card.id() as usize] = Some(slot);
            grid.slot_to_card[slot.index()] = Some(card);
        }
        self.ui.place_card(card, slot);
    }

    /// Remove the card in `slot`; silently a no-op when the slot is empty.
    ///
    /// Clearing the tokens on the slot is the caller's job; calling
    /// [`remove_tokens_from_slot`](Self::remove_tokens_from_slot) first
    /// keeps the no-tokens-on-empty-slots invariant.
    pub async fn remove_card(&self, slot: Slot) {
        time::sleep(self.delay).await;
        {
            let mut grid = self.cards.lock().unwrap();
            let Some(card) = grid.slot_to_card[slot.index()] else {
                return;
            };
            grid.card_to_slot[card.id() as usize] = None;
            grid.slot_to_card[slot.index()] = None;
        }
        self.ui.remove_card(slot);
    }

    /// Place a token for `player` on `slot`. Returns false when the slot
    /// holds no card; tokens never sit on empty slots.
    pub fn place_token(&self, player: PlayerId, slot: Slot) -> bool {
        if self.card_at(slot).is_none() {
            return false;
        }
        {
            let mut board = self.tokens.lock().unwrap();
            board.player_tokens[player.index()].push(slot);
            board.slot_tokens[slot.index()].push(player);
        }
        self.ui.place_token(player, slot);
        true
    }

    /// Remove `player`'s token from `slot`. Returns false when no such
    /// token exists.
    pub fn remove_token(&self, player: PlayerId, slot: Slot) -> bool {
        {
            let mut board = self.tokens.lock().unwrap();
            let Some(at) = board.player_tokens[player.index()]
                .iter()
                .position(|s| *s == slot)
            else {
                return false;
            };
            board.player_tokens[player.index()].remove(at);
            if let Some(at) = board.slot_tokens[slot.index()]
                .iter()
                .position(|p| *p == player)
            {
                board.slot_tokens[slot.index()].remove(at);
            }
        }
        self.ui.remove_token(player, slot);
        true
    }

    /// Clear every token on `slot`, mirroring the per-player lists.
    pub fn remove_tokens_from_slot(&self, slot: Slot) {
        let holders = {
            let mut board = self.tokens.lock().unwrap();
            let holders = std::mem::take(&mut board.slot_tokens[slot.index()]);
            for player in &holders {
                let tokens = &mut board.player_tokens[player.index()];
                if let Some(at) = tokens.iter().position(|s| *s == slot) {
                    tokens.remove(at);
                }
            }
            holders
        };
        for player in holders {
            self.ui.remove_token(player, slot);
        }
    }

    /// Slots with no card, in grid order.
    pub fn empty_slots(&self) -> Vec<Slot> {
        let grid = self.cards.lock().unwrap();
        grid.slot_to_card
            .iter()
            .enumerate()
            .filter(|(_, card)| card.is_none())
            .map(|(index, _)| Slot::new(index))
            .collect()
    }

    /// The card in `slot`, if any.
    pub fn card_at(&self, slot: Slot) -> Option<Card> {
        self.cards.lock().unwrap().slot_to_card[slot.index()]
    }

    /// Snapshot of every card currently on the table.
    pub fn cards_on_table(&self) -> Vec<Card> {
        let grid = self.cards.lock().unwrap();
        grid.slot_to_card.iter().flatten().copied().collect()
    }

    /// Number of cards currently on the table.
    pub fn count_cards(&self) -> usize {
        let grid = self.cards.lock().unwrap();
        grid.slot_to_card.iter().flatten().count()
    }

    /// Number of tokens `player` has down.
    pub fn num_tokens(&self, player: PlayerId) -> usize {
        self.tokens.lock().unwrap().player_tokens[player.index()].len()
    }

    /// Snapshot of `player`'s token slots, oldest first.
    pub fn tokens_of(&self, player: PlayerId) -> Vec<Slot> {
        self.tokens.lock().unwrap().player_tokens[player.index()].clone()
    }

    /// Print every legal set currently on the table to the operator
    /// console.
    pub fn hints(&self) {
        let on_table: Vec<(Card, Slot)> = {
            let grid = self.cards.lock().unwrap();
            grid.slot_to_card
                .iter()
                .enumerate()
                .filter_map(|(index, card)| card.map(|c| (c, Slot::new(index))))
                .collect()
        };
        let cards: Vec<Card> = on_table.iter().map(|(card, _)| *card).collect();

        for set in self.oracle.find_sets(&cards, usize::MAX) {
            let mut slots: Vec<usize> = set
                .iter()
                .filter_map(|card| {
                    on_table
                        .iter()
                        .find(|(c, _)| c == card)
                        .map(|(_, slot)| slot.index())
                })
                .collect();
            slots.sort_unstable();
            println!(
                "Hint: set found at slots {:?}, features {:?}",
                slots,
                self.oracle.cards_to_features(&set)
            );
        }
    }
}
