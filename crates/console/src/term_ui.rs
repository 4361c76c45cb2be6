//! Line-oriented UI sink for the console.

use log::{debug, info};
use set_core::{Card, GameConfig, GameUi, PlayerId, Slot};

/// Renders game events as log lines. Stateless, so it is trivially thread
/// safe; high-frequency ticks (countdown, freeze) go to debug level to
/// keep the console readable.
pub struct TermUi {
    columns: usize,
}

impl TermUi {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            columns: config.columns,
        }
    }

    fn grid_pos(&self, slot: Slot) -> (usize, usize) {
        (slot.index() / self.columns, slot.index() % self.columns)
    }
}

impl GameUi for TermUi {
    fn place_card(&self, card: Card, slot: Slot) {
        let (row, col) = self.grid_pos(slot);
        info!("card {card} placed at row {row} col {col}");
    }

    fn remove_card(&self, slot: Slot) {
        let (row, col) = self.grid_pos(slot);
        info!("card removed from row {row} col {col}");
    }

    fn place_token(&self, player: PlayerId, slot: Slot) {
        info!("player {player} token on slot {slot}");
    }

    fn remove_token(&self, player: PlayerId, slot: Slot) {
        info!("player {player} token off slot {slot}");
    }

    fn set_score(&self, player: PlayerId, score: u32) {
        info!("player {player} score {score}");
    }

    fn set_freeze(&self, player: PlayerId, millis_remaining: u64) {
        if millis_remaining == 0 {
            debug!("player {player} unfrozen");
        } else {
            info!("player {player} frozen for {}s", millis_remaining.div_ceil(1000));
        }
    }

    fn set_countdown(&self, millis_remaining: u64, warning: bool) {
        if warning {
            info!("reshuffle in {}ms", millis_remaining);
        } else {
            debug!("reshuffle in {}s", millis_remaining / 1000);
        }
    }

    fn announce_winner(&self, players: &[PlayerId]) {
        let ids: Vec<String> = players.iter().map(ToString::to_string).collect();
        info!("winner(s): {}", ids.join(", "));
    }
}
