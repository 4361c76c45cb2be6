//! Maps stdin characters to player key presses using the classic
//! per-player key grids.

use log::warn;
use set_core::{GameConfig, Slot};
use set_engine::PlayerHandle;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Row-major key grids, one per human seat.
const KEY_GRIDS: [&str; 2] = ["qwerasdfzxcv", "uiopjkl;m,./"];

/// Spawn the stdin reader task. Each typed character is resolved to a
/// (seat, slot) press; `key_pressed` never blocks, so the reader keeps up
/// with typing no matter what the players are doing.
pub fn spawn_stdin_reader(config: &GameConfig, players: &[PlayerHandle]) {
    let table_size = config.table_size();
    let humans: Vec<PlayerHandle> = players
        .iter()
        .filter(|player| player.is_human())
        .cloned()
        .collect();

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            for ch in line.chars() {
                match key_to_press(ch, table_size) {
                    Some((seat, slot)) => {
                        if let Some(player) = humans.get(seat) {
                            player.key_pressed(slot);
                        }
                    }
                    None => warn!("unmapped key {ch:?}"),
                }
            }
        }
    });
}

/// Resolve a typed character to a human seat index and a slot.
fn key_to_press(ch: char, table_size: usize) -> Option<(usize, Slot)> {
    for (seat, grid) in KEY_GRIDS.iter().enumerate() {
        if let Some(index) = grid.find(ch) {
            if index < table_size {
                return Some((seat, Slot::new(index)));
            }
        }
    }
    None
}
