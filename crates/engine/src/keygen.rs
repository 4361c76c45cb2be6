//! Key generator driving a non-human player.

use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use set_core::Slot;
use tokio::time;

use crate::keys::KeyQueue;
use crate::signal::Terminate;

/// Emits uniformly random slot presses into its player's key queue,
/// keeping the queue topped up to capacity and backing off while it is
/// full.
///
/// The generator holds only the queue and the terminate signal, never the
/// player itself; the player joins the generator task on exit.
pub struct KeyGen {
    keys: Arc<KeyQueue>,
    terminate: Arc<Terminate>,
    table_size: usize,
    rng: SmallRng,
}

impl KeyGen {
    /// Self-delay between generated presses. Not needed for correctness,
    /// it just keeps the generator from dominating scheduling.
    const PRESS_DELAY_MS: Range<u64> = 200..600;

    pub fn new(keys: Arc<KeyQueue>, terminate: Arc<Terminate>, table_size: usize) -> Self {
        Self {
            keys,
            terminate,
            table_size,
            rng: SmallRng::from_os_rng(),
        }
    }

    pub async fn run(mut self) {
        debug!("key generator starting");
        while !self.terminate.is_set() {
            tokio::select! {
                _ = self.keys.ready() => {}
                _ = self.terminate.wait() => break,
            }

            let slot = Slot::new(self.rng.random_range(0..self.table_size));
            self.keys.press(slot);

            let pause = Duration::from_millis(self.rng.random_range(Self::PRESS_DELAY_MS));
            tokio::select! {
                _ = time::sleep(pause) => {}
                _ = self.terminate.wait() => break,
            }
        }
        debug!("key generator terminated");
    }
}
