//! Player worker: key consumption, token toggling, candidate submission
//! and verdict handling.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::info;
use set_core::{GameConfig, GameUi, PlayerId, Slot};
use tokio::sync::{mpsc, oneshot};
use tokio::time;

use crate::dealer::{SetRequest, Verdict};
use crate::keygen::KeyGen;
use crate::keys::KeyQueue;
use crate::signal::Terminate;
use crate::table::Table;

/// Per-player state shared between the player worker and the dealer.
///
/// The dealer is the only writer of the score and the freeze deadline;
/// the player worker reads them while enforcing a freeze, so both are
/// single-word atomics. The deadline is stored as millis since the game
/// epoch, `0` meaning unfrozen.
pub struct Seat {
    id: PlayerId,
    human: bool,
    score: AtomicU32,
    freeze_until: AtomicU64,
    epoch: Instant,
}

impl Seat {
    pub(crate) fn new(id: PlayerId, human: bool, epoch: Instant) -> Self {
        Self {
            id,
            human,
            score: AtomicU32::new(0),
            freeze_until: AtomicU64::new(0),
            epoch,
        }
    }

    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    #[must_use]
    pub fn is_human(&self) -> bool {
        self.human
    }

    /// Current score; monotonically non-decreasing.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score.load(Ordering::Acquire)
    }

    /// Dealer side of an acceptance: bump the score, publish it and start
    /// the point freeze.
    pub(crate) fn award_point(&self, ui: &dyn GameUi, freeze: Duration) {
        let score = self.score.fetch_add(1, Ordering::AcqRel) + 1;
        ui.set_score(self.id, score);
        self.set_freeze(freeze);
    }

    /// Dealer side of a rejection: start the penalty freeze.
    pub(crate) fn penalize(&self, freeze: Duration) {
        self.set_freeze(freeze);
    }

    fn set_freeze(&self, freeze: Duration) {
        let until = (self.epoch.elapsed() + freeze).as_millis() as u64;
        self.freeze_until.store(until, Ordering::Release);
    }

    /// Remaining freeze time as observed by the player worker.
    #[must_use]
    pub fn freeze_remaining(&self) -> Duration {
        let until = Duration::from_millis(self.freeze_until.load(Ordering::Acquire));
        until.saturating_sub(self.epoch.elapsed())
    }
}

/// One seat's worker. Consumes key presses, toggles tokens on the table,
/// submits full candidates to the dealer and honors the verdict freeze.
pub(crate) struct Player {
    seat: Arc<Seat>,
    table: Arc<Table>,
    ui: Arc<dyn GameUi>,
    keys: Arc<KeyQueue>,
    requests: mpsc::Sender<SetRequest>,
    terminate: Arc<Terminate>,
    feature_size: usize,
    table_size: usize,
}

impl Player {
    /// Freeze UI ticks are emitted about once per second.
    const FREEZE_TICK: Duration = Duration::from_secs(1);

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        seat: Arc<Seat>,
        table: Arc<Table>,
        ui: Arc<dyn GameUi>,
        keys: Arc<KeyQueue>,
        requests: mpsc::Sender<SetRequest>,
        terminate: Arc<Terminate>,
        config: &GameConfig,
    ) -> Self {
        Self {
            seat,
            table,
            ui,
            keys,
            requests,
            terminate,
            feature_size: config.feature_size,
            table_size: config.table_size(),
        }
    }

    pub(crate) async fn run(self) {
        let id = self.seat.id();
        info!("player {id} task starting");

        let keygen = (!self.seat.is_human()).then(|| {
            let generator = KeyGen::new(
                self.keys.clone(),
                self.terminate.clone(),
                self.table_size,
            );
            tokio::spawn(generator.run())
        });

        while !self.terminate.is_set() {
            let slot = tokio::select! {
                slot = self.keys.take() => slot,
                _ = self.terminate.wait() => break,
            };

            self.toggle_token(slot);

            if self.table.num_tokens(id) == self.feature_size {
                self.submit_candidate().await;
                // Presses accumulated during arbitration or the freeze are
                // stale; dropping them also wakes the key generator.
                self.keys.clear();
            }
        }

        if let Some(keygen) = keygen {
            let _ = keygen.await;
        }
        info!("player {id} task terminated");
    }

    /// Toggle this player's token on `slot`: remove it if present, place
    /// it otherwise. A press that would place a token while the player is
    /// already at the feature size evicts the oldest token first; placing
    /// on an empty slot is the one silent no-op.
    fn toggle_token(&self, slot: Slot) {
        let id = self.seat.id();
        if self.table.remove_token(id, slot) {
            return;
        }
        if self.table.num_tokens(id) == self.feature_size {
            if let Some(&oldest) = self.table.tokens_of(id).first() {
                self.table.remove_token(id, oldest);
            }
        }
        self.table.place_token(id, slot);
    }

    /// Hand the candidate to the dealer, block until the verdict arrives,
    /// then honor the freeze it implies.
    async fn submit_candidate(&self) {
        let (reply_tx, reply_rx) = oneshot::channel();
        let request = SetRequest {
            player: self.seat.id(),
            reply: reply_tx,
        };
        if self.requests.send(request).await.is_err() {
            // Dealer is gone; the terminate flag is observed at the loop
            // head.
            return;
        }

        let verdict = tokio::select! {
            verdict = reply_rx => match verdict {
                Ok(verdict) => verdict,
                Err(_) => return,
            },
            _ = self.terminate.wait() => return,
        };

        match verdict {
            Verdict::Point | Verdict::Penalty => self.freeze().await,
            Verdict::Invalidated => {}
        }
    }

    /// Sleep out the freeze in at most one second slices, ticking the UI
    /// once per slice; interruptible by terminate.
    async fn freeze(&self) {
        let id = self.seat.id();
        loop {
            if self.terminate.is_set() {
                break;
            }
            let remaining = self.seat.freeze_remaining();
            if remaining.is_zero() {
                break;
            }
            self.ui.set_freeze(id, remaining.as_millis() as u64);
            tokio::select! {
                _ = time::sleep(remaining.min(Self::FREEZE_TICK)) => {}
                _ = self.terminate.wait() => break,
            }
        }
        self.ui.set_freeze(id, 0);
    }
}
