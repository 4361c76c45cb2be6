//! Dealer arbiter: round lifecycle, the reshuffle countdown, candidate
//! verification, card replenishment and termination.

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{error, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use set_core::{Card, Deck, GameConfig, GameUi, PlayerId, SetOracle, Slot};
use tokio::sync::{mpsc, oneshot};
use tokio::time;

use crate::player::{Player, Seat};
use crate::signal::Terminate;
use crate::table::Table;

/// A candidate-set check submitted by a player worker.
///
/// Submission never blocks the player on the dealer; the player blocks on
/// its own `reply` channel until the verdict arrives.
pub struct SetRequest {
    pub player: PlayerId,
    pub reply: oneshot::Sender<Verdict>,
}

/// Outcome of one candidate verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Legal set: the cards were claimed and the score incremented.
    Point,
    /// Illegal set: penalty freeze.
    Penalty,
    /// The candidate's tokens were reaped while the request was in
    /// flight; no point, no penalty, no freeze.
    Invalidated,
}

/// The single arbiter of the game. Owns the deck and the request intake;
/// spawns and joins every player worker.
pub struct Dealer {
    config: Arc<GameConfig>,
    table: Arc<Table>,
    seats: Vec<Arc<Seat>>,
    players: Vec<Player>,
    deck: Deck,
    requests: mpsc::Receiver<SetRequest>,
    terminate: Arc<Terminate>,
    ui: Arc<dyn GameUi>,
    oracle: Arc<dyn SetOracle>,
    rng: StdRng,
    reshuffle_at: Instant,
}

impl Dealer {
    /// Idle tick of the request wait, and the finer tick inside the
    /// warning window so the countdown animates smoothly.
    const TICK: Duration = Duration::from_secs(1);
    const WARNING_TICK: Duration = Duration::from_millis(100);
    /// Display grace on top of the turn timeout so the countdown visibly
    /// reaches zero.
    const COUNTDOWN_GRACE: Duration = Duration::from_secs(1);

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        config: Arc<GameConfig>,
        table: Arc<Table>,
        seats: Vec<Arc<Seat>>,
        players: Vec<Player>,
        deck: Deck,
        requests: mpsc::Receiver<SetRequest>,
        terminate: Arc<Terminate>,
        ui: Arc<dyn GameUi>,
        oracle: Arc<dyn SetOracle>,
        rng: StdRng,
    ) -> Self {
        Self {
            config,
            table,
            seats,
            players,
            deck,
            requests,
            terminate,
            ui,
            oracle,
            rng,
            reshuffle_at: Instant::now(),
        }
    }

    /// Run the game to completion and return the winners.
    pub async fn run(mut self) -> Vec<PlayerId> {
        info!("dealer task starting");

        let mut workers = Vec::with_capacity(self.players.len());
        for player in std::mem::take(&mut self.players) {
            workers.push(tokio::spawn(player.run()));
        }

        while !self.should_finish() {
            self.deck.shuffle(&mut self.rng);
            self.place_cards_on_table().await;
            self.timer_loop().await;
            self.remove_all_cards_from_table().await;
        }

        // Stop the players (and through them the key generators). Closing
        // the request intake and dropping any buffered request releases
        // workers still blocked on a verdict.
        self.terminate.signal();
        self.requests.close();
        while self.requests.try_recv().is_ok() {}
        for worker in workers {
            if let Err(err) = worker.await {
                error!("player task failed: {err}");
            }
        }

        let winners = self.winners();
        self.ui.announce_winner(&winners);
        info!("dealer task terminated, winners: {winners:?}");
        winners
    }

    /// The game ends when terminate is raised or no legal set remains
    /// anywhere in the deck and on the table.
    fn should_finish(&self) -> bool {
        if self.terminate.is_set() {
            return true;
        }
        let mut cards: Vec<Card> = self.deck.cards();
        cards.extend(self.table.cards_on_table());
        self.oracle.find_sets(&cards, 1).is_empty()
    }

    /// One timed play period. Candidate requests are served while the
    /// countdown runs; an acceptance grants a fresh turn.
    async fn timer_loop(&mut self) {
        self.reset_countdown();
        while !self.terminate.is_set() {
            let now = Instant::now();
            if now >= self.reshuffle_at {
                break;
            }
            let remaining = self.reshuffle_at - now;
            let warning = remaining <= self.config.turn_timeout_warning();
            let tick = if warning { Self::WARNING_TICK } else { Self::TICK }.min(remaining);

            match time::timeout(tick, self.requests.recv()).await {
                Ok(Some(request)) => {
                    self.update_countdown();
                    self.handle_request(request).await;
                    // Serve the rest of the queue in submission order
                    // before ticking on.
                    while let Ok(request) = self.requests.try_recv() {
                        if self.terminate.is_set() {
                            break;
                        }
                        self.handle_request(request).await;
                    }
                }
                // Every sender gone; nothing left to arbitrate.
                Ok(None) => break,
                // Tick elapsed.
                Err(_) => self.update_countdown(),
            }

            self.place_cards_on_table().await;
        }
    }

    /// Verify one candidate and deliver the verdict.
    async fn handle_request(&mut self, request: SetRequest) {
        let SetRequest { player, reply } = request;

        let token_slots = self.table.tokens_of(player);
        if token_slots.len() != self.config.feature_size {
            // A prior acceptance reaped one of these slots while the
            // request was in flight.
            let _ = reply.send(Verdict::Invalidated);
            return;
        }
        let cards: Option<Vec<Card>> = token_slots
            .iter()
            .map(|slot| self.table.card_at(*slot))
            .collect();
        let Some(cards) = cards else {
            let _ = reply.send(Verdict::Invalidated);
            return;
        };

        if self.oracle.test_set(&cards) {
            // Tokens first, then the card, so players holding tokens on a
            // reaped slot never see a token on an empty slot.
            for slot in &token_slots {
                self.table.remove_tokens_from_slot(*slot);
                self.table.remove_card(*slot).await;
            }
            self.seats[player.index()]
                .award_point(self.ui.as_ref(), self.config.point_freeze());
            let _ = reply.send(Verdict::Point);
            self.reset_countdown();
        } else {
            self.seats[player.index()].penalize(self.config.penalty_freeze());
            let _ = reply.send(Verdict::Penalty);
        }
    }

    /// Fill the empty slots, in random order, from the head of the deck.
    async fn place_cards_on_table(&mut self) {
        let mut spots = self.table.empty_slots();
        if spots.is_empty() || self.deck.is_empty() {
            return;
        }
        spots.shuffle(&mut self.rng);

        let mut placed = false;
        for slot in spots {
            let Some(card) = self.deck.draw() else {
                break;
            };
            self.table.place_card(card, slot).await;
            placed = true;
        }
        if placed && self.config.hints {
            self.table.hints();
        }
    }

    /// Return every card on the table to the deck, clearing the tokens on
    /// each slot first.
    async fn remove_all_cards_from_table(&mut self) {
        for index in 0..self.config.table_size() {
            let slot = Slot::new(index);
            if let Some(card) = self.table.card_at(slot) {
                self.table.remove_tokens_from_slot(slot);
                self.table.remove_card(slot).await;
                self.deck.push(card);
            }
        }
    }

    fn reset_countdown(&mut self) {
        self.reshuffle_at =
            Instant::now() + self.config.turn_timeout() + Self::COUNTDOWN_GRACE;
        self.ui.set_countdown(self.config.turn_timeout_millis, false);
    }

    fn update_countdown(&self) {
        let remaining = self.reshuffle_at.saturating_duration_since(Instant::now());
        let warning = remaining <= self.config.turn_timeout_warning();
        self.ui.set_countdown(remaining.as_millis() as u64, warning);
    }

    /// Every seat tied at the top score.
    fn winners(&self) -> Vec<PlayerId> {
        let top = self.seats.iter().map(|seat| seat.score()).max().unwrap_or(0);
        self.seats
            .iter()
            .filter(|seat| seat.score() == top)
            .map(|seat| seat.id())
            .collect()
    }
}
