//! Game assembly: wires the table, seats, player workers and the dealer
//! together and exposes the front-end handles.

use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use set_core::{Deck, GameConfig, GameUi, PlayerId, SetOracle, Slot};
use tokio::sync::mpsc;

use crate::dealer::Dealer;
use crate::keys::KeyQueue;
use crate::player::{Player, Seat};
use crate::signal::Terminate;
use crate::table::Table;

/// Input-source handle for one seat.
///
/// [`key_pressed`](Self::key_pressed) never blocks and may be called from
/// any thread, which is the whole contract a keyboard source needs.
#[derive(Clone)]
pub struct PlayerHandle {
    seat: Arc<Seat>,
    keys: Arc<KeyQueue>,
}

impl PlayerHandle {
    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.seat.id()
    }

    #[must_use]
    pub fn is_human(&self) -> bool {
        self.seat.is_human()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.seat.score()
    }

    /// Record a key press for this seat.
    pub fn key_pressed(&self, slot: Slot) {
        self.keys.press(slot);
    }
}

/// Cross-cutting stop control for a running game.
#[derive(Clone)]
pub struct GameController {
    terminate: Arc<Terminate>,
}

impl GameController {
    /// Ask every worker to stop; the dealer then joins them and announces
    /// the winners.
    pub fn terminate(&self) {
        self.terminate.signal();
    }
}

/// A fully wired game, ready to run.
pub struct Game {
    dealer: Dealer,
    handles: Vec<PlayerHandle>,
    controller: GameController,
}

impl Game {
    /// Build a game with an entropy-seeded shuffle RNG.
    pub fn new(config: GameConfig, ui: Arc<dyn GameUi>, oracle: Arc<dyn SetOracle>) -> Self {
        Self::with_rng(config, ui, oracle, StdRng::from_rng(&mut rand::rng()))
    }

    /// Build a game with a caller-provided shuffle RNG, for reproducible
    /// deals.
    pub fn with_rng(
        config: GameConfig,
        ui: Arc<dyn GameUi>,
        oracle: Arc<dyn SetOracle>,
        rng: StdRng,
    ) -> Self {
        let config = Arc::new(config);
        let epoch = Instant::now();
        let table = Arc::new(Table::new(&config, ui.clone(), oracle.clone()));
        let terminate = Arc::new(Terminate::new());
        let deck = Deck::new(config.deck_size);

        // At most one request per player can be outstanding.
        let (requests_tx, requests_rx) = mpsc::channel(config.players.max(1));

        let mut seats = Vec::with_capacity(config.players);
        let mut handles = Vec::with_capacity(config.players);
        let mut players = Vec::with_capacity(config.players);
        for index in 0..config.players {
            let seat = Arc::new(Seat::new(
                PlayerId::new(index),
                index < config.human_players,
                epoch,
            ));
            let keys = Arc::new(KeyQueue::new(config.feature_size));
            handles.push(PlayerHandle {
                seat: seat.clone(),
                keys: keys.clone(),
            });
            players.push(Player::new(
                seat.clone(),
                table.clone(),
                ui.clone(),
                keys,
                requests_tx.clone(),
                terminate.clone(),
                &config,
            ));
            seats.push(seat);
        }
        // The players hold the only senders; the intake closes when they
        // are gone.
        drop(requests_tx);

        let dealer = Dealer::new(
            config,
            table,
            seats,
            players,
            deck,
            requests_rx,
            terminate.clone(),
            ui,
            oracle,
            rng,
        );

        Self {
            dealer,
            handles,
            controller: GameController { terminate },
        }
    }

    /// The per-seat input handles, indexed by player id.
    #[must_use]
    pub fn players(&self) -> &[PlayerHandle] {
        &self.handles
    }

    #[must_use]
    pub fn controller(&self) -> GameController {
        self.controller.clone()
    }

    /// Drive the dealer to completion and return the winners.
    pub async fn run(self) -> Vec<PlayerId> {
        self.dealer.run().await
    }
}
