//! Recording UI sink for end-to-end scenarios.

use std::sync::Mutex;
use std::time::Duration;

use set_core::{Card, GameUi, PlayerId, Slot};

/// Every event a game emits, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    PlaceCard { card: Card, slot: Slot },
    RemoveCard { slot: Slot },
    PlaceToken { player: PlayerId, slot: Slot },
    RemoveToken { player: PlayerId, slot: Slot },
    Score { player: PlayerId, score: u32 },
    Freeze { player: PlayerId, millis: u64 },
    Countdown { millis: u64, warning: bool },
    Winners { players: Vec<PlayerId> },
}

/// A `GameUi` that records everything for later assertions.
#[derive(Default)]
pub struct MockUi {
    events: Mutex<Vec<UiEvent>>,
}

impl MockUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<UiEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&UiEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| pred(*e)).count()
    }

    /// Poll the recorded events until the predicate holds over the whole
    /// log, panicking after `timeout`.
    pub async fn wait_until(
        &self,
        what: &str,
        timeout: Duration,
        pred: impl Fn(&[UiEvent]) -> bool,
    ) {
        let step = Duration::from_millis(20);
        let mut waited = Duration::ZERO;
        loop {
            if pred(&self.events.lock().unwrap()) {
                return;
            }
            assert!(waited < timeout, "timed out waiting for {what}");
            tokio::time::sleep(step).await;
            waited += step;
        }
    }

    fn push(&self, event: UiEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl GameUi for MockUi {
    fn place_card(&self, card: Card, slot: Slot) {
        self.push(UiEvent::PlaceCard { card, slot });
    }

    fn remove_card(&self, slot: Slot) {
        self.push(UiEvent::RemoveCard { slot });
    }

    fn place_token(&self, player: PlayerId, slot: Slot) {
        self.push(UiEvent::PlaceToken { player, slot });
    }

    fn remove_token(&self, player: PlayerId, slot: Slot) {
        self.push(UiEvent::RemoveToken { player, slot });
    }

    fn set_score(&self, player: PlayerId, score: u32) {
        self.push(UiEvent::Score { player, score });
    }

    fn set_freeze(&self, player: PlayerId, millis_remaining: u64) {
        self.push(UiEvent::Freeze {
            player,
            millis: millis_remaining,
        });
    }

    fn set_countdown(&self, millis_remaining: u64, warning: bool) {
        self.push(UiEvent::Countdown {
            millis: millis_remaining,
            warning,
        });
    }

    fn announce_winner(&self, players: &[PlayerId]) {
        self.push(UiEvent::Winners {
            players: players.to_vec(),
        });
    }
}
