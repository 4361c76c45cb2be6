//! Scripted oracles for deterministic verdicts.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use set_core::{Card, SetOracle};

/// Answers `test_set` from a fixed script, repeating the last entry once
/// the script runs dry. `find_sets` always reports one pseudo-set so the
/// game never ends on its own.
pub struct ScriptedOracle {
    script: Mutex<VecDeque<bool>>,
    fallback: bool,
    /// Verification latency; lets a test hold one candidate open while
    /// other players keep acting.
    delay: Duration,
}

impl ScriptedOracle {
    pub fn new(script: &[bool]) -> Self {
        Self::with_delay(script, Duration::ZERO)
    }

    pub fn with_delay(script: &[bool], delay: Duration) -> Self {
        Self {
            script: Mutex::new(script.iter().copied().collect()),
            fallback: script.last().copied().unwrap_or(false),
            delay,
        }
    }
}

impl SetOracle for ScriptedOracle {
    fn test_set(&self, _cards: &[Card]) -> bool {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.fallback)
    }

    fn find_sets(&self, cards: &[Card], max_count: usize) -> Vec<Vec<Card>> {
        if cards.len() < 3 || max_count == 0 {
            return Vec::new();
        }
        vec![cards[..3].to_vec()]
    }

    fn cards_to_features(&self, cards: &[Card]) -> Vec<Vec<u8>> {
        vec![Vec::new(); cards.len()]
    }
}

/// An oracle that never finds anything; the game ends before the first
/// round.
pub struct BarrenOracle;

impl SetOracle for BarrenOracle {
    fn test_set(&self, _cards: &[Card]) -> bool {
        false
    }

    fn find_sets(&self, _cards: &[Card], _max_count: usize) -> Vec<Vec<Card>> {
        Vec::new()
    }

    fn cards_to_features(&self, cards: &[Card]) -> Vec<Vec<u8>> {
        vec![Vec::new(); cards.len()]
    }
}
