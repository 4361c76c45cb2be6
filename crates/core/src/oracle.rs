//! Set validity oracle.

use ahash::AHashSet;

use crate::cards::Card;
use crate::config::{ConfigError, GameConfig};

/// Decides set legality over card ids. Implementations are pure and side
/// effect free; the engine calls them from the dealer and from table
/// hints, possibly concurrently.
pub trait SetOracle: Send + Sync {
    /// true iff the candidate cards form a legal set.
    fn test_set(&self, cards: &[Card]) -> bool;

    /// Enumerate up to `max_count` legal sets among `cards`.
    fn find_sets(&self, cards: &[Card], max_count: usize) -> Vec<Vec<Card>>;

    /// Feature matrix of the cards, one row per card.
    fn cards_to_features(&self, cards: &[Card]) -> Vec<Vec<u8>>;
}

/// The classic rules: a card id written in base `feature_size` gives its
/// features (least significant digit first), and a candidate of
/// `feature_size` distinct cards is legal iff every feature is all-equal
/// or all-distinct across the candidate.
#[derive(Debug, Clone)]
pub struct ClassicOracle {
    feature_size: usize,
    feature_count: usize,
}

impl ClassicOracle {
    #[must_use]
    pub fn new(feature_size: usize, feature_count: usize) -> Self {
        Self {
            feature_size,
            feature_count,
        }
    }

    /// Build the oracle for a configuration, deriving the feature count
    /// from `deck_size = feature_size ^ k`.
    pub fn for_config(config: &GameConfig) -> Result<Self, ConfigError> {
        let base = config.feature_size as u32;
        if base < 2 {
            return Err(ConfigError::DeckNotFeaturePower {
                deck_size: config.deck_size,
                feature_size: config.feature_size,
            });
        }
        let mut rest = config.deck_size;
        let mut feature_count = 0;
        while rest > 1 && rest % base == 0 {
            rest /= base;
            feature_count += 1;
        }
        if rest != 1 || feature_count == 0 {
            return Err(ConfigError::DeckNotFeaturePower {
                deck_size: config.deck_size,
                feature_size: config.feature_size,
            });
        }
        Ok(Self::new(config.feature_size, feature_count))
    }

    /// The features of one card, least significant digit first.
    #[must_use]
    pub fn features_of(&self, card: Card) -> Vec<u8> {
        let base = self.feature_size as u32;
        let mut id = card.id();
        (0..self.feature_count)
            .map(|_| {
                let digit = (id % base) as u8;
                id /= base;
                digit
            })
            .collect()
    }
}

impl SetOracle for ClassicOracle {
    fn test_set(&self, cards: &[Card]) -> bool {
        if cards.len() != self.feature_size {
            return false;
        }
        let distinct: AHashSet<Card> = cards.iter().copied().collect();
        if distinct.len() != cards.len() {
            return false;
        }

        let features: Vec<Vec<u8>> = cards.iter().map(|c| self.features_of(*c)).collect();
        for feature in 0..self.feature_count {
            let values: AHashSet<u8> = features.iter().map(|row| row[feature]).collect();
            if values.len() != 1 && values.len() != self.feature_size {
                return false;
            }
        }
        true
    }

    fn find_sets(&self, cards: &[Card], max_count: usize) -> Vec<Vec<Card>> {
        let k = self.feature_size;
        let n = cards.len();
        let mut sets = Vec::new();
        if max_count == 0 || k == 0 || k > n {
            return sets;
        }

        // lexicographic enumeration of the k-combinations of `cards`.
        let mut indices: Vec<usize> = (0..k).collect();
        loop {
            let candidate: Vec<Card> = indices.iter().map(|&i| cards[i]).collect();
            if self.test_set(&candidate) {
                sets.push(candidate);
                if sets.len() >= max_count {
                    break;
                }
            }

            let mut at = k;
            while at > 0 && indices[at - 1] == n - k + at - 1 {
                at -= 1;
            }
            if at == 0 {
                break;
            }
            indices[at - 1] += 1;
            for next in at..k {
                indices[next] = indices[next - 1] + 1;
            }
        }
        sets
    }

    fn cards_to_features(&self, cards: &[Card]) -> Vec<Vec<u8>> {
        cards.iter().map(|c| self.features_of(*c)).collect()
    }
}
