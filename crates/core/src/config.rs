//! Game configuration and startup validation.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration problems detected before the game starts. These are
/// programmer or operator errors; the engine never checks them at runtime.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("table grid is {rows}x{columns}, no slots to play on")]
    EmptyGrid { rows: usize, columns: usize },
    #[error("feature size {feature_size} exceeds the table size {table_size}")]
    FeatureExceedsTable {
        feature_size: usize,
        table_size: usize,
    },
    #[error("feature size must be at least 2, got {0}")]
    FeatureTooSmall(usize),
    #[error("game needs at least one player")]
    NoPlayers,
    #[error("{human_players} human players but only {players} seats")]
    TooManyHumans {
        players: usize,
        human_players: usize,
    },
    #[error("deck size {deck_size} is not a power of the feature size {feature_size}")]
    DeckNotFeaturePower { deck_size: u32, feature_size: usize },
    #[error("deck of {deck_size} cards cannot fill a table of {table_size} slots")]
    DeckSmallerThanTable { deck_size: u32, table_size: usize },
}

/// All tunables of one game.
///
/// The table is a `rows` x `columns` grid; `feature_size` is the
/// cardinality of a legal set and of the per-player key queue. Seats
/// `0..human_players` take keyboard input, the rest are driven by key
/// generators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub deck_size: u32,
    pub rows: usize,
    pub columns: usize,
    pub feature_size: usize,
    pub players: usize,
    pub human_players: usize,
    pub turn_timeout_millis: u64,
    pub turn_timeout_warning_millis: u64,
    pub point_freeze_millis: u64,
    pub penalty_freeze_millis: u64,
    /// Simulated hardware latency of placing or removing a card.
    pub table_delay_millis: u64,
    /// Print the legal sets on the table after each replenishment.
    pub hints: bool,
}

impl GameConfig {
    /// Number of slots on the table.
    #[must_use]
    pub fn table_size(&self) -> usize {
        self.rows * self.columns
    }

    #[must_use]
    pub fn turn_timeout(&self) -> Duration {
        Duration::from_millis(self.turn_timeout_millis)
    }

    #[must_use]
    pub fn turn_timeout_warning(&self) -> Duration {
        Duration::from_millis(self.turn_timeout_warning_millis)
    }

    #[must_use]
    pub fn point_freeze(&self) -> Duration {
        Duration::from_millis(self.point_freeze_millis)
    }

    #[must_use]
    pub fn penalty_freeze(&self) -> Duration {
        Duration::from_millis(self.penalty_freeze_millis)
    }

    #[must_use]
    pub fn table_delay(&self) -> Duration {
        Duration::from_millis(self.table_delay_millis)
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(ConfigError::EmptyGrid {
                rows: self.rows,
                columns: self.columns,
            });
        }
        if self.feature_size < 2 {
            return Err(ConfigError::FeatureTooSmall(self.feature_size));
        }
        if self.feature_size > self.table_size() {
            return Err(ConfigError::FeatureExceedsTable {
                feature_size: self.feature_size,
                table_size: self.table_size(),
            });
        }
        let base = self.feature_size as u32;
        let mut rest = self.deck_size;
        let mut feature_count = 0;
        while rest > 1 && rest % base == 0 {
            rest /= base;
            feature_count += 1;
        }
        if rest != 1 || feature_count == 0 {
            return Err(ConfigError::DeckNotFeaturePower {
                deck_size: self.deck_size,
                feature_size: self.feature_size,
            });
        }
        if (self.deck_size as usize) < self.table_size() {
            return Err(ConfigError::DeckSmallerThanTable {
                deck_size: self.deck_size,
                table_size: self.table_size(),
            });
        }
        if self.players == 0 {
            return Err(ConfigError::NoPlayers);
        }
        if self.human_players > self.players {
            return Err(ConfigError::TooManyHumans {
                players: self.players,
                human_players: self.human_players,
            });
        }
        Ok(())
    }
}

impl Default for GameConfig {
    /// The classic game: 81 cards, a 3x4 grid, sets of three, a one minute
    /// turn with a five second warning.
    fn default() -> Self {
        Self {
            deck_size: 81,
            rows: 3,
            columns: 4,
            feature_size: 3,
            players: 2,
            human_players: 0,
            turn_timeout_millis: 60_000,
            turn_timeout_warning_millis: 5_000,
            point_freeze_millis: 1_000,
            penalty_freeze_millis: 3_000,
            table_delay_millis: 100,
            hints: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_feature_size_larger_than_table() {
        let config = GameConfig {
            rows: 1,
            columns: 2,
            feature_size: 3,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::FeatureExceedsTable { .. })
        ));
    }

    #[test]
    fn rejects_non_power_deck_sizes() {
        let config = GameConfig {
            deck_size: 80,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DeckNotFeaturePower { .. })
        ));
    }

    #[test]
    fn rejects_a_deck_smaller_than_the_table() {
        // 9 = 3^2 passes the power check but cannot fill twelve slots.
        let config = GameConfig {
            deck_size: 9,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DeckSmallerThanTable { .. })
        ));
    }

    #[test]
    fn rejects_more_humans_than_seats() {
        let config = GameConfig {
            players: 2,
            human_players: 3,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooManyHumans { .. })
        ));
    }

    #[test]
    fn rejects_empty_grid_and_zero_players() {
        let config = GameConfig {
            rows: 0,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyGrid { .. })));

        let config = GameConfig {
            players: 0,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoPlayers)));
    }
}
