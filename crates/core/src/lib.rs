//! Core types shared by the set game engine and its front ends.
#![warn(clippy::all, rust_2018_idioms)]

pub mod cards;
pub mod config;
pub mod oracle;
pub mod ui;

pub use cards::{Card, Deck, PlayerId, Slot};
pub use config::{ConfigError, GameConfig};
pub use oracle::{ClassicOracle, SetOracle};
pub use ui::{GameUi, NullUi};
