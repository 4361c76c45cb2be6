//! Concurrency core of the set game: the shared table, player workers and
//! their key generators, and the dealer arbiter. No rendering, no input
//! devices; front ends plug in through [`set_core::GameUi`] and
//! [`PlayerHandle`].
#![warn(clippy::all, rust_2018_idioms)]

pub mod dealer;
pub mod game;
pub mod keygen;
pub mod keys;
pub mod player;
pub mod signal;
pub mod table;

pub use dealer::{Dealer, SetRequest, Verdict};
pub use game::{Game, GameController, PlayerHandle};
pub use keys::KeyQueue;
pub use player::Seat;
pub use signal::Terminate;
pub use table::Table;
