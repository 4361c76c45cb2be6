//! Console front end: terminal UI sink, stdin keyboard source and ctrl-c
//! wiring around the game engine.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use set_core::{ClassicOracle, GameConfig};
use set_engine::Game;

mod keyboard;
mod term_ui;

#[derive(Parser, Debug)]
#[command(about = "Multi-player set game over a shared card table")]
struct Cli {
    /// JSON file with a full game configuration; replaces the flags below.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = 81)]
    deck_size: u32,
    #[arg(long, default_value_t = 3)]
    rows: usize,
    #[arg(long, default_value_t = 4)]
    columns: usize,
    #[arg(long, default_value_t = 3)]
    feature_size: usize,
    #[arg(long, short, default_value_t = 2, value_parser = clap::value_parser!(u8).range(1..=8))]
    players: u8,
    #[arg(long, default_value_t = 0)]
    human_players: u8,
    #[arg(long, default_value_t = 60_000)]
    turn_timeout_millis: u64,
    #[arg(long, default_value_t = 5_000)]
    turn_timeout_warning_millis: u64,
    #[arg(long, default_value_t = 1_000)]
    point_freeze_millis: u64,
    #[arg(long, default_value_t = 3_000)]
    penalty_freeze_millis: u64,
    #[arg(long, default_value_t = 100)]
    table_delay_millis: u64,
    /// Print the legal sets on the table after each replenishment.
    #[arg(long, default_value_t = false)]
    hints: bool,
}

impl Cli {
    fn into_config(self) -> Result<GameConfig> {
        if let Some(path) = &self.config {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            return serde_json::from_str(&text).context("parsing game configuration");
        }
        Ok(GameConfig {
            deck_size: self.deck_size,
            rows: self.rows,
            columns: self.columns,
            feature_size: self.feature_size,
            players: self.players as usize,
            human_players: self.human_players as usize,
            turn_timeout_millis: self.turn_timeout_millis,
            turn_timeout_warning_millis: self.turn_timeout_warning_millis,
            point_freeze_millis: self.point_freeze_millis,
            penalty_freeze_millis: self.penalty_freeze_millis,
            table_delay_millis: self.table_delay_millis,
            hints: self.hints,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .format_timestamp_millis()
        .init();

    let config = Cli::parse().into_config()?;
    config.validate()?;

    let oracle = Arc::new(ClassicOracle::for_config(&config)?);
    let ui = Arc::new(term_ui::TermUi::new(&config));

    let game = Game::new(config.clone(), ui, oracle);
    let controller = game.controller();

    if config.human_players > 0 {
        keyboard::spawn_stdin_reader(&config, game.players());
    }

    let mut game = tokio::spawn(game.run());

    tokio::select! {
        result = &mut game => {
            report(result);
            return Ok(());
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
            controller.terminate();
        }
    }
    report(game.await);

    Ok(())
}

fn report(result: Result<Vec<set_core::PlayerId>, tokio::task::JoinError>) {
    match result {
        Ok(winners) => {
            let winners: Vec<String> = winners.iter().map(ToString::to_string).collect();
            info!("game over, winner(s): {}", winners.join(", "));
        }
        Err(err) => error!("game task failed: {err}"),
    }
}
