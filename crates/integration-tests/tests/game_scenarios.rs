//! End-to-end games driven through the public engine surface: a recording
//! UI sink, scripted oracles and manual key presses.

mod support;

use std::sync::Arc;
use std::time::Duration;

use set_core::{GameConfig, PlayerId, Slot};
use set_engine::Game;
use support::mock_ui::{MockUi, UiEvent};
use support::oracles::{BarrenOracle, ScriptedOracle};

const WAIT: Duration = Duration::from_secs(5);

/// All-human seats so the tests drive every key press themselves.
fn humans_config(players: usize) -> GameConfig {
    GameConfig {
        players,
        human_players: players,
        point_freeze_millis: 300,
        penalty_freeze_millis: 1_000,
        table_delay_millis: 0,
        ..GameConfig::default()
    }
}

fn place_count(events: &[UiEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, UiEvent::PlaceCard { .. }))
        .count()
}

fn removed_slots(events: &[UiEvent]) -> Vec<usize> {
    let mut slots: Vec<usize> = events
        .iter()
        .filter_map(|e| match e {
            UiEvent::RemoveCard { slot } => Some(slot.index()),
            _ => None,
        })
        .collect();
    slots.sort_unstable();
    slots
}

async fn wait_for_board(ui: &MockUi) {
    ui.wait_until("initial board", WAIT, |events| place_count(events) >= 12)
        .await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn accepted_set_scores_reaps_and_refills() {
    let ui = Arc::new(MockUi::new());
    let oracle = Arc::new(ScriptedOracle::new(&[true]));
    let game = Game::new(humans_config(1), ui.clone(), oracle);
    let controller = game.controller();
    let player = game.players()[0].clone();
    let game = tokio::spawn(game.run());

    wait_for_board(&ui).await;
    let initial_cards: Vec<_> = ui
        .events()
        .iter()
        .filter_map(|e| match e {
            UiEvent::PlaceCard { card, .. } => Some(*card),
            _ => None,
        })
        .collect();

    for index in [0, 1, 2] {
        player.key_pressed(Slot::new(index));
    }

    ui.wait_until("score", WAIT, |events| {
        events.contains(&UiEvent::Score {
            player: PlayerId::new(0),
            score: 1,
        })
    })
    .await;
    ui.wait_until("reap", WAIT, |events| removed_slots(events).len() == 3)
        .await;
    assert_eq!(removed_slots(&ui.events()), vec![0, 1, 2]);

    // point freeze, then the fresh cards from the deck head.
    ui.wait_until("freeze tick", WAIT, |events| {
        events.iter().any(|e| {
            matches!(e, UiEvent::Freeze { player, millis }
                if *player == PlayerId::new(0) && (1..=300).contains(millis))
        })
    })
    .await;
    ui.wait_until("refill", WAIT, |events| place_count(events) >= 15).await;
    let refill: Vec<_> = ui
        .events()
        .iter()
        .filter_map(|e| match e {
            UiEvent::PlaceCard { card, .. } => Some(*card),
            _ => None,
        })
        .skip(12)
        .collect();
    assert!(refill.iter().all(|card| !initial_cards.contains(card)));

    // acceptance granted a fresh turn: a second full-length countdown.
    assert!(
        ui.count(|e| matches!(e, UiEvent::Countdown { millis: 60_000, warning: false })) >= 2
    );

    controller.terminate();
    let winners = game.await.unwrap();
    assert_eq!(winners, vec![PlayerId::new(0)]);
    assert_eq!(player.score(), 1);
    assert!(matches!(ui.events().last(), Some(UiEvent::Winners { .. })));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn rejected_set_freezes_without_touching_the_table() {
    let ui = Arc::new(MockUi::new());
    let oracle = Arc::new(ScriptedOracle::new(&[false]));
    let game = Game::new(humans_config(1), ui.clone(), oracle);
    let controller = game.controller();
    let player = game.players()[0].clone();
    let game = tokio::spawn(game.run());

    wait_for_board(&ui).await;
    for index in [3, 4, 5] {
        player.key_pressed(Slot::new(index));
    }

    // the first penalty tick is longer than any point freeze could be.
    ui.wait_until("penalty tick", WAIT, |events| {
        events.iter().any(|e| {
            matches!(e, UiEvent::Freeze { player, millis }
                if *player == PlayerId::new(0) && *millis > 300)
        })
    })
    .await;

    assert_eq!(ui.count(|e| matches!(e, UiEvent::RemoveCard { .. })), 0);
    assert_eq!(ui.count(|e| matches!(e, UiEvent::Score { .. })), 0);
    assert_eq!(ui.count(|e| matches!(e, UiEvent::PlaceToken { .. })), 3);
    assert_eq!(ui.count(|e| matches!(e, UiEvent::RemoveToken { .. })), 0);

    controller.terminate();
    let winners = game.await.unwrap();
    assert_eq!(winners, vec![PlayerId::new(0)]);
    assert_eq!(player.score(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_candidate_is_invalidated_without_penalty() {
    let ui = Arc::new(MockUi::new());
    // Hold the first verification open long enough for the second player
    // to token the same slots and submit.
    let oracle = Arc::new(ScriptedOracle::with_delay(
        &[true],
        Duration::from_millis(400),
    ));
    let game = Game::new(humans_config(2), ui.clone(), oracle);
    let controller = game.controller();
    let first = game.players()[1].clone();
    let second = game.players()[0].clone();
    let game = tokio::spawn(game.run());

    wait_for_board(&ui).await;

    for index in [5, 6, 7] {
        first.key_pressed(Slot::new(index));
    }
    // let the dealer take the first request into verification.
    tokio::time::sleep(Duration::from_millis(150)).await;
    for index in [5, 6, 7] {
        second.key_pressed(Slot::new(index));
    }

    ui.wait_until("first player scores", WAIT, |events| {
        events.contains(&UiEvent::Score {
            player: PlayerId::new(1),
            score: 1,
        })
    })
    .await;

    // the reap cleared the second player's tokens along with the cards.
    ui.wait_until("shared tokens reaped", WAIT, |events| {
        [5, 6, 7].iter().all(|&index| {
            events.contains(&UiEvent::RemoveToken {
                player: PlayerId::new(0),
                slot: Slot::new(index),
            })
        })
    })
    .await;
    assert_eq!(removed_slots(&ui.events()).len(), 3);

    // the invalidated candidate got neither a point nor a freeze; the
    // player is live again immediately.
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(
        ui.count(|e| matches!(e, UiEvent::Score { player, .. } if *player == PlayerId::new(0))),
        0
    );
    assert_eq!(
        ui.count(|e| matches!(e, UiEvent::Freeze { player, millis }
            if *player == PlayerId::new(0) && *millis > 0)),
        0
    );
    second.key_pressed(Slot::new(8));
    ui.wait_until("invalidated player acts again", Duration::from_millis(700), |events| {
        events.contains(&UiEvent::PlaceToken {
            player: PlayerId::new(0),
            slot: Slot::new(8),
        })
    })
    .await;

    controller.terminate();
    let winners = game.await.unwrap();
    assert_eq!(winners, vec![PlayerId::new(1)]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn press_at_capacity_evicts_the_oldest_token() {
    let ui = Arc::new(MockUi::new());
    let oracle = Arc::new(ScriptedOracle::new(&[false, true]));
    let config = GameConfig {
        penalty_freeze_millis: 200,
        ..humans_config(1)
    };
    let game = Game::new(config, ui.clone(), oracle);
    let controller = game.controller();
    let player = game.players()[0].clone();
    let game = tokio::spawn(game.run());

    wait_for_board(&ui).await;
    for index in [0, 1, 2] {
        player.key_pressed(Slot::new(index));
    }

    // rejected: penalty freeze runs and ends, tokens stay down.
    ui.wait_until("penalty over", WAIT, |events| {
        events.contains(&UiEvent::Freeze {
            player: PlayerId::new(0),
            millis: 0,
        })
    })
    .await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    // a fourth slot while three tokens are down: the oldest token moves.
    player.key_pressed(Slot::new(3));

    ui.wait_until("evicted resubmission scores", WAIT, |events| {
        events.contains(&UiEvent::Score {
            player: PlayerId::new(0),
            score: 1,
        })
    })
    .await;
    assert!(ui.events().contains(&UiEvent::RemoveToken {
        player: PlayerId::new(0),
        slot: Slot::new(0),
    }));
    assert!(ui.events().contains(&UiEvent::PlaceToken {
        player: PlayerId::new(0),
        slot: Slot::new(3),
    }));
    ui.wait_until("reap", WAIT, |events| removed_slots(events).len() == 3)
        .await;
    assert_eq!(removed_slots(&ui.events()), vec![1, 2, 3]);

    controller.terminate();
    game.await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn game_ends_when_no_set_exists_anywhere() {
    let ui = Arc::new(MockUi::new());
    let game = Game::new(humans_config(2), ui.clone(), Arc::new(BarrenOracle));
    let game = tokio::spawn(game.run());

    let winners = tokio::time::timeout(Duration::from_secs(3), game)
        .await
        .expect("game should end on its own")
        .unwrap();

    // everyone tied at zero; no round ever started.
    assert_eq!(winners, vec![PlayerId::new(0), PlayerId::new(1)]);
    assert_eq!(ui.count(|e| matches!(e, UiEvent::PlaceCard { .. })), 0);
    assert!(matches!(ui.events().last(), Some(UiEvent::Winners { .. })));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn terminate_interrupts_a_frozen_player() {
    let ui = Arc::new(MockUi::new());
    let oracle = Arc::new(ScriptedOracle::new(&[false]));
    let config = GameConfig {
        penalty_freeze_millis: 10_000,
        ..humans_config(1)
    };
    let game = Game::new(config, ui.clone(), oracle);
    let controller = game.controller();
    let player = game.players()[0].clone();
    let game = tokio::spawn(game.run());

    wait_for_board(&ui).await;
    for index in [0, 1, 2] {
        player.key_pressed(Slot::new(index));
    }
    ui.wait_until("long freeze running", WAIT, |events| {
        events.iter().any(|e| {
            matches!(e, UiEvent::Freeze { millis, .. } if *millis > 5_000)
        })
    })
    .await;

    controller.terminate();
    // the freeze sleep is interrupted well before its deadline.
    let winners = tokio::time::timeout(Duration::from_secs(2), game)
        .await
        .expect("terminate should cut the freeze short")
        .unwrap();
    assert_eq!(winners, vec![PlayerId::new(0)]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn countdown_warns_fast_and_expiry_reshuffles() {
    let ui = Arc::new(MockUi::new());
    let oracle = Arc::new(ScriptedOracle::new(&[false]));
    let config = GameConfig {
        turn_timeout_millis: 300,
        ..humans_config(1)
    };
    let game = Game::new(config, ui.clone(), oracle);
    let controller = game.controller();
    let game = tokio::spawn(game.run());

    // inside the warning window the tick cadence is 100ms.
    ui.wait_until("warning ticks", Duration::from_secs(3), |events| {
        events
            .iter()
            .filter(|e| matches!(e, UiEvent::Countdown { warning: true, .. }))
            .count()
            >= 3
    })
    .await;

    // expiry returns all twelve cards and deals a fresh board.
    ui.wait_until("reshuffle", WAIT, |events| {
        events
            .iter()
            .filter(|e| matches!(e, UiEvent::RemoveCard { .. }))
            .count()
            >= 12
            && place_count(events) >= 24
    })
    .await;

    controller.terminate();
    game.await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn generated_players_score_on_their_own() {
    let ui = Arc::new(MockUi::new());
    // every submission is accepted, so the generator only has to get
    // three tokens down.
    let oracle = Arc::new(ScriptedOracle::new(&[true]));
    let config = GameConfig {
        players: 1,
        human_players: 0,
        point_freeze_millis: 50,
        table_delay_millis: 0,
        ..GameConfig::default()
    };
    let game = Game::new(config, ui.clone(), oracle);
    let controller = game.controller();
    let player = game.players()[0].clone();
    let game = tokio::spawn(game.run());

    ui.wait_until("generated score", Duration::from_secs(20), |events| {
        events.iter().any(|e| matches!(e, UiEvent::Score { .. }))
    })
    .await;

    controller.terminate();
    let winners = tokio::time::timeout(Duration::from_secs(2), game)
        .await
        .expect("generator joins promptly")
        .unwrap();
    assert_eq!(winners, vec![PlayerId::new(0)]);
    assert!(player.score() >= 1);
}
