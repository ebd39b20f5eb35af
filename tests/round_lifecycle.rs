//! Integration tests for the game loop
//!
//! These tests drive a real round through the game loop task with a short
//! step delay and check the event stream and command replies.

use std::time::Duration;

use minigame_timer::state::{RoundState, Winner};
use minigame_timer::tasks::{event_log_task, GameLoop, RoundCommand};
use minigame_timer::timer::{EventKind, RoundConfig, RoundError, TimerEvent};
use tokio::sync::broadcast;
use tokio::time::timeout;

const FRAME: Duration = Duration::from_millis(5);
const WAIT: Duration = Duration::from_secs(5);

fn fast_config() -> RoundConfig {
    RoundConfig {
        step_delay: Duration::from_millis(20),
        ..RoundConfig::default()
    }
}

/// Collect events, skipping continuous time updates, until one of `kind` arrives
async fn collect_until(rx: &mut broadcast::Receiver<TimerEvent>, kind: EventKind) -> Vec<TimerEvent> {
    let mut events = Vec::new();
    loop {
        let event = match timeout(WAIT, rx.recv()).await {
            Ok(Ok(event)) => event,
            Ok(Err(broadcast::error::RecvError::Lagged(_))) => continue,
            Ok(Err(e)) => panic!("event stream failed while waiting for {:?}: {}", kind, e),
            Err(_) => panic!("timed out waiting for {:?}", kind),
        };
        if event.kind() == EventKind::TimeUpdate {
            continue;
        }
        let done = event.kind() == kind;
        events.push(event);
        if done {
            return events;
        }
    }
}

// =============================================================================
// Round Lifecycle Tests
// =============================================================================

#[tokio::test]
async fn test_round_runs_start_to_close() {
    let (event_tx, mut events) = broadcast::channel(4096);
    let (game_loop, round) = GameLoop::new(fast_config(), FRAME, event_tx);
    let game = tokio::spawn(game_loop.run());

    let init = collect_until(&mut events, EventKind::TimerInit).await;
    assert_eq!(init, vec![TimerEvent::TimerInit { seconds: 30 }]);

    let outcome = round.send(RoundCommand::Start).await.expect("Failed to start");
    assert!(outcome.accepted);
    assert_eq!(outcome.status.state, RoundState::InCountdown);
    assert_eq!(outcome.status.countdown_message, "3");

    let countdown = collect_until(&mut events, EventKind::GameStart).await;
    let messages: Vec<&str> = countdown
        .iter()
        .filter_map(|e| match e {
            TimerEvent::CountDown { message } => Some(message.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(messages, vec!["3", "2", "1", "GO!"]);
    assert_eq!(countdown.last(), Some(&TimerEvent::GameStart));

    // A second start must not restart the countdown
    let outcome = round.send(RoundCommand::Start).await.expect("Failed to send start");
    assert!(!outcome.accepted);
    assert_eq!(outcome.status.state, RoundState::TimerRunning);

    let outcome = round
        .send(RoundCommand::SetWinner(Winner::PlayerTwo))
        .await
        .expect("Failed to set winner");
    assert!(outcome.accepted);
    assert_eq!(outcome.status.winner, Winner::PlayerTwo);

    let outcome = round.send(RoundCommand::Stop).await.expect("Failed to stop");
    assert!(outcome.accepted);
    assert_eq!(outcome.status.state, RoundState::TimerExpired);
    let ended = collect_until(&mut events, EventKind::GameEnd).await;
    assert_eq!(ended.iter().filter(|e| e.kind() == EventKind::GameEnd).count(), 1);

    let outcome = round.send(RoundCommand::Close).await.expect("Failed to close");
    assert!(outcome.accepted);

    let closing = collect_until(&mut events, EventKind::GameClose).await;
    assert_eq!(
        closing,
        vec![
            TimerEvent::GameWinner {
                winner: Winner::PlayerTwo
            },
            TimerEvent::GameClose,
        ]
    );

    // The loop exits on its own once the round is over
    timeout(WAIT, game)
        .await
        .expect("Game loop should stop after the round closes")
        .expect("Game loop panicked");

    assert_eq!(round.status().state, RoundState::GameOver);
    assert_eq!(round.send(RoundCommand::Start).await, Err(RoundError::LoopClosed));
}

#[tokio::test]
async fn test_stop_before_start_is_rejected() {
    let (event_tx, _events) = broadcast::channel(64);
    let (game_loop, round) = GameLoop::new(fast_config(), FRAME, event_tx);
    tokio::spawn(game_loop.run());
    let mut late_events = round.subscribe();

    let outcome = round.send(RoundCommand::Stop).await.expect("Failed to send stop");
    assert!(!outcome.accepted);
    assert_eq!(outcome.status.state, RoundState::NotStarted);

    let outcome = round.send(RoundCommand::Close).await.expect("Failed to send close");
    assert!(!outcome.accepted);
    assert_eq!(round.status().state, RoundState::NotStarted);

    // Rejected commands and idle frames emit nothing
    tokio::time::sleep(FRAME * 4).await;
    assert!(matches!(
        late_events.try_recv(),
        Err(broadcast::error::TryRecvError::Empty)
    ));
}

#[tokio::test]
async fn test_dropping_handles_stops_loop() {
    let config = RoundConfig {
        step_delay: Duration::from_millis(200),
        ..RoundConfig::default()
    };
    let (event_tx, mut events) = broadcast::channel(64);
    let (game_loop, round) = GameLoop::new(config, FRAME, event_tx);
    let game = tokio::spawn(game_loop.run());

    round.send(RoundCommand::Start).await.expect("Failed to start");
    drop(round);

    timeout(WAIT, game)
        .await
        .expect("Game loop should stop when every handle is dropped")
        .expect("Game loop panicked");

    // The abandoned countdown never reaches GameStart
    let mut seen = Vec::new();
    loop {
        match events.try_recv() {
            Ok(event) => seen.push(event),
            Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
    assert!(seen.contains(&TimerEvent::CountDown {
        message: "3".to_string()
    }));
    assert!(!seen.iter().any(|e| e.kind() == EventKind::GameStart));
}

#[tokio::test]
async fn test_countdown_wait_starts_at_command() {
    let frame = Duration::from_millis(500);
    let step_delay = Duration::from_millis(300);
    let config = RoundConfig {
        step_delay,
        ..RoundConfig::default()
    };
    let (event_tx, mut events) = broadcast::channel(64);
    let (game_loop, round) = GameLoop::new(config, frame, event_tx);
    tokio::spawn(game_loop.run());
    collect_until(&mut events, EventKind::TimerInit).await;

    // Land the command late in a slow frame
    tokio::time::sleep(Duration::from_millis(450)).await;
    round.send(RoundCommand::Start).await.expect("Failed to start");

    let first = collect_until(&mut events, EventKind::CountDown).await;
    assert_eq!(first.last(), Some(&TimerEvent::CountDown { message: "3".to_string() }));
    let shown_at = std::time::Instant::now();

    let second = collect_until(&mut events, EventKind::CountDown).await;
    assert_eq!(second.last(), Some(&TimerEvent::CountDown { message: "2".to_string() }));
    let gap = shown_at.elapsed();

    assert!(gap >= step_delay, "\"3\" was shown for only {:?}", gap);
}

#[tokio::test]
async fn test_event_log_sees_whole_round() {
    let (event_tx, events) = broadcast::channel(4096);
    let log = tokio::spawn(event_log_task(events));

    let (game_loop, round) = GameLoop::new(fast_config(), FRAME, event_tx);
    let game = tokio::spawn(game_loop.run());

    let mut status = round.watch_status();
    round.send(RoundCommand::Start).await.expect("Failed to start");
    timeout(WAIT, status.wait_for(|s| s.is_timer_running()))
        .await
        .expect("Countdown never finished")
        .expect("Status channel closed");

    round.send(RoundCommand::Stop).await.expect("Failed to stop");
    round.send(RoundCommand::Close).await.expect("Failed to close");
    timeout(WAIT, game)
        .await
        .expect("Game loop should stop after the round closes")
        .expect("Game loop panicked");

    // Last sender goes away with the handle, which ends the log task
    drop(status);
    drop(round);
    let logger = timeout(WAIT, log)
        .await
        .expect("Event log should finish once the stream closes")
        .expect("Event log panicked");

    // TimerInit, 4 countdown messages, GameStart, GameEnd, GameWinner, GameClose
    assert!(logger.events_seen() >= 9);
}
