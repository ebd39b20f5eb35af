//! Integration tests for the HTTP control API

use std::{sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use minigame_timer::{
    create_router,
    state::{AppState, RoundState},
    tasks::GameLoop,
    timer::RoundConfig,
};
use serde_json::{json, Value};
use tokio::{sync::broadcast, time::timeout};
use tower::ServiceExt;

const WAIT: Duration = Duration::from_secs(5);

fn test_app() -> (Router, Arc<AppState>) {
    let config = RoundConfig {
        step_delay: Duration::from_millis(20),
        ..RoundConfig::default()
    };
    let (event_tx, _) = broadcast::channel(1024);
    let (game_loop, round) = GameLoop::new(config, Duration::from_millis(5), event_tx);
    tokio::spawn(game_loop.run());

    let state = Arc::new(AppState::new(0, "127.0.0.1".to_string(), round));
    (create_router(Arc::clone(&state)), state)
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).expect("Failed to build request"))
        .await
        .expect("Router failed");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn wait_for_state(state: &AppState, wanted: RoundState) {
    let mut status = state.round.watch_status();
    timeout(WAIT, status.wait_for(|s| s.state == wanted))
        .await
        .unwrap_or_else(|_| panic!("Round never reached {}", wanted))
        .expect("Status channel closed");
}

#[tokio::test]
async fn test_health() {
    let (app, _state) = test_app();

    let (status, body) = call(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_commands_follow_round_phase() {
    let (app, state) = test_app();

    // Nothing to stop yet
    let (status, body) = call(&app, "POST", "/stop", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "rejected");
    assert_eq!(body["round"]["state"], "not_started");

    let (status, body) = call(&app, "POST", "/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "accepted");
    assert_eq!(body["round"]["state"], "in_countdown");

    let (status, _) = call(&app, "POST", "/start", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = call(&app, "POST", "/winner", Some(json!({ "winner": "player_one" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["round"]["winner"], "player_one");

    wait_for_state(&state, RoundState::TimerRunning).await;

    let (status, body) = call(&app, "GET", "/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["round"]["state"], "timer_running");
    assert_eq!(body["round"]["countdown_message"], "");
    assert_eq!(body["last_action"], "winner");

    let (status, body) = call(&app, "POST", "/stop", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["round"]["state"], "timer_expired");

    let (status, _) = call(&app, "POST", "/close", None).await;
    assert_eq!(status, StatusCode::OK);

    wait_for_state(&state, RoundState::GameOver).await;

    // The game loop has exited with the round
    let (status, body) = call(&app, "POST", "/start", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["round"]["state"], "game_over");
}

#[tokio::test]
async fn test_unknown_winner_is_rejected() {
    let (app, state) = test_app();

    let (status, _) = call(&app, "POST", "/winner", Some(json!({ "winner": "nobody" }))).await;
    assert!(status.is_client_error());
    assert_eq!(state.get_round_status().winner, minigame_timer::state::Winner::Unset);
}
