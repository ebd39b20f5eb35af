//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info};

use crate::{
    state::AppState,
    tasks::CommandOutcome,
    timer::RoundError,
};
use super::responses::{ApiResponse, HealthResponse, StatusResponse, WinnerRequest};

/// Result type shared by the command endpoints
pub type CommandResult = Result<Json<ApiResponse>, (StatusCode, Json<ApiResponse>)>;

/// Map a command outcome to a response: 200 if accepted, 409 if ignored, 503 if the loop is gone
fn command_response(
    state: &AppState,
    result: Result<CommandOutcome, RoundError>,
    accepted_message: &str,
    rejected_message: &str,
) -> CommandResult {
    match result {
        Ok(CommandOutcome { accepted: true, status }) => {
            Ok(Json(ApiResponse::accepted(accepted_message.to_string(), status)))
        }
        Ok(CommandOutcome { accepted: false, status }) => Err((
            StatusCode::CONFLICT,
            Json(ApiResponse::rejected(
                format!("{} (round is {})", rejected_message, status.state),
                status,
            )),
        )),
        Err(e) => {
            error!("Failed to reach game loop: {}", e);
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::rejected(e.to_string(), state.get_round_status())),
            ))
        }
    }
}

/// Handle POST /start - Begin the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> CommandResult {
    info!("Start endpoint called");
    let result = state.start().await;
    command_response(&state, result, "Countdown started", "Timer cannot be started")
}

/// Handle POST /stop - Stop the running timer
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> CommandResult {
    info!("Stop endpoint called");
    let result = state.stop().await;
    command_response(&state, result, "Timer stopped", "Timer is not running")
}

/// Handle POST /close - Announce the winner and close the round
pub async fn close_handler(State(state): State<Arc<AppState>>) -> CommandResult {
    info!("Close endpoint called");
    let result = state.close().await;
    command_response(&state, result, "Closing round", "Round cannot be closed")
}

/// Handle POST /winner - Set the winner announced on close
pub async fn winner_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<WinnerRequest>,
) -> CommandResult {
    info!("Winner endpoint called with {:?}", request.winner);
    let result = state.set_winner(request.winner).await;
    command_response(&state, result, "Winner set", "Winner cannot be set")
}

/// Handle GET /status - Return current round status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        round: state.get_round_status(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
