//! Mini-game timer - a per-round countdown and timer state machine
//!
//! This is the main entry point for the minigame-timer application.

use std::{sync::Arc, time::Duration};
use tokio::{net::TcpListener, sync::broadcast};
use tracing::{info, warn};

use minigame_timer::{
    config::Config,
    state::AppState,
    api::create_router,
    tasks::{event_log_task, GameLoop},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("minigame_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting minigame-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, max_time={}, frame_rate={}fps",
          config.host, config.port, config.max_time, config.frame_rate);

    // Subscribe the event log before the round exists so it sees TimerInit
    let (event_tx, event_rx) = broadcast::channel(256);
    let event_log = tokio::spawn(event_log_task(event_rx));

    // Build the round and start its game loop
    let (game_loop, round) = GameLoop::new(config.round_config(), config.frame_interval(), event_tx);
    let mut game = tokio::spawn(game_loop.run());

    let state = Arc::new(AppState::new(config.port, config.host.clone(), round));

    if config.auto_start {
        info!("Auto-start enabled, kicking off the round");
        if let Err(e) = state.start().await {
            warn!("Could not start the round: {}", e);
        }
    }

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start  - Start the countdown");
    info!("  POST /stop   - Stop the running timer");
    info!("  POST /winner - Set the round winner");
    info!("  POST /close  - Announce the winner and close the round");
    info!("  GET  /status - Check current round status");
    info!("  GET  /health - Health check");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
        result = &mut game => {
            if let Err(e) = result {
                tracing::error!("Game loop failed: {}", e);
            } else {
                info!("Round finished, shutting down");
            }
        }
    }

    // The event stream closes once the game loop and the last round handle are gone
    game.abort();
    drop(state);
    match tokio::time::timeout(Duration::from_secs(1), event_log).await {
        Ok(Ok(logger)) => info!("Logged {} round events", logger.events_seen()),
        _ => warn!("Event log did not drain before shutdown"),
    }

    info!("Server shutdown complete");
    Ok(())
}
