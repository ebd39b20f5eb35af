//! Signal handling for graceful shutdown

use signal_hook_tokio::Signals;
use futures::stream::StreamExt;
use tracing::{info, warn};

/// Wait for shutdown signals (SIGTERM, SIGINT)
pub async fn shutdown_signal() {
    let mut signals = match Signals::new([
        signal_hook::consts::SIGTERM,
        signal_hook::consts::SIGINT,
    ]) {
        Ok(signals) => signals,
        Err(e) => {
            warn!("Failed to register signal handler: {}, falling back to ctrl-c", e);
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for ctrl-c: {}", e);
            }
            return;
        }
    };

    if let Some(signal) = signals.next().await {
        info!("Received signal: {}", signal);
    }
}
