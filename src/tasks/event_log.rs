//! Event log background task

use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, trace, warn};

use crate::{
    state::Winner,
    timer::{TimerEvent, TimerObserver},
};

/// Observer that writes round notifications to the log
#[derive(Debug, Default)]
pub struct EventLogger {
    events_seen: u64,
}

impl EventLogger {
    pub fn events_seen(&self) -> u64 {
        self.events_seen
    }

    /// Count and log one event
    pub fn record(&mut self, event: &TimerEvent) {
        self.events_seen += 1;
        self.on_event(event);
    }
}

impl TimerObserver for EventLogger {
    fn on_timer_init(&mut self, seconds: i32) {
        info!("Timer initialized at {}s", seconds);
    }

    fn on_count_down(&mut self, message: &str) {
        info!("Countdown: {}", message);
    }

    fn on_game_start(&mut self) {
        info!("Game started");
    }

    fn on_time_update(&mut self, remaining: f32) {
        trace!("Time remaining: {:.3}s", remaining);
    }

    fn on_time_update_whole(&mut self, remaining: i32) {
        debug!("{}s left", remaining);
    }

    fn on_game_end(&mut self) {
        info!("Game ended");
    }

    fn on_game_winner(&mut self, winner: Winner) {
        info!("Winner: {:?}", winner);
    }

    fn on_game_close(&mut self) {
        info!("Game closed");
    }
}

/// Background task that logs every event broadcast by the game loop
pub async fn event_log_task(mut events: broadcast::Receiver<TimerEvent>) -> EventLogger {
    info!("Starting event log task");

    let mut logger = EventLogger::default();

    loop {
        match events.recv().await {
            Ok(event) => logger.record(&event),
            Err(RecvError::Lagged(skipped)) => {
                // Continuous updates arrive every frame; a slow logger can fall behind
                warn!("Event log lagged, skipped {} events", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Event stream closed after {} events", logger.events_seen());
                break;
            }
        }
    }

    logger
}
