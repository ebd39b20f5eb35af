//! Shared application state for the HTTP layer

use std::{sync::Mutex, time::Instant};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::{RoundStatus, Winner};
use crate::{
    tasks::{CommandOutcome, RoundCommand, RoundHandle},
    timer::RoundError,
};

/// Application state shared by all handlers
#[derive(Debug)]
pub struct AppState {
    /// Handle to the running round
    pub round: RoundHandle,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last accepted action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
}

impl AppState {
    /// Create a new AppState around a round handle
    pub fn new(port: u16, host: String, round: RoundHandle) -> Self {
        Self {
            round,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
        }
    }

    /// Send a command to the round and record it if accepted
    pub async fn command(&self, action: &str, command: RoundCommand) -> Result<CommandOutcome, RoundError> {
        let outcome = self.round.send(command).await?;

        if outcome.accepted {
            info!("Action '{}' accepted, round is {}", action, outcome.status.state);
            self.record_action(action);
        } else {
            warn!("Action '{}' ignored, round is {}", action, outcome.status.state);
        }

        Ok(outcome)
    }

    /// Start the countdown
    pub async fn start(&self) -> Result<CommandOutcome, RoundError> {
        self.command("start", RoundCommand::Start).await
    }

    /// Stop the running timer
    pub async fn stop(&self) -> Result<CommandOutcome, RoundError> {
        self.command("stop", RoundCommand::Stop).await
    }

    /// Run the closing announcement
    pub async fn close(&self) -> Result<CommandOutcome, RoundError> {
        self.command("close", RoundCommand::Close).await
    }

    /// Set the winner announced when the round closes
    pub async fn set_winner(&self, winner: Winner) -> Result<CommandOutcome, RoundError> {
        self.command("winner", RoundCommand::SetWinner(winner)).await
    }

    /// Get current round status
    pub fn get_round_status(&self) -> RoundStatus {
        self.round.status()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }
}
