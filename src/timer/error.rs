//! Error types for round configuration and the round handle

use thiserror::Error;

/// Configuration errors raised while building a round
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error("Unsupported max game time: {0}s (supported: 30, 60)")]
    UnsupportedDuration(u64),

    #[error("Invalid max game time '{0}': expected a whole number of seconds")]
    InvalidDuration(String),
}

/// Errors raised when talking to a round through its handle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundError {
    #[error("Game loop is no longer running")]
    LoopClosed,
}
