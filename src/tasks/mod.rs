//! Background tasks module
//! 
//! This module contains the game loop that drives the round and the tasks
//! that run alongside it.

pub mod event_log;
pub mod game_loop;

// Re-export main types and functions
pub use event_log::{event_log_task, EventLogger};
pub use game_loop::{CommandOutcome, GameLoop, RoundCommand, RoundHandle};
