//! Mini-game timer - a per-round countdown and timer state machine
//! 
//! This library provides the round timer (countdown, running timer, expiry
//! and closing announcement), the event stream it emits, and the game loop
//! and HTTP surface that host it.

pub mod config;
pub mod state;
pub mod timer;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::AppState;
pub use timer::{ListenerRegistry, RoundConfig, TimerEvent, TimerObserver, TimerStateMachine};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
