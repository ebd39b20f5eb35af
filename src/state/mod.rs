//! State management module
//! 
//! This module contains the round's public state types and the shared
//! application state handed to the HTTP layer.

pub mod app_state;
pub mod round_state;

// Re-export main types
pub use app_state::AppState;
pub use round_state::{MaxGameTime, RoundState, RoundStatus, Winner};
