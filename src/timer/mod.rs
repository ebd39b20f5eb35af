//! Round timer module
//!
//! The state machine, its notifications, and the sequences that drive the
//! countdown and closing phases.

pub mod error;
pub mod events;
pub mod machine;
pub mod sequence;

// Re-export main types
pub use error::{RoundError, TimerError};
pub use events::{EventKind, ListenerControl, ListenerId, ListenerRegistry, TimerEvent, TimerObserver};
pub use machine::{RoundConfig, TimerStateMachine};
pub use sequence::{SequenceKind, SequenceStep};
