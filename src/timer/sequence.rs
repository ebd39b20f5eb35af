//! Suspendable round phases
//!
//! A [`Sequence`] holds the next step to run and how long to wait before
//! running it. The owning state machine polls it as the host clock advances;
//! the sequence itself never emits anything.

use std::time::Duration;

/// Which phase a sequence belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceKind {
    Countdown,
    Closing,
}

/// One step of a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceStep {
    /// Show a countdown number (3, 2, 1)
    Count(u8),
    /// Show the configured start message
    StartMessage,
    /// Clear the message and start the timer
    Begin,
    AnnounceWinner,
    Close,
}

impl SequenceStep {
    pub fn kind(self) -> SequenceKind {
        match self {
            SequenceStep::Count(_) | SequenceStep::StartMessage | SequenceStep::Begin => {
                SequenceKind::Countdown
            }
            SequenceStep::AnnounceWinner | SequenceStep::Close => SequenceKind::Closing,
        }
    }
}

pub const COUNTDOWN_FROM: u8 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    kind: SequenceKind,
    next: Option<SequenceStep>,
    wait: f32,
}

impl Sequence {
    /// Countdown whose first step is due immediately
    pub fn countdown() -> Self {
        Self {
            kind: SequenceKind::Countdown,
            next: Some(SequenceStep::Count(COUNTDOWN_FROM)),
            wait: 0.0,
        }
    }

    /// Closing announcement, first step due after `delay`
    pub fn closing(delay: Duration) -> Self {
        Self {
            kind: SequenceKind::Closing,
            next: Some(SequenceStep::AnnounceWinner),
            wait: delay.as_secs_f32(),
        }
    }

    pub fn kind(&self) -> SequenceKind {
        self.kind
    }

    /// Let `elapsed` seconds pass
    pub fn elapse(&mut self, elapsed: f32) {
        if elapsed.is_finite() && elapsed > 0.0 {
            self.wait -= elapsed;
        }
    }

    /// Take the next step if its wait is over
    pub fn poll(&mut self) -> Option<SequenceStep> {
        if self.wait <= 0.0 {
            self.next.take()
        } else {
            None
        }
    }

    /// Schedule `step` to run `delay` after the step just taken.
    /// Time already elapsed past the previous deadline counts toward the new one.
    pub fn resume_after(&mut self, step: SequenceStep, delay: Duration) {
        self.next = Some(step);
        self.wait += delay.as_secs_f32();
    }
}
