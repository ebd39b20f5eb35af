//! Round timer state machine
//!
//! Drives a round through countdown, running timer, expiry and the closing
//! announcement, notifying registered listeners at each transition and on
//! every running tick. The host calls [`TimerStateMachine::update`] once per
//! frame; nothing in here blocks or sleeps.

use std::time::Duration;

use tracing::{debug, info, trace, warn};

use super::{
    events::{ListenerRegistry, TimerEvent},
    sequence::{Sequence, SequenceKind, SequenceStep},
    TimerError,
};
use crate::state::{MaxGameTime, RoundState, RoundStatus, Winner};

pub const DEFAULT_START_MESSAGE: &str = "GO!";
pub const DEFAULT_STEP_DELAY: Duration = Duration::from_secs(1);

/// Settings fixed for the lifetime of a round
#[derive(Debug, Clone, PartialEq)]
pub struct RoundConfig {
    pub max_game_time: MaxGameTime,
    /// Shown after "3", "2", "1"
    pub start_message: String,
    /// Pause between countdown and closing steps
    pub step_delay: Duration,
    /// Run the closing announcement automatically after expiry
    pub auto_close: bool,
}

impl RoundConfig {
    pub fn with_max_seconds(seconds: u64) -> Result<Self, TimerError> {
        Ok(Self {
            max_game_time: MaxGameTime::try_from(seconds)?,
            ..Self::default()
        })
    }
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            max_game_time: MaxGameTime::default(),
            start_message: DEFAULT_START_MESSAGE.to_string(),
            step_delay: DEFAULT_STEP_DELAY,
            auto_close: false,
        }
    }
}

/// Timer for a single round
#[derive(Debug)]
pub struct TimerStateMachine {
    state: RoundState,
    max_game_time: MaxGameTime,
    remaining: f32,
    /// Last whole-second value announced; `None` until the first announcement
    previous_whole_second: Option<i32>,
    countdown_message: String,
    start_message: String,
    step_delay: Duration,
    auto_close: bool,
    winner: Winner,
    sequence: Option<Sequence>,
    listeners: ListenerRegistry,
}

impl TimerStateMachine {
    /// Build a round and announce its starting time to `listeners`
    pub fn new(config: RoundConfig, listeners: ListenerRegistry) -> Self {
        let mut machine = Self {
            state: RoundState::NotStarted,
            max_game_time: config.max_game_time,
            remaining: config.max_game_time.seconds() as f32,
            previous_whole_second: None,
            countdown_message: String::new(),
            start_message: config.start_message,
            step_delay: config.step_delay,
            auto_close: config.auto_close,
            winner: Winner::Unset,
            sequence: None,
            listeners,
        };

        let seconds = machine.remaining_whole_seconds();
        info!("Round initialized with {} on the clock", machine.max_game_time);
        machine.emit(TimerEvent::TimerInit { seconds });
        machine.previous_whole_second = Some(seconds);
        machine
    }

    /// Begin the countdown. Returns false, with a warning, unless the round has not started yet.
    pub fn start(&mut self) -> bool {
        if self.state != RoundState::NotStarted {
            if self.is_timer_running() {
                warn!("Attempt to start timer when timer already running");
            } else {
                warn!("Attempt to start timer while {}", self.state);
            }
            return false;
        }

        info!("Starting countdown");
        self.state = RoundState::InCountdown;
        self.sequence = Some(Sequence::countdown());
        self.drive_sequence();
        true
    }

    /// End a running timer early. Returns false, with a warning, if the timer is not running.
    pub fn stop(&mut self) -> bool {
        if !self.is_timer_running() {
            warn!("Attempt to stop timer when timer not running ({})", self.state);
            return false;
        }

        info!("Timer stopped with {:.2}s remaining", self.remaining);
        self.expire();
        true
    }

    /// Run the closing announcement after the timer has expired
    pub fn close(&mut self) -> bool {
        if self.state != RoundState::TimerExpired {
            warn!("Attempt to close round while {}", self.state);
            return false;
        }
        if self.sequence.is_some() {
            warn!("Attempt to close round while the closing sequence is already running");
            return false;
        }

        info!("Closing round");
        self.sequence = Some(Sequence::closing(self.step_delay));
        true
    }

    /// Per-frame entry point. Advances the active sequence if there is one,
    /// otherwise ticks the running timer.
    pub fn update(&mut self, delta: f32) {
        if self.sequence.is_some() {
            self.advance_sequence(delta);
        } else {
            self.tick(delta);
        }
    }

    /// Count the running timer down by `delta` seconds. No-op unless running.
    pub fn tick(&mut self, delta: f32) {
        if self.state != RoundState::TimerRunning {
            return;
        }

        let delta = if delta.is_finite() && delta > 0.0 { delta } else { 0.0 };
        self.remaining = (self.remaining - delta).max(0.0);
        self.emit(TimerEvent::TimeUpdate {
            remaining: self.remaining,
        });

        let whole = self.remaining_whole_seconds();
        if self.previous_whole_second != Some(whole) {
            self.previous_whole_second = Some(whole);
            self.emit(TimerEvent::TimeUpdateWhole { remaining: whole });
        }

        if whole == 0 {
            info!("Timer expired");
            self.expire();
        }
    }

    /// Let `elapsed` seconds pass for the active sequence, running every step that comes due
    pub fn advance_sequence(&mut self, elapsed: f32) {
        if let Some(sequence) = self.sequence.as_mut() {
            sequence.elapse(elapsed);
        }
        self.drive_sequence();
    }

    /// Abandon the active sequence without running its remaining steps
    pub fn cancel_sequence(&mut self) -> bool {
        match self.sequence.take() {
            Some(sequence) => {
                debug!("Cancelled {:?} sequence", sequence.kind());
                true
            }
            None => false,
        }
    }

    pub fn set_winner(&mut self, winner: Winner) {
        debug!("Winner set to {:?}", winner);
        self.winner = winner;
    }

    pub fn winner(&self) -> Winner {
        self.winner
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn max_game_time(&self) -> MaxGameTime {
        self.max_game_time
    }

    pub fn countdown_message(&self) -> &str {
        &self.countdown_message
    }

    pub fn remaining_time(&self) -> f32 {
        self.remaining
    }

    /// Remaining time rounded half away from zero
    pub fn remaining_whole_seconds(&self) -> i32 {
        self.remaining.round() as i32
    }

    pub fn is_counting_down(&self) -> bool {
        self.state == RoundState::InCountdown
    }

    pub fn is_timer_running(&self) -> bool {
        self.state == RoundState::TimerRunning
    }

    pub fn is_timer_expired(&self) -> bool {
        self.state == RoundState::TimerExpired
    }

    pub fn is_game_over(&self) -> bool {
        self.state == RoundState::GameOver
    }

    pub fn active_sequence(&self) -> Option<SequenceKind> {
        self.sequence.as_ref().map(Sequence::kind)
    }

    pub fn has_active_sequence(&self) -> bool {
        self.sequence.is_some()
    }

    pub fn status(&self) -> RoundStatus {
        RoundStatus {
            state: self.state,
            max_game_time: self.max_game_time(),
            countdown_message: self.countdown_message.clone(),
            remaining_time: self.remaining,
            remaining_whole_seconds: self.remaining_whole_seconds(),
            winner: self.winner,
            sequence_active: self.sequence.is_some(),
        }
    }

    fn expire(&mut self) {
        self.state = RoundState::TimerExpired;
        self.emit(TimerEvent::GameEnd);

        if self.auto_close {
            debug!("Chaining closing sequence after expiry");
            self.sequence = Some(Sequence::closing(self.step_delay));
        }
    }

    fn drive_sequence(&mut self) {
        while let Some(step) = self.sequence.as_mut().and_then(Sequence::poll) {
            debug!("Running {:?} step {:?}", step.kind(), step);
            match self.run_step(step) {
                Some(next) => {
                    if let Some(sequence) = self.sequence.as_mut() {
                        sequence.resume_after(next, self.step_delay);
                    }
                }
                None => self.sequence = None,
            }
        }
    }

    /// Run one step and return the step that follows it
    fn run_step(&mut self, step: SequenceStep) -> Option<SequenceStep> {
        match step {
            SequenceStep::Count(n) => {
                self.show_countdown(n.to_string());
                Some(if n > 1 {
                    SequenceStep::Count(n - 1)
                } else {
                    SequenceStep::StartMessage
                })
            }
            SequenceStep::StartMessage => {
                self.show_countdown(self.start_message.clone());
                Some(SequenceStep::Begin)
            }
            SequenceStep::Begin => {
                self.countdown_message.clear();
                self.state = RoundState::TimerRunning;
                info!("Countdown complete, timer running");
                self.emit(TimerEvent::GameStart);
                None
            }
            SequenceStep::AnnounceWinner => {
                info!("Announcing winner: {:?}", self.winner);
                self.emit(TimerEvent::GameWinner {
                    winner: self.winner,
                });
                Some(SequenceStep::Close)
            }
            SequenceStep::Close => {
                self.state = RoundState::GameOver;
                info!("Round over");
                self.emit(TimerEvent::GameClose);
                None
            }
        }
    }

    fn show_countdown(&mut self, message: String) {
        self.countdown_message = message.clone();
        self.emit(TimerEvent::CountDown { message });
    }

    fn emit(&mut self, event: TimerEvent) {
        trace!("Emitting {:?}", event);
        self.listeners.dispatch(&event);
    }
}
