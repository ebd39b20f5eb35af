//! Round phase, duration class, winner tag and the published status snapshot

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::timer::TimerError;

/// Phase of a round. Transitions only move forward through the declared order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundState {
    NotStarted,
    InCountdown,
    TimerRunning,
    TimerExpired,
    GameOver,
}

impl fmt::Display for RoundState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoundState::NotStarted => "not started",
            RoundState::InCountdown => "in countdown",
            RoundState::TimerRunning => "timer running",
            RoundState::TimerExpired => "timer expired",
            RoundState::GameOver => "game over",
        };
        f.write_str(name)
    }
}

/// Supported round lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MaxGameTime {
    #[default]
    Seconds30,
    Seconds60,
}

impl MaxGameTime {
    /// Starting time of the round in whole seconds
    pub fn seconds(self) -> u32 {
        match self {
            MaxGameTime::Seconds30 => 30,
            MaxGameTime::Seconds60 => 60,
        }
    }
}

impl TryFrom<u64> for MaxGameTime {
    type Error = TimerError;

    fn try_from(seconds: u64) -> Result<Self, Self::Error> {
        match seconds {
            30 => Ok(MaxGameTime::Seconds30),
            60 => Ok(MaxGameTime::Seconds60),
            other => Err(TimerError::UnsupportedDuration(other)),
        }
    }
}

impl FromStr for MaxGameTime {
    type Err = TimerError;

    /// Accepts `30`, `60`, and the same values with an `s` suffix
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_suffix('s').unwrap_or(trimmed);
        let seconds: u64 = digits
            .parse()
            .map_err(|_| TimerError::InvalidDuration(s.to_string()))?;
        MaxGameTime::try_from(seconds)
    }
}

impl fmt::Display for MaxGameTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.seconds())
    }
}

/// Result tag set by external win-condition logic before the round closes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    #[default]
    Unset,
    PlayerOne,
    PlayerTwo,
    Tie,
}

/// Read-only snapshot of a round, published after every frame and command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundStatus {
    pub state: RoundState,
    pub max_game_time: MaxGameTime,
    pub countdown_message: String,
    pub remaining_time: f32,
    pub remaining_whole_seconds: i32,
    pub winner: Winner,
    pub sequence_active: bool,
}

impl RoundStatus {
    pub fn is_counting_down(&self) -> bool {
        self.state == RoundState::InCountdown
    }

    pub fn is_timer_running(&self) -> bool {
        self.state == RoundState::TimerRunning
    }

    pub fn is_timer_expired(&self) -> bool {
        self.state == RoundState::TimerExpired
    }
}
