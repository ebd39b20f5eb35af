//! Configuration and CLI argument handling

use std::time::Duration;
use clap::Parser;

use crate::{state::MaxGameTime, timer::RoundConfig};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "minigame-timer")]
#[command(about = "A countdown and round timer for timed mini-games, controlled over HTTP")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Round length in seconds (30 or 60)
    #[arg(short, long, default_value = "30")]
    pub max_time: MaxGameTime,

    /// Message shown after the 3-2-1 countdown
    #[arg(long, default_value = "GO!")]
    pub start_message: String,

    /// Pause between countdown and closing steps, in milliseconds
    #[arg(long, default_value = "1000")]
    pub step_delay_ms: u64,

    /// Frames per second driven by the game loop
    #[arg(long, default_value = "60", value_parser = clap::value_parser!(u32).range(1..=1000))]
    pub frame_rate: u32,

    /// Start the countdown as soon as the server is up
    #[arg(long)]
    pub auto_start: bool,

    /// Announce the winner and close the round automatically once the timer expires
    #[arg(long)]
    pub auto_close: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Round settings derived from the CLI
    pub fn round_config(&self) -> RoundConfig {
        RoundConfig {
            max_game_time: self.max_time,
            start_message: self.start_message.clone(),
            step_delay: Duration::from_millis(self.step_delay_ms),
            auto_close: self.auto_close,
        }
    }

    /// Time between game loop frames
    pub fn frame_interval(&self) -> Duration {
        Duration::from_micros(1_000_000 / u64::from(self.frame_rate.max(1)))
    }
}
