//! Game loop background task
//!
//! Owns the round's state machine, feeds it frame deltas, applies commands
//! from the API, and publishes status snapshots and events.

use std::time::Duration;
use tokio::{
    sync::{broadcast, mpsc, oneshot, watch},
    time::{interval, Instant, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::{
    state::{RoundStatus, Winner},
    timer::{ListenerRegistry, RoundConfig, RoundError, TimerEvent, TimerStateMachine},
};

/// Commands accepted by the game loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundCommand {
    Start,
    Stop,
    Close,
    SetWinner(Winner),
}

/// Result of applying a command
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutcome {
    /// False when the command was ignored in the current phase
    pub accepted: bool,
    pub status: RoundStatus,
}

#[derive(Debug)]
struct CommandRequest {
    command: RoundCommand,
    reply: oneshot::Sender<CommandOutcome>,
}

/// Cloneable handle used by consumers to reach the running round
#[derive(Debug, Clone)]
pub struct RoundHandle {
    command_tx: mpsc::Sender<CommandRequest>,
    status_rx: watch::Receiver<RoundStatus>,
    event_tx: broadcast::Sender<TimerEvent>,
}

impl RoundHandle {
    /// Send a command and wait for the loop to apply it
    pub async fn send(&self, command: RoundCommand) -> Result<CommandOutcome, RoundError> {
        let (reply, outcome) = oneshot::channel();
        self.command_tx
            .send(CommandRequest { command, reply })
            .await
            .map_err(|_| RoundError::LoopClosed)?;
        outcome.await.map_err(|_| RoundError::LoopClosed)
    }

    /// Latest published status
    pub fn status(&self) -> RoundStatus {
        self.status_rx.borrow().clone()
    }

    pub fn watch_status(&self) -> watch::Receiver<RoundStatus> {
        self.status_rx.clone()
    }

    /// Receive events emitted from now on
    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.event_tx.subscribe()
    }
}

/// Host driver for a single round
pub struct GameLoop {
    machine: TimerStateMachine,
    command_rx: mpsc::Receiver<CommandRequest>,
    status_tx: watch::Sender<RoundStatus>,
    frame_interval: Duration,
}

impl GameLoop {
    /// Build the round. Receivers subscribed to `event_tx` beforehand also see `TimerInit`.
    pub fn new(
        config: RoundConfig,
        frame_interval: Duration,
        event_tx: broadcast::Sender<TimerEvent>,
    ) -> (Self, RoundHandle) {
        let mut listeners = ListenerRegistry::new();
        let forward_tx = event_tx.clone();
        listeners.subscribe_all(move |event| {
            // No receivers is fine; the round runs whether or not anyone listens
            let _ = forward_tx.send(event.clone());
        });

        let machine = TimerStateMachine::new(config, listeners);
        let (command_tx, command_rx) = mpsc::channel(32);
        let (status_tx, status_rx) = watch::channel(machine.status());

        let game_loop = Self {
            machine,
            command_rx,
            status_tx,
            frame_interval,
        };
        let handle = RoundHandle {
            command_tx,
            status_rx,
            event_tx,
        };
        (game_loop, handle)
    }

    /// Run frames until the round is over or every handle is dropped
    pub async fn run(mut self) {
        info!("Starting game loop at {:?} per frame", self.frame_interval);

        let mut frames = interval(self.frame_interval);
        frames.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_frame = Instant::now();

        loop {
            tokio::select! {
                _ = frames.tick() => {
                    self.catch_up(&mut last_frame);
                    self.publish();

                    if self.machine.is_game_over() {
                        info!("Round is over, stopping game loop");
                        break;
                    }
                }

                request = self.command_rx.recv() => {
                    match request {
                        Some(CommandRequest { command, reply }) => {
                            // Commands land on the current instant, not the last frame
                            self.catch_up(&mut last_frame);
                            let accepted = self.apply(command);
                            let status = self.publish();
                            if reply.send(CommandOutcome { accepted, status }).is_err() {
                                debug!("Command sender went away before the reply");
                            }
                            if self.machine.is_game_over() {
                                info!("Round is over, stopping game loop");
                                break;
                            }
                        }
                        None => {
                            info!("All round handles dropped, stopping game loop");
                            break;
                        }
                    }
                }
            }
        }

        if self.machine.cancel_sequence() {
            warn!("Game loop stopped with a sequence still running");
        }
    }

    /// Feed the machine the time elapsed since `last_frame`
    fn catch_up(&mut self, last_frame: &mut Instant) {
        let now = Instant::now();
        let delta = now.duration_since(*last_frame).as_secs_f32();
        *last_frame = now;
        self.machine.update(delta);
    }

    fn apply(&mut self, command: RoundCommand) -> bool {
        debug!("Applying command {:?}", command);
        match command {
            RoundCommand::Start => self.machine.start(),
            RoundCommand::Stop => self.machine.stop(),
            RoundCommand::Close => self.machine.close(),
            RoundCommand::SetWinner(winner) => {
                self.machine.set_winner(winner);
                true
            }
        }
    }

    fn publish(&self) -> RoundStatus {
        let status = self.machine.status();
        self.status_tx.send_replace(status.clone());
        status
    }
}
