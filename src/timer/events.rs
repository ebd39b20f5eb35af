//! Timer notifications and the listener registry that delivers them
//!
//! Listeners are kept in registration order and invoked in that order for
//! every matching event. A listener can remove itself mid-dispatch by
//! returning [`ListenerControl::Unsubscribe`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::state::Winner;

/// Notification kinds, listed in order of first occurrence within a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    TimerInit,
    CountDown,
    GameStart,
    TimeUpdate,
    TimeUpdateWhole,
    GameEnd,
    GameWinner,
    GameClose,
}

/// A notification emitted by the timer state machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TimerEvent {
    /// Starting time in whole seconds, sent once at construction
    TimerInit { seconds: i32 },
    /// "3", "2", "1", then the start message
    CountDown { message: String },
    GameStart,
    /// Remaining time, sent on every running tick
    TimeUpdate { remaining: f32 },
    /// Remaining whole seconds, sent only when the rounded value changes
    TimeUpdateWhole { remaining: i32 },
    GameEnd,
    GameWinner { winner: Winner },
    GameClose,
}

impl TimerEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            TimerEvent::TimerInit { .. } => EventKind::TimerInit,
            TimerEvent::CountDown { .. } => EventKind::CountDown,
            TimerEvent::GameStart => EventKind::GameStart,
            TimerEvent::TimeUpdate { .. } => EventKind::TimeUpdate,
            TimerEvent::TimeUpdateWhole { .. } => EventKind::TimeUpdateWhole,
            TimerEvent::GameEnd => EventKind::GameEnd,
            TimerEvent::GameWinner { .. } => EventKind::GameWinner,
            TimerEvent::GameClose => EventKind::GameClose,
        }
    }
}

/// Consumer-side hooks, one per notification. Every hook defaults to a no-op.
pub trait TimerObserver {
    fn on_timer_init(&mut self, _seconds: i32) {}
    fn on_count_down(&mut self, _message: &str) {}
    fn on_game_start(&mut self) {}
    fn on_time_update(&mut self, _remaining: f32) {}
    /// Called at most once per whole second
    fn on_time_update_whole(&mut self, _remaining: i32) {}
    fn on_game_end(&mut self) {}
    fn on_game_winner(&mut self, _winner: Winner) {}
    fn on_game_close(&mut self) {}

    /// Route an event to the matching hook
    fn on_event(&mut self, event: &TimerEvent) {
        match event {
            TimerEvent::TimerInit { seconds } => self.on_timer_init(*seconds),
            TimerEvent::CountDown { message } => self.on_count_down(message),
            TimerEvent::GameStart => self.on_game_start(),
            TimerEvent::TimeUpdate { remaining } => self.on_time_update(*remaining),
            TimerEvent::TimeUpdateWhole { remaining } => self.on_time_update_whole(*remaining),
            TimerEvent::GameEnd => self.on_game_end(),
            TimerEvent::GameWinner { winner } => self.on_game_winner(*winner),
            TimerEvent::GameClose => self.on_game_close(),
        }
    }
}

/// Returned by a listener to stay registered or drop itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerControl {
    Keep,
    Unsubscribe,
}

/// Handle identifying a registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Which notifications a listener receives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interest {
    Only(EventKind),
    All,
}

impl Interest {
    fn matches(self, kind: EventKind) -> bool {
        match self {
            Interest::Only(wanted) => wanted == kind,
            Interest::All => true,
        }
    }
}

type Callback = Box<dyn FnMut(&TimerEvent) -> ListenerControl + Send>;

struct Listener {
    id: ListenerId,
    interest: Interest,
    callback: Callback,
}

/// Ordered registry of notification listeners
#[derive(Default)]
pub struct ListenerRegistry {
    next_id: u64,
    listeners: Vec<Listener>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen to one kind of notification
    pub fn subscribe<F>(&mut self, kind: EventKind, mut callback: F) -> ListenerId
    where
        F: FnMut(&TimerEvent) + Send + 'static,
    {
        self.register(
            Interest::Only(kind),
            Box::new(move |event| {
                callback(event);
                ListenerControl::Keep
            }),
        )
    }

    /// Listen to one kind of notification; the callback decides whether to stay registered
    pub fn subscribe_with_control<F>(&mut self, kind: EventKind, callback: F) -> ListenerId
    where
        F: FnMut(&TimerEvent) -> ListenerControl + Send + 'static,
    {
        self.register(Interest::Only(kind), Box::new(callback))
    }

    /// Listen to every notification
    pub fn subscribe_all<F>(&mut self, mut callback: F) -> ListenerId
    where
        F: FnMut(&TimerEvent) + Send + 'static,
    {
        self.register(
            Interest::All,
            Box::new(move |event| {
                callback(event);
                ListenerControl::Keep
            }),
        )
    }

    /// Attach an observer to every notification
    pub fn attach<O>(&mut self, mut observer: O) -> ListenerId
    where
        O: TimerObserver + Send + 'static,
    {
        self.subscribe_all(move |event| observer.on_event(event))
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|listener| listener.id != id);
        self.listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Deliver an event to every matching listener in registration order
    pub fn dispatch(&mut self, event: &TimerEvent) {
        let kind = event.kind();
        self.listeners.retain_mut(|listener| {
            if !listener.interest.matches(kind) {
                return true;
            }
            (listener.callback)(event) == ListenerControl::Keep
        });
    }

    fn register(&mut self, interest: Interest, callback: Callback) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push(Listener {
            id,
            interest,
            callback,
        });
        id
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.listeners.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}
