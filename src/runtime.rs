use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum TypeEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<TypeEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<TypeEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    if tx.send(TypeEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(TypeEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(%err, "terminal event reader stopped");
                    break;
                }
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<TypeEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<TypeEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<TypeEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<TypeEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// A periodic tick source that can be switched on and off.
///
/// At most one schedule is live at a time: `start` on an active source
/// restarts it rather than adding a second one.
pub trait TickSource {
    fn start(&mut self);
    fn stop(&mut self);
    fn is_active(&self) -> bool;
    /// Called once per delivered tick so the next one can be scheduled
    fn acknowledge(&mut self);
    /// When the next tick is due, if the source is active
    fn deadline(&self) -> Option<Instant> {
        None
    }
}

/// Wall-clock tick source firing once per `interval`
#[derive(Clone, Copy, Debug)]
pub struct Metronome {
    interval: Duration,
    next: Option<Instant>,
}

impl Metronome {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl TickSource for Metronome {
    fn start(&mut self) {
        self.next = Some(Instant::now() + self.interval);
    }

    fn stop(&mut self) {
        self.next = None;
    }

    fn is_active(&self) -> bool {
        self.next.is_some()
    }

    fn acknowledge(&mut self) {
        // scheduled from the previous deadline so slow frames do not stretch the round
        if let Some(next) = self.next {
            self.next = Some(next + self.interval);
        }
    }

    fn deadline(&self) -> Option<Instant> {
        self.next
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: EventSource> {
    event_source: E,
    idle_poll: Duration,
}

impl<E: EventSource> Runner<E> {
    pub fn new(event_source: E, idle_poll: Duration) -> Self {
        Self {
            event_source,
            idle_poll,
        }
    }

    /// Blocks until the next event, or returns Tick once `deadline` has passed.
    /// Without a deadline it waits for input only. Returns None when the
    /// event source has gone away.
    pub fn step(&self, deadline: Option<Instant>) -> Option<TypeEvent> {
        loop {
            let timeout = match deadline {
                Some(due) => {
                    let now = Instant::now();
                    if now >= due {
                        return Some(TypeEvent::Tick);
                    }
                    due - now
                }
                None => self.idle_poll,
            };

            match self.event_source.recv_timeout(timeout) {
                Ok(ev) => return Some(ev),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return None,
            }
        }
    }
}
