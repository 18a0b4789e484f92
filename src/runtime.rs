use std::cell::Cell;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// Millisecond time source driving widget deadlines
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Wall clock measured from construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Hand-advanced clock for tests
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum HostEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<HostEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<HostEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                Ok(CtEvent::Key(key)) => HostEvent::Key(key),
                Ok(CtEvent::Resize(cols, rows)) => HostEvent::Resize(cols, rows),
                Ok(_) => continue,
                Err(e) => {
                    log::warn!("terminal event reader stopped: {e}");
                    break;
                }
            };
            if tx.send(evt).is_err() {
                break;
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
    fn recv_timeout(&self, timeout: Duration) -> Result<HostEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<HostEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<HostEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<HostEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that waits for the next event or the next widget deadline
pub struct Runner<E: EventSource> {
    event_source: E,
    max_idle: Duration,
}

impl<E: EventSource> Runner<E> {
    pub fn new(event_source: E, max_idle: Duration) -> Self {
        Self {
            event_source,
            max_idle,
        }
    }

    /// How long to block given the earliest deadline, capped by `max_idle`
    pub fn wait_for(&self, now_ms: u64, deadline: Option<u64>) -> Duration {
        match deadline {
            Some(due) => Duration::from_millis(due.saturating_sub(now_ms)).min(self.max_idle),
            None => self.max_idle,
        }
    }

    /// Blocks until an event arrives or the wait elapses, returning Tick on timeout
    pub fn step(&self, now_ms: u64, deadline: Option<u64>) -> HostEvent {
        match self.event_source.recv_timeout(self.wait_for(now_ms, deadline)) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => HostEvent::Tick,
        }
    }
}
