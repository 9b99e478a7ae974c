use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::config::TICK_RATES;

/// How often the reader thread checks whether it should stop.
const READER_POLL: Duration = Duration::from_millis(50);

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum HostEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<HostEvent, RecvTimeoutError>;

    /// Stop producing events. Called once by [`Runner::shutdown`].
    fn shutdown(&mut self) {}
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<HostEvent>,
    stop: Arc<AtomicBool>,
    reader: Option<JoinHandle<()>>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let reader_stop = Arc::clone(&stop);

        let reader = thread::spawn(move || {
            while !reader_stop.load(Ordering::Relaxed) {
                match event::poll(READER_POLL) {
                    Ok(false) => continue,
                    Ok(true) => {}
                    Err(err) => {
                        log::warn!("terminal poll failed: {err}");
                        break;
                    }
                }
                let evt = match event::read() {
                    Ok(CtEvent::Key(key)) => HostEvent::Key(key),
                    Ok(CtEvent::Resize(_, _)) => HostEvent::Resize,
                    Ok(_) => continue,
                    Err(err) => {
                        log::warn!("terminal read failed: {err}");
                        break;
                    }
                };
                if tx.send(evt).is_err() {
                    break;
                }
            }
            log::debug!("input reader stopped");
        });

        Self {
            rx,
            stop,
            reader: Some(reader),
        }
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

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(reader) = self.reader.take() {
            if reader.join().is_err() {
                log::warn!("input reader panicked");
            }
        }
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// `1000 / ticks_per_second` milliseconds, with the rate clamped to
    /// [`TICK_RATES`] so the interval is never zero.
    pub fn from_tick_rate(ticks_per_second: u32) -> Self {
        let rate = ticks_per_second.clamp(*TICK_RATES.start(), *TICK_RATES.end());
        Self::new(Duration::from_millis(1000 / u64::from(rate)))
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
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

/// Runner that advances the application one event/tick at a time.
///
/// Ticks fire on a fixed schedule: keystrokes arriving between two ticks do
/// not push the next tick back.
pub struct Runner<E: EventSource, T: Ticker> {
    event_source: E,
    ticker: T,
    next_tick: Instant,
    stopped: bool,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        let next_tick = Instant::now() + ticker.interval();
        log::info!("runner started, tick every {:?}", ticker.interval());
        Self {
            event_source,
            ticker,
            next_tick,
            stopped: false,
        }
    }

    /// Blocks until the next event or the next tick deadline, whichever is first.
    pub fn step(&mut self) -> HostEvent {
        let now = Instant::now();
        if now >= self.next_tick {
            return self.fire_tick(now);
        }

        match self.event_source.recv_timeout(self.next_tick - now) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => self.fire_tick(Instant::now()),
            Err(RecvTimeoutError::Disconnected) => {
                // nothing left to read; keep ticking on schedule
                thread::sleep(self.next_tick.saturating_duration_since(Instant::now()));
                self.fire_tick(Instant::now())
            }
        }
    }

    /// Stop the event source. Idempotent.
    pub fn shutdown(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        self.event_source.shutdown();
        log::info!("runner shut down");
    }

    fn fire_tick(&mut self, now: Instant) -> HostEvent {
        self.next_tick += self.ticker.interval();
        if self.next_tick <= now {
            // fell behind (suspended terminal, slow draw): resync instead of bursting
            self.next_tick = now + self.ticker.interval();
        }
        HostEvent::Tick
    }
}

impl<E: EventSource, T: Ticker> Drop for Runner<E, T> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// The key identifier handed to the engine, if the event is a plain
/// character press. Control and Alt chords are commands, not typing.
pub fn key_identifier(key: &KeyEvent) -> Option<String> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }
    match key.code {
        KeyCode::Char(c) => Some(c.to_string()),
        _ => None,
    }
}
