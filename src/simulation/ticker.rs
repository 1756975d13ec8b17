//! Tick scheduling
//!
//! The simulation is driven by a [`Ticker`]: the driver asks for the next tick,
//! the ticker blocks until it is due. Swapping the wall-clock ticker for a
//! [`ManualTicker`] runs the same loop without sleeping.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Longest single sleep, so cancellation is noticed promptly
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Source of simulation ticks
pub trait Ticker {
    /// Block until the next tick is due.
    /// Returns `false` once the ticker has been cancelled or is exhausted.
    fn next_tick(&mut self) -> bool;
}

/// Cancels a ticker, possibly from another thread
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Wall-clock ticker with a fixed interval.
///
/// The first tick fires immediately, later ones on fixed deadlines. A tick
/// that is overdue fires at once and the schedule restarts from it, so a
/// stall never produces a burst of catch-up ticks.
pub struct IntervalTicker {
    interval: Duration,
    next_deadline: Option<Instant>,
    max_ticks: Option<u64>,
    fired: u64,
    stop: StopHandle,
}

impl IntervalTicker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_deadline: None,
            max_ticks: None,
            fired: 0,
            stop: StopHandle::new(),
        }
    }

    /// Stop after `max_ticks` ticks
    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }

    /// Handle that cancels this ticker
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn ticks_fired(&self) -> u64 {
        self.fired
    }

    fn wait_until(&self, deadline: Instant) -> bool {
        loop {
            if self.stop.is_stopped() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            std::thread::sleep((deadline - now).min(STOP_POLL_INTERVAL));
        }
    }
}

impl Ticker for IntervalTicker {
    fn next_tick(&mut self) -> bool {
        if self.stop.is_stopped() {
            return false;
        }
        if self.max_ticks.map_or(false, |max| self.fired >= max) {
            return false;
        }

        if let Some(deadline) = self.next_deadline {
            if !self.wait_until(deadline) {
                return false;
            }
        }

        let now = Instant::now();
        let next = match self.next_deadline {
            Some(deadline) if deadline + self.interval > now => deadline + self.interval,
            _ => now + self.interval,
        };
        self.next_deadline = Some(next);
        self.fired += 1;
        true
    }
}

/// Ticker that fires a fixed number of ticks without waiting
#[derive(Debug, Clone)]
pub struct ManualTicker {
    remaining: u64,
    fired: u64,
}

impl ManualTicker {
    pub fn new(ticks: u64) -> Self {
        Self {
            remaining: ticks,
            fired: 0,
        }
    }

    pub fn ticks_fired(&self) -> u64 {
        self.fired
    }
}

impl Ticker for ManualTicker {
    fn next_tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.fired += 1;
        true
    }
}
