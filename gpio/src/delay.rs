//! Blocking waits used for enable pulses and controller settle times.
//!
//! Protocol code never sleeps directly; it takes any [DelayNs], so the timing can be swapped for
//! [NoDelay] or [RecordingDelay] without touching the protocol.
use embedded_hal::delay::DelayNs;
use std::thread::sleep;
use std::time::Duration;

/// Wall-clock delay using [std::thread::sleep]. Not interruptible.
#[derive(Debug, Default, Copy, Clone)]
pub struct ThreadSleep;

impl DelayNs for ThreadSleep {
    fn delay_ns(&mut self, ns: u32) {
        sleep(Duration::from_nanos(ns.into()));
    }

    fn delay_us(&mut self, us: u32) {
        sleep(Duration::from_micros(us.into()));
    }

    fn delay_ms(&mut self, ms: u32) {
        sleep(Duration::from_millis(ms.into()));
    }
}

/// Returns immediately.
#[derive(Debug, Default, Copy, Clone)]
pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_us(&mut self, _us: u32) {}

    fn delay_ms(&mut self, _ms: u32) {}
}

/// Returns immediately, but remembers every requested wait as one entry.
#[derive(Debug, Default, Clone)]
pub struct RecordingDelay {
    delays: Vec<Duration>,
}

impl RecordingDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delays(&self) -> &[Duration] {
        &self.delays
    }

    /// Sum of all requested durations.
    pub fn total(&self) -> Duration {
        self.delays.iter().sum()
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.delays.push(Duration::from_nanos(ns.into()));
    }

    fn delay_us(&mut self, us: u32) {
        self.delays.push(Duration::from_micros(us.into()));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delays.push(Duration::from_millis(ms.into()));
    }
}
