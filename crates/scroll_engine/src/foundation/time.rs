//! Time management utilities
//!
//! Simulation time is measured in fixed ticks; wall-clock time only matters
//! for diagnostics (how long a streaming batch or a run took).

use std::time::{Duration, Instant};

/// Fixed-rate tick counter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickClock {
    tick_rate: f32,
    ticks: u64,
}

impl TickClock {
    /// Create a clock ticking `tick_rate` times per simulated second
    pub fn new(tick_rate: f32) -> Self {
        debug_assert!(tick_rate > 0.0, "tick rate must be positive");
        Self { tick_rate, ticks: 0 }
    }

    /// Advance by one tick
    pub fn advance(&mut self) {
        self.ticks += 1;
    }

    /// Number of ticks elapsed
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Length of one tick in seconds
    pub fn step_seconds(&self) -> f32 {
        1.0 / self.tick_rate
    }

    /// Simulated seconds elapsed
    pub fn seconds(&self) -> f64 {
        self.ticks as f64 / f64::from(self.tick_rate)
    }

    /// Change the rate, keeping the tick count (used when a config snapshot is swapped)
    pub fn set_tick_rate(&mut self, tick_rate: f32) {
        debug_assert!(tick_rate > 0.0, "tick rate must be positive");
        self.tick_rate = tick_rate;
    }
}

/// Simple stopwatch for measuring elapsed time
pub struct Stopwatch {
    start_time: Option<Instant>,
    elapsed: Duration,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    /// Create a new stopped stopwatch
    pub fn new() -> Self {
        Self {
            start_time: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Create a new stopwatch and start it immediately
    pub fn start_new() -> Self {
        let mut stopwatch = Self::new();
        stopwatch.start();
        stopwatch
    }

    /// Start the stopwatch
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Stop the stopwatch and accumulate elapsed time
    pub fn stop(&mut self) {
        if let Some(start) = self.start_time {
            self.elapsed += start.elapsed();
            self.start_time = None;
        }
    }

    /// Get the elapsed time
    pub fn elapsed(&self) -> Duration {
        let current_elapsed = self.start_time.map_or(Duration::ZERO, |start| start.elapsed());
        self.elapsed + current_elapsed
    }
}
