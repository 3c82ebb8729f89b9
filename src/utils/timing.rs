//! Timing utilities for measuring and formatting durations

use std::time::{Duration, Instant};

/// A simple timer for measuring elapsed time
#[derive(Debug, Clone)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Create a new timer that starts immediately
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::start()
    }
}

/// Format a duration into a human-readable string
///
/// - Durations >= 1 second: "1.23s"
/// - Durations >= 1 millisecond: "456ms"
/// - Durations < 1 millisecond: "< 1ms"
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();

    if millis == 0 {
        "< 1ms".to_string()
    } else if millis >= 1000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        format!("{}ms", millis)
    }
}

/// Duration of one stage of a scan run (scan, audit, export)
#[derive(Debug, Clone)]
pub struct StageTiming {
    pub name: &'static str,
    pub duration: Duration,
}

/// Stage timings for a whole run, in execution order
#[derive(Debug, Clone, Default)]
pub struct RunTiming {
    stages: Vec<StageTiming>,
}

impl RunTiming {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished stage
    pub fn record(&mut self, name: &'static str, timer: &Timer) {
        self.stages.push(StageTiming {
            name,
            duration: timer.elapsed(),
        });
    }

    pub fn stages(&self) -> &[StageTiming] {
        &self.stages
    }

    /// Sum of all recorded stages
    pub fn total(&self) -> Duration {
        self.stages.iter().map(|s| s.duration).sum()
    }
}
