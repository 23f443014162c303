//! Frame timing for FPS reporting.
//!
//! The simulation itself is frame-stepped (velocities are in units per
//! frame), so time here is only observed, never fed back into the update.

use std::time::{Duration, Instant};

/// Counts frames and measures FPS over fixed intervals.
#[derive(Debug)]
pub struct FrameClock {
    /// Total frames since start.
    frame_count: u64,
    /// Frames since the last measurement.
    frames_since_report: u64,
    /// Start of the current measurement interval.
    report_start: Instant,
    /// How often to publish a measurement.
    report_interval: Duration,
}

impl FrameClock {
    /// Create a clock starting now, reporting every 500 ms.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Create a clock whose first interval begins at `now`.
    pub fn starting_at(now: Instant) -> Self {
        Self {
            frame_count: 0,
            frames_since_report: 0,
            report_start: now,
            report_interval: Duration::from_millis(500),
        }
    }

    /// Record a frame. Returns a fresh FPS value when an interval completes.
    pub fn tick(&mut self) -> Option<f32> {
        self.tick_at(Instant::now())
    }

    /// Record a frame observed at `now`.
    pub fn tick_at(&mut self, now: Instant) -> Option<f32> {
        self.frame_count += 1;
        self.frames_since_report += 1;

        let elapsed = now.saturating_duration_since(self.report_start);
        if elapsed < self.report_interval {
            return None;
        }

        let fps = self.frames_since_report as f32 / elapsed.as_secs_f32();
        self.frames_since_report = 0;
        self.report_start = now;
        Some(fps)
    }

    /// Total frames recorded.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
