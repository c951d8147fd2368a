//! Time management utilities
//!
//! [`Timer`] measures wall-clock frame time for the frame driver.
//! [`FrameClock`] is the per-scene clock scripts observe: it is advanced once
//! per tick with whatever delta the driver decided on, and hands out
//! [`FrameTime`] snapshots.

use std::time::{Duration, Instant};

/// Default weight given to the newest sample in the smoothed FPS average
pub const DEFAULT_FPS_SMOOTHING: f32 = 0.1;

/// High-precision timer for frame timing
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            delta_time: 0.0,
        }
    }

    /// Update the timer (should be called once per frame)
    pub fn update(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.delta_time = elapsed.as_secs_f32();
        self.last_frame = now;
    }

    /// Restart measuring from now
    pub fn reset_frame(&mut self) {
        self.last_frame = Instant::now();
        self.delta_time = 0.0;
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
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

    /// Get the elapsed time
    pub fn elapsed(&self) -> Duration {
        let current_elapsed = self.start_time.map_or(Duration::ZERO, |start| start.elapsed());
        self.elapsed + current_elapsed
    }

    /// Get the elapsed time in milliseconds
    pub fn elapsed_millis(&self) -> f32 {
        self.elapsed().as_secs_f32() * 1000.0
    }
}

/// Timing information for the frame currently being dispatched.
///
/// Copied into every lifecycle call's context, so components can keep it
/// around without borrowing the scene.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    /// Seconds elapsed since the previous frame
    pub delta_time: f32,

    /// Smoothed frames per second
    pub fps: f32,

    /// Number of frames ticked so far, including this one
    pub frame_count: u64,

    /// Sum of all deltas since the last reset, in seconds
    pub elapsed: f64,
}

/// Frame clock advanced by the scene once per tick.
#[derive(Debug, Clone)]
pub struct FrameClock {
    current: FrameTime,
    smoothing: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_FPS_SMOOTHING)
    }
}

impl FrameClock {
    /// Create a clock; `smoothing` is the weight of the newest FPS sample, in `(0, 1]`
    pub fn new(smoothing: f32) -> Self {
        let smoothing = if smoothing.is_finite() && smoothing > 0.0 {
            smoothing.min(1.0)
        } else {
            log::warn!("Invalid FPS smoothing factor {smoothing}, using {DEFAULT_FPS_SMOOTHING}");
            DEFAULT_FPS_SMOOTHING
        };

        Self {
            current: FrameTime::default(),
            smoothing,
        }
    }

    /// Forget all accumulated timing
    pub fn reset(&mut self) {
        self.current = FrameTime::default();
    }

    /// Advance by one frame of `delta_time` seconds and return the new snapshot.
    ///
    /// Negative or non-finite deltas are treated as zero. A zero delta leaves
    /// the FPS estimate untouched.
    pub fn advance(&mut self, delta_time: f32) -> FrameTime {
        let delta_time = if delta_time.is_finite() && delta_time >= 0.0 {
            delta_time
        } else {
            log::warn!("Frame delta {delta_time} is not a non-negative number, clamping to 0");
            0.0
        };

        if delta_time > 0.0 {
            let instantaneous = 1.0 / delta_time;
            self.current.fps = if self.current.fps > 0.0 {
                self.current.fps + self.smoothing * (instantaneous - self.current.fps)
            } else {
                instantaneous
            };
        }

        self.current.delta_time = delta_time;
        self.current.frame_count += 1;
        self.current.elapsed += f64::from(delta_time);
        self.current
    }

    /// Snapshot of the most recent frame
    pub fn now(&self) -> FrameTime {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_first_frame_seeds_fps() {
        let mut clock = FrameClock::new(0.5);
        let time = clock.advance(0.02);

        assert_relative_eq!(time.delta_time, 0.02);
        assert_relative_eq!(time.fps, 50.0, epsilon = 1e-3);
        assert_eq!(time.frame_count, 1);
    }

    #[test]
    fn test_fps_is_exponentially_smoothed() {
        let mut clock = FrameClock::new(0.5);
        clock.advance(0.02); // 50 fps
        let time = clock.advance(0.01); // 100 fps instantaneous

        assert_relative_eq!(time.fps, 75.0, epsilon = 1e-3);
        assert_relative_eq!(time.elapsed, 0.03, epsilon = 1e-6);
    }

    #[test]
    fn test_negative_delta_is_clamped() {
        let mut clock = FrameClock::default();
        clock.advance(0.016);
        let fps_before = clock.now().fps;
        let time = clock.advance(-1.0);

        assert_eq!(time.delta_time, 0.0);
        assert_eq!(time.fps, fps_before);
        assert_eq!(time.frame_count, 2);
    }

    #[test]
    fn test_reset_clears_history() {
        let mut clock = FrameClock::default();
        clock.advance(0.016);
        clock.reset();

        assert_eq!(clock.now(), FrameTime::default());
    }

    #[test]
    fn test_invalid_smoothing_falls_back_to_default() {
        let mut clock = FrameClock::new(f32::NAN);
        clock.advance(0.1);
        let time = clock.advance(0.05);

        let expected = 10.0 + DEFAULT_FPS_SMOOTHING * (20.0 - 10.0);
        assert_relative_eq!(time.fps, expected, epsilon = 1e-3);
    }
}
