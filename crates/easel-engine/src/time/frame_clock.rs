use std::time::{Duration, Instant};

/// Weight of the newest sample in the smoothed frame rate.
const RATE_SMOOTHING: f32 = 0.05;

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Seconds since the clock started.
    pub elapsed: f32,

    /// Number of frames ticked before this one.
    pub frame_count: u64,

    /// Exponentially smoothed frames per second.
    pub frame_rate: f32,
}

/// Per-loop frame clock.
///
/// Delta time is clamped so a debugger pause or a minimized window does not
/// feed a huge step into the sketch.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    frame_count: u64,
    frame_rate: f32,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Clock with a 100µs..250ms clamp, assuming 60 fps until measured.
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            frame_count: 0,
            frame_rate: 60.0,
            dt_min,
            dt_max,
        }
    }

    /// Resets the delta baseline (after a pause or a resumed loop).
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn frame_rate(&self) -> f32 {
        self.frame_rate
    }

    /// Time since the clock was created.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock to `now`.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now.saturating_duration_since(self.last).clamp(self.dt_min, self.dt_max);
        self.last = now;

        let dt = dt.as_secs_f32();
        self.frame_rate += (1.0 / dt - self.frame_rate) * RATE_SMOOTHING;

        let ft = FrameTime {
            dt,
            now,
            elapsed: now.saturating_duration_since(self.start).as_secs_f32(),
            frame_count: self.frame_count,
            frame_rate: self.frame_rate,
        };
        self.frame_count = self.frame_count.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
