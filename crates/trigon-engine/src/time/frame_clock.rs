use std::time::{Duration, Instant};

const DEFAULT_DT_MIN: Duration = Duration::from_micros(100);
const DEFAULT_DT_MAX: Duration = Duration::from_millis(250);

/// Weight of the newest sample in the smoothed frame rate.
const FPS_SMOOTHING: f32 = 0.1;

/// Timing snapshot of one frame.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Zero-based index of this frame.
    pub frame_index: u64,

    /// Exponentially smoothed frames per second.
    pub fps: f32,
}

/// Produces `FrameTime` snapshots.
///
/// Delta time is clamped so that debugger pauses, minimized windows or stalls
/// do not surface as huge (or zero) steps.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    fps: f32,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_clamps(DEFAULT_DT_MIN, DEFAULT_DT_MAX)
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            frame_index: 0,
            fps: 0.0,
            dt_min,
            dt_max,
        }
    }

    /// Resets the baseline, e.g. after the drawable was resized.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Number of ticks so far.
    pub fn frames(&self) -> u64 {
        self.frame_index
    }

    /// Advances the clock to now.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max)
            .as_secs_f32();

        let instant_fps = 1.0 / dt;
        self.fps = if self.frame_index == 0 {
            instant_fps
        } else {
            self.fps + (instant_fps - self.fps) * FPS_SMOOTHING
        };
        self.last = now;

        let ft = FrameTime {
            dt,
            now,
            frame_index: self.frame_index,
            fps: self.fps,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
