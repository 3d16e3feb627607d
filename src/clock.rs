use std::time::{Duration, Instant};

use crate::entities::Millis;

/// Monotonic time source that also paces the frame loop.
pub trait Clock {
    /// Milliseconds since the clock was created.
    fn now_ms(&self) -> Millis;

    /// Block until at least one frame at `target_fps` has passed since the
    /// previous tick; returns the real elapsed time in seconds.
    fn tick(&mut self, target_fps: u32) -> f32;
}

pub struct SystemClock {
    origin: Instant,
    last_tick: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            origin: now,
            last_tick: now,
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> Millis {
        self.origin.elapsed().as_millis() as Millis
    }

    fn tick(&mut self, target_fps: u32) -> f32 {
        let frame = Duration::from_secs(1) / target_fps.max(1);
        let elapsed = self.last_tick.elapsed();
        if elapsed < frame {
            std::thread::sleep(frame - elapsed);
        }
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick);
        self.last_tick = now;
        dt.as_secs_f32()
    }
}

/// Deterministic clock: every tick advances time by exactly one frame.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Millis,
}

impl ManualClock {
    pub fn starting_at(now: Millis) -> Self {
        Self { now }
    }

    pub fn advance(&mut self, ms: Millis) {
        self.now += ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Millis {
        self.now
    }

    fn tick(&mut self, target_fps: u32) -> f32 {
        let step = 1000 / Millis::from(target_fps.max(1));
        self.now += step;
        step as f32 / 1000.0
    }
}
