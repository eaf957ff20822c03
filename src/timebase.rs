// Copyright (c) 2026 rezky_nightky

use std::time::Instant;

/// Elapsed time since creation plus a per-frame delta that is clamped so a
/// stalled terminal does not teleport every particle on the next frame.
#[derive(Clone, Debug)]
pub struct Timebase {
    origin: Instant,
    last: Instant,
    min_dt: f32,
    max_dt: f32,
}

impl Timebase {
    pub fn new(now: Instant, min_dt: f32, max_dt: f32) -> Self {
        let (min_dt, max_dt) = if min_dt <= max_dt {
            (min_dt, max_dt)
        } else {
            (max_dt, min_dt)
        };
        Self {
            origin: now,
            last: now,
            min_dt,
            max_dt,
        }
    }

    pub fn reset(&mut self, now: Instant) {
        self.last = now;
    }

    /// Seconds since the previous tick (or reset), clamped.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let raw = now.saturating_duration_since(self.last).as_secs_f32();
        self.last = now;
        raw.clamp(self.min_dt, self.max_dt)
    }

    pub fn elapsed(&self, now: Instant) -> f32 {
        now.saturating_duration_since(self.origin).as_secs_f32()
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::Timebase;

    #[test]
    fn tick_clamps_long_gaps_and_zero_gaps() {
        let t0 = Instant::now();
        let mut tb = Timebase::new(t0, 0.001, 0.04);

        assert_eq!(tb.tick(t0), 0.001);
        let dt = tb.tick(t0 + Duration::from_secs(3));
        assert_eq!(dt, 0.04);
        let dt = tb.tick(t0 + Duration::from_secs(3) + Duration::from_millis(16));
        assert!((dt - 0.016).abs() < 1e-4);
    }

    #[test]
    fn elapsed_counts_from_origin_not_last_tick() {
        let t0 = Instant::now();
        let mut tb = Timebase::new(t0, 0.001, 0.04);
        tb.tick(t0 + Duration::from_secs(2));
        tb.reset(t0 + Duration::from_secs(5));
        assert!((tb.elapsed(t0 + Duration::from_secs(5)) - 5.0).abs() < 1e-4);
    }
}
