// Copyright (c) 2026 rezky_nightky

use rand::Rng;

/// Shortest rain spell the cycle shape can hold: the ramp to peak takes ten
/// seconds and keyframe times must not go backwards.
pub const MIN_RAIN_SECS: f32 = 10.0;

const RAMP_SECS: f32 = 5.0;
const FADE_SECS: f32 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keyframe {
    pub time: f32,
    pub intensity: f32,
}

impl Keyframe {
    const fn new(time: f32, intensity: f32) -> Self {
        Self { time, intensity }
    }
}

/// Idle, ramp up, hold, ramp down, idle. Only the onset and the length of the
/// rainy stretch vary between sessions.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyframeCycle {
    frames: Vec<Keyframe>,
    onset: f32,
    rain: f32,
}

impl KeyframeCycle {
    pub fn new(onset: f32, rain: f32) -> Self {
        let onset = if onset.is_finite() { onset.max(0.0) } else { 0.0 };
        let rain = if rain.is_finite() {
            rain.max(MIN_RAIN_SECS)
        } else {
            MIN_RAIN_SECS
        };

        let frames = vec![
            Keyframe::new(0.0, 0.0),
            Keyframe::new(onset, 0.0),
            Keyframe::new(onset + RAMP_SECS, 0.2),
            Keyframe::new(onset + 2.0 * RAMP_SECS, 0.7),
            Keyframe::new(onset + rain, 0.5),
            Keyframe::new(onset + rain + FADE_SECS, 0.0),
        ];

        Self {
            frames,
            onset,
            rain,
        }
    }

    /// Picks onset and rain length uniformly from `[low, high)`.
    pub fn randomized<R: Rng + ?Sized>(rng: &mut R, onset: (f32, f32), rain: (f32, f32)) -> Self {
        let onset = onset.0 + rng.random::<f32>() * (onset.1 - onset.0);
        let rain = rain.0 + rng.random::<f32>() * (rain.1 - rain.0);
        Self::new(onset, rain)
    }

    pub fn frames(&self) -> &[Keyframe] {
        &self.frames
    }

    pub fn onset(&self) -> f32 {
        self.onset
    }

    pub fn rain(&self) -> f32 {
        self.rain
    }

    pub fn duration(&self) -> f32 {
        self.frames.last().map(|k| k.time).unwrap_or(0.0)
    }

    pub fn peak(&self) -> f32 {
        self.frames
            .iter()
            .map(|k| k.intensity)
            .fold(0.0, f32::max)
    }

    pub fn target_at(&self, t: f32) -> f32 {
        for pair in self.frames.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t >= a.time && t < b.time {
                let f = (t - a.time) / (b.time - a.time);
                return a.intensity + f * (b.intensity - a.intensity);
            }
        }

        match (self.frames.first(), self.frames.last()) {
            (Some(first), _) if t < first.time => first.intensity,
            (_, Some(last)) => last.intensity,
            _ => 0.0,
        }
    }
}

/// Current rain intensity chasing a target at a bounded rate.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Intensity {
    pub current: f32,
    pub target: f32,
}

impl Intensity {
    pub fn retarget(&mut self, target: f32) {
        self.target = if target.is_finite() {
            target.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    pub fn approach(&mut self, dt_ms: f32, fade_rate: f32) {
        let step = (fade_rate * dt_ms).max(0.0);
        if self.current < self.target {
            self.current = (self.current + step).min(self.target);
        } else if self.current > self.target {
            self.current = (self.current - step).max(self.target);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::{Intensity, KeyframeCycle};

    #[test]
    fn target_is_zero_before_onset() {
        let cycle = KeyframeCycle::new(60.0, 30.0);
        for t in [0.0, 1.0, 30.0, 59.99] {
            assert_eq!(cycle.target_at(t), 0.0, "t={t}");
        }
    }

    #[test]
    fn target_interpolates_between_keyframes() {
        let cycle = KeyframeCycle::new(60.0, 30.0);
        assert!((cycle.target_at(62.5) - 0.1).abs() < 1e-5);
        assert!((cycle.target_at(67.5) - 0.45).abs() < 1e-5);
        assert!((cycle.target_at(70.0) - 0.7).abs() < 1e-5);
        assert!((cycle.target_at(95.0) - 0.25).abs() < 1e-5);
    }

    #[test]
    fn target_past_last_keyframe_is_last_value() {
        let cycle = KeyframeCycle::new(60.0, 30.0);
        assert_eq!(cycle.duration(), 100.0);
        assert_eq!(cycle.target_at(100.0), 0.0);
        assert_eq!(cycle.target_at(10_000.0), 0.0);
        assert_eq!(cycle.target_at(-5.0), 0.0);
    }

    #[test]
    fn target_never_exceeds_peak() {
        let cycle = KeyframeCycle::new(3.0, 12.0);
        let peak = cycle.peak();
        assert_eq!(peak, 0.7);
        let mut t = 0.0;
        while t < cycle.duration() + 5.0 {
            let v = cycle.target_at(t);
            assert!((0.0..=peak).contains(&v), "t={t} v={v}");
            t += 0.05;
        }
    }

    #[test]
    fn short_rain_is_stretched_to_keep_times_ordered() {
        let cycle = KeyframeCycle::new(5.0, 2.0);
        assert_eq!(cycle.rain(), 10.0);
        for pair in cycle.frames().windows(2) {
            assert!(pair[0].time <= pair[1].time);
        }
    }

    #[test]
    fn randomized_cycle_is_pinned_by_seed_and_stays_in_range() {
        let a = KeyframeCycle::randomized(&mut StdRng::seed_from_u64(7), (60.0, 120.0), (30.0, 60.0));
        let b = KeyframeCycle::randomized(&mut StdRng::seed_from_u64(7), (60.0, 120.0), (30.0, 60.0));
        assert_eq!(a, b);
        assert!((60.0..120.0).contains(&a.onset()));
        assert!((30.0..60.0).contains(&a.rain()));
        assert_eq!(a.frames()[0].time, 0.0);
    }

    #[test]
    fn approach_is_rate_bounded_and_never_overshoots() {
        let mut i = Intensity::default();
        i.retarget(1.0);
        let mut prev = i.current;
        for _ in 0..100 {
            i.approach(16.0, 0.0015);
            assert!(i.current - prev <= 0.0015 * 16.0 + 1e-6);
            assert!(i.current <= 1.0);
            prev = i.current;
        }
        assert_eq!(i.current, 1.0);

        i.retarget(0.0);
        i.approach(10_000.0, 0.0015);
        assert_eq!(i.current, 0.0);
    }

    #[test]
    fn retarget_clamps_into_unit_range() {
        let mut i = Intensity::default();
        i.retarget(3.0);
        assert_eq!(i.target, 1.0);
        i.retarget(-1.0);
        assert_eq!(i.target, 0.0);
        i.retarget(f32::NAN);
        assert_eq!(i.target, 0.0);
    }
}
