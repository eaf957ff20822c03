// Copyright (c) 2026 rezky_nightky

use rand::{rngs::StdRng, Rng};

use crate::{
    canvas::Canvas,
    palette::Palette,
    params::Params,
    particle::{Raindrop, Ripple, Splash},
    schedule::{Intensity, KeyframeCycle},
    surface::SurfaceSize,
};

const CATCH_UP_SHARE: f32 = 0.15;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StormStats {
    pub spawned: u64,
    pub impacts: u64,
    pub peak_drops: usize,
    pub peak_splashes: usize,
    pub peak_ripples: usize,
}

pub struct Storm {
    params: Params,
    surface: SurfaceSize,
    cycle: KeyframeCycle,
    intensity: Intensity,
    hold: Option<f32>,
    calm: bool,

    drops: Vec<Raindrop>,
    splashes: Vec<Splash>,
    ripples: Vec<Ripple>,

    rng: StdRng,
    stats: StormStats,
}

impl Storm {
    pub fn new(params: Params, surface: SurfaceSize, mut rng: StdRng) -> Self {
        let cycle = KeyframeCycle::randomized(&mut rng, params.onset, params.rain);
        Self::with_cycle(params, surface, cycle, rng)
    }

    pub fn with_cycle(
        params: Params,
        surface: SurfaceSize,
        cycle: KeyframeCycle,
        rng: StdRng,
    ) -> Self {
        Self {
            params,
            surface,
            cycle,
            intensity: Intensity::default(),
            hold: None,
            calm: false,
            drops: Vec::with_capacity(surface.max_drops),
            splashes: Vec::new(),
            ripples: Vec::new(),
            rng,
            stats: StormStats::default(),
        }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn surface(&self) -> &SurfaceSize {
        &self.surface
    }

    pub fn cycle(&self) -> &KeyframeCycle {
        &self.cycle
    }

    pub fn intensity(&self) -> Intensity {
        self.intensity
    }

    pub fn stats(&self) -> StormStats {
        self.stats
    }

    pub fn drops(&self) -> &[Raindrop] {
        &self.drops
    }

    pub fn splashes(&self) -> &[Splash] {
        &self.splashes
    }

    pub fn ripples(&self) -> &[Ripple] {
        &self.ripples
    }

    // Drops over a smaller capacity are not culled; they land as usual.
    pub fn resize(&mut self, surface: SurfaceSize) {
        self.surface = surface;
    }

    pub fn hold_intensity(&mut self, v: Option<f32>) {
        self.hold = v.map(|v| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 });
    }

    /// While calm the target is 0 whatever the cycle or hold says.
    pub fn set_calm(&mut self, calm: bool) {
        self.calm = calm;
    }

    pub fn is_calm(&self) -> bool {
        self.calm
    }

    /// Live drops or splashes. A ripple still fading does not count.
    pub fn has_falling_water(&self) -> bool {
        !self.drops.is_empty() || !self.splashes.is_empty()
    }

    pub fn clear(&mut self) {
        self.drops.clear();
        self.splashes.clear();
        self.ripples.clear();
    }

    pub fn step(&mut self, dt: f32, elapsed: f32) {
        let dt_ms = dt * 1000.0;

        self.update_intensity(dt_ms, elapsed);
        self.spawn_to_match(dt_ms);
        self.update_drops(dt);
        self.update_splashes(dt);
        self.update_ripples(dt);

        self.stats.peak_drops = self.stats.peak_drops.max(self.drops.len());
        self.stats.peak_splashes = self.stats.peak_splashes.max(self.splashes.len());
        self.stats.peak_ripples = self.stats.peak_ripples.max(self.ripples.len());
    }

    fn update_intensity(&mut self, dt_ms: f32, elapsed: f32) {
        let target = if self.calm {
            0.0
        } else {
            self.hold
                .unwrap_or_else(|| self.cycle.target_at(elapsed))
        };
        self.intensity.retarget(target);
        self.intensity.approach(dt_ms, self.params.fade_rate);
    }

    fn spawn_to_match(&mut self, dt_ms: f32) {
        let cap = self.surface.max_drops;
        let current = self.intensity.current;
        let want = (cap as f32 * current).floor() as usize;
        let live = self.drops.len();

        if live < want {
            let deficit = want - live;
            let burst = deficit.min((deficit as f32 * CATCH_UP_SHARE).ceil() as usize + 1);
            for _ in 0..burst {
                self.spawn_drop();
            }
        } else if live < cap
            && self.rng.random::<f32>() < self.params.spawn_jitter * dt_ms * current
        {
            self.spawn_drop();
        }
    }

    fn spawn_drop(&mut self) {
        let d = Raindrop::spawn(&mut self.rng, &self.params, &self.surface);
        self.drops.push(d);
        self.stats.spawned += 1;
    }

    fn update_drops(&mut self, dt: f32) {
        let height = self.surface.height as f32;
        let mut i = self.drops.len();
        while i > 0 {
            i -= 1;
            let d = &mut self.drops[i];
            d.advance(dt, self.params.gravity);
            if d.has_landed(height, &self.params) {
                let (x, y) = (d.x, d.y);
                self.drops.swap_remove(i);
                self.impact(x, y);
            }
        }
    }

    fn impact(&mut self, x: f32, y: f32) {
        let scale = self.surface.scale;
        Splash::burst(&mut self.rng, &self.params, x, y, scale, &mut self.splashes);
        let ripple = Ripple::spawn(&mut self.rng, &self.params, x, y, scale);
        self.ripples.push(ripple);
        self.stats.impacts += 1;
    }

    fn update_splashes(&mut self, dt: f32) {
        let gravity = self.params.splash_gravity;
        let mut i = self.splashes.len();
        while i > 0 {
            i -= 1;
            if !self.splashes[i].advance(dt, gravity) {
                self.splashes.swap_remove(i);
            }
        }
    }

    fn update_ripples(&mut self, dt: f32) {
        let growth = self.params.ripple_growth;
        let mut i = self.ripples.len();
        while i > 0 {
            i -= 1;
            if !self.ripples[i].advance(dt, growth) {
                self.ripples.swap_remove(i);
            }
        }
    }

    pub fn render(&self, canvas: &mut Canvas, palette: &Palette) {
        let p = &self.params;
        for d in &self.drops {
            d.draw(canvas, palette.drop, p.drop_tint);
        }
        for s in &self.splashes {
            s.draw(canvas, palette.splash, p.splash_tint);
        }
        let ring = self.surface.scale;
        for r in &self.ripples {
            r.draw(canvas, palette.ripple, ring);
        }
    }

    #[cfg(test)]
    pub(crate) fn push_drop(&mut self, d: Raindrop) {
        self.drops.push(d);
    }

    #[cfg(test)]
    pub(crate) fn push_ripple(&mut self, r: Ripple) {
        self.ripples.push(r);
    }
}
