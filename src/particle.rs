// Copyright (c) 2026 rezky_nightky

use std::f32::consts::TAU;

use rand::Rng;

use crate::canvas::Canvas;
use crate::params::Params;
use crate::palette::Rgb;
use crate::surface::SurfaceSize;

pub(crate) fn rnd<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    lo + rng.random::<f32>() * (hi - lo)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Raindrop {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub len: f32,
    pub thickness: f32,
    pub alpha: f32,
    pub impact_y: f32,
    pub age: f32,
}

impl Raindrop {
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, p: &Params, surface: &SurfaceSize) -> Self {
        let s = surface.scale;
        let vy = rnd(rng, p.speed_min, p.speed_max);
        let len = rnd(rng, p.len_min, p.len_max);
        let x = rnd(rng, 0.0, surface.width as f32);
        let y = rnd(rng, -p.spawn_above_max * s, -p.spawn_above_min * s);
        let impact_y = rnd(rng, 0.0, surface.height as f32);
        let thickness = rnd(rng, p.thick_min, p.thick_max) * s;
        let vx = rnd(rng, -p.wind_drift, p.wind_drift);
        let alpha = rnd(rng, p.alpha_min, p.alpha_max);

        Self {
            x,
            y,
            vx,
            vy,
            len,
            thickness,
            alpha,
            impact_y,
            age: 0.0,
        }
    }

    pub fn advance(&mut self, dt: f32, gravity: f32) {
        self.vy += gravity * dt;
        self.y += self.vy * dt;
        self.x += self.vx * dt;
        self.age += dt;
    }

    pub fn has_landed(&self, height: f32, p: &Params) -> bool {
        self.y > self.impact_y || self.y > height + p.bottom_margin || self.age > p.max_drop_life
    }

    pub fn draw(&self, canvas: &mut Canvas, color: Rgb, tint: f32) {
        canvas.stroke_line(
            (self.x, self.y),
            (self.x, self.y - self.len),
            self.thickness,
            color,
            self.alpha * tint,
        );
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Splash {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub alpha: f32,
    alpha0: f32,
    pub age: f32,
    pub life: f32,
    pub size: f32,
}

impl Splash {
    pub fn burst<R: Rng + ?Sized>(
        rng: &mut R,
        p: &Params,
        x: f32,
        y: f32,
        scale: f32,
        out: &mut Vec<Splash>,
    ) {
        out.reserve(p.splash_particles);
        for _ in 0..p.splash_particles {
            let angle = rng.random::<f32>() * TAU;
            let speed = rnd(rng, p.splash_speed * 0.5, p.splash_speed * 4.0);
            let lift = angle.sin() * p.splash_lift;
            out.push(Splash {
                x,
                y,
                vx: angle.cos() * speed,
                vy: lift * speed,
                alpha: p.splash_alpha,
                alpha0: p.splash_alpha,
                age: 0.0,
                life: p.splash_life,
                size: rnd(rng, 0.6, 1.6) * scale,
            });
        }
    }

    pub fn advance(&mut self, dt: f32, gravity: f32) -> bool {
        self.x += self.vx * dt;
        self.y += self.vy * dt;
        self.vy += gravity * dt;
        self.age += dt;
        self.alpha -= self.alpha0 * dt / self.life;
        self.alpha > 0.0
    }

    pub fn draw(&self, canvas: &mut Canvas, color: Rgb, tint: f32) {
        canvas.fill_circle((self.x, self.y), self.size, color, self.alpha * tint);
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ripple {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub max_r: f32,
    pub alpha: f32,
    alpha0: f32,
    pub shimmer: bool,
    pub age: f32,
    pub life: f32,
}

const SHIMMER_FREQ: f32 = 7.0;
const SHIMMER_AMP: f32 = 0.06;

impl Ripple {
    pub fn new(x: f32, y: f32, max_r: f32, alpha: f32, life: f32, shimmer: bool) -> Self {
        Self {
            x,
            y,
            r: 0.0,
            max_r,
            alpha,
            alpha0: alpha,
            shimmer,
            age: 0.0,
            life,
        }
    }

    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, p: &Params, x: f32, y: f32, scale: f32) -> Self {
        let max_r = rnd(rng, p.ripple_max_min, p.ripple_max_max) * scale;
        let shimmer = rng.random::<f32>() < p.shimmer_chance;
        Self::new(x, y, max_r, p.ripple_alpha, p.ripple_life, shimmer)
    }

    pub fn advance(&mut self, dt: f32, growth: f32) -> bool {
        self.age += dt;
        self.r += growth * dt;
        self.alpha -= self.alpha0 * dt / self.life;
        self.alpha > 0.0
    }

    /// Stroke colour alpha; shimmer flickers on top of the lifecycle alpha.
    pub fn stroke_alpha(&self) -> f32 {
        if self.shimmer {
            self.alpha + (self.age * SHIMMER_FREQ).sin() * SHIMMER_AMP + SHIMMER_AMP
        } else {
            self.alpha
        }
    }

    pub fn draw(&self, canvas: &mut Canvas, color: Rgb, width: f32) {
        let alpha = self.alpha * self.stroke_alpha();
        canvas.stroke_circle((self.x, self.y), self.r, width, color, alpha);
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::{Raindrop, Ripple, Splash};
    use crate::canvas::Canvas;
    use crate::palette::Rgb;
    use crate::params::Params;
    use crate::surface::SurfaceSize;

    fn surface() -> SurfaceSize {
        SurfaceSize {
            width: 800,
            height: 600,
            scale: 2.0,
            max_drops: 53,
        }
    }

    #[test]
    fn spawned_drops_respect_bounds() {
        let p = Params::default();
        let s = surface();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let d = Raindrop::spawn(&mut rng, &p, &s);
            assert!((0.0..=800.0).contains(&d.x));
            assert!(d.y >= -240.0 && d.y <= -60.0);
            assert!((0.0..=600.0).contains(&d.impact_y));
            assert!((750.0..=900.0).contains(&d.vy));
            assert!(d.vx.abs() <= 8.0);
            assert!(d.thickness >= 1.6 && d.thickness <= 2.8);
            assert_eq!(d.age, 0.0);
        }
    }

    #[test]
    fn drop_velocity_grows_under_gravity() {
        let p = Params::default();
        let mut d = Raindrop::spawn(&mut StdRng::seed_from_u64(1), &p, &surface());
        let mut vy = d.vy;
        for _ in 0..10 {
            d.advance(0.016, p.gravity);
            assert!(d.vy > vy);
            vy = d.vy;
        }
    }

    #[test]
    fn stalled_drop_lands_by_age() {
        let p = Params::default();
        let mut d = Raindrop::spawn(&mut StdRng::seed_from_u64(1), &p, &surface());
        d.impact_y = f32::INFINITY;
        d.y = -1.0e9;
        assert!(!d.has_landed(600.0, &p));
        d.age = p.max_drop_life + 0.01;
        assert!(d.has_landed(600.0, &p));
    }

    #[test]
    fn burst_emits_configured_count_with_fixed_alpha() {
        let p = Params::default();
        let mut out = Vec::new();
        Splash::burst(&mut StdRng::seed_from_u64(3), &p, 10.0, 20.0, 1.0, &mut out);
        assert_eq!(out.len(), 8);
        for s in &out {
            assert_eq!((s.x, s.y), (10.0, 20.0));
            assert_eq!(s.alpha, 0.25);
            let speed = s.vx.hypot(s.vy / 0.9);
            assert!(speed >= 25.0 - 1e-3 && speed <= 200.0 + 1e-3);
        }
    }

    #[test]
    fn splash_fades_over_its_life() {
        let p = Params::default();
        let mut out = Vec::new();
        Splash::burst(&mut StdRng::seed_from_u64(3), &p, 0.0, 0.0, 1.0, &mut out);
        let mut s = out[0];
        assert!(s.advance(1.2, p.splash_gravity));
        assert!(!s.advance(0.2, p.splash_gravity));
    }

    #[test]
    fn ripple_is_gone_after_its_life() {
        let mut r = Ripple::new(0.0, 0.0, 20.0, 0.12, 1.6, false);
        let mut alive = true;
        for _ in 0..17 {
            alive = r.advance(0.1, 20.0);
        }
        assert!(!alive);
        assert!(r.alpha <= 0.0);
        assert!((r.r - 34.0).abs() < 1e-3);
    }

    #[test]
    fn shimmer_only_changes_stroke_alpha() {
        let mut plain = Ripple::new(0.0, 0.0, 20.0, 0.12, 1.6, false);
        let mut shiny = Ripple::new(0.0, 0.0, 20.0, 0.12, 1.6, true);
        plain.advance(0.2, 20.0);
        shiny.advance(0.2, 20.0);
        assert_eq!(plain.alpha, shiny.alpha);
        assert_eq!(plain.stroke_alpha(), plain.alpha);
        let glow = shiny.stroke_alpha() - shiny.alpha;
        assert!((0.0..=0.12).contains(&glow));
        assert!(glow > 0.0);
    }

    fn brightest(c: &Canvas) -> u8 {
        let (w, h) = c.size();
        (0..h)
            .flat_map(|y| (0..w).map(move |x| (x, y)))
            .filter_map(|(x, y)| c.pixel(x, y))
            .map(|p| p.r)
            .max()
            .unwrap_or(0)
    }

    fn black_canvas() -> Canvas {
        let mut c = Canvas::new(10, 5);
        c.fit(&SurfaceSize {
            width: 100,
            height: 100,
            scale: 1.0,
            max_drops: 30,
        });
        c.clear(Rgb::BLACK);
        c
    }

    #[test]
    fn ripple_composites_far_fainter_than_a_drop() {
        let white = Rgb::new(255, 255, 255);
        let p = Params::default();

        let mut c = black_canvas();
        let drop = Raindrop {
            x: 55.0,
            y: 95.0,
            vx: 0.0,
            vy: 800.0,
            len: 40.0,
            thickness: 1.0,
            alpha: 0.2,
            impact_y: 100.0,
            age: 0.0,
        };
        drop.draw(&mut c, white, p.drop_tint);
        // 0.2 * 0.75 of full white.
        assert_eq!(brightest(&c), 38);

        let mut c = black_canvas();
        let mut ripple = Ripple::new(50.0, 50.0, 20.0, 0.12, 1.6, false);
        ripple.r = 20.0;
        ripple.draw(&mut c, white, 1.0);
        // Lifecycle alpha times stroke alpha: 0.12 * 0.12 of full white.
        assert_eq!(brightest(&c), 4);
        assert_eq!(ripple.alpha, 0.12);
    }

    #[test]
    fn splash_is_drawn_with_its_tint() {
        let p = Params::default();
        let mut out = Vec::new();
        Splash::burst(&mut StdRng::seed_from_u64(5), &p, 50.0, 50.0, 1.0, &mut out);
        let mut c = black_canvas();
        out[0].draw(&mut c, Rgb::new(255, 255, 255), p.splash_tint);
        // 0.25 * 0.7 of full white.
        assert_eq!(brightest(&c), 45);
    }
}
