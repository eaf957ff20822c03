// Copyright (c) 2026 rezky_nightky

/// Tunables for the rain simulation. Distances are device pixels, times are
/// seconds unless the name says otherwise.
#[derive(Clone, Debug, PartialEq)]
pub struct Params {
    pub gravity: f32,
    pub wind_drift: f32,
    pub speed_min: f32,
    pub speed_max: f32,
    pub len_min: f32,
    pub len_max: f32,
    pub thick_min: f32,
    pub thick_max: f32,
    pub alpha_min: f32,
    pub alpha_max: f32,
    /// Colour alpha of the streak, multiplied with each drop's own alpha.
    pub drop_tint: f32,
    /// Spawn height above the top edge, before device scaling.
    pub spawn_above_min: f32,
    pub spawn_above_max: f32,
    pub max_drop_life: f32,
    pub bottom_margin: f32,

    /// Intensity change per millisecond.
    pub fade_rate: f32,
    /// Extra-drop chance per millisecond once the wanted count is reached.
    pub spawn_jitter: f32,

    pub splash_particles: usize,
    pub splash_speed: f32,
    pub splash_life: f32,
    pub splash_alpha: f32,
    pub splash_tint: f32,
    pub splash_gravity: f32,
    pub splash_lift: f32,

    pub ripple_life: f32,
    pub ripple_alpha: f32,
    pub ripple_growth: f32,
    pub ripple_max_min: f32,
    pub ripple_max_max: f32,
    pub shimmer_chance: f32,

    pub onset: (f32, f32),
    pub rain: (f32, f32),
    /// Seconds the loop keeps running past the last keyframe.
    pub tail_buffer: f32,
    pub idle_threshold: f32,

    pub dt_min: f32,
    pub dt_max: f32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            gravity: 2200.0,
            wind_drift: 8.0,
            speed_min: 750.0,
            speed_max: 900.0,
            len_min: 30.0,
            len_max: 55.0,
            thick_min: 0.8,
            thick_max: 1.4,
            alpha_min: 0.08,
            alpha_max: 0.2,
            drop_tint: 0.75,
            spawn_above_min: 30.0,
            spawn_above_max: 120.0,
            max_drop_life: 4.5,
            bottom_margin: 20.0,
            fade_rate: 0.0015,
            spawn_jitter: 0.0012,
            splash_particles: 8,
            splash_speed: 50.0,
            splash_life: 1.3,
            splash_alpha: 0.25,
            splash_tint: 0.7,
            splash_gravity: 20.0,
            splash_lift: 0.9,
            ripple_life: 1.6,
            ripple_alpha: 0.12,
            ripple_growth: 20.0,
            ripple_max_min: 16.0,
            ripple_max_max: 28.0,
            shimmer_chance: 0.4,
            onset: (60.0, 120.0),
            rain: (30.0, 60.0),
            tail_buffer: 20.0,
            idle_threshold: 0.001,
            dt_min: 0.001,
            dt_max: 0.04,
        }
    }
}
