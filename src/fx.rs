// Copyright (c) 2026 rezky_nightky

use std::io::Result;
use std::time::{Duration, Instant};

use rand::{rngs::StdRng, SeedableRng};

use crate::{
    canvas::Canvas,
    host::Host,
    palette::Palette,
    params::Params,
    runtime::DriverState,
    storm::{Storm, StormStats},
    surface::SurfaceSize,
    timebase::Timebase,
};

#[derive(Clone, Debug)]
pub struct FxConfig {
    pub params: Params,
    pub seed: Option<u64>,
    pub frame_period: Duration,
    pub hold: Option<f32>,
    pub gain: f32,
}

impl Default for FxConfig {
    fn default() -> Self {
        Self {
            params: Params::default(),
            seed: None,
            frame_period: Duration::from_secs_f64(1.0 / 60.0),
            hold: None,
            gain: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTicket {
    pub id: u64,
    pub due: Instant,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Halted,
    Skipped,
}

pub struct RainFx<H: Host> {
    host: H,
    storm: Storm,
    canvas: Canvas,
    palette: Palette,
    timebase: Timebase,
    state: DriverState,
    ticket: Option<FrameTicket>,
    next_ticket_id: u64,
    frame_period: Duration,
    reduced_motion: bool,
    frames: u64,
}

impl<H: Host> RainFx<H> {
    pub fn new(host: H, palette: Palette, cfg: FxConfig, now: Instant) -> Self {
        let surface = SurfaceSize::from_viewport(host.viewport());
        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let timebase = Timebase::new(now, cfg.params.dt_min, cfg.params.dt_max);
        let mut storm = Storm::new(cfg.params, surface, rng);
        storm.hold_intensity(cfg.hold);

        let (cols, rows) = host.grid();
        let mut canvas = Canvas::new(cols, rows);
        canvas.fit(&surface);
        canvas.set_gain(cfg.gain);

        let reduced_motion = host.prefers_reduced_motion();
        let mut fx = Self {
            host,
            storm,
            canvas,
            palette,
            timebase,
            state: DriverState::Idle,
            ticket: None,
            next_ticket_id: 0,
            frame_period: cfg.frame_period,
            reduced_motion,
            frames: 0,
        };
        if !fx.reduced_motion {
            fx.ensure_loop(now);
        }
        fx
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn ticket(&self) -> Option<FrameTicket> {
        self.ticket
    }

    pub fn storm(&self) -> &Storm {
        &self.storm
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn stats(&self) -> StormStats {
        self.storm.stats()
    }

    fn issue(&mut self, due: Instant) -> FrameTicket {
        self.next_ticket_id += 1;
        FrameTicket {
            id: self.next_ticket_id,
            due,
        }
    }

    fn ensure_loop(&mut self, now: Instant) {
        if self.state != DriverState::Idle {
            return;
        }
        self.state = DriverState::Running;
        self.timebase.reset(now);
        let ticket = self.issue(now);
        self.ticket = Some(ticket);
    }

    pub fn start(&mut self, now: Instant) {
        if self.reduced_motion || self.state == DriverState::Destroyed {
            return;
        }
        self.storm.set_calm(false);
        self.ensure_loop(now);
    }

    pub fn stop(&mut self, now: Instant) {
        if self.state == DriverState::Destroyed {
            return;
        }
        self.storm.set_calm(true);
        if !self.reduced_motion {
            self.ensure_loop(now);
        }
    }

    pub fn destroy(&mut self) {
        if self.state == DriverState::Destroyed {
            return;
        }
        self.ticket = None;
        self.storm.clear();
        let _ = self.host.release();
        self.state = DriverState::Destroyed;
    }

    pub fn resize(&mut self) {
        if self.state == DriverState::Destroyed {
            return;
        }
        let surface = SurfaceSize::from_viewport(self.host.viewport());
        let (cols, rows) = self.host.grid();
        self.canvas.resize(cols, rows);
        self.canvas.fit(&surface);
        self.storm.resize(surface);
    }

    pub fn frame_due(&self, now: Instant) -> bool {
        self.ticket.is_some_and(|t| now >= t.due)
    }

    pub fn run_frame(&mut self, now: Instant) -> Result<FrameOutcome> {
        if self.state != DriverState::Running {
            return Ok(FrameOutcome::Skipped);
        }
        let Some(ticket) = self.ticket.take() else {
            return Ok(FrameOutcome::Skipped);
        };

        let dt = self.timebase.tick(now);
        let elapsed = self.timebase.elapsed(now);
        self.storm.step(dt, elapsed);

        self.canvas.clear(self.palette.base);
        self.storm.render(&mut self.canvas, &self.palette);
        if let Err(e) = self.host.present(&self.canvas, &self.palette) {
            self.state = DriverState::Idle;
            return Err(e);
        }
        self.frames += 1;

        if !self.should_continue(elapsed) {
            self.state = DriverState::Idle;
            return Ok(FrameOutcome::Halted);
        }

        let due = (ticket.due + self.frame_period).max(now);
        let next = self.issue(due);
        self.ticket = Some(next);
        Ok(FrameOutcome::Continue)
    }

    /// Running while the cycle (plus a tail) is not over, while there is
    /// intensity left, or while drops or splashes are live. A lone fading
    /// ripple does not keep the loop alive. After `stop` the cycle clock no
    /// longer counts.
    fn should_continue(&self, elapsed: f32) -> bool {
        let p = self.storm.params();
        let cycle_open =
            !self.storm.is_calm() && elapsed < self.storm.cycle().duration() + p.tail_buffer;
        cycle_open
            || self.storm.intensity().current > p.idle_threshold
            || self.storm.has_falling_water()
    }
}
