// Copyright (c) 2026 rezky_nightky

use std::io::Result;

use crate::canvas::Canvas;
use crate::frame::Frame;
use crate::palette::Palette;
use crate::runtime::SurfaceMode;
use crate::surface::Viewport;
use crate::terminal::Terminal;

/// Environment the animation runs in: where it draws and how big that is.
pub trait Host {
    fn viewport(&self) -> Viewport;

    /// Terminal cells `(cols, rows)` the canvas is laid out on.
    fn grid(&self) -> (u16, u16);

    fn prefers_reduced_motion(&self) -> bool;

    fn present(&mut self, canvas: &Canvas, palette: &Palette) -> Result<()>;

    /// Detaches from the surface, removing it if the host created it.
    fn release(&mut self) -> Result<()>;
}

/// Draws into the controlling terminal. The terminal is set up lazily on the
/// first present, so an animation that never runs never touches the screen.
pub struct TermHost {
    term: Option<Terminal>,
    mode: SurfaceMode,
    frame: Frame,
    cols: u16,
    rows: u16,
    px: (u16, u16),
    scale: f32,
    reduced_motion: bool,
}

impl TermHost {
    pub fn new(mode: SurfaceMode, scale: f32, reduced_motion: bool) -> Result<Self> {
        let (cols, rows) = Terminal::size()?;
        Ok(Self {
            term: None,
            mode,
            frame: Frame::new(cols, rows, None),
            cols,
            rows,
            px: Terminal::pixel_size(),
            scale,
            reduced_motion,
        })
    }

    pub fn set_grid(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.px = Terminal::pixel_size();
        self.frame = Frame::new(cols, rows, None);
    }
}

impl Host for TermHost {
    fn viewport(&self) -> Viewport {
        Viewport::for_grid(self.cols, self.rows, self.px.0, self.px.1, self.scale)
    }

    fn grid(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn present(&mut self, canvas: &Canvas, palette: &Palette) -> Result<()> {
        if self.term.is_none() {
            self.term = Some(Terminal::new(self.mode)?);
        }
        canvas.present(&mut self.frame, palette);
        if !self.frame.is_dirty() {
            return Ok(());
        }
        match self.term.as_mut() {
            Some(term) => term.draw(&mut self.frame),
            None => Ok(()),
        }
    }

    fn release(&mut self) -> Result<()> {
        // Dropping the terminal restores it and leaves the alternate screen.
        self.term = None;
        Ok(())
    }
}

/// Off-screen host for tests and benchmarks. Counts what it is asked to do.
#[derive(Clone, Debug)]
pub struct HeadlessHost {
    pub viewport: Viewport,
    pub grid: (u16, u16),
    pub reduced_motion: bool,
    pub presents: usize,
    pub releases: usize,
    pub last_inked: usize,
}

impl HeadlessHost {
    pub fn new(viewport: Viewport, grid: (u16, u16)) -> Self {
        Self {
            viewport,
            grid,
            reduced_motion: false,
            presents: 0,
            releases: 0,
            last_inked: 0,
        }
    }
}

impl Host for HeadlessHost {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn grid(&self) -> (u16, u16) {
        self.grid
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn present(&mut self, canvas: &Canvas, _palette: &Palette) -> Result<()> {
        self.presents += 1;
        self.last_inked = canvas.inked();
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        self.releases += 1;
        Ok(())
    }
}
