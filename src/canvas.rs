// Copyright (c) 2026 rezky_nightky

use crate::cell::{Cell, FULL_BLOCK, LOWER_HALF, UPPER_HALF};
use crate::frame::Frame;
use crate::palette::{Palette, Rgb};
use crate::runtime::ColorMode;
use crate::surface::SurfaceSize;

/// Raster the rain is painted on. Drawing calls take device-pixel coordinates;
/// each raster pixel covers `sx x sy` device pixels, and two raster rows make
/// one terminal row.
#[derive(Clone, Debug)]
pub struct Canvas {
    cols: u16,
    rows: u16,
    width: usize,
    height: usize,
    px: Vec<[f32; 3]>,
    ink: Vec<bool>,
    sx: f32,
    sy: f32,
    gain: f32,
}

impl Canvas {
    pub fn new(cols: u16, rows: u16) -> Self {
        let mut c = Self {
            cols: 0,
            rows: 0,
            width: 0,
            height: 0,
            px: Vec::new(),
            ink: Vec::new(),
            sx: 1.0,
            sy: 1.0,
            gain: 1.0,
        };
        c.resize(cols, rows);
        c
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.width = cols as usize;
        self.height = rows as usize * 2;
        let len = self.width * self.height;
        self.px.clear();
        self.px.resize(len, [0.0; 3]);
        self.ink.clear();
        self.ink.resize(len, false);
    }

    /// Matches the device-pixel surface onto the raster.
    pub fn fit(&mut self, surface: &SurfaceSize) {
        self.sx = if self.width > 0 && surface.width > 0 {
            surface.width as f32 / self.width as f32
        } else {
            1.0
        };
        self.sy = if self.height > 0 && surface.height > 0 {
            surface.height as f32 / self.height as f32
        } else {
            1.0
        };
    }

    /// Multiplier on every alpha. Terminals have far fewer pixels than a
    /// display, so faint strokes need a boost to register at all.
    pub fn set_gain(&mut self, gain: f32) {
        self.gain = if gain.is_finite() { gain.max(0.0) } else { 1.0 };
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn clear(&mut self, base: Rgb) {
        let v = [base.r as f32, base.g as f32, base.b as f32];
        self.px.fill(v);
        self.ink.fill(false);
    }

    /// Colour of a raster pixel, `None` if nothing was drawn there.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = y * self.width + x;
        if !self.ink[i] {
            return None;
        }
        let [r, g, b] = self.px[i];
        Some(Rgb::new(to_u8(r), to_u8(g), to_u8(b)))
    }

    pub fn inked(&self) -> usize {
        self.ink.iter().filter(|&&v| v).count()
    }

    fn blend(&mut self, x: i64, y: i64, c: Rgb, alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let a = (alpha * self.gain).clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let i = y as usize * self.width + x as usize;
        let dst = &mut self.px[i];
        let src = [c.r as f32, c.g as f32, c.b as f32];
        for k in 0..3 {
            dst[k] = dst[k] * (1.0 - a) + src[k] * a;
        }
        self.ink[i] = true;
    }

    fn raster(&self, x: f32, y: f32) -> (f32, f32) {
        (x / self.sx, y / self.sy)
    }

    pub fn stroke_line(
        &mut self,
        from: (f32, f32),
        to: (f32, f32),
        thickness: f32,
        c: Rgb,
        alpha: f32,
    ) {
        let (x0, y0) = self.raster(from.0, from.1);
        let (x1, y1) = self.raster(to.0, to.1);
        let span = (x1 - x0).abs().max((y1 - y0).abs());
        let steps = span.ceil().max(1.0) as i64;
        let columns = (thickness / self.sx).round().max(1.0) as i64;

        let mut prev: Option<(i64, i64)> = None;
        for s in 0..=steps {
            let t = s as f32 / steps as f32;
            let px = (x0 + (x1 - x0) * t).floor() as i64;
            let py = (y0 + (y1 - y0) * t).floor() as i64;
            if prev == Some((px, py)) {
                continue;
            }
            prev = Some((px, py));
            for dx in 0..columns {
                self.blend(px + dx - columns / 2, py, c, alpha);
            }
        }
    }

    pub fn fill_circle(&mut self, center: (f32, f32), radius: f32, c: Rgb, alpha: f32) {
        self.circle_span(center, 0.0, radius.max(0.0), c, alpha);
    }

    pub fn stroke_circle(
        &mut self,
        center: (f32, f32),
        radius: f32,
        width: f32,
        c: Rgb,
        alpha: f32,
    ) {
        let half = (width * 0.5).max(self.sx.max(self.sy) * 0.5);
        let inner = (radius - half).max(0.0);
        self.circle_span(center, inner, radius + half, c, alpha);
    }

    /// Blends every raster pixel whose centre lies between `inner` and
    /// `outer` device pixels from `center`. A shape smaller than one raster
    /// pixel still lights the pixel under its centre.
    fn circle_span(&mut self, center: (f32, f32), inner: f32, outer: f32, c: Rgb, alpha: f32) {
        let (cx, cy) = center;
        let x_lo = ((cx - outer) / self.sx).floor() as i64;
        let x_hi = ((cx + outer) / self.sx).ceil() as i64;
        let y_lo = ((cy - outer) / self.sy).floor() as i64;
        let y_hi = ((cy + outer) / self.sy).ceil() as i64;
        let (in2, out2) = (inner * inner, outer * outer);

        let mut hit = false;
        for py in y_lo..=y_hi {
            for px in x_lo..=x_hi {
                let dx = (px as f32 + 0.5) * self.sx - cx;
                let dy = (py as f32 + 0.5) * self.sy - cy;
                let d2 = dx * dx + dy * dy;
                if d2 >= in2 && d2 <= out2 {
                    self.blend(px, py, c, alpha);
                    hit = true;
                }
            }
        }

        if !hit && inner <= 0.0 {
            let (rx, ry) = self.raster(cx, cy);
            self.blend(rx.floor() as i64, ry.floor() as i64, c, alpha);
        }
    }

    /// Writes the raster into `frame` using half blocks: the upper pixel of a
    /// cell is the foreground of `▀`, the lower pixel its background.
    pub fn present(&self, frame: &mut Frame, palette: &Palette) {
        let cols = self.cols.min(frame.width);
        let rows = self.rows.min(frame.height);
        for row in 0..rows {
            for col in 0..cols {
                let top = self.pixel(col as usize, row as usize * 2);
                let bottom = self.pixel(col as usize, row as usize * 2 + 1);
                frame.set(col, row, half_block(top, bottom, palette));
            }
        }
    }
}

fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

fn half_block(top: Option<Rgb>, bottom: Option<Rgb>, palette: &Palette) -> Cell {
    if palette.mode == ColorMode::Mono {
        let top = top.is_some_and(|c| palette.is_lit(c));
        let bottom = bottom.is_some_and(|c| palette.is_lit(c));
        let ch = match (top, bottom) {
            (true, true) => FULL_BLOCK,
            (true, false) => UPPER_HALF,
            (false, true) => LOWER_HALF,
            (false, false) => ' ',
        };
        return Cell {
            ch,
            fg: None,
            bg: palette.bg,
        };
    }

    match (top, bottom) {
        (None, None) => Cell::blank_with_bg(palette.bg),
        (Some(t), None) => Cell {
            ch: UPPER_HALF,
            fg: palette.quantize(t),
            bg: palette.bg,
        },
        (None, Some(b)) => Cell {
            ch: LOWER_HALF,
            fg: palette.quantize(b),
            bg: palette.bg,
        },
        (Some(t), Some(b)) => Cell {
            ch: UPPER_HALF,
            fg: palette.quantize(t),
            bg: palette.quantize(b),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::Canvas;
    use crate::cell::{FULL_BLOCK, LOWER_HALF, UPPER_HALF};
    use crate::frame::Frame;
    use crate::palette::{build_palette, Rgb};
    use crate::runtime::{ColorMode, ColorScheme};
    use crate::surface::SurfaceSize;

    const WHITE: Rgb = Rgb::new(255, 255, 255);

    /// 10x5 cells over a 100x100 device surface: 10 device px per raster
    /// pixel in both directions.
    fn canvas() -> Canvas {
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
    fn raster_has_two_rows_per_cell() {
        assert_eq!(Canvas::new(10, 5).size(), (10, 10));
    }

    #[test]
    fn vertical_line_covers_each_row_once() {
        let mut c = canvas();
        c.stroke_line((55.0, 95.0), (55.0, 5.0), 1.0, WHITE, 0.5);
        assert_eq!(c.inked(), 10);
        for y in 0..10 {
            assert_eq!(c.pixel(5, y), Some(Rgb::new(128, 128, 128)));
        }
    }

    #[test]
    fn blending_is_source_over() {
        let mut c = canvas();
        c.fill_circle((5.0, 5.0), 1.0, WHITE, 0.5);
        c.fill_circle((5.0, 5.0), 1.0, WHITE, 0.5);
        assert_eq!(c.pixel(0, 0), Some(Rgb::new(191, 191, 191)));
    }

    #[test]
    fn gain_boosts_alpha_and_saturates() {
        let mut c = canvas();
        c.set_gain(4.0);
        c.fill_circle((5.0, 5.0), 1.0, WHITE, 0.5);
        assert_eq!(c.pixel(0, 0), Some(WHITE));
    }

    #[test]
    fn stroked_circle_leaves_center_empty() {
        let mut c = canvas();
        c.stroke_circle((50.0, 50.0), 30.0, 1.0, WHITE, 1.0);
        assert_eq!(c.pixel(4, 4), None);
        assert_eq!(c.pixel(5, 5), None);
        assert!(c.inked() > 8);
    }

    #[test]
    fn drawing_off_surface_is_ignored() {
        let mut c = canvas();
        c.stroke_line((-50.0, -50.0), (-10.0, -90.0), 1.0, WHITE, 1.0);
        c.fill_circle((500.0, 500.0), 5.0, WHITE, 1.0);
        assert_eq!(c.inked(), 0);
    }

    #[test]
    fn present_maps_pixel_pairs_to_half_blocks() {
        let mut c = canvas();
        c.fill_circle((5.0, 5.0), 1.0, WHITE, 1.0);
        c.fill_circle((15.0, 15.0), 1.0, WHITE, 1.0);
        c.fill_circle((25.0, 5.0), 1.0, WHITE, 1.0);
        c.fill_circle((25.0, 15.0), 1.0, WHITE, 1.0);

        let palette = build_palette(ColorScheme::Rain, ColorMode::TrueColor, false);
        let mut frame = Frame::new(10, 5, palette.bg);
        c.present(&mut frame, &palette);

        assert_eq!(frame.get(0, 0).map(|x| x.ch), Some(UPPER_HALF));
        assert_eq!(frame.get(1, 0).map(|x| x.ch), Some(LOWER_HALF));
        assert_eq!(frame.get(2, 0).map(|x| x.ch), Some(UPPER_HALF));
        assert_eq!(frame.get(3, 0).map(|x| x.ch), Some(' '));

        let both = frame.get(2, 0).copied();
        assert_eq!(both.and_then(|x| x.bg), palette.quantize(WHITE));

        let mono = build_palette(ColorScheme::Rain, ColorMode::Mono, false);
        c.present(&mut frame, &mono);
        assert_eq!(frame.get(2, 0).map(|x| x.ch), Some(FULL_BLOCK));
        assert_eq!(frame.get(0, 0).and_then(|x| x.fg), None);
    }
}
