// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::runtime::{ColorMode, ColorScheme};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Rec. 601 luma, 0..=255.
    pub fn luma(self) -> u8 {
        let y = 0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32;
        y.round().clamp(0.0, 255.0) as u8
    }

    fn dist2(self, other: Rgb) -> i32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        dr * dr + dg * dg + db * db
    }
}

#[derive(Clone, Debug)]
pub struct Palette {
    pub mode: ColorMode,
    /// Terminal background for cells nothing was drawn on. `None` keeps the
    /// terminal's own background.
    pub bg: Option<Color>,
    /// Background the raster blends over.
    pub base: Rgb,
    pub drop: Rgb,
    pub splash: Rgb,
    pub ripple: Rgb,
}

/// Pixels dimmer than this are left blank in mono mode.
const MONO_THRESHOLD: u8 = 24;

impl Palette {
    pub fn quantize(&self, c: Rgb) -> Option<Color> {
        match self.mode {
            ColorMode::Mono => None,
            ColorMode::TrueColor => Some(Color::Rgb {
                r: c.r,
                g: c.g,
                b: c.b,
            }),
            ColorMode::Color256 => Some(Color::AnsiValue(rgb_to_ansi256(c))),
            ColorMode::Color16 => Some(rgb_to_color16(c)),
        }
    }

    pub fn is_lit(&self, c: Rgb) -> bool {
        c.luma() >= MONO_THRESHOLD
    }
}

fn rgb_to_ansi256(c: Rgb) -> u8 {
    const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

    let level = |v: u8| ((v as u16 * 5 + 127) / 255) as u8;
    let (r6, g6, b6) = (level(c.r), level(c.g), level(c.b));
    let cube = Rgb::new(
        CUBE_LEVELS[r6 as usize],
        CUBE_LEVELS[g6 as usize],
        CUBE_LEVELS[b6 as usize],
    );
    let cube_idx = 16 + 36 * r6 + 6 * g6 + b6;

    let avg = ((c.r as u16 + c.g as u16 + c.b as u16) / 3) as u8;
    let (gray_idx, gray) = match avg {
        0..=7 => (16, Rgb::BLACK),
        239..=255 => (231, Rgb::new(255, 255, 255)),
        _ => {
            let step = (avg - 8) / 10;
            let v = 8 + 10 * step;
            (232 + step, Rgb::new(v, v, v))
        }
    };

    if c.dist2(gray) < c.dist2(cube) {
        gray_idx
    } else {
        cube_idx
    }
}

fn rgb_to_color16(c: Rgb) -> Color {
    const TABLE: [(Color, Rgb); 16] = [
        (Color::Black, Rgb::new(0, 0, 0)),
        (Color::DarkGrey, Rgb::new(128, 128, 128)),
        (Color::Grey, Rgb::new(192, 192, 192)),
        (Color::White, Rgb::new(255, 255, 255)),
        (Color::DarkRed, Rgb::new(128, 0, 0)),
        (Color::Red, Rgb::new(255, 0, 0)),
        (Color::DarkGreen, Rgb::new(0, 128, 0)),
        (Color::Green, Rgb::new(0, 255, 0)),
        (Color::DarkBlue, Rgb::new(0, 0, 128)),
        (Color::Blue, Rgb::new(0, 0, 255)),
        (Color::DarkCyan, Rgb::new(0, 128, 128)),
        (Color::Cyan, Rgb::new(0, 255, 255)),
        (Color::DarkMagenta, Rgb::new(128, 0, 128)),
        (Color::Magenta, Rgb::new(255, 0, 255)),
        (Color::DarkYellow, Rgb::new(128, 128, 0)),
        (Color::Yellow, Rgb::new(255, 255, 0)),
    ];

    TABLE
        .iter()
        .min_by_key(|(_, rgb)| c.dist2(*rgb))
        .map(|(color, _)| *color)
        .unwrap_or(Color::White)
}

pub fn build_palette(scheme: ColorScheme, mode: ColorMode, default_background: bool) -> Palette {
    let (drop, splash, ripple) = match scheme {
        ColorScheme::Rain => (
            Rgb::new(230, 235, 240),
            Rgb::new(230, 235, 240),
            Rgb::new(255, 255, 255),
        ),
        ColorScheme::Blue => (
            Rgb::new(150, 190, 255),
            Rgb::new(170, 205, 255),
            Rgb::new(205, 225, 255),
        ),
        ColorScheme::Green => (
            Rgb::new(120, 255, 150),
            Rgb::new(150, 255, 170),
            Rgb::new(200, 255, 210),
        ),
        ColorScheme::Amber => (
            Rgb::new(255, 196, 110),
            Rgb::new(255, 210, 140),
            Rgb::new(255, 230, 190),
        ),
        ColorScheme::Violet => (
            Rgb::new(200, 160, 255),
            Rgb::new(215, 185, 255),
            Rgb::new(235, 220, 255),
        ),
    };

    let bg = if default_background || mode == ColorMode::Mono {
        None
    } else {
        Some(Color::Black)
    };

    Palette {
        mode,
        bg,
        base: Rgb::BLACK,
        drop,
        splash,
        ripple,
    }
}

#[cfg(test)]
mod tests {
    use crossterm::style::Color;

    use super::{build_palette, rgb_to_ansi256, rgb_to_color16, Rgb};
    use crate::runtime::{ColorMode, ColorScheme};

    #[test]
    fn ansi256_prefers_gray_ramp_for_grays() {
        assert_eq!(rgb_to_ansi256(Rgb::new(0, 0, 0)), 16);
        assert_eq!(rgb_to_ansi256(Rgb::new(255, 255, 255)), 231);
        let idx = rgb_to_ansi256(Rgb::new(48, 48, 48));
        assert!((232..=255).contains(&idx));
    }

    #[test]
    fn ansi256_maps_pure_colors_into_cube() {
        assert_eq!(rgb_to_ansi256(Rgb::new(255, 0, 0)), 196);
        assert_eq!(rgb_to_ansi256(Rgb::new(0, 0, 255)), 21);
    }

    #[test]
    fn color16_picks_nearest() {
        assert_eq!(rgb_to_color16(Rgb::new(250, 250, 250)), Color::White);
        assert_eq!(rgb_to_color16(Rgb::new(10, 10, 120)), Color::DarkBlue);
    }

    #[test]
    fn mono_palette_emits_no_colors() {
        let p = build_palette(ColorScheme::Rain, ColorMode::Mono, false);
        assert_eq!(p.bg, None);
        assert_eq!(p.quantize(Rgb::new(200, 200, 200)), None);
        assert!(p.is_lit(Rgb::new(200, 200, 200)));
        assert!(!p.is_lit(Rgb::new(5, 5, 5)));
    }

    #[test]
    fn default_background_leaves_bg_unset() {
        let p = build_palette(ColorScheme::Blue, ColorMode::TrueColor, true);
        assert_eq!(p.bg, None);
        let p = build_palette(ColorScheme::Blue, ColorMode::TrueColor, false);
        assert_eq!(p.bg, Some(Color::Black));
    }
}
