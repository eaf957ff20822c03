// Copyright (c) 2026 rezky_nightky

pub const AREA_PER_DROP: u64 = 9000;
pub const MIN_DROPS: usize = 30;
pub const MAX_DROPS: usize = 240;

pub const MIN_SCALE: f32 = 1.0;
pub const MAX_SCALE: f32 = 2.0;

/// Pixel size assumed for a terminal cell when the terminal does not report
/// its window size in pixels.
pub const FALLBACK_CELL_PX: (f32, f32) = (8.0, 16.0);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scale: f32,
}

impl Viewport {
    pub fn for_grid(cols: u16, rows: u16, px_width: u16, px_height: u16, scale: f32) -> Self {
        let (width, height) = if px_width == 0 || px_height == 0 {
            (
                cols as f32 * FALLBACK_CELL_PX.0,
                rows as f32 * FALLBACK_CELL_PX.1,
            )
        } else {
            (px_width as f32, px_height as f32)
        };
        Self {
            width,
            height,
            scale,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
    pub scale: f32,
    pub max_drops: usize,
}

impl SurfaceSize {
    pub fn from_viewport(vp: Viewport) -> Self {
        let scale = if vp.scale.is_finite() {
            vp.scale.clamp(MIN_SCALE, MAX_SCALE)
        } else {
            MIN_SCALE
        };
        let width = device_px(vp.width, scale);
        let height = device_px(vp.height, scale);
        let area = width as u64 * height as u64;
        let max_drops = ((area / AREA_PER_DROP) as usize).clamp(MIN_DROPS, MAX_DROPS);

        Self {
            width,
            height,
            scale,
            max_drops,
        }
    }
}

fn device_px(logical: f32, scale: f32) -> u32 {
    if !logical.is_finite() || logical <= 0.0 {
        return 0;
    }
    (logical * scale).floor() as u32
}

#[cfg(test)]
mod tests {
    use super::{SurfaceSize, Viewport};

    fn vp(width: f32, height: f32, scale: f32) -> Viewport {
        Viewport {
            width,
            height,
            scale,
        }
    }

    #[test]
    fn thousand_square_at_scale_one_holds_111_drops() {
        let s = SurfaceSize::from_viewport(vp(1000.0, 1000.0, 1.0));
        assert_eq!((s.width, s.height), (1000, 1000));
        assert_eq!(s.max_drops, 111);
    }

    #[test]
    fn scale_is_clamped_to_one_and_two() {
        assert_eq!(SurfaceSize::from_viewport(vp(100.0, 100.0, 0.5)).scale, 1.0);
        assert_eq!(SurfaceSize::from_viewport(vp(100.0, 100.0, 3.0)).scale, 2.0);
        assert_eq!(SurfaceSize::from_viewport(vp(100.0, 100.0, f32::NAN)).scale, 1.0);

        let s = SurfaceSize::from_viewport(vp(640.5, 480.0, 1.5));
        assert_eq!((s.width, s.height), (960, 720));
    }

    #[test]
    fn capacity_is_clamped_for_tiny_and_huge_surfaces() {
        assert_eq!(SurfaceSize::from_viewport(vp(10.0, 10.0, 1.0)).max_drops, 30);
        assert_eq!(SurfaceSize::from_viewport(vp(0.0, 0.0, 1.0)).max_drops, 30);
        assert_eq!(SurfaceSize::from_viewport(vp(3840.0, 2160.0, 2.0)).max_drops, 240);
    }

    #[test]
    fn grid_viewport_falls_back_to_nominal_cell_size() {
        let v = Viewport::for_grid(100, 40, 0, 0, 1.0);
        assert_eq!((v.width, v.height), (800.0, 640.0));
        let v = Viewport::for_grid(100, 40, 1200, 900, 2.0);
        assert_eq!((v.width, v.height, v.scale), (1200.0, 900.0, 2.0));
    }
}
