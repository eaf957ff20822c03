//! Criterion benchmarks for the per-frame work of the rain effect.
//!
//! Benchmarks:
//!   - storm step at full intensity on a 160x48 terminal
//!   - rasterising the storm onto the half-block canvas
//!   - canvas to cell frame presentation in truecolor and 256 colors
//!
//! Run with: cargo bench --bench storm_step

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::StdRng, SeedableRng};

use drizzle::canvas::Canvas;
use drizzle::frame::Frame;
use drizzle::palette::build_palette;
use drizzle::params::Params;
use drizzle::runtime::{ColorMode, ColorScheme};
use drizzle::schedule::KeyframeCycle;
use drizzle::storm::Storm;
use drizzle::surface::{SurfaceSize, Viewport};

const COLS: u16 = 160;
const ROWS: u16 = 48;
const DT: f32 = 1.0 / 60.0;

fn surface(scale: f32) -> SurfaceSize {
    SurfaceSize::from_viewport(Viewport::for_grid(COLS, ROWS, 0, 0, scale))
}

/// A storm that has been raining at full strength for a few seconds.
fn warm_storm(surface: SurfaceSize) -> Storm {
    let mut storm = Storm::with_cycle(
        Params::default(),
        surface,
        KeyframeCycle::new(0.0, 60.0),
        StdRng::seed_from_u64(7),
    );
    storm.hold_intensity(Some(1.0));
    let mut t = 0.0;
    for _ in 0..600 {
        t += DT;
        storm.step(DT, t);
    }
    storm
}

// ---------------------------------------------------------------------------
// Benchmark: simulation step
// ---------------------------------------------------------------------------

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("storm_step");

    for scale in [1.0_f32, 2.0] {
        group.bench_with_input(BenchmarkId::new("full_rain", scale), &scale, |b, &s| {
            let mut storm = warm_storm(surface(s));
            let mut t = 10.0;
            b.iter(|| {
                t += DT;
                storm.step(black_box(DT), t);
                black_box(storm.drops().len())
            });
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: rendering
// ---------------------------------------------------------------------------

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("storm_render");
    let size = surface(1.0);
    let storm = warm_storm(size);
    let palette = build_palette(ColorScheme::Rain, ColorMode::TrueColor, false);

    group.bench_function("rasterise", |b| {
        let mut canvas = Canvas::new(COLS, ROWS);
        canvas.fit(&size);
        canvas.set_gain(3.0);
        b.iter(|| {
            canvas.clear(palette.base);
            storm.render(&mut canvas, &palette);
            black_box(canvas.inked())
        });
    });

    for mode in [ColorMode::TrueColor, ColorMode::Color256] {
        let palette = build_palette(ColorScheme::Rain, mode, false);
        let mut canvas = Canvas::new(COLS, ROWS);
        canvas.fit(&size);
        canvas.set_gain(3.0);
        canvas.clear(palette.base);
        storm.render(&mut canvas, &palette);

        group.bench_function(BenchmarkId::new("present", format!("{:?}", mode)), |b| {
            let mut frame = Frame::new(COLS, ROWS, palette.bg);
            b.iter(|| {
                canvas.present(&mut frame, &palette);
                frame.clear_dirty();
                black_box(frame.is_dirty_all())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_step, bench_render);
criterion_main!(benches);
