// Copyright (c) 2026 rezky_nightky

use std::env;
use std::time::{Duration, Instant};

#[cfg(unix)]
use std::thread;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use drizzle::config::{
    color_enabled_stdout, default_params_usage_for_help, print_help_detail, print_list_colors,
    reduced_motion_from_env, Args, ColorBg,
};
use drizzle::palette::build_palette;
use drizzle::params::Params;
use drizzle::runtime::{ColorMode, ColorScheme, DriverState, SurfaceMode};
use drizzle::schedule::MIN_RAIN_SECS;
use drizzle::terminal::{restore_terminal_best_effort, Terminal};
use drizzle::{FxConfig, RainFx, TermHost};

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

fn build_info() -> &'static str {
    env!("DRIZZLE_BUILD")
}

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

fn require_f64_range(name: &str, v: f64, min: f64, max: f64) -> f64 {
    if !v.is_finite() {
        eprintln!("failed to apply {} {} (must be a finite number)", name, v);
        std::process::exit(1);
    }
    if v < min || v > max {
        eprintln!("failed to apply {} {} (min {} max {})", name, v, min, max);
        std::process::exit(1);
    }
    v
}

fn require_f32_range(name: &str, v: f32, min: f32, max: f32) -> f32 {
    require_f64_range(name, v as f64, min as f64, max as f64) as f32
}

fn detect_color_mode_auto() -> ColorMode {
    let colorterm = env::var("COLORTERM")
        .unwrap_or_default()
        .to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorMode::TrueColor;
    }

    let term = env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term == "dumb" {
        return ColorMode::Mono;
    }

    ColorMode::Color256
}

fn detect_color_mode(args: &Args) -> ColorMode {
    match args.colormode {
        None => detect_color_mode_auto(),
        Some(0) => ColorMode::Mono,
        Some(16) => ColorMode::Color16,
        Some(8) | Some(256) => ColorMode::Color256,
        Some(24) | Some(32) => ColorMode::TrueColor,
        Some(m) => {
            eprintln!("invalid --colormode: {} (allowed: 0,16,8/256,24/32)", m);
            std::process::exit(1);
        }
    }
}

fn color_mode_label(m: ColorMode) -> &'static str {
    match m {
        ColorMode::TrueColor => "24-bit truecolor",
        ColorMode::Color256 => "8-bit (256-color)",
        ColorMode::Color16 => "16-color",
        ColorMode::Mono => "mono",
    }
}

fn parse_color_scheme(s: &str) -> Result<ColorScheme, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "rain" | "default" => Ok(ColorScheme::Rain),
        "blue" | "ice" => Ok(ColorScheme::Blue),
        "green" | "matrix" => Ok(ColorScheme::Green),
        "amber" | "sodium" => Ok(ColorScheme::Amber),
        "violet" | "purple" => Ok(ColorScheme::Violet),
        _ => Err(format!("invalid color: {} (see --list-colors)", s)),
    }
}

fn main() -> std::io::Result<()> {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(130);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }

    let mut cmd = Args::command();
    cmd = cmd.styles(clap_styles());
    cmd = cmd.before_help(default_params_usage_for_help());
    let help_template = if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    };
    cmd = cmd.help_template(help_template);
    cmd.build();

    if cmd.get_arguments().any(|a| a.get_id().as_str() == "help") {
        cmd = cmd.mut_arg("help", |a| a.help_heading("HELP"));
    }

    let matches = cmd.get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if args.list_colors {
        print_list_colors();
        return Ok(());
    }

    if args.help_detail {
        print_help_detail();
        return Ok(());
    }

    if args.check_bitcolor {
        let colorterm = env::var("COLORTERM").unwrap_or_default();
        let term = env::var("TERM").unwrap_or_default();
        let or_unset = |v: &str| {
            if v.is_empty() {
                "(unset)".to_string()
            } else {
                v.to_string()
            }
        };
        println!("BITCOLOR CHECK:");
        println!("  COLORTERM: {}", or_unset(&colorterm));
        println!("  TERM: {}", or_unset(&term));
        println!("  auto_detected: {}", color_mode_label(detect_color_mode_auto()));
        if args.colormode.is_some() {
            println!("  forced: {}", color_mode_label(detect_color_mode(&args)));
        }
        println!("  effective: {}", color_mode_label(detect_color_mode(&args)));
        return Ok(());
    }

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.info {
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        let sha = env!("DRIZZLE_GIT_SHA");
        if sha.is_empty() {
            println!("Build: {}", build_info());
        } else {
            println!("Build: {} ({})", build_info(), sha);
        }
        println!("Copyright: (c) 2026 {}", env!("CARGO_PKG_AUTHORS"));
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        println!("Source: {}", env!("CARGO_PKG_REPOSITORY"));
        return Ok(());
    }

    let color_mode = detect_color_mode(&args);
    let color_scheme = match parse_color_scheme(&args.color) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let target_fps = require_f64_range("--fps", args.fps, 1.0, 240.0);
    let gain = require_f32_range("--gain", args.gain, 0.1, 10.0);
    let scale = require_f32_range("--scale", args.scale, 0.1, 10.0);
    let delay_low = require_f32_range("--delay low", args.delay.low, 0.0, 86400.0);
    let delay_high = require_f32_range("--delay high", args.delay.high, 0.0, 86400.0);
    let rain_low = require_f32_range("--rain low", args.rain.low, MIN_RAIN_SECS, 86400.0);
    let rain_high = require_f32_range("--rain high", args.rain.high, MIN_RAIN_SECS, 86400.0);
    let hold = args
        .intensity
        .map(|v| require_f32_range("--intensity", v, 0.0, 1.0));
    let duration_s = args.duration.and_then(|s| {
        if !s.is_finite() {
            eprintln!("failed to apply --duration {} (must be a finite number)", s);
            std::process::exit(1);
        }
        (s > 0.0).then(|| require_f64_range("--duration", s, 0.1, 86400.0))
    });

    let reduced_motion = args.reduced_motion || reduced_motion_from_env();
    let surface_mode = if args.inline {
        SurfaceMode::Inline
    } else {
        SurfaceMode::AltScreen
    };

    let palette = build_palette(
        color_scheme,
        color_mode,
        matches!(
            args.color_bg,
            ColorBg::DefaultBackground | ColorBg::Transparent
        ),
    );
    let frame_period = Duration::from_secs_f64(1.0 / target_fps);
    let fx_config = FxConfig {
        params: Params {
            onset: (delay_low, delay_high),
            rain: (rain_low, rain_high),
            ..Params::default()
        },
        seed: args.seed,
        frame_period,
        hold,
        gain,
    };

    let host = TermHost::new(surface_mode, scale, reduced_motion)?;
    let start_time = Instant::now();
    let mut fx = RainFx::new(host, palette, fx_config, start_time);
    fx.start(start_time);

    if fx.state() != DriverState::Running {
        eprintln!("reduced motion requested; not animating");
        return Ok(());
    }

    let end_time = duration_s.map(|s| start_time + Duration::from_secs_f64(s));
    let target_period_s = frame_period.as_secs_f32().max(0.000_001);

    let mut perf_work_sum_s: f64 = 0.0;
    let mut perf_work_max_s: f32 = 0.0;
    let mut perf_overshoot_frames: u64 = 0;

    let mut quit = false;
    // The session ends once the rain has drained and the driver is idle.
    while !quit && fx.state() == DriverState::Running {
        if end_time.is_some_and(|end| Instant::now() >= end) {
            break;
        }
        let mut pending_resize: Option<(u16, u16)> = None;

        loop {
            while Terminal::poll_event(Duration::from_millis(0))? {
                match Terminal::read_event()? {
                    Event::Resize(nw, nh) => pending_resize = Some((nw, nh)),
                    Event::Key(k) if k.kind == KeyEventKind::Press => match (k.code, k.modifiers) {
                        (KeyCode::Esc, _) | (KeyCode::Char('q'), _) => quit = true,
                        (KeyCode::Char('c'), KeyModifiers::CONTROL) => quit = true,
                        (KeyCode::Char('s'), _) => fx.stop(Instant::now()),
                        (KeyCode::Char(' '), _) => fx.start(Instant::now()),
                        _ => {}
                    },
                    _ => {}
                }
            }

            if quit || pending_resize.is_some() {
                break;
            }

            let now = Instant::now();
            let Some(ticket) = fx.ticket() else {
                break;
            };
            if now >= ticket.due {
                break;
            }

            let mut timeout = ticket.due - now;
            if let Some(end) = end_time {
                if now >= end {
                    break;
                }
                timeout = timeout.min(end - now);
            }
            let _ = Terminal::poll_event(timeout)?;
        }

        if quit {
            break;
        }

        if let Some((nw, nh)) = pending_resize {
            fx.host_mut().set_grid(nw, nh);
            fx.resize();
        }

        let now = Instant::now();
        if !fx.frame_due(now) {
            continue;
        }

        let work_start = Instant::now();
        fx.run_frame(now)?;
        let work_s = work_start.elapsed().as_secs_f32();

        perf_work_sum_s += work_s as f64;
        perf_work_max_s = perf_work_max_s.max(work_s);
        if work_s > target_period_s {
            perf_overshoot_frames = perf_overshoot_frames.saturating_add(1);
        }
    }

    let frames = fx.frames();
    let stats = fx.stats();
    let cycle = fx.storm().cycle().clone();
    fx.destroy();

    if args.perf_stats {
        let elapsed_s = start_time.elapsed().as_secs_f64().max(0.000_001);
        let n = frames.max(1) as f64;

        println!("PERF STATS:");
        println!("  elapsed_s: {:.3}", elapsed_s);
        println!("  target_fps: {:.3}", target_fps);
        println!("  avg_fps: {:.3}", frames as f64 / elapsed_s);
        println!("  frames: {}", frames);
        println!("  avg_work_ms: {:.3}", perf_work_sum_s / n * 1000.0);
        println!("  max_work_ms: {:.3}", perf_work_max_s as f64 * 1000.0);
        println!(
            "  overshoot_frames: {} ({:.1}%)",
            perf_overshoot_frames,
            perf_overshoot_frames as f64 / n * 100.0
        );
        println!("  rain_onset_s: {:.1}", cycle.onset());
        println!("  rain_length_s: {:.1}", cycle.rain());
        println!("  cycle_s: {:.1}", cycle.duration());
        println!("  drops_spawned: {}", stats.spawned);
        println!("  impacts: {}", stats.impacts);
        println!("  peak_drops: {}", stats.peak_drops);
        println!("  peak_splashes: {}", stats.peak_splashes);
        println!("  peak_ripples: {}", stats.peak_ripples);
    }

    Ok(())
}
