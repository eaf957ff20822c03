// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;
use std::str::FromStr;

use clap::Parser;

pub const DEFAULT_PARAMS_USAGE: &str = "DEFAULT PARAMS USAGE:\n  drizzle --color rain --color-bg black --fps 60 --scale 1 --gain 3 --delay 60,120 --rain 30,60";

pub const REDUCED_MOTION_ENV: &str = "DRIZZLE_REDUCED_MOTION";

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

/// Reduced motion is on when the variable is set to anything but an explicit
/// off value.
pub fn reduced_motion_from_env() -> bool {
    match std::env::var(REDUCED_MOTION_ENV) {
        Ok(v) => !matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "" | "0" | "false" | "no" | "off"
        ),
        Err(_) => false,
    }
}

fn colorize_help_detail(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 64);
    for chunk in text.split_inclusive('\n') {
        let (line, nl) = chunk
            .strip_suffix('\n')
            .map(|l| (l, "\n"))
            .unwrap_or((chunk, ""));

        let is_heading =
            !line.starts_with(' ') && line.ends_with(':') && line == line.to_ascii_uppercase();

        if is_heading {
            out.push_str("\x1b[1;36m");
            out.push_str(line);
            out.push_str("\x1b[0m");
        } else if let Some(rest) = line.strip_prefix("  drizzle") {
            out.push_str("  \x1b[1;34mdrizzle\x1b[0m");
            out.push_str(rest);
        } else if let Some(rest) = line.strip_prefix("  -") {
            out.push_str("  \x1b[33m-");
            out.push_str(rest);
            out.push_str("\x1b[0m");
        } else {
            out.push_str(line);
        }
        out.push_str(nl);
    }
    out
}

pub fn default_params_usage_for_help() -> String {
    if color_enabled_stdout() {
        colorize_help_detail(DEFAULT_PARAMS_USAGE)
    } else {
        DEFAULT_PARAMS_USAGE.to_string()
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorBg {
    #[value(name = "black")]
    Black,
    #[value(name = "default-background")]
    DefaultBackground,
    #[value(name = "transparent")]
    Transparent,
}

/// `LOW,HIGH` pair of seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SecsRange {
    pub low: f32,
    pub high: f32,
}

impl FromStr for SecsRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = s
            .split_once(',')
            .ok_or_else(|| "expected: SECS1,SECS2".to_string())?;
        let low: f32 = a
            .trim()
            .parse()
            .map_err(|_| "invalid low value".to_string())?;
        let high: f32 = b
            .trim()
            .parse()
            .map_err(|_| "invalid high value".to_string())?;
        if !low.is_finite() || !high.is_finite() || low < 0.0 || low > high {
            return Err("range must be >=0 and low <= high".to_string());
        }
        Ok(Self { low, high })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "drizzle", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        short = 'c',
        long = "color",
        default_value = "rain",
        help_heading = "APPEARANCE",
        help = "Color theme (see --list-colors)"
    )]
    pub color: String,

    #[arg(
        long = "color-bg",
        default_value_t = ColorBg::Black,
        value_enum,
        help_heading = "APPEARANCE",
        help = "Background mode (black, default-background, transparent)"
    )]
    pub color_bg: ColorBg,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0,16,8/256,24/32). Default: 24-bit if supported (COLORTERM), else 8-bit"
    )]
    pub colormode: Option<u16>,

    #[arg(
        long = "gain",
        default_value_t = 3.0,
        help_heading = "APPEARANCE",
        help = "Alpha boost so faint rain shows up on a terminal (min 0.1 max 10)"
    )]
    pub gain: f32,

    #[arg(
        long = "scale",
        default_value_t = 1.0,
        help_heading = "APPEARANCE",
        help = "Device scale factor (clamped to 1..2)"
    )]
    pub scale: f32,

    #[arg(
        long = "inline",
        help_heading = "APPEARANCE",
        help = "Draw over the current screen instead of an alternate screen"
    )]
    pub inline: bool,

    #[arg(
        long = "delay",
        default_value = "60,120",
        help_heading = "WEATHER",
        help = "Seconds of dry sky before rain: LOW,HIGH (min 0 max 86400)"
    )]
    pub delay: SecsRange,

    #[arg(
        long = "rain",
        default_value = "30,60",
        help_heading = "WEATHER",
        help = "Seconds of rain: LOW,HIGH (min 10 max 86400)"
    )]
    pub rain: SecsRange,

    #[arg(
        long = "intensity",
        help_heading = "WEATHER",
        help = "Hold a fixed intensity (min 0 max 1) instead of the weather cycle"
    )]
    pub intensity: Option<f32>,

    #[arg(
        long = "seed",
        help_heading = "WEATHER",
        help = "Seed the random source for a repeatable session"
    )]
    pub seed: Option<u64>,

    #[arg(
        long = "reduced-motion",
        help_heading = "GENERAL",
        help = "Do not animate (also set by DRIZZLE_REDUCED_MOTION)"
    )]
    pub reduced_motion: bool,

    #[arg(
        long = "duration",
        help_heading = "GENERAL",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        short = 'f',
        long = "fps",
        default_value_t = 60.0,
        help_heading = "PERFORMANCE",
        help = "Target FPS (min 1 max 240)"
    )]
    pub fps: f64,

    #[arg(
        long = "perf-stats",
        help_heading = "PERFORMANCE",
        help = "Print performance statistics summary on exit"
    )]
    pub perf_stats: bool,

    #[arg(
        long = "check-bitcolor",
        help_heading = "HELP",
        help = "Print detected terminal color capability and exit"
    )]
    pub check_bitcolor: bool,

    #[arg(
        long = "help-detail",
        help_heading = "HELP",
        help = "Show detailed help for all parameters and exit"
    )]
    pub help_detail: bool,

    #[arg(
        long = "list-colors",
        help_heading = "HELP",
        help = "List available color themes and exit"
    )]
    pub list_colors: bool,

    #[arg(
        long = "info",
        short = 'i',
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

pub fn print_list_colors() {
    if color_enabled_stdout() {
        println!("\x1b[1;36mAVAILABLE COLOR THEMES:\x1b[0m");
        println!("\x1b[2mNOTE: Use only the VALUE (left side) with --color.\x1b[0m");
    } else {
        println!("AVAILABLE COLOR THEMES:");
        println!("NOTE: Use only the VALUE (left side) with --color.");
    }
    println!();
    println!("VALUE        DESCRIPTION");
    println!("rain         Near-white streaks (default)");
    println!("blue         Cold blue rain (alias: ice)");
    println!("green        Green rain (alias: matrix)");
    println!("amber        Rain under street lights (alias: sodium)");
    println!("violet       Violet dusk rain (alias: purple)");
}

pub fn print_help_detail() {
    let block = format!(
        "{}\n\nUSAGE:\n  drizzle [OPTIONS]\n\nGENERAL:\n  --duration <seconds>\n      Stop after N seconds (min 0.1 max 86400).\n\n  --reduced-motion\n      Do not animate at all. DRIZZLE_REDUCED_MOTION=1 does the same.\n\nWEATHER:\n  --delay <low,high>\n      Dry seconds before the rain arrives, picked once per session.\n\n  --rain <low,high>\n      Seconds the rain lasts before it fades, picked once per session.\n\n  --intensity <0..1>\n      Hold a fixed intensity; the rain then lasts until you press s or q.\n\n  --seed <number>\n      Repeatable timing and drop placement.\n\nAPPEARANCE:\n  -c, --color <name>\n      Set theme (see --list-colors).\n\n  --colormode <0|16|8|24>\n      Force color mode; otherwise auto-detected from COLORTERM/TERM.\n\n  --color-bg <black|default-background|transparent>\n      Background mode.\n\n  --gain <number>\n      Alpha boost (min 0.1 max 10).\n\n  --scale <number>\n      Device scale factor (1..2); thicker drops and bigger ripples.\n\n  --inline\n      Draw over the current screen instead of an alternate screen.\n\nPERFORMANCE:\n  -f, --fps <number>\n      Target FPS (min 1 max 240).\n\n  --perf-stats\n      Print performance statistics summary on exit.\n\nKEYS:\n  s      Let the rain stop\n  space  Start again\n  q/Esc  Quit\n",
        DEFAULT_PARAMS_USAGE
    );

    if color_enabled_stdout() {
        print!("{}", colorize_help_detail(&block));
    } else {
        print!("{}", block);
    }
    println!();
    print_list_colors();
}
