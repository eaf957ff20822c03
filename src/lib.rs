// Copyright (c) 2026 rezky_nightky

//! Ambient terminal rain: streaks fall, burst into splashes and leave ripples,
//! while a keyframe cycle brings the rain in, holds it and lets it fade.

pub mod canvas;
pub mod cell;
pub mod config;
pub mod frame;
pub mod fx;
pub mod host;
pub mod palette;
pub mod params;
pub mod particle;
pub mod runtime;
pub mod schedule;
pub mod storm;
pub mod surface;
pub mod terminal;
pub mod timebase;

pub use fx::{FrameOutcome, FrameTicket, FxConfig, RainFx};
pub use host::{HeadlessHost, Host, TermHost};
