// Copyright (c) 2025 rezk_nightky

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Mono,
    Color16,
    Color256,
    TrueColor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorScheme {
    Rain,
    Blue,
    Green,
    Amber,
    Violet,
}

/// Lifecycle of the animation driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Running,
    Destroyed,
}

/// Whether the terminal host creates its own alternate screen (and removes it
/// on release) or draws over the screen it was started on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceMode {
    AltScreen,
    Inline,
}
