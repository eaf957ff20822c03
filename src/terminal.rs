// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Result, Stdout, Write};

use crossterm::{
    cursor, event,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::cell::Cell;
use crate::frame::Frame;
use crate::runtime::SurfaceMode;

/// Pen state while emitting a frame, so colours are only re-sent on change.
#[derive(Default)]
struct Pen {
    fg: Option<Color>,
    bg: Option<Color>,
    pos: Option<(u16, u16)>,
}

impl Pen {
    fn paint(&mut self, out: &mut Stdout, fg: Option<Color>, bg: Option<Color>) -> Result<()> {
        if fg != self.fg {
            out.queue(SetForegroundColor(fg.unwrap_or(Color::Reset)))?;
            self.fg = fg;
        }
        if bg != self.bg {
            out.queue(SetBackgroundColor(bg.unwrap_or(Color::Reset)))?;
            self.bg = bg;
        }
        Ok(())
    }
}

/// What the terminal currently shows, for diffing the next frame against.
struct Shown {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

pub struct Terminal {
    stdout: Stdout,
    mode: SurfaceMode,
    shown: Option<Shown>,
    run_buf: String,
    rows: Vec<Vec<usize>>,
    touched: Vec<u16>,
}

impl Terminal {
    pub fn new(mode: SurfaceMode) -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init: Result<()> = (|| {
            if mode == SurfaceMode::AltScreen {
                out.execute(terminal::EnterAlternateScreen)?;
            }
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(SetAttribute(Attribute::Reset))?;
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()?;
            Ok(())
        })();
        if let Err(e) = init {
            restore(&mut out, mode);
            return Err(e);
        }
        Ok(Self {
            stdout: out,
            mode,
            shown: None,
            run_buf: String::with_capacity(64),
            rows: Vec::new(),
            touched: Vec::new(),
        })
    }

    pub fn size() -> Result<(u16, u16)> {
        terminal::size()
    }

    /// Window size in pixels, `(0, 0)` when the terminal does not say.
    pub fn pixel_size() -> (u16, u16) {
        terminal::window_size()
            .map(|ws| (ws.width, ws.height))
            .unwrap_or((0, 0))
    }

    pub fn poll_event(timeout: std::time::Duration) -> Result<bool> {
        event::poll(timeout)
    }

    pub fn read_event() -> Result<event::Event> {
        event::read()
    }

    pub fn draw(&mut self, frame: &mut Frame) -> Result<()> {
        let size_changed = self
            .shown
            .as_ref()
            .map(|s| s.width != frame.width || s.height != frame.height)
            .unwrap_or(true);
        let total = frame.width as usize * frame.height as usize;
        let large = total > 0 && frame.dirty_indices().len() >= total / 3;

        if size_changed || frame.is_dirty_all() || large {
            self.draw_full(frame, size_changed)?;
        } else {
            self.draw_dirty(frame)?;
        }

        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;
        frame.clear_dirty();
        Ok(())
    }

    fn draw_full(&mut self, frame: &Frame, size_changed: bool) -> Result<()> {
        if size_changed {
            self.stdout
                .queue(terminal::Clear(terminal::ClearType::All))?;
            self.shown = Some(Shown {
                width: frame.width,
                height: frame.height,
                cells: vec![Cell::blank_with_bg(None); frame.width as usize * frame.height as usize],
            });
        }
        let Some(shown) = self.shown.as_mut() else {
            return Ok(());
        };

        let mut pen = Pen::default();
        for y in 0..frame.height {
            self.stdout.queue(cursor::MoveTo(0, y))?;
            for x in 0..frame.width {
                let idx = y as usize * frame.width as usize + x as usize;
                let cell = frame.cell_at_index(idx);
                pen.paint(&mut self.stdout, cell.fg, cell.bg)?;
                self.stdout.queue(Print(cell.ch))?;
                shown.cells[idx] = cell;
            }
        }
        Ok(())
    }

    /// Rewrites changed cells, batching horizontal runs that share colours.
    fn draw_dirty(&mut self, frame: &Frame) -> Result<()> {
        let Some(shown) = self.shown.as_mut() else {
            return Ok(());
        };
        let width = frame.width as usize;

        if self.rows.len() != frame.height as usize {
            self.rows = vec![Vec::new(); frame.height as usize];
        }
        self.touched.clear();
        for &idx in frame.dirty_indices() {
            let y = idx / width;
            if y >= self.rows.len() {
                continue;
            }
            if self.rows[y].is_empty() {
                self.touched.push(y as u16);
            }
            self.rows[y].push(idx);
        }
        self.touched.sort_unstable();

        let mut pen = Pen::default();
        for &y in &self.touched {
            let row = &mut self.rows[y as usize];
            row.sort_unstable();

            let mut i = 0;
            while i < row.len() {
                let start = row[i];
                let head = frame.cell_at_index(start);
                if shown.cells[start] == head {
                    i += 1;
                    continue;
                }
                shown.cells[start] = head;

                self.run_buf.clear();
                self.run_buf.push(head.ch);
                let mut end = start;
                let mut j = i + 1;
                while j < row.len() && row[j] == end + 1 {
                    let next = frame.cell_at_index(row[j]);
                    if shown.cells[row[j]] == next || next.fg != head.fg || next.bg != head.bg {
                        break;
                    }
                    self.run_buf.push(next.ch);
                    shown.cells[row[j]] = next;
                    end = row[j];
                    j += 1;
                }

                let x = (start % width) as u16;
                if pen.pos != Some((x, y)) {
                    self.stdout.queue(cursor::MoveTo(x, y))?;
                }
                pen.paint(&mut self.stdout, head.fg, head.bg)?;
                self.stdout.queue(Print(self.run_buf.as_str()))?;

                let next_x = (end % width) as u16 + 1;
                pen.pos = (next_x < frame.width).then_some((next_x, y));
                i = j;
            }
            row.clear();
        }
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.mode == SurfaceMode::Inline {
            let _ = self.stdout.execute(terminal::Clear(terminal::ClearType::All));
            let _ = self.stdout.execute(cursor::MoveTo(0, 0));
        }
        restore(&mut self.stdout, self.mode);
    }
}

fn restore(out: &mut Stdout, mode: SurfaceMode) {
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    if mode == SurfaceMode::AltScreen {
        let _ = out.execute(terminal::LeaveAlternateScreen);
    }
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}

pub fn restore_terminal_best_effort() {
    restore(&mut stdout(), SurfaceMode::AltScreen);
}
