#![forbid(unsafe_code)]

//! Half-block terminal surface.
//!
//! Each terminal cell shows two vertically stacked pixels using `▀`: the
//! foreground paints the upper pixel and the background the lower one, so a
//! `cols x rows` terminal backs a `cols x rows * 2` pixel buffer.

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{
    self, EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode,
    enable_raw_mode,
};
use crossterm::{execute, queue};
use spiral_core::{PackedRgba, PixelBuffer, Surface};

const UPPER_HALF_BLOCK: char = '\u{2580}';

/// Pixel color as shown on a terminal. Unset (transparent) pixels are black.
fn terminal_color(px: PackedRgba) -> Color {
    if px.a() == 0 {
        return Color::Rgb { r: 0, g: 0, b: 0 };
    }
    Color::Rgb {
        r: px.r(),
        g: px.g(),
        b: px.b(),
    }
}

/// Upper and lower pixel colors of terminal cell (`col`, `row`).
pub fn cell_colors(frame: &PixelBuffer, col: u16, row: u16) -> (PackedRgba, PackedRgba) {
    let x = i32::from(col);
    let y = i32::from(row) * 2;
    let top = frame.get(x, y).unwrap_or(PackedRgba::TRANSPARENT);
    let bottom = frame.get(x, y + 1).unwrap_or(PackedRgba::TRANSPARENT);
    (top, bottom)
}

/// Encode a whole frame as half-block cells, skipping redundant color changes.
pub fn encode_frame(frame: &PixelBuffer, cols: u16, rows: u16, out: &mut impl Write) -> io::Result<()> {
    let mut current: Option<(Color, Color)> = None;
    for row in 0..rows {
        queue!(out, MoveTo(0, row))?;
        for col in 0..cols {
            let (top, bottom) = cell_colors(frame, col, row);
            let colors = (terminal_color(top), terminal_color(bottom));
            if current != Some(colors) {
                queue!(out, SetForegroundColor(colors.0), SetBackgroundColor(colors.1))?;
                current = Some(colors);
            }
            queue!(out, Print(UPPER_HALF_BLOCK))?;
        }
    }
    queue!(out, ResetColor)?;
    Ok(())
}

/// Surface that renders frames to a terminal writer.
///
/// `present` cannot return an error, so the first I/O failure is latched and
/// later frames are skipped until the owner collects it with
/// [`TermSurface::take_error`].
#[derive(Debug)]
pub struct TermSurface<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
    scratch: Vec<u8>,
    error: Option<io::Error>,
}

impl<W: Write> TermSurface<W> {
    pub fn new(out: W, cols: u16, rows: u16) -> Self {
        Self {
            out,
            cols,
            rows,
            scratch: Vec::new(),
            error: None,
        }
    }

    /// Take the latched presentation error, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    /// Show `status` in the terminal title.
    pub fn set_status(&mut self, status: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = execute!(self.out, SetTitle(status)) {
            self.error = Some(err);
        }
    }

    fn write_frame(&mut self, frame: &PixelBuffer) -> io::Result<()> {
        self.scratch.clear();
        encode_frame(frame, self.cols, self.rows, &mut self.scratch)?;
        self.out.write_all(&self.scratch)?;
        self.out.flush()
    }
}

impl<W: Write> Surface for TermSurface<W> {
    fn width(&self) -> u32 {
        u32::from(self.cols)
    }

    fn height(&self) -> u32 {
        u32::from(self.rows) * 2
    }

    fn present(&mut self, frame: &PixelBuffer) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.write_frame(frame) {
            tracing::warn!(%err, "terminal present failed");
            self.error = Some(err);
        }
    }
}

/// Raw mode plus alternate screen, restored on drop.
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let guard = Self { _private: () };
        execute!(io::stdout(), EnterAlternateScreen, Hide)?;
        Ok(guard)
    }

    /// Current terminal size as (cols, rows).
    pub fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), ResetColor, Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}
