// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write one control sequence each to any `impl Write`.
// No state and no flushing; the `Terminal` handle decides when to emit and
// tracks which modes are on.
//
// Coordinates here are 0-indexed and top-down, like the terminal's own grid.
// They are converted to the 1-based values the wire format wants. The
// bottom-up row convention lives one layer up, in `Terminal`.

use std::io::{self, Write};

use crate::color::Color;

const CSI: &[u8] = b"\x1b[";

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to column `x`, row `y` (CUP).
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
}

/// Move the cursor to column `x` on the current row (CHA).
#[inline]
pub fn cursor_to_column(w: &mut impl Write, x: u16) -> io::Result<()> {
    write!(w, "\x1b[{}G", u32::from(x) + 1)
}

/// Move the cursor up `n` rows (CUU).
#[inline]
pub fn cursor_up(w: &mut impl Write, n: u16) -> io::Result<()> {
    write!(w, "\x1b[{n}A")
}

/// Move the cursor down `n` rows (CUD).
#[inline]
pub fn cursor_down(w: &mut impl Write, n: u16) -> io::Result<()> {
    write!(w, "\x1b[{n}B")
}

/// Move the cursor right `n` columns (CUF).
#[inline]
pub fn cursor_forward(w: &mut impl Write, n: u16) -> io::Result<()> {
    write!(w, "\x1b[{n}C")
}

/// Move the cursor left `n` columns (CUB).
#[inline]
pub fn cursor_back(w: &mut impl Write, n: u16) -> io::Result<()> {
    write!(w, "\x1b[{n}D")
}

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    dec_mode(w, 25, false)
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    dec_mode(w, 25, true)
}

// ─── Cursor Style ────────────────────────────────────────────────────────────

/// Steady cursor shapes (DECSCUSR).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorStyle {
    /// Whatever the terminal's configured shape is.
    #[default]
    Default,
    Block,
    Underline,
    Bar,
}

impl CursorStyle {
    /// DECSCUSR parameter.
    #[inline]
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Default => 0,
            Self::Block => 2,
            Self::Underline => 4,
            Self::Bar => 6,
        }
    }
}

/// Set the cursor shape (`CSI n SP q`).
#[inline]
pub fn set_cursor_style(w: &mut impl Write, style: CursorStyle) -> io::Result<()> {
    write!(w, "\x1b[{} q", style.code())
}

// ─── Color ───────────────────────────────────────────────────────────────────

/// Set the foreground color (SGR 30–37, 39).
#[inline]
pub fn fg(w: &mut impl Write, color: Color) -> io::Result<()> {
    write!(w, "\x1b[{}m", color.fg_code())
}

/// Set the background color (SGR 40–47, 49).
#[inline]
pub fn bg(w: &mut impl Write, color: Color) -> io::Result<()> {
    write!(w, "\x1b[{}m", color.bg_code())
}

/// Reset colors and every other SGR attribute (SGR 0).
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the entire screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// Insert `n` blank lines at the cursor row (IL).
#[inline]
pub fn insert_lines(w: &mut impl Write, n: u16) -> io::Result<()> {
    write!(w, "\x1b[{n}L")
}

/// Delete `n` lines starting at the cursor row (DL).
#[inline]
pub fn delete_lines(w: &mut impl Write, n: u16) -> io::Result<()> {
    write!(w, "\x1b[{n}M")
}

/// A screen rectangle in 0-indexed top-down cells, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Area {
    pub top: u16,
    pub left: u16,
    pub bottom: u16,
    pub right: u16,
}

impl Area {
    /// Whether the bounds are inverted (bottom above top, or right before left).
    #[inline]
    #[must_use]
    pub const fn is_inverted(self) -> bool {
        self.bottom < self.top || self.right < self.left
    }
}

/// Fill `area` with `codepoint` (DECFRA).
///
/// Current SGR colors apply to the filled cells. Emits nothing for an
/// inverted area.
pub fn fill_rectangle(w: &mut impl Write, area: Area, codepoint: u32) -> io::Result<()> {
    if area.is_inverted() {
        return Ok(());
    }
    write!(
        w,
        "\x1b[{};{};{};{};{}$x",
        codepoint,
        u32::from(area.top) + 1,
        u32::from(area.left) + 1,
        u32::from(area.bottom) + 1,
        u32::from(area.right) + 1,
    )
}

/// Set the window and icon title (OSC 0).
///
/// Control characters in `title` are dropped so they cannot end the string
/// early.
pub fn set_title(w: &mut impl Write, title: &str) -> io::Result<()> {
    w.write_all(b"\x1b]0;")?;
    let mut utf8 = [0u8; 4];
    for c in title.chars().filter(|c| !c.is_control()) {
        w.write_all(c.encode_utf8(&mut utf8).as_bytes())?;
    }
    w.write_all(b"\x07")
}

// ─── Modes ───────────────────────────────────────────────────────────────────

/// Set or reset a DEC private mode (`CSI ? n h` / `CSI ? n l`).
#[inline]
pub fn dec_mode(w: &mut impl Write, mode: u16, enable: bool) -> io::Result<()> {
    w.write_all(CSI)?;
    write!(w, "?{mode}{}", if enable { 'h' } else { 'l' })
}

/// Enter the alternate screen buffer (DEC 1049).
#[inline]
pub fn enter_alt_screen(w: &mut impl Write) -> io::Result<()> {
    dec_mode(w, 1049, true)
}

/// Exit the alternate screen buffer and restore the original content.
#[inline]
pub fn exit_alt_screen(w: &mut impl Write) -> io::Result<()> {
    dec_mode(w, 1049, false)
}

/// Enable press/release mouse reporting in SGR format (DEC 1000 + 1006).
pub fn enable_mouse(w: &mut impl Write) -> io::Result<()> {
    dec_mode(w, 1000, true)?;
    dec_mode(w, 1006, true)
}

/// Disable mouse reporting.
pub fn disable_mouse(w: &mut impl Write) -> io::Result<()> {
    dec_mode(w, 1000, false)?;
    dec_mode(w, 1006, false)
}

/// Bracketed paste (DEC 2004).
#[inline]
pub fn bracketed_paste(w: &mut impl Write, enable: bool) -> io::Result<()> {
    dec_mode(w, 2004, enable)
}

/// Application cursor keys (DECCKM, DEC 1). Arrows then arrive as
/// `ESC O A`..`ESC O D`.
#[inline]
pub fn cursor_app(w: &mut impl Write, enable: bool) -> io::Result<()> {
    dec_mode(w, 1, enable)
}

/// Application keypad (`ESC =`, DECKPAM) or numeric keypad (`ESC >`, DECKPNM).
#[inline]
pub fn keypad_app(w: &mut impl Write, enable: bool) -> io::Result<()> {
    w.write_all(if enable { b"\x1b=" } else { b"\x1b>" })
}

// ─── Tests ───────────────────────────────────────────────────────────────────
