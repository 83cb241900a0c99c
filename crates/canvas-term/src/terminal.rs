// SPDX-License-Identifier: MIT
//
// Terminal control — raw mode, the output surface, and RAII cleanup.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ), isatty, and raw fd writes. These are the
// POSIX interfaces for terminal control and have no safe equivalent. Each
// unsafe block is kept minimal.
#![allow(unsafe_code)]
//
// `Terminal` owns the terminal's raw state. Creating one switches stdin to
// raw input (no echo, no line editing, no signal characters, one byte at a
// time) and installs the SIGWINCH handler. Every mode turned on afterwards
// (alternate screen, mouse reporting, hidden cursor, application keys,
// bracketed paste) is recorded in `Modes`, and drop undoes exactly those.
//
// Coordinates use the canvas convention: column 0 on the left, row 0 at the
// bottom. Rows are flipped to the terminal's top-down numbering here, and
// nowhere else on the output side.
//
// The panic hook writes a pre-built restore sequence straight to fd 1,
// bypassing Rust's stdout lock, then restores termios from a global backup
// before the original hook prints its message.

use std::fmt;
use std::io::{self, Stdout, Write};
use std::sync::{Mutex, Once};

use bitflags::bitflags;

use crate::ansi::{self, Area, CursorStyle};
use crate::color::Color;
use crate::geometry::Size;
use crate::resize::install_sigwinch_handler;

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Query the current terminal size via `ioctl(TIOCGWINSZ)`.
///
/// Tries stdout first, then stdin. Returns `None` if neither is a terminal
/// or the query fails. Async-signal-safe.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    [libc::STDOUT_FILENO, libc::STDIN_FILENO]
        .into_iter()
        .find_map(|fd| {
            let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
            let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &raw mut ws) };
            (result == 0 && ws.ws_col > 0 && ws.ws_row > 0)
                .then(|| Size::new(ws.ws_col, ws.ws_row))
        })
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Check whether stdin is connected to a terminal (TTY).
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Panic-Safe Terminal Restore ────────────────────────────────────────────

/// Global backup of the original termios for panic recovery.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock()
        && let Some(ref original) = *guard
    {
        unsafe {
            let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, original);
        }
    }
}

/// Everything [`Terminal`] can turn on, turned off.
///
/// Alternate screen exit is last so the restored shell content appears
/// without artifacts.
#[rustfmt::skip]
const EMERGENCY_RESTORE: &[u8] = b"\
    \x1b[?1l\
    \x1b>\
    \x1b[?2004l\
    \x1b[?1000l\x1b[?1006l\
    \x1b[0m\
    \x1b[0 q\
    \x1b[?25h\
    \x1b[?1049l";

static PANIC_HOOK_INSTALLED: Once = Once::new();

fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();

            #[cfg(unix)]
            restore_termios_from_backup();

            original(info);
        }));
    });
}

fn emergency_restore() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(EMERGENCY_RESTORE);
        let _ = io::stdout().flush();
    }
}

// ─── Modes ──────────────────────────────────────────────────────────────────

bitflags! {
    /// Terminal modes currently switched on by a [`Terminal`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modes: u8 {
        const ALT_SCREEN      = 1 << 0;
        const MOUSE           = 1 << 1;
        const CURSOR_HIDDEN   = 1 << 2;
        const BRACKETED_PASTE = 1 << 3;
        const CURSOR_APP      = 1 << 4;
        const KEYPAD_APP      = 1 << 5;
        /// A non-default cursor style was set.
        const CURSOR_STYLE    = 1 << 6;
    }
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// Terminal handle with RAII cleanup.
///
/// Each output method writes one control sequence and flushes, so the
/// terminal reflects every call immediately.
///
/// # Example
///
/// ```no_run
/// use canvas_term::color::Color;
/// use canvas_term::terminal::Terminal;
///
/// let mut term = Terminal::new()?;
/// term.enter_alt_screen()?;
/// term.enable_mouse()?;
/// term.clear()?;
/// term.set_foreground(Color::Green)?;
/// term.place_cursor(0, 0)?; // bottom-left corner
/// term.print("hello")?;
/// // Modes and termios are restored on drop.
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Terminal<W: Write = Stdout> {
    out: W,

    /// Current geometry. Update with [`set_size`](Self::set_size) on
    /// every resize event.
    size: Size,

    modes: Modes,

    /// Original termios, present while raw mode is on.
    #[cfg(unix)]
    original_termios: Option<libc::termios>,
}

impl Terminal<Stdout> {
    /// Take over the controlling terminal.
    ///
    /// Queries the size (80×24 if it cannot be determined), switches stdin
    /// to raw input when it is a TTY, and installs the SIGWINCH handler and
    /// the panic hook.
    ///
    /// # Errors
    ///
    /// Returns an error if termios or `sigaction` fails.
    pub fn new() -> io::Result<Self> {
        install_panic_hook();

        let size = get_size().unwrap_or(Size::FALLBACK);
        let mut term = Self::with_writer(io::stdout(), size);
        term.enable_raw_mode()?;
        install_sigwinch_handler()?;

        tracing::debug!(cols = size.cols, rows = size.rows, tty = is_tty(), "terminal opened");
        Ok(term)
    }
}

impl<W: Write> Terminal<W> {
    /// Output surface over any writer. Does not touch termios or signals.
    #[must_use]
    pub const fn with_writer(out: W, size: Size) -> Self {
        Self {
            out,
            size,
            modes: Modes::empty(),
            #[cfg(unix)]
            original_termios: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    #[inline]
    #[must_use]
    pub const fn columns(&self) -> u16 {
        self.size.cols
    }

    #[inline]
    #[must_use]
    pub const fn rows(&self) -> u16 {
        self.size.rows
    }

    /// Record a new geometry (from [`Event::Resize`](crate::event::Event::Resize)).
    #[inline]
    pub const fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    #[inline]
    #[must_use]
    pub const fn modes(&self) -> Modes {
        self.modes
    }

    #[inline]
    #[must_use]
    pub const fn writer(&self) -> &W {
        &self.out
    }

    #[inline]
    pub const fn writer_mut(&mut self) -> &mut W {
        &mut self.out
    }

    fn emit(&mut self, f: impl FnOnce(&mut W) -> io::Result<()>) -> io::Result<()> {
        f(&mut self.out)?;
        self.out.flush()
    }

    /// Emit `f` only if `mode` is not already in the wanted state.
    fn toggle(
        &mut self,
        mode: Modes,
        enable: bool,
        f: impl FnOnce(&mut W, bool) -> io::Result<()>,
    ) -> io::Result<()> {
        if self.modes.contains(mode) == enable {
            return Ok(());
        }
        self.emit(|w| f(w, enable))?;
        self.modes.set(mode, enable);
        Ok(())
    }

    // ── Cursor ──────────────────────────────────────────────────────

    /// Move the cursor to `(col, row)`, row 0 at the bottom.
    ///
    /// # Errors
    ///
    /// Propagates write errors.
    pub fn place_cursor(&mut self, col: u16, row: u16) -> io::Result<()> {
        let y = self.size.flip_row(row);
        self.emit(|w| ansi::cursor_to(w, col, y))
    }

    /// Move the cursor to `col` on its current row.
    ///
    /// # Errors
    ///
    /// Propagates write errors.
    pub fn place_cursor_at_column(&mut self, col: u16) -> io::Result<()> {
        self.emit(|w| ansi::cursor_to_column(w, col))
    }

    /// Move the cursor relative to where it is. Positive `up` moves toward
    /// the top of the screen, positive `right` toward the right edge.
    ///
    /// # Errors
    ///
    /// Propagates write errors.
    pub fn move_cursor(&mut self, right: i32, up: i32) -> io::Result<()> {
        if up == 0 && right == 0 {
            return Ok(());
        }
        self.emit(|w| {
            let rows = magnitude(up);
            if up > 0 {
                ansi::cursor_up(w, rows)?;
            } else if up < 0 {
                ansi::cursor_down(w, rows)?;
            }
            let cols = magnitude(right);
            if right > 0 {
                ansi::cursor_forward(w, cols)?;
            } else if right < 0 {
                ansi::cursor_back(w, cols)?;
            }
            Ok(())
        })
    }

    /// # Errors
    ///
    /// Propagates write errors.
    pub fn set_cursor_style(&mut self, style: CursorStyle) -> io::Result<()> {
        self.emit(|w| ansi::set_cursor_style(w, style))?;
        self.modes.set(Modes::CURSOR_STYLE, style != CursorStyle::Default);
        Ok(())
    }

    /// # Errors
    ///
    /// Propagates write errors.
    pub fn show_cursor(&mut self) -> io::Result<()> {
        self.toggle(Modes::CURSOR_HIDDEN, false, |w, _| ansi::cursor_show(w))
    }

    /// # Errors
    ///
    /// Propagates write errors.
    pub fn hide_cursor(&mut self) -> io::Result<()> {
        self.toggle(Modes::CURSOR_HIDDEN, true, |w, _| ansi::cursor_hide(w))
    }

    // ── Color ───────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Propagates write errors.
    pub fn set_foreground(&mut self, color: Color) -> io::Result<()> {
        self.emit(|w| ansi::fg(w, color))
    }

    /// # Errors
    ///
    /// Propagates write errors.
    pub fn set_background(&mut self, color: Color) -> io::Result<()> {
        self.emit(|w| ansi::bg(w, color))
    }

    /// # Errors
    ///
    /// Propagates write errors.
    pub fn reset_colors_and_style(&mut self) -> io::Result<()> {
        self.emit(|w| ansi::reset(w))
    }

    // ── Screen ──────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Propagates write errors.
    pub fn clear(&mut self) -> io::Result<()> {
        self.emit(|w| ansi::clear_screen(w))
    }

    /// Fill the rectangle from `(left, bottom)` to `(right, top)`, bounds
    /// inclusive, with `codepoint` in the current colors.
    ///
    /// The rectangle is clipped to the screen. Nothing is emitted when it is
    /// inverted (`top < bottom` or `right < left`) or lies entirely off
    /// screen.
    ///
    /// # Errors
    ///
    /// Propagates write errors.
    pub fn fill_rectangle(
        &mut self,
        left: u16,
        bottom: u16,
        right: u16,
        top: u16,
        codepoint: u32,
    ) -> io::Result<()> {
        if top < bottom || right < left || left >= self.size.cols || bottom >= self.size.rows {
            return Ok(());
        }
        let (right, top) = self.size.clamp(right, top);
        let area = Area {
            top: self.size.flip_row(top),
            left,
            bottom: self.size.flip_row(bottom),
            right,
        };
        self.emit(|w| ansi::fill_rectangle(w, area, codepoint))
    }

    /// # Errors
    ///
    /// Propagates write errors.
    pub fn set_title(&mut self, title: &str) -> io::Result<()> {
        self.emit(|w| ansi::set_title(w, title))
    }

    /// Insert `n` blank lines at the cursor row, pushing lines below it down.
    ///
    /// # Errors
    ///
    /// Propagates write errors.
    pub fn insert_lines(&mut self, n: u16) -> io::Result<()> {
        self.emit(|w| ansi::insert_lines(w, n))
    }

    /// Delete `n` lines at the cursor row, pulling lines below it up.
    ///
    /// # Errors
    ///
    /// Propagates write errors.
    pub fn delete_lines(&mut self, n: u16) -> io::Result<()> {
        self.emit(|w| ansi::delete_lines(w, n))
    }

    /// Write text at the cursor.
    ///
    /// # Errors
    ///
    /// Propagates write errors.
    pub fn print(&mut self, text: impl fmt::Display) -> io::Result<()> {
        self.emit(|w| write!(w, "{text}"))
    }

    // ── Modes ───────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Propagates write errors.
    pub fn enter_alt_screen(&mut self) -> io::Result<()> {
        self.toggle(Modes::ALT_SCREEN, true, |w, _| ansi::enter_alt_screen(w))
    }

    /// # Errors
    ///
    /// Propagates write errors.
    pub fn leave_alt_screen(&mut self) -> io::Result<()> {
        self.toggle(Modes::ALT_SCREEN, false, |w, _| ansi::exit_alt_screen(w))
    }

    /// Report button presses and releases as SGR mouse sequences.
    ///
    /// # Errors
    ///
    /// Propagates write errors.
    pub fn enable_mouse(&mut self) -> io::Result<()> {
        self.toggle(Modes::MOUSE, true, |w, _| ansi::enable_mouse(w))
    }

    /// # Errors
    ///
    /// Propagates write errors.
    pub fn disable_mouse(&mut self) -> io::Result<()> {
        self.toggle(Modes::MOUSE, false, |w, _| ansi::disable_mouse(w))
    }

    /// # Errors
    ///
    /// Propagates write errors.
    pub fn set_bracketed_paste(&mut self, enable: bool) -> io::Result<()> {
        self.toggle(Modes::BRACKETED_PASTE, enable, ansi::bracketed_paste)
    }

    /// Application cursor keys: arrows arrive as SS3 sequences.
    ///
    /// # Errors
    ///
    /// Propagates write errors.
    pub fn set_cursor_app(&mut self, enable: bool) -> io::Result<()> {
        self.toggle(Modes::CURSOR_APP, enable, ansi::cursor_app)
    }

    /// # Errors
    ///
    /// Propagates write errors.
    pub fn set_keypad_app(&mut self, enable: bool) -> io::Result<()> {
        self.toggle(Modes::KEYPAD_APP, enable, ansi::keypad_app)
    }

    // ── Restore ─────────────────────────────────────────────────────

    /// Restore termios and undo every mode this handle switched on.
    ///
    /// Runs on drop. Calling it earlier is fine, and a second call only
    /// resets the colors again.
    ///
    /// # Errors
    ///
    /// Returns the first failure, after attempting every step.
    pub fn restore(&mut self) -> io::Result<()> {
        let termios = self.disable_raw_mode();

        let modes = self.modes;
        let output = self.emit(|w| {
            if modes.contains(Modes::CURSOR_APP) {
                ansi::cursor_app(w, false)?;
            }
            if modes.contains(Modes::KEYPAD_APP) {
                ansi::keypad_app(w, false)?;
            }
            if modes.contains(Modes::BRACKETED_PASTE) {
                ansi::bracketed_paste(w, false)?;
            }
            if modes.contains(Modes::CURSOR_HIDDEN) {
                ansi::cursor_show(w)?;
            }
            if modes.contains(Modes::CURSOR_STYLE) {
                ansi::set_cursor_style(w, CursorStyle::Default)?;
            }
            if modes.contains(Modes::MOUSE) {
                ansi::disable_mouse(w)?;
            }
            ansi::fg(w, Color::Default)?;
            ansi::bg(w, Color::Default)?;
            if modes.contains(Modes::ALT_SCREEN) {
                ansi::exit_alt_screen(w)?;
            }
            Ok(())
        });
        self.modes = Modes::empty();

        termios.and(output)
    }

    // ── Raw Mode (termios) ──────────────────────────────────────────

    /// Echo, canonical input, extended input processing and signal
    /// characters off; `read()` returns as soon as one byte is available.
    #[cfg(unix)]
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        if !is_tty() {
            return Ok(());
        }

        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(libc::STDIN_FILENO, &raw mut termios) != 0 {
                return Err(io::Error::last_os_error());
            }

            self.original_termios = Some(termios);
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = Some(termios);
            }

            termios.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);
            termios.c_cc[libc::VMIN] = 1;
            termios.c_cc[libc::VTIME] = 0;

            if libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, &raw const termios) != 0 {
                return Err(io::Error::last_os_error());
            }
        }

        Ok(())
    }

    #[cfg(not(unix))]
    #[allow(clippy::unnecessary_wraps, clippy::unused_self)]
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }

    #[cfg(unix)]
    fn disable_raw_mode(&mut self) -> io::Result<()> {
        let Some(original) = self.original_termios.take() else {
            return Ok(());
        };

        if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
            *guard = None;
        }

        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, &raw const original) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    #[cfg(not(unix))]
    #[allow(clippy::unnecessary_wraps, clippy::unused_self)]
    fn disable_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<W: Write> fmt::Debug for Terminal<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Terminal");
        s.field("size", &self.size).field("modes", &self.modes);
        #[cfg(unix)]
        s.field("raw", &self.original_termios.is_some());
        s.finish_non_exhaustive()
    }
}

impl<W: Write> Drop for Terminal<W> {
    fn drop(&mut self) {
        if let Err(error) = self.restore() {
            tracing::warn!(%error, "terminal restore failed");
        }
    }
}

/// Relative move distance, saturated to the widest CSI parameter we emit.
fn magnitude(n: i32) -> u16 {
    u16::try_from(n.unsigned_abs()).unwrap_or(u16::MAX)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
