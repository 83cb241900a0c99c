// SPDX-License-Identifier: MIT
//
// screencanvas — interactive demo of the canvas-term engine.
//
// Takes over the terminal, draws a few landmarks, then reacts to input:
//
//   arrows        move the cursor
//   F1–F12        print the key name (F1–F4 in color)
//   0–9           set the background color
//   mouse         place the cursor and fill a block of 'X' from there
//   A / I         jump to the last / first column
//   | B _         bar / block / underline cursor
//   C             clear and retitle
//   U             combining-character probe
//   R             reset colors
//   F             print a wide character
//   L / D         insert / delete two lines
//   Ctrl-C/Ctrl-D quit
//
// Anything else is echoed. Rows count from the bottom of the screen.
//
// Usage: screencanvas [timeout-ms]
//
// With a timeout, "TIMEOUT " is printed whenever that long passes without
// input. Logging is off unless SCREENCANVAS_LOG_FILE names a file; the
// filter comes from SCREENCANVAS_LOG (default "debug").

use std::env;
use std::fs::File;
use std::io::{self, Write};
use std::process;
use std::sync::Mutex;
use std::time::Duration;

use canvas_term::ansi::CursorStyle;
use canvas_term::color::Color;
use canvas_term::event::{Event, KeyCode};
use canvas_term::geometry::Size;
use canvas_term::input::{InputConfig, InputLoop};
use canvas_term::source::InputSource;
use canvas_term::terminal::Terminal;
use tracing_subscriber::EnvFilter;
use unicode_width::UnicodeWidthStr;

const LOG_FILTER_ENV: &str = "SCREENCANVAS_LOG";
const LOG_FILE_ENV: &str = "SCREENCANVAS_LOG_FILE";

/// Ctrl-C and Ctrl-D arrive as plain characters in raw mode.
const CTRL_C: u32 = 3;
const CTRL_D: u32 = 4;

const COMBINING_CIRCUMFLEX: &str = "\u{0302}";
const WIDE_CHAR: &str = "枝";

// ─── Demo ───────────────────────────────────────────────────────────────────

struct Demo<W: Write> {
    term: Terminal<W>,
    running: bool,
}

impl<W: Write> Demo<W> {
    const fn new(term: Terminal<W>) -> Self {
        Self {
            term,
            running: true,
        }
    }

    /// Switch modes and draw the landmarks.
    fn start(&mut self) -> io::Result<()> {
        self.term.enter_alt_screen()?;
        self.term.enable_mouse()?;
        self.draw()
    }

    fn draw(&mut self) -> io::Result<()> {
        let Size { cols, rows } = self.term.size();
        self.term.clear()?;
        self.term.fill_rectangle(50, 8, 60, 10, u32::from('X'))?;
        self.print_centered(rows.saturating_sub(1), "[HELLO WORLD TOP]")?;
        self.print_centered(0, "[HELLO WORLD BOTTOM]")?;
        self.term.place_cursor(5, 5)?;
        self.term.print(format_args!("Hello {rows}, {cols}"))
    }

    fn print_centered(&mut self, row: u16, text: &str) -> io::Result<()> {
        let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
        let col = self.term.columns().saturating_sub(width) / 2;
        self.term.place_cursor(col, row)?;
        self.term.print(text)
    }

    fn run<S: InputSource>(&mut self, input: &mut InputLoop<S>) -> io::Result<()> {
        while self.running {
            let event = input.await_event().map_err(io::Error::other)?;
            self.handle(event)?;
        }
        Ok(())
    }

    fn handle(&mut self, event: Event) -> io::Result<()> {
        match event {
            Event::Key(key) => self.on_key(key),
            Event::Char(cp) => self.on_char(cp),
            Event::MouseDown { col, row } | Event::MouseUp { col, row } => {
                self.term.place_cursor(col, row)?;
                self.term.fill_rectangle(
                    col,
                    row,
                    col.saturating_add(10),
                    row.saturating_add(3),
                    u32::from('X'),
                )
            }
            Event::Resize { rows, cols } => {
                self.term.set_size(Size::new(cols, rows));
                self.term.set_title(&format!("RESIZE {cols},{rows}"))?;
                self.term.clear()?;
                self.term.place_cursor(cols / 2, 0)
            }
            Event::Timeout => self.term.print("TIMEOUT "),
        }
    }

    fn on_key(&mut self, key: KeyCode) -> io::Result<()> {
        match key {
            KeyCode::Up => self.term.move_cursor(0, 1),
            KeyCode::Down => self.term.move_cursor(0, -1),
            KeyCode::Left => self.term.move_cursor(-1, 0),
            KeyCode::Right => self.term.move_cursor(1, 0),
            _ => {
                let color = match key {
                    KeyCode::F1 => Color::Red,
                    KeyCode::F2 => Color::Green,
                    KeyCode::F3 => Color::Blue,
                    KeyCode::F4 => Color::Yellow,
                    _ => Color::Black,
                };
                self.term.set_foreground(color)?;
                match key.function_number() {
                    Some(n) => self.term.print(format_args!("F{n}")),
                    None => Ok(()),
                }
            }
        }
    }

    fn on_char(&mut self, cp: u32) -> io::Result<()> {
        if cp == CTRL_C || cp == CTRL_D {
            self.running = false;
            return Ok(());
        }

        let c = char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER);
        match c {
            'A' => {
                let last = self.term.columns().saturating_sub(1);
                self.term.place_cursor_at_column(last)
            }
            'I' => self.term.place_cursor_at_column(0),
            '|' => self.term.set_cursor_style(CursorStyle::Bar),
            'B' => self.term.set_cursor_style(CursorStyle::Block),
            '_' => self.term.set_cursor_style(CursorStyle::Underline),
            'C' => {
                self.term.clear()?;
                self.term.place_cursor(40, 5)?;
                self.term.set_title("CLEARED")
            }
            'U' => self.combining_probe(),
            'R' => self.term.reset_colors_and_style(),
            '0'..='9' => {
                // '0'..='9' is ASCII, so the cast is exact.
                #[allow(clippy::cast_possible_truncation)]
                let digit = cp as u8 - b'0';
                self.term.set_background(Color::from_digit(digit))
            }
            'F' => self.term.print(WIDE_CHAR),
            'L' => self.term.insert_lines(2),
            'D' => self.term.delete_lines(2),
            _ => self.term.print(c),
        }
    }

    /// Print combining marks in awkward positions (orphaned, after a wide
    /// character, after cursor jumps) to see how the terminal composes them.
    fn combining_probe(&mut self) -> io::Result<()> {
        let last_col = self.term.columns().saturating_sub(1);
        let t = &mut self.term;

        t.clear()?;
        t.place_cursor(0, 5)?;
        t.print(COMBINING_CIRCUMFLEX)?;
        t.place_cursor(40, 5)?;
        t.print(format_args!("o{COMBINING_CIRCUMFLEX}"))?;
        t.place_cursor(40, 6)?;
        t.print(COMBINING_CIRCUMFLEX)?;
        t.place_cursor(last_col, 7)?;
        t.print(format_args!("o{COMBINING_CIRCUMFLEX}"))?;
        t.place_cursor(40, 8)?;
        t.print("uo")?;
        t.place_cursor(45, 8)?;
        t.place_cursor(41, 8)?;
        t.print(COMBINING_CIRCUMFLEX)?;
        t.place_cursor(40, 9)?;
        t.print(WIDE_CHAR)?;
        t.print(COMBINING_CIRCUMFLEX)?;

        // Wide character, then the mark placed after one or more column jumps.
        for (row, jumps) in [(10, &[42][..]), (11, &[45, 42][..]), (12, &[45, 41][..])] {
            t.place_cursor(40, row)?;
            t.print(WIDE_CHAR)?;
            for &col in jumps {
                t.place_cursor_at_column(col)?;
            }
            t.print(COMBINING_CIRCUMFLEX)?;
        }

        t.place_cursor(40, 20)
    }
}

// ─── Setup ──────────────────────────────────────────────────────────────────

/// Log to the file named by `SCREENCANVAS_LOG_FILE`, if any. Stdout and
/// stderr belong to the raw-mode screen.
fn init_logging() {
    let Some(path) = env::var_os(LOG_FILE_ENV) else {
        return;
    };
    let file = match File::create(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("screencanvas: cannot open log file {}: {e}", path.to_string_lossy());
            return;
        }
    };
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

/// Optional first argument: poll timeout in milliseconds.
fn poll_timeout(arg: Option<&str>) -> Result<Option<Duration>, String> {
    arg.map(|ms| {
        ms.parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|e| format!("invalid timeout {ms:?}: {e}"))
    })
    .transpose()
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let timeout = poll_timeout(args.get(1).map(String::as_str)).unwrap_or_else(|e| {
        eprintln!("screencanvas: {e}");
        process::exit(2);
    });

    init_logging();

    let term = Terminal::new().unwrap_or_else(|e| {
        eprintln!("screencanvas: failed to initialize terminal: {e}");
        process::exit(1);
    });

    let config = InputConfig::default().with_poll_timeout(timeout);
    let mut input = InputLoop::stdin(term.size(), config);
    let mut demo = Demo::new(term);

    let result = demo.start().and_then(|()| demo.run(&mut input));

    // Restore the terminal before reporting anything.
    drop(demo);

    if let Err(e) = result {
        tracing::error!(error = %e, "screencanvas exiting");
        eprintln!("screencanvas: {e}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_term::event::REPLACEMENT_CHAR;
    use canvas_term::source::ReaderSource;

    // ── Helpers ───────────────────────────────────────────────────────────

    fn demo() -> Demo<Vec<u8>> {
        Demo::new(Terminal::with_writer(Vec::new(), Size::new(80, 24)))
    }

    /// Output written since the last call.
    fn take(demo: &mut Demo<Vec<u8>>) -> String {
        String::from_utf8(std::mem::take(demo.term.writer_mut())).unwrap()
    }

    fn ch(c: char) -> Event {
        Event::Char(u32::from(c))
    }

    // ── Input handling ────────────────────────────────────────────────────

    #[test]
    fn ctrl_c_and_ctrl_d_quit() {
        for cp in [CTRL_C, CTRL_D] {
            let mut d = demo();
            d.handle(Event::Char(cp)).unwrap();
            assert!(!d.running);
            assert_eq!(take(&mut d), "");
        }
    }

    #[test]
    fn arrows_move_cursor() {
        let mut d = demo();
        for key in [KeyCode::Up, KeyCode::Down, KeyCode::Left, KeyCode::Right] {
            d.handle(Event::Key(key)).unwrap();
        }
        assert_eq!(take(&mut d), "\x1b[1A\x1b[1B\x1b[1D\x1b[1C");
    }

    #[test]
    fn function_keys_print_their_name() {
        let mut d = demo();
        d.handle(Event::Key(KeyCode::F1)).unwrap();
        d.handle(Event::Key(KeyCode::F10)).unwrap();
        assert_eq!(take(&mut d), "\x1b[31mF1\x1b[30mF10");
    }

    #[test]
    fn digits_set_background() {
        let mut d = demo();
        d.handle(ch('0')).unwrap();
        d.handle(ch('4')).unwrap();
        d.handle(ch('9')).unwrap();
        assert_eq!(take(&mut d), "\x1b[40m\x1b[44m\x1b[41m");
    }

    #[test]
    fn letters_run_commands() {
        let mut d = demo();
        d.handle(ch('A')).unwrap();
        d.handle(ch('I')).unwrap();
        d.handle(ch('|')).unwrap();
        d.handle(ch('L')).unwrap();
        d.handle(ch('D')).unwrap();
        d.handle(ch('R')).unwrap();
        assert_eq!(
            take(&mut d),
            "\x1b[80G\x1b[1G\x1b[6 q\x1b[2L\x1b[2M\x1b[0m"
        );
    }

    #[test]
    fn clear_retitles() {
        let mut d = demo();
        d.handle(ch('C')).unwrap();
        assert_eq!(take(&mut d), "\x1b[2J\x1b[19;41H\x1b]0;CLEARED\x07");
    }

    #[test]
    fn other_chars_echo() {
        let mut d = demo();
        d.handle(ch('x')).unwrap();
        d.handle(ch('枝')).unwrap();
        d.handle(Event::Char(REPLACEMENT_CHAR)).unwrap();
        d.handle(Event::Char(0xD800)).unwrap();
        assert_eq!(take(&mut d), "x枝\u{FFFD}\u{FFFD}");
    }

    #[test]
    fn mouse_places_cursor_and_fills() {
        let mut d = demo();
        d.handle(Event::MouseDown { col: 4, row: 21 }).unwrap();
        assert_eq!(take(&mut d), "\x1b[3;5H\x1b[88;1;5;3;15$x");
    }

    #[test]
    fn resize_retitles_and_recenters() {
        let mut d = demo();
        d.handle(Event::Resize { rows: 40, cols: 100 }).unwrap();
        assert_eq!(d.term.size(), Size::new(100, 40));
        assert_eq!(take(&mut d), "\x1b]0;RESIZE 100,40\x07\x1b[2J\x1b[40;51H");
    }

    #[test]
    fn timeout_prints_marker() {
        let mut d = demo();
        d.handle(Event::Timeout).unwrap();
        assert_eq!(take(&mut d), "TIMEOUT ");
    }

    #[test]
    fn combining_probe_ends_at_row_20() {
        let mut d = demo();
        d.handle(ch('U')).unwrap();
        let out = take(&mut d);
        assert!(out.starts_with("\x1b[2J"));
        assert!(out.ends_with("\x1b[4;41H"));
        assert_eq!(out.matches(COMBINING_CIRCUMFLEX).count(), 9);
    }

    // ── Drawing ───────────────────────────────────────────────────────────

    #[test]
    fn landmarks_are_centered_by_display_width() {
        let mut d = demo();
        d.draw().unwrap();
        let out = take(&mut d);
        // "[HELLO WORLD TOP]" is 17 columns wide: (80 - 17) / 2 = 31.
        assert!(out.contains("\x1b[1;32H[HELLO WORLD TOP]"));
        // "[HELLO WORLD BOTTOM]" is 20 columns wide: (80 - 20) / 2 = 30.
        assert!(out.contains("\x1b[24;31H[HELLO WORLD BOTTOM]"));
        assert!(out.ends_with("\x1b[19;6HHello 24, 80"));
    }

    #[test]
    fn run_stops_on_ctrl_c() {
        let mut d = demo();
        let mut input = InputLoop::new(
            ReaderSource(&b"hi\x1b[A\x03ignored"[..]),
            Size::new(80, 24),
            InputConfig::default(),
        );
        d.run(&mut input).unwrap();
        assert_eq!(take(&mut d), "hi\x1b[1A");
    }

    #[test]
    fn run_reports_closed_input() {
        let mut d = demo();
        let mut input = InputLoop::new(
            ReaderSource(&b"x"[..]),
            Size::new(80, 24),
            InputConfig::default(),
        );
        let err = d.run(&mut input).unwrap_err();
        assert!(err.to_string().contains("closed"));
    }

    // ── Arguments ─────────────────────────────────────────────────────────

    #[test]
    fn timeout_argument() {
        assert_eq!(poll_timeout(None), Ok(None));
        assert_eq!(poll_timeout(Some("250")), Ok(Some(Duration::from_millis(250))));
        assert!(poll_timeout(Some("soon")).is_err());
    }
}
