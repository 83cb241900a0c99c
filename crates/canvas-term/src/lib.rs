// SPDX-License-Identifier: MIT
//
// canvas-term — Terminal I/O engine for screencanvas.
//
// Turns the raw byte stream of a character terminal into typed events (keys,
// text, mouse presses, resizes) and drives the screen back with plain
// ANSI/VT control sequences. The canvas puts row 0 at the bottom of the
// screen; every coordinate crossing into or out of the terminal is flipped.
//
// The core is the decoder: a byte-at-a-time state machine over UTF-8 and
// escape sequences with fixed-capacity buffers and no lookahead. Sequences
// split across reads decode the same as whole ones, malformed input resyncs
// at the next byte, and a SIGWINCH arriving mid-sequence surfaces as a
// resize event without disturbing what was half-decoded.
//
// No terminfo and no TUI framework: termios and escape sequences written
// out directly.

pub mod ansi;
pub mod args;
pub mod color;
pub mod decoder;
pub mod error;
pub mod event;
pub mod geometry;
pub mod input;
pub mod parser;
pub mod resize;
pub mod ring;
pub mod source;
pub mod terminal;
pub mod utf8;

pub use color::Color;
pub use decoder::{Decoder, DecoderConfig};
pub use error::InputError;
pub use event::{Event, KeyCode};
pub use geometry::Size;
pub use input::{InputConfig, InputLoop};
pub use terminal::Terminal;
