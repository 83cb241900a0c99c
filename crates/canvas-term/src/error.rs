// SPDX-License-Identifier: MIT
//
// Error types.
//
// Decode errors never reach the caller of `await_event`: the decoder logs
// them, resets to ground and keeps going. Input errors are the opposite:
// a broken or closed stdin in raw mode cannot make progress, so they end
// the input loop.

use std::io;

use thiserror::Error;

/// A structural problem in an escape sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A byte that has no transition from the current parser state.
    #[error("unexpected byte {byte:#04x} in {state} state")]
    UnexpectedByte { state: &'static str, byte: u8 },

    /// More than [`MAX_ARGS`](crate::args::MAX_ARGS) arguments.
    #[error("too many escape arguments")]
    TooManyArguments,

    /// An argument longer than [`MAX_ARG_LEN`](crate::args::MAX_ARG_LEN) digits.
    #[error("escape argument too long")]
    ArgumentTooLong,

    /// `CSI ... ~` with more than one argument.
    #[error("found ~ after CSI with {0} arguments")]
    TildeArguments(usize),

    /// `CSI n ~` where `n` is not a known function key.
    #[error("unknown CSI ~ number {0}")]
    UnknownTildeNumber(u32),

    /// SGR mouse report without exactly three arguments.
    #[error("mouse report with {0} arguments")]
    MouseArguments(usize),

    /// SGR mouse report with a button code outside the configured profile.
    #[error("unsupported mouse button code {0}")]
    MouseButton(u32),

    /// SGR mouse report with a zero (or out of range) coordinate.
    #[error("mouse coordinate out of range: column {col}, row {row}")]
    MouseCoordinate { col: u32, row: u32 },
}

/// A fatal failure of the input stream.
#[derive(Debug, Error)]
pub enum InputError {
    /// `read()` returned zero bytes: the upstream stream is closed.
    #[error("input stream closed")]
    Closed,

    /// `read()` (or the readiness wait) failed for a reason other than a
    /// resize interrupt.
    #[error("input read failed: {0}")]
    Read(#[from] io::Error),

    /// The read buffer was refilled out of order. Indicates a bug in the
    /// input loop, not in the stream.
    #[error(transparent)]
    Buffer(#[from] RingError),
}

/// Misuse of the fixed-capacity read buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RingError {
    /// The buffer may only be refilled once every byte has been consumed.
    #[error("read buffer refilled while {0} bytes are still pending")]
    NotEmpty(usize),

    /// More bytes committed than the buffer can hold.
    #[error("committed {committed} bytes into a {capacity}-byte read buffer")]
    Overflow { committed: usize, capacity: usize },
}
