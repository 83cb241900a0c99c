// SPDX-License-Identifier: MIT
//
// Input loop — blocking "give me the next event".
//
// Fills a 32-byte read buffer from the source, drains it one byte at a time
// through the decoder, and refills only when every byte has been consumed.
// A sequence split across reads simply stays half-decoded in the decoder
// until the rest arrives.
//
// # Resize
//
// SIGWINCH interrupts the blocking read (the handler is installed without
// `SA_RESTART`). The loop then drains the resize cell and returns
// `Event::Resize` straight away. Bytes still buffered and any half-decoded
// sequence are left exactly as they were, so the next call picks up where
// this one stopped. The cell is also drained right before blocking, which
// catches a resize that landed while the caller was busy.
//
// # Fatal conditions
//
// A read of zero bytes means stdin is closed; any read error other than an
// interrupt means it is broken. Raw-mode input cannot recover from either,
// so both end the loop with an `InputError` and the caller should exit.

use std::io;
use std::time::Duration;

use crate::decoder::{Decoder, DecoderConfig, Feed};
use crate::error::InputError;
use crate::event::Event;
use crate::geometry::Size;
use crate::resize::{ResizeSignal, SIGWINCH};
use crate::ring::ReadBuffer;
use crate::source::{InputSource, StdinSource};

// ─── Config ──────────────────────────────────────────────────────────────────

/// Input loop configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputConfig {
    /// Escape sequence options.
    pub decoder: DecoderConfig,
    /// Wait at most this long for input before returning
    /// [`Event::Timeout`]. `None` (the default) blocks indefinitely.
    pub poll_timeout: Option<Duration>,
}

impl InputConfig {
    #[must_use]
    pub const fn with_decoder(mut self, decoder: DecoderConfig) -> Self {
        self.decoder = decoder;
        self
    }

    #[must_use]
    pub const fn with_poll_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.poll_timeout = timeout;
        self
    }
}

// ─── InputLoop ───────────────────────────────────────────────────────────────

/// Blocking event source over raw terminal input.
///
/// # Example
///
/// ```no_run
/// use canvas_term::event::Event;
/// use canvas_term::geometry::Size;
/// use canvas_term::input::{InputConfig, InputLoop};
///
/// let mut input = InputLoop::stdin(Size::new(80, 24), InputConfig::default());
/// loop {
///     match input.await_event()? {
///         Event::Char(3) => break, // Ctrl-C
///         event => println!("{event:?}\r"),
///     }
/// }
/// # Ok::<(), canvas_term::error::InputError>(())
/// ```
#[derive(Debug)]
pub struct InputLoop<S = StdinSource> {
    source: S,
    buffer: ReadBuffer,
    decoder: Decoder,
    resize: &'static ResizeSignal,
    config: InputConfig,
}

impl InputLoop<StdinSource> {
    /// Input loop over unbuffered stdin, fed by the process SIGWINCH cell.
    #[must_use]
    pub fn stdin(size: Size, config: InputConfig) -> Self {
        Self::new(StdinSource, size, config)
    }
}

impl<S: InputSource> InputLoop<S> {
    /// Input loop over `source`, fed by the process SIGWINCH cell.
    ///
    /// `size` is the initial geometry used for mouse coordinates until the
    /// first resize.
    #[must_use]
    pub fn new(source: S, size: Size, config: InputConfig) -> Self {
        Self {
            source,
            buffer: ReadBuffer::new(),
            decoder: Decoder::new(config.decoder, size),
            resize: &SIGWINCH,
            config,
        }
    }

    /// Use a different resize cell (tests, embedding).
    #[must_use]
    pub const fn with_resize_signal(mut self, signal: &'static ResizeSignal) -> Self {
        self.resize = signal;
        self
    }

    /// Current geometry (updated by every resize event).
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.decoder.size()
    }

    /// The decoder, for inspecting half-decoded state.
    #[inline]
    #[must_use]
    pub const fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    /// Bytes read but not yet decoded.
    #[inline]
    #[must_use]
    pub const fn buffered(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> &InputConfig {
        &self.config
    }

    /// Block until the next event.
    ///
    /// # Errors
    ///
    /// [`InputError::Closed`] when the stream reaches end of file,
    /// [`InputError::Read`] when it fails. Both are fatal.
    pub fn await_event(&mut self) -> Result<Event, InputError> {
        loop {
            if let Some(event) = self.drain() {
                return Ok(event);
            }

            if let Some(event) = self.take_resize() {
                return Ok(event);
            }

            if let Some(timeout) = self.config.poll_timeout {
                match self.source.wait_readable(timeout) {
                    Ok(true) => {}
                    Ok(false) => return Ok(Event::Timeout),
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(fatal(InputError::Read(e))),
                }
            }

            if let Some(event) = self.fill()? {
                return Ok(event);
            }
        }
    }

    /// Feed buffered bytes to the decoder until one resolves an event or the
    /// buffer runs dry.
    fn drain(&mut self) -> Option<Event> {
        while let Some(byte) = self.buffer.peek() {
            match self.decoder.feed(byte) {
                Feed::Consumed(event) => {
                    self.buffer.consume();
                    if event.is_some() {
                        return event;
                    }
                }
                Feed::Replay(event) => return Some(event),
            }
        }
        None
    }

    /// One blocking read into the (empty) buffer. Returns a resize event if
    /// the read was interrupted by one.
    fn fill(&mut self) -> Result<Option<Event>, InputError> {
        let spare = self.buffer.spare_mut()?;
        match self.source.read(spare) {
            Ok(0) => Err(fatal(InputError::Closed)),
            Ok(n) => {
                self.buffer.commit(n)?;
                tracing::trace!(bytes = n, "input read");
                Ok(None)
            }
            // Interrupted without a pending resize: some other signal, retry.
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(self.take_resize()),
            Err(e) => Err(fatal(InputError::Read(e))),
        }
    }

    fn take_resize(&mut self) -> Option<Event> {
        let size = self.resize.take()?;
        tracing::debug!(cols = size.cols, rows = size.rows, "terminal resized");
        self.decoder.set_size(size);
        Some(Event::Resize {
            rows: size.rows,
            cols: size.cols,
        })
    }
}

fn fatal(error: InputError) -> InputError {
    tracing::error!(%error, "input stream unusable");
    error
}

// ─── Tests ───────────────────────────────────────────────────────────────────
