// SPDX-License-Identifier: MIT
//
// Event decoder — one byte in, at most one event out.
//
// Routes each byte either to the UTF-8 assembler (while a multi-byte
// character is pending) or to the escape parser, which hands plain ground
// bytes back to the assembler. All state lives here and survives calls that
// return no event, so a sequence split across any number of reads decodes
// the same as one delivered whole.
//
// # Broken UTF-8 sequences
//
// When a multi-byte character is cut short by a byte that is not a
// continuation byte, the decoder emits U+FFFD for the pending bytes and
// asks for the interrupting byte to be fed again ([`Feed::Replay`]). That
// byte is then decoded from a clean state, so an ESC that follows a
// truncated character still starts its escape sequence.

use crate::event::{Event, REPLACEMENT_CHAR};
use crate::geometry::Size;
use crate::parser::{Action, EscapeParser, ParserState};
use crate::utf8::{Utf8Assembler, Utf8Step};

// ─── Config ──────────────────────────────────────────────────────────────────

/// Decoder options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Accept `ESC A`..`ESC D` (no `[`) as arrow keys. Default: `true`.
    pub bare_arrow_keys: bool,
    /// The only SGR mouse button code reported as press/release. Reports
    /// with any other code are rejected. Default: `2`.
    pub mouse_button: u16,
}

impl DecoderConfig {
    #[must_use]
    pub const fn with_bare_arrow_keys(mut self, enabled: bool) -> Self {
        self.bare_arrow_keys = enabled;
        self
    }

    #[must_use]
    pub const fn with_mouse_button(mut self, button: u16) -> Self {
        self.mouse_button = button;
        self
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            bare_arrow_keys: true,
            mouse_button: 2,
        }
    }
}

// ─── Decoder ─────────────────────────────────────────────────────────────────

/// Result of feeding one byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    /// The byte was consumed, possibly completing an event.
    Consumed(Option<Event>),
    /// An event was produced *without* consuming the byte. Feed the same
    /// byte again.
    Replay(Event),
}

/// Incremental terminal input decoder.
#[derive(Debug, Clone)]
pub struct Decoder {
    parser: EscapeParser,
    utf8: Utf8Assembler,
    /// Geometry used to flip mouse rows into canvas space.
    size: Size,
}

impl Decoder {
    #[must_use]
    pub const fn new(config: DecoderConfig, size: Size) -> Self {
        Self {
            parser: EscapeParser::new(config),
            utf8: Utf8Assembler::new(),
            size,
        }
    }

    /// Geometry used for mouse coordinates.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Update the geometry after a resize. Decode state is kept.
    pub const fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    /// Current escape parser state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> ParserState {
        self.parser.state()
    }

    /// Whether nothing is half-decoded.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.parser.state() == ParserState::Ground && !self.utf8.in_progress()
    }

    /// Feed one byte.
    pub fn feed(&mut self, byte: u8) -> Feed {
        if self.utf8.in_progress() {
            return self.feed_text(byte);
        }
        match self.parser.advance(byte, self.size) {
            Action::Text => self.feed_text(byte),
            Action::Pending => Feed::Consumed(None),
            Action::Emit(event) => Feed::Consumed(Some(event)),
        }
    }

    /// Decode a whole slice, returning every event in order.
    pub fn decode(&mut self, bytes: &[u8]) -> Vec<Event> {
        let mut events = Vec::new();
        let mut pos = 0;
        while let Some(&byte) = bytes.get(pos) {
            match self.feed(byte) {
                Feed::Consumed(event) => {
                    events.extend(event);
                    pos += 1;
                }
                Feed::Replay(event) => events.push(event),
            }
        }
        events
    }

    /// Drop any half-decoded sequence.
    pub fn reset(&mut self) {
        self.parser.reset();
        self.utf8.reset();
    }

    fn feed_text(&mut self, byte: u8) -> Feed {
        match self.utf8.push(byte) {
            Utf8Step::Pending => Feed::Consumed(None),
            Utf8Step::Char(cp) => Feed::Consumed(Some(Event::Char(cp))),
            Utf8Step::Invalid => {
                tracing::debug!(byte, "invalid UTF-8 lead byte");
                Feed::Consumed(Some(Event::Char(REPLACEMENT_CHAR)))
            }
            Utf8Step::Broken => {
                tracing::debug!(byte, "UTF-8 sequence interrupted");
                Feed::Replay(Event::Char(REPLACEMENT_CHAR))
            }
        }
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new(DecoderConfig::default(), Size::FALLBACK)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
