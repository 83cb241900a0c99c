// SPDX-License-Identifier: MIT
//
// Incremental UTF-8 assembly.
//
// Bytes arrive one at a time and a multi-byte character may be split across
// reads, so the assembler keeps up to four pending bytes between calls.
// Only structural validity is checked: lead/continuation bit patterns,
// overlong encodings and the C1 control range. Anything malformed becomes
// U+FFFD instead of an error.

use crate::event::REPLACEMENT_CHAR;

/// Outcome of pushing one byte into the [`Utf8Assembler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Utf8Step {
    /// A lead byte or a non-final continuation byte was accepted.
    Pending,
    /// A complete codepoint (possibly [`REPLACEMENT_CHAR`] for an overlong
    /// encoding or a C1 control).
    Char(u32),
    /// The byte cannot start a sequence (lone continuation byte, `0xF8..`).
    /// The byte is consumed.
    Invalid,
    /// A pending sequence was interrupted by a byte that is not a
    /// continuation byte. The pending bytes are dropped; the interrupting
    /// byte was *not* consumed and must be fed again.
    Broken,
}

/// Accumulator for one UTF-8 encoded character.
#[derive(Debug, Clone, Default)]
pub struct Utf8Assembler {
    bytes: [u8; 4],
    len: usize,
    remaining: usize,
}

impl Utf8Assembler {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bytes: [0; 4],
            len: 0,
            remaining: 0,
        }
    }

    /// Whether a multi-byte sequence is in progress.
    #[inline]
    #[must_use]
    pub const fn in_progress(&self) -> bool {
        self.remaining > 0
    }

    /// Continuation bytes still expected for the pending sequence.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.remaining
    }

    /// Drop any pending sequence.
    pub const fn reset(&mut self) {
        self.len = 0;
        self.remaining = 0;
    }

    /// Feed one byte.
    pub fn push(&mut self, byte: u8) -> Utf8Step {
        if self.remaining > 0 {
            return self.push_continuation(byte);
        }

        let expected = match byte {
            0x00..=0x7F => return Utf8Step::Char(u32::from(byte)),
            // 110xxxxx
            0xC0..=0xDF => 1,
            // 1110xxxx
            0xE0..=0xEF => 2,
            // 11110xxx
            0xF0..=0xF7 => 3,
            // 10xxxxxx with nothing pending, or 11111xxx.
            _ => return Utf8Step::Invalid,
        };

        self.bytes[0] = byte;
        self.len = 1;
        self.remaining = expected;
        Utf8Step::Pending
    }

    fn push_continuation(&mut self, byte: u8) -> Utf8Step {
        if byte & 0b1100_0000 != 0b1000_0000 {
            self.reset();
            return Utf8Step::Broken;
        }

        self.bytes[self.len] = byte;
        self.len += 1;
        self.remaining -= 1;
        if self.remaining > 0 {
            return Utf8Step::Pending;
        }

        let cp = self.assemble();
        self.reset();
        Utf8Step::Char(cp)
    }

    /// Combine the pending bytes into a codepoint, rejecting overlong
    /// encodings and C1 controls.
    fn assemble(&self) -> u32 {
        let (mask, min) = match self.len {
            2 => (0b0001_1111, 0x80),
            3 => (0b0000_1111, 0x800),
            _ => (0b0000_0111, 0x1_0000),
        };

        let cp = self.bytes[1..self.len]
            .iter()
            .fold(u32::from(self.bytes[0] & mask), |acc, &b| {
                (acc << 6) | u32::from(b & 0b0011_1111)
            });

        // C1 controls would be ESC-equivalents (0x9B is CSI). Not decoded yet.
        if cp < min || (0x80..=0x9F).contains(&cp) {
            REPLACEMENT_CHAR
        } else {
            cp
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
