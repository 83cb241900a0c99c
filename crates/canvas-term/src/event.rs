// SPDX-License-Identifier: MIT
//
// Input event types.
//
// One decode cycle resolves to exactly one `Event`. Mouse coordinates are
// already in canvas space (0-indexed, row 0 at the bottom), so callers can
// feed them straight back into the output surface.

/// A decoded terminal input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// A named key (arrows, function keys).
    Key(KeyCode),
    /// A decoded text character.
    ///
    /// Carries the raw codepoint: malformed UTF-8 arrives as
    /// [`REPLACEMENT_CHAR`]. Use [`Event::as_char`] to get a `char`.
    Char(u32),
    /// Mouse button pressed at a canvas coordinate.
    MouseDown { col: u16, row: u16 },
    /// Mouse button released at a canvas coordinate.
    MouseUp { col: u16, row: u16 },
    /// The terminal was resized. Carries the new geometry.
    Resize { rows: u16, cols: u16 },
    /// No input arrived within the configured poll timeout.
    Timeout,
}

impl Event {
    /// The codepoint of a [`Char`](Event::Char) event as a `char`.
    ///
    /// Returns `None` for other events and for codepoints that are not
    /// Unicode scalar values (surrogates, values above `0x10FFFF`).
    #[must_use]
    pub fn as_char(self) -> Option<char> {
        match self {
            Self::Char(cp) => char::from_u32(cp),
            _ => None,
        }
    }
}

/// The Unicode replacement character, substituted for malformed input.
pub const REPLACEMENT_CHAR: u32 = 0xFFFD;

/// Identity of a named key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Up,
    Down,
    Left,
    Right,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
}

impl KeyCode {
    /// Arrow key for a CSI/SS3 final byte (`A` up, `B` down, `C` right, `D` left).
    #[must_use]
    pub const fn from_arrow_byte(byte: u8) -> Option<Self> {
        match byte {
            b'A' => Some(Self::Up),
            b'B' => Some(Self::Down),
            b'C' => Some(Self::Right),
            b'D' => Some(Self::Left),
            _ => None,
        }
    }

    /// F1–F4 for an SS3 final byte (`P`, `Q`, `R`, `S`).
    #[must_use]
    pub const fn from_ss3_byte(byte: u8) -> Option<Self> {
        match byte {
            b'P' => Some(Self::F1),
            b'Q' => Some(Self::F2),
            b'R' => Some(Self::F3),
            b'S' => Some(Self::F4),
            _ => None,
        }
    }

    /// F5–F12 for the numeric argument of a `CSI n ~` sequence.
    ///
    /// The numbering has gaps (16 and 22 are unused) inherited from the
    /// VT220 keyboard layout.
    #[must_use]
    pub const fn from_tilde_number(n: u32) -> Option<Self> {
        match n {
            15 => Some(Self::F5),
            17 => Some(Self::F6),
            18 => Some(Self::F7),
            19 => Some(Self::F8),
            20 => Some(Self::F9),
            21 => Some(Self::F10),
            23 => Some(Self::F11),
            24 => Some(Self::F12),
            _ => None,
        }
    }

    /// Function key number (1–12), or `None` for arrows.
    #[must_use]
    pub const fn function_number(self) -> Option<u8> {
        match self {
            Self::Up | Self::Down | Self::Left | Self::Right => None,
            Self::F1 => Some(1),
            Self::F2 => Some(2),
            Self::F3 => Some(3),
            Self::F4 => Some(4),
            Self::F5 => Some(5),
            Self::F6 => Some(6),
            Self::F7 => Some(7),
            Self::F8 => Some(8),
            Self::F9 => Some(9),
            Self::F10 => Some(10),
            Self::F11 => Some(11),
            Self::F12 => Some(12),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
