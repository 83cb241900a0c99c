// SPDX-License-Identifier: MIT
//
// The eight ANSI colors plus the terminal default.
//
// SGR encodes a foreground color as 30 + index and a background as
// 40 + index. Index 9 (39 / 49) selects whatever the terminal's own default
// is, which is what the handle restores on drop.

/// One of the eight standard ANSI colors, or the terminal's default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    #[default]
    Default,
}

impl Color {
    /// The eight concrete colors, in SGR index order.
    pub const PALETTE: [Self; 8] = [
        Self::Black,
        Self::Red,
        Self::Green,
        Self::Yellow,
        Self::Blue,
        Self::Magenta,
        Self::Cyan,
        Self::White,
    ];

    /// SGR index: 0–7 for the palette, 9 for the default.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Black => 0,
            Self::Red => 1,
            Self::Green => 2,
            Self::Yellow => 3,
            Self::Blue => 4,
            Self::Magenta => 5,
            Self::Cyan => 6,
            Self::White => 7,
            Self::Default => 9,
        }
    }

    /// Foreground SGR parameter (30–37, 39).
    #[inline]
    #[must_use]
    pub const fn fg_code(self) -> u8 {
        30 + self.index()
    }

    /// Background SGR parameter (40–47, 49).
    #[inline]
    #[must_use]
    pub const fn bg_code(self) -> u8 {
        40 + self.index()
    }

    /// Palette color for a decimal digit, wrapping past 7.
    #[must_use]
    pub const fn from_digit(digit: u8) -> Self {
        Self::PALETTE[(digit % 8) as usize]
    }
}
