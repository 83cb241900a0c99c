// SPDX-License-Identifier: MIT
//
// Terminal geometry and the canvas coordinate system.
//
// The canvas puts row 0 at the bottom of the screen (y grows upward), while
// the terminal numbers rows from the top, 1-based. Every coordinate that
// crosses that boundary goes through `Size::flip_row`.

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    /// Number of columns (width in character cells).
    pub cols: u16,
    /// Number of rows (height in character cells).
    pub rows: u16,
}

impl Size {
    /// Fallback when the terminal size cannot be queried.
    pub const FALLBACK: Self = Self { cols: 80, rows: 24 };

    #[inline]
    #[must_use]
    pub const fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    /// Total number of cells (`cols × rows`).
    #[inline]
    #[must_use]
    pub const fn area(self) -> u32 {
        self.cols as u32 * self.rows as u32
    }

    /// Convert between bottom-up and top-down 0-indexed rows.
    ///
    /// The mapping is its own inverse. Rows outside the screen saturate to
    /// the top row (0 top-down).
    #[inline]
    #[must_use]
    pub const fn flip_row(self, row: u16) -> u16 {
        self.rows.saturating_sub(1).saturating_sub(row)
    }

    /// Clamp a canvas coordinate onto the screen.
    #[inline]
    #[must_use]
    pub fn clamp(self, col: u16, row: u16) -> (u16, u16) {
        (
            col.min(self.cols.saturating_sub(1)),
            row.min(self.rows.saturating_sub(1)),
        )
    }

    /// Pack into one word for lock-free storage (rows high, cols low).
    #[inline]
    #[must_use]
    pub const fn pack(self) -> u32 {
        ((self.rows as u32) << 16) | self.cols as u32
    }

    /// Inverse of [`pack`](Self::pack).
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // Each half is 16 bits by construction.
    pub const fn unpack(word: u32) -> Self {
        Self {
            cols: word as u16,
            rows: (word >> 16) as u16,
        }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::FALLBACK
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_area() {
        assert_eq!(Size::new(80, 24).area(), 1920);
        assert_eq!(Size::new(0, 24).area(), 0);
    }

    #[test]
    fn flip_row_bottom_and_top() {
        let s = Size::new(80, 24);
        assert_eq!(s.flip_row(0), 23);
        assert_eq!(s.flip_row(23), 0);
    }

    #[test]
    fn flip_row_is_involution() {
        let s = Size::new(80, 24);
        for row in 0..24 {
            assert_eq!(s.flip_row(s.flip_row(row)), row);
        }
    }

    #[test]
    fn flip_row_off_screen_saturates() {
        let s = Size::new(80, 24);
        assert_eq!(s.flip_row(100), 0);
        assert_eq!(Size::new(80, 0).flip_row(0), 0);
    }

    #[test]
    fn clamp_to_screen() {
        let s = Size::new(80, 24);
        assert_eq!(s.clamp(200, 200), (79, 23));
        assert_eq!(s.clamp(3, 4), (3, 4));
    }

    #[test]
    fn pack_round_trip() {
        let s = Size::new(u16::MAX, 1);
        assert_eq!(Size::unpack(s.pack()), s);
        let s = Size::new(132, 43);
        assert_eq!(Size::unpack(s.pack()), s);
    }

    #[test]
    fn default_is_fallback() {
        assert_eq!(Size::default(), Size::new(80, 24));
    }
}
