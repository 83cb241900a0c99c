// SPDX-License-Identifier: MIT
//
// Fixed-capacity read buffer.
//
// The input loop reads into a small fixed array and drains it one byte at a
// time through the decoder. The buffer keeps an offset and a length with
// `offset + len <= N`; bytes leave strictly in arrival order, and new bytes
// may only be written once everything previously read has been consumed.
// Both rules are checked rather than assumed.

use crate::error::RingError;

/// Capacity of the input loop's read buffer.
pub const READ_BUF_SIZE: usize = 32;

/// A bounded byte queue filled by `read()` and drained by the decoder.
#[derive(Debug, Clone)]
pub struct ReadBuffer<const N: usize = READ_BUF_SIZE> {
    bytes: [u8; N],
    offset: usize,
    len: usize,
}

impl<const N: usize> ReadBuffer<N> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bytes: [0; N],
            offset: 0,
            len: 0,
        }
    }

    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Bytes read but not yet consumed.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The next unconsumed byte.
    #[inline]
    #[must_use]
    pub const fn peek(&self) -> Option<u8> {
        if self.len == 0 {
            None
        } else {
            Some(self.bytes[self.offset])
        }
    }

    /// Drop the next unconsumed byte. No-op when empty.
    pub const fn consume(&mut self) {
        if self.len == 0 {
            return;
        }
        self.len -= 1;
        self.offset = if self.len == 0 { 0 } else { self.offset + 1 };
    }

    /// Take the next unconsumed byte.
    pub const fn pop(&mut self) -> Option<u8> {
        let byte = self.peek();
        self.consume();
        byte
    }

    /// Writable space for the next `read()`: the whole buffer.
    ///
    /// # Errors
    ///
    /// [`RingError::NotEmpty`] if unconsumed bytes remain.
    pub fn spare_mut(&mut self) -> Result<&mut [u8], RingError> {
        if self.len != 0 {
            return Err(RingError::NotEmpty(self.len));
        }
        self.offset = 0;
        Ok(&mut self.bytes[..])
    }

    /// Mark `n` freshly written bytes (from [`spare_mut`](Self::spare_mut))
    /// as readable.
    ///
    /// # Errors
    ///
    /// [`RingError::NotEmpty`] if unconsumed bytes remain,
    /// [`RingError::Overflow`] if `n` exceeds the capacity.
    pub const fn commit(&mut self, n: usize) -> Result<(), RingError> {
        if self.len != 0 {
            return Err(RingError::NotEmpty(self.len));
        }
        if n > N {
            return Err(RingError::Overflow {
                committed: n,
                capacity: N,
            });
        }
        self.offset = 0;
        self.len = n;
        Ok(())
    }
}

impl<const N: usize> Default for ReadBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(data: &[u8]) -> ReadBuffer {
        let mut buf: ReadBuffer = ReadBuffer::new();
        buf.spare_mut().unwrap()[..data.len()].copy_from_slice(data);
        buf.commit(data.len()).unwrap();
        buf
    }

    #[test]
    fn default_capacity_is_32() {
        assert_eq!(ReadBuffer::<READ_BUF_SIZE>::new().capacity(), 32);
    }

    #[test]
    fn new_buffer_is_empty() {
        let buf: ReadBuffer = ReadBuffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.peek(), None);
    }

    #[test]
    fn drains_in_order() {
        let mut buf = filled(b"abc");
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.pop(), Some(b'a'));
        assert_eq!(buf.pop(), Some(b'b'));
        assert_eq!(buf.pop(), Some(b'c'));
        assert_eq!(buf.pop(), None);
        assert!(buf.is_empty());
    }

    #[test]
    fn peek_does_not_consume() {
        let buf = filled(b"xy");
        assert_eq!(buf.peek(), Some(b'x'));
        assert_eq!(buf.peek(), Some(b'x'));
        assert_eq!(buf.len(), 2);
    }

    #[test]
    fn refill_while_pending_is_rejected() {
        let mut buf = filled(b"xy");
        buf.consume();
        assert_eq!(buf.spare_mut().err(), Some(RingError::NotEmpty(1)));
        assert_eq!(buf.commit(1), Err(RingError::NotEmpty(1)));
        // Pending byte survives the rejected refill.
        assert_eq!(buf.pop(), Some(b'y'));
    }

    #[test]
    fn commit_past_capacity_is_rejected() {
        let mut buf: ReadBuffer<4> = ReadBuffer::new();
        assert_eq!(
            buf.commit(5),
            Err(RingError::Overflow {
                committed: 5,
                capacity: 4
            })
        );
        assert!(buf.is_empty());
    }

    #[test]
    fn full_buffer_round() {
        let data = [7u8; READ_BUF_SIZE];
        let mut buf = filled(&data);
        assert_eq!(buf.len(), READ_BUF_SIZE);
        for _ in 0..READ_BUF_SIZE {
            assert_eq!(buf.pop(), Some(7));
        }
        assert!(buf.is_empty());
        // Refill works once drained.
        assert!(buf.spare_mut().is_ok());
    }

    #[test]
    fn consume_on_empty_is_noop() {
        let mut buf: ReadBuffer = ReadBuffer::new();
        buf.consume();
        assert!(buf.is_empty());
    }
}
