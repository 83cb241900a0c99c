// SPDX-License-Identifier: MIT
//
// Escape sequence argument list.
//
// CSI parameters are kept as raw decimal digits in fixed storage: 32
// arguments of up to 128 digits each. Nothing grows. Every write is checked
// against the capacity first and an overflow is reported as a decode error,
// which sends the parser back to ground.

use crate::error::DecodeError;

/// Maximum number of arguments in one sequence.
pub const MAX_ARGS: usize = 32;

/// Maximum number of digits in one argument.
pub const MAX_ARG_LEN: usize = 128;

/// Bounded list of numeric escape arguments.
///
/// There is always a current argument, possibly empty: `CSI ~` has one
/// empty argument, `CSI 1;2 A` has two.
#[derive(Clone)]
pub struct ArgList {
    digits: [[u8; MAX_ARG_LEN]; MAX_ARGS],
    lens: [usize; MAX_ARGS],
    /// Index of the argument currently being written.
    current: usize,
}

impl ArgList {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            digits: [[0; MAX_ARG_LEN]; MAX_ARGS],
            lens: [0; MAX_ARGS],
            current: 0,
        }
    }

    /// Number of arguments supplied so far (at least 1).
    #[inline]
    #[must_use]
    pub const fn count(&self) -> usize {
        self.current + 1
    }

    /// Digits of argument `index`, or `None` past the last argument.
    #[must_use]
    pub fn digits(&self, index: usize) -> Option<&[u8]> {
        (index <= self.current).then(|| &self.digits[index][..self.lens[index]])
    }

    /// Decimal value of argument `index`, saturating at `u32::MAX`.
    ///
    /// An empty argument is 0. Returns `None` past the last argument.
    #[must_use]
    pub fn value(&self, index: usize) -> Option<u32> {
        self.digits(index).map(|digits| {
            digits.iter().fold(0u32, |acc, &d| {
                acc.saturating_mul(10).saturating_add(u32::from(d - b'0'))
            })
        })
    }

    /// Append an argument byte: a decimal digit or the `;` separator.
    ///
    /// # Errors
    ///
    /// [`DecodeError::TooManyArguments`] when `;` would open argument 33,
    /// [`DecodeError::ArgumentTooLong`] when a digit would exceed
    /// [`MAX_ARG_LEN`]. The list is left unchanged on error.
    ///
    /// # Panics
    ///
    /// Debug builds assert that `byte` is a digit or `;`; the parser only
    /// routes those here.
    pub fn push(&mut self, byte: u8) -> Result<(), DecodeError> {
        debug_assert!(byte.is_ascii_digit() || byte == b';');

        if byte == b';' {
            if self.current + 1 >= MAX_ARGS {
                return Err(DecodeError::TooManyArguments);
            }
            self.current += 1;
            return Ok(());
        }

        let len = &mut self.lens[self.current];
        if *len >= MAX_ARG_LEN {
            return Err(DecodeError::ArgumentTooLong);
        }
        self.digits[self.current][*len] = byte;
        *len += 1;
        Ok(())
    }

    /// Forget every argument.
    pub fn clear(&mut self) {
        self.lens[..=self.current].fill(0);
        self.current = 0;
    }
}

impl Default for ArgList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ArgList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let args: Vec<_> = (0..self.count())
            .filter_map(|i| self.digits(i))
            .map(String::from_utf8_lossy)
            .collect();
        f.debug_list().entries(args).finish()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn args(bytes: &[u8]) -> ArgList {
        let mut list = ArgList::new();
        for &b in bytes {
            list.push(b).unwrap();
        }
        list
    }

    #[test]
    fn empty_list_has_one_empty_argument() {
        let list = ArgList::new();
        assert_eq!(list.count(), 1);
        assert_eq!(list.value(0), Some(0));
        assert_eq!(list.value(1), None);
    }

    #[test]
    fn single_argument() {
        let list = args(b"21");
        assert_eq!(list.count(), 1);
        assert_eq!(list.value(0), Some(21));
    }

    #[test]
    fn three_arguments() {
        let list = args(b"2;5;3");
        assert_eq!(list.count(), 3);
        assert_eq!(list.value(0), Some(2));
        assert_eq!(list.value(1), Some(5));
        assert_eq!(list.value(2), Some(3));
    }

    #[test]
    fn empty_middle_argument() {
        let list = args(b"1;;7");
        assert_eq!(list.count(), 3);
        assert_eq!(list.value(1), Some(0));
        assert_eq!(list.digits(1), Some(&b""[..]));
    }

    #[test]
    fn value_saturates() {
        let list = args(b"99999999999999999999");
        assert_eq!(list.value(0), Some(u32::MAX));
    }

    #[test]
    fn thirty_two_arguments_fit() {
        let list = args(&[b';'; MAX_ARGS - 1]);
        assert_eq!(list.count(), MAX_ARGS);
    }

    #[test]
    fn thirty_third_argument_is_an_error() {
        let mut list = args(&[b';'; MAX_ARGS - 1]);
        assert_eq!(list.push(b';'), Err(DecodeError::TooManyArguments));
        assert_eq!(list.count(), MAX_ARGS);
    }

    #[test]
    fn max_length_argument_fits() {
        let list = args(&[b'1'; MAX_ARG_LEN]);
        assert_eq!(list.digits(0).map(<[u8]>::len), Some(MAX_ARG_LEN));
    }

    #[test]
    fn overlong_argument_is_an_error() {
        let mut list = args(&[b'1'; MAX_ARG_LEN]);
        assert_eq!(list.push(b'1'), Err(DecodeError::ArgumentTooLong));
        assert_eq!(list.digits(0).map(<[u8]>::len), Some(MAX_ARG_LEN));
    }

    #[test]
    fn clear_resets_everything() {
        let mut list = args(b"12;34;56");
        list.clear();
        assert_eq!(list.count(), 1);
        assert_eq!(list.value(0), Some(0));
        list.push(b';').unwrap();
        assert_eq!(list.value(1), Some(0));
    }

    #[test]
    fn debug_lists_digits() {
        assert_eq!(format!("{:?}", args(b"2;5")), r#"["2", "5"]"#);
    }
}
