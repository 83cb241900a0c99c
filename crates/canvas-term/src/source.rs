// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Byte sources for the input loop.
//
// The loop needs two things from its input: a plain `read()` that reports
// interrupts as errors (rather than retrying them, as `std::io::Stdin`
// would behind its buffer), and an optional readiness wait for the timeout
// event. `StdinSource` talks to fd 0 directly through libc for both.

use std::io::{self, Read};
use std::time::Duration;

/// Raw input consumed by [`InputLoop`](crate::input::InputLoop).
pub trait InputSource {
    /// Read available bytes into `buf`.
    ///
    /// Must return `Ok(0)` only at end of stream, and surface an
    /// interrupted call as [`io::ErrorKind::Interrupted`].
    ///
    /// # Errors
    ///
    /// Any failure of the underlying stream.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Block until input is readable or `timeout` passes.
    ///
    /// Returns `Ok(true)` when readable, `Ok(false)` on timeout. Sources
    /// that cannot wait report readable immediately.
    ///
    /// # Errors
    ///
    /// Any failure of the underlying wait, including
    /// [`io::ErrorKind::Interrupted`].
    fn wait_readable(&mut self, _timeout: Duration) -> io::Result<bool> {
        Ok(true)
    }
}

// ─── Stdin ───────────────────────────────────────────────────────────────────

/// Unbuffered standard input.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinSource;

#[cfg(unix)]
impl InputSource for StdinSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = unsafe { libc::read(libc::STDIN_FILENO, buf.as_mut_ptr().cast(), buf.len()) };
        if n < 0 {
            return Err(io::Error::last_os_error());
        }
        #[allow(clippy::cast_sign_loss)] // n >= 0 checked above.
        Ok(n as usize)
    }

    fn wait_readable(&mut self, timeout: Duration) -> io::Result<bool> {
        let millis = libc::c_int::try_from(timeout.as_millis()).unwrap_or(libc::c_int::MAX);
        let ready = unsafe {
            let mut pfd = libc::pollfd {
                fd: libc::STDIN_FILENO,
                events: libc::POLLIN,
                revents: 0,
            };
            libc::poll(&raw mut pfd, 1, millis)
        };
        if ready < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(ready > 0)
    }
}

#[cfg(not(unix))]
impl InputSource for StdinSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        io::stdin().lock().read(buf)
    }
}

// ─── Any reader ──────────────────────────────────────────────────────────────

/// Adapts any [`Read`] (a file of captured input, a pipe, a byte slice).
///
/// Never waits: [`wait_readable`](InputSource::wait_readable) always
/// reports readable.
#[derive(Debug, Clone)]
pub struct ReaderSource<R>(pub R);

impl<R: Read> InputSource for ReaderSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reader_source_reads_then_ends() {
        let mut src = ReaderSource(&b"abc"[..]);
        let mut buf = [0u8; 8];
        assert_eq!(src.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], b"abc");
        assert_eq!(src.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn reader_source_is_always_ready() {
        let mut src = ReaderSource(&b""[..]);
        assert!(src.wait_readable(Duration::ZERO).unwrap());
    }

    #[test]
    fn stdin_wait_does_not_panic() {
        let _ = StdinSource.wait_readable(Duration::ZERO);
    }
}
