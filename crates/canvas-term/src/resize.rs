// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Resize notification — the one piece of state shared with a signal handler.
//
// SIGWINCH can land at any instant, including in the middle of a decode. The
// handler therefore touches nothing but two atomics: it queries the new size
// with `ioctl(TIOCGWINSZ)` (async-signal-safe), stores it, then raises the
// pending flag. The input loop drains the flag when its blocking read is
// interrupted. There is no queue: a burst of resizes collapses into the
// latest size.
//
// The handler is installed *without* `SA_RESTART`, so a blocked `read()`
// returns `EINTR` instead of silently resuming. That interrupt is how the
// input loop learns a resize happened while it was waiting.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::geometry::Size;

/// Latest-value cell written by a signal handler, drained by the input loop.
#[derive(Debug)]
pub struct ResizeSignal {
    /// Packed [`Size`] (see [`Size::pack`]).
    size: AtomicU32,
    pending: AtomicBool,
}

impl ResizeSignal {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            size: AtomicU32::new(0),
            pending: AtomicBool::new(false),
        }
    }

    /// Record a new size. Safe to call from a signal handler.
    pub fn notify(&self, size: Size) {
        self.size.store(size.pack(), Ordering::Relaxed);
        // Release: the size store above is visible to whoever sees the flag.
        self.pending.store(true, Ordering::Release);
    }

    /// Take the pending size, if a resize happened since the last call.
    pub fn take(&self) -> Option<Size> {
        self.pending
            .swap(false, Ordering::Acquire)
            .then(|| Size::unpack(self.size.load(Ordering::Relaxed)))
    }

    /// Whether a resize is waiting to be taken.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}

impl Default for ResizeSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// The process-wide cell fed by the SIGWINCH handler.
pub static SIGWINCH: ResizeSignal = ResizeSignal::new();

/// Install the SIGWINCH handler that feeds [`SIGWINCH`].
///
/// # Errors
///
/// Returns the OS error if `sigaction` fails.
#[cfg(unix)]
pub fn install_sigwinch_handler() -> std::io::Result<()> {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        // No SA_RESTART: the blocking read must see EINTR.
        sa.sa_flags = 0;
        libc::sigemptyset(&raw mut sa.sa_mask);
        if libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut()) != 0 {
            return Err(std::io::Error::last_os_error());
        }
    }
    Ok(())
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    if let Some(size) = crate::terminal::get_size() {
        SIGWINCH.notify(size);
    }
}

#[cfg(not(unix))]
pub fn install_sigwinch_handler() -> std::io::Result<()> {
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
