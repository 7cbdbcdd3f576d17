//! Cancellable, timeout-bounded reads from a pollable descriptor.
//!
//! The click thread must notice shutdown even while the bar sends nothing.
//! [`CancellableReader`] waits for readiness with a bounded `poll` and checks
//! a cancellation predicate between waits, so a reader blocked on an idle
//! stdin returns within one timeout of being cancelled.
//!
//! The wrapped reader must be unbuffered (e.g. a `File` over the stdin
//! descriptor, not `std::io::Stdin`), otherwise bytes sitting in a user-space
//! buffer would be invisible to `poll`.

use std::io::{self, Read};
use std::os::fd::AsFd;

use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};

use crate::error::{Error, Result};

/// Result of one [`CancellableReader::read_chunk`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// `n` bytes were read into the buffer.
    Data(usize),
    /// The writer side was closed.
    Eof,
    /// Cancellation was observed before data arrived.
    Cancelled,
}

/// Reader that waits for input in bounded slices.
#[derive(Debug)]
pub struct CancellableReader<R> {
    inner: R,
    timeout_ms: u16,
}

impl<R: Read + AsFd> CancellableReader<R> {
    /// Wrap `inner`, polling at most `timeout_ms` per wait.
    pub const fn new(inner: R, timeout_ms: u16) -> Self {
        Self { inner, timeout_ms }
    }

    /// Read one chunk, giving up once `cancelled` returns `true`.
    ///
    /// Timeouts and `EINTR` are retried after re-checking cancellation.
    pub fn read_chunk<F>(&mut self, buf: &mut [u8], cancelled: F) -> Result<ReadOutcome>
    where
        F: Fn() -> bool,
    {
        loop {
            if cancelled() {
                return Ok(ReadOutcome::Cancelled);
            }

            let ready = {
                let mut fds = [PollFd::new(self.inner.as_fd(), PollFlags::POLLIN)];
                poll(&mut fds, PollTimeout::from(self.timeout_ms))
            };
            match ready {
                Ok(0) | Err(Errno::EINTR) => continue,
                Ok(_) => {}
                Err(e) => return Err(Error::ClickPoll(e)),
            }

            match self.inner.read(buf) {
                Ok(0) => return Ok(ReadOutcome::Eof),
                Ok(n) => return Ok(ReadOutcome::Data(n)),
                Err(e) if matches!(e.kind(), io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock) => {}
                Err(e) => return Err(Error::ClickInput(e)),
            }
        }
    }
}
