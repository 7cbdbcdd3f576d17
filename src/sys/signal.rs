//! Signal plumbing: termination and refresh requests.
//!
//! Both flags are single-writer (the signal handler) and multi-reader (the
//! render loop and the click thread). Readers use relaxed loads: observing a
//! request one iteration late is harmless.

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Arc;

use signal_hook::consts::{SIGINT, SIGTERM, SIGUSR1};
use signal_hook::low_level;

use crate::error::{Error, Result};

/// Process-wide termination request, holding the signal that caused it.
#[derive(Debug, Clone, Default)]
pub struct Termination {
    signal: Arc<AtomicI32>,
}

impl Termination {
    /// Create an unset flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a termination request.
    ///
    /// Only the first request is kept; returns `false` if one was already
    /// recorded.
    pub fn request(&self, signum: i32) -> bool {
        self.signal
            .compare_exchange(0, signum, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Signal that requested termination, if any.
    pub fn signal(&self) -> Option<i32> {
        match self.signal.load(Ordering::Relaxed) {
            0 => None,
            signum => Some(signum),
        }
    }

    /// Whether termination was requested.
    #[inline]
    pub fn is_requested(&self) -> bool {
        self.signal.load(Ordering::Relaxed) != 0
    }
}

/// Request to re-render every widget on the next pass.
#[derive(Debug, Clone, Default)]
pub struct Refresh {
    flag: Arc<AtomicBool>,
}

impl Refresh {
    /// Create a cleared flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for a full refresh.
    pub fn request(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether a refresh is waiting.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Consume a pending refresh.
    pub fn take(&self) -> bool {
        self.flag.swap(false, Ordering::Relaxed)
    }
}

/// Install handlers for `SIGINT`/`SIGTERM` and `SIGUSR1`.
///
/// The first interrupt or terminate signal sets `termination`. Any further
/// one runs the default action, so a hung shutdown can still be killed with
/// a second Ctrl+C. `SIGUSR1` sets `refresh`.
pub fn register(termination: &Termination, refresh: &Refresh) -> Result<()> {
    for signum in [SIGINT, SIGTERM] {
        let term = termination.clone();
        // SAFETY: the action only performs an atomic compare-exchange and,
        // on a repeated signal, `emulate_default_handler`, which is
        // async-signal-safe.
        #[allow(unsafe_code)]
        unsafe {
            low_level::register(signum, move || {
                if !term.request(signum) {
                    let _ = low_level::emulate_default_handler(signum);
                }
            })
        }
        .map_err(Error::Signal)?;
    }

    signal_hook::flag::register(SIGUSR1, Arc::clone(&refresh.flag)).map_err(Error::Signal)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_termination_set_once() {
        let term = Termination::new();
        assert!(!term.is_requested());
        assert_eq!(term.signal(), None);

        assert!(term.request(SIGTERM));
        assert!(!term.request(SIGINT));
        assert_eq!(term.signal(), Some(SIGTERM));

        // Clones observe the same flag
        let seen = term.clone();
        assert!(seen.is_requested());
    }

    #[test]
    fn test_refresh_take() {
        let refresh = Refresh::new();
        assert!(!refresh.take());

        refresh.request();
        assert!(refresh.is_pending());
        assert!(refresh.take());
        assert!(!refresh.is_pending());
    }

    #[test]
    fn test_sigusr1_sets_refresh() {
        let term = Termination::new();
        let refresh = Refresh::new();
        register(&term, &refresh).unwrap();

        low_level::raise(SIGUSR1).unwrap();
        assert!(refresh.take());
        assert!(!term.is_requested());
    }
}
