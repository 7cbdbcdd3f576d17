//! Crate error type.
//!
//! Only resource and overflow failures become an [`Error`]. Malformed click
//! payloads are absorbed by the ingestion loop and never surface here.

use std::io;
use std::path::PathBuf;

use nix::errno::Errno;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal conditions that stop the status line.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading click events from standard input failed.
    #[error("clicks thread failed to read stdin: {0}")]
    ClickInput(#[source] io::Error),

    /// Waiting for standard input readiness failed.
    #[error("clicks thread failed to poll stdin: {0}")]
    ClickPoll(#[source] Errno),

    /// The ingestion thread could not be spawned or did not exit cleanly.
    #[error("clicks thread: {0}")]
    ClickThread(String),

    /// A widget rendered more text than its slot can hold.
    #[error("widget {widget} overflowed its {capacity} byte render slot")]
    RenderOverflow {
        /// Index of the offending widget.
        widget: usize,
        /// Slot capacity in bytes.
        capacity: usize,
    },

    /// Writing the bar protocol to standard output failed.
    #[error("failed to write status line: {0}")]
    Output(#[source] io::Error),

    /// A sysfs parameter could not be opened.
    #[error("cannot read {}: {source}", path.display())]
    Sysfs {
        /// Parameter path.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },

    /// Installing a signal handler failed.
    #[error("failed to register signal handler: {0}")]
    Signal(#[source] io::Error),

    /// Configuration could not be turned into a widget table.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Process exit code for this failure.
    pub const fn exit_code(&self) -> u8 {
        1
    }
}
