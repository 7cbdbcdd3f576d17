//! Operating-system collaborators.
//!
//! - [`sysfs`]: Open-once kernel attribute reader
//! - [`exec`]: Launching external tools through the compositor
//! - [`signal`]: Termination and refresh flags set by signal handlers
//! - [`stdin`]: Timeout-bounded, cancellable reads

pub mod exec;
pub mod signal;
pub mod stdin;
pub mod sysfs;

pub use exec::sway_exec;
pub use signal::{Refresh, Termination};
pub use stdin::{CancellableReader, ReadOutcome};
pub use sysfs::SysfsParam;
