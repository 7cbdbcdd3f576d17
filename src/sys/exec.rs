//! Process helpers for launching external tools.
//!
//! Click actions are handed to the compositor with `swaymsg exec`, so the
//! launched program belongs to the session rather than to the status line.
//! The `swaymsg` client itself returns as soon as sway has accepted the
//! command and is reaped right away.

use std::io;
use std::process::{Command, ExitStatus, Stdio};

use tracing::{debug, warn};

/// IPC client used to launch programs.
pub const SWAYMSG: &str = "swaymsg";

/// Launch `program` through the compositor.
///
/// Failures are logged; a broken action never takes the status line down.
pub fn sway_exec(program: &str, args: &[&str]) {
    match launch(SWAYMSG, program, args) {
        Ok(status) if status.success() => debug!(program, "launched"),
        Ok(status) => warn!(program, %status, "swaymsg exec failed"),
        Err(e) => warn!(program, error = %e, "could not run swaymsg"),
    }
}

/// Run `launcher exec program args..` with discarded stdio and wait for it.
pub fn launch(launcher: &str, program: &str, args: &[&str]) -> io::Result<ExitStatus> {
    Command::new(launcher)
        .arg("exec")
        .arg(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
}

/// Run `program` with discarded stdio and report whether it exited with 0.
///
/// A program that cannot be spawned counts as failed.
pub fn exit_ok(program: &str) -> bool {
    match Command::new(program)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
    {
        Ok(status) => status.success(),
        Err(e) => {
            debug!(program, error = %e, "status command could not be spawned");
            false
        }
    }
}
