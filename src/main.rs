//! swaystatus - status line generator for swaybar and i3bar
//!
//! # Usage
//!
//! ```bash
//! # In the sway config
//! bar {
//!     status_command swaystatus
//! }
//!
//! # Seconds on the clock
//! CLOCK_PRECISION=seconds swaystatus
//!
//! # Verbose logging (stderr)
//! RUST_LOG=debug swaystatus
//! ```
//!
//! # Signals
//!
//! - `SIGTERM` / `SIGINT`: Graceful shutdown; a second one exits immediately
//! - `SIGUSR1`: Re-render every widget now

use std::fs::File;
use std::io;
use std::os::fd::AsFd;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use swaystatus::sys::signal;
use swaystatus::{Config, Engine, Refresh, Result, Termination};

/// Initialize logging to stderr; stdout carries the bar protocol.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("swaystatus={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .with_target(false)
        .init();
}

fn run(config: &Config) -> Result<()> {
    let termination = Termination::new();
    let refresh = Refresh::new();
    signal::register(&termination, &refresh)?;

    let (widgets, pacer) = config.build_widgets()?;

    // Unbuffered handle on fd 0 so poll sees exactly what read will return
    let stdin = io::stdin()
        .as_fd()
        .try_clone_to_owned()
        .map(File::from)
        .map_err(swaystatus::Error::ClickInput)?;

    let engine = Engine::new(widgets, pacer, termination, refresh, config.engine_config());
    engine.run(stdin, &mut io::stdout().lock())
}

fn main() -> ExitCode {
    let config = Config::parse();
    init_logging(&config.log_level);
    info!(widgets = ?config.widgets, "starting swaystatus");

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "swaystatus stopped");
            ExitCode::from(e.exit_code())
        }
    }
}
