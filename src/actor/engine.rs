//! Engine: Main coordinator that ties the loops together.
//!
//! The Engine owns the process lifecycle. It initializes the widgets, writes
//! the protocol header, spawns the click actor and then runs the render loop
//! on the calling thread until termination is requested or something fatal
//! happens.

use std::io::{Read, Write};
use std::os::fd::AsFd;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant, SystemTime};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};
use tracing::{debug, error, info};

use super::clicks::{ClickActor, ClickConfig};
use super::messages::ActorStatus;
use super::scheduler::Scheduler;
use crate::error::{Error, Result};
use crate::protocol::OutputBuffer;
use crate::sys::{Refresh, Termination};
use crate::widget::{Pacer, WidgetTable};

/// Configuration for the Engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Per-widget render capacity in bytes.
    pub slot_capacity: usize,
    /// Render pass duration that triggers a warning.
    pub render_budget: Duration,
    /// Longest uninterrupted sleep between termination checks.
    pub max_sleep: Duration,
    /// Click thread settings.
    pub click: ClickConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            slot_capacity: 128,
            render_budget: Duration::from_millis(10),
            max_sleep: Duration::from_millis(250),
            click: ClickConfig::default(),
        }
    }
}

/// The status line engine.
pub struct Engine {
    /// Configuration.
    config: EngineConfig,
    /// Shared with the click thread.
    widgets: Arc<WidgetTable>,
    /// Wake-up cadence.
    pacer: Arc<dyn Pacer>,
    /// Set by SIGINT/SIGTERM.
    termination: Termination,
    /// Set by SIGUSR1.
    refresh: Refresh,
    /// Render state.
    scheduler: Scheduler,
}

impl Engine {
    /// Create an engine over `widgets`.
    pub fn new(
        widgets: WidgetTable,
        pacer: Arc<dyn Pacer>,
        termination: Termination,
        refresh: Refresh,
        config: EngineConfig,
    ) -> Self {
        let scheduler = Scheduler::new(widgets.len(), config.slot_capacity, config.render_budget);
        Self {
            config,
            widgets: Arc::new(widgets),
            pacer,
            termination,
            refresh,
            scheduler,
        }
    }

    /// The termination flag observed by both loops.
    pub const fn termination(&self) -> &Termination {
        &self.termination
    }

    /// The refresh flag.
    pub const fn refresh(&self) -> &Refresh {
        &self.refresh
    }

    /// Run until termination is requested.
    ///
    /// Reads click events from `input` on a dedicated thread and writes the
    /// bar protocol to `out`. On graceful shutdown the click thread is joined
    /// and every widget's `destroy` hook runs. Fatal errors return
    /// immediately without waiting for the click thread.
    pub fn run<R, W>(mut self, input: R, out: &mut W) -> Result<()>
    where
        R: Read + AsFd + Send + 'static,
        W: Write,
    {
        self.widgets.init_all()?;

        let mut header = OutputBuffer::with_capacity(64);
        header.write_header()?;
        header.flush_to(out).map_err(Error::Output)?;

        let (status_tx, status_rx) = bounded(1);
        let actor = ClickActor::spawn(
            input,
            self.widgets.clone(),
            self.termination.clone(),
            &self.config.click,
            status_tx,
        )?;
        info!(widgets = ?self.widgets, "status line running");

        match self.main_loop(status_rx, out) {
            Ok(()) => {
                info!(signal = ?self.termination.signal(), "shutting down");
                actor.join()?;
                self.widgets.destroy_all();
                Ok(())
            }
            Err(Error::ClickThread(reason)) => {
                // The thread has already exited; its own error is the better one
                error!(%reason, "click thread failed");
                Err(actor
                    .join()
                    .err()
                    .unwrap_or(Error::ClickThread(reason)))
            }
            Err(e) => {
                error!(error = %e, "fatal error");
                actor.shutdown();
                Err(e)
            }
        }
    }

    /// Render loop.
    fn main_loop<W: Write>(&mut self, status_rx: Receiver<ActorStatus>, out: &mut W) -> Result<()> {
        let mut status = Some(status_rx);

        while !self.termination.is_requested() {
            let force = self.refresh.take();
            if force {
                debug!("refresh requested");
            }
            // One clock reading per iteration, shared by rendering and pacing
            let now = SystemTime::now();
            let started = Instant::now();
            self.scheduler.pass(&self.widgets, now, force, out)?;

            self.wait(started + self.pacer.until_next_tick(now), &mut status)?;
        }
        Ok(())
    }

    /// Sleep until `deadline`, waking early on termination, refresh or a
    /// click thread failure.
    fn wait(&self, deadline: Instant, status: &mut Option<Receiver<ActorStatus>>) -> Result<()> {

        loop {
            if self.termination.is_requested() || self.refresh.is_pending() {
                return Ok(());
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }
            let slice = (deadline - now).min(self.config.max_sleep);

            match status {
                Some(rx) => match rx.recv_timeout(slice) {
                    Ok(ActorStatus::Failed(reason)) => return Err(Error::ClickThread(reason)),
                    Ok(ActorStatus::Stopped) | Err(RecvTimeoutError::Disconnected) => {
                        // Input closed; keep rendering without clicks
                        *status = None;
                    }
                    Err(RecvTimeoutError::Timeout) => {}
                },
                None => thread::sleep(slice),
            }
        }
    }
}
