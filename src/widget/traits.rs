//! Widget trait and the pacing hook used by the render loop.
//!
//! This module defines the core `Widget` trait that every status segment
//! implements. All hooks have no-op defaults, so a widget only overrides the
//! capabilities it actually has.

use std::fmt;
use std::time::{Duration, SystemTime};

use crate::buffer::TextSlot;
use crate::error::Result;

/// An independently scheduled segment of the status line.
///
/// Widgets are shared read-only between the render loop and the click
/// thread, hence `Send + Sync` and `&self` receivers. Widgets that keep
/// state between calls use interior mutability.
pub trait Widget: Send + Sync {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Update interval in seconds. `0` renders on every pass.
    fn interval(&self) -> u64 {
        0
    }

    /// Called once before the first render.
    fn init(&self) -> Result<()> {
        Ok(())
    }

    /// Render the current text into `out`.
    ///
    /// `now` is the wall-clock time of the render pass, shared by every
    /// widget in it. Writing past the slot capacity aborts the status line.
    /// Any other error is logged and the partial text is kept.
    fn display(&self, _now: SystemTime, _out: &mut TextSlot) -> fmt::Result {
        Ok(())
    }

    /// Called from the click thread on a primary-button click.
    fn on_click(&self) {}

    /// Called once at shutdown.
    fn destroy(&self) {}
}

/// Source of the render loop's wake-up cadence.
///
/// Implemented by the clock so that passes land right after a wall-clock
/// boundary instead of drifting.
pub trait Pacer: Send + Sync {
    /// Time left from `now` until the next boundary.
    fn until_next_tick(&self, now: SystemTime) -> Duration;
}

/// Fixed-period pacer, for tables without a clock.
#[derive(Debug, Clone, Copy)]
pub struct FixedPacer(pub Duration);

impl Pacer for FixedPacer {
    fn until_next_tick(&self, _now: SystemTime) -> Duration {
        self.0
    }
}
