//! Clock widget and the render loop's pacer.
//!
//! The clock is rendered on every pass. It also decides when the next pass
//! happens: the main loop sleeps until just past the next whole second (or
//! minute), so the displayed time flips right at the boundary.

use std::fmt;
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Local, TimeZone, Timelike};
use clap::ValueEnum;

use super::traits::{Pacer, Widget};
use crate::buffer::TextSlot;

const FORMAT_MINUTES: &str = "%Y-%m-%d %H:%M";
const NANOS_PER_SEC: u32 = 1_000_000_000;

/// How much of the time is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, ValueEnum)]
pub enum Precision {
    /// `YYYY-MM-DD HH:MM`
    #[default]
    Minutes,
    /// Adds `:SS`.
    Seconds,
    /// Adds `:SS.mmm`.
    Milliseconds,
}

/// Which boundary the render loop wakes up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ClockRefresh {
    /// Every whole second.
    #[default]
    Seconds,
    /// Every whole minute.
    Minutes,
}

/// Local date and time.
#[derive(Debug, Clone, Copy, Default)]
pub struct Clock {
    precision: Precision,
    refresh: ClockRefresh,
}

impl Clock {
    /// Create a clock.
    pub const fn new(precision: Precision, refresh: ClockRefresh) -> Self {
        Self { precision, refresh }
    }

    /// Display precision.
    pub const fn precision(&self) -> Precision {
        self.precision
    }

    /// Format `time` at the configured precision.
    pub fn format<Tz, W>(&self, time: &DateTime<Tz>, out: &mut W) -> fmt::Result
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
        W: fmt::Write,
    {
        write!(out, "{}", time.format(FORMAT_MINUTES))?;
        if self.precision >= Precision::Seconds {
            write!(out, ":{:02}", time.second())?;
        }
        if self.precision >= Precision::Milliseconds {
            // Leap seconds report nanoseconds past 1e9
            let millis = (time.nanosecond() % NANOS_PER_SEC) / 1_000_000;
            write!(out, ".{millis:03}")?;
        }
        Ok(())
    }
}

/// Time from `time` until the next boundary selected by `refresh`.
///
/// The delay lands just after the boundary, never before it.
pub fn until_boundary<Tz: TimeZone>(time: &DateTime<Tz>, refresh: ClockRefresh) -> Duration {
    let nanos = time.nanosecond() % NANOS_PER_SEC;
    let to_second = Duration::from_nanos(u64::from(NANOS_PER_SEC - nanos));

    match refresh {
        ClockRefresh::Seconds => to_second,
        ClockRefresh::Minutes => {
            to_second + Duration::from_secs(u64::from(59 - time.second().min(59)))
        }
    }
}

impl Widget for Clock {
    fn name(&self) -> &'static str {
        "clock"
    }

    fn display(&self, now: SystemTime, out: &mut TextSlot) -> fmt::Result {
        self.format(&DateTime::<Local>::from(now), out)
    }
}

impl Pacer for Clock {
    fn until_next_tick(&self, now: SystemTime) -> Duration {
        until_boundary(&DateTime::<Local>::from(now), self.refresh)
    }
}
