//! Battery widget.
//!
//! Shows a state icon followed by a three-square charge gauge. While the AC
//! adapter is online the square at the current charge level blinks between
//! empty and full on every update.

use std::fmt::{self, Write as _};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::SystemTime;

use tracing::debug;

use super::traits::Widget;
use crate::buffer::TextSlot;
use crate::error::Result;
use crate::sys::{sway_exec, SysfsParam};

/// Battery above the low threshold.
pub const ICON_HIGH: char = '\u{1f50b}';
/// Battery below the low threshold.
pub const ICON_LOW: char = '\u{1faab}';
/// AC adapter online.
pub const ICON_CHARGING: char = '\u{26a1}';
/// Empty gauge square.
pub const SQUARE_EMPTY: char = '\u{25ab}';
/// Full gauge square.
pub const SQUARE_FULL: char = '\u{25a0}';

const CRITICAL: i64 = 10;
const LOW: i64 = 33;
const HIGH: i64 = 66;

/// Battery widget settings.
#[derive(Debug, Clone)]
pub struct BatteryConfig {
    /// Capacity attribute, in percent.
    pub capacity_path: PathBuf,
    /// AC adapter `online` attribute.
    pub ac_online_path: PathBuf,
    /// Charge regarded as full, in percent.
    pub max_charge: i64,
    /// Update interval in seconds.
    pub interval: u64,
    /// Program launched on click.
    pub action: String,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            capacity_path: PathBuf::from("/sys/class/power_supply/BAT0/capacity"),
            ac_online_path: PathBuf::from("/sys/class/power_supply/AC/online"),
            max_charge: 100,
            interval: 5,
            action: "display-battery-stats".to_string(),
        }
    }
}

#[derive(Debug)]
struct Sources {
    capacity: SysfsParam,
    ac_online: SysfsParam,
}

/// Battery state from sysfs.
#[derive(Debug)]
pub struct Battery {
    config: BatteryConfig,
    /// Opened by `init`, closed by `destroy`.
    sources: Mutex<Option<Sources>>,
    /// Blinking square is full on the next charging update.
    blink: AtomicBool,
}

impl Battery {
    /// Create the widget; attributes are opened in `init`.
    pub fn new(config: BatteryConfig) -> Self {
        Self {
            config,
            sources: Mutex::new(None),
            blink: AtomicBool::new(false),
        }
    }
}

/// Icon and gauge for a capacity reading.
///
/// `blink_full` selects the phase of the blinking square while charging.
pub fn glyphs(charging: bool, capacity: i64, max_charge: i64, blink_full: bool) -> [char; 4] {
    let blink = if blink_full { SQUARE_FULL } else { SQUARE_EMPTY };
    let (e, f) = (SQUARE_EMPTY, SQUARE_FULL);

    if charging {
        let c = ICON_CHARGING;
        if capacity < LOW {
            [c, blink, e, e]
        } else if capacity < HIGH {
            [c, f, blink, e]
        } else if capacity < max_charge - 5 {
            [c, f, f, blink]
        } else {
            [c, f, f, f]
        }
    } else if capacity < CRITICAL {
        [ICON_LOW, e, e, e]
    } else if capacity < LOW {
        [ICON_LOW, f, e, e]
    } else if capacity < HIGH {
        [ICON_HIGH, f, f, e]
    } else {
        [ICON_HIGH, f, f, f]
    }
}

impl Widget for Battery {
    fn name(&self) -> &'static str {
        "battery"
    }

    fn interval(&self) -> u64 {
        self.config.interval
    }

    fn init(&self) -> Result<()> {
        let sources = Sources {
            capacity: SysfsParam::open(&self.config.capacity_path)?,
            ac_online: SysfsParam::open(&self.config.ac_online_path)?,
        };
        *self.sources.lock().unwrap_or_else(PoisonError::into_inner) = Some(sources);
        Ok(())
    }

    fn display(&self, _now: SystemTime, out: &mut TextSlot) -> fmt::Result {
        let guard = self.sources.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(sources) = guard.as_ref() else {
            return Ok(());
        };

        let charging = sources.ac_online.read_char() == '1';
        let capacity = sources.capacity.read_int();
        // Only advances while charging
        let blink_full = charging && self.blink.fetch_xor(true, Ordering::Relaxed);

        debug!(capacity, charging, "battery");
        for c in glyphs(charging, capacity, self.config.max_charge, blink_full) {
            out.write_char(c)?;
        }
        Ok(())
    }

    fn on_click(&self) {
        sway_exec(&self.config.action, &[]);
    }

    fn destroy(&self) {
        self.sources
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}
