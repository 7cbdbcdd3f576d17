//! Notifications widget.
//!
//! Whether notifications are enabled is answered by an external probe
//! program: exit status 0 means enabled.

use std::fmt::{self, Write as _};
use std::time::SystemTime;

use super::traits::Widget;
use crate::buffer::TextSlot;
use crate::sys::exec::exit_ok;
use crate::sys::sway_exec;

const ICON_ENABLED: char = '\u{1f514}';
const ICON_DISABLED: char = '\u{1f515}';

/// Notifications widget settings.
#[derive(Debug, Clone)]
pub struct NotificationsConfig {
    /// Program whose exit status reports the state.
    pub probe: String,
    /// Update interval in seconds.
    pub interval: u64,
    /// Program launched on click.
    pub action: String,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            probe: "notifications-enabled".to_string(),
            interval: 2,
            action: "notification-center".to_string(),
        }
    }
}

/// Bell icon, struck through when notifications are off.
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    config: NotificationsConfig,
}

impl Notifications {
    /// Create the widget.
    pub const fn new(config: NotificationsConfig) -> Self {
        Self { config }
    }
}

impl Widget for Notifications {
    fn name(&self) -> &'static str {
        "notifications"
    }

    fn interval(&self) -> u64 {
        self.config.interval
    }

    fn display(&self, _now: SystemTime, out: &mut TextSlot) -> fmt::Result {
        let icon = if exit_ok(&self.config.probe) {
            ICON_ENABLED
        } else {
            ICON_DISABLED
        };
        out.write_char(icon)
    }

    fn on_click(&self) {
        sway_exec(&self.config.action, &[]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probed(probe: &str) -> String {
        let widget = Notifications::new(NotificationsConfig {
            probe: probe.to_string(),
            ..NotificationsConfig::default()
        });
        let mut slot = TextSlot::with_capacity(16);
        widget.display(SystemTime::now(), &mut slot).unwrap();
        slot.as_str().to_string()
    }

    #[test]
    fn test_probe_exit_status_selects_icon() {
        assert_eq!(probed("true"), "\u{1f514}");
        assert_eq!(probed("false"), "\u{1f515}");
        assert_eq!(probed("/nonexistent/probe"), "\u{1f515}");
    }
}
