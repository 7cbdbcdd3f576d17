//! Command-line and environment configuration.
//!
//! Every option can be given as a flag or through its environment variable.
//! The clock and battery variables keep the names sway users already set in
//! their session (`CLOCK_PRECISION`, `CLOCK_REFRESH`, `MAX_CHARGE`).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::actor::{ClickConfig, EngineConfig};
use crate::error::{Error, Result};
use crate::widget::{
    Battery, BatteryConfig, Clock, ClockRefresh, FixedPacer, Network, NetworkConfig,
    Notifications, NotificationsConfig, Pacer, Precision, Widget, WidgetTable,
};

/// Widgets that can be placed on the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WidgetKind {
    /// Notification state bell.
    Notifications,
    /// Connectivity.
    Network,
    /// Battery gauge.
    Battery,
    /// Date and time.
    Clock,
}

/// swaystatus - status line generator for swaybar and i3bar
#[derive(Parser, Debug, Clone)]
#[command(name = "swaystatus")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Widgets from left to right
    #[arg(
        long,
        env = "SWAYSTATUS_WIDGETS",
        value_enum,
        value_delimiter = ',',
        default_values_t = [WidgetKind::Notifications, WidgetKind::Network, WidgetKind::Battery, WidgetKind::Clock]
    )]
    pub widgets: Vec<WidgetKind>,

    /// Clock display precision
    #[arg(long, env = "CLOCK_PRECISION", value_enum, default_value_t = Precision::Minutes)]
    pub clock_precision: Precision,

    /// Boundary the status line wakes up on
    #[arg(long, env = "CLOCK_REFRESH", value_enum, default_value_t = ClockRefresh::Seconds)]
    pub clock_refresh: ClockRefresh,

    /// Battery charge regarded as full, in percent
    #[arg(long, env = "MAX_CHARGE", default_value_t = 100)]
    pub max_charge: i64,

    /// Battery capacity attribute
    #[arg(long, value_name = "PATH", default_value = "/sys/class/power_supply/BAT0/capacity")]
    pub battery_capacity_path: PathBuf,

    /// AC adapter online attribute
    #[arg(long, value_name = "PATH", default_value = "/sys/class/power_supply/AC/online")]
    pub ac_online_path: PathBuf,

    /// Battery update interval, seconds
    #[arg(long, default_value_t = 5)]
    pub battery_interval: u64,

    /// Network update interval, seconds
    #[arg(long, default_value_t = 5)]
    pub network_interval: u64,

    /// Notifications update interval, seconds
    #[arg(long, default_value_t = 2)]
    pub notifications_interval: u64,

    /// Program launched when the battery is clicked
    #[arg(long, default_value = "display-battery-stats")]
    pub battery_action: String,

    /// Program launched when the network is clicked
    #[arg(long, default_value = "manage-network")]
    pub network_action: String,

    /// Program launched when the bell is clicked
    #[arg(long, default_value = "notification-center")]
    pub notifications_action: String,

    /// Program whose exit status tells whether notifications are on
    #[arg(long, default_value = "notifications-enabled")]
    pub notifications_probe: String,

    /// Longest wait for click input before checking for shutdown, ms
    #[arg(long, default_value_t = 5000)]
    pub click_poll_timeout_ms: u16,

    /// Click read buffer size, bytes
    #[arg(long, default_value_t = 512)]
    pub click_buffer_size: usize,

    /// Per-widget render capacity, bytes
    #[arg(long, default_value_t = 128)]
    pub slot_capacity: usize,

    /// Render pass duration that triggers a warning, ms
    #[arg(long, default_value_t = 10)]
    pub render_budget_ms: u64,

    /// Log level when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(short = 'l', long, env = "SWAYSTATUS_LOG", default_value = "warn")]
    pub log_level: String,
}

impl Config {
    /// Engine tunables.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            slot_capacity: self.slot_capacity,
            render_budget: Duration::from_millis(self.render_budget_ms),
            click: ClickConfig {
                poll_timeout_ms: self.click_poll_timeout_ms,
                buffer_size: self.click_buffer_size,
            },
            ..EngineConfig::default()
        }
    }

    /// Build the widget table and the pacer for the render loop.
    ///
    /// The first clock in the table paces the loop; without one the loop
    /// wakes every second.
    pub fn build_widgets(&self) -> Result<(WidgetTable, Arc<dyn Pacer>)> {
        if self.widgets.is_empty() {
            return Err(Error::Config("no widgets configured".to_string()));
        }
        if self.click_buffer_size == 0 {
            return Err(Error::Config("click buffer size must be positive".to_string()));
        }

        let mut pacer: Option<Arc<dyn Pacer>> = None;
        let mut widgets: Vec<Arc<dyn Widget>> = Vec::with_capacity(self.widgets.len());

        for kind in &self.widgets {
            let widget: Arc<dyn Widget> = match kind {
                WidgetKind::Clock => {
                    let clock = Arc::new(Clock::new(self.clock_precision, self.clock_refresh));
                    if pacer.is_none() {
                        pacer = Some(clock.clone() as Arc<dyn Pacer>);
                    }
                    clock
                }
                WidgetKind::Battery => Arc::new(Battery::new(BatteryConfig {
                    capacity_path: self.battery_capacity_path.clone(),
                    ac_online_path: self.ac_online_path.clone(),
                    max_charge: self.max_charge,
                    interval: self.battery_interval,
                    action: self.battery_action.clone(),
                })),
                WidgetKind::Network => Arc::new(Network::new(NetworkConfig {
                    interval: self.network_interval,
                    action: self.network_action.clone(),
                    ..NetworkConfig::default()
                })),
                WidgetKind::Notifications => Arc::new(Notifications::new(NotificationsConfig {
                    probe: self.notifications_probe.clone(),
                    interval: self.notifications_interval,
                    action: self.notifications_action.clone(),
                })),
            };
            widgets.push(widget);
        }

        let pacer =
            pacer.unwrap_or_else(|| Arc::new(FixedPacer(Duration::from_secs(1))) as Arc<dyn Pacer>);
        Ok((WidgetTable::new(widgets), pacer))
    }
}
