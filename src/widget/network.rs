//! Network widget.
//!
//! Reports whether any non-loopback interface holds an IP address, and
//! whether one of those interfaces is wireless.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use bitflags::bitflags;
use nix::ifaddrs::getifaddrs;
use nix::net::if_::InterfaceFlags;
use tracing::warn;

use super::traits::Widget;
use crate::buffer::TextSlot;
use crate::sys::sway_exec;

const ICON_LAPTOP: char = '\u{1f4bb}';
const ICON_GLOBE: char = '\u{1f310}';
const ICON_QUESTION: char = '\u{2753}';

bitflags! {
    /// Kinds of connected interfaces.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Links: u8 {
        /// An addressed interface without a `wireless` directory.
        const WIRED = 0b0000_0001;
        /// An addressed wireless interface.
        const WIRELESS = 0b0000_0010;
    }
}

/// Network widget settings.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Where interface directories live.
    pub sysfs_root: PathBuf,
    /// Update interval in seconds.
    pub interval: u64,
    /// Program launched on click.
    pub action: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            sysfs_root: PathBuf::from("/sys/class/net"),
            interval: 5,
            action: "manage-network".to_string(),
        }
    }
}

/// Connectivity summary.
#[derive(Debug, Clone, Default)]
pub struct Network {
    config: NetworkConfig,
}

impl Network {
    /// Create the widget.
    pub const fn new(config: NetworkConfig) -> Self {
        Self { config }
    }

    /// Scan the system's interface addresses.
    pub fn scan(&self) -> nix::Result<Links> {
        let addrs = getifaddrs()?.filter_map(|ifa| {
            let has_ip = ifa
                .address
                .as_ref()
                .is_some_and(|a| a.as_sockaddr_in().is_some() || a.as_sockaddr_in6().is_some());
            has_ip.then_some((ifa.interface_name, ifa.flags))
        });
        Ok(classify(addrs, |name| is_wireless(&self.config.sysfs_root, name)))
    }
}

/// Whether `name` has a `wireless` directory under `root`.
pub fn is_wireless(root: &Path, name: &str) -> bool {
    root.join(name).join("wireless").exists()
}

/// Fold addressed interfaces into [`Links`].
///
/// Loopback and NOARP interfaces are ignored.
pub fn classify<I, F>(addressed: I, wireless: F) -> Links
where
    I: IntoIterator<Item = (String, InterfaceFlags)>,
    F: Fn(&str) -> bool,
{
    let skip = InterfaceFlags::IFF_LOOPBACK | InterfaceFlags::IFF_NOARP;
    let mut links = Links::empty();

    for (name, flags) in addressed {
        if flags.intersects(skip) {
            continue;
        }
        if wireless(&name) {
            links |= Links::WIRELESS;
            break;
        }
        links |= Links::WIRED;
    }
    links
}

/// Write the icon pair for `links`.
pub fn render<W: fmt::Write>(links: Links, out: &mut W) -> fmt::Result {
    if links.contains(Links::WIRELESS) {
        write!(out, "{ICON_LAPTOP}   {ICON_GLOBE}")
    } else if links.contains(Links::WIRED) {
        write!(out, "{ICON_LAPTOP} - {ICON_GLOBE}")
    } else {
        write!(out, "{ICON_LAPTOP} x {ICON_QUESTION}")
    }
}

impl Widget for Network {
    fn name(&self) -> &'static str {
        "network"
    }

    fn interval(&self) -> u64 {
        self.config.interval
    }

    fn display(&self, _now: SystemTime, out: &mut TextSlot) -> fmt::Result {
        let links = self.scan().unwrap_or_else(|e| {
            warn!(error = %e, "could not list interface addresses");
            Links::empty()
        });
        render(links, out)
    }

    fn on_click(&self) {
        sway_exec(&self.config.action, &[]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn up() -> InterfaceFlags {
        InterfaceFlags::IFF_UP | InterfaceFlags::IFF_RUNNING
    }

    fn rendered(links: Links) -> String {
        let mut s = String::new();
        render(links, &mut s).unwrap();
        s
    }

    #[test]
    fn test_classify_ignores_loopback_and_noarp() {
        let links = classify(
            vec![
                ("lo".to_string(), up() | InterfaceFlags::IFF_LOOPBACK),
                ("wg0".to_string(), up() | InterfaceFlags::IFF_NOARP),
            ],
            |_| true,
        );
        assert_eq!(links, Links::empty());
    }

    #[test]
    fn test_classify_wired_and_wireless() {
        let wired = classify(vec![("eth0".to_string(), up())], |_| false);
        assert_eq!(wired, Links::WIRED);

        let both = classify(
            vec![("eth0".to_string(), up()), ("wlan0".to_string(), up())],
            |name| name.starts_with('w'),
        );
        assert!(both.contains(Links::WIRELESS));
    }

    #[test]
    fn test_render_states() {
        assert_eq!(rendered(Links::WIRELESS), "\u{1f4bb}   \u{1f310}");
        assert_eq!(rendered(Links::WIRED), "\u{1f4bb} - \u{1f310}");
        assert_eq!(rendered(Links::empty()), "\u{1f4bb} x \u{2753}");
    }

    #[test]
    fn test_is_wireless_checks_sysfs() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("wlan0/wireless")).unwrap();
        fs::create_dir_all(root.path().join("eth0")).unwrap();

        assert!(is_wireless(root.path(), "wlan0"));
        assert!(!is_wireless(root.path(), "eth0"));
        assert!(!is_wireless(root.path(), "missing"));
    }

    #[test]
    fn test_display_always_renders() {
        let mut slot = TextSlot::with_capacity(64);
        Network::default().display(SystemTime::now(), &mut slot).unwrap();
        assert!(slot.as_str().starts_with(ICON_LAPTOP));
    }
}
