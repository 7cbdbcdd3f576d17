//! Widgets: the segments of the status line.
//!
//! Each widget renders a short piece of text on its own interval and may
//! react to a primary-button click. The [`WidgetTable`] fixes their order,
//! which is also how click events address them.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use swaystatus::widget::{Clock, ClockRefresh, Precision, Widget, WidgetTable};
//!
//! let clock = Arc::new(Clock::new(Precision::Seconds, ClockRefresh::Seconds));
//! let table = WidgetTable::new(vec![clock as Arc<dyn Widget>]);
//! ```

mod battery;
mod clock;
mod network;
mod notifications;
mod table;
mod traits;

pub use battery::{glyphs, Battery, BatteryConfig};
pub use clock::{until_boundary, Clock, ClockRefresh, Precision};
pub use network::{classify, Links, Network, NetworkConfig};
pub use notifications::{Notifications, NotificationsConfig};
pub use table::WidgetTable;
pub use traits::{FixedPacer, Pacer, Widget};
