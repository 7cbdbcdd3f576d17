//! # swaystatus
//!
//! A phase-locked status line generator for the swaybar/i3bar protocol.
//!
//! swaystatus renders a fixed set of widgets into one JSON line per update
//! and dispatches click events read from standard input to the widget that
//! was clicked.
//!
//! ## Core Concepts
//!
//! - **Per-widget intervals**: Each widget is rendered only when its own
//!   interval has elapsed
//! - **Double-buffered diffing**: A line is written only when some widget's
//!   text actually changed, and it always carries every widget
//! - **Phase-locked wake-ups**: The loop sleeps until the next clock boundary
//!   instead of free-running
//! - **Isolated click thread**: Clicks are decoded and dispatched on their
//!   own thread, sharing only the read-only widget table and a termination
//!   flag with the render loop
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use swaystatus::{Engine, EngineConfig, Refresh, Termination, WidgetTable};
//! use swaystatus::widget::{Clock, ClockRefresh, Precision, Widget};
//!
//! let clock = Arc::new(Clock::new(Precision::Seconds, ClockRefresh::Seconds));
//! let widgets = WidgetTable::new(vec![clock.clone() as Arc<dyn Widget>]);
//! let engine = Engine::new(widgets, clock, Termination::new(), Refresh::new(), EngineConfig::default());
//! engine.run(stdin, &mut std::io::stdout())?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod buffer;
pub mod config;
pub mod error;
pub mod protocol;
pub mod sys;
pub mod widget;

// Re-exports for convenience
pub use actor::{ClickActor, ClickConfig, ClickEvent, ClickOutcome, Engine, EngineConfig, Scheduler};
pub use buffer::{Frame, TextSlot};
pub use config::{Config, WidgetKind};
pub use error::{Error, Result};
pub use sys::{Refresh, Termination};
pub use widget::{Pacer, Widget, WidgetTable};
