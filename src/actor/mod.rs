//! Actor Model: The two loops of the status line.
//!
//! - **Click Actor**: Waits on stdin with a timeout, decodes click events and
//!   calls the clicked widget's hook
//! - **Main Loop**: Renders due widgets, emits a line when something changed,
//!   sleeps until the next clock boundary
//!
//! # Architecture
//!
//! ```text
//!  stdin                                               stdout
//!    │                                                   ▲
//!    ▼                                                   │
//! ┌──────────────┐   on_click   ┌─────────────┐  display ┌───────────┐
//! │ Click Thread │ ───────────▶ │ WidgetTable │ ◀─────── │ Main Loop │
//! └──────────────┘              └─────────────┘          └───────────┘
//!        ▲                                                   │  ▲
//!        │                Termination flag                   │  │
//!        └───────────────────────────────────────────────────┘  │
//!        │                 ActorStatus                          │
//!        └──────────────────────────────────────────────────────┘
//! ```
//!
//! The widget table is read-only once built. Render state never leaves the
//! main thread.

mod clicks;
mod engine;
mod messages;
mod scheduler;

pub use clicks::{handle_chunk, handle_record, ClickActor, ClickConfig, RecordSplitter};
pub use engine::{Engine, EngineConfig};
pub use messages::{ActorStatus, ClickEvent, ClickOutcome, DropReason, NameField, PassReport};
pub use scheduler::{check_budget, BudgetCheck, RenderStats, Scheduler};
