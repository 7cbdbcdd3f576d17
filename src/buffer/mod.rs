//! Buffer module: Core data structures for the double-buffer render frame.
//!
//! This module contains:
//! - [`TextSlot`]: Fixed-capacity text target a widget renders into
//! - [`Frame`]: Front/back slot pairs plus per-widget update times

mod frame;
mod slot;

pub use frame::{Frame, SlotPair};
pub use slot::TextSlot;
