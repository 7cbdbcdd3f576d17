//! Message types exchanged between the loops.
//!
//! These types describe click events as decoded from the bar, what became
//! of them, and what the click thread reports back to the main loop.

use std::fmt;
use std::time::Duration;

/// State of the `name` field of a click event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameField {
    /// No usable `name` was seen.
    #[default]
    Absent,
    /// A `name` was seen but is not a base-10 index.
    Malformed,
    /// Widget index.
    Index(usize),
}

/// One decoded click event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClickEvent {
    /// Target widget.
    pub name: NameField,
    /// Button ordinal (`1` is the primary button), if seen.
    pub button: Option<u8>,
    /// Whether the record contained any parameter at all.
    pub saw_param: bool,
}

impl ClickEvent {
    /// Whether decoding can stop: either the event is dispatchable or the
    /// button already rules it out.
    pub fn is_resolved(&self) -> bool {
        match self.button {
            Some(1) => self.name != NameField::Absent,
            Some(_) => true,
            None => false,
        }
    }

    /// Widget to dispatch to, given a table of `widget_count` widgets.
    pub fn target(&self, widget_count: usize) -> Result<usize, DropReason> {
        if !self.saw_param {
            return Err(DropReason::Empty);
        }
        match self.button {
            Some(1) => {}
            Some(button) => return Err(DropReason::NotPrimaryButton(button)),
            None => return Err(DropReason::MissingButton),
        }
        match self.name {
            NameField::Index(index) if index < widget_count => Ok(index),
            NameField::Index(index) => Err(DropReason::OutOfRange(index)),
            NameField::Malformed => Err(DropReason::MalformedName),
            NameField::Absent => Err(DropReason::MissingName),
        }
    }
}

/// Why a click event was not dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The record carried no parameters (e.g. the opening `[`).
    Empty,
    /// A button other than the primary one was pressed.
    NotPrimaryButton(u8),
    /// No usable `button` value.
    MissingButton,
    /// No usable `name` value.
    MissingName,
    /// `name` is not a widget index.
    MalformedName,
    /// `name` is past the end of the widget table.
    OutOfRange(usize),
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("no parameters"),
            Self::NotPrimaryButton(b) => write!(f, "button {b} is not the primary button"),
            Self::MissingButton => f.write_str("missing button"),
            Self::MissingName => f.write_str("missing name"),
            Self::MalformedName => f.write_str("name is not a widget index"),
            Self::OutOfRange(i) => write!(f, "no widget {i}"),
        }
    }
}

/// What happened to one click record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The widget's click hook ran.
    Dispatched(usize),
    /// The record was ignored.
    Dropped(DropReason),
}

/// Status reports from the click thread to the main loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActorStatus {
    /// The thread stopped normally (cancelled or input closed).
    Stopped,
    /// The thread stopped on an I/O failure.
    Failed(String),
}

/// Summary of one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PassReport {
    /// Widgets whose `display` ran.
    pub updated: usize,
    /// Whether a line was written.
    pub emitted: bool,
    /// Wall time spent in the pass.
    pub elapsed: Duration,
}
