//! `Frame`: Double-buffered widget text with per-widget update times.
//!
//! Every widget owns a [`SlotPair`]. The front slot holds the text that was
//! last written to the bar, the back slot holds the text computed during the
//! current pass. Slots are swapped by value, only for widgets that were
//! rendered in the pass, and only once the pass has decided to emit.

use std::time::Duration;

use super::TextSlot;

/// Front/back text slots for one widget.
#[derive(Debug, Clone)]
pub struct SlotPair {
    /// Most recently emitted text.
    front: TextSlot,
    /// Most recently computed text.
    back: TextSlot,
}

impl SlotPair {
    fn new(capacity: usize) -> Self {
        Self {
            front: TextSlot::with_capacity(capacity),
            back: TextSlot::with_capacity(capacity),
        }
    }

    /// Whether the computed text differs from the emitted text.
    #[inline]
    pub fn changed(&self) -> bool {
        self.front.as_str() != self.back.as_str()
    }

    /// Promote the computed text to emitted.
    #[inline]
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.front, &mut self.back);
    }
}

/// Render state owned by the scheduler.
#[derive(Debug, Clone)]
pub struct Frame {
    pairs: Vec<SlotPair>,
    /// Wall-clock time since the epoch of each widget's last `display`.
    last_update: Vec<Option<Duration>>,
}

impl Frame {
    /// Create a frame for `widgets` widgets with `capacity` bytes per slot.
    pub fn new(widgets: usize, capacity: usize) -> Self {
        Self {
            pairs: (0..widgets).map(|_| SlotPair::new(capacity)).collect(),
            last_update: vec![None; widgets],
        }
    }

    /// Number of widgets tracked.
    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Check if the frame tracks no widgets.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Whether widget `index` should be rendered at `now` (since the epoch)
    /// given an interval of `interval` seconds.
    ///
    /// A widget that was never rendered is always due. If the wall clock
    /// stepped backwards past the last update the widget is due as well,
    /// otherwise it would stall until the clock caught up again.
    pub fn is_due(&self, index: usize, now: Duration, interval: u64) -> bool {
        match self.last_update[index] {
            None => true,
            Some(last) if now < last => true,
            Some(last) => now - last >= Duration::from_secs(interval),
        }
    }

    /// Clear and return the back slot of widget `index`.
    pub fn back_mut(&mut self, index: usize) -> &mut TextSlot {
        let back = &mut self.pairs[index].back;
        back.clear();
        back
    }

    /// Record that widget `index` was rendered at `now`.
    #[inline]
    pub fn mark_updated(&mut self, index: usize, now: Duration) {
        self.last_update[index] = Some(now);
    }

    /// Time of the last render of widget `index`.
    #[inline]
    pub fn last_update(&self, index: usize) -> Option<Duration> {
        self.last_update[index]
    }

    /// Whether any of the `updated` widgets produced new text.
    pub fn changed(&self, updated: &[usize]) -> bool {
        updated.iter().any(|&i| self.pairs[i].changed())
    }

    /// Swap front and back for every `updated` widget.
    pub fn swap(&mut self, updated: &[usize]) {
        for &i in updated {
            self.pairs[i].swap();
        }
    }

    /// Emitted text of widget `index`.
    #[inline]
    pub fn front(&self, index: usize) -> &str {
        self.pairs[index].front.as_str()
    }

    /// Emitted text of every widget, in table order.
    pub fn fronts(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|p| p.front.as_str())
    }
}
