//! Widget table: the ordered, immutable set of widgets.
//!
//! A widget's position in the table is its identity on the wire. The table
//! is built once at startup and then shared behind an `Arc` by the render
//! loop and the click thread; nothing mutates it afterwards.

use std::sync::Arc;

use tracing::debug;

use super::traits::Widget;
use crate::error::Result;

/// Ordered widget descriptors.
#[derive(Clone, Default)]
pub struct WidgetTable {
    widgets: Vec<Arc<dyn Widget>>,
}

impl WidgetTable {
    /// Create a table from widgets in display order.
    pub fn new(widgets: Vec<Arc<dyn Widget>>) -> Self {
        Self { widgets }
    }

    /// Number of widgets.
    #[inline]
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    /// Check if the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Widget at `index`, if in bounds.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&dyn Widget> {
        self.widgets.get(index).map(Arc::as_ref)
    }

    /// Iterate widgets in table order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Widget> {
        self.widgets.iter().map(Arc::as_ref)
    }

    /// Run every widget's `init` hook, in order.
    pub fn init_all(&self) -> Result<()> {
        for (index, widget) in self.iter().enumerate() {
            debug!(widget = index, name = widget.name(), "init");
            widget.init()?;
        }
        Ok(())
    }

    /// Run every widget's `destroy` hook, in order.
    pub fn destroy_all(&self) {
        for (index, widget) in self.iter().enumerate() {
            debug!(widget = index, name = widget.name(), "destroy");
            widget.destroy();
        }
    }

    /// Deliver a click to the widget at `index`.
    ///
    /// Returns `false` when the index is out of bounds.
    pub fn click(&self, index: usize) -> bool {
        match self.get(index) {
            Some(widget) => {
                widget.on_click();
                true
            }
            None => false,
        }
    }
}

impl FromIterator<Arc<dyn Widget>> for WidgetTable {
    fn from_iter<T: IntoIterator<Item = Arc<dyn Widget>>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl std::fmt::Debug for WidgetTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.widgets.iter().map(|w| w.name()))
            .finish()
    }
}
