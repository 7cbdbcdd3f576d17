//! Scheduler: Per-widget interval scheduling and change-driven emission.
//!
//! The scheduler owns the double-buffered [`Frame`]. Each pass renders only
//! the widgets whose interval has elapsed, compares their new text with what
//! the bar currently shows, and writes a full update line only when
//! something changed.

use std::io::Write;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use tracing::{error, trace, warn};

use super::messages::PassReport;
use crate::buffer::Frame;
use crate::error::{Error, Result};
use crate::protocol::OutputBuffer;
use crate::widget::WidgetTable;

/// Render statistics for debugging/profiling.
#[derive(Debug, Clone, Default)]
pub struct RenderStats {
    /// Passes run.
    pub passes: u64,
    /// Lines written.
    pub frames: u64,
    /// Total bytes written to the bar.
    pub bytes_written: u64,
    /// Average pass time in microseconds.
    pub avg_pass_us: u64,
    /// Last pass time in microseconds.
    pub last_pass_us: u64,
}

/// How a pass compared with the render budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetCheck {
    /// Within budget.
    Within,
    /// Over the millisecond budget.
    Over,
    /// Over one second.
    OverSecond,
}

/// Classify a pass duration against `budget`.
pub fn check_budget(elapsed: Duration, budget: Duration) -> BudgetCheck {
    if elapsed > Duration::from_secs(1) {
        BudgetCheck::OverSecond
    } else if elapsed > budget {
        BudgetCheck::Over
    } else {
        BudgetCheck::Within
    }
}

/// Render scheduler state, owned by the main loop.
pub struct Scheduler {
    /// Front/back text per widget.
    frame: Frame,
    /// Pre-allocated output line.
    output: OutputBuffer,
    /// Pass duration that triggers a warning.
    budget: Duration,
    /// Widgets rendered in the current pass.
    updated: Vec<usize>,
    /// Render statistics.
    stats: RenderStats,
}

impl Scheduler {
    /// Create a scheduler for `widgets` widgets of `slot_capacity` bytes each.
    pub fn new(widgets: usize, slot_capacity: usize, budget: Duration) -> Self {
        Self {
            frame: Frame::new(widgets, slot_capacity),
            output: OutputBuffer::new(),
            budget,
            updated: Vec::with_capacity(widgets),
            stats: RenderStats::default(),
        }
    }

    /// Current frame.
    pub const fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Render statistics.
    pub const fn stats(&self) -> &RenderStats {
        &self.stats
    }

    /// Run one render pass at wall-clock time `now`.
    ///
    /// With `force` every widget is rendered regardless of its interval.
    /// A line is written to `out` only if a rendered widget's text differs
    /// from what was last written; the line always carries every widget.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::RenderOverflow`] if a widget outgrows its slot and
    /// with [`Error::Output`] if `out` cannot be written.
    pub fn pass<W: Write>(
        &mut self,
        widgets: &WidgetTable,
        now: SystemTime,
        force: bool,
        out: &mut W,
    ) -> Result<PassReport> {
        let start = Instant::now();
        let since_epoch = now.duration_since(UNIX_EPOCH).unwrap_or_default();

        self.updated.clear();
        for (index, widget) in widgets.iter().enumerate() {
            if !force && !self.frame.is_due(index, since_epoch, widget.interval()) {
                continue;
            }

            let slot = self.frame.back_mut(index);
            if widget.display(now, slot).is_err() {
                if slot.overflowed() {
                    error!(widget = index, name = widget.name(), "render buffer overflow");
                    return Err(Error::RenderOverflow {
                        widget: index,
                        capacity: slot.capacity(),
                    });
                }
                warn!(widget = index, name = widget.name(), "widget failed to render");
            }
            self.frame.mark_updated(index, since_epoch);
            self.updated.push(index);
        }

        let emitted = self.frame.changed(&self.updated);
        if emitted {
            self.frame.swap(&self.updated);
            self.output.clear();
            self.output.write_frame(self.frame.fronts())?;
            self.output.flush_to(out).map_err(Error::Output)?;

            self.stats.frames += 1;
            self.stats.bytes_written += self.output.len() as u64;
        }

        let elapsed = start.elapsed();
        match check_budget(elapsed, self.budget) {
            BudgetCheck::OverSecond => {
                warn!(elapsed_s = elapsed.as_secs(), "render pass took over a second");
            }
            BudgetCheck::Over => {
                warn!(
                    elapsed_ms = elapsed.as_millis(),
                    budget_ms = self.budget.as_millis(),
                    "render pass over budget"
                );
            }
            BudgetCheck::Within => {}
        }

        self.record(elapsed);
        trace!(updated = self.updated.len(), emitted, "render pass");

        Ok(PassReport {
            updated: self.updated.len(),
            emitted,
            elapsed,
        })
    }

    fn record(&mut self, elapsed: Duration) {
        self.stats.passes += 1;
        self.stats.last_pass_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);

        // Smoothed average
        if self.stats.avg_pass_us == 0 {
            self.stats.avg_pass_us = self.stats.last_pass_us;
        } else {
            self.stats.avg_pass_us = (self.stats.avg_pass_us * 15 + self.stats.last_pass_us) / 16;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::TextSlot;
    use crate::widget::Widget;
    use std::fmt::{self, Write as _};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct Scripted {
        interval: u64,
        text: Mutex<String>,
        displays: AtomicUsize,
    }

    impl Scripted {
        fn new(interval: u64, text: &str) -> Arc<Self> {
            Arc::new(Self {
                interval,
                text: Mutex::new(text.to_string()),
                displays: AtomicUsize::new(0),
            })
        }

        fn set(&self, text: &str) {
            *self.text.lock().unwrap() = text.to_string();
        }

        fn displays(&self) -> usize {
            self.displays.load(Ordering::SeqCst)
        }
    }

    impl Widget for Scripted {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn interval(&self) -> u64 {
            self.interval
        }

        fn display(&self, _now: SystemTime, out: &mut TextSlot) -> fmt::Result {
            self.displays.fetch_add(1, Ordering::SeqCst);
            out.write_str(&self.text.lock().unwrap())
        }
    }

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(1_700_000_000 + secs)
    }

    fn at_ms(millis: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_millis(1_700_000_000_000 + millis)
    }

    fn table(widgets: &[&Arc<Scripted>]) -> WidgetTable {
        widgets
            .iter()
            .map(|&w| w.clone() as Arc<dyn Widget>)
            .collect()
    }

    fn lines(out: &[u8]) -> Vec<serde_json::Value> {
        String::from_utf8_lossy(out)
            .lines()
            .map(|l| serde_json::from_str(l.trim_end_matches(',')).unwrap())
            .collect()
    }

    #[test]
    fn test_first_pass_emits_every_widget() {
        let a = Scripted::new(0, "a");
        let b = Scripted::new(5, "b");
        let widgets = table(&[&a, &b]);
        let mut scheduler = Scheduler::new(2, 32, Duration::from_secs(1));

        let mut out: Vec<u8> = Vec::new();
        let report = scheduler.pass(&widgets, at(0), false, &mut out).unwrap();

        assert!(report.emitted);
        assert_eq!(report.updated, 2);
        let lines = lines(&out);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0][0]["name"], "0");
        assert_eq!(lines[0][1]["full_text"], "   b   ");
    }

    #[test]
    fn test_unchanged_text_emits_nothing() {
        let a = Scripted::new(0, "same");
        let widgets = table(&[&a]);
        let mut scheduler = Scheduler::new(1, 32, Duration::from_secs(1));

        let mut out: Vec<u8> = Vec::new();
        scheduler.pass(&widgets, at(0), false, &mut out).unwrap();
        out.clear();

        for t in 1..4 {
            let report = scheduler.pass(&widgets, at(t), false, &mut out).unwrap();
            assert!(!report.emitted);
        }
        assert!(out.is_empty());
        assert_eq!(a.displays(), 4);
    }

    #[test]
    fn test_change_emits_complete_frame() {
        let fast = Scripted::new(0, "10:00");
        let slow = Scripted::new(60, "battery");
        let widgets = table(&[&fast, &slow]);
        let mut scheduler = Scheduler::new(2, 32, Duration::from_secs(1));

        let mut out: Vec<u8> = Vec::new();
        scheduler.pass(&widgets, at(0), false, &mut out).unwrap();
        out.clear();

        fast.set("10:01");
        let report = scheduler.pass(&widgets, at(1), false, &mut out).unwrap();

        assert_eq!(report.updated, 1);
        let lines = lines(&out);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0][0]["full_text"], "   10:01   ");
        // Slow widget was not rendered but is still on the line
        assert_eq!(lines[0][1]["full_text"], "   battery   ");
        assert_eq!(slow.displays(), 1);
    }

    #[test]
    fn test_interval_limits_display_calls() {
        let every = Scripted::new(0, "x");
        let five = Scripted::new(5, "y");
        let widgets = table(&[&every, &five]);
        let mut scheduler = Scheduler::new(2, 32, Duration::from_secs(1));

        let mut out: Vec<u8> = Vec::new();
        for t in 0..=5 {
            scheduler.pass(&widgets, at(t), false, &mut out).unwrap();
        }

        assert_eq!(every.displays(), 6);
        // t=0 and t=5
        assert_eq!(five.displays(), 2);
    }

    #[test]
    fn test_interval_measures_elapsed_time_not_second_boundaries() {
        let five = Scripted::new(5, "y");
        let widgets = table(&[&five]);
        let mut scheduler = Scheduler::new(1, 32, Duration::from_secs(1));

        let mut out: Vec<u8> = Vec::new();
        scheduler.pass(&widgets, at_ms(999), false, &mut out).unwrap();
        // Five second boundaries crossed, 4.001s elapsed
        scheduler.pass(&widgets, at_ms(5_000), false, &mut out).unwrap();
        assert_eq!(five.displays(), 1);

        scheduler.pass(&widgets, at_ms(5_999), false, &mut out).unwrap();
        assert_eq!(five.displays(), 2);
    }

    #[test]
    fn test_force_renders_everything() {
        let five = Scripted::new(5, "y");
        let widgets = table(&[&five]);
        let mut scheduler = Scheduler::new(1, 32, Duration::from_secs(1));

        let mut out: Vec<u8> = Vec::new();
        scheduler.pass(&widgets, at(0), false, &mut out).unwrap();
        five.set("z");
        let report = scheduler.pass(&widgets, at(1), true, &mut out).unwrap();

        assert!(report.emitted);
        assert_eq!(five.displays(), 2);
        assert_eq!(scheduler.frame().front(0), "z");
    }

    #[test]
    fn test_overflow_is_fatal() {
        let big = Scripted::new(0, "this text is far too long");
        let widgets = table(&[&big]);
        let mut scheduler = Scheduler::new(1, 8, Duration::from_secs(1));

        let mut out: Vec<u8> = Vec::new();
        let err = scheduler.pass(&widgets, at(0), false, &mut out).unwrap_err();

        assert!(matches!(
            err,
            Error::RenderOverflow {
                widget: 0,
                capacity: 8
            }
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_stats_track_emitted_frames() {
        let a = Scripted::new(0, "a");
        let widgets = table(&[&a]);
        let mut scheduler = Scheduler::new(1, 32, Duration::from_secs(1));

        let mut out: Vec<u8> = Vec::new();
        scheduler.pass(&widgets, at(0), false, &mut out).unwrap();
        scheduler.pass(&widgets, at(1), false, &mut out).unwrap();

        assert_eq!(scheduler.stats().passes, 2);
        assert_eq!(scheduler.stats().frames, 1);
        assert_eq!(scheduler.stats().bytes_written, out.len() as u64);
    }

    #[test]
    fn test_budget_check() {
        let budget = Duration::from_millis(10);
        assert_eq!(check_budget(Duration::from_millis(3), budget), BudgetCheck::Within);
        assert_eq!(check_budget(Duration::from_millis(30), budget), BudgetCheck::Over);
        assert_eq!(check_budget(Duration::from_millis(1500), budget), BudgetCheck::OverSecond);
    }
}
