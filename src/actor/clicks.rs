//! Click Actor: Dedicated thread for click events from the bar.
//!
//! This actor reads standard input in bounded waits, splits each read into
//! line records, decodes them and calls the clicked widget's hook directly.
//! It shares nothing mutable with the render loop: the widget table is
//! read-only and the only inbound signal is the termination flag.

use std::io::Read;
use std::os::fd::AsFd;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;
use tracing::{debug, error, info, warn};

use super::messages::{ActorStatus, ClickOutcome, DropReason};
use crate::error::{Error, Result};
use crate::protocol::decode_click;
use crate::sys::{CancellableReader, ReadOutcome, Termination};
use crate::widget::WidgetTable;

/// Configuration for the click thread.
#[derive(Debug, Clone)]
pub struct ClickConfig {
    /// Longest single wait for input, in milliseconds.
    pub poll_timeout_ms: u16,
    /// Size of the fixed read buffer; longer payloads are truncated.
    pub buffer_size: usize,
}

impl Default for ClickConfig {
    fn default() -> Self {
        Self {
            poll_timeout_ms: 5000,
            buffer_size: 512,
        }
    }
}

/// Click actor that dispatches click events to widgets.
pub struct ClickActor {
    /// Handle to the click thread.
    handle: Option<JoinHandle<Result<()>>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

impl ClickActor {
    /// Spawn the click thread reading from `input`.
    ///
    /// The thread reports how it ended on `status` before exiting.
    pub fn spawn<R>(
        input: R,
        widgets: Arc<WidgetTable>,
        termination: Termination,
        config: &ClickConfig,
        status: Sender<ActorStatus>,
    ) -> Result<Self>
    where
        R: Read + AsFd + Send + 'static,
    {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let config = config.clone();

        let handle = thread::Builder::new()
            .name("swaystatus-clicks".to_string())
            .spawn(move || {
                let result = Self::run_loop(input, &widgets, &termination, &shutdown_clone, &config);
                let report = match &result {
                    Ok(()) => ActorStatus::Stopped,
                    Err(e) => ActorStatus::Failed(e.to_string()),
                };
                // Main loop may already be gone
                let _ = status.send(report);
                result
            })
            .map_err(|e| Error::ClickThread(format!("failed to spawn: {e}")))?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Signal the click thread to stop at its next wake-up.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Whether the thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Stop the click thread and wait for it.
    ///
    /// Returns the thread's own error if it stopped on an I/O failure.
    pub fn join(mut self) -> Result<()> {
        self.shutdown();
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| Error::ClickThread("thread panicked".to_string()))?,
            None => Ok(()),
        }
    }

    /// Main click loop.
    fn run_loop<R: Read + AsFd>(
        input: R,
        widgets: &WidgetTable,
        termination: &Termination,
        shutdown: &AtomicBool,
        config: &ClickConfig,
    ) -> Result<()> {
        let mut reader = CancellableReader::new(input, config.poll_timeout_ms);
        let mut buf = vec![0u8; config.buffer_size.max(1)];
        let mut records = RecordSplitter::default();

        loop {
            let outcome = reader.read_chunk(&mut buf, || {
                termination.is_requested() || shutdown.load(Ordering::Relaxed)
            });

            match outcome {
                Ok(ReadOutcome::Data(n)) => {
                    handle_chunk(widgets, &mut records, &buf[..n], n == buf.len());
                }
                Ok(ReadOutcome::Eof) => {
                    info!("stdin closed, no more click events");
                    return Ok(());
                }
                Ok(ReadOutcome::Cancelled) => {
                    debug!("click thread stopping");
                    return Ok(());
                }
                Err(e) => {
                    error!(error = %e, "click thread failed");
                    return Err(e);
                }
            }
        }
    }
}

impl Drop for ClickActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Dispatch every record in one read.
///
/// `full` means the read filled the buffer. A full read that starts a line
/// and does not finish it is an oversized payload: it is warned about once
/// here and the rest of it is skipped by `records` on the following reads.
/// Returns whether the payload was reported as truncated.
pub fn handle_chunk(
    widgets: &WidgetTable,
    records: &mut RecordSplitter,
    chunk: &[u8],
    full: bool,
) -> bool {
    let truncated = full && !records.is_discarding() && !chunk.ends_with(b"\n");
    if truncated {
        warn!(bytes = chunk.len(), "click payload too large, truncating");
    }
    for record in records.split(chunk) {
        handle_record(widgets, record);
    }
    truncated
}

/// Decode one record and dispatch it.
pub fn handle_record(widgets: &WidgetTable, record: &[u8]) -> ClickOutcome {
    let event = decode_click(record);
    match event.target(widgets.len()) {
        Ok(index) => {
            debug!(widget = index, "click");
            widgets.click(index);
            ClickOutcome::Dispatched(index)
        }
        Err(DropReason::Empty) => {
            debug!(
                record = %String::from_utf8_lossy(record),
                "ignoring record without parameters"
            );
            ClickOutcome::Dropped(DropReason::Empty)
        }
        Err(reason) => {
            warn!(
                %reason,
                record = %String::from_utf8_lossy(record),
                "click event dropped"
            );
            ClickOutcome::Dropped(reason)
        }
    }
}

/// Splits reads into line records.
///
/// A record is handled from the read that contains its start. When a read
/// ends mid-line (a truncated oversized payload, or a short write) the
/// remainder of that line in the following read is discarded rather than
/// reassembled.
#[derive(Debug, Default)]
pub struct RecordSplitter {
    discarding: bool,
}

impl RecordSplitter {
    /// Whether the next chunk starts inside a line that is being skipped.
    #[inline]
    pub const fn is_discarding(&self) -> bool {
        self.discarding
    }

    /// Records contained in `chunk`.
    pub fn split<'a>(&mut self, chunk: &'a [u8]) -> impl Iterator<Item = &'a [u8]> {
        let start = if self.discarding {
            chunk
                .iter()
                .position(|&b| b == b'\n')
                .map_or(chunk.len(), |p| p + 1)
        } else {
            0
        };
        self.discarding = !chunk.ends_with(b"\n");

        chunk[start..]
            .split(|&b| b == b'\n')
            .filter(|record| !record.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::Widget;
    use crossbeam_channel::unbounded;
    use std::io::Write;
    use std::os::unix::net::UnixStream;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[derive(Default)]
    struct Counter(AtomicUsize);

    impl Widget for Counter {
        fn name(&self) -> &'static str {
            "counter"
        }

        fn on_click(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn table(n: usize) -> (Arc<WidgetTable>, Vec<Arc<Counter>>) {
        let counters: Vec<Arc<Counter>> = (0..n).map(|_| Arc::new(Counter::default())).collect();
        let table = counters
            .iter()
            .map(|c| c.clone() as Arc<dyn Widget>)
            .collect();
        (Arc::new(table), counters)
    }

    fn counts(counters: &[Arc<Counter>]) -> Vec<usize> {
        counters.iter().map(|c| c.0.load(Ordering::SeqCst)).collect()
    }

    #[test]
    fn test_dispatch_left_click() {
        let (widgets, counters) = table(2);
        let outcome = handle_record(&widgets, br#"{"name":"1","button":1}"#);

        assert_eq!(outcome, ClickOutcome::Dispatched(1));
        assert_eq!(counts(&counters), vec![0, 1]);
    }

    #[test]
    fn test_no_dispatch_for_other_buttons() {
        let (widgets, counters) = table(1);
        for record in [
            &br#"[{"name": "0", "button": 2}"#[..],
            &br#"{"name":"0","button":3}"#[..],
            &br#"{"name":"0"}"#[..],
            &br#"{"name":"0","button":10}"#[..],
        ] {
            assert!(matches!(
                handle_record(&widgets, record),
                ClickOutcome::Dropped(_)
            ));
        }
        assert_eq!(counts(&counters), vec![0]);
    }

    #[test]
    fn test_no_dispatch_for_bad_names() {
        let (widgets, counters) = table(2);
        assert_eq!(
            handle_record(&widgets, br#"{"name":"2","button":1}"#),
            ClickOutcome::Dropped(DropReason::OutOfRange(2))
        );
        assert_eq!(
            handle_record(&widgets, br#"{"name":"battery","button":1}"#),
            ClickOutcome::Dropped(DropReason::MalformedName)
        );
        assert_eq!(
            handle_record(&widgets, br#"{"instance":"x","button":1}"#),
            ClickOutcome::Dropped(DropReason::MissingName)
        );
        assert_eq!(counts(&counters), vec![0, 0]);
    }

    #[test]
    fn test_empty_values_drop_once() {
        let (widgets, counters) = table(1);
        assert_eq!(
            handle_record(&widgets, br#"{"name":"","button":1}"#),
            ClickOutcome::Dropped(DropReason::MissingName)
        );
        assert_eq!(
            handle_record(&widgets, br#"{"name":"0","button":}"#),
            ClickOutcome::Dropped(DropReason::MissingButton)
        );
        assert_eq!(counts(&counters), vec![0]);
    }

    #[test]
    fn test_unknown_keys_in_any_order() {
        let (widgets, counters) = table(3);
        handle_record(
            &widgets,
            br#",{"button":1,"relative_x":4,"modifiers":["Mod4","Shift"],"name":"2","x":1}"#,
        );
        handle_record(&widgets, br#"{"instance":"a","name":"2","event":272,"button":1}"#);
        assert_eq!(counts(&counters), vec![0, 0, 2]);
    }

    #[test]
    fn test_splitter_lines_are_independent() {
        let mut splitter = RecordSplitter::default();
        let records: Vec<&[u8]> = splitter
            .split(b"[\n{\"name\":\"0\",\"button\":1}\n,{\"name\":\"1\"}\n")
            .collect();
        assert_eq!(
            records,
            vec![
                &b"["[..],
                &b"{\"name\":\"0\",\"button\":1}"[..],
                &b",{\"name\":\"1\"}"[..],
            ]
        );
    }

    #[test]
    fn test_splitter_discards_truncated_tail() {
        let mut splitter = RecordSplitter::default();

        let first: Vec<&[u8]> = splitter.split(b"{\"name\":\"0\",\"x\":12").collect();
        assert_eq!(first, vec![&b"{\"name\":\"0\",\"x\":12"[..]]);

        // Rest of the truncated line is skipped, the next line survives
        let second: Vec<&[u8]> = splitter.split(b"34,\"y\":5}\n{\"name\":\"1\"}\n").collect();
        assert_eq!(second, vec![&b"{\"name\":\"1\"}"[..]]);
    }

    /// One oversized line of `len` bytes including its newline.
    fn oversized(len: usize) -> Vec<u8> {
        let mut line = br#"{"name":"0","button":1,"instance":""#.to_vec();
        line.resize(len - 3, b'a');
        line.extend_from_slice(b"\"}\n");
        line
    }

    #[test]
    fn test_oversized_payload_warned_once() {
        let (widgets, counters) = table(2);
        let mut records = RecordSplitter::default();
        let payload = oversized(234);

        let mut warnings = 0;
        for chunk in payload.chunks(64) {
            if handle_chunk(&widgets, &mut records, chunk, chunk.len() == 64) {
                warnings += 1;
            }
        }
        assert_eq!(warnings, 1);
        assert!(!records.is_discarding());

        // The truncated head still names widget 0; the next line is intact
        let next = b"{\"name\":\"1\",\"button\":1}\n";
        assert!(!handle_chunk(&widgets, &mut records, next, false));
        assert_eq!(counts(&counters), vec![1, 1]);
    }

    #[test]
    fn test_exact_fit_is_not_truncated() {
        let (widgets, counters) = table(1);
        let mut records = RecordSplitter::default();
        let line = b"{\"name\":\"0\",\"button\":1}\n";

        assert!(!handle_chunk(&widgets, &mut records, line, true));
        assert_eq!(counts(&counters), vec![1]);
    }

    #[test]
    fn test_actor_recovers_after_oversized_payload() {
        let (widgets, counters) = table(2);
        let (mut tx, rx) = UnixStream::pair().unwrap();
        let (status_tx, _status_rx) = unbounded();
        let config = ClickConfig {
            poll_timeout_ms: 20,
            buffer_size: 64,
        };

        // Queued before the thread starts so every read fills the buffer
        tx.write_all(&oversized(256)).unwrap();
        tx.write_all(b"{\"name\":\"1\",\"button\":1}\n").unwrap();
        let actor =
            ClickActor::spawn(rx, widgets, Termination::new(), &config, status_tx).unwrap();

        for _ in 0..100 {
            if counts(&counters)[1] == 1 {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(counts(&counters), vec![1, 1]);
        actor.join().unwrap();
    }

    #[test]
    fn test_actor_dispatches_and_stops() {
        let (widgets, counters) = table(2);
        let (mut tx, rx) = UnixStream::pair().unwrap();
        let (status_tx, status_rx) = unbounded();
        let config = ClickConfig {
            poll_timeout_ms: 20,
            buffer_size: 128,
        };

        let actor =
            ClickActor::spawn(rx, widgets, Termination::new(), &config, status_tx).unwrap();

        tx.write_all(b"[\n{\"name\":\"1\",\"button\":1}\n").unwrap();
        for _ in 0..100 {
            if counts(&counters) == vec![0, 1] {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(counts(&counters), vec![0, 1]);

        actor.join().unwrap();
        assert_eq!(
            status_rx.recv_timeout(Duration::from_secs(1)),
            Ok(ActorStatus::Stopped)
        );
    }

    #[test]
    fn test_actor_observes_termination() {
        let (widgets, _) = table(1);
        let (_tx, rx) = UnixStream::pair().unwrap();
        let (status_tx, status_rx) = unbounded();
        let termination = Termination::new();
        let config = ClickConfig {
            poll_timeout_ms: 10,
            buffer_size: 64,
        };

        let _actor =
            ClickActor::spawn(rx, widgets, termination.clone(), &config, status_tx).unwrap();
        termination.request(15);

        assert_eq!(
            status_rx.recv_timeout(Duration::from_secs(2)),
            Ok(ActorStatus::Stopped)
        );
    }
}
