//! Output sink shared between the tunnel readers and the renderer
//!
//! Reader tasks append process output from worker threads while the
//! presentation loop reads snapshots. Every mutation bumps a `watch`
//! revision so the loop knows a redraw is due.
//!
//! Writers are bound to the sink's epoch at the time they are created.
//! [`OutputSink::clear`] advances the epoch, so output from a process that
//! was already torn down never lands in a later session's buffer.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;

/// Default number of lines retained
pub const DEFAULT_CAPACITY: usize = 1000;

#[derive(Debug)]
struct SinkBuffer {
    lines: VecDeque<String>,
    /// Trailing text not yet terminated by a newline
    partial: String,
    epoch: u64,
    capacity: usize,
}

impl SinkBuffer {
    fn push_bytes(&mut self, bytes: &[u8]) {
        let text = String::from_utf8_lossy(bytes);
        let mut segments = text.split('\n').peekable();

        while let Some(segment) = segments.next() {
            self.partial.push_str(segment.strip_suffix('\r').unwrap_or(segment));
            // The last segment has no newline after it
            if segments.peek().is_some() {
                let line = std::mem::take(&mut self.partial);
                self.lines.push_back(line);
                while self.lines.len() > self.capacity {
                    self.lines.pop_front();
                }
            }
        }
    }
}

/// Append-only, redraw-triggering text buffer.
///
/// Cloning is cheap; all clones share the same buffer.
#[derive(Debug, Clone)]
pub struct OutputSink {
    inner: Arc<Mutex<SinkBuffer>>,
    revision: Arc<watch::Sender<u64>>,
}

impl Default for OutputSink {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl OutputSink {
    /// Create a sink retaining at most `capacity` complete lines
    pub fn new(capacity: usize) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(Mutex::new(SinkBuffer {
                lines: VecDeque::new(),
                partial: String::new(),
                epoch: 0,
                capacity: capacity.max(1),
            })),
            revision: Arc::new(revision),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SinkBuffer> {
        // A panicking writer leaves the buffer structurally intact
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn request_redraw(&self) {
        self.revision.send_modify(|rev| *rev = rev.wrapping_add(1));
    }

    /// Subscribe to redraw requests
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Append raw bytes to the current epoch
    pub fn append(&self, bytes: &[u8]) {
        self.lock().push_bytes(bytes);
        self.request_redraw();
    }

    /// Create a writer bound to the current epoch
    pub fn writer(&self) -> SinkWriter {
        SinkWriter {
            sink: self.clone(),
            epoch: self.lock().epoch,
        }
    }

    /// Drop all buffered output and invalidate existing writers
    pub fn clear(&self) {
        {
            let mut buf = self.lock();
            buf.lines.clear();
            buf.partial.clear();
            buf.epoch += 1;
        }
        self.request_redraw();
    }

    /// Replace the contents with a single message
    pub fn set_text(&self, text: &str) {
        self.clear();
        self.append(text.as_bytes());
    }

    /// Snapshot of all lines, including an unterminated trailing line
    pub fn lines(&self) -> Vec<String> {
        let buf = self.lock();
        let mut lines: Vec<String> = buf.lines.iter().cloned().collect();
        if !buf.partial.is_empty() {
            lines.push(buf.partial.clone());
        }
        lines
    }

    /// The last `n` lines
    pub fn tail(&self, n: usize) -> Vec<String> {
        let mut lines = self.lines();
        let skip = lines.len().saturating_sub(n);
        lines.drain(..skip);
        lines
    }

    /// Whole buffer joined with newlines
    pub fn text(&self) -> String {
        self.lines().join("\n")
    }

    pub fn is_empty(&self) -> bool {
        let buf = self.lock();
        buf.lines.is_empty() && buf.partial.is_empty()
    }
}

/// Write handle given to a tunnel's reader tasks
#[derive(Debug, Clone)]
pub struct SinkWriter {
    sink: OutputSink,
    epoch: u64,
}

impl SinkWriter {
    /// Append bytes unless the sink was cleared since this writer was made.
    ///
    /// Returns `false` when the write was discarded.
    pub fn append(&self, bytes: &[u8]) -> bool {
        {
            let mut buf = self.sink.lock();
            if buf.epoch != self.epoch {
                return false;
            }
            buf.push_bytes(bytes);
        }
        self.sink.request_redraw();
        true
    }

    pub fn is_stale(&self) -> bool {
        self.sink.lock().epoch != self.epoch
    }
}
