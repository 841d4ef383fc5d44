//! Bounded hand-off queue between log producers and the writer thread
//!
//! Producers never wait here: [`LogQueue::try_send`] either admits the line or
//! hands it straight back. Closing the queue drops the only sender, which the
//! writer observes as end-of-stream once it has drained what was admitted.

use super::error::{LoggerError, Result};
use super::log_entry::LogEntry;
use crossbeam_channel::{bounded, Receiver, SendError, Sender};
use parking_lot::RwLock;
use std::io::Write;
use std::sync::Arc;

/// Default number of slots in the queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Output stream owned by the writer thread
pub type Output = Box<dyn Write + Send>;

/// Callback for overflow notifications
///
/// Called with the total count of dropped lines on the first drop and on
/// every thousandth drop after that. Lines rejected because the logger has
/// shut down are counted but not reported.
pub type OverflowCallback = Arc<dyn Fn(u64) + Send + Sync>;

/// Whether a drop count should be reported to the overflow callback
#[inline]
pub(crate) fn should_alert(total_dropped: u64) -> bool {
    total_dropped == 1 || total_dropped % 1000 == 0
}

/// Messages understood by the writer thread
pub(crate) enum Command {
    /// A formatted line to write
    Line(LogEntry),
    /// Swap the output stream
    Redirect(Output),
    /// Flush the output stream, then acknowledge
    Flush(Sender<()>),
}

/// Fixed-capacity multi-producer queue feeding the single writer
pub struct LogQueue {
    sender: RwLock<Option<Sender<Command>>>,
    capacity: usize,
}

impl LogQueue {
    pub(crate) fn bounded(capacity: usize) -> (Self, Receiver<Command>) {
        let (sender, receiver) = bounded(capacity);
        let queue = Self {
            sender: RwLock::new(Some(sender)),
            capacity,
        };
        (queue, receiver)
    }

    /// Offer a line without blocking
    ///
    /// Returns the entry when the queue is full or closed; the caller then
    /// owns its buffer again.
    pub fn try_send(&self, entry: LogEntry) -> std::result::Result<(), LogEntry> {
        let sender = self.sender.read();
        let Some(sender) = sender.as_ref() else {
            return Err(entry);
        };

        sender.try_send(Command::Line(entry)).map_err(|err| match err.into_inner() {
            Command::Line(entry) => entry,
            _ => unreachable!("only lines are offered through try_send"),
        })
    }

    /// Sender for a send that may wait
    ///
    /// Waiting with the read lock held would stall `close`, and with it every
    /// producer queued behind the pending write lock. A live clone keeps the
    /// channel connected until its send completes; the writer drains it.
    fn detached_sender(&self) -> Option<Sender<Command>> {
        self.sender.read().clone()
    }

    /// Enqueue a line, waiting for a free slot if necessary
    pub(crate) fn send_blocking(&self, entry: LogEntry) -> std::result::Result<(), LogEntry> {
        let Some(sender) = self.detached_sender() else {
            return Err(entry);
        };

        sender.send(Command::Line(entry)).map_err(|SendError(command)| match command {
            Command::Line(entry) => entry,
            _ => unreachable!("only lines are offered through send_blocking"),
        })
    }

    /// Enqueue a control command, waiting for a free slot if necessary
    pub(crate) fn send_command(&self, command: Command) -> Result<()> {
        let sender = self.detached_sender().ok_or(LoggerError::LoggerStopped)?;
        sender
            .send(command)
            .map_err(|_| LoggerError::ChannelSendError)
    }

    /// Stop admitting entries
    ///
    /// Sends already waiting for a slot still complete. Returns true for the
    /// call that actually closed the queue.
    pub fn close(&self) -> bool {
        self.sender.write().take().is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.sender.read().is_none()
    }

    /// Entries currently waiting for the writer
    pub fn len(&self) -> usize {
        self.sender.read().as_ref().map_or(0, Sender::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
