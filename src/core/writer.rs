//! The writer thread
//!
//! Sole owner of the output stream. Lines are written in the order they were
//! admitted to the queue; write failures are counted and otherwise ignored.

use super::buffer_pool::BufferPool;
use super::log_entry::LogEntry;
use super::metrics::LoggerMetrics;
use super::queue::{Command, Output};
use crossbeam_channel::Receiver;
use std::any::Any;
use std::io::Write;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

pub(crate) struct Writer {
    receiver: Receiver<Command>,
    output: Output,
    pool: Arc<BufferPool>,
    metrics: Arc<LoggerMetrics>,
}

impl Writer {
    pub(crate) fn new(
        receiver: Receiver<Command>,
        output: Output,
        pool: Arc<BufferPool>,
        metrics: Arc<LoggerMetrics>,
    ) -> Self {
        Self {
            receiver,
            output,
            pool,
            metrics,
        }
    }

    /// Process commands until the queue is closed and empty
    pub(crate) fn run(mut self) {
        while let Ok(command) = self.receiver.recv() {
            self.handle(command);
            if self.receiver.is_empty() {
                self.flush_output();
            }
        }
        self.flush_output();
    }

    pub(crate) fn redirect(&mut self, output: Output) {
        self.flush_output();
        self.output = output;
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Line(entry) => self.write_entry(entry),
            Command::Redirect(output) => self.redirect(output),
            Command::Flush(ack) => {
                self.flush_output();
                let _ = ack.send(());
            }
        }
    }

    fn write_entry(&mut self, entry: LogEntry) {
        // A panicking writer must not take the thread down with it; the
        // queue would stay open with nobody draining it.
        let result = catch_unwind(AssertUnwindSafe(|| self.output.write_all(entry.payload())));

        match result {
            Ok(Ok(())) => {
                self.metrics.record_written();
            }
            Ok(Err(_)) => {
                self.metrics.record_write_failure();
            }
            Err(panic_info) => {
                eprintln!(
                    "[LOGGER CRITICAL] Log output panicked: {}",
                    panic_message(panic_info.as_ref())
                );
                self.metrics.record_write_failure();
            }
        }

        self.pool.release(entry.into_payload());
    }

    /// Flush the output with the same panic isolation as writes
    ///
    /// A flush error only delays bytes that the next flush retries, so it is
    /// not counted; a panic is.
    fn flush_output(&mut self) {
        let result = catch_unwind(AssertUnwindSafe(|| self.output.flush()));

        if let Err(panic_info) = result {
            eprintln!(
                "[LOGGER CRITICAL] Log output panicked during flush: {}",
                panic_message(panic_info.as_ref())
            );
            self.metrics.record_write_failure();
        }
    }
}

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
