//! Main logger implementation

use super::{
    buffer_pool::BufferPool,
    color::{ColorMode, ColorScheme},
    config::LoggerConfig,
    error::{LoggerError, Result},
    formatter::{Formatter, Message},
    lifecycle::{Lifecycle, LifecycleState},
    log_entry::LogEntry,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    queue::{should_alert, Command, LogQueue, OverflowCallback, Output},
    timestamp::Clock,
    writer::Writer,
};
use crossbeam_channel::bounded;
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;
use std::thread;

/// Name given to the background writer thread
pub const WRITER_THREAD_NAME: &str = "log-writer";

enum WorkerSlot {
    /// Built with `start_paused`, writer not spawned yet
    Pending(Writer),
    Running(thread::JoinHandle<()>),
    Finished,
}

/// Handle to one logging pipeline
///
/// Log calls format the line on the calling thread into a pooled buffer and
/// offer it to a bounded queue without waiting. A single writer thread owns
/// the output and writes lines in the order they were admitted. When the
/// queue is full the new line is dropped and counted.
///
/// Dropping the logger performs [`Logger::shutdown`].
///
/// # Example
///
/// ```
/// use rust_console_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .output(std::io::sink())
///     .build()?;
///
/// logger.info("server started");
/// logger.warn_fmt(format_args!("retry {} of {}", 1, 3));
/// logger.shutdown();
/// # Ok::<(), LoggerError>(())
/// ```
pub struct Logger {
    formatter: Formatter,
    queue: LogQueue,
    pool: Arc<BufferPool>,
    metrics: Arc<LoggerMetrics>,
    lifecycle: Lifecycle,
    worker: Mutex<WorkerSlot>,
    on_overflow: Option<OverflowCallback>,
    fatal_exit_code: Option<i32>,
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Spawn the writer thread of a logger built with `start_paused`
    ///
    /// Calling it on a running logger does nothing.
    pub fn start(&self) -> Result<()> {
        let mut worker = self.worker.lock();
        match std::mem::replace(&mut *worker, WorkerSlot::Finished) {
            WorkerSlot::Pending(writer) => {
                let handle = thread::Builder::new()
                    .name(WRITER_THREAD_NAME.to_string())
                    .spawn(move || writer.run())
                    .map_err(LoggerError::WriterSpawn)?;
                *worker = WorkerSlot::Running(handle);
                Ok(())
            }
            running @ WorkerSlot::Running(_) => {
                *worker = running;
                Ok(())
            }
            WorkerSlot::Finished => Err(LoggerError::LoggerStopped),
        }
    }

    pub fn log<'a>(&self, level: LogLevel, message: impl Into<Message<'a>>) {
        let message = message.into();
        if level == LogLevel::Fatal {
            self.log_fatal(message);
            return;
        }

        let mut payload = self.pool.acquire();
        self.formatter.format(&mut payload, level, message);

        match self.queue.try_send(LogEntry::new(level, payload)) {
            Ok(()) => {
                self.metrics.record_logged();
            }
            Err(rejected) => {
                self.pool.release(rejected.into_payload());
                self.report_drop();
            }
        }
    }

    /// Count a rejected line; only a full queue is reported as overflow
    fn report_drop(&self) {
        let total = self.metrics.record_dropped() + 1;
        if self.queue.is_closed() {
            return;
        }
        if let Some(ref callback) = self.on_overflow {
            if should_alert(total) {
                callback(total);
            }
        }
    }

    /// Write a fatal line, shut down, then exit if configured to
    ///
    /// The line is enqueued with a blocking send so it cannot be dropped.
    fn log_fatal(&self, message: Message<'_>) {
        // Without a running writer nobody frees a slot for the blocking send.
        let writer_running = self.start().is_ok();

        let mut payload = self.pool.acquire();
        self.formatter.format(&mut payload, LogLevel::Fatal, message);

        let entry = LogEntry::new(LogLevel::Fatal, payload);
        let sent = if writer_running {
            self.queue.send_blocking(entry)
        } else {
            self.queue.try_send(entry)
        };
        match sent {
            Ok(()) => {
                self.metrics.record_logged();
            }
            Err(rejected) => {
                // The writer is gone, so nothing else is writing any more.
                let _ = std::io::stderr().write_all(rejected.payload());
                self.pool.release(rejected.into_payload());
            }
        }

        self.shutdown();

        if let Some(code) = self.fatal_exit_code {
            std::process::exit(code);
        }
    }

    #[inline]
    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    /// Log, shut down and terminate the process (see [`LoggerBuilder::fatal_exit_code`])
    pub fn fatal(&self, message: &str) {
        self.log(LogLevel::Fatal, message);
    }

    #[inline]
    pub fn debug_fmt(&self, args: std::fmt::Arguments<'_>) {
        self.log(LogLevel::Debug, args);
    }

    #[inline]
    pub fn info_fmt(&self, args: std::fmt::Arguments<'_>) {
        self.log(LogLevel::Info, args);
    }

    #[inline]
    pub fn warn_fmt(&self, args: std::fmt::Arguments<'_>) {
        self.log(LogLevel::Warn, args);
    }

    #[inline]
    pub fn error_fmt(&self, args: std::fmt::Arguments<'_>) {
        self.log(LogLevel::Error, args);
    }

    pub fn fatal_fmt(&self, args: std::fmt::Arguments<'_>) {
        self.log(LogLevel::Fatal, args);
    }

    /// Redirect the writer thread to a different output
    ///
    /// Lines queued before this call still go to the previous output.
    pub fn set_output<W: Write + Send + 'static>(&self, output: W) -> Result<()> {
        let output: Output = Box::new(output);
        if let WorkerSlot::Pending(writer) = &mut *self.worker.lock() {
            writer.redirect(output);
            return Ok(());
        }
        self.queue.send_command(Command::Redirect(output))
    }

    /// Block until every line queued before this call has been written and
    /// the output flushed
    pub fn flush(&self) -> Result<()> {
        if matches!(*self.worker.lock(), WorkerSlot::Pending(_)) {
            return Err(LoggerError::NotStarted);
        }

        let (ack, acked) = bounded(1);
        self.queue.send_command(Command::Flush(ack))?;
        acked.recv().map_err(|_| LoggerError::ChannelSendError)
    }

    /// Stop accepting lines, drain the queue and stop the writer
    ///
    /// Safe to call any number of times from any thread. Exactly one caller
    /// runs the sequence; concurrent callers block until it has finished.
    /// A logger that was never started drains on the calling thread.
    pub fn shutdown(&self) {
        let Some(_ticket) = self.lifecycle.begin_shutdown() else {
            return;
        };

        self.queue.close();

        let worker = std::mem::replace(&mut *self.worker.lock(), WorkerSlot::Finished);
        match worker {
            WorkerSlot::Pending(writer) => writer.run(),
            WorkerSlot::Running(handle) => {
                if let Err(e) = handle.join() {
                    eprintln!("[LOGGER ERROR] Log writer thread panicked during shutdown: {:?}", e);
                }
            }
            WorkerSlot::Finished => {}
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    /// Get the number of dropped logs
    pub fn dropped_count(&self) -> u64 {
        self.metrics.dropped_count()
    }

    /// Get the logger metrics for detailed observability
    ///
    /// # Example
    ///
    /// ```
    /// use rust_console_logger::Logger;
    ///
    /// let logger = Logger::builder().output(std::io::sink()).build().unwrap();
    ///
    /// let metrics = logger.metrics();
    /// println!("Dropped: {}", metrics.dropped_count());
    /// println!("Total logged: {}", metrics.total_logged());
    /// println!("Drop rate: {:.2}%", metrics.drop_rate());
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn buffer_pool(&self) -> &BufferPool {
        &self.pool
    }

    pub fn queue(&self) -> &LogQueue {
        &self.queue
    }

    pub fn colors_enabled(&self) -> bool {
        self.formatter.colors().is_enabled()
    }

    pub fn fatal_exit_code(&self) -> Option<i32> {
        self.fatal_exit_code
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_console_logger::prelude::*;
/// use std::sync::Arc;
///
/// let logger = Logger::builder()
///     .queue_capacity(4096)
///     .color_mode(ColorMode::Never)
///     .on_overflow(Arc::new(|count| {
///         eprintln!("ALERT: {} logs dropped", count);
///     }))
///     .build()
///     .unwrap();
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    palette: [colored::Color; 5],
    output: Option<Output>,
    on_overflow: Option<OverflowCallback>,
    start_paused: bool,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::from_config(LoggerConfig::default())
    }

    pub fn from_config(config: LoggerConfig) -> Self {
        Self {
            config,
            palette: LogLevel::ALL.map(|level| level.color_code()),
            output: None,
            on_overflow: None,
            start_paused: false,
        }
    }

    /// Replace the whole configuration
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.config.buffer_capacity = capacity;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn max_pooled_buffers(mut self, count: usize) -> Self {
        self.config.max_pooled_buffers = Some(count);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn color_mode(mut self, mode: ColorMode) -> Self {
        self.config.color = mode;
        self
    }

    /// Override the color used for one level
    #[must_use = "builder methods return a new value"]
    pub fn level_color(mut self, level: LogLevel, color: colored::Color) -> Self {
        self.palette[level.index()] = color;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn clock(mut self, clock: Clock) -> Self {
        self.config.clock = clock;
        self
    }

    /// Write to `output` instead of stdout
    ///
    /// With [`ColorMode::Auto`] a custom output is treated as a non-terminal.
    #[must_use = "builder methods return a new value"]
    pub fn output<W: Write + Send + 'static>(mut self, output: W) -> Self {
        self.output = Some(Box::new(output));
        self
    }

    /// Exit status after a fatal line; `None` shuts down without exiting
    #[must_use = "builder methods return a new value"]
    pub fn fatal_exit_code(mut self, code: Option<i32>) -> Self {
        self.config.fatal_exit_code = code;
        self
    }

    /// Set a callback for overflow notifications
    ///
    /// The parameter is the total count of dropped logs.
    #[must_use = "builder methods return a new value"]
    pub fn on_overflow(mut self, callback: OverflowCallback) -> Self {
        self.on_overflow = Some(callback);
        self
    }

    /// Do not spawn the writer thread until [`Logger::start`]
    ///
    /// Lines logged meanwhile fill the queue; once it is full further lines
    /// are dropped.
    #[must_use = "builder methods return a new value"]
    pub fn start_paused(mut self) -> Self {
        self.start_paused = true;
        self
    }

    /// Build the Logger
    pub fn build(self) -> Result<Logger> {
        self.config.validate()?;
        let start = !self.start_paused;
        let logger = self.assemble();
        if start {
            logger.start()?;
        }
        Ok(logger)
    }

    /// Wire up every component without validating or starting the writer
    pub(crate) fn assemble(self) -> Logger {
        let config = self.config;

        let colors = if config.color.resolve(self.output.is_none()) {
            ColorScheme::with_palette(self.palette)
        } else {
            ColorScheme::plain()
        };

        let pool = Arc::new(BufferPool::new(
            config.buffer_capacity,
            config.pooled_buffers(),
        ));
        let metrics = Arc::new(LoggerMetrics::new());
        let (queue, receiver) = LogQueue::bounded(config.queue_capacity);
        let output = self
            .output
            .unwrap_or_else(|| Box::new(std::io::stdout()));
        let writer = Writer::new(receiver, output, Arc::clone(&pool), Arc::clone(&metrics));

        Logger {
            formatter: Formatter::new(colors, config.clock),
            queue,
            pool,
            metrics,
            lifecycle: Lifecycle::new(),
            worker: Mutex::new(WorkerSlot::Pending(writer)),
            on_overflow: self.on_overflow,
            fatal_exit_code: config.fatal_exit_code,
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
