//! # Rust Console Logger
//!
//! An asynchronous console logger. Application threads format a line into a
//! pooled buffer and hand it to a bounded queue without ever waiting on the
//! terminal; one background writer thread owns the output stream and writes
//! the lines in order.
//!
//! ## Features
//!
//! - **Non-blocking**: a full queue drops the new line instead of stalling the caller
//! - **Allocation-free steady state**: line buffers are recycled through a pool
//! - **Ordered, whole lines**: a single writer, one complete line per write
//! - **Clean shutdown**: queued lines are drained before the writer stops
//! - **Colors**: per-level ANSI colors, off for non-terminals or when `NO_COLOR` is set
//!
//! Lines look like `[HH:MM:SS.mmm] [LEVEL] message`.

pub mod core;
pub mod global;
pub mod macros;

pub mod prelude {
    pub use crate::core::{
        Clock, ColorMode, LifecycleState, LogLevel, Logger, LoggerBuilder, LoggerConfig,
        LoggerError, LoggerMetrics, Message, OverflowCallback, Result,
    };
}

pub use crate::core::{
    BufferPool, Clock, ClockTime, ColorMode, ColorScheme, Formatter, LifecycleState, LogEntry,
    LogLevel, LogQueue, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, Message,
    OverflowCallback, Result,
};
pub use global::{
    debug, debugf, error, errorf, fatal, fatalf, flush, info, infof, init, init_with, logger,
    metrics, set_output, shutdown, warn, warnf, ShutdownGuard,
};
