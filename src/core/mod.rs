//! Core logger types

pub mod buffer_pool;
pub mod color;
pub mod config;
pub mod error;
pub mod formatter;
pub mod lifecycle;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod queue;
pub mod timestamp;
mod writer;

pub use buffer_pool::BufferPool;
pub use color::{ColorMode, ColorScheme};
pub use config::LoggerConfig;
pub use error::{LoggerError, Result};
pub use formatter::{Formatter, Message};
pub use lifecycle::LifecycleState;
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use queue::{LogQueue, OverflowCallback};
pub use timestamp::{Clock, ClockTime};
