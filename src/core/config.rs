//! Logger configuration
//!
//! `LoggerConfig` is plain data so it can be embedded in an application's
//! own configuration file. Unspecified fields fall back to the defaults.

use super::buffer_pool::DEFAULT_BUFFER_CAPACITY;
use super::color::{ColorMode, NO_COLOR_ENV};
use super::error::{LoggerError, Result};
use super::queue::DEFAULT_QUEUE_CAPACITY;
use super::timestamp::Clock;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;

/// Exit status used after a fatal line unless configured otherwise
pub const DEFAULT_FATAL_EXIT_CODE: i32 = 1;

/// # Example
///
/// ```
/// use rust_console_logger::{ColorMode, LoggerConfig};
///
/// let config = LoggerConfig {
///     queue_capacity: 4096,
///     color: ColorMode::Never,
///     ..LoggerConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Lines that may wait for the writer before new ones are dropped
    pub queue_capacity: usize,
    /// Initial capacity of each pooled line buffer
    pub buffer_capacity: usize,
    /// Upper bound on idle pooled buffers; defaults to `queue_capacity`
    pub max_pooled_buffers: Option<usize>,
    pub color: ColorMode,
    pub clock: Clock,
    /// Process exit status after a fatal line; `None` keeps the process alive
    pub fatal_exit_code: Option<i32>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            max_pooled_buffers: None,
            color: ColorMode::Auto,
            clock: Clock::Local,
            fatal_exit_code: Some(DEFAULT_FATAL_EXIT_CODE),
        }
    }
}

impl LoggerConfig {
    /// Defaults adjusted by the process environment
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Apply environment overrides
    ///
    /// A non-empty `NO_COLOR` disables color regardless of the configured mode.
    #[must_use]
    pub fn with_env(self) -> Self {
        let no_color = std::env::var_os(NO_COLOR_ENV);
        self.with_no_color(no_color.as_deref())
    }

    fn with_no_color(mut self, no_color: Option<&OsStr>) -> Self {
        if no_color.is_some_and(|value| !value.is_empty()) {
            self.color = ColorMode::Never;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.queue_capacity == 0 {
            return Err(LoggerError::config(
                "LogQueue",
                "queue_capacity must be at least 1",
            ));
        }
        if self.buffer_capacity == 0 {
            return Err(LoggerError::config(
                "BufferPool",
                "buffer_capacity must be at least 1",
            ));
        }
        Ok(())
    }

    pub(crate) fn pooled_buffers(&self) -> usize {
        self.max_pooled_buffers.unwrap_or(self.queue_capacity)
    }
}
