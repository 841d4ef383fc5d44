//! Process-wide default logger
//!
//! The default logger is created either explicitly with [`init`] /
//! [`init_with`], or lazily from the environment on first use. It is never
//! replaced: once installed, further `init` calls fail, and once shut down it
//! stays shut down.
//!
//! # Example
//!
//! ```no_run
//! fn main() -> rust_console_logger::Result<()> {
//!     let _guard = rust_console_logger::init()?;
//!
//!     rust_console_logger::info("service starting");
//!     rust_console_logger::infof(format_args!("listening on port {}", 8080));
//!
//!     // Dropping the guard drains pending lines before the process exits.
//!     Ok(())
//! }
//! ```

use crate::core::{LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, Logger, Result};
use std::fmt;
use std::io::Write;
use std::sync::OnceLock;

static DEFAULT: OnceLock<Logger> = OnceLock::new();

/// Shuts the default logger down when dropped
#[must_use = "dropping the guard immediately shuts the default logger down"]
#[derive(Debug)]
pub struct ShutdownGuard {
    _private: (),
}

impl Drop for ShutdownGuard {
    fn drop(&mut self) {
        shutdown();
    }
}

/// Install the default logger configured from the environment
pub fn init() -> Result<ShutdownGuard> {
    init_with(Logger::builder().config(LoggerConfig::from_env()))
}

/// Install a default logger built from `builder`
pub fn init_with(builder: LoggerBuilder) -> Result<ShutdownGuard> {
    if DEFAULT.get().is_some() {
        return Err(LoggerError::AlreadyInitialized);
    }

    let logger = builder.build()?;
    // Losing the race drops (and shuts down) the logger we just built.
    DEFAULT
        .set(logger)
        .map_err(|_| LoggerError::AlreadyInitialized)?;
    Ok(ShutdownGuard { _private: () })
}

/// The default logger, created from the environment if nothing was installed
pub fn logger() -> &'static Logger {
    DEFAULT.get_or_init(|| {
        let logger = Logger::builder()
            .config(LoggerConfig::from_env())
            .assemble();
        if let Err(e) = logger.start() {
            eprintln!("[LOGGER ERROR] Default logger unavailable: {}", e);
        }
        logger
    })
}

pub fn debug(message: &str) {
    logger().debug(message);
}

pub fn info(message: &str) {
    logger().info(message);
}

pub fn warn(message: &str) {
    logger().warn(message);
}

pub fn error(message: &str) {
    logger().error(message);
}

/// Log, flush everything and exit with the configured status
pub fn fatal(message: &str) {
    logger().fatal(message);
}

pub fn debugf(args: fmt::Arguments<'_>) {
    logger().debug_fmt(args);
}

pub fn infof(args: fmt::Arguments<'_>) {
    logger().info_fmt(args);
}

pub fn warnf(args: fmt::Arguments<'_>) {
    logger().warn_fmt(args);
}

pub fn errorf(args: fmt::Arguments<'_>) {
    logger().error_fmt(args);
}

pub fn fatalf(args: fmt::Arguments<'_>) {
    logger().fatal_fmt(args);
}

/// Redirect the default logger's output
pub fn set_output<W: Write + Send + 'static>(output: W) -> Result<()> {
    logger().set_output(output)
}

/// Wait until every line logged so far has been written
pub fn flush() -> Result<()> {
    logger().flush()
}

/// Drain and stop the default logger; later log calls are dropped
pub fn shutdown() {
    if let Some(logger) = DEFAULT.get() {
        logger.shutdown();
    }
}

pub fn metrics() -> &'static LoggerMetrics {
    logger().metrics()
}
