//! Basic logger usage example
//!
//! Demonstrates the process-wide default logger and each log level.
//!
//! Run with: cargo run --example basic_usage

use rust_console_logger::prelude::*;

fn main() -> Result<()> {
    println!("=== Rust Console Logger - Basic Usage Example ===\n");

    // Shuts the default logger down (and drains it) when main returns.
    let _guard = rust_console_logger::init()?;

    println!("1. Logging at different levels:");
    rust_console_logger::debug("This is a debug message");
    rust_console_logger::info("This is an info message");
    rust_console_logger::warn("This is a warning message");
    rust_console_logger::error("This is an error message");
    rust_console_logger::flush()?;

    println!("\n2. Formatted messages:");
    let port = 8080;
    rust_console_logger::infof(format_args!("Server listening on port {}", port));
    rust_console_logger::warnf(format_args!("Disk usage at {}%", 91));
    rust_console_logger::flush()?;

    println!("\n3. Redirecting to stderr:");
    rust_console_logger::set_output(std::io::stderr())?;
    rust_console_logger::error("This line goes to stderr");
    rust_console_logger::flush()?;

    let metrics = rust_console_logger::metrics();
    println!(
        "\nLogged {} lines, dropped {}",
        metrics.total_logged(),
        metrics.dropped_count()
    );

    println!("\n=== Example completed successfully! ===");
    println!("Set NO_COLOR=1 to disable colors");

    Ok(())
}
